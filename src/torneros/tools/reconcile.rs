use std::collections::{HashMap, HashSet};

use rand::Rng;
use tracing::debug;

use crate::torneros::tools::error::{Result, ToolError};

/// Default width of generated student identifiers.
pub const DEFAULT_ID_DIGITS: u32 = 6;
/// Upper bound on random draws for a single identifier.
pub const MAX_DRAW_ATTEMPTS: usize = 10_000;

const MAX_ID_DIGITS: u32 = 18;

/// Assigns unique synthetic identifiers to students and remembers which
/// source identifier each one replaced.
#[derive(Debug, Clone)]
pub struct IdentifierReconciler {
    digits: u32,
    assigned: HashSet<String>,
    mapping: HashMap<String, String>,
    /// Assigned ids that fall inside the generated value space.
    in_space: u64,
    generated: usize,
}

impl IdentifierReconciler {
    /// Creates a reconciler generating identifiers of `digits` decimal digits.
    pub fn new(digits: u32) -> Result<Self> {
        if !(1..=MAX_ID_DIGITS).contains(&digits) {
            return Err(ToolError::InvalidConfig(format!(
                "identifier width must be between 1 and {MAX_ID_DIGITS} digits, got {digits}"
            )));
        }
        Ok(Self {
            digits,
            assigned: HashSet::new(),
            mapping: HashMap::new(),
            in_space: 0,
            generated: 0,
        })
    }

    /// Returns the synthetic id for a student whose source id is `raw`.
    ///
    /// The source id is kept when it is present and not yet taken; otherwise
    /// a fresh id is drawn. The first synthetic id a source id resolves to is
    /// the one grade rows join against.
    pub fn reconcile<R: Rng + ?Sized>(&mut self, raw: Option<&str>, rng: &mut R) -> Result<String> {
        let raw = raw.map(str::trim).filter(|value| !value.is_empty());

        let id = match raw {
            Some(value) if !self.assigned.contains(value) => {
                if self.in_value_space(value) {
                    self.in_space += 1;
                }
                self.assigned.insert(value.to_string());
                value.to_string()
            }
            _ => {
                let id = self.draw(rng)?;
                debug!(raw = ?raw, id = %id, "generated replacement identifier");
                id
            }
        };

        if let Some(value) = raw {
            self.mapping
                .entry(value.to_string())
                .or_insert_with(|| id.clone());
        }

        Ok(id)
    }

    /// Looks up the synthetic id recorded for a source id.
    pub fn resolve(&self, raw: &str) -> Option<&str> {
        self.mapping.get(raw.trim()).map(String::as_str)
    }

    pub fn is_assigned(&self, id: &str) -> bool {
        self.assigned.contains(id)
    }

    /// Number of identifiers that had to be generated rather than kept.
    pub fn generated_count(&self) -> usize {
        self.generated
    }

    fn bounds(&self) -> (u64, u64) {
        (10_u64.pow(self.digits - 1), 10_u64.pow(self.digits) - 1)
    }

    fn in_value_space(&self, id: &str) -> bool {
        let (lower, upper) = self.bounds();
        id.len() == self.digits as usize
            && id
                .parse::<u64>()
                .is_ok_and(|value| (lower..=upper).contains(&value))
    }

    fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<String> {
        let (lower, upper) = self.bounds();
        let exhausted = ToolError::IdentifierSpaceExhausted {
            digits: self.digits,
            attempts: MAX_DRAW_ATTEMPTS,
        };
        if self.in_space > upper - lower {
            return Err(exhausted);
        }

        for _ in 0..MAX_DRAW_ATTEMPTS {
            let candidate = rng.random_range(lower..=upper).to_string();
            if self.assigned.insert(candidate.clone()) {
                self.in_space += 1;
                self.generated += 1;
                return Ok(candidate);
            }
        }

        Err(exhausted)
    }
}
