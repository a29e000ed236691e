//! Synthetic replacements for personally identifiable student fields.

use std::collections::HashSet;

use rand::Rng;

use crate::torneros::tools::error::{Result, ToolError};

pub const FIRST_NAMES: [&str; 26] = [
    "Alex", "Bea", "Carlo", "Dina", "Eli", "Faye", "Gio", "Hana", "Ivan", "Jade", "Kira", "Liam",
    "Mia", "Nico", "Omar", "Pia", "Quin", "Rosa", "Sara", "Troy", "Uma", "Vera", "Wes", "Xena",
    "Yani", "Zane",
];

pub const LAST_NAMES: [&str; 16] = [
    "Santos",
    "Garcia",
    "Reyes",
    "Cruz",
    "Lopez",
    "Flores",
    "Ramos",
    "Gonzales",
    "Torres",
    "Rivera",
    "Mendoza",
    "Aquino",
    "Morales",
    "Castro",
    "Delos Reyes",
    "Perez",
];

/// Subjects randomly attached to grade rows.
pub const SUBJECT_CATALOG: [&str; 9] = [
    "Introduction to Computing",
    "Programming 1",
    "Discrete Mathematics",
    "Data Structures",
    "Database Systems",
    "Software Engineering",
    "Web Development",
    "Mobile App Dev",
    "Artificial Intelligence",
];

pub const CONTACT_PREFIX: &str = "09";
pub const EMAIL_PREFIX: &str = "student";
pub const EMAIL_DOMAIN: &str = "@torneros.edu.ph";

const CONTACT_LOWER: u64 = 100_000_000;
const CONTACT_UPPER: u64 = 999_999_999;
const MAX_CONTACT_ATTEMPTS: usize = 10_000;

/// Finite ordered pool of display names, handed out once each.
#[derive(Debug, Clone)]
pub struct NamePool {
    names: Vec<String>,
    issued: usize,
}

impl Default for NamePool {
    fn default() -> Self {
        Self::new()
    }
}

impl NamePool {
    /// Builds the pool as every first name paired with every last name,
    /// first-name-major.
    pub fn new() -> Self {
        let names = FIRST_NAMES
            .iter()
            .flat_map(|first| LAST_NAMES.iter().map(move |last| format!("{first} {last}")))
            .collect();
        Self { names, issued: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.names.len()
    }

    pub fn issued(&self) -> usize {
        self.issued
    }

    /// Next unused pool entry, or `Student {n}` once the pool is exhausted.
    pub fn next_name(&mut self) -> String {
        let name = match self.names.get(self.issued) {
            Some(name) => name.clone(),
            None => format!("Student {}", self.issued + 1),
        };
        self.issued += 1;
        name
    }
}

/// Issues unique fake contact numbers.
#[derive(Debug, Clone, Default)]
pub struct ContactRegistry {
    issued: HashSet<String>,
}

impl ContactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_contact<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<String> {
        for _ in 0..MAX_CONTACT_ATTEMPTS {
            let candidate = format!(
                "{CONTACT_PREFIX}{}",
                rng.random_range(CONTACT_LOWER..=CONTACT_UPPER)
            );
            if self.issued.insert(candidate.clone()) {
                return Ok(candidate);
            }
        }
        Err(ToolError::ContactSpaceExhausted {
            attempts: MAX_CONTACT_ATTEMPTS,
        })
    }

    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }
}

/// Email address derived from a student id.
pub fn email_for(id: &str) -> String {
    format!("{EMAIL_PREFIX}{id}{EMAIL_DOMAIN}")
}

pub fn pick_subject<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    SUBJECT_CATALOG[rng.random_range(0..SUBJECT_CATALOG.len())]
}
