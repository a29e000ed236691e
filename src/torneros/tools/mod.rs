pub mod assemble;
pub mod config;
pub mod error;
pub mod formula;
pub mod io;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod reconcile;
pub mod schema;
pub mod synth;

pub use error::{Result, ToolError};
