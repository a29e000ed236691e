//! Core library for the torneros-tools command line application.
//!
//! The library merges a Students workbook and a Grades workbook into a single
//! anonymised workbook. The modules are structured to keep responsibilities
//! narrow and composable: IO adapters live under [`torneros::tools::io`],
//! record types inside [`torneros::tools::model`], identifier and synthetic
//! value generation in [`torneros::tools::reconcile`] and
//! [`torneros::tools::synth`], formula text in [`torneros::tools::formula`],
//! the sheet layout in [`torneros::tools::assemble`], and the orchestration
//! under [`torneros::tools::pipeline`].

pub mod torneros;

pub use torneros::tools::{
    Result, ToolError, assemble, config, error, formula, io, model, normalize, pipeline,
    reconcile, schema, synth,
};
