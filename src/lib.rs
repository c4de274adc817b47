//! immucheck
//!
//! Determines whether instances of a type can expose observable mutable
//! state after construction, and explains every negative answer:
//!
//! - **Symbol model**: declaration-level types, members, attributes, and
//!   initializer syntax ([`model`])
//! - **Analysis engine**: goal/rule decomposition, cycle-safe traversal,
//!   override layer, verdicts and reports ([`engine`])
//!
//! The usual entry point is [`engine::Inspector`]: build a
//! [`model::Compilation`], wrap it in an [`engine::CompilationGraph`], and
//! ask for a verdict per root type.

pub use immucheck_engine as engine;
pub use immucheck_model as model;

pub use immucheck_engine::{
    CompilationGraph, InspectFlags, Inspection, InspectionReport, Inspector, OverrideConfig,
    Verdict,
};
pub use immucheck_model::Compilation;
