//! # immucheck-engine
//!
//! Goal-directed immutability analysis. A root query "is type T immutable?"
//! is decomposed by a rule set into goals about T's base type, members,
//! generic arguments, and initializers; a traversal driver discharges them
//! depth-first with explicit cycle guarding and folds the outcome into a
//! [`Verdict`] — `Satisfied`, or `Violated` with the member path and cause.
//!
//! The engine is purely computational: it reads one fixed compilation
//! snapshot through the [`TypeGraph`] accessor and an explicit
//! [`OverrideConfig`], performs no I/O, and never mutates shared state.
//! Genuine mutability findings are data; only programming contract
//! violations (malformed symbols, an interface reaching concrete dispatch)
//! surface as errors, and each one fails a single root query.

pub mod driver;
pub mod goal;
pub mod graph;
pub mod overrides;
pub mod report;
pub mod rules;
pub mod verdict;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{bail, Result};
use parking_lot::RwLock;
use rayon::prelude::*;
use tracing::debug;

use immucheck_model::TypeId;

pub use driver::Driver;
pub use goal::Goal;
pub use graph::{CompilationGraph, TypeGraph};
pub use overrides::{AuditRecord, OverrideConfig, TypeOverride};
pub use report::InspectionReport;
pub use verdict::{Cause, Inspection, TraceEntry, Verdict, Violation};

/// Per-query options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct InspectFlags {
    /// Treat a non-sealed class type as expandable even though subclasses
    /// could add mutable state. For callers that already know the concrete
    /// runtime type.
    pub allow_unsealed: bool,
    /// Skip attribute-based overrides and force structural expansion. Used
    /// to validate that an immutability annotation is itself truthful. The
    /// name-based allow-list still applies.
    pub ignore_immutable_attribute: bool,
}

/// Analysis entry point for one compilation snapshot.
///
/// Root queries are independent: each owns its visitation state, so
/// concurrent `inspect` calls need no coordination. Final verdicts are
/// additionally memoized across queries — safe because the snapshot and the
/// override configuration are fixed for the life of the `Inspector`.
pub struct Inspector<'a> {
    graph: &'a dyn TypeGraph,
    overrides: OverrideConfig,
    memo: RwLock<HashMap<(TypeId, InspectFlags), Verdict>>,
}

impl<'a> Inspector<'a> {
    pub fn new(graph: &'a dyn TypeGraph, overrides: OverrideConfig) -> Self {
        Inspector {
            graph,
            overrides,
            memo: RwLock::new(HashMap::new()),
        }
    }

    /// Run one root query and return the verdict with its full expansion
    /// trace. Always recomputes, so the trace is complete.
    pub fn inspect(&self, root: TypeId, flags: InspectFlags) -> Result<Inspection> {
        Driver::new(self.graph, &self.overrides, flags).run(root)
    }

    /// Memoized verdict for one root query.
    pub fn verdict(&self, root: TypeId, flags: InspectFlags) -> Result<Verdict> {
        if let Some(v) = self.memo.read().get(&(root, flags)) {
            return Ok(v.clone());
        }
        let verdict = self.inspect(root, flags)?.verdict;
        self.memo.write().insert((root, flags), verdict.clone());
        Ok(verdict)
    }

    /// Inspect many independent roots in parallel, e.g. every candidate
    /// discovered during a compilation-wide scan. The cancel flag is honored
    /// between root queries, never mid-traversal (a single traversal is
    /// bounded by the type graph).
    pub fn inspect_all(
        &self,
        roots: &[TypeId],
        flags: InspectFlags,
        cancel: Option<&AtomicBool>,
    ) -> Result<Vec<(TypeId, Verdict)>> {
        debug!("scanning {} root type(s)", roots.len());
        roots
            .par_iter()
            .map(|&root| {
                if let Some(flag) = cancel {
                    if flag.load(Ordering::Relaxed) {
                        bail!(
                            "scan cancelled before inspecting '{}'",
                            self.graph.type_name(root)
                        );
                    }
                }
                Ok((root, self.verdict(root, flags)?))
            })
            .collect()
    }
}
