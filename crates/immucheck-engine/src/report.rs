//! Serializable per-root report rows for downstream tooling.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::verdict::{Cause, Inspection, TraceEntry, Verdict};

/// Summary of one root query, flat enough to stream as JSONL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionReport {
    pub root: String,
    pub satisfied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<Cause>,
    /// Rendered finding, e.g. `Outer.inner.data: ArrayType`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finding: Option<String>,
    pub goals_applied: usize,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub trace: Vec<TraceEntry>,
}

impl InspectionReport {
    pub fn new(root: &str, inspection: &Inspection) -> Self {
        let (cause, finding) = match &inspection.verdict {
            Verdict::Satisfied => (None, None),
            Verdict::Violated(v) => (Some(v.cause), Some(v.render())),
        };
        InspectionReport {
            root: root.to_string(),
            satisfied: inspection.verdict.is_satisfied(),
            cause,
            finding,
            goals_applied: inspection.trace.len(),
            trace: Vec::new(),
        }
    }

    /// Keep the full expansion trace in the report.
    pub fn with_trace(mut self, inspection: &Inspection) -> Self {
        self.trace = inspection.trace.clone();
        self
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
