//! Verdicts, violation causes, and the per-query trace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a branch of the analysis failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cause {
    /// The member can be reassigned after construction.
    NotReadOnly,
    /// The value's type cannot be proven immutable (interface-typed, or a
    /// non-sealed class whose subclasses may add mutable state).
    MutableMemberType,
    ArrayType,
    DelegateType,
    DynamicType,
    /// An unconstrained generic type parameter may be instantiated with a
    /// mutable type.
    UnconstrainedGenericParameter,
    /// A member kind the structural rules do not model (event, indexer).
    UnhandledMemberKind,
    /// The type carries an explicit known-mutable marking.
    MarkedMutable,
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Cause::NotReadOnly => "NotReadOnly",
            Cause::MutableMemberType => "MutableMemberType",
            Cause::ArrayType => "ArrayType",
            Cause::DelegateType => "DelegateType",
            Cause::DynamicType => "DynamicType",
            Cause::UnconstrainedGenericParameter => "UnconstrainedGenericParameter",
            Cause::UnhandledMemberKind => "UnhandledMemberKind",
            Cause::MarkedMutable => "MarkedMutable",
        };
        f.write_str(s)
    }
}

/// A single mutability finding: the member path from the root type down to
/// the offending symbol, plus the cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Root type name followed by each member traversed, e.g.
    /// `["Outer", "field", "inner"]`.
    pub path: Vec<String>,
    /// The symbol the cause applies to (member or type name).
    pub symbol: String,
    pub cause: Cause,
}

impl Violation {
    /// `Outer.field.inner: NotReadOnly`
    pub fn render(&self) -> String {
        format!("{}: {}", self.path.join("."), self.cause)
    }
}

/// Outcome of one root query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Satisfied,
    Violated(Violation),
}

impl Verdict {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Verdict::Satisfied)
    }

    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Verdict::Satisfied => None,
            Verdict::Violated(v) => Some(v),
        }
    }
}

/// One rule application recorded during traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Goal description, e.g. `field#3`.
    pub goal: String,
    /// Symbol the goal was about.
    pub symbol: String,
    /// `satisfied`, `violated`, `expanded(n)`, or `revisit`.
    pub outcome: String,
}

/// Verdict plus the expansion trace that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inspection {
    pub verdict: Verdict,
    pub trace: Vec<TraceEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_render() {
        let v = Violation {
            path: vec!["Outer".into(), "field".into(), "inner".into()],
            symbol: "inner".into(),
            cause: Cause::NotReadOnly,
        };
        assert_eq!(v.render(), "Outer.field.inner: NotReadOnly");
    }

    #[test]
    fn test_verdict_accessors() {
        assert!(Verdict::Satisfied.is_satisfied());
        let v = Verdict::Violated(Violation {
            path: vec!["Box".into(), "items".into()],
            symbol: "items".into(),
            cause: Cause::ArrayType,
        });
        assert!(!v.is_satisfied());
        assert_eq!(v.violation().unwrap().cause, Cause::ArrayType);
    }

    #[test]
    fn test_cause_serializes_as_name() {
        let json = serde_json::to_string(&Cause::UnconstrainedGenericParameter).unwrap();
        assert_eq!(json, "\"UnconstrainedGenericParameter\"");
    }
}
