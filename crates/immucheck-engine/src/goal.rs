//! The goal model: what remains to be proven at each step of a traversal.
//!
//! A goal is a pending question of the form "is this symbol safe with respect
//! to observable mutable state?". Goals are produced by rule expansion,
//! consumed exactly once, and never mutated. The variant set is closed on
//! purpose: the rule set matches it exhaustively, so a new variant is a
//! compile-time obligation to handle everywhere.

use std::fmt;

use immucheck_model::{MemberId, TypeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Goal {
    /// Any type reference: a field/property type, a generic argument, or an
    /// initializer's static type. May be an interface, array, dynamic, or
    /// concrete type.
    Type(TypeId),
    /// A type already known not to be an interface.
    ConcreteType(TypeId),
    /// A class's own declared non-static members, plus its base type.
    Class(TypeId),
    /// A struct's own declared non-static members (no base type).
    Struct(TypeId),
    /// An unresolved generic type parameter.
    GenericParameter(TypeId),
    /// A field holds no observable mutable state.
    Field(MemberId),
    /// A property holds no observable mutable state.
    Property(MemberId),
    /// The member is declared read-only.
    ReadOnly(MemberId),
    /// The value a member is initialized to is safe. Narrows to the actual
    /// constructed type when the initializer is a direct construction;
    /// otherwise falls back to the declared type.
    Initializer { declared: TypeId, member: MemberId },
}

impl Goal {
    /// Short label for traces and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Goal::Type(_) => "type",
            Goal::ConcreteType(_) => "concrete-type",
            Goal::Class(_) => "class",
            Goal::Struct(_) => "struct",
            Goal::GenericParameter(_) => "generic-parameter",
            Goal::Field(_) => "field",
            Goal::Property(_) => "property",
            Goal::ReadOnly(_) => "read-only",
            Goal::Initializer { .. } => "initializer",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Goal::Type(t)
            | Goal::ConcreteType(t)
            | Goal::Class(t)
            | Goal::Struct(t)
            | Goal::GenericParameter(t) => write!(f, "{}#{}", self.label(), t.0),
            Goal::Field(m) | Goal::Property(m) | Goal::ReadOnly(m) => {
                write!(f, "{}#{}", self.label(), m.0)
            }
            Goal::Initializer { declared, member } => {
                write!(f, "initializer#{}@{}", member.0, declared.0)
            }
        }
    }
}
