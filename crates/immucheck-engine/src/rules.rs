//! # Rule Set
//!
//! One total rule per goal variant. A rule consumes a goal and produces an
//! [`Expansion`]: the branch is satisfied, the branch is violated with a
//! cause, or the goal decomposes into sub-goals. Programming contract
//! violations (an interface reaching concrete dispatch, an external type
//! reaching member enumeration, malformed declaring syntax) are `Err` and
//! abort the whole root query — they are never folded into a verdict.

use anyhow::{anyhow, bail, Result};
use immucheck_model::{Initializer, MemberId, MemberKind, TypeId, TypeKind};
use smallvec::{smallvec, SmallVec};
use tracing::debug;

use crate::goal::Goal;
use crate::graph::TypeGraph;
use crate::overrides::{OverrideConfig, TypeOverride};
use crate::verdict::Cause;
use crate::InspectFlags;

pub type GoalVec = SmallVec<[Goal; 4]>;

/// Result of applying one rule to one goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    Satisfied,
    Violated {
        cause: Cause,
        /// Extra member-path segment when the rule violates at a symbol it
        /// discovered itself (e.g. an event found during member enumeration).
        segment: Option<String>,
    },
    Expand(GoalVec),
}

impl Expansion {
    fn violated(cause: Cause) -> Self {
        Expansion::Violated {
            cause,
            segment: None,
        }
    }
}

pub struct RuleSet<'a> {
    graph: &'a dyn TypeGraph,
    overrides: &'a OverrideConfig,
    flags: InspectFlags,
}

impl<'a> RuleSet<'a> {
    pub fn new(graph: &'a dyn TypeGraph, overrides: &'a OverrideConfig, flags: InspectFlags) -> Self {
        RuleSet {
            graph,
            overrides,
            flags,
        }
    }

    pub fn apply(&self, goal: Goal) -> Result<Expansion> {
        match goal {
            Goal::Type(t) => self.type_rule(t),
            Goal::ConcreteType(t) => self.concrete_type_rule(t),
            Goal::Class(t) => self.members_rule(t, true),
            Goal::Struct(t) => self.members_rule(t, false),
            Goal::GenericParameter(t) => Ok(self.generic_parameter_rule(t)),
            Goal::Field(m) | Goal::Property(m) => self.member_rule(m),
            Goal::ReadOnly(m) => Ok(self.read_only_rule(m)),
            Goal::Initializer { declared, member } => self.initializer_rule(declared, member),
        }
    }

    /// Override-layer consultation shared by every type-level rule. Returns
    /// `Some` when an override resolves the goal without expansion.
    fn type_override(&self, ty: TypeId) -> Result<Option<Expansion>> {
        match self
            .overrides
            .type_override(self.graph, ty, self.flags.ignore_immutable_attribute)
        {
            TypeOverride::None => Ok(None),
            TypeOverride::Immutable => Ok(Some(Expansion::Satisfied)),
            TypeOverride::Mutable => Ok(Some(Expansion::violated(Cause::MarkedMutable))),
            TypeOverride::ConditionalOn(positions) => {
                let args = self.graph.type_args_of(ty);
                let mut goals = GoalVec::new();
                for pos in positions {
                    let arg = args.get(pos as usize).ok_or_else(|| {
                        anyhow!(
                            "conditional immutability marking on '{}' names generic position {} \
                             but the type has {} argument(s)",
                            self.graph.type_name(ty),
                            pos,
                            args.len()
                        )
                    })?;
                    goals.push(Goal::Type(*arg));
                }
                Ok(Some(Expansion::Expand(goals)))
            }
        }
    }

    /// General entry point for any type reference. Interfaces and non-sealed
    /// classes cannot be proven here: the runtime value may be any
    /// implementation or subclass.
    fn type_rule(&self, ty: TypeId) -> Result<Expansion> {
        if let Some(resolved) = self.type_override(ty)? {
            return Ok(resolved);
        }
        match self.graph.kind(ty) {
            TypeKind::Interface => Ok(Expansion::violated(Cause::MutableMemberType)),
            TypeKind::Class
                if !self.graph.is_sealed(ty) && !self.flags.allow_unsealed =>
            {
                Ok(Expansion::violated(Cause::MutableMemberType))
            }
            _ => Ok(Expansion::Expand(smallvec![Goal::ConcreteType(ty)])),
        }
    }

    /// Dispatch by kind for a type known not to be an interface.
    fn concrete_type_rule(&self, ty: TypeId) -> Result<Expansion> {
        if let Some(resolved) = self.type_override(ty)? {
            return Ok(resolved);
        }
        match self.graph.kind(ty) {
            TypeKind::Array => Ok(Expansion::violated(Cause::ArrayType)),
            TypeKind::Delegate => Ok(Expansion::violated(Cause::DelegateType)),
            TypeKind::Dynamic => Ok(Expansion::violated(Cause::DynamicType)),
            TypeKind::Enum => Ok(Expansion::Satisfied),
            TypeKind::Error => {
                // Unresolved symbol: suppress rather than cascade findings
                // out of an unrelated compile error.
                debug!(
                    "suppressing unresolved type '{}'",
                    self.graph.type_name(ty)
                );
                Ok(Expansion::Satisfied)
            }
            TypeKind::Class => Ok(Expansion::Expand(smallvec![Goal::Class(ty)])),
            TypeKind::Struct => Ok(Expansion::Expand(smallvec![Goal::Struct(ty)])),
            TypeKind::TypeParameter => {
                Ok(Expansion::Expand(smallvec![Goal::GenericParameter(ty)]))
            }
            TypeKind::Interface => bail!(
                "interface '{}' reached concrete-type dispatch; interfaces must be resolved \
                 before concretization",
                self.graph.type_name(ty)
            ),
        }
    }

    /// Own declared non-static members, base type first for classes.
    fn members_rule(&self, ty: TypeId, with_base: bool) -> Result<Expansion> {
        if let Some(resolved) = self.type_override(ty)? {
            return Ok(resolved);
        }
        if self.graph.is_external(ty) {
            bail!(
                "cannot enumerate members of external type '{}'; external types must resolve \
                 via the override layer",
                self.graph.type_name(ty)
            );
        }

        let mut goals = GoalVec::new();
        if with_base {
            if let Some(base) = self.graph.base_of(ty) {
                goals.push(Goal::ConcreteType(base));
            }
        }
        for m in self.graph.members_of(ty) {
            match self.graph.member_kind(m) {
                MemberKind::Field => goals.push(Goal::Field(m)),
                MemberKind::Property => goals.push(Goal::Property(m)),
                // Constructors run once before the instance is observable;
                // other methods are opaque and tracked structurally through
                // the fields they write.
                MemberKind::Method | MemberKind::Constructor => {}
                MemberKind::Event | MemberKind::Indexer => {
                    return Ok(Expansion::Violated {
                        cause: Cause::UnhandledMemberKind,
                        segment: Some(self.graph.member_name(m).to_string()),
                    });
                }
            }
        }
        Ok(Expansion::Expand(goals))
    }

    // TODO: a parameter constrained to bounds that are themselves proven
    // immutable could be satisfied here instead of always violating.
    fn generic_parameter_rule(&self, _ty: TypeId) -> Expansion {
        Expansion::violated(Cause::UnconstrainedGenericParameter)
    }

    /// Field/Property rule: read-only-ness always, plus the narrower
    /// initializer type when one exists, else the declared type.
    fn member_rule(&self, m: MemberId) -> Result<Expansion> {
        if self.overrides.member_is_exempt(self.graph, m) {
            return Ok(Expansion::Satisfied);
        }
        let syntax = self.graph.declaring_syntax(m)?;
        if self.graph.member_kind(m) == MemberKind::Property && syntax.getter_has_body {
            // A hand-written getter owns no backing field; it contributes no
            // state of its own.
            return Ok(Expansion::Satisfied);
        }
        let declared = self.graph.member_declared_type(m).ok_or_else(|| {
            anyhow!(
                "member '{}' has no declared type",
                self.graph.qualified_member_name(m)
            )
        })?;

        let mut goals: GoalVec = smallvec![Goal::ReadOnly(m)];
        if syntax.initializer.is_some() {
            goals.push(Goal::Initializer {
                declared,
                member: m,
            });
        } else {
            goals.push(Goal::Type(declared));
        }
        Ok(Expansion::Expand(goals))
    }

    /// A member that can be reassigned violates outright, whatever the type
    /// of the value it currently holds.
    fn read_only_rule(&self, m: MemberId) -> Expansion {
        if self.graph.member_is_read_only(m) {
            Expansion::Satisfied
        } else {
            Expansion::violated(Cause::NotReadOnly)
        }
    }

    /// Direct object construction narrows to the constructed type, which
    /// cannot be a more-derived subtype; any other expression falls back to
    /// its static type.
    fn initializer_rule(&self, _declared: TypeId, m: MemberId) -> Result<Expansion> {
        let syntax = self.graph.declaring_syntax(m)?;
        match syntax.initializer {
            Some(Initializer::ObjectCreation { constructed }) => {
                Ok(Expansion::Expand(smallvec![Goal::ConcreteType(constructed)]))
            }
            Some(Initializer::Expression { static_type }) => {
                Ok(Expansion::Expand(smallvec![Goal::Type(static_type)]))
            }
            None => bail!(
                "initializer goal for member '{}' which has no initializer",
                self.graph.qualified_member_name(m)
            ),
        }
    }
}
