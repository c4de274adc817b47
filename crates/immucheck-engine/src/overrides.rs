//! # Override Layer
//!
//! Short-circuits consulted before structural expansion: a name-based
//! allow-list/deny-list supplied by the caller, immutability attributes on
//! the type graph, and per-member audit markings. Matching is always exact
//! symbol equality, never a partial name match.

use std::collections::{HashMap, HashSet};

use immucheck_model::{Attribute, MemberId, TypeId};
use serde::{Deserialize, Serialize};

use crate::graph::TypeGraph;

/// Who vouched for an audited member, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub owner: String,
    pub date: String,
    pub note: String,
}

/// Read-only override configuration for one compilation snapshot.
///
/// Passed explicitly into the engine entry point; the engine stays a pure
/// function of (type, flags, configuration, compilation).
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct OverrideConfig {
    /// Fully-qualified names of types trusted to be immutable.
    pub known_immutable: HashSet<String>,
    /// Fully-qualified names of types known to hold mutable state.
    pub known_mutable: HashSet<String>,
    /// Audited members keyed by `Type.member`.
    pub audited_members: HashMap<String, AuditRecord>,
}

impl OverrideConfig {
    pub fn allow(mut self, fully_qualified: &str) -> Self {
        self.known_immutable.insert(fully_qualified.to_string());
        self
    }

    pub fn deny(mut self, fully_qualified: &str) -> Self {
        self.known_mutable.insert(fully_qualified.to_string());
        self
    }

    pub fn audit(mut self, qualified_member: &str, record: AuditRecord) -> Self {
        self.audited_members
            .insert(qualified_member.to_string(), record);
        self
    }
}

/// Result of consulting the override layer for a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeOverride {
    /// No override applies; expand structurally.
    None,
    /// Trusted immutable; the branch is satisfied without expansion.
    Immutable,
    /// Known mutable; the branch is violated without expansion.
    Mutable,
    /// Immutable provided the generic arguments at these positions are
    /// themselves proven immutable.
    ConditionalOn(Vec<u16>),
}

impl OverrideConfig {
    /// Consult allow-list, deny-list, and immutability attributes, in that
    /// precedence order. `Immutable` attributes are inherited along the base
    /// chain and implemented interfaces; a conditional marking is only
    /// honored on the type that carries the generic arguments. With
    /// `ignore_attributes` only the name-based lists apply (used when
    /// validating that an annotation is itself truthful).
    pub fn type_override(
        &self,
        graph: &dyn TypeGraph,
        ty: TypeId,
        ignore_attributes: bool,
    ) -> TypeOverride {
        let name = graph.type_name(ty);
        if self.known_immutable.contains(name) {
            return TypeOverride::Immutable;
        }
        if self.known_mutable.contains(name) {
            return TypeOverride::Mutable;
        }
        if ignore_attributes {
            return TypeOverride::None;
        }

        for attr in graph.type_attributes(ty) {
            match attr {
                Attribute::Immutable => return TypeOverride::Immutable,
                Attribute::Mutable => return TypeOverride::Mutable,
                Attribute::ConditionallyImmutable { only_if } => {
                    return TypeOverride::ConditionalOn(only_if.clone());
                }
                _ => {}
            }
        }

        // Inherited: an Immutable marking anywhere up the base chain or on an
        // implemented interface vouches for this type as well.
        let mut visited: HashSet<TypeId> = HashSet::new();
        let mut pending: Vec<TypeId> = Vec::new();
        pending.extend(graph.base_of(ty));
        pending.extend(graph.interfaces_of(ty).iter().copied());
        while let Some(ancestor) = pending.pop() {
            if !visited.insert(ancestor) {
                continue;
            }
            if graph
                .type_attributes(ancestor)
                .iter()
                .any(|a| matches!(a, Attribute::Immutable))
            {
                return TypeOverride::Immutable;
            }
            pending.extend(graph.base_of(ancestor));
            pending.extend(graph.interfaces_of(ancestor).iter().copied());
        }

        TypeOverride::None
    }

    /// True when the member is exempt from structural checks, either through
    /// the audited-member registry or an `Audited`/`Unaudited` annotation.
    pub fn member_is_exempt(&self, graph: &dyn TypeGraph, m: MemberId) -> bool {
        if self
            .audited_members
            .contains_key(&graph.qualified_member_name(m))
        {
            return true;
        }
        graph
            .member_attributes(m)
            .iter()
            .any(|a| matches!(a, Attribute::Audited { .. } | Attribute::Unaudited { .. }))
    }
}
