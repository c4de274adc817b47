//! # Type Graph Accessor
//!
//! The seam between the analysis engine and whatever supplies type
//! information. The engine only ever talks to a [`TypeGraph`]; the default
//! implementation, [`CompilationGraph`], answers from an in-memory
//! [`Compilation`] snapshot.
//!
//! Failure mode: an unresolvable symbol surfaces as [`TypeKind::Error`], and
//! rules treat it as satisfied so one broken declaration does not storm the
//! caller with findings. A member whose declaring syntax is not exactly one
//! record is a genuine contract violation and fails the root query instead.

use anyhow::{bail, Result};
use immucheck_model::{
    Attribute, Compilation, MemberId, MemberKind, MemberSyntax, TypeId, TypeKind,
};

/// Read-only queries over the type graph of one compilation snapshot.
pub trait TypeGraph: Sync {
    fn kind(&self, ty: TypeId) -> TypeKind;
    fn type_name(&self, ty: TypeId) -> &str;
    fn is_sealed(&self, ty: TypeId) -> bool;
    /// True when the type is declared outside the current compilation; its
    /// members cannot be enumerated.
    fn is_external(&self, ty: TypeId) -> bool;
    fn base_of(&self, ty: TypeId) -> Option<TypeId>;
    fn interfaces_of(&self, ty: TypeId) -> &[TypeId];
    /// Generic arguments of an instantiated generic type, position order.
    fn type_args_of(&self, ty: TypeId) -> &[TypeId];
    fn type_attributes(&self, ty: TypeId) -> &[Attribute];

    /// Non-static declared members in declaration order.
    fn members_of(&self, ty: TypeId) -> Vec<MemberId>;
    fn member_kind(&self, m: MemberId) -> MemberKind;
    fn member_name(&self, m: MemberId) -> &str;
    fn member_owner(&self, m: MemberId) -> TypeId;
    /// Field `readonly` / property get-only.
    fn member_is_read_only(&self, m: MemberId) -> bool;
    fn member_declared_type(&self, m: MemberId) -> Option<TypeId>;
    fn member_attributes(&self, m: MemberId) -> &[Attribute];

    /// The single declaring-syntax record behind a field/property. Errors
    /// when the symbol is malformed (zero or several records).
    fn declaring_syntax(&self, m: MemberId) -> Result<&MemberSyntax>;

    /// `Owner.member`, the key used by the audited-member registry.
    fn qualified_member_name(&self, m: MemberId) -> String {
        format!(
            "{}.{}",
            self.type_name(self.member_owner(m)),
            self.member_name(m)
        )
    }
}

/// [`TypeGraph`] backed by an in-memory [`Compilation`].
pub struct CompilationGraph<'a> {
    comp: &'a Compilation,
}

impl<'a> CompilationGraph<'a> {
    pub fn new(comp: &'a Compilation) -> Self {
        CompilationGraph { comp }
    }
}

impl TypeGraph for CompilationGraph<'_> {
    fn kind(&self, ty: TypeId) -> TypeKind {
        self.comp.type_def(ty).kind
    }

    fn type_name(&self, ty: TypeId) -> &str {
        &self.comp.type_def(ty).name
    }

    fn is_sealed(&self, ty: TypeId) -> bool {
        self.comp.type_def(ty).is_sealed
    }

    fn is_external(&self, ty: TypeId) -> bool {
        self.comp.type_def(ty).is_external
    }

    fn base_of(&self, ty: TypeId) -> Option<TypeId> {
        self.comp.type_def(ty).base
    }

    fn interfaces_of(&self, ty: TypeId) -> &[TypeId] {
        &self.comp.type_def(ty).interfaces
    }

    fn type_args_of(&self, ty: TypeId) -> &[TypeId] {
        &self.comp.type_def(ty).type_args
    }

    fn type_attributes(&self, ty: TypeId) -> &[Attribute] {
        &self.comp.type_def(ty).attributes
    }

    fn members_of(&self, ty: TypeId) -> Vec<MemberId> {
        self.comp
            .type_def(ty)
            .members
            .iter()
            .copied()
            .filter(|m| !self.comp.member_def(*m).is_static)
            .collect()
    }

    fn member_kind(&self, m: MemberId) -> MemberKind {
        self.comp.member_def(m).kind
    }

    fn member_name(&self, m: MemberId) -> &str {
        &self.comp.member_def(m).name
    }

    fn member_owner(&self, m: MemberId) -> TypeId {
        self.comp.member_def(m).owner
    }

    fn member_is_read_only(&self, m: MemberId) -> bool {
        self.comp.member_def(m).is_read_only
    }

    fn member_declared_type(&self, m: MemberId) -> Option<TypeId> {
        self.comp.member_def(m).declared_type
    }

    fn member_attributes(&self, m: MemberId) -> &[Attribute] {
        &self.comp.member_def(m).attributes
    }

    fn declaring_syntax(&self, m: MemberId) -> Result<&MemberSyntax> {
        let records = &self.comp.member_def(m).syntax;
        if records.len() != 1 {
            bail!(
                "member '{}' has {} declaring syntax records, expected exactly 1",
                self.qualified_member_name(m),
                records.len()
            );
        }
        Ok(&records[0])
    }
}
