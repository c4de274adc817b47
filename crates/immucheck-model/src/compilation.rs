//! In-memory compilation snapshot: arenas of type and member declarations.
//!
//! A [`Compilation`] plays the role of the semantic model for one fixed
//! snapshot of a program. It is built by mutation (tests and front-ends add
//! declarations through the `add_*`/`set_*` API) and then treated as
//! read-only by the analysis engine, so shared concurrent queries need no
//! locking.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::symbols::{Attribute, MemberDef, MemberId, TypeDef, TypeId, TypeKind};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Compilation {
    types: Vec<TypeDef>,
    members: Vec<MemberDef>,
    by_name: HashMap<String, TypeId>,
}

impl Compilation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a type in the current compilation. Classes start unsealed;
    /// use [`Compilation::seal`] for sealed declarations.
    pub fn add_type(&mut self, name: &str, kind: TypeKind) -> TypeId {
        self.push_type(name, kind, false)
    }

    /// Declare a type that lives in a foreign assembly. Its members are not
    /// enumerable by the engine.
    pub fn add_external_type(&mut self, name: &str, kind: TypeKind) -> TypeId {
        self.push_type(name, kind, true)
    }

    fn push_type(&mut self, name: &str, kind: TypeKind, external: bool) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(TypeDef {
            name: name.to_string(),
            kind,
            is_sealed: false,
            is_external: external,
            base: None,
            interfaces: Vec::new(),
            type_args: Vec::new(),
            members: Vec::new(),
            attributes: Vec::new(),
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Attach a member to its declaring type, preserving declaration order.
    pub fn add_member(&mut self, owner: TypeId, mut member: MemberDef) -> MemberId {
        let id = MemberId(self.members.len() as u32);
        member.owner = owner;
        self.members.push(member);
        self.types[owner.index()].members.push(id);
        id
    }

    pub fn seal(&mut self, ty: TypeId) {
        self.types[ty.index()].is_sealed = true;
    }

    pub fn set_base(&mut self, ty: TypeId, base: TypeId) {
        self.types[ty.index()].base = Some(base);
    }

    pub fn add_interface(&mut self, ty: TypeId, iface: TypeId) {
        self.types[ty.index()].interfaces.push(iface);
    }

    pub fn set_type_args(&mut self, ty: TypeId, args: Vec<TypeId>) {
        self.types[ty.index()].type_args = args;
    }

    pub fn add_attribute(&mut self, ty: TypeId, attr: Attribute) {
        self.types[ty.index()].attributes.push(attr);
    }

    pub fn type_def(&self, ty: TypeId) -> &TypeDef {
        &self.types[ty.index()]
    }

    pub fn member_def(&self, m: MemberId) -> &MemberDef {
        &self.members[m.index()]
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// All declared type ids, in declaration order.
    pub fn type_ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        (0..self.types.len()).map(|i| TypeId(i as u32))
    }

    /// Ids of non-external types, the inspectable roots of a whole-program
    /// scan.
    pub fn local_type_ids(&self) -> Vec<TypeId> {
        self.type_ids()
            .filter(|id| !self.types[id.index()].is_external)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::MemberKind;

    #[test]
    fn test_empty_compilation() {
        let c = Compilation::new();
        assert_eq!(c.type_count(), 0);
        assert!(c.lookup("Missing").is_none());
        assert!(c.local_type_ids().is_empty());
    }

    #[test]
    fn test_declaration_order_preserved() {
        let mut c = Compilation::new();
        let int = c.add_external_type("Int32", TypeKind::Struct);
        let t = c.add_type("Pair", TypeKind::Struct);
        c.add_member(t, MemberDef::field("first", int));
        c.add_member(t, MemberDef::field("second", int));

        let names: Vec<&str> = c
            .type_def(t)
            .members
            .iter()
            .map(|m| c.member_def(*m).name.as_str())
            .collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn test_member_owner_backlink() {
        let mut c = Compilation::new();
        let int = c.add_external_type("Int32", TypeKind::Struct);
        let t = c.add_type("Holder", TypeKind::Class);
        let m = c.add_member(t, MemberDef::field("value", int));
        assert_eq!(c.member_def(m).owner, t);
        assert_eq!(c.member_def(m).kind, MemberKind::Field);
    }

    #[test]
    fn test_local_type_ids_skip_external() {
        let mut c = Compilation::new();
        c.add_external_type("String", TypeKind::Class);
        let t = c.add_type("Local", TypeKind::Class);
        assert_eq!(c.local_type_ids(), vec![t]);
    }

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let mut c = Compilation::new();
        let int = c.add_external_type("Int32", TypeKind::Struct);
        let t = c.add_type("Pair", TypeKind::Struct);
        c.add_member(t, MemberDef::field("first", int).read_only());

        let json = serde_json::to_string(&c).unwrap();
        let restored: Compilation = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.type_count(), 2);
        assert_eq!(restored.lookup("Pair"), Some(t));
        assert!(restored.member_def(MemberId(0)).is_read_only);
    }

    #[test]
    fn test_lookup_by_name() {
        let mut c = Compilation::new();
        let t = c.add_type("Geometry.Point", TypeKind::Struct);
        assert_eq!(c.lookup("Geometry.Point"), Some(t));
    }
}
