//! Shared symbol-model types for the immucheck workspace.
//!
//! This crate holds the declaration-level view of a program that the analysis
//! engine consumes: types, members, attributes, and the declaring syntax
//! behind fields and properties. Everything is arena-indexed — `TypeId` and
//! `MemberId` are plain indices into a [`Compilation`], cheap to copy and
//! usable as map keys.

pub mod compilation;
pub mod symbols;

pub use compilation::Compilation;
pub use symbols::{
    Attribute, Initializer, MemberDef, MemberId, MemberKind, MemberSyntax, TypeDef, TypeId,
    TypeKind,
};
