//! Symbol definitions: types, members, attributes, and declaring syntax.

use serde::{Deserialize, Serialize};

/// Arena index of a type declaration inside a [`crate::Compilation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(pub u32);

/// Arena index of a member declaration inside a [`crate::Compilation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(pub u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl MemberId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Declaration kind of a type symbol.
///
/// `Error` stands for a symbol the underlying semantic model could not
/// resolve; the engine treats it as benign so one broken declaration does not
/// cascade into unrelated findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    Array,
    Dynamic,
    TypeParameter,
    Error,
}

/// Declaration kind of a member symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberKind {
    Field,
    Property,
    Method,
    Constructor,
    Event,
    Indexer,
}

/// A declaration-level annotation attached to a type or member.
///
/// Closed set: these are the only annotations the engine understands, and the
/// override layer matches on them exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attribute {
    /// The annotated type is asserted to be immutable; no expansion needed.
    Immutable,
    /// Immutable provided that each generic argument at the listed positions
    /// is itself proven immutable.
    ConditionallyImmutable { only_if: Vec<u16> },
    /// The annotated member was manually reviewed and is exempt from
    /// structural checks.
    Audited {
        owner: String,
        date: String,
        note: String,
    },
    /// The annotated member is knowingly excluded from enforcement (e.g. a
    /// migration in progress). Policy layers decide if this is itself a
    /// finding; this engine treats it the same as `Audited`.
    Unaudited { reason: String },
    /// The annotated type is asserted to hold mutable state.
    Mutable,
}

/// The initializer expression recorded on a field/property declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Initializer {
    /// `= new T(...)` — a direct construction. The engine narrows to the
    /// constructed type, which cannot be a more-derived subtype.
    ObjectCreation { constructed: TypeId },
    /// Any other expression; only its static type is known.
    Expression { static_type: TypeId },
}

/// One declaring-syntax record backing a field or property.
///
/// A well-formed member has exactly one of these. Zero or several model a
/// malformed symbol (e.g. partial declarations the semantic model failed to
/// merge) and make the accessor's syntax lookup fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSyntax {
    pub initializer: Option<Initializer>,
    /// True when a property getter has a user-written body. Such a property
    /// owns no compiler-synthesized backing field and contributes no state.
    pub getter_has_body: bool,
}

/// A type declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDef {
    /// Fully-qualified name, e.g. `Geometry.Point`.
    pub name: String,
    pub kind: TypeKind,
    pub is_sealed: bool,
    /// Declared outside the current compilation. Members of external types
    /// are not enumerable; such types must resolve via the override layer.
    pub is_external: bool,
    pub base: Option<TypeId>,
    pub interfaces: Vec<TypeId>,
    /// Generic arguments of an instantiated generic type, in position order.
    pub type_args: Vec<TypeId>,
    /// All declared members in declaration order (static ones included; the
    /// accessor filters).
    pub members: Vec<MemberId>,
    pub attributes: Vec<Attribute>,
}

/// A member declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDef {
    pub name: String,
    pub kind: MemberKind,
    /// Type that declares this member.
    pub owner: TypeId,
    pub is_static: bool,
    /// Field `readonly` / property get-only.
    pub is_read_only: bool,
    /// Declared type of the held value; `None` for methods/constructors.
    pub declared_type: Option<TypeId>,
    pub attributes: Vec<Attribute>,
    /// Declaring syntax records; exactly one for a well-formed member.
    pub syntax: Vec<MemberSyntax>,
}

impl MemberDef {
    fn new(name: &str, kind: MemberKind, declared_type: Option<TypeId>) -> Self {
        MemberDef {
            name: name.to_string(),
            kind,
            owner: TypeId(u32::MAX),
            is_static: false,
            is_read_only: false,
            declared_type,
            attributes: Vec::new(),
            syntax: vec![MemberSyntax::default()],
        }
    }

    /// A mutable instance field with one declaring-syntax record and no
    /// initializer.
    pub fn field(name: &str, ty: TypeId) -> Self {
        Self::new(name, MemberKind::Field, Some(ty))
    }

    /// An auto-implemented instance property (no getter body).
    pub fn property(name: &str, ty: TypeId) -> Self {
        Self::new(name, MemberKind::Property, Some(ty))
    }

    pub fn method(name: &str) -> Self {
        Self::new(name, MemberKind::Method, None)
    }

    pub fn constructor() -> Self {
        Self::new(".ctor", MemberKind::Constructor, None)
    }

    pub fn event(name: &str, ty: TypeId) -> Self {
        Self::new(name, MemberKind::Event, Some(ty))
    }

    pub fn read_only(mut self) -> Self {
        self.is_read_only = true;
        self
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_initializer(mut self, init: Initializer) -> Self {
        if let Some(s) = self.syntax.first_mut() {
            s.initializer = Some(init);
        }
        self
    }

    /// Mark the property getter as having a user-written body.
    pub fn with_getter_body(mut self) -> Self {
        if let Some(s) = self.syntax.first_mut() {
            s.getter_has_body = true;
        }
        self
    }

    pub fn with_attribute(mut self, attr: Attribute) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Replace the declaring-syntax records outright. Used to model a
    /// malformed symbol with zero or several records.
    pub fn with_syntax_records(mut self, records: Vec<MemberSyntax>) -> Self {
        self.syntax = records;
        self
    }
}
