//! Shared fixtures for the integration suites.

use immucheck::model::{Compilation, TypeId, TypeKind};
use immucheck::OverrideConfig;

/// External primitive types every fixture compilation starts from.
pub struct Primitives {
    pub int: TypeId,
    pub string: TypeId,
}

/// Declare the usual external primitives in `comp`.
pub fn add_primitives(comp: &mut Compilation) -> Primitives {
    let int = comp.add_external_type("Int32", TypeKind::Struct);
    let string = comp.add_external_type("String", TypeKind::Class);
    Primitives { int, string }
}

/// Override configuration that trusts the external primitives.
pub fn trusted_primitives() -> OverrideConfig {
    OverrideConfig::default().allow("Int32").allow("String")
}
