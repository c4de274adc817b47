//! End-to-end verdict tests for the analysis engine
//!
//! Coverage areas:
//! - Leaf verdicts (empty value types, primitives, arrays, delegates)
//! - Read-only enforcement and member paths
//! - Initializer narrowing to the constructed type
//! - Cycle termination on self- and mutually-referential type graphs
//! - Contract failures surfacing as errors, not verdicts

mod common;

use common::{add_primitives, trusted_primitives};
use immucheck::engine::Cause;
use immucheck::model::{Compilation, Initializer, MemberDef, MemberSyntax, TypeKind};
use immucheck::{CompilationGraph, InspectFlags, Inspector, OverrideConfig, Verdict};

fn verdict_of(comp: &Compilation, root: &str, overrides: OverrideConfig) -> Verdict {
    let graph = CompilationGraph::new(comp);
    let inspector = Inspector::new(&graph, overrides);
    inspector
        .inspect(comp.lookup(root).unwrap(), InspectFlags::default())
        .unwrap()
        .verdict
}

// =============================================================================
// Leaf verdicts
// =============================================================================

mod leaf_tests {
    use super::*;

    #[test]
    fn test_value_type_with_no_members_is_satisfied() {
        let mut c = Compilation::new();
        c.add_type("Unit", TypeKind::Struct);
        assert!(verdict_of(&c, "Unit", OverrideConfig::default()).is_satisfied());
    }

    #[test]
    fn test_point_with_readonly_primitive_fields_is_satisfied() {
        let mut c = Compilation::new();
        let prim = add_primitives(&mut c);
        let point = c.add_type("Point", TypeKind::Struct);
        c.add_member(point, MemberDef::field("x", prim.int).read_only());
        c.add_member(point, MemberDef::field("y", prim.int).read_only());

        assert!(verdict_of(&c, "Point", trusted_primitives()).is_satisfied());
    }

    #[test]
    fn test_enum_typed_field_is_satisfied() {
        let mut c = Compilation::new();
        let color = c.add_type("Color", TypeKind::Enum);
        let t = c.add_type("Pixel", TypeKind::Struct);
        c.add_member(t, MemberDef::field("tint", color).read_only());

        assert!(verdict_of(&c, "Pixel", OverrideConfig::default()).is_satisfied());
    }

    #[test]
    fn test_readonly_array_field_violates_with_array_type() {
        let mut c = Compilation::new();
        let arr = c.add_type("Int32[]", TypeKind::Array);
        let t = c.add_type("Buffer", TypeKind::Class);
        c.seal(t);
        c.add_member(t, MemberDef::field("data", arr).read_only());

        let v = verdict_of(&c, "Buffer", OverrideConfig::default());
        let violation = v.violation().unwrap();
        assert_eq!(violation.cause, Cause::ArrayType);
        assert_eq!(violation.render(), "Buffer.data: ArrayType");
    }

    #[test]
    fn test_mutable_array_field_cites_not_read_only_first() {
        // `Box { int[] items; }` — both NotReadOnly and ArrayType hold; the
        // read-only check comes first in traversal order.
        let mut c = Compilation::new();
        let arr = c.add_type("Int32[]", TypeKind::Array);
        let t = c.add_type("Box", TypeKind::Class);
        c.seal(t);
        c.add_member(t, MemberDef::field("items", arr));

        let v = verdict_of(&c, "Box", OverrideConfig::default());
        let violation = v.violation().unwrap();
        assert_eq!(violation.cause, Cause::NotReadOnly);
        assert_eq!(violation.path, vec!["Box".to_string(), "items".to_string()]);
    }

    #[test]
    fn test_delegate_typed_field_violates() {
        let mut c = Compilation::new();
        let del = c.add_type("Callback", TypeKind::Delegate);
        let t = c.add_type("Hook", TypeKind::Class);
        c.seal(t);
        c.add_member(t, MemberDef::field("onDone", del).read_only());

        let violation = verdict_of(&c, "Hook", OverrideConfig::default());
        assert_eq!(violation.violation().unwrap().cause, Cause::DelegateType);
    }

    #[test]
    fn test_unresolved_field_type_is_suppressed() {
        let mut c = Compilation::new();
        let err = c.add_type("?missing", TypeKind::Error);
        let t = c.add_type("Partial", TypeKind::Class);
        c.seal(t);
        c.add_member(t, MemberDef::field("broken", err).read_only());

        assert!(verdict_of(&c, "Partial", OverrideConfig::default()).is_satisfied());
    }

    #[test]
    fn test_generic_parameter_field_violates() {
        let mut c = Compilation::new();
        let tp = c.add_type("T", TypeKind::TypeParameter);
        let t = c.add_type("Holder`1", TypeKind::Class);
        c.seal(t);
        c.add_member(t, MemberDef::field("value", tp).read_only());

        let v = verdict_of(&c, "Holder`1", OverrideConfig::default());
        assert_eq!(
            v.violation().unwrap().cause,
            Cause::UnconstrainedGenericParameter
        );
    }
}

// =============================================================================
// Read-only enforcement and member state
// =============================================================================

mod member_tests {
    use super::*;

    #[test]
    fn test_non_readonly_field_violates_regardless_of_type() {
        let mut c = Compilation::new();
        let prim = add_primitives(&mut c);
        let t = c.add_type("Counter", TypeKind::Class);
        c.seal(t);
        c.add_member(t, MemberDef::field("count", prim.int));

        let v = verdict_of(&c, "Counter", trusted_primitives());
        assert_eq!(v.violation().unwrap().cause, Cause::NotReadOnly);
    }

    #[test]
    fn test_settable_auto_property_violates() {
        let mut c = Compilation::new();
        let prim = add_primitives(&mut c);
        let t = c.add_type("Model", TypeKind::Class);
        c.seal(t);
        c.add_member(t, MemberDef::property("Name", prim.string));

        let v = verdict_of(&c, "Model", trusted_primitives());
        assert_eq!(v.violation().unwrap().cause, Cause::NotReadOnly);
    }

    #[test]
    fn test_get_only_auto_property_is_satisfied() {
        let mut c = Compilation::new();
        let prim = add_primitives(&mut c);
        let t = c.add_type("Model", TypeKind::Class);
        c.seal(t);
        c.add_member(t, MemberDef::property("Name", prim.string).read_only());

        assert!(verdict_of(&c, "Model", trusted_primitives()).is_satisfied());
    }

    #[test]
    fn test_computed_property_contributes_no_state() {
        // A settable property with a hand-written getter body has no backing
        // field; the engine does not flag it.
        let mut c = Compilation::new();
        let prim = add_primitives(&mut c);
        let t = c.add_type("Calc", TypeKind::Class);
        c.seal(t);
        c.add_member(t, MemberDef::property("Total", prim.int).with_getter_body());

        assert!(verdict_of(&c, "Calc", trusted_primitives()).is_satisfied());
    }

    #[test]
    fn test_static_members_are_ignored() {
        let mut c = Compilation::new();
        let prim = add_primitives(&mut c);
        let t = c.add_type("Registry", TypeKind::Class);
        c.seal(t);
        c.add_member(t, MemberDef::field("shared", prim.int).static_member());

        assert!(verdict_of(&c, "Registry", trusted_primitives()).is_satisfied());
    }

    #[test]
    fn test_event_member_is_an_unhandled_kind() {
        let mut c = Compilation::new();
        let del = c.add_type("Handler", TypeKind::Delegate);
        let t = c.add_type("Publisher", TypeKind::Class);
        c.seal(t);
        c.add_member(t, MemberDef::event("changed", del));

        let v = verdict_of(&c, "Publisher", OverrideConfig::default());
        let violation = v.violation().unwrap();
        assert_eq!(violation.cause, Cause::UnhandledMemberKind);
        assert_eq!(violation.render(), "Publisher.changed: UnhandledMemberKind");
    }
}

// =============================================================================
// Narrowing and base types
// =============================================================================

mod narrowing_tests {
    use super::*;

    #[test]
    fn test_initializer_narrows_to_constructed_type() {
        // Field declared as an unsealed base but initialized `new Circle()`;
        // Circle is sealed and safe, so the branch is satisfied without
        // the allow-unsealed flag.
        let mut c = Compilation::new();
        let prim = add_primitives(&mut c);
        let shape = c.add_type("Shape", TypeKind::Class);
        let circle = c.add_type("Circle", TypeKind::Class);
        c.seal(circle);
        c.set_base(circle, shape);
        c.add_member(circle, MemberDef::field("radius", prim.int).read_only());
        let t = c.add_type("Drawing", TypeKind::Class);
        c.seal(t);
        c.add_member(
            t,
            MemberDef::field("shape", shape)
                .read_only()
                .with_initializer(Initializer::ObjectCreation {
                    constructed: circle,
                }),
        );

        assert!(verdict_of(&c, "Drawing", trusted_primitives()).is_satisfied());
    }

    #[test]
    fn test_same_field_without_initializer_needs_allow_unsealed() {
        let mut c = Compilation::new();
        let shape = c.add_type("Shape", TypeKind::Class);
        let t = c.add_type("Drawing", TypeKind::Class);
        c.seal(t);
        c.add_member(t, MemberDef::field("shape", shape).read_only());
        let graph = CompilationGraph::new(&c);
        let inspector = Inspector::new(&graph, OverrideConfig::default());
        let root = c.lookup("Drawing").unwrap();

        let strict = inspector.inspect(root, InspectFlags::default()).unwrap();
        assert_eq!(
            strict.verdict.violation().unwrap().cause,
            Cause::MutableMemberType
        );

        let relaxed = inspector
            .inspect(
                root,
                InspectFlags {
                    allow_unsealed: true,
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(relaxed.verdict.is_satisfied());
    }

    #[test]
    fn test_wrapper_with_constructed_point_is_satisfied() {
        // `Wrapper { readonly Point p = new Point(); }`
        let mut c = Compilation::new();
        let prim = add_primitives(&mut c);
        let point = c.add_type("Point", TypeKind::Struct);
        c.add_member(point, MemberDef::field("x", prim.int).read_only());
        c.add_member(point, MemberDef::field("y", prim.int).read_only());
        let t = c.add_type("Wrapper", TypeKind::Class);
        c.seal(t);
        c.add_member(
            t,
            MemberDef::field("p", point)
                .read_only()
                .with_initializer(Initializer::ObjectCreation { constructed: point }),
        );

        assert!(verdict_of(&c, "Wrapper", trusted_primitives()).is_satisfied());
    }

    #[test]
    fn test_non_construction_initializer_falls_back_to_static_type() {
        let mut c = Compilation::new();
        let iface = c.add_type("IShape", TypeKind::Interface);
        let t = c.add_type("Drawing", TypeKind::Class);
        c.seal(t);
        c.add_member(
            t,
            MemberDef::field("shape", iface)
                .read_only()
                .with_initializer(Initializer::Expression { static_type: iface }),
        );

        let v = verdict_of(&c, "Drawing", OverrideConfig::default());
        assert_eq!(v.violation().unwrap().cause, Cause::MutableMemberType);
    }

    #[test]
    fn test_base_class_members_are_inspected() {
        let mut c = Compilation::new();
        let prim = add_primitives(&mut c);
        let base = c.add_type("Base", TypeKind::Class);
        c.add_member(base, MemberDef::field("hidden", prim.int));
        let derived = c.add_type("Derived", TypeKind::Class);
        c.seal(derived);
        c.set_base(derived, base);

        let v = verdict_of(&c, "Derived", trusted_primitives());
        let violation = v.violation().unwrap();
        assert_eq!(violation.cause, Cause::NotReadOnly);
        assert_eq!(violation.render(), "Derived.hidden: NotReadOnly");
    }
}

// =============================================================================
// Cycle termination
// =============================================================================

mod cycle_tests {
    use super::*;

    #[test]
    fn test_mutually_referential_safe_types_are_satisfied() {
        let mut c = Compilation::new();
        let a = c.add_type("A", TypeKind::Class);
        let b = c.add_type("B", TypeKind::Class);
        c.seal(a);
        c.seal(b);
        c.add_member(a, MemberDef::field("b", b).read_only());
        c.add_member(b, MemberDef::field("a", a).read_only());

        assert!(verdict_of(&c, "A", OverrideConfig::default()).is_satisfied());
        assert!(verdict_of(&c, "B", OverrideConfig::default()).is_satisfied());
    }

    #[test]
    fn test_cycle_with_mutable_member_still_violates() {
        let mut c = Compilation::new();
        let prim = add_primitives(&mut c);
        let a = c.add_type("A", TypeKind::Class);
        let b = c.add_type("B", TypeKind::Class);
        c.seal(a);
        c.seal(b);
        c.add_member(a, MemberDef::field("b", b).read_only());
        c.add_member(b, MemberDef::field("a", a).read_only());
        c.add_member(b, MemberDef::field("dirty", prim.int));

        let v = verdict_of(&c, "A", trusted_primitives());
        let violation = v.violation().unwrap();
        assert_eq!(violation.cause, Cause::NotReadOnly);
        assert_eq!(violation.render(), "A.b.dirty: NotReadOnly");
    }

    #[test]
    fn test_linked_list_node_terminates() {
        let mut c = Compilation::new();
        let node = c.add_type("Node", TypeKind::Class);
        c.seal(node);
        c.add_member(node, MemberDef::field("next", node).read_only());

        assert!(verdict_of(&c, "Node", OverrideConfig::default()).is_satisfied());
    }
}

// =============================================================================
// Contract failures
// =============================================================================

mod contract_tests {
    use super::*;

    #[test]
    fn test_malformed_declaring_syntax_fails_the_query() {
        let mut c = Compilation::new();
        let prim = add_primitives(&mut c);
        let t = c.add_type("Broken", TypeKind::Class);
        c.seal(t);
        c.add_member(
            t,
            MemberDef::field("twice", prim.int)
                .read_only()
                .with_syntax_records(vec![MemberSyntax::default(), MemberSyntax::default()]),
        );
        let graph = CompilationGraph::new(&c);
        let inspector = Inspector::new(&graph, trusted_primitives());

        let err = inspector
            .inspect(c.lookup("Broken").unwrap(), InspectFlags::default())
            .unwrap_err();
        assert!(err.to_string().contains("declaring syntax"));
    }

    #[test]
    fn test_unlisted_external_type_fails_the_query() {
        let mut c = Compilation::new();
        let foreign = c.add_external_type("Vendor.Blob", TypeKind::Class);
        c.seal(foreign);
        let t = c.add_type("Uses", TypeKind::Class);
        c.seal(t);
        c.add_member(t, MemberDef::field("blob", foreign).read_only());
        let graph = CompilationGraph::new(&c);
        let inspector = Inspector::new(&graph, OverrideConfig::default());

        let err = inspector
            .inspect(c.lookup("Uses").unwrap(), InspectFlags::default())
            .unwrap_err();
        assert!(err.to_string().contains("Vendor.Blob"));
    }
}
