use crate::elab::binding::{Direction, PortDirection};
use crate::elab::diagnostic::ElabError;
use crate::elab::elaborator::Elaborator;
use crate::elab::module::ModuleRelation;
use crate::elab::signal::SignalType;
use crate::tests::{boolean, parent_child, uint};

#[test]
fn record_rejects_duplicate_field() {
    let ok = SignalType::record([("a", uint(8)), ("b", boolean())]);
    assert!(ok.is_ok());

    let err = SignalType::record([("a", uint(8)), ("a", boolean())]).unwrap_err();
    assert_eq!(err, ElabError::DuplicateField { field: "a".to_owned() });
}

#[test]
fn module_relations() {
    let mut s = Elaborator::new();
    let top = s.add_module("top");
    let a = s.add_child_module(top, "a");
    let b = s.add_child_module(top, "b");
    let a_inner = s.add_child_module(a, "inner");
    let other_root = s.add_module("other");

    assert_eq!(s.relation_to(top, top), ModuleRelation::Current);
    assert_eq!(s.relation_to(top, a), ModuleRelation::ChildOfContext);
    assert_eq!(s.relation_to(a, top), ModuleRelation::ParentOfContext);
    assert_eq!(s.relation_to(a, b), ModuleRelation::Sibling);
    // deeper ancestry is not traversed
    assert_eq!(s.relation_to(top, a_inner), ModuleRelation::Unrelated);
    assert_eq!(s.relation_to(a_inner, top), ModuleRelation::Unrelated);
    assert_eq!(s.relation_to(top, other_root), ModuleRelation::Unrelated);
}

#[test]
fn module_path() {
    let mut s = Elaborator::new();
    let top = s.add_module("top");
    let core = s.add_child_module(top, "core");
    let alu = s.add_child_module(core, "alu");
    assert_eq!(s.module_path_string(top), "top");
    assert_eq!(s.module_path_string(alu), "top.core.alu");
}

#[test]
fn signal_tree_names_and_lookups() {
    let (mut s, top, _) = parent_child();
    let ty = SignalType::record([
        ("data", SignalType::vector(uint(8), 2)),
        ("valid", boolean()),
    ])
    .unwrap();
    let io = s.add_port(top, "io", PortDirection::Output, &ty);

    let data = s.signal_field(io, "data").unwrap();
    let data_1 = s.signal_index(data, 1).unwrap();
    let valid = s.signal_field(io, "valid").unwrap();

    assert_eq!(s.signals[io].name, "io");
    assert_eq!(s.signals[data_1].name, "io.data(1)");
    assert_eq!(s.signals[valid].name, "io.valid");

    // leaves have refs, aggregates do not
    assert!(s.signal_ir(io).is_none());
    assert!(s.signal_ir(data).is_none());
    assert!(s.signal_ir(data_1).is_some());

    // the reconstructed type matches the declared one
    assert_eq!(s.signal_type(io), ty);

    assert_eq!(s.signal_direction(io), Direction::Output);
    assert_eq!(s.signal_direction(data_1), Direction::Output);
    assert_eq!(s.signal_module(io), Some(top));
}

#[test]
fn when_scopes_are_strictly_nested() {
    let (mut s, top, _) = parent_child();
    let outer = s.when_open();
    let inner = s.when_open();

    let w = s.add_wire(top, "w", &uint(8));
    assert!(s.is_conditionally_visible(w));

    // closing the outer scope first is rejected
    assert_eq!(s.when_close(outer).unwrap_err(), ElabError::WhenClosedOutOfOrder);

    s.when_close(inner).unwrap();
    assert!(!s.is_conditionally_visible(w));
    s.when_close(outer).unwrap();
}

#[test]
fn type_diagnostic_strings() {
    let mut s = Elaborator::new();
    let opcode = s.add_enum_decl("Opcode", 5);

    let ty = SignalType::record([
        ("data", SignalType::vector(uint(8), 3)),
        ("op", SignalType::Element(crate::elab::signal::ElementKind::Enum {
            decl: opcode,
            constrained: true,
        })),
    ])
    .unwrap();
    assert_eq!(
        ty.to_diagnostic_string(&s),
        "{data: uint(8)[3], op: enum Opcode}"
    );

    let mixed = SignalType::Vector(vec![uint(8), boolean()]);
    assert_eq!(mixed.to_diagnostic_string(&s), "[uint(8), bool]");
}
