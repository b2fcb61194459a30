use angl_core::error::ErrorKind;
use angl_core::scope::{
    AccessClass, LinkedVariable, ScopeKind, ScopeTree, StorageClass, Variable, allocate_target_identifiers,
};

fn function(tree: &mut ScopeTree) -> angl_core::scope::ScopeId {
    tree.push_scope(ScopeTree::GLOBAL, ScopeKind::Function).unwrap()
}

#[test]
fn colliding_slots_get_sequential_suffixes() {
    let mut tree = ScopeTree::new();
    let f = function(&mut tree);
    let a = tree.add(f, Variable::local("x")).unwrap();
    let b = tree.add(f, Variable::local("y")).unwrap();
    let c = tree.add(f, Variable::local("z")).unwrap();

    assert_eq!(tree.assign_target_identifier(a, "n").unwrap(), "n");
    assert_eq!(tree.assign_target_identifier(b, "n").unwrap(), "n$1");
    assert_eq!(tree.assign_target_identifier(c, "n").unwrap(), "n$2");
}

#[test]
fn shadowed_block_local_is_renamed_within_its_function() {
    let mut tree = ScopeTree::new();
    let f = function(&mut tree);
    let block = tree.push_scope(f, ScopeKind::Block).unwrap();
    let outer = tree.add(f, Variable::argument("x")).unwrap();
    let inner = tree.add(block, Variable::local("x")).unwrap();

    allocate_target_identifiers(&mut tree).unwrap();
    assert_eq!(tree.target_identifier(outer).unwrap(), "x");
    assert_eq!(tree.target_identifier(inner).unwrap(), "x$1");
}

#[test]
fn separate_functions_reuse_the_same_names() {
    let mut tree = ScopeTree::new();
    let f = function(&mut tree);
    let g = function(&mut tree);
    let a = tree.add(f, Variable::local("i")).unwrap();
    let b = tree.add(g, Variable::local("i")).unwrap();

    allocate_target_identifiers(&mut tree).unwrap();
    assert_eq!(tree.target_identifier(a).unwrap(), "i");
    assert_eq!(tree.target_identifier(b).unwrap(), "i");
}

#[test]
fn assigning_twice_is_an_internal_error() {
    let mut tree = ScopeTree::new();
    let f = function(&mut tree);
    let x = tree.add(f, Variable::local("x")).unwrap();
    tree.assign_target_identifier(x, "x").unwrap();
    let err = tree.assign_target_identifier(x, "x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IdentifierAlreadyAssigned);
    assert!(err.kind().is_internal());

    let alias = tree.add(f, LinkedVariable::new("y", x)).unwrap();
    let err = tree.assign_target_identifier(alias, "y").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IdentifierAlreadyAssigned);
}

#[test]
fn preassigned_targets_are_reserved_for_their_function() {
    let mut tree = ScopeTree::new();
    let f = function(&mut tree);
    tree.add(f, Variable::argument("first").with_target("value")).unwrap();
    let later = tree.add(f, Variable::local("value")).unwrap();

    allocate_target_identifiers(&mut tree).unwrap();
    assert_eq!(tree.target_identifier(later).unwrap(), "value$1");
}

#[test]
fn anonymous_and_desired_names() {
    let mut tree = ScopeTree::new();
    let f = function(&mut tree);
    let first = tree
        .add(f, Variable::new(None, StorageClass::Local, AccessClass::Direct))
        .unwrap();
    let second = tree
        .add(f, Variable::new(None, StorageClass::Local, AccessClass::Direct))
        .unwrap();
    let wished = tree.add(f, Variable::local("count").with_desired_target("n")).unwrap();

    allocate_target_identifiers(&mut tree).unwrap();
    assert_eq!(tree.target_identifier(first).unwrap(), "$tmp");
    assert_eq!(tree.target_identifier(second).unwrap(), "$tmp$1");
    assert_eq!(tree.target_identifier(wished).unwrap(), "n");
}

#[test]
fn reserved_words_and_envelope_names_are_avoided() {
    let mut tree = ScopeTree::new();
    let f = function(&mut tree);
    let a = tree.add(f, Variable::local("function")).unwrap();
    let b = tree.add(f, Variable::argument("require")).unwrap();

    allocate_target_identifiers(&mut tree).unwrap();
    assert_eq!(tree.target_identifier(a).unwrap(), "function$1");
    assert_eq!(tree.target_identifier(b).unwrap(), "require$1");
}

#[test]
fn namespaced_bindings_keep_their_own_name() {
    let mut tree = ScopeTree::new();
    let f = function(&mut tree);
    let field = tree
        .add(f, Variable::new(Some("new".to_string()), StorageClass::Namespaced, AccessClass::Member).with_container("this"))
        .unwrap();
    allocate_target_identifiers(&mut tree).unwrap();
    assert_eq!(tree.target_identifier(field).unwrap(), "new");
}

#[test]
fn allocation_is_deterministic() {
    let build = || {
        let mut tree = ScopeTree::new();
        let f = function(&mut tree);
        let block = tree.push_scope(f, ScopeKind::Block).unwrap();
        for name in ["a", "b", "a$1"] {
            tree.add(f, Variable::local(name)).unwrap();
        }
        tree.add(block, Variable::local("a")).unwrap();
        allocate_target_identifiers(&mut tree).unwrap();
        (0..tree.binding_count())
            .map(|i| tree.target_identifier(angl_core::scope::BindingId(i)).unwrap().to_string())
            .collect::<Vec<_>>()
    };
    let first = build();
    assert_eq!(first, vec!["a", "b", "a$1", "a$2"]);
    assert_eq!(first, build());
}
