//! Notification behaviour of the mutation operations, observed from outside.

use std::cell::RefCell;
use std::rc::Rc;

use xml_tree::{ChangeKind, Node, Phase, Tree};

/// Records `Before/After Kind: (Type sender) => snapshot` lines, where the
/// snapshot is the watched node rendered at dispatch time.
fn record(tree: &mut Tree, node: Node) -> Rc<RefCell<Vec<String>>> {
    let lines = Rc::new(RefCell::new(Vec::new()));
    for phase in [Phase::Changing, Phase::Changed] {
        let lines = Rc::clone(&lines);
        let callback = move |tree: &Tree, event: &xml_tree::ChangeEvent| {
            let label = match event.phase {
                Phase::Changing => "Before",
                Phase::Changed => "After",
            };
            lines.borrow_mut().push(format!(
                "{label} {}: ({} {}) => {}",
                event.kind,
                tree.kind(event.sender),
                tree.to_xml(event.sender),
                tree.to_xml(node)
            ));
            Ok(())
        };
        match phase {
            Phase::Changing => tree.on_changing(node, callback),
            Phase::Changed => tree.on_changed(node, callback),
        };
    }
    lines
}

fn kinds(tree: &mut Tree, node: Node) -> Rc<RefCell<Vec<(Phase, ChangeKind, Node)>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let before = Rc::clone(&log);
    tree.on_changing(node, move |_, e| {
        before.borrow_mut().push((e.phase, e.kind, e.sender));
        Ok(())
    });
    let after = Rc::clone(&log);
    tree.on_changed(node, move |_, e| {
        after.borrow_mut().push((e.phase, e.kind, e.sender));
        Ok(())
    });
    log
}

#[test]
fn element_value_scenario() {
    let mut tree = Tree::new();
    let child = tree.new_element("child").unwrap();
    let lines = record(&mut tree, child);

    tree.set_value(child, "value1").unwrap();
    tree.set_value(child, "value2").unwrap();
    tree.set_value(child, "").unwrap();

    insta::assert_snapshot!(lines.borrow().join("\n"), @r#"
    Before Add: (Text value1) => <child />
    After Add: (Text value1) => <child>value1</child>
    Before Remove: (Text value1) => <child>value1</child>
    After Remove: (Text value1) => <child />
    Before Add: (Text value2) => <child />
    After Add: (Text value2) => <child>value2</child>
    Before Remove: (Text value2) => <child>value2</child>
    After Remove: (Text value2) => <child />
    Before Value: (Element <child />) => <child />
    After Value: (Element <child></child>) => <child></child>
    "#);
}

#[test]
fn attribute_value_scenario() {
    let mut tree = Tree::new();
    let element = tree.new_element("e").unwrap();
    let log = kinds(&mut tree, element);

    tree.set_attribute_value(element, "a", Some("1")).unwrap();
    tree.set_attribute_value(element, "a", Some("2")).unwrap();
    tree.set_attribute_value(element, "a", None).unwrap();

    let seen: Vec<_> = log.borrow().iter().map(|&(p, k, _)| (p, k)).collect();
    assert_eq!(
        seen,
        vec![
            (Phase::Changing, ChangeKind::Add),
            (Phase::Changed, ChangeKind::Add),
            (Phase::Changing, ChangeKind::Value),
            (Phase::Changed, ChangeKind::Value),
            (Phase::Changing, ChangeKind::Remove),
            (Phase::Changed, ChangeKind::Remove),
        ]
    );
}

#[test]
fn replace_all_with_one_old_and_two_new_children() {
    let mut tree = Tree::new();
    let parent = tree.new_element("parent").unwrap();
    let old = tree.add_text(parent, "old").unwrap();
    let log = kinds(&mut tree, parent);
    let first = tree.new_element("first").unwrap();
    let second = tree.new_element("second").unwrap();

    tree.replace_all_children(parent, &[first, second]).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            (Phase::Changing, ChangeKind::Remove, old),
            (Phase::Changed, ChangeKind::Remove, old),
            (Phase::Changing, ChangeKind::Add, first),
            (Phase::Changed, ChangeKind::Add, first),
            (Phase::Changing, ChangeKind::Add, second),
            (Phase::Changed, ChangeKind::Add, second),
        ]
    );
}

#[test]
fn clone_on_reattach_leaves_original_in_place() {
    let mut tree = Tree::new();
    let p = tree.new_element("p").unwrap();
    let p2 = tree.new_element("p2").unwrap();
    let n = tree.new_element("n").unwrap();
    tree.set_attribute_value(n, "k", Some("v")).unwrap();
    tree.add_child(p, n).unwrap();

    for target in [p2, p] {
        let inserted = tree.attach(n, target).unwrap();
        assert_ne!(inserted, n);
        assert!(tree.deep_equal(inserted, n));
        assert_eq!(tree.parent(n), Some(p));
        assert_eq!(tree.parent(inserted), Some(target));
    }
    assert_eq!(tree.children(p).first(), Some(&n));
}

#[test]
fn clone_is_not_observed_by_original_subscribers() {
    let mut tree = Tree::new();
    let child = tree.new_element("child").unwrap();
    let lines = record(&mut tree, child);
    let copy = tree.clone_node(child);

    tree.set_value(copy, "now").unwrap();

    assert!(lines.borrow().is_empty());
    assert_eq!(tree.to_xml(copy), "<child>now</child>");
}

#[test]
fn subscribers_on_text_and_attribute_nodes() {
    let mut tree = Tree::new();
    let element = tree.new_element("e").unwrap();
    let text = tree.add_text(element, "t").unwrap();
    tree.set_attribute_value(element, "a", Some("1")).unwrap();
    let attr = tree.attribute(element, "a").unwrap();
    let text_log = kinds(&mut tree, text);
    let attr_log = kinds(&mut tree, attr);

    tree.set_value(text, "u").unwrap();
    tree.set_attribute_value(element, "a", Some("2")).unwrap();

    assert_eq!(text_log.borrow().len(), 2);
    assert!(text_log.borrow().iter().all(|&(_, k, s)| k == ChangeKind::Value && s == text));
    assert_eq!(attr_log.borrow().len(), 2);
    assert!(attr_log.borrow().iter().all(|&(_, k, s)| k == ChangeKind::Value && s == attr));
}
