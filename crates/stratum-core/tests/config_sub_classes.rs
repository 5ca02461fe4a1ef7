use pretty_assertions::assert_eq;
use stratum_core::{config::ClassConfig, ClassesConfiguration};

fn chain(edges: &[(&str, &str)]) -> ClassesConfiguration {
    let mut config = ClassesConfiguration::new();
    for (parent, child) in edges {
        let existing = config.config_for(parent).cloned().unwrap_or_default();
        config.insert(*parent, existing.subclass(*child, *child));
    }
    config
}

#[test]
fn cycle_terminates() {
    let config = chain(&[("A", "B"), ("B", "C"), ("C", "A")]);

    assert_eq!(config.get_sub_classes("A"), ["B", "C"]);
    assert_eq!(config.get_sub_classes("B"), ["C", "A"]);
}

#[test]
fn self_reference_terminates() {
    let config = chain(&[("A", "A")]);
    assert!(config.get_sub_classes("A").is_empty());
}

#[test]
fn diamond_lists_each_class_once_depth_first() {
    let config = chain(&[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")]);
    assert_eq!(config.get_sub_classes("A"), ["B", "D", "C"]);
}

#[test]
fn result_is_stable() {
    let config = chain(&[("A", "B"), ("B", "C"), ("C", "A"), ("B", "D")]);
    let first = config.get_sub_classes("A");

    for _ in 0..3 {
        assert_eq!(config.get_sub_classes("A"), first);
    }
}

#[test]
fn leaf_has_no_sub_classes() {
    let config = ClassesConfiguration::new().with("A", ClassConfig::table("a"));
    assert!(config.get_sub_classes("A").is_empty());
}
