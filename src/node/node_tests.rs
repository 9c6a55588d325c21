//! Tests for node tree construction and lookup.

use super::*;
use crate::error::ConfigError;
use crate::value::{RawMap, RawValue};

fn paths(pairs: &[(&str, &str)]) -> Node {
    from_paths("cfgtree", pairs.iter().copied()).unwrap()
}

mod flat_paths {
    use super::*;

    #[test]
    fn builds_nested_nodes_in_first_seen_order() {
        let root = paths(&[
            ("cfgtree.server.port", "8080"),
            ("cfgtree.log.level", "debug"),
            ("cfgtree.server.host", "localhost"),
        ]);

        let names: Vec<_> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["server", "log"]);

        let server = root.child("server").unwrap();
        let fields: Vec<_> = server.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(fields, vec!["port", "host"]);
        assert_eq!(server.child("port").unwrap().value.as_deref(), Some("8080"));
    }

    #[test]
    fn root_segment_is_optional_and_case_insensitive() {
        let root = paths(&[("CFGTREE.a", "1"), ("b", "2")]);

        assert_eq!(root.child("a").unwrap().value.as_deref(), Some("1"));
        assert_eq!(root.child("b").unwrap().value.as_deref(), Some("2"));
    }

    #[test]
    fn bracket_indices_become_segments() {
        let root = paths(&[("servers[0].url", "a"), ("servers[1].url", "b")]);

        let servers = root.child("servers").unwrap();
        assert!(servers.is_sequence());
        assert_eq!(servers.children[1].name, "1");
    }

    #[test]
    fn repeated_leaf_path_keeps_last_value() {
        let root = paths(&[("name", "first"), ("name", "second")]);

        assert_eq!(root.children.len(), 1);
        assert_eq!(root.child("name").unwrap().value.as_deref(), Some("second"));
    }

    #[test]
    fn descending_through_scalar_is_mismatch() {
        let result = from_paths("cfgtree", [("foo", "x"), ("foo.bar", "y")]);

        match result {
            Err(ConfigError::StructuralMismatch { path, .. }) => assert_eq!(path, "foo"),
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn assigning_value_to_subtree_is_mismatch() {
        let result = from_paths("cfgtree", [("foo.bar", "y"), ("foo", "x")]);

        assert!(matches!(
            result,
            Err(ConfigError::StructuralMismatch { ref path, .. }) if path == "foo"
        ));
    }

    #[test]
    fn enable_marker_merges_with_children() {
        let root = paths(&[("tls", "true"), ("tls.cert", "a.pem"), ("tls", "true")]);

        let tls = root.child("tls").unwrap();
        assert_eq!(tls.value, None);
        assert_eq!(tls.children.len(), 1);
    }

    #[test]
    fn no_pairs_yields_empty_tree() {
        let root = from_paths("cfgtree", Vec::<(String, String)>::new()).unwrap();
        assert!(root.is_empty());
    }
}

mod documents {
    use super::*;

    fn doc(entries: Vec<(&str, RawValue)>) -> RawValue {
        RawValue::Mapping(entries.into_iter().collect())
    }

    #[test]
    fn mirrors_mappings_and_sequences() {
        let document = doc(vec![
            ("name", RawValue::from("test")),
            (
                "items",
                RawValue::Sequence(vec![RawValue::Int(1), RawValue::Int(2)]),
            ),
        ]);

        let root = from_document("cfgtree", document).unwrap();

        let items = root.child("items").unwrap();
        assert!(items.sequence);
        assert_eq!(items.children[0].name, "0");
        assert_eq!(items.children[1].value.as_deref(), Some("2"));
        assert_eq!(items.children[1].native, Some(RawValue::Int(2)));
    }

    #[test]
    fn empty_mapping_becomes_enable_marker() {
        let root = from_document("cfgtree", doc(vec![("yi", RawValue::Mapping(RawMap::new()))]))
            .unwrap();

        let yi = root.child("yi").unwrap();
        assert_eq!(yi.value.as_deref(), Some("true"));
        assert_eq!(yi.native, Some(RawValue::Mapping(RawMap::new())));
    }

    #[test]
    fn digit_keys_of_a_mapping_are_not_a_sequence() {
        let pages = doc(vec![("404", RawValue::from("nf")), ("500", RawValue::from("err"))]);

        let root = from_document("cfgtree", doc(vec![("pages", pages)])).unwrap();

        let pages = root.child("pages").unwrap();
        assert!(pages.mapping);
        assert!(!pages.is_sequence());
        assert!(!root.is_sequence());
    }

    #[test]
    fn empty_document_yields_empty_tree() {
        let root = from_document("cfgtree", RawValue::Mapping(RawMap::new())).unwrap();
        assert!(root.is_empty());
    }

    #[test]
    fn scalar_document_is_rejected() {
        let result = from_document("cfgtree", RawValue::Int(3));
        assert!(matches!(result, Err(ConfigError::StructuralMismatch { .. })));
    }
}

mod lookup {
    use super::*;

    #[test]
    fn child_lookup_prefers_exact_case() {
        let root = Node::new("root").with_children(vec![
            Node::leaf("NAME", "upper"),
            Node::leaf("name", "lower"),
        ]);

        assert_eq!(root.child("name").unwrap().value.as_deref(), Some("lower"));
        assert_eq!(root.child("Name").unwrap().value.as_deref(), Some("upper"));
    }

    #[test]
    fn index_requires_plain_digits() {
        assert_eq!(Node::new("12").index(), Some(12));
        assert_eq!(Node::new("+1").index(), None);
        assert_eq!(Node::new("a1").index(), None);
    }

    #[test]
    fn flatten_lists_leaf_paths() {
        let root = paths(&[("server.port", "1"), ("tags.0", "a"), ("tags.1", "b")]);

        assert_eq!(
            root.flatten(),
            vec![
                ("server.port".to_string(), "1".to_string()),
                ("tags.0".to_string(), "a".to_string()),
                ("tags.1".to_string(), "b".to_string()),
            ]
        );
    }
}
