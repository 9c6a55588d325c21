//! Tests for descriptors and path resolution.

use std::collections::HashMap;

use super::*;
use crate::configurable;
use crate::value::RawMap;

#[derive(Debug, Default)]
struct Limits {
    max_conns: u32,
}

configurable!(Limits { max_conns });

#[derive(Debug, Default)]
struct Http {
    read_timeout: u64,
    limits: Limits,
}

configurable!(Http {
    read_timeout: "Read timeout in seconds",
    #[flatten]
    limits,
});

#[allow(non_snake_case)]
#[derive(Debug, Default)]
struct Root {
    http: Http,
    http_proxy: String,
    tls: Option<Limits>,
    hosts: Vec<Http>,
    labels: HashMap<String, String>,
    routes: HashMap<String, Http>,
    extra: RawMap,
    debug: bool,
    Mode: String,
    mode_alt: String,
}

configurable!(Root {
    http,
    http_proxy,
    tls,
    hosts,
    labels,
    routes,
    extra,
    debug,
    Mode,
    #[rename("mode")]
    mode_alt,
});

fn root_descriptor() -> StructDescriptor {
    match Root::descriptor() {
        TypeDescriptor::Struct(descriptor) => descriptor,
        other => panic!("expected struct, got {other:?}"),
    }
}

fn segments(path: &str) -> Vec<String> {
    path.split('.').map(ToString::to_string).collect()
}

fn env_segments(name: &str) -> Vec<String> {
    name.split('_').map(ToString::to_string).collect()
}

mod descriptors {
    use super::*;

    #[test]
    fn primitives_and_containers() {
        assert!(matches!(u16::descriptor(), TypeDescriptor::Scalar(ScalarKind::Uint)));
        assert!(matches!(bool::descriptor(), TypeDescriptor::Scalar(ScalarKind::Bool)));
        assert!(matches!(Vec::<String>::descriptor(), TypeDescriptor::Slice(_)));
        assert!(matches!(
            HashMap::<String, u8>::descriptor(),
            TypeDescriptor::Map(_)
        ));
        assert!(matches!(RawMap::descriptor(), TypeDescriptor::Raw));
        assert!(matches!(
            Option::<Limits>::descriptor().pointee(),
            TypeDescriptor::Struct(_)
        ));
    }

    #[test]
    fn struct_fields_keep_declaration_order_and_options() {
        let descriptor = match Http::descriptor() {
            TypeDescriptor::Struct(descriptor) => descriptor,
            other => panic!("expected struct, got {other:?}"),
        };

        let keys: Vec<_> = descriptor.fields.iter().map(|f| f.key).collect();
        assert_eq!(keys, vec!["read_timeout", "limits"]);
        assert_eq!(descriptor.fields[0].description, "Read timeout in seconds");
        assert!(descriptor.fields[1].is_promoted());
    }

    #[test]
    fn visible_fields_replace_flattened_members() {
        let descriptor = match Http::descriptor() {
            TypeDescriptor::Struct(descriptor) => descriptor,
            other => panic!("expected struct, got {other:?}"),
        };

        let names: Vec<_> = descriptor.visible_fields().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["read_timeout", "max_conns"]);
    }

    #[test]
    fn bare_flags_apply_to_booleans_and_sections() {
        assert!(bool::descriptor().accepts_bare_flag());
        assert!(Option::<Limits>::descriptor().accepts_bare_flag());
        assert!(Option::<bool>::descriptor().accepts_bare_flag());
        assert!(!String::descriptor().accepts_bare_flag());
        assert!(!Vec::<bool>::descriptor().accepts_bare_flag());
    }
}

mod field_resolution {
    use super::*;

    #[test]
    fn exact_case_is_preferred() {
        let descriptor = root_descriptor();

        let exact = descriptor.resolve("Mode").unwrap();
        assert_eq!(exact.keys, vec!["Mode"]);
        assert!(exact.exact);

        let renamed = descriptor.resolve("mode").unwrap();
        assert_eq!(renamed.keys, vec!["mode_alt"]);

        let loose = descriptor.resolve("MODE").unwrap();
        assert!(!loose.exact);
    }

    #[test]
    fn promoted_fields_route_through_member() {
        let descriptor = match Http::descriptor() {
            TypeDescriptor::Struct(descriptor) => descriptor,
            other => panic!("expected struct, got {other:?}"),
        };

        let route = descriptor.resolve("MAX_CONNS").unwrap();

        assert_eq!(route.keys, vec!["limits", "max_conns"]);
        assert!(descriptor.resolve("limits").is_none());
    }

    #[test]
    fn unknown_name_resolves_to_nothing() {
        assert!(root_descriptor().resolve("nope").is_none());
    }
}

mod paths {
    use super::*;

    fn resolve_env(name: &str) -> Option<ResolvedPath> {
        resolve_path(&Root::descriptor(), &env_segments(name), SegmentMode::Joined('_'))
    }

    #[test]
    fn exact_mode_maps_one_segment_per_field() {
        let path = resolve_path(
            &Root::descriptor(),
            &segments("HTTP.read_timeout"),
            SegmentMode::Exact,
        )
        .unwrap();

        assert_eq!(path.segments, vec!["http", "read_timeout"]);
        assert!(matches!(path.target, TypeDescriptor::Scalar(ScalarKind::Uint)));
    }

    #[test]
    fn joined_mode_rejoins_underscored_names() {
        let path = resolve_env("http_read_timeout").unwrap();

        assert_eq!(path.segments, vec!["http", "read_timeout"]);
    }

    #[test]
    fn longest_field_name_wins() {
        let path = resolve_env("http_proxy").unwrap();

        assert_eq!(path.segments, vec!["http_proxy"]);
    }

    #[test]
    fn promoted_fields_resolve_at_parent_level() {
        let path = resolve_env("http_max_conns").unwrap();

        assert_eq!(path.segments, vec!["http", "max_conns"]);
    }

    #[test]
    fn list_items_need_an_index() {
        let path = resolve_env("hosts_0_read_timeout").unwrap();
        assert_eq!(path.segments, vec!["hosts", "0", "read_timeout"]);

        assert!(resolve_env("hosts_first_read_timeout").is_none());
    }

    #[test]
    fn map_keys_are_shortest_prefix() {
        let path = resolve_env("labels_team_name").unwrap();
        assert_eq!(path.segments, vec!["labels", "team_name"]);

        let path = resolve_env("routes_api_read_timeout").unwrap();
        assert_eq!(path.segments, vec!["routes", "api", "read_timeout"]);
    }

    #[test]
    fn raw_sections_accept_any_rest() {
        let path = resolve_env("extra_a_b").unwrap();

        assert_eq!(path.segments, vec!["extra", "a", "b"]);
        assert!(matches!(path.target, TypeDescriptor::Raw));
    }

    #[test]
    fn pointers_are_transparent() {
        let path = resolve_env("tls_max_conns").unwrap();

        assert_eq!(path.segments, vec!["tls", "max_conns"]);
    }

    #[test]
    fn scalars_have_no_children() {
        assert!(resolve_env("debug_extra").is_none());
        assert!(resolve_env("unknown").is_none());
    }
}
