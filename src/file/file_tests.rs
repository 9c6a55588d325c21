//! Tests for the file adapter.

use std::io::Write;

use tempfile::NamedTempFile;

use super::*;
use crate::configurable;
use crate::value::{RawMap, RawValue};

#[derive(Debug, PartialEq)]
struct Yi {
    foo: String,
    fii: String,
    fuu: String,
}

impl Default for Yi {
    fn default() -> Self {
        Self {
            foo: "foo".to_string(),
            fii: "fii".to_string(),
            fuu: String::new(),
        }
    }
}

configurable!(Yi { foo, fii, fuu });

#[derive(Debug, Default, PartialEq)]
struct Yo {
    foo: String,
    fii: String,
    fuu: String,
    yi: Option<Yi>,
}

configurable!(Yo { foo, fii, fuu, yi });

#[derive(Debug, Default, PartialEq)]
struct WithMeta {
    name: String,
    meta: RawMap,
}

configurable!(WithMeta { name, meta });

fn seeded() -> Yo {
    Yo {
        fuu: "test".to_string(),
        ..Yo::default()
    }
}

fn expected_yo() -> Yo {
    Yo {
        foo: "bar".to_string(),
        fii: "bir".to_string(),
        fuu: "test".to_string(),
        yi: Some(Yi::default()),
    }
}

fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("cfgtree-")
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn decode_str<T: Configurable + Default>(content: &str, format: FileFormat) -> T {
    let mut target = T::default();
    decode_content(content, format, &mut target, &DecodeOptions::default()).unwrap();
    target
}

/// `meta.aaa = [{ bbb = 1 }]` with native integers.
fn expected_meta() -> RawMap {
    let item: RawMap = vec![("bbb", RawValue::Int(1))].into_iter().collect();
    vec![("aaa", RawValue::Sequence(vec![RawValue::Mapping(item)]))]
        .into_iter()
        .collect()
}

mod formats {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detected_from_extension() {
        assert_eq!(FileFormat::from_extension(".toml"), Some(FileFormat::Toml));
        assert_eq!(FileFormat::from_extension("YML"), Some(FileFormat::Yaml));
        assert_eq!(FileFormat::from_extension("json"), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_extension("ini"), None);
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let result = FileFormat::from_path(&PathBuf::from("config.ini"));

        assert!(matches!(result, Err(ConfigError::UnsupportedFormat { .. })));
    }

    #[test]
    fn blank_content_is_empty_document() {
        for format in [FileFormat::Toml, FileFormat::Yaml, FileFormat::Json] {
            let document = format.parse("  \n", "test").unwrap();
            assert_eq!(document, RawValue::Mapping(RawMap::new()));
        }
    }

    #[test]
    fn syntax_error_is_malformed_source() {
        let result = FileFormat::Toml.parse("foo = ", "file 'a.toml'");

        match result {
            Err(ConfigError::MalformedSource { source_name, .. }) => {
                assert_eq!(source_name, "TOML file 'a.toml'");
            }
            other => panic!("expected malformed source, got {other:?}"),
        }
    }

    #[test]
    fn keys_keep_document_order() {
        let document = FileFormat::Json
            .parse(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#, "test")
            .unwrap();

        let keys: Vec<_> = document.as_mapping().unwrap().iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }
}

mod decoding {
    use super::*;

    #[test]
    fn toml_file() {
        let file = temp_file(".toml", "foo = \"bar\"\nfii = \"bir\"\n[yi]\n");
        let mut element = seeded();

        let found = decode_file(file.path(), &mut element, &DecodeOptions::default()).unwrap();

        assert!(found);
        assert_eq!(element, expected_yo());
    }

    #[test]
    fn yaml_file() {
        let file = temp_file(".yaml", "foo: bar\nfii: bir\nyi: {}\n");
        let mut element = seeded();

        decode_file(file.path(), &mut element, &DecodeOptions::default()).unwrap();

        assert_eq!(element, expected_yo());
    }

    #[test]
    fn toml_content() {
        let mut element = seeded();

        decode_content(
            "foo = \"bar\"\nfii = \"bir\"\n[yi]\n",
            FileFormat::Toml,
            &mut element,
            &DecodeOptions::default(),
        )
        .unwrap();

        assert_eq!(element, expected_yo());
    }

    #[test]
    fn json_content() {
        let mut element = seeded();

        decode_content(
            r#"{ "foo": "bar", "fii": "bir", "yi": {} }"#,
            FileFormat::Json,
            &mut element,
            &DecodeOptions::default(),
        )
        .unwrap();

        assert_eq!(element, expected_yo());
    }

    #[test]
    fn empty_file_reports_absent_and_keeps_target() {
        let file = temp_file(".toml", "");
        let mut element = seeded();

        let found = decode_file(file.path(), &mut element, &DecodeOptions::default()).unwrap();

        assert!(!found);
        assert_eq!(element, seeded());
    }

    #[test]
    fn missing_file_is_source_io() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let mut element = Yo::default();

        let result = decode_file(&path, &mut element, &DecodeOptions::default());

        assert!(matches!(result, Err(ConfigError::SourceIo { .. })));
    }

    #[test]
    fn decode_error_names_the_field() {
        let mut element = Yo::default();

        let result = decode_content(
            "[foo]\nbar = 1\n",
            FileFormat::Toml,
            &mut element,
            &DecodeOptions::default(),
        );

        assert!(matches!(
            result,
            Err(ConfigError::StructuralMismatch { ref path, .. }) if path == "foo"
        ));
    }
}

mod raw_values {
    use super::*;

    #[test]
    fn toml_keeps_native_types() {
        let element: WithMeta = decode_str("name = \"test\"\n[[meta.aaa]]\n  bbb = 1\n", FileFormat::Toml);

        assert_eq!(element.name, "test");
        assert_eq!(element.meta, expected_meta());
    }

    #[test]
    fn yaml_keeps_native_types() {
        let element: WithMeta = decode_str("name: test\nmeta:\n  aaa:\n  - bbb: 1\n", FileFormat::Yaml);

        assert_eq!(element.meta, expected_meta());
    }

    #[test]
    fn json_keeps_native_types() {
        let element: WithMeta = decode_str(
            r#"{"name": "test", "meta": {"aaa": [{"bbb": 1}]}}"#,
            FileFormat::Json,
        );

        assert_eq!(element.meta, expected_meta());
    }

    #[test]
    fn yaml_null_key_is_dropped() {
        let content = "name: test\nmeta:\n  aaa:\n  - bbb: 1\n  bbb: {\"foo\": \"bar\"}\n  null: {\"toto\": \"tata\"}\n";

        let element: WithMeta = decode_str(content, FileFormat::Yaml);

        let mut expected = expected_meta();
        expected.insert(
            "bbb",
            RawValue::Mapping(vec![("foo", RawValue::from("bar"))].into_iter().collect()),
        );
        assert_eq!(element.meta, expected);
    }

    #[derive(Debug, Default, PartialEq)]
    struct WithRaw {
        raw: RawValue,
    }

    configurable!(WithRaw { raw });

    fn status_pages() -> RawMap {
        vec![("404", RawValue::from("nf")), ("500", RawValue::from("err"))]
            .into_iter()
            .collect()
    }

    #[test]
    fn numeric_keys_stay_keys_in_raw_map() {
        let file = temp_file(".toml", "name = \"test\"\n[meta]\n\"404\" = \"nf\"\n\"500\" = \"err\"\n");
        let mut element = WithMeta::default();

        let found = decode_file(file.path(), &mut element, &DecodeOptions::default()).unwrap();

        assert!(found);
        assert_eq!(element.meta, status_pages());
    }

    #[test]
    fn numeric_keys_stay_keys_in_raw_value() {
        let file = temp_file(".json", r#"{"raw": {"404": "nf", "500": "err"}}"#);
        let mut element = WithRaw::default();

        decode_file(file.path(), &mut element, &DecodeOptions::default()).unwrap();

        assert_eq!(element.raw, RawValue::Mapping(status_pages()));
    }

    #[test]
    fn numeric_keys_survive_rendering() {
        let element: WithMeta = decode_str("meta:\n  \"404\": nf\n  \"500\": err\n", FileFormat::Yaml);
        let node = crate::codec::encode(&element, &crate::codec::EncodeOptions::default());

        let content = FileFormat::Json.render(&node).unwrap();
        let decoded: WithMeta = decode_str(&content, FileFormat::Json);

        assert_eq!(decoded.meta, status_pages());
    }
}

mod rendering {
    use super::*;
    use crate::codec::{EncodeOptions, encode};

    #[test]
    fn rendered_documents_decode_back() {
        let value = Yo {
            yi: Some(Yi {
                fuu: "x".to_string(),
                ..Yi::default()
            }),
            ..expected_yo()
        };
        let node = encode(&value, &EncodeOptions::default());

        for format in [FileFormat::Toml, FileFormat::Yaml, FileFormat::Json] {
            let content = format.render(&node).unwrap();
            let decoded: Yo = decode_str(&content, format);
            assert_eq!(decoded, value, "format {format}");
        }
    }

    #[derive(Debug, Default, PartialEq)]
    struct Plain {
        label: String,
    }

    configurable!(Plain { label });

    #[derive(Debug, Default, PartialEq)]
    struct Holder {
        section: Option<Plain>,
    }

    configurable!(Holder { section });

    #[test]
    fn enabled_empty_section_renders_as_empty_table() {
        let value = Holder {
            section: Some(Plain::default()),
        };
        let node = encode(&value, &EncodeOptions::default().with_sparse(true));

        let content = FileFormat::Json.render(&node).unwrap();
        assert!(content.contains(r#""section": {}"#), "{content}");

        let decoded: Holder = decode_str(&content, FileFormat::Json);
        assert_eq!(decoded, value);
    }
}

mod finder {
    use super::*;
    use std::fs;

    #[test]
    fn first_existing_candidate_wins() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("config");
        fs::write(dir.path().join("config.yml"), "foo: bar\n").unwrap();
        fs::write(dir.path().join("config.yaml"), "foo: baz\n").unwrap();
        let finder = Finder::new(vec![base.display().to_string()]);

        let found = finder.find(None).unwrap().unwrap();

        assert_eq!(found, dir.path().join("config.yaml"));
    }

    #[test]
    fn nothing_found_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let finder = Finder::new(vec![dir.path().join("nope").display().to_string()]);

        assert_eq!(finder.find(None).unwrap(), None);
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let finder = Finder::default();

        let result = finder.find(Some(&missing.display().to_string()));

        assert!(matches!(result, Err(ConfigError::SourceIo { .. })));
    }

    #[test]
    fn explicit_path_skips_candidates() {
        let file = temp_file(".json", "{}");
        let finder = Finder::new(vec!["/nonexistent/config".to_string()]);

        let found = finder.find(Some(&file.path().display().to_string())).unwrap();

        assert_eq!(found.as_deref(), Some(file.path()));
    }

    #[test]
    fn candidates_follow_base_then_extension_order() {
        let finder = Finder::new(vec!["a".to_string(), "b".to_string()])
            .with_extensions(vec!["toml".to_string(), ".json".to_string()]);

        let candidates: Vec<_> = finder
            .candidates()
            .iter()
            .map(|p| p.display().to_string())
            .collect();

        assert_eq!(candidates, vec!["a.toml", "a.json", "b.toml", "b.json"]);
    }

    #[test]
    fn tilde_expands_to_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let finder = Finder::new(vec!["~/app".to_string()]).with_extensions(vec!["toml".to_string()]);

        assert_eq!(finder.candidates(), vec![home.join("app.toml")]);
    }
}
