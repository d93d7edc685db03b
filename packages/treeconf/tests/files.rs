use std::fs;

use tempfile::TempDir;
use treeconf::{
    path, Codec, ConfigEndpoint, DocumentError, EndpointConfig, Error, Format, ImportOptions,
    MultiCodec, SerializeOptions, MEMORY,
};

const SEED: &str = "\
app:
  name: demo
  port: 8080
  debug: false
  motd:
    - hello
    - lang: en
";

fn memory_endpoint() -> ConfigEndpoint {
    ConfigEndpoint::connect(&EndpointConfig::for_backend(MEMORY)).unwrap()
}

fn seeded(dir: &TempDir) -> ConfigEndpoint {
    let seed = dir.path().join("seed.yaml");
    fs::write(&seed, SEED).unwrap();
    let mut endpoint = memory_endpoint();
    endpoint
        .import_from_file(&seed, None, &ImportOptions::default())
        .unwrap();
    endpoint
}

fn sorted() -> SerializeOptions {
    SerializeOptions {
        sort_keys: true,
        ..SerializeOptions::default()
    }
}

#[test]
fn yaml_seed_imports_as_nodes() {
    let dir = TempDir::new().unwrap();
    let mut endpoint = seeded(&dir);

    let value = |endpoint: &mut ConfigEndpoint, p: &str| {
        let (bytes, _) = endpoint.get(&treeconf::Path::parse(p).unwrap(), None).unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    };
    assert_eq!(value(&mut endpoint, "/app"), "");
    assert_eq!(value(&mut endpoint, "/app/name"), "demo");
    assert_eq!(value(&mut endpoint, "/app/port"), "8080");
    assert_eq!(value(&mut endpoint, "/app/debug"), "");
    assert_eq!(value(&mut endpoint, "/app/motd"), "hello");
    assert_eq!(value(&mut endpoint, "/app/motd/lang"), "en");
}

#[test]
fn json_snapshot_text() {
    let dir = TempDir::new().unwrap();
    let mut endpoint = seeded(&dir);

    let out = dir.path().join("snapshot.json");
    assert!(endpoint
        .export_to_file(&out, None, &path!("/app"), &sorted())
        .unwrap());
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        concat!(
            r#"{"app":{"debug":"","motd":["hello",{"lang":"en"}],"#,
            r#""name":"demo","port":"8080"}}"#,
            "\n"
        )
    );
}

#[test]
fn yaml_snapshot_reimports_to_same_tree() {
    let dir = TempDir::new().unwrap();
    let mut endpoint = seeded(&dir);

    let out = dir.path().join("snapshot.yml");
    assert!(endpoint
        .export_to_file(&out, None, &path!("/app"), &sorted())
        .unwrap());

    let mut copy = memory_endpoint();
    copy.import_from_file(&out, None, &ImportOptions::default())
        .unwrap();
    assert_eq!(
        copy.export_document(&path!("/app")),
        endpoint.export_document(&path!("/app"))
    );
}

#[test]
fn explicit_format_overrides_extension() {
    let dir = TempDir::new().unwrap();
    let mut endpoint = seeded(&dir);

    let out = dir.path().join("snapshot.txt");
    assert!(endpoint
        .export_to_file(&out, Some(Format::Json), &path!("/app/name"), &sorted())
        .unwrap());
    assert_eq!(fs::read_to_string(&out).unwrap(), "{\"name\":\"demo\"}\n");
}

#[test]
fn pretty_json_is_decodable() {
    let dir = TempDir::new().unwrap();
    let mut endpoint = seeded(&dir);

    let out = dir.path().join("snapshot.json");
    let options = SerializeOptions {
        indent: Some(4),
        ..sorted()
    };
    assert!(endpoint
        .export_to_file(&out, None, &path!("/app"), &options)
        .unwrap());

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("\n    \"app\": {\n"));
    let decoded = MultiCodec::default().decode(&text, Format::Json).unwrap();
    assert_eq!(Some(decoded), endpoint.export_document(&path!("/app")));
}

#[test]
fn unreadable_root_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut endpoint = memory_endpoint();

    let out = dir.path().join("missing.json");
    assert!(!endpoint
        .export_to_file(&out, None, &path!("/missing"), &sorted())
        .unwrap());
    assert!(!out.exists());
}

#[test]
fn non_map_document_is_rejected() {
    let dir = TempDir::new().unwrap();
    let seed = dir.path().join("list.json");
    fs::write(&seed, r#"["a", "b"]"#).unwrap();

    let err = memory_endpoint()
        .import_from_file(&seed, None, &ImportOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Document(DocumentError::InvalidDocument { .. })
    ));
}

#[test]
fn unknown_extension_needs_a_format() {
    let dir = TempDir::new().unwrap();
    let seed = dir.path().join("seed.conf");
    fs::write(&seed, r#"{"a": "1"}"#).unwrap();

    let mut endpoint = memory_endpoint();
    let err = endpoint
        .import_from_file(&seed, None, &ImportOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Document(DocumentError::UnsupportedFormat(_))
    ));

    endpoint
        .import_from_file(&seed, Some(Format::Json), &ImportOptions::default())
        .unwrap();
    assert!(endpoint.exists(&path!("/a")).unwrap());
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = memory_endpoint()
        .import_from_file(dir.path().join("nope.yaml"), None, &ImportOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn endpoint_from_config_file() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("treeconf.yaml");
    fs::write(&config_path, "backend: memory\ntimeout_secs: 2\n").unwrap();

    let config = EndpointConfig::from_file(&config_path).unwrap();
    assert_eq!(config.backend, "memory");
    assert_eq!(config.timeout_secs, 2);

    let mut endpoint = ConfigEndpoint::connect(&config).unwrap();
    assert!(endpoint.children(&path!("/")).unwrap().is_empty());
}

#[test]
fn unsupported_backend() {
    let err = ConfigEndpoint::connect(&EndpointConfig::for_backend("consul"))
        .err()
        .unwrap();
    assert!(matches!(err, Error::UnsupportedBackend { tag } if tag == "consul"));
}
