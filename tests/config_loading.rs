use so_dependency_explorer::utils::config;
use std::fs;
use std::path::Path;

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    fs::write(path, content).unwrap();
}

#[test]
fn parses_full_config_file() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg_path = tmp.path().join("so-deps.toml");
    let data = r#"
[scan]
suffix = ".so"
extractor = "readelf"
readelf = "/usr/bin/readelf"
on_error = "skip"

[query]
default_format = "json"
cycles = "elide"

[dot]
theme = "dark"
rankdir = "TB"
"#;
    write(&cfg_path, data);

    let cfg = config::load_config_at(&cfg_path).expect("config parsed");
    let scan = cfg.scan.expect("scan section");
    assert_eq!(scan.suffix.as_deref(), Some(".so"));
    assert_eq!(scan.extractor.as_deref(), Some("readelf"));
    assert_eq!(scan.readelf.as_deref(), Some(Path::new("/usr/bin/readelf")));
    assert_eq!(scan.on_error.as_deref(), Some("skip"));
    let query = cfg.query.expect("query section");
    assert_eq!(query.default_format.as_deref(), Some("json"));
    assert_eq!(query.cycles.as_deref(), Some("elide"));
    let dot = cfg.dot.expect("dot section");
    assert_eq!(dot.theme.as_deref(), Some("dark"));
    assert_eq!(dot.rankdir.as_deref(), Some("TB"));
}

#[test]
fn empty_config_is_all_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg_path = tmp.path().join("empty.toml");
    write(&cfg_path, "");
    let cfg = config::load_config_at(&cfg_path).unwrap();
    assert!(cfg.scan.is_none());
    assert!(cfg.query.is_none());
    assert!(cfg.dot.is_none());
}

#[test]
fn missing_or_unknown_sections_are_errors() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(config::load_config_at(&tmp.path().join("absent.toml")).is_err());

    let cfg_path = tmp.path().join("typo.toml");
    write(&cfg_path, "[scna]\nsuffix = \".so\"\n");
    assert!(config::load_config_at(&cfg_path).is_err());
}
