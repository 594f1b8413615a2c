mod common;

use so_dependency_explorer::extract::{DependencyExtractor, ReadelfExtractor};
use so_dependency_explorer::graph::{BuildOptions, DependencyGraph, ErrorPolicy};
use std::process::Command;
use tempfile::tempdir;

fn readelf_available() -> bool {
    Command::new("readelf").arg("--version").output().is_ok_and(|o| o.status.success())
}

#[test]
fn readelf_backend_matches_fixture() {
    if !readelf_available() {
        eprintln!("readelf not installed; skipping");
        return;
    }
    let dir = tempdir().unwrap();
    common::write_library(dir.path(), "a.so", &["b.so", "libc.so.6"]);
    let deps = ReadelfExtractor::new().declared_dependencies(&dir.path().join("a.so")).unwrap();
    assert_eq!(deps, vec!["b.so", "libc.so.6"]);
}

#[test]
fn readelf_backend_builds_graph_and_rejects_text() {
    if !readelf_available() {
        eprintln!("readelf not installed; skipping");
        return;
    }
    let dir = tempdir().unwrap();
    common::chain_fixture(dir.path());
    let opts = BuildOptions { suffix: ".so".to_string(), on_error: ErrorPolicy::Abort };
    let graph =
        DependencyGraph::build_from_directory_with_opts(dir.path(), &ReadelfExtractor::new(), &opts)
            .unwrap();
    assert_eq!(graph.dependencies_of("b.so"), ["c.so".to_string()]);

    std::fs::write(dir.path().join("text.so"), "plain text").unwrap();
    assert!(ReadelfExtractor::new().declared_dependencies(&dir.path().join("text.so")).is_err());
}
