//! so-dependency-explorer — shared library dependency graph
//!
//! Scan a directory tree for shared libraries, record the dependencies each one
//! declares, and query the resulting graph.
//!
//! # Features
//! - Pluggable extraction: native parsing via `goblin` (ELF `DT_NEEDED`, Mach-O, PE)
//!   or the `readelf -d` tool
//! - Queries: dependency chain between two libraries, transitive dependency tree
//! - Cycle-safe traversal; dangling (unscanned) dependencies are leaves
//! - JSON and DOT export of the built graph
//!
//! # Quickstart (Library)
//! ```no_run
//! use so_dependency_explorer::graph::DependencyGraph;
//! use so_dependency_explorer::query::{render_path, DependencyPathQuery, Query};
//!
//! let graph = DependencyGraph::build_from_directory(std::path::Path::new("/usr/lib"))
//!     .expect("build graph");
//! if let Some(path) = DependencyPathQuery::new("libgtk-3.so", "libc.so.6").run(&graph) {
//!     println!("{}", render_path(&path));
//! }
//! ```
//!
//! # Quickstart (CLI)
//! ```text
//! so-dependency-explorer --search-path ./out --depender liba.so --dependee libc.so.6
//! so-dependency-explorer --search-path ./out --show-dependence-of liba.so
//! ```
//!
//! # Unreadable binaries
//! By default one file that cannot be inspected fails the whole scan. Pass
//! `--on-error skip` to log it and continue with the rest of the tree.
pub mod app;
pub mod cli;
pub mod errors;
pub mod extract;
pub mod graph;
pub mod query;
pub mod utils;
pub mod visualization;
