//! Dependency graph model and builder.
//!
//! A `DependencyGraph` maps a library's file name (e.g. `libfoo.so`) to the
//! dependency names it declares. Dependency names are kept exactly as the
//! binary spells them, so they may refer to libraries that were never scanned
//! (dangling references); lookups on such names yield an empty list.
//!
//! Build one with `DependencyGraph::build_from_directory*` and pass it to the
//! queries in `crate::query`.
use crate::errors::{DependencyGraphError, ExtractError};
use crate::extract::{DependencyExtractor, NativeExtractor};
use crate::utils::file_walker;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What to do when a single binary cannot be inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Fail the whole build on the first bad file.
    #[default]
    Abort,
    /// Log a warning, record the file in `DependencyGraph::skipped`, keep going.
    Skip,
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// File name suffix identifying shared libraries.
    pub suffix: String,
    pub on_error: ErrorPolicy,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self { suffix: std::env::consts::DLL_SUFFIX.to_string(), on_error: ErrorPolicy::Abort }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LibraryNode {
    /// File the entry was extracted from.
    pub path: PathBuf,
    /// Declared dependencies, in declaration order.
    pub needed: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GraphMetadata {
    pub root: PathBuf,
    pub scanned_files: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DependencyGraph {
    pub libraries: BTreeMap<String, LibraryNode>,
    #[serde(default)]
    pub skipped: Vec<SkippedFile>,
    #[serde(default)]
    pub metadata: GraphMetadata,
}

impl DependencyGraph {
    /// Assemble a graph from `(name, needed)` pairs. Later duplicates replace earlier ones.
    pub fn from_entries<I, N, D>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, Vec<D>)>,
        N: Into<String>,
        D: Into<String>,
    {
        let libraries = entries
            .into_iter()
            .map(|(name, needed)| {
                let name = name.into();
                let node = LibraryNode {
                    path: PathBuf::from(&name),
                    needed: needed.into_iter().map(Into::into).collect(),
                };
                (name, node)
            })
            .collect();
        Self { libraries, ..Self::default() }
    }

    /// Declared dependencies of `name`; empty for names that were never scanned.
    #[must_use]
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.libraries.get(name).map_or(&[], |node| node.needed.as_slice())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.libraries.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// Dependency names that do not correspond to any scanned library, sorted and deduplicated.
    #[must_use]
    pub fn dangling(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self
            .libraries
            .values()
            .flat_map(|node| node.needed.iter())
            .filter(|dep| !self.libraries.contains_key(dep.as_str()))
            .map(String::as_str)
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Build with the native (goblin) extractor and default options.
    ///
    /// # Errors
    /// See `build_from_directory_with_opts`.
    pub fn build_from_directory(root: &Path) -> Result<Self, DependencyGraphError> {
        Self::build_from_directory_with_opts(root, &NativeExtractor::new(), &BuildOptions::default())
    }

    /// Walk `root`, run `extractor` on every shared library found and collect the results.
    ///
    /// Files whose name does not end with `opts.suffix` are ignored. Keys are
    /// file base names; when two scanned files share a base name the later one
    /// in walk order wins.
    ///
    /// # Errors
    /// Returns `DependencyGraphError::Walk` if the directory cannot be traversed, and
    /// `DependencyGraphError::Extraction` for the first unreadable binary when
    /// `opts.on_error` is `ErrorPolicy::Abort`. No partial graph is returned.
    pub fn build_from_directory_with_opts(
        root: &Path,
        extractor: &dyn DependencyExtractor,
        opts: &BuildOptions,
    ) -> Result<Self, DependencyGraphError> {
        let files = file_walker::shared_libraries(root, &opts.suffix)?;
        debug!(root = %root.display(), candidates = files.len(), "discovered shared libraries");

        let mut graph = DependencyGraph {
            metadata: GraphMetadata { root: root.to_path_buf(), scanned_files: files.len() },
            ..Self::default()
        };

        for file in files {
            let Some(name) = file.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                continue;
            };
            let needed = match extractor.declared_dependencies(&file) {
                Ok(needed) => needed,
                Err(source) => {
                    graph.handle_failure(file, source, opts.on_error)?;
                    continue;
                }
            };
            debug!(library = %name, needed = ?needed, "extracted dependencies");
            if let Some(previous) =
                graph.libraries.insert(name.clone(), LibraryNode { path: file.clone(), needed })
            {
                warn!(
                    library = %name,
                    replaced = %previous.path.display(),
                    by = %file.display(),
                    "duplicate library name; keeping the later file"
                );
            }
        }

        info!(
            libraries = graph.libraries.len(),
            skipped = graph.skipped.len(),
            "dependency graph built"
        );
        Ok(graph)
    }

    fn handle_failure(
        &mut self,
        file: PathBuf,
        source: ExtractError,
        policy: ErrorPolicy,
    ) -> Result<(), DependencyGraphError> {
        match policy {
            ErrorPolicy::Abort => Err(DependencyGraphError::Extraction { file, source }),
            ErrorPolicy::Skip => {
                warn!(file = %file.display(), error = %source, "skipping unreadable binary");
                self.skipped.push(SkippedFile { path: file, reason: source.to_string() });
                Ok(())
            }
        }
    }

    /// Save graph as pretty JSON.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save_json(&self, path: &Path) -> Result<(), DependencyGraphError> {
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Load a graph previously written by `save_json`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid graph.
    pub fn load_json(path: &Path) -> Result<Self, DependencyGraphError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}
