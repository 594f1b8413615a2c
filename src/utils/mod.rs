pub mod config {
    use serde::Deserialize;
    use std::fs;
    use std::path::{Path, PathBuf};

    use crate::errors::DependencyGraphError;

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct ScanConfig {
        pub suffix: Option<String>,
        pub extractor: Option<String>, // "native" | "readelf"
        pub readelf: Option<PathBuf>,
        pub on_error: Option<String>, // "abort" | "skip"
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct QueryConfig {
        pub default_format: Option<String>, // "text" | "json"
        pub cycles: Option<String>,         // "mark" | "elide"
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct DotConfig {
        pub theme: Option<String>,   // "light" | "dark"
        pub rankdir: Option<String>, // "LR" | "TB"
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    pub struct Config {
        pub scan: Option<ScanConfig>,
        pub query: Option<QueryConfig>,
        pub dot: Option<DotConfig>,
    }

    /// Load a TOML configuration file.
    ///
    /// # Errors
    /// Returns `DependencyGraphError::Config` if the file cannot be read or parsed.
    pub fn load_config_at(path: &Path) -> Result<Config, DependencyGraphError> {
        let data = fs::read_to_string(path).map_err(|e| {
            DependencyGraphError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        toml::from_str::<Config>(&data)
            .map_err(|e| DependencyGraphError::Config(format!("{}: {e}", path.display())))
    }
}

pub mod file_walker {
    use std::path::{Path, PathBuf};
    use walkdir::WalkDir;

    /// Discover shared libraries under `root` whose file name ends with `suffix`.
    ///
    /// Symlinks are not traversed as directories, but a symlink whose target is a
    /// regular file counts as a candidate (the usual `libfoo.so -> libfoo.so.1` layout).
    /// Entries come back sorted by file name within each directory.
    ///
    /// # Errors
    /// Returns the first walk error (missing root, unreadable directory).
    pub fn shared_libraries(root: &Path, suffix: &str) -> Result<Vec<PathBuf>, walkdir::Error> {
        let mut out = Vec::new();
        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = entry?;
            let ft = entry.file_type();
            let is_file = ft.is_file() || (ft.is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }
            if entry.file_name().to_str().is_some_and(|name| name.ends_with(suffix)) {
                out.push(entry.into_path());
            }
        }
        Ok(out)
    }
}
