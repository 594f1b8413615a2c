use clap::{ArgAction, Parser, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "so-dependency-explorer",
    version,
    about = "Shared library dependency explorer",
    long_about = "Scan a directory for shared libraries, read the dependencies each one declares (ELF DT_NEEDED), then either find a dependency chain between two libraries or print the full dependency tree of one library."
)]
pub struct Cli {
    /// Root directory to scan for shared libraries
    #[arg(long, value_name = "DIR")]
    pub search_path: Option<PathBuf>,
    /// Library the dependency chain starts from (requires --dependee)
    #[arg(long, value_name = "NAME")]
    pub depender: Option<String>,
    /// Library the dependency chain should reach (requires --depender)
    #[arg(long, value_name = "NAME")]
    pub dependee: Option<String>,
    /// Print the transitive dependency tree of this library (takes precedence over --depender/--dependee)
    #[arg(long, value_name = "NAME")]
    pub show_dependence_of: Option<String>,
    /// Dependency extraction backend
    #[arg(long, value_enum)]
    pub extractor: Option<ExtractorArg>,
    /// readelf program used by `--extractor readelf`
    #[arg(long, value_name = "PROGRAM")]
    pub readelf: Option<PathBuf>,
    /// File name suffix identifying shared libraries (platform default when omitted)
    #[arg(long)]
    pub suffix: Option<String>,
    /// What to do when a library cannot be inspected
    #[arg(long, value_enum)]
    pub on_error: Option<OnErrorArg>,
    /// Tree display: how to show a dependency that loops back to an ancestor
    #[arg(long, value_enum)]
    pub cycles: Option<CyclesArg>,
    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Path to a TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Save the built graph as JSON
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,
    /// Write the built graph as Graphviz DOT
    #[arg(long, value_name = "FILE")]
    pub dot: Option<PathBuf>,
    /// DOT: theme (light or dark)
    #[arg(long, value_enum)]
    pub dot_theme: Option<DotThemeArg>,
    /// DOT: rank direction (LR or TB)
    #[arg(long, value_enum)]
    pub dot_rankdir: Option<DotRankDirArg>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    /// Only log errors
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
    /// Print a shell completion script and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExtractorArg {
    Native,
    Readelf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnErrorArg {
    Abort,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CyclesArg {
    Mark,
    Elide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DotThemeArg {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DotRankDirArg {
    #[value(name = "LR")]
    LR,
    #[value(name = "TB")]
    TB,
}

/// The single query an invocation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryMode {
    Path { depender: String, dependee: String },
    Tree { root: String },
}

impl Cli {
    /// Resolve which query to run. Tree display wins when both modes are given.
    ///
    /// # Errors
    /// Returns a message describing the missing arguments.
    pub fn query_mode(&self) -> Result<QueryMode, String> {
        if let Some(root) = &self.show_dependence_of {
            return Ok(QueryMode::Tree { root: root.clone() });
        }
        match (&self.depender, &self.dependee) {
            (Some(depender), Some(dependee)) => {
                Ok(QueryMode::Path { depender: depender.clone(), dependee: dependee.clone() })
            }
            (Some(_), None) => Err("--depender requires --dependee".to_string()),
            (None, Some(_)) => Err("--dependee requires --depender".to_string()),
            (None, None) => Err(
                "either --depender/--dependee or --show-dependence-of is required".to_string(),
            ),
        }
    }
}

#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
