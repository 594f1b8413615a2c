use crate::cli::{
    Cli, CyclesArg, DotRankDirArg, DotThemeArg, ExtractorArg, OnErrorArg, OutputFormat, QueryMode,
};
use crate::errors::DependencyGraphError;
use crate::extract::ExtractorKind;
use crate::graph::{BuildOptions, DependencyGraph, ErrorPolicy};
use crate::query::{render_path, CyclePolicy, DependencyPathQuery, DependencyTreeQuery, Query};
use crate::utils::config::{self, Config};
use crate::visualization::{DotGenerator, DotOptions, DotTheme, RankDir};
use clap::CommandFactory;
use clap_complete::generate;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit code for usage and configuration problems.
pub const EXIT_USAGE: i32 = 2;
/// Exit code for scan failures.
pub const EXIT_FAILURE: i32 = 1;

/// Effective settings after merging CLI flags over the optional config file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub extractor: ExtractorKind,
    pub readelf: Option<PathBuf>,
    pub build: BuildOptions,
    pub cycles: CyclePolicy,
    pub format: OutputFormat,
    pub dot: DotOptions,
}

impl Settings {
    /// Resolve settings: explicit flag, then config value, then built-in default.
    ///
    /// # Errors
    /// Returns `DependencyGraphError::Config` if the config file is unreadable or holds an unknown value.
    pub fn resolve(cli: &Cli) -> Result<Self, DependencyGraphError> {
        let cfg = match &cli.config {
            Some(path) => config::load_config_at(path)?,
            None => Config::default(),
        };
        let scan = cfg.scan.unwrap_or_default();
        let query = cfg.query.unwrap_or_default();
        let dot = cfg.dot.unwrap_or_default();

        let extractor = match (cli.extractor, scan.extractor.as_deref()) {
            (Some(ExtractorArg::Native), _) | (None, None | Some("native")) => {
                ExtractorKind::Native
            }
            (Some(ExtractorArg::Readelf), _) | (None, Some("readelf")) => ExtractorKind::Readelf,
            (None, Some(other)) => return Err(invalid("scan.extractor", other)),
        };
        let on_error = match (cli.on_error, scan.on_error.as_deref()) {
            (Some(OnErrorArg::Abort), _) | (None, None | Some("abort")) => ErrorPolicy::Abort,
            (Some(OnErrorArg::Skip), _) | (None, Some("skip")) => ErrorPolicy::Skip,
            (None, Some(other)) => return Err(invalid("scan.on_error", other)),
        };
        let cycles = match (cli.cycles, query.cycles.as_deref()) {
            (Some(CyclesArg::Mark), _) | (None, None | Some("mark")) => CyclePolicy::Mark,
            (Some(CyclesArg::Elide), _) | (None, Some("elide")) => CyclePolicy::Elide,
            (None, Some(other)) => return Err(invalid("query.cycles", other)),
        };
        let format = match (cli.format, query.default_format.as_deref()) {
            (Some(f), _) => f,
            (None, None | Some("text")) => OutputFormat::Text,
            (None, Some("json")) => OutputFormat::Json,
            (None, Some(other)) => return Err(invalid("query.default_format", other)),
        };
        let theme = match (cli.dot_theme, dot.theme.as_deref()) {
            (Some(DotThemeArg::Light), _) | (None, None | Some("light")) => DotTheme::Light,
            (Some(DotThemeArg::Dark), _) | (None, Some("dark")) => DotTheme::Dark,
            (None, Some(other)) => return Err(invalid("dot.theme", other)),
        };
        let rankdir = match (cli.dot_rankdir, dot.rankdir.as_deref()) {
            (Some(DotRankDirArg::LR), _) | (None, None | Some("LR")) => RankDir::LR,
            (Some(DotRankDirArg::TB), _) | (None, Some("TB")) => RankDir::TB,
            (None, Some(other)) => return Err(invalid("dot.rankdir", other)),
        };

        let mut build = BuildOptions { on_error, ..BuildOptions::default() };
        if let Some(suffix) = cli.suffix.clone().or(scan.suffix) {
            build.suffix = suffix;
        }

        Ok(Self {
            extractor,
            readelf: cli.readelf.clone().or(scan.readelf),
            build,
            cycles,
            format,
            dot: DotOptions { theme, rankdir },
        })
    }
}

fn invalid(key: &str, value: &str) -> DependencyGraphError {
    DependencyGraphError::Config(format!("unknown value '{value}' for {key}"))
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the flag-derived level.
pub fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn usage_error(message: &str) -> i32 {
    let usage = Cli::command().render_usage();
    eprintln!("error: {message}\n\n{usage}\n\nFor more information, try '--help'.");
    EXIT_USAGE
}

#[derive(Serialize)]
struct PathOutput<'a> {
    depender: &'a str,
    dependee: &'a str,
    path: Option<&'a [String]>,
}

/// Run the CLI logic in-process.
///
/// Returns an exit code (0 = success, including "no path found").
#[must_use]
pub fn run_cli(cli: Cli) -> i32 {
    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let bin_name = env!("CARGO_PKG_NAME");
        generate(shell, &mut cmd, bin_name, &mut io::stdout());
        return 0;
    }

    let Some(search_path) = cli.search_path.clone() else {
        return usage_error("--search-path <DIR> is required");
    };
    let mode = match cli.query_mode() {
        Ok(m) => m,
        Err(msg) => return usage_error(&msg),
    };
    let settings = match Settings::resolve(&cli) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            return EXIT_USAGE;
        }
    };
    debug!(?settings, "resolved settings");

    let extractor = settings.extractor.into_extractor(settings.readelf.clone());
    let graph = match DependencyGraph::build_from_directory_with_opts(
        &search_path,
        &*extractor,
        &settings.build,
    ) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Build failed: {e}");
            return EXIT_FAILURE;
        }
    };

    if let Some(save_path) = &cli.save {
        if let Err(e) = graph.save_json(save_path) {
            eprintln!("Failed to save graph JSON {}: {e}", save_path.display());
        }
    }
    if let Some(dot_path) = &cli.dot {
        let content = DotGenerator::new().generate_dot_with_options(&graph, settings.dot);
        if let Err(e) = fs::write(dot_path, content) {
            eprintln!("Failed to write DOT output {}: {e}", dot_path.display());
        }
    }

    match mode {
        QueryMode::Tree { root } => {
            let tree = DependencyTreeQuery::new(&root).with_cycles(settings.cycles).run(&graph);
            if matches!(settings.format, OutputFormat::Json) {
                match serde_json::to_string_pretty(&tree) {
                    Ok(s) => println!("{s}"),
                    Err(e) => {
                        eprintln!("JSON encode error: {e}");
                        return EXIT_FAILURE;
                    }
                }
            } else {
                print!("{}", tree.render_text());
            }
        }
        QueryMode::Path { depender, dependee } => {
            let result = DependencyPathQuery::new(&depender, &dependee).run(&graph);
            if matches!(settings.format, OutputFormat::Json) {
                let out = PathOutput {
                    depender: &depender,
                    dependee: &dependee,
                    path: result.as_deref(),
                };
                match serde_json::to_string_pretty(&out) {
                    Ok(s) => println!("{s}"),
                    Err(e) => {
                        eprintln!("JSON encode error: {e}");
                        return EXIT_FAILURE;
                    }
                }
            } else {
                match result {
                    Some(path) => println!("{}", render_path(&path)),
                    None => println!("No dependency path found from {depender} to {dependee}"),
                }
            }
        }
    }
    0
}
