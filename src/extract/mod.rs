//! Extraction of declared runtime dependencies from a single binary.
//!
//! The graph builder only sees the [`DependencyExtractor`] trait. Two backends
//! ship with the crate:
//! - [`NativeExtractor`] parses the file in-process with `goblin`
//!   (ELF `DT_NEEDED`, Mach-O dylib load commands, PE import table).
//! - [`ReadelfExtractor`] shells out to `readelf -d` and scrapes the
//!   `(NEEDED)` lines, matching what binutils users see on the terminal.
use crate::errors::ExtractError;
use goblin::Object;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Lists the dependency names a binary declares, in declaration order.
pub trait DependencyExtractor {
    /// # Errors
    /// Returns `ExtractError` when the file cannot be read or is not an inspectable binary.
    fn declared_dependencies(&self, path: &Path) -> Result<Vec<String>, ExtractError>;
}

impl<F> DependencyExtractor for F
where
    F: Fn(&Path) -> Result<Vec<String>, ExtractError>,
{
    fn declared_dependencies(&self, path: &Path) -> Result<Vec<String>, ExtractError> {
        self(path)
    }
}

/// Backend selector used by the CLI and config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractorKind {
    #[default]
    Native,
    Readelf,
}

impl ExtractorKind {
    /// Instantiate the selected backend. `readelf` overrides the program used by
    /// the readelf backend and is ignored by the native one.
    #[must_use]
    pub fn into_extractor(self, readelf: Option<PathBuf>) -> Box<dyn DependencyExtractor> {
        match self {
            ExtractorKind::Native => Box::new(NativeExtractor::new()),
            ExtractorKind::Readelf => Box::new(match readelf {
                Some(program) => ReadelfExtractor::with_program(program),
                None => ReadelfExtractor::new(),
            }),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NativeExtractor;

impl NativeExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse an in-memory image. Split out so callers holding bytes skip the read.
    ///
    /// # Errors
    /// `Malformed` when goblin rejects the image, `UnsupportedFormat` for
    /// archives and unknown magic.
    pub fn dependencies_from_bytes(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
        let object = Object::parse(bytes).map_err(|e| ExtractError::Malformed(e.to_string()))?;
        match object {
            Object::Elf(elf) => Ok(elf.libraries.iter().map(|s| (*s).to_string()).collect()),
            Object::PE(pe) => Ok(pe.libraries.iter().map(|s| (*s).to_string()).collect()),
            Object::Mach(goblin::mach::Mach::Binary(macho)) => Ok(macho
                .libs
                .iter()
                .filter(|lib| **lib != "self")
                .map(|lib| (*lib).to_string())
                .collect()),
            Object::Mach(goblin::mach::Mach::Fat(_)) => {
                Err(ExtractError::UnsupportedFormat("fat Mach-O".to_string()))
            }
            Object::Archive(_) => Err(ExtractError::UnsupportedFormat("archive".to_string())),
            Object::Unknown(magic) => {
                Err(ExtractError::UnsupportedFormat(format!("unknown magic {magic:#x}")))
            }
            _ => Err(ExtractError::UnsupportedFormat("unrecognized object".to_string())),
        }
    }
}

impl DependencyExtractor for NativeExtractor {
    fn declared_dependencies(&self, path: &Path) -> Result<Vec<String>, ExtractError> {
        let bytes = std::fs::read(path)?;
        self.dependencies_from_bytes(&bytes)
    }
}

#[derive(Debug)]
pub struct ReadelfExtractor {
    program: PathBuf,
    needed_line: Regex,
}

impl Default for ReadelfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadelfExtractor {
    /// Use `readelf` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_program(PathBuf::from("readelf"))
    }

    #[must_use]
    pub fn with_program(program: PathBuf) -> Self {
        // Matches: 0x0000000000000001 (NEEDED)  Shared library: [libc.so.6]
        let needed_line =
            Regex::new(r"\(NEEDED\)[^\[]*\[(?P<name>[^\]]+)\]").expect("valid NEEDED pattern");
        Self { program, needed_line }
    }

    /// Pull `NEEDED` names out of `readelf -d` output, in output order.
    #[must_use]
    pub fn parse_needed(&self, output: &str) -> Vec<String> {
        output
            .lines()
            .filter_map(|line| self.needed_line.captures(line))
            .filter_map(|cap| cap.name("name").map(|m| m.as_str().to_string()))
            .collect()
    }
}

impl DependencyExtractor for ReadelfExtractor {
    fn declared_dependencies(&self, path: &Path) -> Result<Vec<String>, ExtractError> {
        let tool = self.program.display().to_string();
        let output = Command::new(&self.program)
            .arg("-d")
            .arg(path)
            .output()
            .map_err(|source| ExtractError::ToolUnavailable { tool: tool.clone(), source })?;
        if !output.status.success() {
            return Err(ExtractError::Tool {
                tool,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(self.parse_needed(&String::from_utf8_lossy(&output.stdout)))
    }
}
