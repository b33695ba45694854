/*!
 * Configuration handling for promptpack
 */

use std::path::{Path, PathBuf};

use clap::Parser;
use clap_complete::Shell;

use crate::error::Result;
use crate::{bail, ensure};

/// Default name of the aggregate output artifact
pub const DEFAULT_OUTPUT: &str = "prompt.txt";

/// Command-line arguments for promptpack
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "promptpack",
    version = env!("CARGO_PKG_VERSION"),
    about = "Concatenate project text files into a single annotated prompt file for LLM context",
    long_about = "Aggregates selected text files from a project tree into one output file with \
per-file path markers, optionally wrapped in an LLM instruction envelope. The inverse --apply \
mode reads a <Modification> block from the clipboard and applies the file operations it contains."
)]
pub struct Args {
    /// Target: directory, glob pattern, comma-separated file list, or single file name.
    /// When omitted, every eligible file under the working directory is aggregated.
    pub target: Option<String>,

    /// Output file name
    #[clap(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Comma-separated list of path substrings to suppress
    #[clap(long, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Comma-separated list of basenames to exclude
    #[clap(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Only include files under this directory prefix
    #[clap(long)]
    pub include: Option<String>,

    /// Comma-separated list of extensions to include (if specified, only matching files are included)
    #[clap(long = "include-ext", value_delimiter = ',')]
    pub include_ext: Vec<String>,

    /// Comma-separated list of extensions to exclude
    #[clap(long = "exclude-ext", value_delimiter = ',')]
    pub exclude_ext: Vec<String>,

    /// Wrap output in the LLM instruction envelope, with optional free-text instructions
    #[clap(long, num_args = 0..=1, default_missing_value = "")]
    pub llm: Option<String>,

    /// Copy the rendered output to the system clipboard
    #[clap(long, help = "Copy output to system clipboard")]
    pub clip: bool,

    /// Apply a <Modification> block read from the clipboard instead of aggregating
    #[clap(long)]
    pub apply: bool,

    /// Restrict candidates to version-control-tracked files (fatal outside a repository)
    #[clap(long)]
    pub tracked: bool,

    /// Respect .gitignore files (default: true)
    #[clap(long, default_value = "true")]
    pub respect_gitignore: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// How the positional target argument selects the candidate universe.
///
/// Exactly one variant governs per invocation; `List`, `Glob` and `Name`
/// replace the rule-filtered traversal entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// No target: every eligible file under the scan root
    All,
    /// Target is an existing directory: recursion root moves there
    Dir(PathBuf),
    /// Comma-separated literal names, each resolved by recursive search
    List(Vec<String>),
    /// Shell glob matched against basenames, searched recursively
    Glob(String),
    /// Single name located by recursive first-match search
    Name(String),
}

impl Target {
    /// Classify the raw positional argument into a selection mode
    pub fn classify(raw: Option<&str>) -> Self {
        let raw = match raw {
            Some(r) if !r.is_empty() => r,
            _ => return Self::All,
        };

        if Path::new(raw).is_dir() {
            return Self::Dir(PathBuf::from(raw));
        }

        if raw.contains(',') {
            let names = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            return Self::List(names);
        }

        if raw.contains(['*', '?', '[']) {
            return Self::Glob(raw.to_string());
        }

        Self::Name(raw.to_string())
    }
}

/// Application configuration, built once at invocation start and threaded
/// as a parameter through the pipeline. No process-wide mutable state.
#[derive(Clone, Debug)]
pub struct Config {
    /// Root directory the scan is bounded by
    pub scan_root: PathBuf,

    /// Selection mode derived from the positional target
    pub target: Target,

    /// Output file path
    pub output_file: PathBuf,

    /// Path substrings to suppress
    pub ignore_substrings: Vec<String>,

    /// Basenames to exclude (on top of the defaults)
    pub exclude_basenames: Vec<String>,

    /// Directory prefix files must live under, if any
    pub include_dir: Option<String>,

    /// Extensions to include (if empty, include all)
    pub include_exts: Vec<String>,

    /// Extensions to exclude
    pub exclude_exts: Vec<String>,

    /// LLM envelope instructions; `Some` switches to envelope rendering
    pub llm_instructions: Option<String>,

    /// Copy rendered output to clipboard
    pub clip: bool,

    /// Run in apply mode
    pub apply: bool,

    /// Restrict candidates to version-control-tracked files
    pub tracked: bool,

    /// Whether to respect .gitignore files
    pub respect_gitignore: bool,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        let target = Target::classify(args.target.as_deref());

        let scan_root = match &target {
            Target::Dir(dir) => dir.clone(),
            _ => PathBuf::from("."),
        };

        Self {
            scan_root,
            target,
            output_file: PathBuf::from(args.output),
            ignore_substrings: args.ignore,
            exclude_basenames: args.exclude,
            include_dir: args.include,
            include_exts: args.include_ext,
            exclude_exts: args.exclude_ext,
            llm_instructions: args.llm,
            clip: args.clip,
            apply: args.apply,
            tracked: args.tracked,
            respect_gitignore: args.respect_gitignore,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.scan_root.exists() && self.scan_root.is_dir(),
            Config,
            "Target directory not found: {}",
            self.scan_root.display()
        );

        // Check if output file directory exists and is writable
        if let Some(parent) = self.output_file.parent() {
            if !parent.exists() && parent != Path::new("") {
                bail!(
                    Config,
                    "Output directory not found: {}",
                    parent.display()
                );
            }
        }

        if self.apply && self.clip {
            bail!(Config, "--clip has no effect in --apply mode");
        }

        Ok(())
    }
}
