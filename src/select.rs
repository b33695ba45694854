/*!
 * File selection pipeline
 *
 * Resolves the candidate universe for an invocation (full traversal,
 * directory scope, explicit list, glob, or single-name lookup), applies
 * the active filter rules, and gates survivors through content and size
 * classification. Per-candidate failures are recorded as skips and never
 * abort the run.
 *
 * Traversal is depth-first with lexicographically sorted entries, so
 * selection order (and "first match" in recursive search) is stable
 * across invocations on an unchanged tree.
 */

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glob_match::glob_match;
use ignore::WalkBuilder;
use indicatif::ProgressBar;
use walkdir::WalkDir;

use crate::classify::{self, ByteSniffProbe, ContentKind, ContentProbe};
use crate::config::{Config, Target};
use crate::error::Result;
use crate::git::TrackedFileLister;
use crate::utils::{file_extension, format_file_size, normalize_path, DEFAULT_EXCLUDE};

/// A candidate that passed all filters and the text/size gate
#[derive(Debug, Clone)]
pub struct SelectedFile {
    /// Path as discovered on disk
    pub abs_path: PathBuf,
    /// Normalized path relative to the scan root, used in output framing
    pub display_path: String,
    /// Size in bytes
    pub size: u64,
}

/// Why a candidate was excluded from the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Content classified as binary
    Binary,
    /// File exceeds the inclusion size budget
    Oversized(u64),
    /// File could not be read or probed
    Unreadable(String),
    /// Requested name or pattern matched nothing
    NotFound,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => write!(f, "binary content"),
            Self::Oversized(size) => {
                write!(f, "exceeds size budget ({})", format_file_size(*size))
            }
            Self::Unreadable(e) => write!(f, "unreadable: {}", e),
            Self::NotFound => write!(f, "no match found"),
        }
    }
}

/// A candidate excluded from the output, with its reason
#[derive(Debug, Clone)]
pub struct SkippedFile {
    /// Path (or requested name, for not-found entries)
    pub path: String,
    /// Why it was excluded
    pub reason: SkipReason,
}

/// Result of a selection run
#[derive(Debug, Default)]
pub struct Selection {
    /// Files to aggregate, in traversal order
    pub files: Vec<SelectedFile>,
    /// Excluded candidates with reasons
    pub skipped: Vec<SkippedFile>,
}

/// Selection engine for one invocation
pub struct SelectionEngine {
    /// Engine configuration
    config: Config,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
    /// Content-type probe
    probe: Box<dyn ContentProbe>,
    /// Tracked-file lister, present in `--tracked` mode
    lister: Option<Box<dyn TrackedFileLister>>,
}

impl SelectionEngine {
    /// Create a new selection engine with the default content probe
    pub fn new(config: Config, progress: Arc<ProgressBar>) -> Self {
        Self {
            config,
            progress,
            probe: Box::new(ByteSniffProbe),
            lister: None,
        }
    }

    /// Replace the content probe (used by tests)
    pub fn with_probe(mut self, probe: Box<dyn ContentProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Attach a tracked-file lister for `--tracked` mode
    pub fn with_lister(mut self, lister: Box<dyn TrackedFileLister>) -> Self {
        self.lister = Some(lister);
        self
    }

    /// Run selection and return the ordered file set plus skip records
    pub fn select(&self) -> Result<Selection> {
        let mut selection = Selection::default();

        match self.config.target.clone() {
            Target::All | Target::Dir(_) => self.select_walk(&mut selection)?,
            Target::List(names) => self.select_list(&names, &mut selection)?,
            Target::Glob(pattern) => self.select_glob(&pattern, &mut selection)?,
            Target::Name(name) => self.select_list(&[name], &mut selection)?,
        }

        Ok(selection)
    }

    /// Count candidates for progress tracking, without reading contents
    pub fn count_candidates(&self) -> u64 {
        match &self.config.target {
            Target::All | Target::Dir(_) => {
                if self.config.tracked {
                    if let Some(lister) = &self.lister {
                        if let Ok(files) = lister.list_tracked(&self.config.scan_root) {
                            return files
                                .iter()
                                .filter(|p| !self.is_output_artifact(p))
                                .filter(|p| self.passes_rules(p))
                                .count() as u64;
                        }
                    }
                    0
                } else {
                    self.walk_files(&self.config.scan_root)
                        .into_iter()
                        .filter(|p| !self.is_output_artifact(p))
                        .filter(|p| self.passes_rules(p))
                        .count() as u64
                }
            }
            Target::List(names) => names.len() as u64,
            Target::Glob(pattern) => self
                .walk_files(&self.config.scan_root)
                .into_iter()
                .filter(|p| !self.is_output_artifact(p))
                .filter(|p| Self::basename_matches(p, pattern))
                .count() as u64,
            Target::Name(_) => 1,
        }
    }

    /// All-files / directory mode: traverse, filter, gate
    fn select_walk(&self, selection: &mut Selection) -> Result<()> {
        let candidates = if self.config.tracked {
            match &self.lister {
                Some(lister) => lister.list_tracked(&self.config.scan_root)?,
                None => crate::bail!(Config, "tracked mode requires a tracked-file lister"),
            }
        } else {
            self.walk_files(&self.config.scan_root)
        };

        for path in candidates {
            if self.is_output_artifact(&path) || !self.passes_rules(&path) {
                continue;
            }
            self.admit(&path, selection);
        }

        Ok(())
    }

    /// Explicit-list / single-name mode: independent recursive first-match
    /// per name; a missing name is reported, not fatal.
    fn select_list(&self, names: &[String], selection: &mut Selection) -> Result<()> {
        let universe = self.walk_files(&self.config.scan_root);

        for name in names {
            let found = universe
                .iter()
                .filter(|p| !self.is_output_artifact(p))
                .find(|p| {
                    p.file_name()
                        .map(|f| f.to_string_lossy() == name.as_str())
                        .unwrap_or(false)
                });

            match found {
                Some(path) => self.admit(path, selection),
                None => selection.skipped.push(SkippedFile {
                    path: name.clone(),
                    reason: SkipReason::NotFound,
                }),
            }
        }

        Ok(())
    }

    /// Glob mode: basename shell-glob match over the full traversal.
    /// No rule filters beyond the classification/size gate.
    fn select_glob(&self, pattern: &str, selection: &mut Selection) -> Result<()> {
        let mut matched = false;

        for path in self.walk_files(&self.config.scan_root) {
            if self.is_output_artifact(&path) || !Self::basename_matches(&path, pattern) {
                continue;
            }
            matched = true;
            self.admit(&path, selection);
        }

        if !matched {
            selection.skipped.push(SkippedFile {
                path: pattern.to_string(),
                reason: SkipReason::NotFound,
            });
        }

        Ok(())
    }

    /// Gate a candidate through the content/size classifier and record it
    fn admit(&self, path: &Path, selection: &mut Selection) {
        self.progress.inc(1);

        let display_path = self.display_path(path);
        self.progress
            .set_message(format!("Current file: {}", display_path));

        match self.gate(path) {
            Ok(size) => selection.files.push(SelectedFile {
                abs_path: path.to_path_buf(),
                display_path,
                size,
            }),
            Err(reason) => selection.skipped.push(SkippedFile {
                path: display_path,
                reason,
            }),
        }
    }

    /// Text/size gate. Returns the file size on success.
    fn gate(&self, path: &Path) -> std::result::Result<u64, SkipReason> {
        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) => return Err(SkipReason::Unreadable(e.to_string())),
        };

        if !classify::within_budget(metadata.len()) {
            return Err(SkipReason::Oversized(metadata.len()));
        }

        match self.probe.classify(path) {
            Ok(ContentKind::Binary) => Err(SkipReason::Binary),
            Ok(ContentKind::Text) | Ok(ContentKind::Empty) => Ok(metadata.len()),
            Err(e) => Err(SkipReason::Unreadable(e.to_string())),
        }
    }

    /// Apply the active filter rules to a candidate. Any failing rule
    /// short-circuits exclusion.
    fn passes_rules(&self, path: &Path) -> bool {
        let display = self.display_path(path);
        let basename = path.file_name().unwrap_or_default().to_string_lossy();

        // Scope-dir prefix
        if let Some(prefix) = &self.config.include_dir {
            let prefix = normalize_path(prefix);
            let prefix = prefix.trim_end_matches('/');
            if display != prefix && !display.starts_with(&format!("{}/", prefix)) {
                return false;
            }
        }

        // Basename exclusion: defaults plus --exclude
        if DEFAULT_EXCLUDE.iter().any(|&p| p == basename)
            || self
                .config
                .exclude_basenames
                .iter()
                .any(|p| p == basename.as_ref())
        {
            return false;
        }

        // Substring exclusion (--ignore)
        if self
            .config
            .ignore_substrings
            .iter()
            .any(|s| display.contains(s.as_str()))
        {
            return false;
        }

        // Extension filters; extension is empty when the basename has no dot
        let ext = file_extension(path).unwrap_or_default();
        if !self.config.include_exts.is_empty() && !self.config.include_exts.contains(&ext) {
            return false;
        }
        if self.config.exclude_exts.contains(&ext) {
            return false;
        }

        true
    }

    /// The selection universe always excludes the output artifact, so a
    /// run never embeds its own prior output.
    fn is_output_artifact(&self, path: &Path) -> bool {
        path.ends_with(&self.config.output_file)
    }

    /// Normalized path relative to the scan root, for framing and reports
    fn display_path(&self, path: &Path) -> String {
        let rel = match path.strip_prefix(&self.config.scan_root) {
            Ok(r) => r.to_path_buf(),
            // Tracked-lister paths are absolute; retry against the
            // canonicalized root before giving up.
            Err(_) => fs::canonicalize(&self.config.scan_root)
                .ok()
                .and_then(|root| path.strip_prefix(&root).ok().map(Path::to_path_buf))
                .unwrap_or_else(|| path.to_path_buf()),
        };

        normalize_path(&rel.to_string_lossy())
    }

    /// Enumerate every regular file under `root`, depth-first with entries
    /// sorted lexicographically by file name. Directories whose basename is
    /// in the default exclusion list are pruned in every mode.
    fn walk_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();

        if self.config.respect_gitignore {
            let mut builder = WalkBuilder::new(root);
            builder.sort_by_file_name(|a, b| a.cmp(b));
            builder.filter_entry(|entry| {
                let name = entry.file_name().to_string_lossy();
                !(entry.file_type().map_or(false, |ft| ft.is_dir())
                    && DEFAULT_EXCLUDE.iter().any(|&p| p == name))
            });

            for entry in builder.build().filter_map(std::result::Result::ok) {
                if entry.file_type().map_or(false, |ft| ft.is_file()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else {
            let walker = WalkDir::new(root).sort_by_file_name().into_iter();
            for entry in walker
                .filter_entry(|e| {
                    let name = e.file_name().to_string_lossy();
                    !(e.file_type().is_dir() && DEFAULT_EXCLUDE.iter().any(|&p| p == name))
                })
                .filter_map(std::result::Result::ok)
            {
                if entry.file_type().is_file() {
                    files.push(entry.path().to_path_buf());
                }
            }
        }

        files
    }

    /// Does the basename of `path` match the shell glob `pattern`?
    fn basename_matches(path: &Path, pattern: &str) -> bool {
        let basename = path.file_name().unwrap_or_default().to_string_lossy();
        glob_match(pattern, &basename)
    }
}
