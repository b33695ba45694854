/*!
 * promptpack - Aggregate project text files into a single annotated
 * prompt file for LLM context, and apply model-suggested modifications
 *
 * Aggregate mode selects files through a filtering pipeline and renders
 * them into one output document with per-file path markers. Apply mode
 * parses a <Modification> block out of clipboard text and performs the
 * file operations it describes.
 */

pub mod aggregate;
pub mod classify;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod git;
pub mod modify;
pub mod report;
pub mod select;
pub mod utils;


// Re-export main components for easier access
pub use aggregate::Aggregator;
pub use classify::{ByteSniffProbe, ContentKind, ContentProbe, MAX_FILE_SIZE};
pub use config::{Args, Config, Target};
pub use error::{PromptPackError, Result};
pub use git::{GitLister, TrackedFileLister};
pub use modify::{ApplyOutcome, OpKind, Operation, ParseError};
pub use report::{AggregateReport, FileReportInfo, ReportFormat, Reporter};
pub use select::{SelectedFile, Selection, SelectionEngine, SkipReason, SkippedFile};
pub use utils::{format_file_size, normalize_path};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
