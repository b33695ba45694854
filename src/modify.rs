/*!
 * Modification block parsing and application
 *
 * Apply mode reads an arbitrary text blob (normally from the clipboard),
 * extracts the single `<Modification>…</Modification>` block inside it,
 * scans the block for replace/create/delete operations, and applies them
 * to the filesystem.
 *
 * Scanning is flat and line-oriented: for each operation kind, the body of
 * an occurrence is every line strictly between its open-tag line and the
 * next close tag of the same kind. Close tags match by kind, not by path,
 * so nested same-kind blocks are not supported.
 */

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::error::Result;
use crate::utils::normalize_path;

/// Opening delimiter of the outer modification block
pub const BLOCK_OPEN: &str = "<Modification>";

/// Closing delimiter of the outer modification block
pub const BLOCK_CLOSE: &str = "</Modification>";

/// Error type for modification block parsing
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Input text was empty or whitespace only
    #[error("input is empty")]
    Empty,

    /// No `<Modification>` marker in the input
    #[error("no opening {BLOCK_OPEN} marker found")]
    NoOpenMarker,

    /// No `</Modification>` marker after the opening one
    #[error("no closing {BLOCK_CLOSE} marker found")]
    NoCloseMarker,
}

/// Kind of a file operation, in fixed execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// Overwrite an existing file (creates it if absent)
    Replace,
    /// Create a new file (overwrites if present)
    Create,
    /// Delete a file if it exists
    Delete,
}

impl OpKind {
    fn tag(&self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Create => "create",
            Self::Delete => "delete",
        }
    }
}

/// A single parsed file operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Operation kind
    pub kind: OpKind,
    /// Target path, taken verbatim from the `p` attribute
    pub path: String,
    /// Raw body text; always `None` for delete operations
    pub body: Option<String>,
}

/// Report of an apply run
#[derive(Debug, Clone, Default)]
pub struct ApplyOutcome {
    /// Paths written or deleted, in application order
    pub applied: Vec<String>,
    /// Non-fatal problems encountered, e.g. delete of an absent target
    pub warnings: Vec<String>,
}

static REPLACE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<replace p="([^"]*)">"#).expect("valid pattern"));
static CREATE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<create p="([^"]*)">"#).expect("valid pattern"));
static DELETE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<delete p="([^"]*)">"#).expect("valid pattern"));

fn open_pattern(kind: OpKind) -> &'static Regex {
    match kind {
        OpKind::Replace => &REPLACE_OPEN,
        OpKind::Create => &CREATE_OPEN,
        OpKind::Delete => &DELETE_OPEN,
    }
}

/// Extract the single modification block from surrounding free text.
///
/// Both delimiters must be present; there is no partial recovery.
pub fn extract_block(raw: &str) -> std::result::Result<&str, ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let open = raw.find(BLOCK_OPEN).ok_or(ParseError::NoOpenMarker)?;
    let after_open = open + BLOCK_OPEN.len();

    let close = raw[after_open..]
        .find(BLOCK_CLOSE)
        .ok_or(ParseError::NoCloseMarker)?;

    Ok(&raw[after_open..after_open + close])
}

/// Extract all operations from a modification block.
///
/// Kinds are scanned in fixed order (replace, create, delete); occurrences
/// preserve first-seen order within each kind. Unterminated sub-blocks are
/// dropped.
pub fn extract_operations(block: &str) -> Vec<Operation> {
    let mut operations = Vec::new();

    for kind in [OpKind::Replace, OpKind::Create, OpKind::Delete] {
        operations.extend(scan_kind(block, kind));
    }

    operations
}

/// Line-scan the block for one operation kind
fn scan_kind(block: &str, kind: OpKind) -> Vec<Operation> {
    let open = open_pattern(kind);
    let close_tag = format!("</{}>", kind.tag());

    let mut ops = Vec::new();
    let mut lines = block.lines();

    while let Some(line) = lines.next() {
        let captures = match open.captures(line) {
            Some(c) => c,
            None => continue,
        };
        let path = captures[1].to_string();

        if kind == OpKind::Delete {
            ops.push(Operation {
                kind,
                path,
                body: None,
            });
            continue;
        }

        let mut body_lines = Vec::new();
        let mut closed = false;
        for body_line in lines.by_ref() {
            if body_line.trim() == close_tag {
                closed = true;
                break;
            }
            body_lines.push(body_line);
        }

        if closed {
            ops.push(Operation {
                kind,
                path,
                body: Some(body_lines.join("\n")),
            });
        }
    }

    ops
}

/// Parse a raw text blob into its operations in one step
pub fn parse(raw: &str) -> std::result::Result<Vec<Operation>, ParseError> {
    let block = extract_block(raw)?;
    Ok(extract_operations(block))
}

/// Apply operations against the filesystem, rooted at `root`.
///
/// Replace and create ensure intermediate directories exist, then write
/// the body verbatim with exactly one trailing newline appended to
/// non-empty bodies. Delete of an absent target is a warning, not an
/// error. Re-applying the same operations yields the same end state.
///
/// Application is not transactional: a crash mid-sequence can leave a
/// subset of operations applied.
pub fn apply_operations(root: &Path, operations: &[Operation]) -> Result<ApplyOutcome> {
    let mut outcome = ApplyOutcome::default();

    for op in operations {
        let target = resolve_target(root, &op.path);

        match op.kind {
            OpKind::Replace | OpKind::Create => {
                if let Some(parent) = target.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }

                let body = op.body.as_deref().unwrap_or("");
                let mut content = body.to_string();
                if !content.is_empty() {
                    content.push('\n');
                }
                fs::write(&target, content)?;
                outcome.applied.push(op.path.clone());
            }
            OpKind::Delete => {
                if target.exists() {
                    fs::remove_file(&target)?;
                    outcome.applied.push(op.path.clone());
                } else {
                    outcome
                        .warnings
                        .push(format!("delete target not found: {}", op.path));
                }
            }
        }
    }

    Ok(outcome)
}

/// Join a verbatim operation path onto the application root
fn resolve_target(root: &Path, raw: &str) -> PathBuf {
    let normalized = normalize_path(raw);
    root.join(normalized.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_block_requires_both_markers() {
        assert_eq!(extract_block(""), Err(ParseError::Empty));
        assert_eq!(extract_block("   \n\t"), Err(ParseError::Empty));
        assert_eq!(
            extract_block("no markers here"),
            Err(ParseError::NoOpenMarker)
        );
        assert_eq!(
            extract_block("<Modification>\n<replace p=\"x\">body"),
            Err(ParseError::NoCloseMarker)
        );
    }

    #[test]
    fn test_extract_block_strips_surrounding_text() {
        let raw = "Sure! Here are the changes:\n<Modification>\ninner\n</Modification>\nEnjoy!";
        assert_eq!(extract_block(raw), Ok("\ninner\n"));
    }

    #[test]
    fn test_operations_ordered_by_kind_then_occurrence() {
        let block = "\
<delete p=\"gone.txt\"></delete>
<create p=\"new.txt\">
created
</create>
<replace p=\"b.txt\">
second
</replace>
<replace p=\"a.txt\">
first
</replace>
";
        let ops = extract_operations(block);
        let order: Vec<(OpKind, &str)> =
            ops.iter().map(|o| (o.kind, o.path.as_str())).collect();

        assert_eq!(
            order,
            vec![
                (OpKind::Replace, "b.txt"),
                (OpKind::Replace, "a.txt"),
                (OpKind::Create, "new.txt"),
                (OpKind::Delete, "gone.txt"),
            ]
        );
    }

    #[test]
    fn test_body_is_verbatim_between_tags() {
        let block = "\
<replace p=\"src/x.rs\">
fn main() {
    println!(\"hi\");
}

</replace>
";
        let ops = extract_operations(block);
        assert_eq!(ops.len(), 1);
        assert_eq!(
            ops[0].body.as_deref(),
            Some("fn main() {\n    println!(\"hi\");\n}\n")
        );
    }

    #[test]
    fn test_close_tag_matches_kind_not_path() {
        // Flat scan: the first same-kind close tag terminates the body,
        // so a nested same-kind open tag ends up inside the outer body
        // and its own close tag starts a stray scan position.
        let block = "\
<replace p=\"outer.txt\">
before
<replace p=\"inner.txt\">
inner body
</replace>
after
</replace>
";
        let ops: Vec<_> = extract_operations(block)
            .into_iter()
            .filter(|o| o.kind == OpKind::Replace)
            .collect();

        assert_eq!(ops[0].path, "outer.txt");
        assert_eq!(
            ops[0].body.as_deref(),
            Some("before\n<replace p=\"inner.txt\">\ninner body")
        );
    }

    #[test]
    fn test_unterminated_sub_block_is_dropped() {
        let block = "\
<create p=\"ok.txt\">
fine
</create>
<create p=\"dangling.txt\">
never closed
";
        let ops = extract_operations(block);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].path, "ok.txt");
    }

    #[test]
    fn test_delete_carries_no_body() {
        let ops = extract_operations("<delete p=\"x/y.txt\"></delete>\n");
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].kind, OpKind::Delete);
        assert_eq!(ops[0].body, None);
    }

    #[test]
    fn test_apply_create_round_trip() -> crate::error::Result<()> {
        let dir = tempfile::tempdir().expect("tempdir");
        let ops = vec![Operation {
            kind: OpKind::Create,
            path: "x.txt".to_string(),
            body: Some("hello".to_string()),
        }];

        let outcome = apply_operations(dir.path(), &ops)?;
        assert_eq!(outcome.applied, vec!["x.txt".to_string()]);
        assert!(outcome.warnings.is_empty());

        // Newline pinning: one trailing newline is appended to non-empty bodies
        let written = fs::read_to_string(dir.path().join("x.txt"))?;
        assert_eq!(written, "hello\n");

        Ok(())
    }

    #[test]
    fn test_apply_creates_intermediate_directories() -> crate::error::Result<()> {
        let dir = tempfile::tempdir().expect("tempdir");
        let ops = vec![Operation {
            kind: OpKind::Replace,
            path: "deep/nested/dir/file.txt".to_string(),
            body: Some("content".to_string()),
        }];

        apply_operations(dir.path(), &ops)?;
        assert_eq!(
            fs::read_to_string(dir.path().join("deep/nested/dir/file.txt"))?,
            "content\n"
        );

        Ok(())
    }

    #[test]
    fn test_delete_of_absent_is_warning_not_error() -> crate::error::Result<()> {
        let dir = tempfile::tempdir().expect("tempdir");
        let ops = vec![Operation {
            kind: OpKind::Delete,
            path: "missing.txt".to_string(),
            body: None,
        }];

        let outcome = apply_operations(dir.path(), &ops)?;
        assert!(outcome.applied.is_empty());
        assert_eq!(outcome.warnings.len(), 1);

        Ok(())
    }

    #[test]
    fn test_apply_is_idempotent() -> crate::error::Result<()> {
        let dir = tempfile::tempdir().expect("tempdir");
        let ops = parse(
            "<Modification>\n\
             <create p=\"a.txt\">\nalpha\n</create>\n\
             <delete p=\"b.txt\"></delete>\n\
             </Modification>",
        )
        .expect("parse");

        apply_operations(dir.path(), &ops)?;
        let second = apply_operations(dir.path(), &ops)?;

        assert_eq!(fs::read_to_string(dir.path().join("a.txt"))?, "alpha\n");
        assert!(!dir.path().join("b.txt").exists());
        // Second delete of the already-absent target degrades to a warning
        assert_eq!(second.warnings.len(), 1);

        Ok(())
    }
}
