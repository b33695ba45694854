/*!
 * Utility functions for promptpack
 */

use std::path::Path;

use once_cell::sync::Lazy;

/// Collapse every run of consecutive `/` separators into a single `/`.
///
/// Does not resolve `.` or `..` segments. Idempotent:
/// `normalize_path(normalize_path(p)) == normalize_path(p)`.
pub fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_sep = false;

    for c in path.chars() {
        if c == '/' {
            if !prev_sep {
                out.push(c);
            }
            prev_sep = true;
        } else {
            out.push(c);
            prev_sep = false;
        }
    }

    out
}

/// Extension of a file's basename: the text after the last `.`.
///
/// Returns `None` when the basename contains no `.` at all.
pub fn file_extension(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy().to_string();
    name.rfind('.').map(|idx| name[idx + 1..].to_string())
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Basenames that are never candidates in all-files/directory modes
pub static DEFAULT_EXCLUDE: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Version control
        ".git",
        ".svn",
        ".hg",
        // Dependencies
        "node_modules",
        "vendor",
        "package-lock.json",
        "yarn.lock",
        // Build output
        "target",
        "dist",
        "build",
        "out",
        "Cargo.lock",
        // Python
        "__pycache__",
        ".venv",
        "venv",
        // IDEs & OS noise
        ".idea",
        ".vscode",
        ".DS_Store",
        "Thumbs.db",
    ]
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_normalize_collapses_separator_runs() {
        assert_eq!(normalize_path("a//b///c"), "a/b/c");
        assert_eq!(normalize_path("/a//b/"), "/a/b/");
        assert_eq!(normalize_path("plain"), "plain");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for p in ["a//b///c", "//x", "a/./b//", ""] {
            let once = normalize_path(p);
            assert_eq!(normalize_path(&once), once);
        }
    }

    #[test]
    fn test_normalize_keeps_dot_segments() {
        assert_eq!(normalize_path("a/.//../b"), "a/./../b");
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(
            file_extension(&PathBuf::from("a/b/main.rs")),
            Some("rs".to_string())
        );
        assert_eq!(
            file_extension(&PathBuf::from("archive.tar.gz")),
            Some("gz".to_string())
        );
        assert_eq!(file_extension(&PathBuf::from("Makefile")), None);
        assert_eq!(
            file_extension(&PathBuf::from(".gitignore")),
            Some("gitignore".to_string())
        );
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 bytes");
        assert_eq!(format_file_size(2048), "2.00 KB");
        assert_eq!(format_file_size(1_048_576), "1.00 MB");
    }
}
