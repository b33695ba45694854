/*!
 * Content classification for candidate files
 *
 * Decides whether a candidate is text, binary or empty, and whether its
 * size fits the inclusion budget. Classification is behind a small trait
 * so the selection pipeline can be tested without touching real probe
 * behavior.
 */

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

/// Maximum size of a file whose content is included in the output
pub const MAX_FILE_SIZE: u64 = 1_048_576;

/// Number of bytes sampled when sniffing file content
const SNIFF_LEN: usize = 8192;

/// Content classification of a candidate file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Readable text content
    Text,
    /// Non-text content, excluded from aggregation
    Binary,
    /// Zero-length file, included as text
    Empty,
}

/// Capability interface for content-type probing
pub trait ContentProbe {
    /// Classify the content of the file at `path`
    fn classify(&self, path: &Path) -> io::Result<ContentKind>;
}

/// Default probe: samples the head of the file and applies a UTF-8 plus
/// control-byte-ratio heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteSniffProbe;

impl ContentProbe for ByteSniffProbe {
    fn classify(&self, path: &Path) -> io::Result<ContentKind> {
        let metadata = fs::metadata(path)?;

        if metadata.len() == 0 {
            return Ok(ContentKind::Empty);
        }

        let mut buffer = vec![0; std::cmp::min(SNIFF_LEN, metadata.len() as usize)];
        let mut file = File::open(path)?;
        let bytes_read = file.read(&mut buffer)?;
        buffer.truncate(bytes_read);

        if std::str::from_utf8(&buffer).is_ok() {
            // Count control characters (0x00-0x08, 0x0E-0x1F)
            let control_count = buffer
                .iter()
                .filter(|&&b| (b < 9) || (b > 13 && b < 32))
                .count();
            let control_ratio = control_count as f32 / buffer.len() as f32;

            if control_ratio < 0.1 {
                return Ok(ContentKind::Text);
            }
        }

        Ok(ContentKind::Binary)
    }
}

/// Whether a file of `size` bytes fits the inclusion budget.
///
/// The boundary is inclusive: exactly `MAX_FILE_SIZE` bytes still fits.
pub fn within_budget(size: u64) -> bool {
    size <= MAX_FILE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_budget_boundary() {
        assert!(within_budget(0));
        assert!(within_budget(MAX_FILE_SIZE));
        assert!(!within_budget(MAX_FILE_SIZE + 1));
    }

    #[test]
    fn test_classify_text_binary_empty() -> io::Result<()> {
        let dir = tempdir()?;

        let text = dir.path().join("a.txt");
        File::create(&text)?.write_all(b"hello world\nsecond line\n")?;

        let binary = dir.path().join("a.bin");
        File::create(&binary)?.write_all(&[0u8, 1, 2, 3, 0, 0, 7])?;

        let empty = dir.path().join("empty.txt");
        File::create(&empty)?;

        let probe = ByteSniffProbe;
        assert_eq!(probe.classify(&text)?, ContentKind::Text);
        assert_eq!(probe.classify(&binary)?, ContentKind::Binary);
        assert_eq!(probe.classify(&empty)?, ContentKind::Empty);

        Ok(())
    }

    #[test]
    fn test_classify_missing_file_is_error() {
        let probe = ByteSniffProbe;
        assert!(probe.classify(Path::new("/nonexistent/xyz.txt")).is_err());
    }
}
