/*!
 * Version-control integration
 *
 * Supplies the tracked-file candidate universe used by `--tracked` mode.
 * The lister is a capability trait so the selection pipeline can be tested
 * without a real repository.
 */

use std::path::{Path, PathBuf};

use crate::error::{PromptPackError, Result};

/// Capability interface for listing version-control-tracked files
pub trait TrackedFileLister {
    /// List all tracked regular files under `root`, as absolute paths.
    ///
    /// The returned order must be deterministic across invocations on an
    /// unchanged tree.
    fn list_tracked(&self, root: &Path) -> Result<Vec<PathBuf>>;
}

/// Tracked-file lister backed by the git index
#[derive(Debug, Clone, Copy, Default)]
pub struct GitLister;

impl TrackedFileLister for GitLister {
    fn list_tracked(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let repo = git2::Repository::discover(root)
            .map_err(|_| PromptPackError::NotARepository(root.display().to_string()))?;

        let workdir = repo
            .workdir()
            .ok_or_else(|| crate::error!(Config, "bare repository has no working tree"))?
            .to_path_buf();

        let index = repo.index()?;

        // Index entries are stored sorted by path, so iteration order is
        // already deterministic.
        let mut files = Vec::with_capacity(index.len());
        for entry in index.iter() {
            let rel = String::from_utf8_lossy(&entry.path).to_string();
            let abs = workdir.join(&rel);
            if abs.is_file() {
                files.push(abs);
            }
        }

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lister_outside_repository_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = GitLister.list_tracked(dir.path());

        assert!(matches!(result, Err(PromptPackError::NotARepository(_))));
    }
}
