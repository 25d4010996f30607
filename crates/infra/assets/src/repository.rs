use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AssetError;

/// An ordered overlay of filesystem directories, searched front-to-back for
/// a given relative path. A later `prepend` takes priority over everything
/// already registered, so the project's own `assets/` directory (prepended
/// last, by the bootstrap sequence that assembles extensions before the
/// project itself) always wins over extension- and theme-provided assets.
///
/// This mirrors the layered resource lookup every extension's
/// `assets_directory_path` contributes to.
#[derive(Debug, Default, Clone)]
pub struct AssetRepository {
    roots: Vec<PathBuf>,
}

impl AssetRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `root` as the highest-priority search path.
    pub fn prepend(&mut self, root: impl Into<PathBuf>) {
        self.roots.insert(0, root.into());
    }

    /// Remove every registered search path.
    pub fn clear(&mut self) {
        self.roots.clear();
    }

    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Resolve `relative_path` to the highest-priority root that has it.
    fn resolve(&self, relative_path: &Path) -> Result<PathBuf, AssetError> {
        let mut tried = Vec::with_capacity(self.roots.len());
        for root in &self.roots {
            let candidate = root.join(relative_path);
            if candidate.is_file() {
                return Ok(candidate);
            }
            tried.push(candidate);
        }
        Err(AssetError::NotFound { tried })
    }

    /// Read an asset's entire contents as a UTF-8 string.
    pub fn read_to_string(&self, relative_path: impl AsRef<Path>) -> Result<String, AssetError> {
        let relative_path = relative_path.as_ref();
        let resolved = self.resolve(relative_path)?;
        fs::read_to_string(&resolved).map_err(|source| AssetError::Io {
            path: resolved,
            source,
        })
    }

    /// Read an asset's entire contents as bytes.
    pub fn read(&self, relative_path: impl AsRef<Path>) -> Result<Vec<u8>, AssetError> {
        let relative_path = relative_path.as_ref();
        let resolved = self.resolve(relative_path)?;
        fs::read(&resolved).map_err(|source| AssetError::Io {
            path: resolved,
            source,
        })
    }

    /// Copy a single asset to `destination`, preserving its permission bits
    /// the way `shutil.copy2` does.
    pub fn copy_file(
        &self,
        relative_path: impl AsRef<Path>,
        destination: impl AsRef<Path>,
    ) -> Result<(), AssetError> {
        let relative_path = relative_path.as_ref();
        let destination = destination.as_ref();
        let resolved = self.resolve(relative_path)?;
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|source| AssetError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::copy(&resolved, destination).map_err(|source| AssetError::Io {
            path: resolved,
            source,
        })?;
        Ok(())
    }

    /// List every distinct relative file path overlaid beneath
    /// `relative_directory`, across all registered roots, with
    /// higher-priority roots shadowing same-named files in lower-priority
    /// ones.
    #[must_use]
    pub fn enumerate_directory(&self, relative_directory: impl AsRef<Path>) -> Vec<PathBuf> {
        let relative_directory = relative_directory.as_ref();
        let mut seen = std::collections::HashSet::new();
        let mut result = Vec::new();
        for root in &self.roots {
            let directory = root.join(relative_directory);
            if !directory.is_dir() {
                continue;
            }
            for entry in walkdir::WalkDir::new(&directory)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file())
            {
                let Ok(relative) = entry.path().strip_prefix(root) else {
                    continue;
                };
                if seen.insert(relative.to_path_buf()) {
                    result.push(relative.to_path_buf());
                }
            }
        }
        result
    }

    /// Copy every overlaid file beneath `relative_directory` into
    /// `destination_directory`, preserving the overlay's shadowing rules:
    /// a file present in a higher-priority root is copied and a
    /// same-named file in a lower-priority root is skipped.
    pub fn copy_tree(
        &self,
        relative_directory: impl AsRef<Path>,
        destination_directory: impl AsRef<Path>,
    ) -> Result<(), AssetError> {
        let relative_directory = relative_directory.as_ref();
        let destination_directory = destination_directory.as_ref();
        for relative_file in self.enumerate_directory(relative_directory) {
            let Ok(within_directory) = relative_file.strip_prefix(relative_directory) else {
                continue;
            };
            self.copy_file(&relative_file, destination_directory.join(within_directory))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn higher_priority_root_shadows_lower_one() {
        let low = tempfile::tempdir().unwrap();
        let high = tempfile::tempdir().unwrap();
        write(&low.path().join("style.css"), "low");
        write(&high.path().join("style.css"), "high");

        let mut repository = AssetRepository::new();
        repository.prepend(low.path());
        repository.prepend(high.path());

        assert_eq!(repository.read_to_string("style.css").unwrap(), "high");
    }

    #[test]
    fn missing_asset_is_not_found() {
        let repository = AssetRepository::new();
        assert!(matches!(
            repository.read("nope.txt"),
            Err(AssetError::NotFound { .. })
        ));
    }

    #[test]
    fn missing_asset_reports_every_root_tried() {
        let low = tempfile::tempdir().unwrap();
        let high = tempfile::tempdir().unwrap();
        let mut repository = AssetRepository::new();
        repository.prepend(low.path());
        repository.prepend(high.path());

        let Err(AssetError::NotFound { tried }) = repository.read("nope.txt") else {
            panic!("expected NotFound");
        };
        assert_eq!(
            tried,
            vec![high.path().join("nope.txt"), low.path().join("nope.txt")]
        );
    }

    #[test]
    fn enumerate_directory_dedupes_across_roots() {
        let low = tempfile::tempdir().unwrap();
        let high = tempfile::tempdir().unwrap();
        write(&low.path().join("css/a.css"), "a");
        write(&low.path().join("css/b.css"), "b");
        write(&high.path().join("css/a.css"), "a-override");

        let mut repository = AssetRepository::new();
        repository.prepend(low.path());
        repository.prepend(high.path());

        let mut files = repository.enumerate_directory("css");
        files.sort();
        assert_eq!(files, vec![PathBuf::from("css/a.css"), PathBuf::from("css/b.css")]);
    }

    #[test]
    fn copy_tree_respects_shadowing() {
        let low = tempfile::tempdir().unwrap();
        let high = tempfile::tempdir().unwrap();
        let destination = tempfile::tempdir().unwrap();
        write(&low.path().join("css/a.css"), "low");
        write(&high.path().join("css/a.css"), "high");

        let mut repository = AssetRepository::new();
        repository.prepend(low.path());
        repository.prepend(high.path());

        repository.copy_tree("css", destination.path()).unwrap();
        let copied = fs::read_to_string(destination.path().join("a.css")).unwrap();
        assert_eq!(copied, "high");
    }
}
