use crate::domain::ports::{ModuleSource, RawModuleFile};
use crate::utils::error::{Result, StatsError};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads module data files from the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalModuleSource {
    base_path: PathBuf,
    files: Vec<String>,
}

impl LocalModuleSource {
    pub fn new(files: Vec<String>) -> Self {
        Self {
            base_path: PathBuf::new(),
            files,
        }
    }

    /// 相對路徑以 `base_path` 為基準解析
    pub fn with_base_path<P: AsRef<Path>>(mut self, base_path: P) -> Self {
        self.base_path = base_path.as_ref().to_path_buf();
        self
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }
}

impl ModuleSource for LocalModuleSource {
    fn read_all(&self) -> Result<Vec<RawModuleFile>> {
        let mut result = Vec::with_capacity(self.files.len());

        for file in &self.files {
            let full_path = self.base_path.join(file);
            if !full_path.exists() {
                return Err(StatsError::ConfigError {
                    message: format!("Module data file {} not found", full_path.display()),
                });
            }

            tracing::debug!("Reading module data from {}", full_path.display());
            let contents = fs::read_to_string(&full_path)?;
            result.push(RawModuleFile {
                origin: full_path.display().to_string(),
                contents,
            });
        }

        Ok(result)
    }
}

/// Module data held in memory, mostly for tests and embedded defaults.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    files: Vec<RawModuleFile>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, origin: &str, contents: &str) -> Self {
        self.files.push(RawModuleFile {
            origin: origin.to_string(),
            contents: contents.to_string(),
        });
        self
    }
}

impl ModuleSource for InMemorySource {
    fn read_all(&self) -> Result<Vec<RawModuleFile>> {
        Ok(self.files.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_local_source_reads_relative_to_base() {
        let dir = TempDir::new().unwrap();
        let mut file = fs::File::create(dir.path().join("rings.json")).unwrap();
        file.write_all(br#"{"ring1": {"a": 10, "b": 2}}"#).unwrap();

        let source =
            LocalModuleSource::new(vec!["rings.json".to_string()]).with_base_path(dir.path());
        let files = source.read_all().unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].origin.ends_with("rings.json"));
        assert!(files[0].contents.contains("ring1"));
    }

    #[test]
    fn test_local_source_missing_file() {
        let dir = TempDir::new().unwrap();
        let source =
            LocalModuleSource::new(vec!["missing.json".to_string()]).with_base_path(dir.path());

        let err = source.read_all().unwrap_err();
        assert!(err.is_startup_fatal());
        assert!(err.to_string().contains("missing.json"));
    }
}
