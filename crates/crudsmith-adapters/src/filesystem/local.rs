//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use crudsmith_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{CrudsmithError, CrudsmithResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> CrudsmithResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn read_file(&self, path: &Path) -> CrudsmithResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &str) -> CrudsmithResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> CrudsmithError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let schemas = dir.path().join("resources/model_schemas");
        let file = schemas.join("Post.json");
        let fs = LocalFilesystem::new();

        assert!(!fs.exists(&file));
        fs.create_dir_all(&schemas).unwrap();
        fs.write_file(&file, "[]").unwrap();
        assert!(fs.exists(&file));
        assert_eq!(fs.read_file(&file).unwrap(), "[]");
    }

    #[test]
    fn directories_do_not_count_as_schema_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!LocalFilesystem::new().exists(dir.path()));
    }

    #[test]
    fn read_errors_carry_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = LocalFilesystem::new().read_file(&missing).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }
}
