//! Small filesystem helpers

use crate::Result;
use std::path::Path;

/// Create the output directory (and parents) if it does not exist
pub fn create_output_directory(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        create_output_directory(&nested).unwrap();
        assert!(nested.is_dir());

        // Idempotent
        create_output_directory(&nested).unwrap();
    }
}
