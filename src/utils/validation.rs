// file: src/utils/validation.rs
// description: data validation utilities and helpers
// reference: input validation patterns

use crate::error::{Result, StoreError};
use std::fs;
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_file_path(path: &Path) -> Result<()> {
        let canonical = fs::canonicalize(path).map_err(|e| {
            StoreError::Validation(format!(
                "Cannot canonicalize path {}: {}",
                path.display(),
                e
            ))
        })?;

        if !canonical.is_file() {
            return Err(StoreError::Validation(format!(
                "Path is not a file: {}",
                canonical.display()
            )));
        }

        Ok(())
    }

    pub fn validate_content_not_empty(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(StoreError::Validation("Content is empty".to_string()));
        }
        Ok(())
    }

    pub fn validate_query(query: &str) -> Result<()> {
        if query.trim().is_empty() {
            return Err(StoreError::Validation("Query is empty".to_string()));
        }
        Ok(())
    }

    pub fn validate_limit(k: usize) -> Result<()> {
        if k == 0 {
            return Err(StoreError::Validation(
                "Result limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_matching_lengths(texts: usize, metadatas: usize) -> Result<()> {
        if texts != metadatas {
            return Err(StoreError::Validation(format!(
                "Got {} texts but {} metadata entries",
                texts, metadatas
            )));
        }
        Ok(())
    }

    pub fn truncate_text(text: &str, max_length: usize) -> String {
        if text.len() <= max_length {
            text.to_string()
        } else {
            let cut = text
                .char_indices()
                .take_while(|(i, _)| *i < max_length)
                .last()
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or(0);
            format!("{}...", &text[..cut])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_file_path() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("texts.txt");
        fs::write(&file_path, "test").unwrap();

        assert!(Validator::validate_file_path(&file_path).is_ok());
        assert!(Validator::validate_file_path(Path::new("/nonexistent")).is_err());
    }

    #[test]
    fn test_validate_content_not_empty() {
        assert!(Validator::validate_content_not_empty("content").is_ok());
        assert!(Validator::validate_content_not_empty("").is_err());
        assert!(Validator::validate_content_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_query() {
        assert!(Validator::validate_query("what is this").is_ok());
        assert!(Validator::validate_query(" \n ").is_err());
    }

    #[test]
    fn test_validate_limit() {
        assert!(Validator::validate_limit(5).is_ok());
        assert!(Validator::validate_limit(0).is_err());
    }

    #[test]
    fn test_validate_matching_lengths() {
        assert!(Validator::validate_matching_lengths(3, 3).is_ok());
        assert!(Validator::validate_matching_lengths(3, 2).is_err());
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(Validator::truncate_text("short", 10), "short");
        assert_eq!(
            Validator::truncate_text("this is a very long text", 10),
            "this is a ..."
        );
    }
}
