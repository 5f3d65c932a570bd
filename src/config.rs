use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Display strings used in the rendered markup.
///
/// Deployments override these with localized text; every field falls back to
/// its English default when the config file is absent or partial.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub add: String,
    pub edit: String,
    pub cancel: String,
    /// Inserted between the author link and the comment body ("alice says:").
    pub review_says: String,
    pub unexpected_error: String,
    pub empty_body: String,
    pub keymaps_hint: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            add: "Add".to_owned(),
            edit: "Edit".to_owned(),
            cancel: "Cancel".to_owned(),
            review_says: "says".to_owned(),
            unexpected_error: "An unexpected error occurred".to_owned(),
            empty_body: "Comment text must not be empty".to_owned(),
            keymaps_hint: "Ctrl+Enter to submit, Esc to cancel".to_owned(),
        }
    }
}

impl Labels {
    /// Load labels from a TOML file, falling back to defaults when it does
    /// not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).context("Failed to read labels file")?;
            toml::from_str(&content).context("Failed to parse labels file")
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let labels = Labels::load(Path::new("/nonexistent/labels.toml")).unwrap();
        assert_eq!(labels.edit, "Edit");
        assert_eq!(labels.unexpected_error, "An unexpected error occurred");
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "edit = \"Bearbeiten\"").unwrap();
        writeln!(file, "cancel = \"Abbrechen\"").unwrap();

        let labels = Labels::load(file.path()).unwrap();
        assert_eq!(labels.edit, "Bearbeiten");
        assert_eq!(labels.cancel, "Abbrechen");
        assert_eq!(labels.add, "Add");
    }

    #[test]
    fn garbage_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "edit = [not toml").unwrap();
        assert!(Labels::load(file.path()).is_err());
    }
}
