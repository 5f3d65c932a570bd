use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

/// Inputs the hosting page supplies once, at load time.
///
/// These mirror the page's hidden fields; the overlay reads them exactly once
/// at attach and never re-derives them afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    /// Review-mode flag; when false the overlay does not attach at all.
    #[serde(default)]
    pub has_code_review: bool,
    pub code_review_id: u64,
    pub branch_id: u64,
    /// Identity of the viewer, for the own-post edit rule.
    pub user_id: u64,
    /// Prefix for avatar and profile links in rendered markup.
    #[serde(default)]
    pub base_url: String,
}

impl PageContext {
    /// Decode the hidden-field blob the page embeds for scripts.
    pub fn from_json(value: Value) -> Result<Self> {
        serde_json::from_value(value).context("Failed to parse page context")
    }
}
