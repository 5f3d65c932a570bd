//! Inline comment overlay for forum code review posts.
//!
//! A code review post is a highlighted source block where readers can attach
//! comments to individual lines. This crate owns the client-side half of that
//! feature: it fetches the review's comments, renders each one beneath its
//! source line as an escaped HTML fragment, and runs the single add/edit form
//! with its in-flight submission guard. Transport, permission checks, and
//! alert presentation are injected as trait objects.

pub mod api;
pub mod config;
pub mod highlight;
pub mod markup;
pub mod notify;
pub mod overlay;
pub mod page;
pub mod permission;

// Explicit re-exports - only export what hosts actually wire up
pub use api::{
    create_review_comment, edit_review_comment, fetch_review_comments, ApiTransport,
    ReviewComment, SubmitOutcome, TransportError, ValidationMessage,
};
pub use config::Labels;
pub use highlight::Highlighter;
pub use notify::Notifier;
pub use overlay::{ClickTarget, FormMode, FormState, OpenForm, ReviewOverlay, SourceView};
pub use page::PageContext;
pub use permission::{CapabilityContext, PermissionService};
