mod client;
pub mod comment;

// Explicit re-exports - only export what is actually used
pub use client::{ApiTransport, TransportError};
pub use comment::{
    create_review_comment, edit_review_comment, fetch_review_comments, ReviewComment,
    SubmitOutcome, ValidationMessage,
};
