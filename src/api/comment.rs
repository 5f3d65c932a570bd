use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::client::{ApiTransport, TransportError};

/// An inline comment anchored to a source line of a code review post.
///
/// Owned by the server; the client holds a render-only copy. `id == 0` marks
/// an unsaved draft (the server assigns the real id on create).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewComment {
    pub id: u64,
    pub author_id: u64,
    pub author_username: String,
    /// 1-indexed source line the comment is attached to.
    pub line_number: u32,
    pub body: String,
}

/// One field-level validation message reported by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationMessage {
    pub message: String,
}

/// Settled outcome of a new/edit submission.
///
/// Transport and server failures arrive as `Err(TransportError)` instead;
/// validation failures are data, not errors - the form stays open for
/// correction.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The server stored the comment and returned the canonical copy.
    Saved(ReviewComment),
    /// The server refused the submission with field-level messages.
    Invalid(Vec<ValidationMessage>),
}

/// Fetch all comments of a review.
///
/// Response envelope: `{ result: { comments: [...] } }`.
pub async fn fetch_review_comments(
    transport: &dyn ApiTransport,
    review_id: u64,
) -> Result<Vec<ReviewComment>, TransportError> {
    #[derive(Deserialize)]
    struct CommentList {
        comments: Vec<ReviewComment>,
    }
    #[derive(Deserialize)]
    struct Envelope {
        result: CommentList,
    }

    let json = transport.get(&format!("/reviews/{}/json", review_id)).await?;
    let envelope: Envelope = serde_json::from_value(json)?;
    Ok(envelope.result.comments)
}

/// Create a new inline comment.
///
/// The zero id/author fields are part of the wire contract: the server fills
/// them in and echoes the stored comment back.
pub async fn create_review_comment(
    transport: &dyn ApiTransport,
    review_id: u64,
    line_number: u32,
    body: &str,
) -> Result<SubmitOutcome, TransportError> {
    let form = json!({
        "id": 0,
        "authorId": 0,
        "authorUsername": "",
        "lineNumber": line_number,
        "body": body,
        "reviewId": review_id,
    });
    let json = transport.post("/reviewcomments/new", form).await?;
    parse_submit_response(json)
}

/// Edit an existing inline comment.
///
/// The edit form carries no line anchor, so `lineNumber` is always 0 here;
/// the server keeps the comment's original line.
pub async fn edit_review_comment(
    transport: &dyn ApiTransport,
    comment_id: u64,
    body: &str,
    branch_id: u64,
) -> Result<SubmitOutcome, TransportError> {
    let form = json!({
        "id": comment_id,
        "authorId": 0,
        "authorUsername": "",
        "lineNumber": 0,
        "body": body,
        "branchId": branch_id,
    });
    let json = transport.post("/reviewcomments/edit", form).await?;
    parse_submit_response(json)
}

/// Decode the shared submit envelope.
///
/// `{ status: "Success", result: comment }` on success,
/// `{ reason: "validation", result: [{message}, ...] }` on validation failure,
/// any other shape is a generic failure.
fn parse_submit_response(json: Value) -> Result<SubmitOutcome, TransportError> {
    if json.get("status").and_then(Value::as_str) == Some("Success") {
        let result = json.get("result").cloned().unwrap_or(Value::Null);
        let comment = serde_json::from_value(result)?;
        return Ok(SubmitOutcome::Saved(comment));
    }
    if json.get("reason").and_then(Value::as_str) == Some("validation") {
        let result = json.get("result").cloned().unwrap_or(Value::Null);
        let messages = serde_json::from_value(result)?;
        return Ok(SubmitOutcome::Invalid(messages));
    }
    tracing::warn!(%json, "unrecognized submit response envelope");
    Err(TransportError::Rejected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_success_envelope() {
        let json = json!({
            "status": "Success",
            "result": {
                "id": 42,
                "authorId": 5,
                "authorUsername": "alice",
                "lineNumber": 3,
                "body": "looks wrong"
            }
        });
        match parse_submit_response(json).unwrap() {
            SubmitOutcome::Saved(comment) => {
                assert_eq!(comment.id, 42);
                assert_eq!(comment.author_username, "alice");
                assert_eq!(comment.line_number, 3);
            }
            other => panic!("expected Saved, got {:?}", other),
        }
    }

    #[test]
    fn parse_validation_envelope() {
        let json = json!({
            "reason": "validation",
            "result": [
                { "message": "Comment is too long" },
                { "message": "Comment may not be empty" }
            ]
        });
        match parse_submit_response(json).unwrap() {
            SubmitOutcome::Invalid(messages) => {
                assert_eq!(messages.len(), 2);
                assert_eq!(messages[0].message, "Comment is too long");
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn parse_unknown_envelope_is_rejected() {
        let json = json!({ "status": "Fail" });
        assert!(matches!(
            parse_submit_response(json),
            Err(TransportError::Rejected)
        ));
    }

    #[test]
    fn parse_success_with_broken_result_is_malformed() {
        let json = json!({ "status": "Success", "result": { "id": "not-a-number" } });
        assert!(matches!(
            parse_submit_response(json),
            Err(TransportError::Malformed(_))
        ));
    }

    #[test]
    fn review_comment_uses_camel_case_on_the_wire() {
        let comment: ReviewComment = serde_json::from_value(json!({
            "id": 1,
            "authorId": 2,
            "authorUsername": "bob",
            "lineNumber": 7,
            "body": "nit"
        }))
        .unwrap();
        assert_eq!(comment.author_id, 2);

        let value = serde_json::to_value(&comment).unwrap();
        assert!(value.get("authorUsername").is_some());
        assert!(value.get("lineNumber").is_some());
    }
}
