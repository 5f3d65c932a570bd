//! HTML fragment assembly for comment blocks and the add/edit form.
//!
//! Everything user-supplied (body text, author names) goes through
//! [`escape_html`] before insertion, so a body of `<b>hi</b>` renders as the
//! literal text and never as markup.

use crate::api::ReviewComment;
use crate::config::Labels;

/// DOM id of the single page-wide comment form.
pub const ADD_COMMENT_FORM_ID: &str = "add-comment-form";

/// Escape the characters HTML assigns meaning to.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build the block for one rendered comment.
///
/// The hidden id/authorId fields keep the block addressable for in-place
/// updates; the edit link is emitted only when the viewer may edit this
/// comment.
pub fn comment_html(
    comment: &ReviewComment,
    can_edit: bool,
    base_url: &str,
    labels: &Labels,
) -> String {
    let edit_button = if can_edit {
        format!(
            "<a href=\"\" name=\"edit-review\">{}</a>",
            escape_html(&labels.edit)
        )
    } else {
        String::new()
    };
    format!(
        concat!(
            "<div class=\"review-container\">",
            "<input type=\"hidden\" name=\"id\" value=\"{id}\"/>",
            "<input type=\"hidden\" name=\"authorId\" value=\"{author_id}\"/>",
            "<div class=\"review-avatar\">",
            "<img class=\"review-avatar-img\" src=\"{base}/users/{author_id}/avatar\"/>",
            "</div>",
            "<div class=\"review-content\">",
            "<div class=\"review-buttons\">{edit_button}</div>",
            "<div class=\"review-header\">",
            "<a href=\"{base}/users/{author_id}\">{author}</a> {says}: ",
            "</div>",
            "<div class=\"review-body\">{body}</div>",
            "</div>",
            "</div>"
        ),
        id = comment.id,
        author_id = comment.author_id,
        base = base_url,
        edit_button = edit_button,
        author = escape_html(&comment.author_username),
        says = escape_html(&labels.review_says),
        body = escape_html(&comment.body),
    )
}

/// Build the add/edit form.
///
/// `action` names the submit button ("add" or "edit") so handlers can tell
/// the two apart; `comment_id` is 0 for a new comment. Validation messages
/// replace any previous ones and sit directly under the body field.
pub fn form_html(
    submit_label: &str,
    action: &str,
    line_number: u32,
    comment_id: u64,
    body: &str,
    errors: &[String],
    labels: &Labels,
) -> String {
    let error_class = if errors.is_empty() { "" } else { " error" };
    let error_span = if errors.is_empty() {
        String::new()
    } else {
        let mut span = String::from("<span class=\"help-inline\">");
        for message in errors {
            span.push_str(&escape_html(message));
            span.push_str("<br/>");
        }
        span.push_str("</span>");
        span
    };
    format!(
        concat!(
            "<div id=\"{form_id}\" class=\"review-container\">",
            "<div class=\"control-group{error_class}\">",
            "<input type=\"hidden\" name=\"lineNumber\" value=\"{line_number}\"/>",
            "<input type=\"hidden\" name=\"id\" value=\"{comment_id}\"/>",
            "<textarea name=\"body\" class=\"review-container-content\">{body}</textarea>",
            "{error_span}",
            "</div>",
            "<div>",
            "<input type=\"button\" name=\"{action}\" value=\"{submit_label}\" ",
            "class=\"btn btn-primary review-container-controls-ok\"/>",
            "<input type=\"button\" name=\"cancel-{action}\" value=\"{cancel_label}\" ",
            "class=\"btn review-container-controls-cancel\"/>",
            "</div>",
            "<span class=\"keymaps-caption\">{keymaps}</span>",
            "</div>"
        ),
        form_id = ADD_COMMENT_FORM_ID,
        error_class = error_class,
        line_number = line_number,
        comment_id = comment_id,
        body = escape_html(body),
        error_span = error_span,
        action = action,
        submit_label = escape_html(submit_label),
        cancel_label = escape_html(&labels.cancel),
        keymaps = escape_html(&labels.keymaps_hint),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment() -> ReviewComment {
        ReviewComment {
            id: 42,
            author_id: 5,
            author_username: "alice".to_owned(),
            line_number: 3,
            body: "plain body".to_owned(),
        }
    }

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(escape_html("<b>hi</b>"), "&lt;b&gt;hi&lt;/b&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("\"quoted\""), "&quot;quoted&quot;");
        assert_eq!(escape_html("it's"), "it&#39;s");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn comment_block_escapes_body_and_author() {
        let mut comment = comment();
        comment.body = "<script>alert(1)</script>".to_owned();
        comment.author_username = "<i>eve</i>".to_owned();

        let html = comment_html(&comment, false, "https://forum.example", &Labels::default());
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("&lt;i&gt;eve&lt;/i&gt;"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<i>eve</i>"));
    }

    #[test]
    fn comment_block_carries_hidden_identity_fields() {
        let html = comment_html(&comment(), false, "", &Labels::default());
        assert!(html.contains("name=\"id\" value=\"42\""));
        assert!(html.contains("name=\"authorId\" value=\"5\""));
        assert!(html.contains("/users/5/avatar"));
    }

    #[test]
    fn edit_link_follows_the_flag() {
        let labels = Labels::default();
        let with = comment_html(&comment(), true, "", &labels);
        let without = comment_html(&comment(), false, "", &labels);
        assert!(with.contains("name=\"edit-review\""));
        assert!(!without.contains("name=\"edit-review\""));
    }

    #[test]
    fn form_prefills_escaped_body() {
        let html = form_html("Edit", "edit", 0, 42, "a <b>draft</b>", &[], &Labels::default());
        assert!(html.contains(">a &lt;b&gt;draft&lt;/b&gt;</textarea>"));
        assert!(html.contains("name=\"id\" value=\"42\""));
        assert!(html.contains("name=\"edit\""));
        assert!(html.contains("name=\"cancel-edit\""));
        assert!(!html.contains("help-inline"));
    }

    #[test]
    fn form_renders_validation_errors_inline() {
        let errors = vec!["Too long".to_owned(), "No <html> allowed".to_owned()];
        let html = form_html("Add", "add", 7, 0, "draft", &errors, &Labels::default());
        assert!(html.contains("control-group error"));
        assert!(html.contains("Too long<br/>"));
        assert!(html.contains("No &lt;html&gt; allowed<br/>"));
    }
}
