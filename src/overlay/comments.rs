//! Comment store sync: the initial fetch and per-comment rendering.

use tokio::sync::mpsc;

use crate::api::{self, ReviewComment};
use crate::markup;

use super::types::*;
use super::ReviewOverlay;

impl ReviewOverlay {
    /// Start the background fetch of this review's comment list.
    ///
    /// Fired once at attach; the result is applied by `poll` / `pump`. The
    /// user can open and submit the form before this settles - the two paths
    /// use separate receivers and touch disjoint parts of the view.
    pub(crate) fn load_comments(&mut self) {
        let (tx, rx) = mpsc::channel(1);
        self.comment_receiver = Some(rx);

        let transport = self.transport.clone();
        let review_id = self.page.code_review_id;
        tracing::debug!(review_id, "loading review comments");

        tokio::spawn(async move {
            let result = api::fetch_review_comments(transport.as_ref(), review_id).await;
            let _ = tx.send(result).await;
        });
    }

    /// Poll the comment fetch without blocking.
    pub(crate) fn poll_comment_updates(&mut self) {
        let Some(rx) = self.comment_receiver.as_mut() else {
            return;
        };

        match rx.try_recv() {
            Ok(result) => {
                self.comment_receiver = None;
                self.apply_comment_fetch(result);
            }
            Err(mpsc::error::TryRecvError::Empty) => {}
            Err(mpsc::error::TryRecvError::Disconnected) => {
                self.comment_receiver = None;
            }
        }
    }

    pub(crate) fn apply_comment_fetch(&mut self, result: CommentFetchResult) {
        match result {
            Ok(comments) => {
                tracing::debug!(count = comments.len(), "review comments loaded");
                for comment in comments {
                    self.render_comment(comment);
                }
            }
            Err(e) => {
                // Nothing was applied, so the view is still consistent.
                tracing::warn!(%e, "failed to load review comments");
                self.notifier.alert(&self.labels.unexpected_error);
            }
        }
    }

    /// Render one comment beneath its source line.
    ///
    /// Idempotent per comment id: a block that is already rendered is left
    /// alone. Comments pointing past the end of the source are dropped with
    /// a warning.
    pub(crate) fn render_comment(&mut self, comment: ReviewComment) {
        if self.view.contains_comment(comment.id) {
            tracing::debug!(id = comment.id, "comment already rendered, skipping");
            return;
        }

        let can_edit = self.capabilities.can_edit(comment.author_id);
        let html = markup::comment_html(&comment, can_edit, &self.page.base_url, &self.labels);

        let Some(line) = self.view.line_mut(comment.line_number) else {
            tracing::warn!(
                id = comment.id,
                line_number = comment.line_number,
                "comment points outside the source block"
            );
            return;
        };
        line.comments.push(RenderedComment {
            comment,
            html,
            hidden: false,
        });
    }

    /// Replace the rendered block with matching id in place and reveal it.
    pub(crate) fn update_comment(&mut self, comment: ReviewComment) {
        let can_edit = self.capabilities.can_edit(comment.author_id);
        let html = markup::comment_html(&comment, can_edit, &self.page.base_url, &self.labels);

        let Some(rendered) = self.view.find_comment_mut(comment.id) else {
            tracing::warn!(id = comment.id, "updated comment is not rendered");
            return;
        };
        rendered.comment = comment;
        rendered.html = html;
        rendered.hidden = false;
    }
}
