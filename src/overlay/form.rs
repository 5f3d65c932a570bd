//! Form lifecycle: the single add/edit form and its submission guard.

use tokio::sync::mpsc;

use crate::api::{self, SubmitOutcome};

use super::types::*;
use super::ReviewOverlay;

impl ReviewOverlay {
    /// Open the add form on a line click.
    ///
    /// No-op when a form is already open, when the viewer may not leave
    /// comments on this branch, or when the line does not exist.
    pub(crate) fn open_add_form(&mut self, line_number: u32) {
        if !self.capabilities.can_leave_comments {
            return;
        }
        if self.form.is_open() {
            tracing::debug!("form already open, ignoring line click");
            return;
        }
        if self.view.line(line_number).is_none() {
            tracing::warn!(line_number, "line click outside the source block");
            return;
        }
        self.form = FormState::Open(OpenForm {
            mode: FormMode::Add { line_number },
            in_flight: false,
            errors: Vec::new(),
            initial_body: String::new(),
        });
    }

    /// Open the edit form over an existing comment, hiding its block.
    pub(crate) fn open_edit_form(&mut self, comment_id: u64) {
        if self.form.is_open() {
            tracing::debug!("form already open, ignoring edit click");
            return;
        }

        let Some(rendered) = self.view.find_comment(comment_id) else {
            tracing::warn!(comment_id, "edit click on unknown comment");
            return;
        };
        // The affordance is only rendered for permitted viewers; re-check in
        // case the host forwards a stale click.
        if !self.capabilities.can_edit(rendered.comment.author_id) {
            return;
        }
        let initial_body = rendered.comment.body.clone();

        if let Some(rendered) = self.view.find_comment_mut(comment_id) {
            rendered.hidden = true;
        }
        self.form = FormState::Open(OpenForm {
            mode: FormMode::Edit { comment_id },
            in_flight: false,
            errors: Vec::new(),
            initial_body,
        });
    }

    /// Close the form, re-revealing a hidden comment block for edit mode.
    ///
    /// The in-flight request, if any, is not cancelled, but its receiver is
    /// dropped here so the result can never be applied to a form it did not
    /// come from.
    pub(crate) fn cancel_form(&mut self) {
        if let FormState::Open(form) = &self.form {
            if let FormMode::Edit { comment_id } = form.mode {
                if let Some(rendered) = self.view.find_comment_mut(comment_id) {
                    rendered.hidden = false;
                }
            }
        }
        self.form = FormState::Closed;
        self.submit_receiver = None;
    }

    /// Submit the form with the body the user typed.
    ///
    /// Guarded: while a submission is in flight this is a no-op. Empty
    /// bodies are refused locally as a validation failure. The request runs
    /// on a background task; `poll` / `pump` applies the outcome.
    pub fn submit(&mut self, body: &str) {
        let Some(form) = self.form.open_mut() else {
            return;
        };
        if form.in_flight {
            tracing::debug!("submission already in flight, ignoring");
            return;
        }
        if body.trim().is_empty() {
            form.errors = vec![self.labels.empty_body.clone()];
            return;
        }

        form.in_flight = true;
        let mode = form.mode;
        let body = body.to_owned();
        let transport = self.transport.clone();
        let review_id = self.page.code_review_id;
        let branch_id = self.page.branch_id;

        let (tx, rx) = mpsc::channel(1);
        self.submit_receiver = Some(rx);

        tracing::debug!(?mode, body_len = body.len(), "dispatching comment submission");
        tokio::spawn(async move {
            let result = match mode {
                FormMode::Add { line_number } => {
                    api::create_review_comment(transport.as_ref(), review_id, line_number, &body)
                        .await
                }
                FormMode::Edit { comment_id } => {
                    api::edit_review_comment(transport.as_ref(), comment_id, &body, branch_id)
                        .await
                }
            };
            let _ = tx.send(result).await;
        });
    }

    /// Poll the submission result without blocking.
    pub(crate) fn poll_submit_result(&mut self) {
        let Some(rx) = self.submit_receiver.as_mut() else {
            return;
        };

        match rx.try_recv() {
            Ok(result) => {
                self.submit_receiver = None;
                self.apply_submit_result(result);
            }
            Err(mpsc::error::TryRecvError::Empty) => {}
            Err(mpsc::error::TryRecvError::Disconnected) => {
                self.submit_receiver = None;
            }
        }
    }

    /// Apply a settled submission.
    ///
    /// The guard clears on every path; only success closes the form.
    pub(crate) fn apply_submit_result(&mut self, result: SubmitResult) {
        let Some(form) = self.form.open_mut() else {
            tracing::debug!("submission settled against a closed form, dropping");
            return;
        };
        form.in_flight = false;
        let mode = form.mode;

        match result {
            Ok(SubmitOutcome::Saved(comment)) => {
                tracing::debug!(id = comment.id, "comment saved");
                self.form = FormState::Closed;
                match mode {
                    FormMode::Add { .. } => self.render_comment(comment),
                    FormMode::Edit { .. } => self.update_comment(comment),
                }
            }
            Ok(SubmitOutcome::Invalid(messages)) => {
                form.errors = messages.into_iter().map(|m| m.message).collect();
            }
            Err(e) => {
                tracing::warn!(%e, "comment submission failed");
                self.notifier.alert(&self.labels.unexpected_error);
            }
        }
    }
}
