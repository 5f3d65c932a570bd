//! The inline review overlay: comment store sync, form lifecycle, and
//! permission-gated rendering for one code review post.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use crate::api::ApiTransport;
use crate::config::Labels;
use crate::highlight::Highlighter;
use crate::markup;
use crate::notify::Notifier;
use crate::page::PageContext;
use crate::permission::{CapabilityContext, PermissionService};

mod types;
pub use types::*;

mod comments;
mod form;

/// One overlay instance per code review post.
///
/// All state lives here: the highlighted view model, the singleton form, and
/// the receivers for background fetch/submit tasks. Collaborators are
/// injected; the overlay has no ambient globals.
pub struct ReviewOverlay {
    transport: Arc<dyn ApiTransport>,
    notifier: Arc<dyn Notifier>,
    labels: Labels,
    page: PageContext,
    /// Resolved once at attach, read-only afterwards.
    capabilities: CapabilityContext,
    view: SourceView,
    form: FormState,
    comment_receiver: Option<mpsc::Receiver<CommentFetchResult>>,
    submit_receiver: Option<mpsc::Receiver<SubmitResult>>,
}

impl ReviewOverlay {
    /// Attach the overlay to a code review post.
    ///
    /// Runs the page-load sequence: highlight the source, resolve the
    /// viewer's capabilities once, then start the initial comment fetch in
    /// the background. Returns `None` when the page is not in review mode.
    pub async fn attach(
        transport: Arc<dyn ApiTransport>,
        permissions: Arc<dyn PermissionService>,
        notifier: Arc<dyn Notifier>,
        labels: Labels,
        page: PageContext,
        source: &str,
        language: Option<&str>,
    ) -> Result<Option<Self>> {
        if !page.has_code_review {
            return Ok(None);
        }

        let highlighted = Highlighter::new()
            .highlight_lines(source, language)
            .context("Failed to highlight review source")?;

        let capabilities =
            CapabilityContext::resolve(permissions.as_ref(), page.branch_id, page.user_id)
                .await
                .context("Failed to resolve review capabilities")?;

        let mut overlay = Self {
            transport,
            notifier,
            labels,
            page,
            capabilities,
            view: SourceView::from_highlighted(highlighted),
            form: FormState::Closed,
            comment_receiver: None,
            submit_receiver: None,
        };
        overlay.load_comments();
        Ok(Some(overlay))
    }

    pub fn view(&self) -> &SourceView {
        &self.view
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn capabilities(&self) -> &CapabilityContext {
        &self.capabilities
    }

    /// Dispatch a click that landed inside the overlay's subtree.
    pub fn handle_click(&mut self, target: ClickTarget) {
        match target {
            ClickTarget::Line(line_number) => self.open_add_form(line_number),
            // Clicks on rendered comment blocks are swallowed so they never
            // reach the line-click path.
            ClickTarget::CommentBlock => {}
            ClickTarget::EditLink(comment_id) => self.open_edit_form(comment_id),
            ClickTarget::Cancel => self.cancel_form(),
        }
    }

    /// Apply any settled background results without blocking (event-loop
    /// tick). Hosts that drive the overlay from an async context can use
    /// [`ReviewOverlay::pump`] instead.
    pub fn poll(&mut self) {
        self.poll_comment_updates();
        self.poll_submit_result();
    }

    /// Await and apply one settled background result, the initial comment
    /// fetch first: while that receiver is live a pending submission waits
    /// behind it.
    pub async fn pump(&mut self) {
        if let Some(rx) = self.comment_receiver.as_mut() {
            let result = rx.recv().await;
            self.comment_receiver = None;
            if let Some(result) = result {
                self.apply_comment_fetch(result);
            }
            return;
        }
        if let Some(rx) = self.submit_receiver.as_mut() {
            let result = rx.recv().await;
            self.submit_receiver = None;
            if let Some(result) = result {
                self.apply_submit_result(result);
            }
        }
    }

    /// Assemble the whole post: highlighted lines, attached comment blocks,
    /// and the open form at its anchor.
    ///
    /// The add form sits before the first comment of its line; the edit form
    /// takes the place of the block it is editing.
    pub fn render_page(&self) -> String {
        let mut out = String::from("<ol class=\"linenums\">\n");
        for (index, line) in self.view.lines.iter().enumerate() {
            let line_number = index as u32 + 1;
            out.push_str("<li><span class=\"code-line\">");
            out.push_str(&line.html);
            out.push_str("</span>");

            if let Some(form) = self.form.open() {
                if form.mode == (FormMode::Add { line_number }) {
                    out.push_str(&self.render_form(form));
                }
            }
            for rendered in &line.comments {
                if rendered.hidden {
                    if let Some(form) = self.form.open() {
                        if form.mode == (FormMode::Edit { comment_id: rendered.comment.id }) {
                            out.push_str(&self.render_form(form));
                        }
                    }
                } else {
                    out.push_str(&rendered.html);
                }
            }
            out.push_str("</li>\n");
        }
        out.push_str("</ol>\n");
        out
    }

    fn render_form(&self, form: &OpenForm) -> String {
        let (submit_label, action) = match form.mode {
            FormMode::Add { .. } => (self.labels.add.as_str(), "add"),
            FormMode::Edit { .. } => (self.labels.edit.as_str(), "edit"),
        };
        markup::form_html(
            submit_label,
            action,
            form.line_number(),
            form.comment_id(),
            &form.initial_body,
            &form.errors,
            &self.labels,
        )
    }
}
