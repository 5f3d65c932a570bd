use crate::api::{ReviewComment, SubmitOutcome, TransportError};

/// Result of the background comment-list fetch, delivered over a channel.
pub(crate) type CommentFetchResult = Result<Vec<ReviewComment>, TransportError>;

/// Result of a background new/edit submission, delivered over a channel.
pub(crate) type SubmitResult = Result<SubmitOutcome, TransportError>;

/// A rendered inline comment block attached to a source line.
#[derive(Debug, Clone)]
pub struct RenderedComment {
    pub comment: ReviewComment,
    /// Pre-assembled, escaped HTML for the block.
    pub html: String,
    /// Hidden while the edit form stands in for this block; cancel or a
    /// successful edit reveals it again.
    pub hidden: bool,
}

/// One highlighted source line plus the comment blocks beneath it.
#[derive(Debug, Clone)]
pub struct SourceLine {
    /// Highlighted HTML fragment for the code itself.
    pub html: String,
    pub comments: Vec<RenderedComment>,
}

/// The component-owned stand-in for the post's DOM subtree.
///
/// Lines are stored 0-indexed; comment line numbers on the wire are
/// 1-indexed, so lookups go through [`SourceView::line`].
#[derive(Debug, Clone, Default)]
pub struct SourceView {
    pub lines: Vec<SourceLine>,
}

impl SourceView {
    pub(crate) fn from_highlighted(lines: Vec<String>) -> Self {
        Self {
            lines: lines
                .into_iter()
                .map(|html| SourceLine {
                    html,
                    comments: Vec::new(),
                })
                .collect(),
        }
    }

    /// Look up a line by its 1-indexed number.
    pub fn line(&self, line_number: u32) -> Option<&SourceLine> {
        (line_number >= 1)
            .then(|| self.lines.get(line_number as usize - 1))
            .flatten()
    }

    pub(crate) fn line_mut(&mut self, line_number: u32) -> Option<&mut SourceLine> {
        (line_number >= 1)
            .then(|| self.lines.get_mut(line_number as usize - 1))
            .flatten()
    }

    /// Whether a comment with this id is already rendered somewhere.
    pub fn contains_comment(&self, id: u64) -> bool {
        self.find_comment(id).is_some()
    }

    pub fn find_comment(&self, id: u64) -> Option<&RenderedComment> {
        self.lines
            .iter()
            .flat_map(|line| line.comments.iter())
            .find(|rendered| rendered.comment.id == id)
    }

    pub(crate) fn find_comment_mut(&mut self, id: u64) -> Option<&mut RenderedComment> {
        self.lines
            .iter_mut()
            .flat_map(|line| line.comments.iter_mut())
            .find(|rendered| rendered.comment.id == id)
    }
}

/// Which submit endpoint the open form targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// New comment on the given 1-indexed line.
    Add { line_number: u32 },
    /// Editing the rendered comment with this id.
    Edit { comment_id: u64 },
}

/// The single page-wide add/edit form.
#[derive(Debug, Clone)]
pub struct OpenForm {
    pub mode: FormMode,
    /// Submission guard: set before a request is dispatched, cleared
    /// unconditionally when it settles. Blocks new submissions only; it does
    /// not cancel the in-flight one.
    pub in_flight: bool,
    /// Validation messages rendered under the body field; each submission
    /// replaces the previous set.
    pub errors: Vec<String>,
    /// Body the form opens with (the current text for edit, empty for add).
    pub initial_body: String,
}

impl OpenForm {
    /// Line anchor written into the form markup. The edit form carries no
    /// line anchor, so it reports 0.
    pub fn line_number(&self) -> u32 {
        match self.mode {
            FormMode::Add { line_number } => line_number,
            FormMode::Edit { .. } => 0,
        }
    }

    pub fn comment_id(&self) -> u64 {
        match self.mode {
            FormMode::Add { .. } => 0,
            FormMode::Edit { comment_id } => comment_id,
        }
    }
}

/// Singleton form state; at most one form exists at a time, and every
/// transition is validated here rather than re-derived from rendered markup.
#[derive(Debug, Clone, Default)]
pub enum FormState {
    #[default]
    Closed,
    Open(OpenForm),
}

impl FormState {
    pub fn is_open(&self) -> bool {
        matches!(self, FormState::Open(_))
    }

    pub fn open(&self) -> Option<&OpenForm> {
        match self {
            FormState::Open(form) => Some(form),
            FormState::Closed => None,
        }
    }

    pub(crate) fn open_mut(&mut self) -> Option<&mut OpenForm> {
        match self {
            FormState::Open(form) => Some(form),
            FormState::Closed => None,
        }
    }
}

/// Where a click landed inside the overlay's subtree.
///
/// The host resolves raw events against its DOM and reports them here; the
/// overlay owns all transition decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// A source line, 1-indexed. Opens the add form when none is open.
    Line(u32),
    /// An existing rendered comment block. Must not open the add form.
    CommentBlock,
    /// The edit affordance on the comment with this id.
    EditLink(u64),
    /// The cancel button on the open form.
    Cancel,
}
