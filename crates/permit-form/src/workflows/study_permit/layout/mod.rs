//! Document layout: turns an application record into pages of positioned blocks that every
//! render target draws from.

mod composer;
pub mod model;
mod sections;
mod text;

use tracing::{debug, info};

use super::domain::ApplicationRecord;
use composer::Composer;

pub use model::{
    Block, BlockKind, Color, FieldEntry, Font, Page, PageModel, Point, Rect, TextRole, TextStyle,
    Truncation, TruncationReason, MARGIN_BOTTOM, MARGIN_LEFT, MARGIN_RIGHT, MARGIN_TOP,
    PAGE_HEIGHT, PAGE_WIDTH,
};
pub use text::format_date;

/// Which slice of the form is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutProfile {
    /// Every section of the five-page form.
    #[default]
    Complete,
    /// Identity, language, passport, contact, study, and education only.
    Essential,
}

/// What happens to repeating rows that no longer fit on the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    Paginate,
    Truncate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatPolicy {
    pub max_items: Option<usize>,
    pub overflow: Overflow,
}

impl RepeatPolicy {
    /// Every item, continuing on new pages as needed.
    pub const fn paginate() -> Self {
        Self {
            max_items: None,
            overflow: Overflow::Paginate,
        }
    }

    /// At most `max_items`, and nothing past the end of the current page.
    pub const fn truncate(max_items: usize) -> Self {
        Self {
            max_items: Some(max_items),
            overflow: Overflow::Truncate,
        }
    }
}

impl Default for RepeatPolicy {
    fn default() -> Self {
        Self::paginate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutOptions {
    pub profile: LayoutProfile,
    pub previous_residences: RepeatPolicy,
    pub employment: RepeatPolicy,
}

impl LayoutOptions {
    pub fn essential() -> Self {
        Self {
            profile: LayoutProfile::Essential,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    options: LayoutOptions,
}

impl LayoutEngine {
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn layout(&self, record: &ApplicationRecord) -> PageModel {
        let mut composer = Composer::new();
        sections::compose(record, &self.options, &mut composer);
        let model = composer.finish();

        debug!(
            profile = ?self.options.profile,
            blocks = model.pages.iter().map(|page| page.blocks.len()).sum::<usize>(),
            "document laid out"
        );
        if !model.truncations.is_empty() {
            info!(
                truncations = model.truncations.len(),
                "document omits repeating rows"
            );
        }
        model
    }
}

/// Complete-profile layout with every repeating row paginated.
pub fn layout(record: &ApplicationRecord) -> PageModel {
    LayoutEngine::default().layout(record)
}
