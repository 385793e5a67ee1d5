use super::super::domain::ListId;

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN_LEFT: f32 = 50.0;
pub const MARGIN_RIGHT: f32 = 562.0;
pub const MARGIN_TOP: f32 = 742.0;
pub const MARGIN_BOTTOM: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    /// Values entered by the applicant.
    pub const FILLED: Color = Color::rgb(0.0, 0.2, 0.5);
    pub const BAND: Color = Color::rgb(0.85, 0.85, 0.85);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub size: f32,
    pub color: Color,
}

impl TextStyle {
    pub const fn new(font: Font, size: f32, color: Color) -> Self {
        Self { font, size, color }
    }

    /// Baseline-to-baseline distance for wrapped lines.
    pub fn leading(&self) -> f32 {
        (self.size * 1.25).round()
    }
}

pub const TITLE: TextStyle = TextStyle::new(Font::Bold, 14.0, Color::BLACK);
pub const HEADING: TextStyle = TextStyle::new(Font::Bold, 11.0, Color::BLACK);
pub const CAPTION: TextStyle = TextStyle::new(Font::Bold, 9.0, Color::BLACK);
pub const BODY: TextStyle = TextStyle::new(Font::Regular, 9.0, Color::BLACK);
pub const SMALL: TextStyle = TextStyle::new(Font::Regular, 8.0, Color::BLACK);
pub const VALUE: TextStyle = TextStyle::new(Font::Regular, 9.0, Color::FILLED);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    /// Government header and form title on the first page.
    Heading,
    /// Applicant name / date of birth line on continuation pages.
    Banner,
    PageNumber,
    /// Question numbers and sub-headings that carry no value.
    Caption,
    Note,
    /// Continuation lines of a long answer split across pages.
    Answer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    SectionHeader {
        title: String,
        band: Rect,
    },
    /// A label and the applicant's answer. `label_lines` and `value_lines` are the wrapped
    /// renditions drawn from `position` and `value_at`; `label` and `value` keep the full text.
    Field {
        label: String,
        value: String,
        path: Option<String>,
        label_lines: Vec<String>,
        value_at: Point,
        value_style: TextStyle,
        value_lines: Vec<String>,
    },
    Text {
        text: String,
        role: TextRole,
    },
}

/// One positioned, styled element. `position` is the baseline origin of the first line.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub position: Point,
    pub style: TextStyle,
    pub kind: BlockKind,
}

impl Block {
    /// Lowest y coordinate any part of the block occupies.
    pub fn lowest_y(&self) -> f32 {
        match &self.kind {
            BlockKind::SectionHeader { band, .. } => band.y.min(self.position.y),
            BlockKind::Field {
                label_lines,
                value_at,
                value_style,
                value_lines,
                ..
            } => {
                let label_bottom = self.position.y
                    - self.style.leading() * label_lines.len().saturating_sub(1) as f32;
                let value_bottom = value_at.y
                    - value_style.leading() * value_lines.len().saturating_sub(1) as f32;
                label_bottom.min(value_bottom)
            }
            BlockKind::Text { .. } => self.position.y,
        }
    }

    pub fn text_role(&self) -> Option<TextRole> {
        match &self.kind {
            BlockKind::Text { role, .. } => Some(*role),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: usize,
    pub blocks: Vec<Block>,
}

impl Page {
    pub(super) fn new(number: usize) -> Self {
        Self {
            number,
            blocks: Vec::new(),
        }
    }

    /// Concatenated text of the page's banner blocks.
    pub fn banner_text(&self) -> String {
        self.blocks
            .iter()
            .filter_map(|block| match &block.kind {
                BlockKind::Text {
                    text,
                    role: TextRole::Banner,
                } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Why rows of a repeating list were left out of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncationReason {
    /// More rows than the configured cap.
    Cap,
    /// The page filled up under the truncate overflow policy.
    PageFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    pub list: ListId,
    pub kept: usize,
    pub dropped: usize,
    pub reason: TruncationReason,
}

/// Render-target-agnostic document: pages of positioned blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct PageModel {
    pub pages: Vec<Page>,
    pub truncations: Vec<Truncation>,
}

impl PageModel {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Fields in document order, the shared source for the data-export adapters.
    pub fn fields(&self) -> impl Iterator<Item = FieldEntry<'_>> {
        self.pages.iter().flat_map(|page| {
            page.blocks.iter().filter_map(|block| match &block.kind {
                BlockKind::Field {
                    label, value, path, ..
                } => Some(FieldEntry {
                    label,
                    value,
                    path: path.as_deref(),
                }),
                _ => None,
            })
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldEntry<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub path: Option<&'a str>,
}
