use tracing::warn;

use super::super::domain::ListId;
use super::model::{
    Block, BlockKind, Page, PageModel, Point, Rect, TextRole, TextStyle, Truncation,
    TruncationReason, BODY, CAPTION, HEADING, MARGIN_BOTTOM, MARGIN_LEFT, MARGIN_RIGHT,
    MARGIN_TOP, SMALL, TITLE, VALUE,
};
use super::text::{text_width, wrap};
use super::{Overflow, RepeatPolicy};

const SECTION_STEP: f32 = 20.0;
const CAPTION_STEP: f32 = 12.0;
const STACKED_ROW: f32 = 30.0;
const INLINE_ROW: f32 = 18.0;
const BANNER_DEPTH: f32 = 30.0;
const CELL_GUTTER: f32 = 8.0;
/// Smallest row a header or caption is kept together with.
const KEEP_WITH_NEXT: f32 = STACKED_ROW;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Placement {
    /// Small label with the value on the line below.
    Below,
    /// Label and value share a baseline; the value starts at `value_x`.
    Beside { value_x: f32 },
}

/// One label/value cell of a row.
#[derive(Debug, Clone)]
pub(super) struct Cell {
    x: f32,
    label: String,
    value: String,
    path: Option<String>,
    placement: Placement,
    label_style: TextStyle,
}

impl Cell {
    pub(super) fn below(x: f32, label: &str, value: impl Into<String>) -> Self {
        Self {
            x,
            label: label.to_string(),
            value: value.into(),
            path: None,
            placement: Placement::Below,
            label_style: SMALL,
        }
    }

    pub(super) fn beside(x: f32, label: &str, value_x: f32, value: impl Into<String>) -> Self {
        Self {
            x,
            label: label.to_string(),
            value: value.into(),
            path: None,
            placement: Placement::Beside { value_x },
            label_style: CAPTION,
        }
    }

    /// A yes/no style question answered at the right edge.
    pub(super) fn question(x: f32, label: &str, value: impl Into<String>) -> Self {
        Self {
            label_style: BODY,
            ..Self::beside(x, label, MARGIN_RIGHT - 80.0, value)
        }
    }

    pub(super) fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Numbered form questions print their label in bold.
    pub(super) fn bold(mut self) -> Self {
        self.label_style = CAPTION;
        self
    }
}

/// Cell measured against its available width.
struct Measured {
    block: Block,
    height: f32,
}

fn measure(cell: Cell, right_edge: f32, top: f32) -> Measured {
    let label_width = match cell.placement {
        Placement::Below => right_edge - cell.x,
        Placement::Beside { value_x } => value_x - cell.x - 6.0,
    };
    let label_lines = wrap_or_blank(&cell.label, &cell.label_style, label_width);
    let label_depth = cell.label_style.leading() * (label_lines.len() - 1) as f32;

    let (value_at, value_width) = match cell.placement {
        Placement::Below => (Point::new(cell.x, top - label_depth - 12.0), right_edge - cell.x),
        Placement::Beside { value_x } => (Point::new(value_x, top), MARGIN_RIGHT - value_x),
    };
    let value_lines = if cell.value.is_empty() {
        Vec::new()
    } else {
        wrap_or_blank(&cell.value, &VALUE, value_width)
    };
    let value_depth = VALUE.leading() * value_lines.len().saturating_sub(1) as f32;

    let height = match cell.placement {
        Placement::Below => (top - value_at.y) + value_depth + (STACKED_ROW - 12.0),
        Placement::Beside { .. } => label_depth.max(value_depth) + INLINE_ROW,
    };

    Measured {
        block: Block {
            position: Point::new(cell.x, top),
            style: cell.label_style,
            kind: BlockKind::Field {
                label: cell.label,
                value: cell.value,
                path: cell.path,
                label_lines,
                value_at,
                value_style: VALUE,
                value_lines,
            },
        },
        height,
    }
}

fn wrap_or_blank(text: &str, style: &TextStyle, width: f32) -> Vec<String> {
    let lines = wrap(text, style, width.max(20.0));
    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

fn measure_row(cells: Vec<Cell>, top: f32) -> (Vec<Block>, f32) {
    let edges: Vec<f32> = cells
        .iter()
        .skip(1)
        .map(|cell| cell.x - CELL_GUTTER)
        .chain(std::iter::once(MARGIN_RIGHT))
        .collect();
    let mut height: f32 = 0.0;
    let blocks = cells
        .into_iter()
        .zip(edges)
        .map(|(cell, edge)| {
            let measured = measure(cell, edge, top);
            height = height.max(measured.height);
            measured.block
        })
        .collect();
    (blocks, height)
}

/// Running-cursor page builder. Every emit first checks that the block fits above the bottom
/// margin and opens a new page (with the continuation banner) when it does not.
pub(super) struct Composer {
    pages: Vec<Page>,
    cursor: f32,
    has_body: bool,
    banner: Option<(String, String)>,
    truncations: Vec<Truncation>,
}

impl Composer {
    pub(super) fn new() -> Self {
        Self {
            pages: vec![Page::new(1)],
            cursor: MARGIN_TOP,
            has_body: false,
            banner: None,
            truncations: Vec::new(),
        }
    }

    /// Name and date of birth repeated at the top of every continuation page.
    pub(super) fn set_banner(&mut self, name: String, date_of_birth: String) {
        self.banner = Some((name, date_of_birth));
    }

    fn fits(&self, height: f32) -> bool {
        self.cursor - height >= MARGIN_BOTTOM
    }

    fn ensure(&mut self, height: f32) {
        if !self.fits(height) {
            self.break_page();
        }
    }

    fn current(&mut self) -> &mut Page {
        let index = self.pages.len() - 1;
        &mut self.pages[index]
    }

    fn push(&mut self, block: Block) {
        self.has_body = true;
        self.current().blocks.push(block);
    }

    fn push_text(&mut self, at: Point, style: TextStyle, text: &str, role: TextRole) {
        let block = text_block(at, style, text, role);
        if matches!(role, TextRole::Banner | TextRole::Heading) {
            self.current().blocks.push(block);
        } else {
            self.push(block);
        }
    }

    pub(super) fn break_page(&mut self) {
        let number = self.pages.len() + 1;
        self.pages.push(Page::new(number));
        self.cursor = MARGIN_TOP;
        self.has_body = false;

        if let Some((name, date_of_birth)) = self.banner.clone() {
            self.push_text(Point::new(MARGIN_LEFT, MARGIN_TOP), BODY, "Applicant Name", TextRole::Banner);
            self.push_text(Point::new(MARGIN_LEFT + 100.0, MARGIN_TOP), VALUE, &name, TextRole::Banner);
            self.push_text(Point::new(400.0, MARGIN_TOP), BODY, "Date of Birth", TextRole::Banner);
            self.push_text(Point::new(480.0, MARGIN_TOP), VALUE, &date_of_birth, TextRole::Banner);
            self.cursor -= BANNER_DEPTH;
        }
    }

    /// Starts the next printed form page unless the current one is still empty.
    pub(super) fn form_page(&mut self) {
        if self.has_body {
            self.break_page();
        }
    }

    pub(super) fn gap(&mut self, height: f32) {
        self.cursor -= height;
    }

    /// Government header and two-line title at the top of the first page.
    pub(super) fn title(&mut self, lines: &[&str]) {
        let top = self.cursor;
        self.push_text(Point::new(MARGIN_LEFT, top), HEADING, "Government of Canada", TextRole::Heading);
        self.push_text(
            Point::new(MARGIN_RIGHT - 200.0, top),
            CAPTION,
            "PROTECTED WHEN COMPLETED - B",
            TextRole::Heading,
        );
        self.cursor -= 37.0;
        for line in lines {
            let at = Point::new(MARGIN_LEFT, self.cursor);
            self.push_text(at, TITLE, line, TextRole::Heading);
            self.cursor -= 15.0;
        }
        self.cursor -= 15.0;
    }

    pub(super) fn section(&mut self, title: &str) {
        self.ensure(SECTION_STEP + KEEP_WITH_NEXT);
        let top = self.cursor;
        self.push(Block {
            position: Point::new(MARGIN_LEFT, top),
            style: HEADING,
            kind: BlockKind::SectionHeader {
                title: title.to_string(),
                band: Rect {
                    x: MARGIN_LEFT - 5.0,
                    y: top - 4.0,
                    width: MARGIN_RIGHT - MARGIN_LEFT + 10.0,
                    height: 16.0,
                },
            },
        });
        self.cursor -= SECTION_STEP;
    }

    /// Bold question text without a value of its own; kept with the row that follows.
    pub(super) fn caption(&mut self, x: f32, text: &str) {
        let lines = wrap(text, &CAPTION, MARGIN_RIGHT - x);
        self.ensure(CAPTION_STEP * lines.len() as f32 + KEEP_WITH_NEXT);
        for line in lines {
            let at = Point::new(x, self.cursor);
            self.push_text(at, CAPTION, &line, TextRole::Caption);
            self.cursor -= CAPTION_STEP;
        }
    }

    pub(super) fn note(&mut self, x: f32, text: &str, style: TextStyle) {
        for line in wrap(text, &style, MARGIN_RIGHT - x) {
            let step = style.leading();
            self.ensure(step);
            let at = Point::new(x, self.cursor);
            self.push_text(at, style, &line, TextRole::Note);
            self.cursor -= step;
        }
    }

    pub(super) fn row(&mut self, cells: Vec<Cell>) {
        if cells.is_empty() {
            return;
        }
        let (_, height) = measure_row(cells.clone(), self.cursor);
        self.ensure(height);
        let (mut blocks, height) = measure_row(cells, self.cursor);
        if self.fits(height) {
            for block in blocks {
                self.push(block);
            }
            self.cursor -= height;
            return;
        }

        // Taller than a whole page: keep the value lines that fit and continue the rest
        // line by line, the way long answers do.
        let step = VALUE.leading();
        let mut overflow = Vec::new();
        for block in &mut blocks {
            if let BlockKind::Field {
                value_at,
                value_lines,
                ..
            } = &mut block.kind
            {
                let room = if value_at.y < MARGIN_BOTTOM {
                    0
                } else {
                    ((value_at.y - MARGIN_BOTTOM) / step).floor() as usize + 1
                };
                if value_lines.len() > room {
                    overflow.push((value_at.x, value_lines.split_off(room)));
                }
            }
        }
        for block in blocks {
            self.push(block);
        }

        self.cursor = MARGIN_BOTTOM;
        for (x, lines) in overflow {
            for line in lines {
                self.ensure(step);
                let at = Point::new(x, self.cursor);
                self.push_text(at, VALUE, &line, TextRole::Answer);
                self.cursor -= step;
            }
        }
        self.cursor -= STACKED_ROW - 12.0 - step;
    }

    fn rows_height(rows: &[Vec<Cell>]) -> f32 {
        rows.iter()
            .map(|row| measure_row(row.clone(), MARGIN_TOP).1)
            .sum()
    }

    /// Long free-text answer: label, then wrapped value lines that continue on the next page
    /// when the current one fills up.
    pub(super) fn answer(&mut self, x: f32, label: &str, value: &str, path: String) {
        let lines = wrap(value, &VALUE, MARGIN_RIGHT - x);
        let step = VALUE.leading();
        self.ensure(12.0 + STACKED_ROW);

        let top = self.cursor;
        let room = ((top - 12.0 - MARGIN_BOTTOM) / step).floor().max(1.0) as usize;
        let split = lines.len().min(room);
        let (first, rest) = lines.split_at(split);

        self.push(Block {
            position: Point::new(x, top),
            style: SMALL,
            kind: BlockKind::Field {
                label: label.to_string(),
                value: value.to_string(),
                path: Some(path),
                label_lines: vec![label.to_string()],
                value_at: Point::new(x, top - 12.0),
                value_style: VALUE,
                value_lines: first.to_vec(),
            },
        });
        self.cursor = top - 12.0 - step * first.len().saturating_sub(1) as f32 - (STACKED_ROW - 12.0);

        if !rest.is_empty() {
            self.cursor = top - 12.0 - step * (first.len() as f32);
        }
        for line in rest {
            self.ensure(step);
            let at = Point::new(x, self.cursor);
            self.push_text(at, VALUE, line, TextRole::Answer);
            self.cursor -= step;
        }
        if !rest.is_empty() {
            self.cursor -= STACKED_ROW - 12.0 - step;
        }
    }

    /// Emits one row group per list item under the repeat policy, recording anything dropped.
    pub(super) fn repeat<T>(
        &mut self,
        list: ListId,
        items: &[T],
        policy: RepeatPolicy,
        mut rows_for: impl FnMut(usize, &T) -> Vec<Vec<Cell>>,
    ) {
        let limit = policy.max_items.map_or(items.len(), |cap| cap.min(items.len()));
        for (index, item) in items.iter().enumerate().take(limit) {
            let rows = rows_for(index, item);
            let height = Self::rows_height(&rows);
            if !self.fits(height) {
                match policy.overflow {
                    Overflow::Paginate => self.break_page(),
                    Overflow::Truncate => {
                        self.truncate(list, index, items.len() - index, TruncationReason::PageFull);
                        return;
                    }
                }
            }
            for row in rows {
                self.row(row);
            }
        }
        if limit < items.len() {
            self.truncate(list, limit, items.len() - limit, TruncationReason::Cap);
        }
    }

    fn truncate(&mut self, list: ListId, kept: usize, dropped: usize, reason: TruncationReason) {
        warn!(
            list = list.label(),
            kept,
            dropped,
            ?reason,
            "repeating rows left out of the document"
        );
        self.truncations.push(Truncation {
            list,
            kept,
            dropped,
            reason,
        });
    }

    /// Stamps "PAGE i OF N" on every page and hands back the finished model.
    pub(super) fn finish(mut self) -> PageModel {
        let total = self.pages.len();
        for page in &mut self.pages {
            let text = format!("PAGE {} OF {}", page.number, total);
            let x = MARGIN_RIGHT - text_width(&text, &BODY).max(100.0);
            page.blocks.push(text_block(
                Point::new(x, MARGIN_TOP - 12.0),
                BODY,
                &text,
                TextRole::PageNumber,
            ));
        }
        PageModel {
            pages: self.pages,
            truncations: self.truncations,
        }
    }
}

fn text_block(at: Point, style: TextStyle, text: &str, role: TextRole) -> Block {
    Block {
        position: at,
        style,
        kind: BlockKind::Text {
            text: text.to_string(),
            role,
        },
    }
}
