use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

use super::super::layout::{
    Block, BlockKind, Color, Font, Page, PageModel, Point, TextStyle, PAGE_HEIGHT, PAGE_WIDTH,
};
use super::RenderError;

const TITLE: &str = "IMM 1294 - Application for Study Permit Made Outside of Canada";
const PRODUCER: &str = "permit-form";

fn font_key(font: Font) -> &'static str {
    match font {
        Font::Regular => "F1",
        Font::Bold => "F2",
    }
}

/// Latin-1 subset of WinAnsi; anything outside it prints as `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            code @ 0x20..=0x7e | code @ 0xa0..=0xff => code as u8,
            0x2018 | 0x2019 => b'\'',
            0x201c | 0x201d => b'"',
            0x2013 | 0x2014 => b'-',
            _ => b'?',
        })
        .collect()
}

#[derive(Default)]
struct PageWriter {
    operations: Vec<Operation>,
}

impl PageWriter {
    fn fill_color(&mut self, color: Color) {
        self.operations.push(Operation::new(
            "rg",
            vec![color.r.into(), color.g.into(), color.b.into()],
        ));
    }

    fn text(&mut self, at: Point, style: &TextStyle, text: &str) {
        if text.is_empty() {
            return;
        }
        self.fill_color(style.color);
        self.operations.push(Operation::new("BT", vec![]));
        self.operations.push(Operation::new(
            "Tf",
            vec![Object::Name(font_key(style.font).as_bytes().to_vec()), style.size.into()],
        ));
        self.operations
            .push(Operation::new("Td", vec![at.x.into(), at.y.into()]));
        self.operations.push(Operation::new(
            "Tj",
            vec![Object::String(win_ansi(text), StringFormat::Literal)],
        ));
        self.operations.push(Operation::new("ET", vec![]));
    }

    fn lines(&mut self, at: Point, style: &TextStyle, lines: &[String]) {
        let leading = style.leading();
        for (index, line) in lines.iter().enumerate() {
            let y = at.y - leading * index as f32;
            self.text(Point::new(at.x, y), style, line);
        }
    }

    fn block(&mut self, block: &Block) {
        match &block.kind {
            BlockKind::SectionHeader { title, band } => {
                self.fill_color(Color::BAND);
                self.operations.push(Operation::new(
                    "re",
                    vec![
                        band.x.into(),
                        band.y.into(),
                        band.width.into(),
                        band.height.into(),
                    ],
                ));
                self.operations.push(Operation::new("f", vec![]));
                self.text(block.position, &block.style, title);
            }
            BlockKind::Field {
                label_lines,
                value_at,
                value_style,
                value_lines,
                ..
            } => {
                self.lines(block.position, &block.style, label_lines);
                self.lines(*value_at, value_style, value_lines);
            }
            BlockKind::Text { text, .. } => self.text(block.position, &block.style, text),
        }
    }

    fn encode(self) -> Result<Vec<u8>, RenderError> {
        Content {
            operations: self.operations,
        }
        .encode()
        .map_err(|err| RenderError::Pdf(err.to_string()))
    }
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    page: &Page,
) -> Result<ObjectId, RenderError> {
    let mut writer = PageWriter::default();
    for block in &page.blocks {
        writer.block(block);
    }
    let content_id = doc.add_object(Stream::new(dictionary! {}, writer.encode()?));
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    }))
}

/// Draws the page model into a standalone PDF. Needs no external files.
pub fn render_pdf(model: &PageModel) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids = Vec::with_capacity(model.pages.len());
    for page in &model.pages {
        kids.push(Object::Reference(add_page(&mut doc, pages_id, page)?));
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Count" => kids.len() as i64,
        "Kids" => kids,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(TITLE),
        "Producer" => Object::string_literal(PRODUCER),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|err| RenderError::Pdf(err.to_string()))?;
    debug!(pages = model.page_count(), bytes = bytes.len(), "pdf rendered");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_ansi_keeps_latin1_and_replaces_the_rest() {
        assert_eq!(win_ansi("Zoë – 北"), vec![b'Z', b'o', 0xeb, b' ', b'-', b' ', b'?']);
    }
}
