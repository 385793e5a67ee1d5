use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::debug;

use super::super::layout::PageModel;
use super::{FieldMapping, RenderError};

const XFDF_NS: &str = "http://ns.adobe.com/xfdf/";

/// Import data for the official fillable form. Field names come from `mapping` when given,
/// otherwise from the record path, or the printed label for blocks without one.
pub fn render_xfdf(
    model: &PageModel,
    mapping: Option<&FieldMapping>,
    pdf_file_name: &str,
) -> Result<String, RenderError> {
    let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);
    let mut written = 0usize;

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(RenderError::Xml)?;
    let mut root = BytesStart::new("xfdf");
    root.push_attribute(("xmlns", XFDF_NS));
    root.push_attribute(("xml:space", "preserve"));
    xml.write_event(Event::Start(root)).map_err(RenderError::Xml)?;
    xml.write_event(Event::Start(BytesStart::new("fields")))
        .map_err(RenderError::Xml)?;

    for entry in model.fields() {
        let value = entry.value.trim();
        if value.is_empty() {
            continue;
        }
        let name = match (mapping, entry.path) {
            (Some(mapping), Some(path)) => match mapping.field_name(path) {
                Some(name) => name,
                None => continue,
            },
            (Some(_), None) => continue,
            (None, Some(path)) => path,
            (None, None) => entry.label,
        };

        let mut field = BytesStart::new("field");
        field.push_attribute(("name", name));
        xml.write_event(Event::Start(field)).map_err(RenderError::Xml)?;
        xml.write_event(Event::Start(BytesStart::new("value")))
            .map_err(RenderError::Xml)?;
        xml.write_event(Event::Text(BytesText::new(value)))
            .map_err(RenderError::Xml)?;
        xml.write_event(Event::End(BytesEnd::new("value")))
            .map_err(RenderError::Xml)?;
        xml.write_event(Event::End(BytesEnd::new("field")))
            .map_err(RenderError::Xml)?;
        written += 1;
    }

    xml.write_event(Event::End(BytesEnd::new("fields")))
        .map_err(RenderError::Xml)?;
    let mut reference = BytesStart::new("f");
    reference.push_attribute(("href", pdf_file_name));
    xml.write_event(Event::Empty(reference))
        .map_err(RenderError::Xml)?;
    xml.write_event(Event::End(BytesEnd::new("xfdf")))
        .map_err(RenderError::Xml)?;

    debug!(fields = written, mapped = mapping.is_some(), "xfdf rendered");
    String::from_utf8(xml.into_inner()).map_err(|err| {
        RenderError::Xml(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    })
}
