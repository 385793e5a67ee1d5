use std::fmt::Write as _;

use chrono::NaiveDate;
use tracing::debug;

use super::super::layout::{BlockKind, PageModel, TextRole};

const STYLE: &str = r#"body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; max-width: 900px; margin: 40px auto; padding: 20px; background: #f5f5f5; }
.container { background: white; padding: 40px; border-radius: 10px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
h1 { color: #2c3e50; border-bottom: 3px solid #3498db; padding-bottom: 15px; margin-bottom: 30px; }
h2 { color: #34495e; background: #ecf0f1; padding: 12px 20px; border-left: 4px solid #3498db; margin-top: 30px; }
h3 { color: #34495e; font-size: 15px; margin: 18px 0 6px; }
.field { margin: 10px 0; padding: 12px; background: #f8f9fa; border-radius: 5px; display: grid; grid-template-columns: 250px 1fr; gap: 20px; }
.field-label { font-weight: 600; color: #555; }
.field-value { color: #2c3e50; font-size: 16px; font-weight: 500; white-space: pre-wrap; }
.empty-value { color: #999; font-style: italic; }
.note { color: #666; font-size: 13px; }
.instructions { background: #fff3cd; border-left: 4px solid #ffc107; padding: 20px; margin-bottom: 30px; border-radius: 5px; }
.footer { margin-top: 40px; color: #777; font-size: 13px; text-align: center; }
@media print { body { background: white; margin: 0; } .container { box-shadow: none; } .instructions { display: none; } }"#;

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Printable summary for copying values into the official form by hand. Section and field
/// order follow the page model; pagination is left to the browser.
pub fn render_html(model: &PageModel, generated_on: NaiveDate) -> String {
    let mut html = String::new();
    writeln!(html, "<!DOCTYPE html>\n<html lang=\"en\">\n<head>").expect("write head");
    writeln!(html, "<meta charset=\"UTF-8\">").expect("write charset");
    writeln!(
        html,
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
    )
    .expect("write viewport");
    writeln!(html, "<title>IMM 1294 Form Data Summary</title>").expect("write title");
    writeln!(html, "<style>\n{STYLE}\n</style>\n</head>\n<body>").expect("write style");
    writeln!(html, "<div class=\"container\">").expect("open container");
    writeln!(html, "<h1>IMM 1294 Study Permit Application - Data Summary</h1>")
        .expect("write heading");
    writeln!(
        html,
        "<div class=\"instructions\"><strong>How to use this summary:</strong><ol>\
         <li>Open the official IMM 1294 PDF in Adobe Acrobat Reader.</li>\
         <li>Keep this page open side by side with the form.</li>\
         <li>Copy each value below into the matching field of the form.</li>\
         <li>Review every page of the form before validating and saving it.</li></ol></div>"
    )
    .expect("write instructions");

    let mut in_section = false;
    let mut fields = 0usize;
    for block in model.pages.iter().flat_map(|page| page.blocks.iter()) {
        match &block.kind {
            BlockKind::SectionHeader { title, .. } => {
                if in_section {
                    writeln!(html, "</section>").expect("close section");
                }
                writeln!(html, "<section>\n<h2>{}</h2>", escape_html(title))
                    .expect("open section");
                in_section = true;
            }
            BlockKind::Field { label, value, .. } => {
                let value = if value.trim().is_empty() {
                    "<span class=\"empty-value\">Not provided</span>".to_string()
                } else {
                    escape_html(value)
                };
                writeln!(
                    html,
                    "<div class=\"field\"><div class=\"field-label\">{}</div><div class=\"field-value\">{}</div></div>",
                    escape_html(label),
                    value
                )
                .expect("write field");
                fields += 1;
            }
            BlockKind::Text { text, role } => match role {
                TextRole::Caption => {
                    writeln!(html, "<h3>{}</h3>", escape_html(text)).expect("write caption")
                }
                TextRole::Note => writeln!(html, "<p class=\"note\">{}</p>", escape_html(text))
                    .expect("write note"),
                TextRole::Heading | TextRole::Banner | TextRole::PageNumber | TextRole::Answer => {}
            },
        }
    }
    if in_section {
        writeln!(html, "</section>").expect("close section");
    }

    writeln!(
        html,
        "<div class=\"footer\">Generated on {}</div>",
        generated_on.format("%B %-d, %Y")
    )
    .expect("write footer");
    writeln!(html, "</div>\n</body>\n</html>").expect("close document");

    debug!(fields, bytes = html.len(), "html summary rendered");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_markup_characters() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }
}
