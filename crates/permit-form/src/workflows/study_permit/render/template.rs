use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, info, warn};

use super::super::layout::PageModel;
use super::{FieldMapping, RenderError};
use crate::config::TemplateConfig;

/// Reads the external fillable PDF and field mapping. The template is read on every request;
/// the mapping is kept after its first successful load.
#[derive(Debug)]
pub struct TemplateStore {
    config: TemplateConfig,
    mapping: Mutex<Option<Arc<FieldMapping>>>,
}

impl TemplateStore {
    pub fn new(config: TemplateConfig) -> Self {
        Self {
            config,
            mapping: Mutex::new(None),
        }
    }

    /// File name the XFDF export points the importer at.
    pub fn pdf_template_name(&self) -> &str {
        &self.config.pdf_template
    }

    pub fn pdf_template_path(&self) -> PathBuf {
        self.config.pdf_template_path()
    }

    pub fn pdf_template(&self) -> Result<Vec<u8>, RenderError> {
        let path = self.pdf_template_path();
        std::fs::read(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                RenderError::MissingTemplate {
                    resource: "PDF template",
                    path,
                    hint: "download the fillable IMM 1294 PDF into the template directory",
                }
            } else {
                RenderError::TemplateRead { path, source }
            }
        })
    }

    /// `None` when no mapping file is configured.
    pub fn mapping(&self) -> Result<Option<Arc<FieldMapping>>, RenderError> {
        let Some(path) = self.config.field_mapping_path() else {
            return Ok(None);
        };

        let mut cached = self.mapping.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(mapping) = cached.as_ref() {
            return Ok(Some(Arc::clone(mapping)));
        }

        let mapping = Arc::new(FieldMapping::load(&path)?);
        info!(
            path = %path.display(),
            fields = mapping.len(),
            "field mapping loaded"
        );
        *cached = Some(Arc::clone(&mapping));
        Ok(Some(mapping))
    }

    /// Mapping for renderers that cannot fall back to record paths.
    pub fn required_mapping(&self) -> Result<Arc<FieldMapping>, RenderError> {
        match self.mapping()? {
            Some(mapping) => Ok(mapping),
            None => Err(RenderError::MissingTemplate {
                resource: "field mapping",
                path: self.config.directory.join("field-mapping.json"),
                hint: "set FORM_FIELD_MAPPING to the mapping file for the fillable template",
            }),
        }
    }
}

/// Terminal form field with its fully qualified name.
struct FormField {
    id: ObjectId,
    name: String,
    partial: String,
    checkbox: bool,
}

fn decode_pdf_text(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xfe, 0xff]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|&byte| char::from(byte)).collect()
}

fn field_partial_name(dict: &Dictionary) -> Option<String> {
    match dict.get(b"T") {
        Ok(Object::String(bytes, _)) => Some(decode_pdf_text(bytes)),
        _ => None,
    }
}

fn is_checkbox(dict: &Dictionary, inherited: bool) -> bool {
    match dict.get(b"FT") {
        Ok(Object::Name(name)) => name.as_slice() == b"Btn",
        _ => inherited,
    }
}

fn reference_ids(object: &Object) -> Vec<ObjectId> {
    match object {
        Object::Array(items) => items
            .iter()
            .filter_map(|item| item.as_reference().ok())
            .collect(),
        _ => Vec::new(),
    }
}

fn collect_fields(
    doc: &Document,
    ids: Vec<ObjectId>,
    prefix: &str,
    inherited_checkbox: bool,
    depth: usize,
    out: &mut Vec<FormField>,
) {
    if depth > 32 {
        return;
    }
    for id in ids {
        let Ok(dict) = doc.get_dictionary(id) else {
            continue;
        };
        let partial = field_partial_name(dict);
        let name = match (&partial, prefix.is_empty()) {
            (Some(partial), true) => partial.clone(),
            (Some(partial), false) => format!("{prefix}.{partial}"),
            (None, _) => prefix.to_string(),
        };
        let checkbox = is_checkbox(dict, inherited_checkbox);

        let kids = dict.get(b"Kids").map(reference_ids).unwrap_or_default();
        let named_kids = kids.iter().any(|kid| {
            doc.get_dictionary(*kid)
                .map(|kid| kid.has(b"T"))
                .unwrap_or(false)
        });
        if named_kids {
            collect_fields(doc, kids, &name, checkbox, depth + 1, out);
        } else if let Some(partial) = partial {
            out.push(FormField {
                id,
                name,
                partial,
                checkbox,
            });
        }
    }
}

fn acroform(doc: &Document) -> Result<(Option<ObjectId>, Dictionary), RenderError> {
    let catalog = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .and_then(|root| doc.get_dictionary(root))
        .map_err(|err| RenderError::Template(err.to_string()))?;
    match catalog.get(b"AcroForm") {
        Ok(Object::Reference(id)) => doc
            .get_dictionary(*id)
            .map(|dict| (Some(*id), dict.clone()))
            .map_err(|err| RenderError::Template(err.to_string())),
        Ok(Object::Dictionary(dict)) => Ok((None, dict.clone())),
        _ => Err(RenderError::Template(
            "template has no interactive form fields".to_string(),
        )),
    }
}

fn checkbox_state(value: &str) -> &'static [u8] {
    match value {
        "Yes" | "[X]" | "true" => b"Yes",
        _ => b"Off",
    }
}

/// Writes mapped page-model values into the template's AcroForm fields. Mapped names match
/// either the fully qualified field name or its last segment.
pub fn fill_template(
    template: &[u8],
    mapping: &FieldMapping,
    model: &PageModel,
) -> Result<Vec<u8>, RenderError> {
    let mut doc =
        Document::load_mem(template).map_err(|err| RenderError::Template(err.to_string()))?;
    if doc.trailer.get(b"Encrypt").is_ok() {
        return Err(RenderError::Template(
            "template is encrypted; export XFDF data and import it into the form instead"
                .to_string(),
        ));
    }

    let (acroform_id, mut form) = acroform(&doc)?;
    let mut fields = Vec::new();
    let roots = form.get(b"Fields").map(reference_ids).unwrap_or_default();
    collect_fields(&doc, roots, "", false, 0, &mut fields);

    let mut by_name: HashMap<&str, &FormField> = HashMap::new();
    for field in &fields {
        by_name.insert(field.name.as_str(), field);
        by_name.entry(field.partial.as_str()).or_insert(field);
    }

    let mut updates = Vec::new();
    let mut unmatched = 0usize;
    for entry in model.fields() {
        let (Some(path), false) = (entry.path, entry.value.is_empty()) else {
            continue;
        };
        let Some(name) = mapping.field_name(path) else {
            continue;
        };
        match by_name.get(name) {
            Some(field) => updates.push((field.id, field.checkbox, entry.value.to_string())),
            None => {
                unmatched += 1;
                warn!(path, field = name, "mapped field missing from template");
            }
        }
    }

    for (id, checkbox, value) in &updates {
        let dict = doc
            .get_object_mut(*id)
            .and_then(Object::as_dict_mut)
            .map_err(|err| RenderError::Template(err.to_string()))?;
        if *checkbox {
            let state = checkbox_state(value).to_vec();
            dict.set("V", Object::Name(state.clone()));
            dict.set("AS", Object::Name(state));
        } else {
            dict.set("V", Object::string_literal(value.as_str()));
        }
    }

    form.set("NeedAppearances", true);
    match acroform_id {
        Some(id) => {
            doc.objects.insert(id, Object::Dictionary(form));
        }
        None => {
            let root = doc
                .trailer
                .get(b"Root")
                .and_then(Object::as_reference)
                .map_err(|err| RenderError::Template(err.to_string()))?;
            doc.get_object_mut(root)
                .and_then(Object::as_dict_mut)
                .map_err(|err| RenderError::Template(err.to_string()))?
                .set("AcroForm", Object::Dictionary(form));
        }
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|err| RenderError::Pdf(err.to_string()))?;
    debug!(
        filled = updates.len(),
        unmatched,
        template_fields = fields.len(),
        "template filled"
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_utf16_field_names() {
        let bytes = [0xfe, 0xff, 0x00, b'U', 0x00, b'C', 0x00, b'I'];
        assert_eq!(decode_pdf_text(&bytes), "UCI");
        assert_eq!(decode_pdf_text(b"FamilyName[0]"), "FamilyName[0]");
    }

    #[test]
    fn unconfigured_mapping_is_none_but_required_mapping_fails() {
        let store = TemplateStore::new(TemplateConfig::default());
        assert!(store.mapping().expect("no mapping configured").is_none());
        let err = store.required_mapping().expect_err("mapping required");
        assert!(err.is_missing_resource());
    }

    #[test]
    fn missing_template_names_the_file() {
        let store = TemplateStore::new(TemplateConfig {
            directory: PathBuf::from("no-such-dir"),
            ..TemplateConfig::default()
        });
        let err = store.pdf_template().expect_err("template missing");
        assert!(err.to_string().contains("imm1294e.pdf"));
    }

    #[test]
    fn garbage_template_is_rejected() {
        let err = fill_template(b"not a pdf", &FieldMapping::default(), &PageModel {
            pages: Vec::new(),
            truncations: Vec::new(),
        })
        .expect_err("not a pdf");
        assert!(matches!(err, RenderError::Template(_)));
    }
}
