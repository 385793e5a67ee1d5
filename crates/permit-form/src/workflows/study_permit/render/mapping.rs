use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::RenderError;

/// Record path to form field name, as produced by the template field extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    fields: BTreeMap<String, String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MappingFile {
    #[serde(default)]
    field_mapping: BTreeMap<String, String>,
}

impl FieldMapping {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(path, name)| (path.into(), name.into()))
                .collect(),
        }
    }

    /// Parses `{"fieldMapping": {"personalInfo.familyName": "..."}}`. Blank names are dropped.
    pub fn from_json(raw: &str) -> Result<Self, RenderError> {
        let file: MappingFile =
            serde_json::from_str(raw).map_err(|err| RenderError::Mapping(err.to_string()))?;
        Ok(Self::from_pairs(
            file.field_mapping
                .into_iter()
                .filter(|(_, name)| !name.trim().is_empty()),
        ))
    }

    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let raw = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                RenderError::MissingTemplate {
                    resource: "field mapping",
                    path: path.to_path_buf(),
                    hint: "extract the template's field names into a fieldMapping JSON file",
                }
            } else {
                RenderError::TemplateRead {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_json(&raw)
    }

    pub fn field_name(&self, record_path: &str) -> Option<&str> {
        self.fields.get(record_path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
