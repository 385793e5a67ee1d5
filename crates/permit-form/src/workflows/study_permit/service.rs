use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use super::checklist::{derive_checklist_as_of, ChecklistEntry, ChecklistSummary};
use super::domain::ApplicationRecord;
use super::layout::{LayoutEngine, LayoutOptions, PageModel};
use super::render::{fill_template, render_html, render_pdf, render_xfdf, RenderError, TemplateStore};
use super::rules::{RuleTable, ValidationMode};
use super::validation::{check_field, validate_as_of, FieldCheck, ValidationReport};
use crate::config::TemplateConfig;

const XFDF_CONTENT_TYPE: &str = "application/vnd.adobe.xfdf";

/// Source of "today" for date-relative rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Today {
    #[default]
    System,
    Fixed(NaiveDate),
}

impl Today {
    pub fn date(self) -> NaiveDate {
        match self {
            Today::System => Local::now().date_naive(),
            Today::Fixed(date) => date,
        }
    }
}

/// Output documents, each tied to the validation mode it is generated under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentTarget {
    /// Values written into the official fillable PDF.
    FilledTemplate,
    /// Core sections drawn from scratch.
    EssentialPdf,
    /// Every section drawn from scratch.
    CompletePdf,
    Xfdf,
    HtmlSummary,
}

impl DocumentTarget {
    pub const fn validation_mode(self) -> ValidationMode {
        match self {
            DocumentTarget::EssentialPdf => ValidationMode::Minimal,
            _ => ValidationMode::Complete,
        }
    }

    pub fn layout_options(self) -> LayoutOptions {
        match self {
            DocumentTarget::EssentialPdf => LayoutOptions::essential(),
            _ => LayoutOptions::default(),
        }
    }

    pub fn content_type(self) -> String {
        match self {
            DocumentTarget::FilledTemplate
            | DocumentTarget::EssentialPdf
            | DocumentTarget::CompletePdf => mime::APPLICATION_PDF.to_string(),
            DocumentTarget::Xfdf => XFDF_CONTENT_TYPE.to_string(),
            DocumentTarget::HtmlSummary => mime::TEXT_HTML_UTF_8.to_string(),
        }
    }

    pub const fn file_name(self) -> &'static str {
        match self {
            DocumentTarget::FilledTemplate => "study-permit-application.pdf",
            DocumentTarget::EssentialPdf => "imm1294-study-permit.pdf",
            DocumentTarget::CompletePdf => "imm1294-complete-application.pdf",
            DocumentTarget::Xfdf => "imm1294e-data.xfdf",
            DocumentTarget::HtmlSummary => "imm1294e-data-summary.html",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DocumentTarget::FilledTemplate => "filled template",
            DocumentTarget::EssentialPdf => "essential pdf",
            DocumentTarget::CompletePdf => "complete pdf",
            DocumentTarget::Xfdf => "xfdf",
            DocumentTarget::HtmlSummary => "html summary",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub target: DocumentTarget,
    pub bytes: Vec<u8>,
    pub pages: usize,
}

impl RenderedDocument {
    pub fn content_type(&self) -> String {
        self.target.content_type()
    }

    pub fn file_name(&self) -> &'static str {
        self.target.file_name()
    }
}

#[derive(Debug, Clone)]
pub enum RenderOutcome {
    Rendered(RenderedDocument),
    Invalid(ValidationReport),
}

#[derive(Debug, Clone, Serialize)]
pub struct ChecklistResponse {
    pub checklist: Vec<ChecklistEntry>,
    pub summary: ChecklistSummary,
}

#[derive(Debug, Error)]
pub enum FormServiceError {
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Request-level facade over validation, checklist derivation, layout, and rendering.
#[derive(Debug)]
pub struct FormService {
    templates: TemplateStore,
    today: Today,
}

impl FormService {
    pub fn new(templates: TemplateStore, today: Today) -> Self {
        Self { templates, today }
    }

    pub fn from_config(config: &TemplateConfig) -> Self {
        Self::new(TemplateStore::new(config.clone()), Today::System)
    }

    pub fn today(&self) -> NaiveDate {
        self.today.date()
    }

    pub fn validate(&self, record: &ApplicationRecord, mode: ValidationMode) -> ValidationReport {
        let report = validate_as_of(record, RuleTable::for_mode(mode), self.today());
        if !report.is_valid {
            info!(
                mode = mode.label(),
                invalid = report.summary.invalid_fields,
                "application record failed validation"
            );
        }
        report
    }

    pub fn checklist(&self, record: &ApplicationRecord) -> ChecklistResponse {
        let checklist = derive_checklist_as_of(record, self.today());
        let summary = ChecklistSummary::from_entries(&checklist);
        ChecklistResponse { checklist, summary }
    }

    pub fn check_field(&self, field_name: &str, value: &Value, context: &ApplicationRecord) -> FieldCheck {
        check_field(RuleTable::complete(), field_name, value, context, self.today())
    }

    pub fn layout(&self, record: &ApplicationRecord, target: DocumentTarget) -> PageModel {
        LayoutEngine::new(target.layout_options()).layout(record)
    }

    /// Validates under the target's mode and renders only a valid record.
    pub fn render(
        &self,
        record: &ApplicationRecord,
        target: DocumentTarget,
    ) -> Result<RenderOutcome, FormServiceError> {
        let report = self.validate(record, target.validation_mode());
        if !report.is_valid {
            return Ok(RenderOutcome::Invalid(report));
        }
        self.render_document(record, target).map(RenderOutcome::Rendered)
    }

    /// Renders without validating first.
    pub fn render_document(
        &self,
        record: &ApplicationRecord,
        target: DocumentTarget,
    ) -> Result<RenderedDocument, FormServiceError> {
        let model = self.layout(record, target);
        let bytes = match target {
            DocumentTarget::EssentialPdf | DocumentTarget::CompletePdf => render_pdf(&model)?,
            DocumentTarget::FilledTemplate => {
                let mapping = self.templates.required_mapping()?;
                let template = self.templates.pdf_template()?;
                fill_template(&template, &mapping, &model)?
            }
            DocumentTarget::Xfdf => {
                let mapping = self.templates.mapping()?;
                if mapping.is_none() {
                    warn!("no field mapping configured; xfdf fields are named by record path");
                }
                render_xfdf(&model, mapping.as_deref(), self.templates.pdf_template_name())?
                    .into_bytes()
            }
            DocumentTarget::HtmlSummary => render_html(&model, self.today()).into_bytes(),
        };

        info!(
            target = target.label(),
            pages = model.page_count(),
            bytes = bytes.len(),
            "document rendered"
        );
        Ok(RenderedDocument {
            target,
            bytes,
            pages: model.page_count(),
        })
    }
}
