//! IMM 1294 study permit application: the typed record, its rule-table validator, the
//! document checklist, the page layout engine, and the render adapters and HTTP routes
//! built on them.

pub(crate) mod calendar;
pub mod checklist;
pub mod domain;
pub mod layout;
pub mod render;
pub mod router;
pub mod rules;
mod sample;
pub mod service;
pub mod tips;
pub mod validation;

#[cfg(test)]
mod tests;

pub use checklist::{
    derive_checklist, derive_checklist_as_of, CategoryCounts, ChecklistEntry, ChecklistSummary,
    DocumentCategory,
};
pub use domain::{ApplicationRecord, FieldRef, Flag, ListId, SectionId, Text};
pub use layout::{layout, LayoutEngine, LayoutOptions, LayoutProfile, PageModel, RepeatPolicy};
pub use render::{FieldMapping, RenderError, TemplateStore};
pub use router::{form_router, FormApi};
pub use rules::{RuleTable, ValidationMode};
pub use sample::example_record;
pub use service::{
    ChecklistResponse, DocumentTarget, FormService, FormServiceError, RenderOutcome,
    RenderedDocument, Today,
};
pub use tips::{TipGenerator, TipResponse, TipService, TipSource};
pub use validation::{check_field, validate, validate_as_of, FieldCheck, ValidationReport};
