use std::path::PathBuf;

use lopdf::{dictionary, Document, Object, ObjectId};

use super::common::*;
use crate::config::TemplateConfig;
use crate::workflows::study_permit::domain::{ApplicationRecord, Text};
use crate::workflows::study_permit::layout::{layout, LayoutEngine, LayoutOptions};
use crate::workflows::study_permit::render::{
    fill_template, render_html, render_pdf, render_xfdf, FieldMapping, RenderError,
    TemplateStore,
};
use crate::workflows::study_permit::service::{
    DocumentTarget, FormService, FormServiceError, RenderOutcome, Today,
};

struct Fillable {
    bytes: Vec<u8>,
    family_name: ObjectId,
    language_test: ObjectId,
    acroform: ObjectId,
}

fn fillable_template() -> Fillable {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let family_name = doc.add_object(dictionary! {
        "FT" => "Tx",
        "T" => Object::string_literal("FamilyName"),
    });
    let language_test = doc.add_object(dictionary! {
        "FT" => "Btn",
        "T" => Object::string_literal("Taken"),
    });
    let group = doc.add_object(dictionary! {
        "T" => Object::string_literal("LanguageTest"),
        "Kids" => vec![language_test.into()],
    });
    let acroform = doc.add_object(dictionary! {
        "Fields" => vec![family_name.into(), group.into()],
    });
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
        "AcroForm" => acroform,
    });
    doc.trailer.set("Root", catalog);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("template saves");
    Fillable {
        bytes,
        family_name,
        language_test,
        acroform,
    }
}

fn template_mapping() -> FieldMapping {
    FieldMapping::from_pairs([
        ("personalInfo.familyName", "FamilyName"),
        ("languageInfo.languageTest", "LanguageTest.Taken"),
        ("passportInfo.number", "NotInTheTemplate"),
    ])
}

/// Writes the fillable template and its mapping into a fresh directory.
fn template_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("permit-form-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("template dir");
    std::fs::write(dir.join("imm1294e.pdf"), fillable_template().bytes).expect("template written");
    std::fs::write(
        dir.join("mapping.json"),
        r#"{"fieldMapping": {"personalInfo.familyName": "FamilyName", "uci": ""}}"#,
    )
    .expect("mapping written");
    dir
}

fn odd_name_record() -> ApplicationRecord {
    with_personal(record(), |personal| {
        personal.family_name = Text::new("O'Brien & <Sons>");
        personal.given_names = Text::new("\"Jack\"");
    })
}

#[test]
fn generated_pdf_loads_with_one_page_per_model_page() {
    let model = layout(&record());
    let bytes = render_pdf(&model).expect("pdf renders");
    assert!(bytes.starts_with(b"%PDF-1.5"));

    let doc = Document::load_mem(&bytes).expect("pdf parses");
    assert_eq!(doc.get_pages().len(), model.page_count());
}

#[test]
fn empty_record_still_renders_every_pdf_profile() {
    let record = ApplicationRecord::new();
    for options in [LayoutOptions::default(), LayoutOptions::essential()] {
        let model = LayoutEngine::new(options).layout(&record);
        let bytes = render_pdf(&model).expect("pdf renders");
        assert!(Document::load_mem(&bytes).is_ok());
    }
}

#[test]
fn xfdf_escapes_markup_in_values() {
    let model = layout(&odd_name_record());
    let xfdf = render_xfdf(&model, None, "imm1294e.pdf").expect("xfdf renders");

    assert!(xfdf.contains(r#"<xfdf xmlns="http://ns.adobe.com/xfdf/" xml:space="preserve">"#));
    assert!(xfdf.contains(r#"<field name="personalInfo.familyName">"#));
    assert!(xfdf.contains("O&apos;Brien &amp; &lt;Sons&gt;"));
    assert!(xfdf.contains("&quot;Jack&quot;"));
    assert!(!xfdf.contains("<Sons>"));
    assert!(xfdf.contains(r#"<f href="imm1294e.pdf"/>"#));
}

#[test]
fn xfdf_skips_empty_values() {
    let model = layout(&ApplicationRecord::new());
    let xfdf = render_xfdf(&model, None, "imm1294e.pdf").expect("xfdf renders");
    assert!(!xfdf.contains("personalInfo.familyName"));
    assert!(!xfdf.contains("<value></value>"));
}

#[test]
fn xfdf_uses_mapped_names_only() {
    let model = layout(&record());
    let mapping = template_mapping();
    let xfdf = render_xfdf(&model, Some(&mapping), "imm1294e.pdf").expect("xfdf renders");

    assert!(xfdf.contains(r#"<field name="FamilyName">"#));
    assert!(xfdf.contains(r#"<field name="NotInTheTemplate">"#));
    assert!(!xfdf.contains("personalInfo.givenNames"));
    assert_eq!(xfdf.matches("<field ").count(), 3);
}

#[test]
fn html_summary_keeps_section_order_and_escapes_values() {
    let model = layout(&odd_name_record());
    let html = render_html(&model, today());

    let personal = html.find("<h2>PERSONAL DETAILS</h2>").expect("personal section");
    let passport = html.find("<h2>PASSPORT</h2>").expect("passport section");
    let background = html
        .find("<h2>BACKGROUND INFORMATION</h2>")
        .expect("background section");
    assert!(personal < passport && passport < background);

    assert!(html.contains("O&#39;Brien &amp; &lt;Sons&gt;"));
    assert!(html.contains("Generated on October 16, 2026"));
    assert!(!html.contains("PAGE 1 OF"));
}

#[test]
fn html_summary_marks_missing_answers() {
    let html = render_html(&layout(&ApplicationRecord::new()), today());
    assert!(html.contains("Not provided"));
    assert_eq!(html.matches("<section>").count(), html.matches("</section>").count());
}

#[test]
fn template_fill_sets_values_and_need_appearances() {
    let template = fillable_template();
    let model = layout(&record());
    let filled = fill_template(&template.bytes, &template_mapping(), &model).expect("template fills");

    let doc = Document::load_mem(&filled).expect("filled pdf parses");
    let family = doc.get_dictionary(template.family_name).expect("family field");
    match family.get(b"V") {
        Ok(Object::String(bytes, _)) => assert_eq!(bytes.as_slice(), b"Smith"),
        other => panic!("unexpected family name value: {other:?}"),
    }

    let checkbox = doc.get_dictionary(template.language_test).expect("checkbox field");
    assert!(matches!(checkbox.get(b"V"), Ok(Object::Name(name)) if name.as_slice() == b"Yes"));
    assert!(matches!(checkbox.get(b"AS"), Ok(Object::Name(name)) if name.as_slice() == b"Yes"));

    let form = doc.get_dictionary(template.acroform).expect("acroform");
    assert!(matches!(form.get(b"NeedAppearances"), Ok(Object::Boolean(true))));
}

#[test]
fn template_store_loads_and_memoises_the_mapping() {
    let dir = template_dir("store");
    let store = TemplateStore::new(TemplateConfig {
        directory: dir.clone(),
        field_mapping: Some("mapping.json".to_string()),
        ..TemplateConfig::default()
    });

    let mapping = store.required_mapping().expect("mapping loads");
    assert_eq!(mapping.len(), 1);
    assert_eq!(mapping.field_name("personalInfo.familyName"), Some("FamilyName"));

    std::fs::remove_file(dir.join("mapping.json")).expect("mapping removed");
    let cached = store.required_mapping().expect("mapping cached");
    assert_eq!(cached.len(), 1);
    assert!(!store.pdf_template().expect("template readable").is_empty());
}

#[test]
fn service_fills_the_configured_template() {
    let dir = template_dir("service");
    let service = FormService::new(
        TemplateStore::new(TemplateConfig {
            directory: dir,
            field_mapping: Some("mapping.json".to_string()),
            ..TemplateConfig::default()
        }),
        Today::Fixed(today()),
    );

    let outcome = service
        .render(&record(), DocumentTarget::FilledTemplate)
        .expect("template renders");
    let RenderOutcome::Rendered(document) = outcome else {
        panic!("example record should be valid");
    };
    assert_eq!(document.file_name(), "study-permit-application.pdf");
    assert_eq!(document.content_type(), "application/pdf");
    assert!(Document::load_mem(&document.bytes).is_ok());
}

#[test]
fn missing_template_surfaces_as_missing_resource() {
    let err = form_service()
        .render(&record(), DocumentTarget::FilledTemplate)
        .expect_err("no template configured");
    let FormServiceError::Render(err) = err;
    assert!(err.is_missing_resource());
}

#[test]
fn essential_documents_only_need_the_critical_fields() {
    let record = with_study(record(), |study| study.dli_number = Text::new("123456789"));
    let service = form_service();

    let essential = service
        .render(&record, DocumentTarget::EssentialPdf)
        .expect("essential renders");
    assert!(matches!(essential, RenderOutcome::Rendered(_)));

    let complete = service
        .render(&record, DocumentTarget::CompletePdf)
        .expect("validation runs");
    let RenderOutcome::Invalid(report) = complete else {
        panic!("complete pdf should reject an invalid DLI");
    };
    assert!(report.errors.paths().contains(&"studyDetails.dliNumber".to_string()));
}

#[test]
fn every_target_names_its_download() {
    let service = form_service();
    let record = record();
    for (target, content_type, file_name) in [
        (DocumentTarget::EssentialPdf, "application/pdf", "imm1294-study-permit.pdf"),
        (
            DocumentTarget::CompletePdf,
            "application/pdf",
            "imm1294-complete-application.pdf",
        ),
        (DocumentTarget::Xfdf, "application/vnd.adobe.xfdf", "imm1294e-data.xfdf"),
        (
            DocumentTarget::HtmlSummary,
            "text/html; charset=utf-8",
            "imm1294e-data-summary.html",
        ),
    ] {
        let document = service
            .render_document(&record, target)
            .expect("document renders");
        assert_eq!(document.content_type(), content_type);
        assert_eq!(document.file_name(), file_name);
        assert!(!document.bytes.is_empty());
        assert!(document.pages >= 1);
    }
}
