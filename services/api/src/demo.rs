use crate::cli::{ChecklistArgs, RenderArgs, ValidateArgs};
use crate::infra::{cli_form_service, load_record};
use chrono::NaiveDate;
use clap::Args;
use permit_form::error::AppError;
use permit_form::workflows::study_permit::{
    example_record, ApplicationRecord, DocumentTarget, FormService, FormServiceError,
    RenderOutcome, ValidationMode, ValidationReport,
};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the evaluation date (defaults to today).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Write every rendered document into this directory.
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let ValidateArgs {
        record,
        minimal,
        today,
    } = args;

    let service = cli_form_service(today)?;
    let record = load_record(&record)?;
    let mode = if minimal {
        ValidationMode::Minimal
    } else {
        ValidationMode::Complete
    };

    let report = service.validate(&record, mode);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) fn run_checklist(args: ChecklistArgs) -> Result<(), AppError> {
    let service = cli_form_service(args.today)?;
    let record = load_record(&args.record)?;
    let checklist = service.checklist(&record);
    println!("{}", serde_json::to_string_pretty(&checklist)?);
    Ok(())
}

pub(crate) fn run_render(args: RenderArgs) -> Result<(), AppError> {
    let RenderArgs {
        record,
        format,
        output,
        today,
    } = args;

    let service = cli_form_service(today)?;
    let record = load_record(&record)?;
    let target = format.target();

    let document = match render(&service, &record, target)? {
        RenderOutcome::Rendered(document) => document,
        RenderOutcome::Invalid(report) => {
            println!(
                "Application is not ready for the {} ({} of {} fields invalid):",
                target.label(),
                report.summary.invalid_fields,
                report.summary.total_fields
            );
            print_errors(&report);
            return Ok(());
        }
    };

    let path = output.unwrap_or_else(|| PathBuf::from(document.file_name()));
    std::fs::write(&path, &document.bytes)?;
    println!(
        "Wrote {} ({} pages, {} bytes) to {}",
        target.label(),
        document.pages,
        document.bytes.len(),
        path.display()
    );
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, output_dir } = args;

    let service = cli_form_service(today)?;
    let record = example_record();
    let applicant = record.personal_info();

    println!("IMM 1294 study permit demo");
    println!(
        "Applicant: {}, {} (evaluated {})",
        applicant.family_name.as_str(),
        applicant.given_names.as_str(),
        service.today()
    );

    println!("\nValidation");
    for mode in [ValidationMode::Complete, ValidationMode::Minimal] {
        let report = service.validate(&record, mode);
        println!(
            "- {}: {} ({}/{} fields valid)",
            mode.label(),
            if report.is_valid { "valid" } else { "invalid" },
            report.summary.valid_fields,
            report.summary.total_fields
        );
        if !report.is_valid {
            print_errors(&report);
        }
    }

    let checklist = service.checklist(&record);
    println!(
        "\nDocument checklist: {} documents ({} required, {} optional)",
        checklist.summary.total_documents,
        checklist.summary.required_documents,
        checklist.summary.optional_documents
    );
    for entry in &checklist.checklist {
        let marker = if entry.required { "required" } else { "optional" };
        println!("- [{}] {} ({})", marker, entry.title, entry.category.label());
    }

    let model = service.layout(&record, DocumentTarget::CompletePdf);
    println!("\nComplete layout: {} pages", model.page_count());
    for truncation in &model.truncations {
        println!(
            "- {}: kept {}, dropped {} ({:?})",
            truncation.list.label(),
            truncation.kept,
            truncation.dropped,
            truncation.reason
        );
    }

    if let Some(dir) = &output_dir {
        std::fs::create_dir_all(dir)?;
    }

    println!("\nRendered documents");
    for target in [
        DocumentTarget::EssentialPdf,
        DocumentTarget::CompletePdf,
        DocumentTarget::Xfdf,
        DocumentTarget::HtmlSummary,
        DocumentTarget::FilledTemplate,
    ] {
        match render(&service, &record, target) {
            Ok(RenderOutcome::Rendered(document)) => {
                println!(
                    "- {}: {} pages, {} bytes -> {}",
                    target.label(),
                    document.pages,
                    document.bytes.len(),
                    document.file_name()
                );
                if let Some(dir) = &output_dir {
                    std::fs::write(dir.join(document.file_name()), &document.bytes)?;
                }
            }
            Ok(RenderOutcome::Invalid(report)) => println!(
                "- {}: rejected with {} invalid fields",
                target.label(),
                report.summary.invalid_fields
            ),
            Err(err) => println!("- {}: unavailable ({})", target.label(), err),
        }
    }

    Ok(())
}

fn render(
    service: &FormService,
    record: &ApplicationRecord,
    target: DocumentTarget,
) -> Result<RenderOutcome, AppError> {
    service
        .render(record, target)
        .map_err(|FormServiceError::Render(err)| AppError::from(err))
}

fn print_errors(report: &ValidationReport) {
    for (path, message) in report.errors.entries() {
        println!("  - {}: {}", path, message);
    }
}
