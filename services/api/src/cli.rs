use crate::demo::{run_checklist, run_demo, run_render, run_validate, DemoArgs};
use crate::server;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use permit_form::error::AppError;
use permit_form::workflows::study_permit::DocumentTarget;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "IMM 1294 Study Permit Form Service",
    about = "Validate, check, and render IMM 1294 study permit applications",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Validate an application record and print the report as JSON
    Validate(ValidateArgs),
    /// Render an application record to a document
    Render(RenderArgs),
    /// Print the supporting-document checklist for an application record
    Checklist(ChecklistArgs),
    /// Run the whole pipeline against the built-in example applicant
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Application record JSON (the client's `formData` object)
    #[arg(long)]
    pub(crate) record: PathBuf,
    /// Check only the core fields required for the essential PDF
    #[arg(long)]
    pub(crate) minimal: bool,
    /// Evaluation date for age and expiry rules (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Every section drawn from scratch
    Pdf,
    /// Core sections drawn from scratch
    EssentialPdf,
    /// Values written into the configured fillable template
    Template,
    Xfdf,
    Html,
}

impl OutputFormat {
    pub(crate) fn target(self) -> DocumentTarget {
        match self {
            OutputFormat::Pdf => DocumentTarget::CompletePdf,
            OutputFormat::EssentialPdf => DocumentTarget::EssentialPdf,
            OutputFormat::Template => DocumentTarget::FilledTemplate,
            OutputFormat::Xfdf => DocumentTarget::Xfdf,
            OutputFormat::Html => DocumentTarget::HtmlSummary,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct RenderArgs {
    /// Application record JSON (the client's `formData` object)
    #[arg(long)]
    pub(crate) record: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Pdf)]
    pub(crate) format: OutputFormat,
    /// Destination file (defaults to the document's standard file name)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct ChecklistArgs {
    /// Application record JSON (the client's `formData` object)
    #[arg(long)]
    pub(crate) record: PathBuf,
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Validate(args) => run_validate(args),
        Command::Render(args) => run_render(args),
        Command::Checklist(args) => run_checklist(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["permit-form-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn render_accepts_kebab_case_formats() {
        let cli = Cli::try_parse_from([
            "permit-form-api",
            "render",
            "--record",
            "record.json",
            "--format",
            "essential-pdf",
        ])
        .expect("parses");
        let Some(Command::Render(args)) = cli.command else {
            panic!("expected render command");
        };
        assert_eq!(args.format.target(), DocumentTarget::EssentialPdf);
        assert!(args.output.is_none());
    }

    #[test]
    fn validate_rejects_malformed_dates() {
        let err = Cli::try_parse_from([
            "permit-form-api",
            "validate",
            "--record",
            "record.json",
            "--today",
            "16/10/2026",
        ])
        .expect_err("bad date");
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }
}
