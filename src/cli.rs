//! Non-interactive command line: list, inspect and run catalog requests

use clap::{CommandFactory, Parser};
use serde_json::Value;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::catalog::{Catalog, CatalogEntry};
use crate::models::{RequestPlan, RequestResult, ResponseBody};
use crate::runner::{BatchOutcome, BatchReport, Runner};

const RULE: &str = "================================================================================";

const EXAMPLES: &str = "\
Examples:
  stedi-runner --list                 # List all available requests
  stedi-runner --info 1               # Show details about request 1
  stedi-runner --run 1                # Run request 1
  stedi-runner --run 1 --verbose      # Run request 1 with verbose output
  stedi-runner --run 1 --dry-run      # Show what would be executed without making request
  stedi-runner --all                  # Run every request in order
  stedi-runner --tui                  # Interactive terminal UI";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "stedi-runner",
    version,
    about = "Stedi Healthcare API Sample Request Runner",
    after_help = EXAMPLES
)]
pub struct Cli {
    /// List all available requests
    #[arg(short, long)]
    pub list: bool,

    /// Show detailed information about a specific request
    #[arg(short, long, value_name = "ID")]
    pub info: Option<u32>,

    /// Run a specific request by ID
    #[arg(short, long, value_name = "ID")]
    pub run: Option<u32>,

    /// Run every request in catalog order
    #[arg(short, long)]
    pub all: bool,

    /// Start the interactive terminal UI
    #[arg(short, long)]
    pub tui: bool,

    /// Show verbose output including response headers
    #[arg(short, long)]
    pub verbose: bool,

    /// Show what would be executed without making the actual request
    #[arg(long)]
    pub dry_run: bool,

    /// Override API key (default: secrets.yaml or the STEDI_API_KEY environment variable)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Path to config.yaml (secrets.yaml is read from the same directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// What the invocation asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Tui,
    List,
    Info(u32),
    Run(u32),
    All,
    Help,
}

impl Cli {
    pub fn action(&self) -> Action {
        if self.tui {
            Action::Tui
        } else if self.list {
            Action::List
        } else if let Some(id) = self.info {
            Action::Info(id)
        } else if let Some(id) = self.run {
            Action::Run(id)
        } else if self.all {
            Action::All
        } else {
            Action::Help
        }
    }
}

pub fn write_list<W: Write>(out: &mut W, catalog: &Catalog) -> io::Result<()> {
    writeln!(out, "\nAvailable Requests:")?;
    writeln!(out, "{}", RULE)?;
    for entry in catalog.iter() {
        writeln!(out, "{:2}. {:6} {}", entry.id, entry.method, entry.path)?;
        if let Some(description) = entry.description {
            writeln!(out, "    {}", description)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_info<W: Write>(
    out: &mut W,
    entry: &CatalogEntry,
    base_url: &str,
    payload: Option<&Value>,
) -> io::Result<()> {
    writeln!(out, "\nRequest {}: {} {}", entry.id, entry.method, entry.path)?;
    writeln!(out, "{}", RULE)?;
    if let Some(description) = entry.description {
        writeln!(out, "Description: {}", description)?;
    }
    writeln!(out, "Full URL: {}", entry.full_url(base_url))?;

    match payload {
        Some(payload) => {
            writeln!(out, "\nSample Payload:")?;
            for line in pretty(payload).lines() {
                writeln!(out, "  {}", line)?;
            }
        }
        None if entry.method.has_body() => {
            writeln!(out, "\nSample Payload:")?;
            writeln!(out, "  (no sample payload could be extracted)")?;
        }
        None => {}
    }
    writeln!(out)
}

pub fn write_response<W: Write>(
    out: &mut W,
    result: &RequestResult,
    verbose: bool,
    preview_chars: usize,
) -> io::Result<()> {
    writeln!(out, "\n{}", RULE)?;
    writeln!(
        out,
        "Status Code: {} {}",
        result.status,
        result.reason.as_deref().unwrap_or("")
    )?;
    writeln!(out, "{}", RULE)?;

    if verbose {
        writeln!(out, "\nHeaders:")?;
        for (key, value) in &result.headers {
            writeln!(out, "  {}: {}", key, value)?;
        }
    }

    writeln!(out, "\nResponse Body:")?;
    match &result.body {
        ResponseBody::Json(json) => writeln!(out, "{}", pretty(json))?,
        ResponseBody::Text(text) => {
            writeln!(out, "{}", crate::models::truncate_chars(text, preview_chars))?;
            let total = text.chars().count();
            if total > preview_chars {
                writeln!(out, "\n... (truncated, total length: {} chars)", total)?;
            }
        }
    }
    Ok(())
}

pub fn write_dry_run<W: Write>(out: &mut W, executor: &str, plan: &RequestPlan) -> io::Result<()> {
    writeln!(out, "\n[DRY RUN] Would execute:")?;
    writeln!(out, "  Executor: {}", executor)?;
    writeln!(out, "  Method: {}", plan.method)?;
    writeln!(out, "  URL: {}", plan.url)?;
    if !plan.query.is_empty() {
        writeln!(out, "  Query:")?;
        for (key, value) in &plan.query {
            writeln!(out, "    {}={}", key, value)?;
        }
    }
    writeln!(out, "  Headers:")?;
    for (key, value) in &plan.headers {
        writeln!(out, "    {}: {}", key, value)?;
    }
    if let Some(body) = &plan.body {
        writeln!(out, "  Body:")?;
        for line in pretty(body).lines() {
            writeln!(out, "    {}", line)?;
        }
    }
    Ok(())
}

pub fn write_batch_report<W: Write>(
    out: &mut W,
    report: &BatchReport,
    runner: &Runner,
    verbose: bool,
) -> io::Result<()> {
    writeln!(out, "\n{}", RULE)?;
    writeln!(out, "Results Summary")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Total Requests: {}", report.len())?;
    writeln!(
        out,
        "Successful:     {} ({:.1}%)",
        report.success_count(),
        report.success_rate()
    )?;
    writeln!(out, "Errors:         {}", report.error_count())?;
    writeln!(out, "Total Time:     {:.2}s\n", report.total_elapsed.as_secs_f64())?;

    let preview_chars = runner.settings().batch_preview_chars;
    for outcome in &report.outcomes {
        let Some(entry) = runner.catalog().get(outcome.id()) else {
            continue;
        };
        match outcome {
            BatchOutcome::Completed {
                status, elapsed, ..
            } => {
                writeln!(
                    out,
                    "{:2}. {:6} {} - Status: {} ({:.2}s)",
                    entry.id,
                    entry.method,
                    entry.path,
                    status,
                    elapsed.as_secs_f64()
                )?;
                if verbose {
                    if let Some(result) = runner.result(entry.id) {
                        for line in result.body.preview(preview_chars).lines() {
                            writeln!(out, "      {}", line)?;
                        }
                    }
                }
            }
            BatchOutcome::Failed { message, .. } => {
                writeln!(
                    out,
                    "{:2}. {:6} {} - Error: {}",
                    entry.id, entry.method, entry.path, message
                )?;
            }
        }
    }
    Ok(())
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn not_found<E: Write>(err: &mut E, id: u32) -> io::Result<u8> {
    writeln!(err, "Error: {}", crate::error::RunnerError::UnknownRequest(id))?;
    Ok(1)
}

/// Carry out a non-interactive action and return the process exit status
pub async fn execute<W: Write, E: Write>(
    cli: &Cli,
    action: Action,
    runner: &mut Runner,
    out: &mut W,
    err: &mut E,
) -> io::Result<u8> {
    match action {
        Action::Tui => Ok(0),
        Action::Help => {
            writeln!(out, "{}", Cli::command().render_help())?;
            writeln!(out)?;
            write_list(out, runner.catalog())?;
            Ok(0)
        }
        Action::List => {
            write_list(out, runner.catalog())?;
            Ok(0)
        }
        Action::Info(id) => {
            let Some(entry) = runner.catalog().get(id) else {
                return not_found(err, id);
            };
            let payload = runner.default_payload(id).ok().flatten();
            write_info(out, entry, &runner.settings().base_url, payload.as_ref())?;
            Ok(0)
        }
        Action::Run(id) => {
            let Some(entry) = runner.catalog().get(id) else {
                return not_found(err, id);
            };
            writeln!(out, "\nRunning Request {}: {} {}", entry.id, entry.method, entry.path)?;
            writeln!(out, "Description: {}", entry.description.unwrap_or("N/A"))?;

            if cli.dry_run {
                return match runner.dry_run(id) {
                    Ok(plan) => {
                        write_dry_run(out, entry.executor.name, &plan)?;
                        Ok(0)
                    }
                    Err(e) => {
                        writeln!(err, "\nError: {}", e)?;
                        Ok(1)
                    }
                };
            }

            match runner.run(id).await {
                Ok(result) => {
                    let preview = runner.settings().text_preview_chars;
                    write_response(out, &result, cli.verbose, preview)?;
                    Ok(0)
                }
                Err(e) => {
                    writeln!(err, "\nError making request: {}", e)?;
                    Ok(1)
                }
            }
        }
        Action::All => {
            if cli.dry_run {
                for entry in runner.catalog().iter() {
                    writeln!(out, "\n{}", entry.label())?;
                    match runner.dry_run(entry.id) {
                        Ok(plan) => write_dry_run(out, entry.executor.name, &plan)?,
                        Err(e) => writeln!(out, "  Error: {}", e)?,
                    }
                }
                return Ok(0);
            }

            let mut progress_error = None;
            let report = runner
                .run_all(|p| {
                    if progress_error.is_some() {
                        return;
                    }
                    let line = writeln!(
                        out,
                        "Running request {}/{}: {} {}",
                        p.position, p.total, p.entry.method, p.entry.path
                    );
                    progress_error = line.err();
                })
                .await;
            if let Some(e) = progress_error {
                return Err(e);
            }
            write_batch_report(out, &report, runner, cli.verbose)?;
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::runner::testing::{no_credentials, FakeTransport, StaticKey};
    use chrono::Local;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("stedi-runner").chain(args.iter().copied())).unwrap()
    }

    fn runner(transport: &FakeTransport) -> Runner {
        Runner::new(
            Catalog::new(),
            Box::new(StaticKey("cli-key")),
            Box::new(transport.clone()),
            Settings::default(),
        )
    }

    async fn run_cli(args: &[&str], runner: &mut Runner) -> (u8, String, String) {
        let cli = parse(args);
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = execute(&cli, cli.action(), runner, &mut out, &mut err)
            .await
            .unwrap();
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_flag_parsing() {
        assert_eq!(parse(&["-l"]).action(), Action::List);
        assert_eq!(parse(&["--info", "3"]).action(), Action::Info(3));
        assert_eq!(parse(&["-r", "5", "-v", "--dry-run"]).action(), Action::Run(5));
        assert_eq!(parse(&["--all"]).action(), Action::All);
        assert_eq!(parse(&["-t"]).action(), Action::Tui);
        assert_eq!(parse(&[]).action(), Action::Help);
        let cli = parse(&["--api-key", "abc", "--config", "/tmp/c.yaml"]);
        assert_eq!(cli.api_key.as_deref(), Some("abc"));
        assert!(Cli::try_parse_from(["stedi-runner", "--run", "x"]).is_err());
    }

    #[test]
    fn test_list_format() {
        let mut out = Vec::new();
        write_list(&mut out, &Catalog::new()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(" 1. POST   /change/medicalnetwork/claimstatus/v2\n"));
        assert!(text.contains("    Submit a 276/277 real-time claim status check in JSON format\n"));
        assert!(text.contains("21. GET    /payers/search\n"));
    }

    #[test]
    fn test_text_body_is_truncated() {
        let result = RequestResult {
            status: 200,
            reason: Some("OK".into()),
            headers: BTreeMap::from([("content-type".into(), "text/csv".into())]),
            elapsed: Duration::from_millis(10),
            body: ResponseBody::Text("x".repeat(1500)),
            timestamp: Local::now(),
        };
        let mut out = Vec::new();
        write_response(&mut out, &result, true, 1000).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Status Code: 200 OK"));
        assert!(text.contains("  content-type: text/csv"));
        assert!(text.contains(&"x".repeat(1000)));
        assert!(!text.contains(&"x".repeat(1001)));
        assert!(text.contains("... (truncated, total length: 1500 chars)"));
    }

    #[tokio::test]
    async fn test_unknown_id_exits_with_error() {
        let transport = FakeTransport::ok("{}");
        let mut runner = runner(&transport);

        let (code, _, err) = run_cli(&["--run", "42"], &mut runner).await;
        assert_eq!(code, 1);
        assert!(err.contains("Request 42 not found"));

        let (code, _, _) = run_cli(&["--info", "0"], &mut runner).await;
        assert_eq!(code, 1);
    }

    #[tokio::test]
    async fn test_run_prints_json_body() {
        let transport = FakeTransport::ok(r#"{"payers": []}"#);
        let mut runner = runner(&transport);

        let (code, out, _) = run_cli(&["--run", "19"], &mut runner).await;
        assert_eq!(code, 0);
        assert!(out.contains("Running Request 19: GET /payers"));
        assert!(out.contains("Status Code: 200 OK"));
        assert!(out.contains("\"payers\": []"));
        assert!(!out.contains("Headers:"));
    }

    #[tokio::test]
    async fn test_missing_credential_exits_with_error() {
        let transport = FakeTransport::ok("{}");
        let mut runner = Runner::new(
            Catalog::new(),
            Box::new(no_credentials()),
            Box::new(transport.clone()),
            Settings::default(),
        );

        let (code, _, err) = run_cli(&["--run", "1"], &mut runner).await;
        assert_eq!(code, 1);
        assert!(err.contains("API key not found"));
        assert_eq!(transport.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_exits_with_error() {
        let transport = FakeTransport::ok("{}").failing_on(&["/payers"]);
        let mut runner = runner(&transport);

        let (code, out, err) = run_cli(&["--run", "19"], &mut runner).await;
        assert_eq!(code, 1);
        assert!(out.contains("Running Request 19: GET /payers"));
        assert!(err.contains("Error making request: Request failed: Connection failed"));
        assert!(runner.result(19).is_none());
    }

    #[tokio::test]
    async fn test_dry_run_sends_nothing() {
        let transport = FakeTransport::ok("{}");
        let mut runner = runner(&transport);

        let (code, out, _) = run_cli(&["--run", "14", "--dry-run"], &mut runner).await;
        assert_eq!(code, 0);
        assert!(out.contains("[DRY RUN] Would execute:"));
        assert!(out.contains("  Executor: export_pdf"));
        assert!(out.contains("    businessId=123456789"));
        assert!(!out.contains("cli-key"));
        assert_eq!(transport.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_info_shows_sample_payload() {
        let transport = FakeTransport::ok("{}");
        let mut runner = runner(&transport);

        let (code, out, _) = run_cli(&["--info", "7"], &mut runner).await;
        assert_eq!(code, 0);
        assert!(out.contains("Full URL: https://healthcare.us.stedi.com/2024-04-01/change/medicalnetwork/professionalclaims/v3/raw-x12-submission"));
        assert!(out.contains("Sample Payload:\n  {\n    \"x12\": \"example\"\n  }"));
    }

    #[tokio::test]
    async fn test_batch_always_exits_zero() {
        let transport = FakeTransport::ok("{}").failing_on(&["/payers"]);
        let mut runner = runner(&transport);

        let (code, out, _) = run_cli(&["--all"], &mut runner).await;
        assert_eq!(code, 0);
        assert!(out.contains("Running request 21/21: GET /payers/search"));
        assert!(out.contains("Total Requests: 21"));
        assert!(out.contains("Errors:         1"));
        assert!(out.contains("19. GET    /payers - Error: Request failed: Connection failed"));
    }

    #[tokio::test]
    async fn test_no_action_prints_help_then_list() {
        let transport = FakeTransport::ok("{}");
        let mut runner = runner(&transport);

        let (code, out, _) = run_cli(&[], &mut runner).await;
        assert_eq!(code, 0);
        let help_at = out.find("Usage:").unwrap();
        let list_at = out.find("Available Requests:").unwrap();
        assert!(help_at < list_at);
    }
}
