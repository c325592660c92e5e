//! CLI command for the sign-in report
//!
//! Resolves inputs, authenticates, fetches and writes the report files.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use clap::Args;

use super::prompt::{resolve_inputs, InputArgs, Prompter, TerminalPrompter};
use crate::config::Settings;
use crate::display::{format_preview, format_summary};
use crate::error::{AuditError, AuditResult};
use crate::export::ReportFiles;
use crate::graph::auth::prompt_token;
use crate::graph::{AccessToken, GraphClient, SignInQuery};
use crate::reports::SignInReport;

/// Environment variable holding the Graph bearer token
pub const TOKEN_ENV: &str = "GRAPH_ACCESS_TOKEN";

/// Arguments for `signin-audit report`
#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Start date (YYYY-MM-DD); prompted for when omitted
    #[arg(short, long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD); prompted for when omitted
    #[arg(short, long)]
    pub end: Option<String>,

    /// Keep only users whose principal name contains this text
    #[arg(short, long)]
    pub user: Option<String>,

    /// Graph access token
    #[arg(long, env = TOKEN_ENV, hide_env_values = true)]
    pub token: Option<String>,

    /// Application id to report on (defaults to the configured legacy client)
    #[arg(long)]
    pub app_id: Option<String>,

    /// Directory for the report files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Also write a JSON report
    #[arg(long)]
    pub json: bool,

    /// Never prompt; use defaults for anything not given
    #[arg(long)]
    pub no_input: bool,
}

/// Handle the report command
pub fn handle_report_command(settings: &Settings, args: ReportArgs) -> AuditResult<()> {
    let mut settings = settings.clone();
    if let Some(app_id) = &args.app_id {
        settings.app_id = app_id.clone();
    }
    if let Some(dir) = &args.output_dir {
        settings.output_dir = dir.clone();
    }
    settings.validate()?;
    let app_id = settings.parsed_app_id()?;

    let interactive = !args.no_input && std::io::stdin().is_terminal();
    let terminal = TerminalPrompter::new();
    let prompter: Option<&dyn Prompter> = if interactive { Some(&terminal) } else { None };

    let input_args = InputArgs {
        start: args.start.clone(),
        end: args.end.clone(),
        user: args.user.clone(),
    };
    let inputs = resolve_inputs(
        &input_args,
        Utc::now().date_naive(),
        settings.lookback_days,
        prompter,
    )?;
    let query = SignInQuery::new(app_id, inputs.range, settings.page_size);

    if inputs.range.is_empty() {
        println!(
            "No sign-in records: start date {} is after end date {}.",
            inputs.range.start, inputs.range.end
        );
        return Ok(());
    }

    let token = resolve_token(args.token.as_deref(), interactive)?;
    token.validate(Utc::now())?;

    let client = GraphClient::new(
        &settings.graph_base_url,
        token,
        Duration::from_secs(settings.request_timeout_secs),
    )?;

    println!("Fetching sign-ins for {} ({})...", app_id, inputs.range);
    let report = SignInReport::generate(&client, &query, inputs.user_filter.as_deref())?;

    if report.is_empty() {
        println!("{}", report.empty_reason());
        return Ok(());
    }

    let files = ReportFiles::new(
        &settings.output_dir,
        &settings.file_prefix,
        &report.range,
        args.json,
    );
    report.write(&files)?;

    println!("{}", format_preview(&report.rows));
    println!();
    print!("{}", format_summary(&report.rows, &files));

    Ok(())
}

/// Token from the flag/environment, else from a hidden prompt
fn resolve_token(given: Option<&str>, interactive: bool) -> AuditResult<AccessToken> {
    match given.map(str::trim).filter(|t| !t.is_empty()) {
        Some(token) => AccessToken::new(token),
        None if interactive => prompt_token(),
        None => Err(AuditError::Auth(format!(
            "No access token. Pass --token or set {}",
            TOKEN_ENV
        ))),
    }
}
