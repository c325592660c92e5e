//! Input resolution for the report command
//!
//! Each input comes from the command line when given, otherwise from an
//! interactive prompt when one is available, otherwise from its default.

use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;

use crate::error::{AuditError, AuditResult};
use crate::models::{parse_date, DateRange};

/// Attempts allowed for an interactive date before giving up
const MAX_DATE_ATTEMPTS: usize = 3;

/// Source of interactive answers
pub trait Prompter {
    /// Ask a question; an empty answer means "use the default"
    fn ask(&self, prompt: &str) -> AuditResult<String>;

    /// Report a rejected answer before asking again
    fn reject(&self, message: &str);
}

/// Prompter reading from the terminal
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&self, prompt: &str) -> AuditResult<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| AuditError::Io(format!("Failed to read input: {}", e)))
    }

    fn reject(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Raw inputs as given on the command line
#[derive(Debug, Clone, Default)]
pub struct InputArgs {
    pub start: Option<String>,
    pub end: Option<String>,
    pub user: Option<String>,
}

/// Inputs after defaults and prompts are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInputs {
    pub range: DateRange,
    pub user_filter: Option<String>,
}

/// Resolve the date range and user filter
///
/// `today` anchors the default end date; the default start is
/// `lookback_days` before the resolved end.
pub fn resolve_inputs(
    args: &InputArgs,
    today: NaiveDate,
    lookback_days: u32,
    prompter: Option<&dyn Prompter>,
) -> AuditResult<ResolvedInputs> {
    let start_given = match &args.start {
        Some(s) => Some(parse_date(s)?),
        None => None,
    };
    let start = match start_given {
        Some(date) => Some(date),
        None => match prompter {
            Some(p) => ask_date(
                p,
                &format!("Start date (YYYY-MM-DD, blank for {} days before end)", lookback_days),
            )?,
            None => None,
        },
    };

    let end = match &args.end {
        Some(s) => parse_date(s)?,
        None => match prompter {
            Some(p) => ask_date(p, &format!("End date (YYYY-MM-DD, blank for {})", today))?
                .unwrap_or(today),
            None => today,
        },
    };

    let range = match start {
        Some(start) => DateRange::new(start, end),
        None => DateRange::trailing(end, lookback_days)?,
    };

    let user = match &args.user {
        Some(u) => Some(u.clone()),
        None => match prompter {
            Some(p) => Some(p.ask("Filter by user (substring, blank for all)")?),
            None => None,
        },
    };
    let user_filter = user
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());

    Ok(ResolvedInputs { range, user_filter })
}

/// Ask for an optional date, re-asking on malformed answers
fn ask_date(prompter: &dyn Prompter, prompt: &str) -> AuditResult<Option<NaiveDate>> {
    let mut last_error = None;
    for _ in 0..MAX_DATE_ATTEMPTS {
        let answer = prompter.ask(prompt)?;
        if answer.trim().is_empty() {
            return Ok(None);
        }
        match parse_date(&answer) {
            Ok(date) => return Ok(Some(date)),
            Err(e) => {
                prompter.reject(&e.to_string());
                last_error = Some(e);
            }
        }
    }
    Err(last_error.unwrap_or_else(|| AuditError::Validation("No date entered".into())))
}
