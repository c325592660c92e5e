use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use signin_audit::cli::{handle_report_command, ReportArgs};
use signin_audit::config::{paths::AuditPaths, settings::Settings};
use signin_audit::graph::REQUIRED_SCOPES;
use signin_audit::AuditError;

/// Environment variable controlling log output
const LOG_ENV: &str = "SIGNIN_AUDIT_LOG";

#[derive(Parser)]
#[command(
    name = "signin-audit",
    version,
    about = "Report legacy-client sign-in events from Microsoft Graph",
    long_about = "signin-audit fetches every sign-in recorded for a legacy client \
                  application over a date range from the Microsoft Graph audit log \
                  and writes the results as CSV and sortable HTML reports."
)]
struct Cli {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch sign-ins and write the CSV and HTML reports
    #[command(alias = "run")]
    Report(ReportArgs),

    /// Write the default settings file
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() {
    let cli = Cli::parse();

    let log_level = std::env::var(LOG_ENV)
        .unwrap_or_else(|_| (if cli.verbose { "info" } else { "warn" }).to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);

        let exit_code = e
            .downcast_ref::<AuditError>()
            .map(AuditError::exit_code)
            .unwrap_or(1);
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = AuditPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Report(args)) => {
            handle_report_command(&settings, args)?;
        }
        Some(Commands::Init) => {
            if paths.is_initialized() {
                println!("Settings already exist at: {}", paths.settings_file().display());
            } else {
                settings.save(&paths)?;
                println!("Wrote default settings to: {}", paths.settings_file().display());
            }
        }
        Some(Commands::Config) => {
            println!("signin-audit Configuration");
            println!("==========================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Graph endpoint:   {}", settings.graph_base_url);
            println!("  Application id:   {}", settings.app_id);
            println!("  Lookback days:    {}", settings.lookback_days);
            println!("  Page size:        {}", settings.page_size);
            println!("  Output directory: {}", settings.output_dir.display());
            println!("  File prefix:      {}", settings.file_prefix);
            println!();
            println!("Required permissions: {}", REQUIRED_SCOPES.join(", "));
        }
        None => {
            println!("signin-audit - legacy sign-in reporting");
            println!();
            println!("Run 'signin-audit --help' for usage information.");
            println!("Run 'signin-audit report' to generate a report.");
        }
    }

    Ok(())
}
