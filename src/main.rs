mod cli;
mod config;
mod extract;
mod fetch;
mod fingerprint;
mod notify;
mod runner;
mod state;

use anyhow::Context;
use cli::{Cli, Command};
use config::Config;
use extract::Identity;
use fetch::HttpFetcher;
use notify::{Notify, SmtpNotifier, StdoutNotifier};
use runner::{CheckOutcome, RunSummary, run_watches};
use state::StateStore;
use std::fmt as stdfmt;
use std::io::{IsTerminal, stderr};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Event, Level, Subscriber, error, info};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt as tracing_fmt;
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

struct WatchExitCode;

impl WatchExitCode {
    const SUCCESS: u8 = 0;

    /// At least one watch hit an anomaly but the batch ran to completion
    /// (tolerant policy).
    const ANOMALIES: u8 = 1;

    /// The run was stopped at the first anomaly (on_error = "abort");
    /// distinct per anomaly kind.
    const ABORTED_FETCH_ERROR: u8 = 2;
    const ABORTED_EMPTY_SELECTOR: u8 = 3;
    const ABORTED_MAIL_FAILURE: u8 = 4;

    /// Other errors (configuration, I/O, invalid arguments).
    const ANY_ERROR: u8 = 255;
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_level.as_deref());

    // Change working directory if -C was specified
    if let Some(directory) = &cli.directory
        && let Err(e) = std::env::set_current_dir(directory)
    {
        error!(
            "Failed to change directory to {}: {}",
            directory.display(),
            e
        );
        return ExitCode::from(WatchExitCode::ANY_ERROR);
    }

    let result: anyhow::Result<u8> = match cli.command {
        Command::Check { label, no_mail } => handle_check(&cli.config, label, no_mail),
        Command::Status {} => handle_status(&cli.config),
    };

    match result {
        Ok(exit_code) => ExitCode::from(exit_code),
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(WatchExitCode::ANY_ERROR)
        }
    }
}

fn handle_check(config_path: &Path, label: Option<String>, no_mail: bool) -> anyhow::Result<u8> {
    let config = Config::load(config_path)
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;

    let mut watches = config.compile_watches()?;

    if let Some(label) = &label {
        watches.retain(|w| &w.label == label);
        if watches.is_empty() {
            anyhow::bail!("no watch with label '{label}' is configured");
        }
    }

    let fetcher = HttpFetcher::new(Duration::from_secs(config.settings.timeout_secs))?;

    let mut notifier: Box<dyn Notify> = if config.mail.enabled && !no_mail {
        Box::new(SmtpNotifier::new(&config.mail)?)
    } else {
        Box::new(StdoutNotifier::new(&config.mail))
    };

    let summary = run_watches(
        &watches,
        &fetcher,
        &Identity,
        &config.settings.state_file,
        notifier.as_mut(),
        config.settings.on_error,
    )?;

    info!("Checked {} watch(es)", summary.reports.len());
    for report in &summary.reports {
        info!("  {}: {:?}", report.label, report.outcome);
    }

    Ok(summary_exit_code(&summary))
}

fn summary_exit_code(summary: &RunSummary) -> u8 {
    if summary.aborted {
        // Under the abort policy the last report is the anomalous one.
        if let Some(report) = summary.reports.last() {
            return match report.outcome {
                CheckOutcome::FetchFailed => WatchExitCode::ABORTED_FETCH_ERROR,
                CheckOutcome::NoElements => WatchExitCode::ABORTED_EMPTY_SELECTOR,
                _ => WatchExitCode::ABORTED_MAIL_FAILURE,
            };
        }
    }

    if summary.has_anomalies() {
        return WatchExitCode::ANOMALIES;
    }

    WatchExitCode::SUCCESS
}

fn handle_status(config_path: &Path) -> anyhow::Result<u8> {
    let config = Config::load(config_path)
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;

    let store = StateStore::load_or_default(&config.settings.state_file)?;

    if store.entries.is_empty() {
        info!(
            "No stored state in {}",
            config.settings.state_file.display()
        );
        return Ok(WatchExitCode::SUCCESS);
    }

    for (label, entry) in &store.entries {
        println!("{}  {}  {}", label, entry.fingerprint, entry.checked_at);
    }

    Ok(WatchExitCode::SUCCESS)
}

fn init_tracing(verbose: u8, log_level: Option<&str>) {
    let stderr_is_terminal = stderr().is_terminal();
    let formatter = EmojiFormatter { stderr_is_terminal };

    let default_level = match (log_level, verbose) {
        (Some(level), _) => level.to_string(),
        (None, 0) => "warn".to_string(),
        (None, 1) => "info".to_string(),
        (None, _) => "debug".to_string(),
    };

    // -v and --log-level take precedence over RUST_LOG; without them,
    // RUST_LOG wins over the default.
    let filter = if verbose > 0 || log_level.is_some() {
        EnvFilter::new(&default_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_level))
    };

    let fmt_layer = tracing_fmt::layer()
        .event_format(formatter)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

struct EmojiFormatter {
    stderr_is_terminal: bool,
}

impl<S, N> FormatEvent<S, N> for EmojiFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> stdfmt::Result {
        if self.stderr_is_terminal {
            match *event.metadata().level() {
                Level::DEBUG => write!(writer, "🔍 ")?,
                Level::INFO => write!(writer, "ℹ️ ")?,
                Level::WARN => write!(writer, "⚠️  ")?,
                Level::ERROR => write!(writer, "❌️ ")?,
                _ => {}
            }
        } else {
            match *event.metadata().level() {
                Level::DEBUG => writer.write_str("DEBUG: ")?,
                Level::INFO => writer.write_str("INFO: ")?,
                Level::WARN => writer.write_str("WARN: ")?,
                Level::ERROR => writer.write_str("ERROR: ")?,
                _ => {}
            }
        }

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
