use anyhow::{Context, Result};
use std::path::Path;

use crate::core::{
    AlertMessage, MetricReader, Monitor, MonitorConfig, Prepared, ProcMetricReader, RunOutcome,
    SmtpNotifier,
};
use crate::platform;

/// Load the configuration, run one monitoring pass and deliver the alert.
///
/// With `dry_run` the would-be message is printed instead of sent and the
/// digest file is left alone.
pub fn execute(config_path: &Path, dry_run: bool) -> Result<()> {
    let config = MonitorConfig::load(config_path)?;
    let reader = ProcMetricReader::new();
    let hostname = platform::hostname();

    if dry_run {
        return preview(&config, &reader, &hostname);
    }

    let notifier = SmtpNotifier::new(&config.smtp, &hostname)?;
    let outcome = Monitor::new(&config, &reader, &hostname)
        .run(&notifier)
        .with_context(|| format!("Monitoring pass for {:?} failed", config_path))?;

    match outcome {
        RunOutcome::Clean => log::info!("Nothing to report"),
        RunOutcome::Suppressed => log::info!("Report unchanged, not sent"),
        RunOutcome::Sent { recipients } => {
            log::info!("Report sent to {} recipient(s)", recipients)
        }
    }
    Ok(())
}

fn preview<R: MetricReader + ?Sized>(
    config: &MonitorConfig,
    reader: &R,
    hostname: &str,
) -> Result<()> {
    match Monitor::new(config, reader, hostname).prepare()? {
        Prepared::Clean => println!("No threshold exceeded."),
        Prepared::Suppressed => println!("Report unchanged since last delivery, nothing to send."),
        Prepared::Ready { message, digest } => {
            print!("{}", render_preview(&message));
            log::debug!("Digest would be {}", digest);
        }
    }
    Ok(())
}

fn render_preview(message: &AlertMessage) -> String {
    format!("Subject: {}\n{}", message.subject, message.body)
}
