//! One monitoring pass: evaluate, render, gate, deliver.

use chrono::Local;

use super::config::MonitorConfig;
use super::digest::{Digest, DigestGate, GateDecision};
use super::evaluator::ThresholdEvaluator;
use super::metrics::MetricReader;
use super::notifier::Notifier;
use super::report::{AlertMessage, ReportBuilder};
use crate::error::{MonitorError, Result};

/// Evaluated report after the duplicate check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prepared {
    /// No threshold is breached
    Clean,
    /// Same report as the last delivered one
    Suppressed,
    Ready { message: AlertMessage, digest: Digest },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Clean,
    Suppressed,
    Sent { recipients: usize },
}

pub struct Monitor<'a, R: MetricReader + ?Sized> {
    config: &'a MonitorConfig,
    reader: &'a R,
    report: ReportBuilder,
    gate: DigestGate,
}

impl<'a, R: MetricReader + ?Sized> Monitor<'a, R> {
    pub fn new(config: &'a MonitorConfig, reader: &'a R, hostname: &str) -> Self {
        Self {
            config,
            reader,
            report: ReportBuilder::new(hostname),
            gate: DigestGate::new(&config.digest_file),
        }
    }

    /// Evaluate thresholds and consult the digest gate without side effects
    pub fn prepare(&self) -> Result<Prepared> {
        let violations = ThresholdEvaluator::new(self.config).evaluate(self.reader)?;
        let body = self.report.render_body(&violations);
        if body.is_empty() {
            log::info!("All monitored resources within thresholds");
            return Ok(Prepared::Clean);
        }

        match self.gate.check(&body) {
            GateDecision::Suppress => Ok(Prepared::Suppressed),
            GateDecision::Send(digest) => Ok(Prepared::Ready {
                message: self.report.compose(&body, &Local::now()),
                digest,
            }),
        }
    }

    /// Full pass. The digest is persisted only after the notifier confirmed
    /// delivery, so a failed alert is retried on the next run.
    pub fn run<N: Notifier + ?Sized>(&self, notifier: &N) -> Result<RunOutcome> {
        let (message, digest) = match self.prepare()? {
            Prepared::Clean => return Ok(RunOutcome::Clean),
            Prepared::Suppressed => return Ok(RunOutcome::Suppressed),
            Prepared::Ready { message, digest } => (message, digest),
        };

        let recipients = &self.config.email_addrs;
        if recipients.is_empty() {
            return Err(MonitorError::delivery("no email_addrs configured"));
        }

        notifier.send(&message, recipients)?;
        self.gate.persist(&digest)?;
        Ok(RunOutcome::Sent {
            recipients: recipients.len(),
        })
    }
}
