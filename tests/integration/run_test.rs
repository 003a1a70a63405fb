use super::support::{FakeReader, Outbox};
use resmon::core::{Digest, Monitor, MonitorConfig, Prepared, RunOutcome};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn config_with_digest(dir: &Path, extra: &str) -> MonitorConfig {
    let text = format!(
        "email_addrs=ops@example.com;oncall@example.com\ndigest_file={}\n{}",
        dir.join("digest").display(),
        extra
    );
    MonitorConfig::parse(&text).unwrap()
}

#[test]
fn test_unchanged_conditions_send_once() {
    let temp = TempDir::new().unwrap();
    let config = config_with_digest(temp.path(), "fs_default_min_percent=90\n");
    let reader = FakeReader {
        mounts: vec![("/data".into(), 95.0)],
        ..Default::default()
    };
    let outbox = Outbox::default();

    let first = Monitor::new(&config, &reader, "web01").run(&outbox).unwrap();
    assert_eq!(first, RunOutcome::Sent { recipients: 2 });
    let stored = fs::read_to_string(&config.digest_file).unwrap();
    assert_eq!(stored, Digest::of("* [hdd]\t/data\t95.0%\tused\n").as_str());

    let second = Monitor::new(&config, &reader, "web01").run(&outbox).unwrap();
    assert_eq!(second, RunOutcome::Suppressed);

    let sent = outbox.sent.borrow();
    assert_eq!(sent.len(), 1);
    let (message, recipients) = &sent[0];
    assert_eq!(message.subject, "ATTENTION! WEB01");
    assert!(message.body.starts_with('-'));
    assert!(message.body.contains("\nWEB01 "));
    assert!(message.body.ends_with("* [hdd]\t/data\t95.0%\tused\n"));
    assert_eq!(recipients, &vec!["ops@example.com", "oncall@example.com"]);
}

#[test]
fn test_changed_value_triggers_new_alert() {
    let temp = TempDir::new().unwrap();
    let config = config_with_digest(temp.path(), "load_default_value=2\n");
    let outbox = Outbox::default();

    let calm = FakeReader {
        load: Some(2.0),
        ..Default::default()
    };
    let busier = FakeReader {
        load: Some(3.5),
        ..Default::default()
    };

    Monitor::new(&config, &calm, "host").run(&outbox).unwrap();
    let outcome = Monitor::new(&config, &busier, "host").run(&outbox).unwrap();

    assert_eq!(outcome, RunOutcome::Sent { recipients: 2 });
    assert_eq!(outbox.sent.borrow().len(), 2);
}

#[test]
fn test_cleared_then_identical_report_stays_suppressed() {
    let temp = TempDir::new().unwrap();
    let config = config_with_digest(temp.path(), "load_default_value=2\n");
    let outbox = Outbox::default();
    let high = FakeReader {
        load: Some(3.0),
        ..Default::default()
    };
    let low = FakeReader {
        load: Some(0.1),
        ..Default::default()
    };

    Monitor::new(&config, &high, "host").run(&outbox).unwrap();
    let cleared = Monitor::new(&config, &low, "host").run(&outbox).unwrap();
    let recurred = Monitor::new(&config, &high, "host").run(&outbox).unwrap();

    assert_eq!(cleared, RunOutcome::Clean);
    // an empty report never rewrites the digest, so the same alert is not repeated
    assert_eq!(recurred, RunOutcome::Suppressed);
    assert_eq!(outbox.sent.borrow().len(), 1);
}

#[test]
fn test_prepare_previews_without_persisting() {
    let temp = TempDir::new().unwrap();
    let config = config_with_digest(temp.path(), "load_default_value=1\n");
    let reader = FakeReader {
        load: Some(1.0),
        ..Default::default()
    };

    let prepared = Monitor::new(&config, &reader, "db").prepare().unwrap();
    let Prepared::Ready { message, digest } = prepared else {
        panic!("expected a report to be ready");
    };
    assert_eq!(message.subject, "ATTENTION! DB");
    assert_eq!(digest, Digest::of("* [loa]\tload\t1.0\n"));
    assert!(!config.digest_file.exists());
}
