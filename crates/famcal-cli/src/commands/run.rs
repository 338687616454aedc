//! Run command: the mailbox polling daemon.
//!
//! Each tick fetches unseen mail, extracts at most one event per message,
//! appends persistable events to the store and acknowledges every message,
//! whether or not an event was found. Once a day, from the configured hour
//! on, the day's events are mailed as a summary.
//!
//! All of that is blocking I/O, so the [`Worker`] that owns the mailbox,
//! extractor, store and SMTP sender is moved onto a blocking thread for each
//! step and handed back when the step finishes.

use crate::cli::RunArgs;
use crate::commands::open_store;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use famcal_domain::traits::{EventStore, LlmProvider, MailSource};
use famcal_domain::Recurrence;
use famcal_extractor::Extractor;
use famcal_mail::{compose_summary, ImapMailbox, SmtpSender};
use std::fmt::Display;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// Counts for one poll of the mailbox.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollReport {
    /// Messages fetched
    pub fetched: usize,
    /// Events appended to the store
    pub stored: usize,
    /// Messages that yielded no usable event
    pub skipped: usize,
    /// Events that could not be written
    pub failed: usize,
}

/// What happened when the daily summary was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// Sent, listing this many events
    Sent(usize),
    /// Nothing scheduled for the day
    NoEvents,
    /// SMTP credentials or recipients missing
    NotConfigured,
}

/// Decides when the once-a-day summary is due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySchedule {
    hour: u32,
    last_handled: Option<NaiveDate>,
}

impl SummarySchedule {
    /// Summaries become due at `hour` local time.
    pub fn new(hour: u32) -> Self {
        Self {
            hour,
            last_handled: None,
        }
    }

    /// Whether the summary for `now`'s date still has to go out.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        now.hour() >= self.hour && self.last_handled != Some(now.date())
    }

    /// Record that `date` has been handled (sent or nothing to send).
    pub fn mark_handled(&mut self, date: NaiveDate) {
        self.last_handled = Some(date);
    }
}

/// Owns everything one poll needs.
pub struct Worker<M, L, S>
where
    L: LlmProvider,
{
    mailbox: M,
    extractor: Extractor<L>,
    store: S,
    sender: SmtpSender,
}

impl<M, L, S> Worker<M, L, S>
where
    M: MailSource,
    M::Error: Display,
    CliError: From<M::Error> + From<S::Error>,
    L: LlmProvider,
    L::Error: Display,
    S: EventStore,
    S::Error: Display,
{
    /// Bundle the collaborators.
    pub fn new(mailbox: M, extractor: Extractor<L>, store: S, sender: SmtpSender) -> Self {
        Self {
            mailbox,
            extractor,
            store,
            sender,
        }
    }

    /// The event store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch, extract, store and acknowledge.
    ///
    /// Only a failed fetch is an error; problems with single messages are
    /// logged and counted.
    pub fn poll(&mut self, today: NaiveDate) -> Result<PollReport> {
        let emails = self.mailbox.fetch_unseen()?;
        let mut report = PollReport {
            fetched: emails.len(),
            ..PollReport::default()
        };

        for email in &emails {
            match self.extractor.extract_at(email, today) {
                Some(event) if event.is_persistable() => {
                    match self.store.append(&event, "", Recurrence::None) {
                        Ok(id) => {
                            info!(
                                "Stored event {}: {} on {} at {} for {}",
                                id, event.title, event.date, event.time, event.person
                            );
                            report.stored += 1;
                        }
                        Err(e) => {
                            error!("Failed to store event from uid {}: {}", email.uid, e);
                            report.failed += 1;
                        }
                    }
                }
                Some(_) => {
                    warn!("Discarding untitled event from uid {}", email.uid);
                    report.skipped += 1;
                }
                None => report.skipped += 1,
            }

            if let Err(e) = self.mailbox.mark_seen(email) {
                warn!("Failed to mark uid {} as seen: {}", email.uid, e);
            }
        }

        Ok(report)
    }

    /// Compose and send the summary for `date`.
    pub fn send_summary(&self, date: NaiveDate) -> Result<SummaryOutcome> {
        let events = self.store.list_by_date(date)?;
        let Some(summary) = compose_summary(&events, date) else {
            return Ok(SummaryOutcome::NoEvents);
        };
        if !self.sender.is_configured() {
            return Ok(SummaryOutcome::NotConfigured);
        }
        self.sender.send(&summary)?;
        Ok(SummaryOutcome::Sent(events.len()))
    }
}

/// Timing of the daemon loop.
#[derive(Debug, Clone, Copy)]
pub struct LoopSettings {
    /// Seconds between polls
    pub interval_secs: u64,
    /// Hour from which the summary is due
    pub summary_hour: u32,
    /// Stop after the first pass
    pub once: bool,
}

/// Poll on an interval until Ctrl-C (or after one pass with `once`).
pub async fn run_loop<M, L, S>(mut worker: Worker<M, L, S>, settings: LoopSettings) -> Result<()>
where
    M: MailSource + Send + 'static,
    M::Error: Display,
    CliError: From<M::Error> + From<S::Error>,
    L: LlmProvider + Send + 'static,
    L::Error: Display,
    S: EventStore + Send + 'static,
    S::Error: Display,
{
    let mut schedule = SummarySchedule::new(settings.summary_hour);
    let mut ticker = tokio::time::interval(Duration::from_secs(settings.interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        "Polling every {}s, daily summary from {:02}:00",
        settings.interval_secs, settings.summary_hour
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested");
                break;
            }
        }

        let now = Local::now().naive_local();
        let today = now.date();

        let (returned, polled) = tokio::task::spawn_blocking(move || {
            let report = worker.poll(today);
            (worker, report)
        })
        .await?;
        worker = returned;

        match polled {
            Ok(report) if report.fetched > 0 => info!(
                "Processed {} message(s): {} stored, {} skipped, {} failed",
                report.fetched, report.stored, report.skipped, report.failed
            ),
            Ok(_) => {}
            Err(e) => error!("Mailbox poll failed: {}", e),
        }

        if schedule.is_due(now) {
            let (returned, sent) = tokio::task::spawn_blocking(move || {
                let outcome = worker.send_summary(today);
                (worker, outcome)
            })
            .await?;
            worker = returned;

            match sent {
                Ok(outcome) => {
                    match outcome {
                        SummaryOutcome::Sent(n) => info!("Daily summary sent ({} events)", n),
                        SummaryOutcome::NoEvents => info!("No events today, summary skipped"),
                        SummaryOutcome::NotConfigured => {
                            warn!("SMTP not configured, summary skipped")
                        }
                    }
                    schedule.mark_handled(today);
                }
                Err(e) => error!("Daily summary failed, will retry: {}", e),
            }
        }

        if settings.once {
            break;
        }
    }

    // The worker holds blocking network clients; release them off the runtime.
    tokio::task::spawn_blocking(move || drop(worker)).await?;
    Ok(())
}

/// Execute the run command.
pub fn execute_run(args: RunArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    if !config.imap.has_credentials() {
        return Err(CliError::Config(
            "IMAP user and password are required (set FAMCAL_MAIL_USER / FAMCAL_MAIL_PASSWORD)"
                .to_string(),
        ));
    }

    let settings = LoopSettings {
        interval_secs: args.interval.unwrap_or(config.daemon.poll_interval_secs).max(1),
        summary_hour: config.daemon.summary_hour,
        once: args.once,
    };

    let extractor = Extractor::new(
        config.ollama.provider()?,
        config.sender_directory(),
        config.extractor.clone(),
    );
    let worker = Worker::new(
        ImapMailbox::new(config.imap.clone()),
        extractor,
        open_store(config)?,
        SmtpSender::new(config.smtp.clone()),
    );

    println!(
        "{}",
        formatter.info(&format!(
            "Watching {} as {} (Ctrl-C to stop)",
            config.imap.mailbox, config.imap.user
        ))
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_loop(worker, settings))?;

    println!("{}", formatter.success("Stopped"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use famcal_domain::{RawEmail, SenderDirectory};
    use famcal_extractor::ExtractorConfig;
    use famcal_llm::MockProvider;
    use famcal_mail::{MockMailbox, SmtpConfig};
    use famcal_store::CsvStore;
    use std::sync::Arc;
    use tempfile::TempDir;

    // 2026-01-14 is a Wednesday
    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 14).unwrap()
    }

    fn at(date: NaiveDate, hour: u32) -> NaiveDateTime {
        date.and_hms_opt(hour, 0, 0).unwrap()
    }

    fn email(uid: &str, body: &str) -> RawEmail {
        RawEmail {
            uid: uid.to_string(),
            ..RawEmail::new(body, "sarah@example.com")
        }
    }

    fn worker(
        mailbox: MockMailbox,
        provider: MockProvider,
        dir: &TempDir,
    ) -> Worker<MockMailbox, MockProvider, CsvStore> {
        let directory = Arc::new(SenderDirectory::new([("sarah@example.com", "Sarah")]));
        Worker::new(
            mailbox,
            Extractor::new(provider, directory, ExtractorConfig::default()),
            CsvStore::open(dir.path().join("events.csv")).unwrap(),
            SmtpSender::new(SmtpConfig::default()),
        )
    }

    #[test]
    fn test_schedule_due_once_per_day() {
        let mut schedule = SummarySchedule::new(7);
        assert!(!schedule.is_due(at(wednesday(), 6)));
        assert!(schedule.is_due(at(wednesday(), 7)));

        schedule.mark_handled(wednesday());
        assert!(!schedule.is_due(at(wednesday(), 22)));

        let thursday = wednesday().succ_opt().unwrap();
        assert!(!schedule.is_due(at(thursday, 3)));
        assert!(schedule.is_due(at(thursday, 9)));
    }

    #[test]
    fn test_poll_stores_rule_events_and_acknowledges_all() {
        let dir = TempDir::new().unwrap();
        let mailbox = MockMailbox::new();
        mailbox.push(email("1", "Event: Yoga\nDate: tomorrow\nTime: 6:30pm"));
        mailbox.push(email("2", "Thanks for the photos!"));

        let provider = MockProvider::unavailable("offline");
        let mut worker = worker(mailbox.clone(), provider, &dir);

        let report = worker.poll(wednesday()).unwrap();
        assert_eq!(
            report,
            PollReport {
                fetched: 2,
                stored: 1,
                skipped: 1,
                failed: 0
            }
        );
        assert_eq!(mailbox.seen_uids(), vec!["1", "2"]);
        assert_eq!(mailbox.unseen_count(), 0);

        let stored = worker.store().list_all().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].event.title, "Yoga");
        assert_eq!(stored[0].event.time.to_string(), "1830");
        assert_eq!(stored[0].event.person, "Sarah");
        assert_eq!(
            stored[0].event.date,
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_poll_uses_model_when_rules_fail() {
        let dir = TempDir::new().unwrap();
        let mailbox = MockMailbox::new();
        mailbox.push(email("5", "Piano recital Friday at 7pm"));

        let provider = MockProvider::new(
            r#"{"title":"Piano recital","date":"2026-01-16","time":"1900","person":"","location":"School hall"}"#,
        );
        let mut worker = worker(mailbox, provider.clone(), &dir);

        let report = worker.poll(wednesday()).unwrap();
        assert_eq!(report.stored, 1);
        assert_eq!(provider.call_count(), 1);

        let stored = worker.store().list_all().unwrap();
        assert_eq!(stored[0].event.location, "School hall");
        assert_eq!(stored[0].event.person, "Sarah");
    }

    #[test]
    fn test_poll_fetch_failure_is_error() {
        let dir = TempDir::new().unwrap();
        let mut worker = worker(MockMailbox::unreachable(), MockProvider::new("{}"), &dir);
        assert!(matches!(worker.poll(wednesday()), Err(CliError::Mail(_))));
    }

    #[test]
    fn test_summary_outcomes() {
        let dir = TempDir::new().unwrap();
        let mailbox = MockMailbox::new();
        mailbox.push(email("1", "Event: Dentist\nDate: 2026-01-14\nTime: 1500"));
        let mut worker = worker(mailbox, MockProvider::new("{}"), &dir);

        assert_eq!(
            worker.send_summary(wednesday()).unwrap(),
            SummaryOutcome::NoEvents
        );

        worker.poll(wednesday()).unwrap();
        assert_eq!(
            worker.send_summary(wednesday()).unwrap(),
            SummaryOutcome::NotConfigured
        );
    }

    #[tokio::test]
    async fn test_single_pass_loop() {
        let dir = TempDir::new().unwrap();
        let mailbox = MockMailbox::new();
        mailbox.push(email("9", "Event: Swim meet\nDate: Saturday"));
        let worker = worker(mailbox.clone(), MockProvider::new("{}"), &dir);

        run_loop(
            worker,
            LoopSettings {
                interval_secs: 60,
                summary_hour: 0,
                once: true,
            },
        )
        .await
        .unwrap();

        assert_eq!(mailbox.seen_uids(), vec!["9"]);
        let store = CsvStore::open(dir.path().join("events.csv")).unwrap();
        assert_eq!(store.list_all().unwrap()[0].event.title, "Swim meet");
    }
}
