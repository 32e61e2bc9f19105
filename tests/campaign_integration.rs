//! End-to-end campaign tests.
//!
//! These tests run the full driver against temp files, a fake relay and a
//! recording pacer, then inspect the checkpoint and results table.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use outreach::config::Settings;
use outreach::domain::{Checkpoint, Contact, SendStatus, SentEmail};
use outreach::providers::email::{EmailTransport, OutgoingEmail, ProviderError, Result};
use outreach::services::{FixedRandomness, Pacer};
use outreach::storage::CheckpointStore;
use outreach::CampaignService;

// ============================================================================
// Fakes
// ============================================================================

/// Relay that accepts or rejects by recipient and records every attempt.
struct FakeRelay {
    accept: fn(&str) -> bool,
    attempts: Mutex<Vec<OutgoingEmail>>,
}

impl FakeRelay {
    fn new(accept: fn(&str) -> bool) -> Arc<Self> {
        Arc::new(Self {
            accept,
            attempts: Mutex::new(Vec::new()),
        })
    }

    fn recipients(&self) -> Vec<String> {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .map(|email| email.to.email.clone())
            .collect()
    }
}

#[async_trait]
impl EmailTransport for FakeRelay {
    async fn send_email(&self, email: &OutgoingEmail) -> Result<String> {
        self.attempts.lock().unwrap().push(email.clone());
        if (self.accept)(&email.to.email) {
            Ok("250 2.0.0 OK".to_string())
        } else {
            Err(ProviderError::Rejected("550 5.1.1 user unknown".to_string()))
        }
    }
}

#[derive(Default)]
struct RecordingPacer {
    pauses: Mutex<Vec<Duration>>,
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, duration: Duration) {
        self.pauses.lock().unwrap().push(duration);
    }
}

fn settings(dir: &Path, table: &str) -> Settings {
    let contacts = dir.join("contacts.csv");
    std::fs::write(&contacts, table).unwrap();

    let mut settings = Settings::default();
    settings.sender.address = "alex@example.com".to_string();
    settings.sender.display_name = Some("Alex Example".to_string());
    settings.campaign.contacts_path = contacts;
    settings.campaign.checkpoint_path = dir.join("email_checkpoint.json");
    settings.campaign.results_path = dir.join("email_sending_results.csv");
    settings
}

fn campaign(
    settings: &Settings,
    relay: Arc<FakeRelay>,
    pacer: Arc<RecordingPacer>,
) -> CampaignService {
    CampaignService::new(settings, relay)
        .with_pacer(pacer)
        .with_randomness(Box::new(FixedRandomness::new(0)))
}

fn read_results(settings: &Settings) -> Vec<SentEmail> {
    csv::Reader::from_path(&settings.campaign.results_path)
        .unwrap()
        .deserialize()
        .collect::<std::result::Result<Vec<SentEmail>, _>>()
        .unwrap()
}

fn load_checkpoint(settings: &Settings) -> Checkpoint {
    CheckpointStore::new(settings.campaign.checkpoint_path.clone())
        .load()
        .unwrap()
}

const JANE: &str = "name,title\nJane Doe,Recruiter\n";

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn every_candidate_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path(), JANE);
    let relay = FakeRelay::new(|_| true);
    let pacer = Arc::new(RecordingPacer::default());

    let summary = campaign(&settings, relay.clone(), pacer.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(
        relay.recipients(),
        vec!["jane@stripe.com", "jdoe@stripe.com", "jane.doe@stripe.com"]
    );

    let results = read_results(&settings);
    assert_eq!(results.len(), 3);
    for record in &results {
        assert_eq!(record.status, SendStatus::Sent);
        assert_eq!(record.recruiter_name, "Jane Doe");
        assert_eq!(record.title, "Recruiter");
        assert_eq!(record.company, "Stripe");
    }

    let checkpoint = load_checkpoint(&settings);
    assert_eq!(checkpoint.last_processed_index, 1);
    assert_eq!(checkpoint.sent_emails.len(), 3);
    assert_eq!(checkpoint.sent_emails, results);

    assert_eq!(summary.next_index, 1);
    assert_eq!(pacer.pauses.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn every_candidate_fails_row_is_not_advanced() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path(), JANE);
    let relay = FakeRelay::new(|_| false);
    let pacer = Arc::new(RecordingPacer::default());

    let summary = campaign(&settings, relay.clone(), pacer.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(relay.recipients().len(), 3);
    assert!(read_results(&settings).is_empty());

    // The row stays unprocessed, so the next run retries it from scratch.
    assert_eq!(load_checkpoint(&settings), Checkpoint::default());
    assert_eq!(summary.rows_undelivered, 1);
    assert_eq!(summary.next_index, 0);
    assert_eq!(pacer.pauses.lock().unwrap().len(), 3);

    let again = FakeRelay::new(|_| false);
    campaign(&settings, again.clone(), Arc::new(RecordingPacer::default()))
        .run()
        .await
        .unwrap();
    assert_eq!(again.recipients().len(), 3);
    assert_eq!(load_checkpoint(&settings).last_processed_index, 0);
}

#[tokio::test]
async fn resumes_from_checkpoint_and_keeps_earlier_sends() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(
        dir.path(),
        "name,title\nJane Doe,Recruiter\nJohn Roe,Sourcer\n",
    );

    let jane = Contact::new("Jane Doe", "Recruiter");
    let earlier = SentEmail::sent(&jane, "jane@stripe.com", "Stripe");
    CheckpointStore::new(settings.campaign.checkpoint_path.clone())
        .save(1, &[earlier.clone()])
        .unwrap();

    let relay = FakeRelay::new(|to| to == "jroe@stripe.com");
    let summary = campaign(&settings, relay.clone(), Arc::new(RecordingPacer::default()))
        .run()
        .await
        .unwrap();

    assert_eq!(summary.start_index, 1);
    assert_eq!(
        relay.recipients(),
        vec!["john@stripe.com", "jroe@stripe.com", "john.roe@stripe.com"]
    );

    let results = read_results(&settings);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0], earlier);
    assert_eq!(results[1].email, "jroe@stripe.com");
    assert_eq!(results[1].title, "Sourcer");

    let checkpoint = load_checkpoint(&settings);
    assert_eq!(checkpoint.last_processed_index, 2);
    assert_eq!(checkpoint.sent_emails, results);
}

#[tokio::test]
async fn later_success_jumps_past_failed_row() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(
        dir.path(),
        "name,title\nNobody Here,Recruiter\nJane Doe,Recruiter\n",
    );

    let relay = FakeRelay::new(|to| to.starts_with("jane"));
    let summary = campaign(&settings, relay, Arc::new(RecordingPacer::default()))
        .run()
        .await
        .unwrap();

    assert_eq!(summary.rows_undelivered, 1);
    assert_eq!(load_checkpoint(&settings).last_processed_index, 2);
    assert_eq!(read_results(&settings).len(), 2);
}

#[tokio::test]
async fn one_message_body_per_row() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path(), JANE);
    let relay = FakeRelay::new(|_| true);

    campaign(&settings, relay.clone(), Arc::new(RecordingPacer::default()))
        .run()
        .await
        .unwrap();

    let attempts = relay.attempts.lock().unwrap();
    assert!(attempts.iter().all(|email| email.body_html == attempts[0].body_html));
    assert!(attempts[0].body_html.contains("<p>Hi Jane,</p>"));
    assert!(attempts
        .iter()
        .all(|email| email.subject == "Application for SDE Role at Stripe"));
    assert!(attempts
        .iter()
        .all(|email| email.from.display() == "Alex Example <alex@example.com>"));
}

#[tokio::test]
async fn resume_is_attached_when_present() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = settings(dir.path(), JANE);
    let resume = dir.path().join("resume.pdf");
    std::fs::write(&resume, b"%PDF-1.4").unwrap();
    settings.campaign.resume_path = Some(resume);

    let relay = FakeRelay::new(|_| true);
    campaign(&settings, relay.clone(), Arc::new(RecordingPacer::default()))
        .run()
        .await
        .unwrap();

    let attempts = relay.attempts.lock().unwrap();
    assert!(attempts.iter().all(|email| email.attachments.len() == 1));
    assert_eq!(attempts[0].attachments[0].filename, "Resume.pdf");
}

#[tokio::test]
async fn missing_contact_table_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = settings(dir.path(), JANE);
    settings.campaign.contacts_path = dir.path().join("absent.csv");

    let relay = FakeRelay::new(|_| true);
    let result = campaign(&settings, relay.clone(), Arc::new(RecordingPacer::default()))
        .run()
        .await;

    assert!(result.is_err());
    assert!(relay.recipients().is_empty());
    assert!(!settings.campaign.results_path.exists());
}
