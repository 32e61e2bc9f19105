//! Campaign driver.
//!
//! Walks the contact table from the checkpointed row to the end. For each row
//! it guesses candidate addresses, renders one message, and tries every
//! candidate in order. Each success is recorded and checkpointed before the
//! pause that follows it, so stopping the process mid-pause loses no
//! delivered send. The pause follows every attempt, successful or not.
//!
//! A row is only marked processed when at least one candidate succeeds,
//! unless `advance_on_total_failure` is set. Without it, a row whose every
//! candidate fails is retried in full on the next run, which never ends if the
//! name can never be delivered to.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{CampaignSettings, Settings};
use crate::domain::{Contact, SentEmail};
use crate::providers::email::{Address, EmailTransport};
use crate::storage::{read_contacts, write_results, CheckpointStore, StorageError};

use super::pacing::minutes;
use super::{
    AddressGuesser, MessageComposer, Pacer, Randomness, SenderService, ThreadRandomness,
    TokioPacer,
};

/// Errors that abort a campaign run.
#[derive(Debug, Error)]
pub enum CampaignError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for campaign operations.
pub type Result<T> = std::result::Result<T, CampaignError>;

/// Counters describing one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignSummary {
    /// Row the run resumed from.
    pub start_index: usize,
    /// Checkpoint index after the run.
    pub next_index: usize,
    /// Rows visited in this run.
    pub rows_processed: usize,
    /// Rows skipped because the name produced no candidates.
    pub rows_skipped: usize,
    /// Rows where every candidate failed.
    pub rows_undelivered: usize,
    /// Delivery attempts made in this run.
    pub attempts: usize,
    /// Successful sends in this run.
    pub sent_this_run: usize,
    /// Records written to the results table, including earlier runs.
    pub sent_total: usize,
}

/// What happened to one contact row.
enum RowOutcome {
    /// The name produced no candidate addresses; nothing was attempted.
    NoCandidates,
    /// Number of candidates the relay accepted.
    Delivered(usize),
}

/// Runs a campaign over one contact table.
pub struct CampaignService {
    settings: CampaignSettings,
    guesser: AddressGuesser,
    composer: MessageComposer,
    sender: SenderService,
    store: CheckpointStore,
    pacer: Arc<dyn Pacer>,
    rng: Box<dyn Randomness>,
}

impl CampaignService {
    /// Creates a campaign from settings, sending through `transport`.
    ///
    /// Pauses sleep on the tokio timer and phrases are drawn from the thread
    /// generator; see [`with_pacer`](Self::with_pacer) and
    /// [`with_randomness`](Self::with_randomness) to replace either.
    pub fn new(settings: &Settings, transport: Arc<dyn EmailTransport>) -> Self {
        let from = match &settings.sender.display_name {
            Some(name) => Address::with_name(name.clone(), settings.sender.address.clone()),
            None => Address::new(settings.sender.address.clone()),
        };
        let campaign = settings.campaign.clone();

        Self {
            guesser: AddressGuesser::new(campaign.domain.clone()),
            composer: MessageComposer::new(settings.profile.clone()),
            sender: SenderService::new(transport, from, campaign.attachment_filename.clone()),
            store: CheckpointStore::new(campaign.checkpoint_path.clone()),
            settings: campaign,
            pacer: Arc::new(TokioPacer),
            rng: Box::new(ThreadRandomness),
        }
    }

    /// Replaces the pacer.
    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// Replaces the randomness source.
    pub fn with_randomness(mut self, rng: Box<dyn Randomness>) -> Self {
        self.rng = rng;
        self
    }

    /// Returns the checkpoint store this campaign writes to.
    pub fn checkpoint_store(&self) -> &CheckpointStore {
        &self.store
    }

    /// Runs the campaign from the checkpointed row to the end of the table,
    /// then writes the results table.
    pub async fn run(&mut self) -> Result<CampaignSummary> {
        let checkpoint = self.store.load()?;
        let start_index = checkpoint.last_processed_index;
        let mut sent = checkpoint.sent_emails;
        info!(start_index, previously_sent = sent.len(), "Resuming from index {}", start_index);

        let contacts = read_contacts(&self.settings.contacts_path)?;

        let mut summary = CampaignSummary {
            start_index,
            next_index: start_index,
            ..Default::default()
        };

        for (index, contact) in contacts.iter().enumerate().skip(start_index) {
            summary.rows_processed += 1;
            match self.process_row(index, contact, &mut sent, &mut summary).await? {
                RowOutcome::NoCandidates => summary.rows_skipped += 1,
                RowOutcome::Delivered(0) => {
                    summary.rows_undelivered += 1;
                    if self.settings.advance_on_total_failure {
                        info!(row = index, "No candidate delivered, advancing past row");
                        self.store.save(index + 1, &sent)?;
                        summary.next_index = index + 1;
                    } else {
                        warn!(
                            row = index,
                            name = %contact.name,
                            "No candidate delivered; row will be retried on the next run"
                        );
                    }
                }
                RowOutcome::Delivered(_) => {}
            }
        }

        write_results(&self.settings.results_path, &sent)?;
        summary.sent_total = sent.len();

        info!(
            sent = summary.sent_this_run,
            attempts = summary.attempts,
            results = %self.settings.results_path.display(),
            "Email campaign completed"
        );
        Ok(summary)
    }

    /// Attempts every candidate for one row.
    async fn process_row(
        &mut self,
        index: usize,
        contact: &Contact,
        sent: &mut Vec<SentEmail>,
        summary: &mut CampaignSummary,
    ) -> Result<RowOutcome> {
        let company = self.settings.company.clone();
        info!(
            row = index,
            name = %contact.name,
            title = %contact.title,
            company = %company,
            "Processing recruiter"
        );

        let candidates = self.guesser.guess(&contact.name);
        if candidates.is_empty() {
            info!(row = index, "Name has no candidate addresses, skipping");
            return Ok(RowOutcome::NoCandidates);
        }
        debug!(row = index, ?candidates, "Candidate addresses");

        let request = self.composer.request_for(&contact.name, Some(&company));
        let body = self.composer.compose(&request, self.rng.as_mut());

        let resume_path: Option<PathBuf> = self.settings.resume_path.clone();
        let mut delivered = 0;
        for email in &candidates {
            summary.attempts += 1;
            info!(recipient = %email, "Attempting to send email");

            if self
                .sender
                .send(email, &self.settings.subject, &body, resume_path.as_deref())
                .await
            {
                sent.push(SentEmail::sent(contact, email.clone(), company.clone()));
                delivered += 1;
                summary.sent_this_run += 1;
                info!(name = %contact.name, recipient = %email, "Successfully sent email");

                self.store.save(index + 1, sent.as_slice())?;
                summary.next_index = index + 1;
            }

            self.pause().await;
        }

        Ok(RowOutcome::Delivered(delivered))
    }

    async fn pause(&mut self) {
        let delay = self.rng.uniform(
            self.settings.delay_min_minutes,
            self.settings.delay_max_minutes,
        );
        let duration = minutes(delay);
        match resume_time(duration) {
            Some(resume_at) => info!(
                "Waiting {:.2} minutes before next email (until {})",
                delay,
                resume_at.format("%H:%M:%S")
            ),
            None => info!("Waiting {:.2} minutes before next email", delay),
        }
        self.pacer.pause(duration).await;
    }
}

/// Wall-clock time after `duration`, or `None` when it is out of range.
fn resume_time(duration: std::time::Duration) -> Option<chrono::DateTime<chrono::Local>> {
    let offset = chrono::Duration::from_std(duration).ok()?;
    chrono::Local::now().checked_add_signed(offset)
}
