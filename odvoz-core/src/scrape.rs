//! Scrape orchestrator producing one complete snapshot per refresh cycle.

use std::sync::Arc;
use std::time::Duration;

use tracing::{Instrument, debug, info, info_span, warn};

use crate::model::{CategoryReading, PollPolicy, RetryPolicy, WasteCategory, WasteSnapshot};
use crate::poll::{PollError, wait_for_with_retry};
use crate::ports::{PageDriver, PageSession, PortError};
use crate::retry::{RetryError, retry};
use crate::store::SnapshotStore;
use crate::target::ScrapeTarget;

#[derive(thiserror::Error, Debug)]
/// Reasons a refresh cycle ends without publishing.
pub enum ScrapeError {
    /// The page session could not be opened.
    #[error("Session error: {0}")]
    Session(#[source] PortError),
    /// The target page never loaded.
    #[error("Navigation error: {0}")]
    Navigation(#[source] RetryError<PortError>),
    /// The address input never appeared.
    #[error("Address input not found: {0}")]
    AddressInput(#[source] RetryError<PollError>),
    /// The matching address suggestion never appeared.
    #[error("Address suggestion not found: {0}")]
    SuggestionNotFound(#[source] RetryError<PollError>),
    /// Typing the address or clicking the suggestion kept failing.
    #[error("Interaction error: {0}")]
    Interaction(#[source] RetryError<PortError>),
    /// Reading one category failed; does not abort a cycle on its own.
    #[error("Extraction error for {category}: {reason}")]
    Extraction {
        /// Category whose fields could not be read.
        category: WasteCategory,
        /// What went wrong.
        reason: String,
    },
}

/// What a category keeps when its fields cannot be read in a cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFallback {
    /// Publish empty label and date for the category.
    #[default]
    Blank,
    /// Publish the reading the store currently holds for the category.
    RetainPrevious,
}

/// Timing knobs for one refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeSettings {
    /// Retry budget applied to every step.
    pub retry: RetryPolicy,
    /// Wait for the address input, which appears once the page script has loaded.
    pub input_wait: PollPolicy,
    /// Wait for suggestions and category elements.
    pub element_wait: PollPolicy,
    /// Behaviour for categories that cannot be read.
    pub fallback: CategoryFallback,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            input_wait: PollPolicy::new(Duration::from_secs(10)),
            element_wait: PollPolicy::new(Duration::from_secs(5)),
            fallback: CategoryFallback::default(),
        }
    }
}

/// Drives the collection page through a [`PageDriver`] and publishes results.
pub struct Scraper {
    driver: Arc<dyn PageDriver>,
    target: ScrapeTarget,
    settings: ScrapeSettings,
    store: SnapshotStore,
}

impl Scraper {
    /// Create an orchestrator publishing into `store`.
    #[must_use]
    pub fn new(
        driver: Arc<dyn PageDriver>,
        target: ScrapeTarget,
        settings: ScrapeSettings,
        store: SnapshotStore,
    ) -> Self {
        Self {
            driver,
            target,
            settings,
            store,
        }
    }

    /// Run one full cycle and publish its snapshot.
    ///
    /// The session is closed on every exit path. The store is only written
    /// when every step up to and including category extraction has run.
    ///
    /// # Errors
    ///
    /// Returns a [`ScrapeError`] when the session cannot be opened or a step
    /// exhausts its retry budget. The store is left untouched in that case.
    pub async fn run_cycle(&self) -> Result<WasteSnapshot, ScrapeError> {
        let span = info_span!("refresh_cycle", url = %self.target.url);

        async {
            info!("refresh cycle started");
            let session = self.driver.open().await.map_err(ScrapeError::Session)?;

            let outcome = self.scrape(session.as_ref()).await;

            if let Err(err) = session.close().await {
                warn!(error = %err, "failed to close page session");
            }

            let snapshot = outcome?;
            self.store.write(snapshot.clone()).await;
            info!("snapshot published");
            Ok::<_, ScrapeError>(snapshot)
        }
        .instrument(span)
        .await
    }

    async fn scrape(&self, session: &dyn PageSession) -> Result<WasteSnapshot, ScrapeError> {
        let ScrapeSettings {
            retry: policy,
            input_wait,
            element_wait,
            ..
        } = self.settings;
        let url = self.target.url.as_str();

        retry(policy, "navigate", || session.navigate(url))
            .await
            .map_err(ScrapeError::Navigation)?;
        debug!("page loaded");

        let input = wait_for_with_retry(
            session,
            &self.target.address_input,
            input_wait,
            policy,
            "wait for address input",
        )
        .await
        .map_err(ScrapeError::AddressInput)?;

        let address = self.target.address.as_str();
        retry(policy, "type address", || input.send_keys(address))
            .await
            .map_err(ScrapeError::Interaction)?;
        debug!(address, "address typed");

        let suggestion = wait_for_with_retry(
            session,
            &self.target.suggestion,
            element_wait,
            policy,
            "wait for address suggestion",
        )
        .await
        .map_err(ScrapeError::SuggestionNotFound)?;

        retry(policy, "click suggestion", || suggestion.click())
            .await
            .map_err(ScrapeError::Interaction)?;
        debug!("address suggestion selected");

        let previous = match self.settings.fallback {
            CategoryFallback::Blank => None,
            CategoryFallback::RetainPrevious => Some(self.store.read().await),
        };

        let mut snapshot = WasteSnapshot::default();
        for category in WasteCategory::ALL {
            match self.extract(session, category).await {
                Ok(reading) => {
                    debug!(%category, label = %reading.label, date = %reading.date, "category read");
                    snapshot.set(category, reading);
                }
                Err(err) => {
                    warn!(error = %err, fallback = ?self.settings.fallback, "category degraded");
                    if let Some(previous) = &previous {
                        snapshot.set(category, previous.reading(category).clone());
                    }
                }
            }
        }

        Ok(snapshot)
    }

    async fn extract(
        &self,
        session: &dyn PageSession,
        category: WasteCategory,
    ) -> Result<CategoryReading, ScrapeError> {
        let extraction = |reason: String| ScrapeError::Extraction { category, reason };

        let locators = self
            .target
            .category(category)
            .ok_or_else(|| extraction("no locators configured".to_owned()))?;

        let policy = self.settings.retry;
        let wait = self.settings.element_wait;

        let label = wait_for_with_retry(session, &locators.label, wait, policy, "wait for label")
            .await
            .map_err(|err| extraction(err.to_string()))?;
        let date = wait_for_with_retry(session, &locators.date, wait, policy, "wait for date")
            .await
            .map_err(|err| extraction(err.to_string()))?;

        let label = label.text().await.map_err(|err| extraction(err.to_string()))?;
        let date = date.text().await.map_err(|err| extraction(err.to_string()))?;

        Ok(CategoryReading::new(label.trim(), date.trim()))
    }
}
