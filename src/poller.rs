use std::time::Duration;

use crate::config::QueryParameters;
use crate::fetcher::{FetchError, SlotFetcher};
use crate::notifier::Notifier;

/// Drives the fetch → notify → sleep cycle forever.
///
/// Every fetch outcome is handled inside the cycle; nothing that happens
/// upstream can end the loop. The sleep is a fixed interval, never
/// shortened or backed off.
pub struct PollLoop<N> {
    fetcher: SlotFetcher,
    params: QueryParameters,
    interval: Duration,
    notifier: N,
}

impl<N: Notifier> PollLoop<N> {
    pub fn new(
        fetcher: SlotFetcher,
        params: QueryParameters,
        interval: Duration,
        notifier: N,
    ) -> Self {
        Self {
            fetcher,
            params,
            interval,
            notifier,
        }
    }

    /// Runs until the process is terminated.
    pub async fn run(&self) {
        tracing::info!(
            "Watching {} every {}s",
            self.params.api_url,
            self.interval.as_secs()
        );

        loop {
            self.cycle().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// One poll cycle. Always returns normally, whatever the fetch did.
    async fn cycle(&self) {
        match self.fetcher.fetch(&self.params).await {
            Ok(slots) => {
                tracing::info!("Found {} available slot(s)", slots.len());
                self.notifier.notify(&slots).await;
            }
            Err(FetchError::NoSlotsFound) => {
                tracing::info!("No appointment slots available");
            }
            Err(err) => {
                let cause = anyhow::Error::new(err);
                tracing::error!("Availability check failed: {cause:#}");
            }
        }
    }
}
