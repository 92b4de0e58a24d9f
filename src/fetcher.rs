use thiserror::Error;

use crate::config::QueryParameters;
use crate::slot::{CityAvailability, Slot};

const START_DATE_FORMAT: &str = "%Y-%m-%d";

/// Why one availability check produced no slots.
///
/// `NoSlotsFound` is the expected steady state and is logged as such;
/// the other two carry the underlying cause for diagnostics. The poll
/// loop treats all three the same way: log and wait for the next cycle.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure, timeout, non-2xx status, or a body that is
    /// not JSON at all.
    #[error("availability request failed")]
    RequestFailed(#[source] anyhow::Error),

    /// The API answered with JSON we do not understand: wrong shape,
    /// missing fields, or an unparsable slot timestamp. The whole batch
    /// is rejected, never a partial list.
    #[error("availability response was malformed")]
    MalformedResponse(#[source] anyhow::Error),

    /// Well-formed response, zero slots across all cities.
    #[error("no appointment slots available")]
    NoSlotsFound,
}

/// Performs one availability request per call. Stateless between calls.
pub struct SlotFetcher {
    client: reqwest::Client,
}

impl SlotFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Queries the availability API once and returns the validated slots.
    ///
    /// The search window always starts today: the start date is computed
    /// here, at call time, so a long-running process never queries from a
    /// stale date.
    pub async fn fetch(&self, params: &QueryParameters) -> Result<Vec<Slot>, FetchError> {
        let start_date = chrono::Local::now()
            .date_naive()
            .format(START_DATE_FORMAT)
            .to_string();
        self.fetch_from(params, &start_date).await
    }

    async fn fetch_from(
        &self,
        params: &QueryParameters,
        start_date: &str,
    ) -> Result<Vec<Slot>, FetchError> {
        let response = self
            .client
            .get(&params.api_url)
            .query(&params.query_pairs(start_date))
            .send()
            .await
            .map_err(|e| request_failed(e, "request could not be sent"))?
            .error_for_status()
            .map_err(|e| request_failed(e, "API returned an error status"))?;

        let body = response
            .text()
            .await
            .map_err(|e| request_failed(e, "failed to read response body"))?;

        // Not JSON at all is a transport-level problem; JSON of the wrong
        // shape is a malformed response. Decode in two steps to tell them
        // apart.
        let json: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| request_failed(e, "response body is not JSON"))?;

        let cities: Vec<CityAvailability> = serde_json::from_value(json).map_err(|e| {
            FetchError::MalformedResponse(
                anyhow::Error::new(e).context("unexpected response structure"),
            )
        })?;

        let mut slots = Vec::new();
        for city in &cities {
            for raw in &city.available_slots {
                let slot = Slot::from_raw(&city.city_name, raw)
                    .map_err(|e| FetchError::MalformedResponse(e.into()))?;
                slots.push(slot);
            }
        }

        if slots.is_empty() {
            return Err(FetchError::NoSlotsFound);
        }

        Ok(slots)
    }
}

fn request_failed(
    source: impl std::error::Error + Send + Sync + 'static,
    context: &'static str,
) -> FetchError {
    FetchError::RequestFailed(anyhow::Error::new(source).context(context))
}
