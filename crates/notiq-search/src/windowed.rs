//! Windowed result counts for saved searches.
//!
//! A saved search is counted three times, each over a derived spec that
//! differs from the stored one only in its date fields:
//!
//! | Window      | Published window | Closing floor                  |
//! |-------------|------------------|--------------------------------|
//! | `current`   | none             | start of today, tenders only   |
//! | `last_year` | now - 1y .. now  | none                           |
//! | `five_year` | now - 5y .. now  | none                           |
//!
//! The three counts run concurrently. Any failure (or cancellation) fails
//! the whole operation; partial totals are never returned.

use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use notiq_core::temporal::{start_of_day, years_before};
use notiq_core::{Error, Result, SavedSearch, SearchSpec, WindowedTotals};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::service::{count_or_cancel, SearchService};

/// Date window variant of a saved search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountWindow {
    Current,
    LastYear,
    FiveYear,
}

impl CountWindow {
    pub const ALL: [CountWindow; 3] = [Self::Current, Self::LastYear, Self::FiveYear];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::LastYear => "last_year",
            Self::FiveYear => "five_year",
        }
    }

    /// Derive this window's spec from `spec`, leaving text and structured
    /// filters untouched.
    pub fn derive_spec(&self, spec: &SearchSpec, now: DateTime<Utc>) -> SearchSpec {
        match self {
            Self::Current => {
                let floor = spec.is_tender_only().then(|| start_of_day(now));
                spec.with_published_window(None, None).with_closing_floor(floor)
            }
            Self::LastYear => spec
                .with_published_window(Some(years_before(now, 1)), Some(now))
                .with_closing_floor(None),
            Self::FiveYear => spec
                .with_published_window(Some(years_before(now, 5)), Some(now))
                .with_closing_floor(None),
        }
    }
}

/// Counts saved searches over their three date windows.
#[derive(Debug, Clone)]
pub struct WindowedCounter {
    service: SearchService,
}

impl WindowedCounter {
    pub fn new(service: SearchService) -> Self {
        Self { service }
    }

    /// Window totals for `spec`, with windows resolved against `now`.
    #[instrument(skip(self, spec, token), fields(
        subsystem = "search",
        component = "windowed_counter",
        op = "counts",
        index = spec.index.as_str(),
    ))]
    pub async fn counts_at(
        &self,
        spec: &SearchSpec,
        now: DateTime<Utc>,
        token: &CancellationToken,
    ) -> Result<WindowedTotals> {
        let start = Instant::now();

        let (current, last_year, five_year) = tokio::try_join!(
            self.count_window(CountWindow::Current, spec, now, token),
            self.count_window(CountWindow::LastYear, spec, now, token),
            self.count_window(CountWindow::FiveYear, spec, now, token),
        )?;

        debug!(
            current,
            last_year,
            five_year,
            duration_ms = start.elapsed().as_millis() as u64,
            "Windowed counts complete"
        );
        Ok(WindowedTotals {
            current,
            last_year,
            five_year,
        })
    }

    /// Window totals for `spec` against the system clock.
    pub async fn counts(&self, spec: &SearchSpec, token: &CancellationToken) -> Result<WindowedTotals> {
        self.counts_at(spec, Utc::now(), token).await
    }

    /// Attach totals to every saved search in the batch.
    ///
    /// Searches are counted concurrently against one shared `now`. The first
    /// failure aborts the rest and is returned; no search in the batch gets
    /// totals in that case.
    #[instrument(skip(self, searches, token), fields(
        subsystem = "search",
        component = "windowed_counter",
        op = "populate_totals",
        batch_size = searches.len(),
    ))]
    pub async fn populate_totals(
        &self,
        searches: Vec<SavedSearch>,
        token: &CancellationToken,
    ) -> Result<Vec<SavedSearch>> {
        let start = Instant::now();
        let now = Utc::now();

        let totals = try_join_all(
            searches
                .iter()
                .map(|search| self.count_saved_search(search, now, token)),
        )
        .await?;

        info!(
            result_count = searches.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Saved-search totals populated"
        );

        Ok(searches
            .into_iter()
            .zip(totals)
            .map(|(search, totals)| search.with_totals(totals))
            .collect())
    }

    #[instrument(skip_all, fields(
        saved_search_id = search.id,
        member_id = search.member_id,
    ))]
    async fn count_saved_search(
        &self,
        search: &SavedSearch,
        now: DateTime<Utc>,
        token: &CancellationToken,
    ) -> Result<WindowedTotals> {
        self.counts_at(&search.spec, now, token).await
    }

    async fn count_window(
        &self,
        window: CountWindow,
        spec: &SearchSpec,
        now: DateTime<Utc>,
        token: &CancellationToken,
    ) -> Result<u64> {
        let compiled = self.service.compile(&window.derive_spec(spec, now));
        match count_or_cancel(self.service.backend(), &compiled, token).await {
            Ok(count) => {
                debug!(window = window.as_str(), result_count = count, "Window counted");
                Ok(count)
            }
            Err(Error::Cancelled) => {
                debug!(window = window.as_str(), "Window count cancelled");
                Err(Error::Cancelled)
            }
            Err(e) => {
                warn!(window = window.as_str(), error = %e, "Window count failed");
                Err(e)
            }
        }
    }
}
