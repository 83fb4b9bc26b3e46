//! Paged retrieval of a player's match history.

use chrono::Utc;
use futures_util::{StreamExt, stream};
use tracing::{info, instrument, warn};

use super::riot::{MAX_MATCH_IDS_PER_PAGE, MatchIdsQuery, RiotClient};
use crate::Result;
use crate::types::MatchDto;

/// Options for [`RiotClient::full_match_history`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryOptions {
    /// Stop after this many matches. Default: 100.
    pub max_matches: usize,
    /// Only matches started within this many days. Default: 365.
    pub days_back: u32,
    /// Optional queue filter (e.g. 420 for ranked solo).
    pub queue: Option<u32>,
    /// Match detail requests in flight at once. Default: 4.
    pub concurrency: usize,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            max_matches: 100,
            days_back: 365,
            queue: None,
            concurrency: 4,
        }
    }
}

impl HistoryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_matches(mut self, n: usize) -> Self {
        self.max_matches = n;
        self
    }

    pub fn days_back(mut self, days: u32) -> Self {
        self.days_back = days;
        self
    }

    pub fn queue(mut self, queue: u32) -> Self {
        self.queue = Some(queue);
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = n;
        self
    }
}

impl RiotClient {
    /// Detailed matches for `puuid`, newest first.
    ///
    /// Ids are listed in pages of 100 starting `days_back` days ago. Paging
    /// stops at an empty or short page, or once `max_matches` details are in
    /// hand. A match whose details cannot be fetched is skipped with a
    /// warning, and the next page resumes right after the last id tried so
    /// skipped matches are backfilled up to `max_matches`. A failure on the first id page is returned; on later pages it
    /// ends paging and the matches gathered so far are returned.
    #[instrument(skip(self, options), fields(max_matches = options.max_matches))]
    pub async fn full_match_history(&self, puuid: &str, options: &HistoryOptions) -> Result<Vec<MatchDto>> {
        let start_time = (Utc::now() - chrono::Duration::days(i64::from(options.days_back))).timestamp();
        let page_size = MAX_MATCH_IDS_PER_PAGE;
        let mut matches = Vec::new();
        let mut start = 0u32;

        info!("fetching match history");
        while matches.len() < options.max_matches {
            let query = MatchIdsQuery::new()
                .start(start)
                .count(page_size)
                .start_time(start_time)
                .queue(options.queue);

            let ids = match self.match_ids_by_puuid(puuid, &query).await {
                Ok(ids) => ids,
                Err(e) if start == 0 => return Err(e),
                Err(e) => {
                    warn!(start, error = %e, "failed to list match ids, stopping");
                    break;
                }
            };
            if ids.is_empty() {
                info!("no more matches");
                break;
            }

            let page_len = ids.len();
            let taken = page_len.min(options.max_matches - matches.len());
            let details: Vec<_> = stream::iter(ids.into_iter().take(taken))
                .map(|id| async move {
                    let result = self.match_details(&id).await;
                    (id, result)
                })
                .buffered(options.concurrency.max(1))
                .collect()
                .await;

            for (id, result) in details {
                match result {
                    Ok(m) => matches.push(m),
                    Err(e) => warn!(match_id = %id, error = %e, "skipping match"),
                }
            }

            // Ids left untaken are listed again by the next page.
            start += taken as u32;
            if taken == page_len && page_len < page_size as usize {
                break;
            }
        }

        info!(count = matches.len(), "match history fetched");
        Ok(matches)
    }
}
