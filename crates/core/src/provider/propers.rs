//! Re-checks recently obtained episodes for PROPER and REPACK releases.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, error, info, warn};

use crate::library::{Library, Show};
use crate::metrics::PROPERS_FOUND;

use super::query::{build_episode_terms, PROPER_SUFFIX};
use super::{ProperCandidate, ProviderError, TorrentProvider};

/// Finds re-releases of episodes the library already downloaded or snatched.
pub struct ProperFinder {
    library: Arc<dyn Library>,
}

impl ProperFinder {
    pub fn new(library: Arc<dyn Library>) -> Self {
        Self { library }
    }

    /// Search `provider` for propers of every episode aired on or after
    /// `since`. A failed episode listing is logged and produces an empty
    /// list; a failed lookup for one row only skips that row.
    pub async fn find_propers(
        &self,
        provider: &dyn TorrentProvider,
        since: NaiveDate,
    ) -> Vec<ProperCandidate> {
        match self.collect(provider, since).await {
            Ok(found) => {
                PROPERS_FOUND.inc_by(found.len() as u64);
                info!(
                    provider = provider.name(),
                    since = %since,
                    found = found.len(),
                    "Proper search complete"
                );
                found
            }
            Err(e) => {
                error!(provider = provider.name(), error = %e, "Failed to query library for propers");
                Vec::new()
            }
        }
    }

    async fn collect(
        &self,
        provider: &dyn TorrentProvider,
        since: NaiveDate,
    ) -> Result<Vec<ProperCandidate>, ProviderError> {
        let recent = self.library.recent_episodes(since)?;
        debug!(episodes = recent.len(), since = %since, "Checking episodes for propers");

        let mut shows: HashMap<i64, Option<Arc<Show>>> = HashMap::new();
        let mut found = Vec::new();

        for row in recent {
            let show = match shows.get(&row.show_id) {
                Some(cached) => cached.clone(),
                None => match self.library.find_show(row.show_id) {
                    Ok(show) => {
                        let show = show.map(Arc::new);
                        shows.insert(row.show_id, show.clone());
                        show
                    }
                    Err(e) => {
                        warn!(show_id = row.show_id, error = %e, "Show lookup failed, skipping");
                        continue;
                    }
                },
            };
            let Some(show) = show else {
                debug!(show_id = row.show_id, show = %row.show_name, "Show no longer in library");
                continue;
            };

            let episode = match self.library.find_episode(&show, row.season, row.episode) {
                Ok(Some(episode)) => episode,
                Ok(None) => {
                    debug!(
                        show = %show.name,
                        season = row.season,
                        episode = row.episode,
                        "Episode no longer in library"
                    );
                    continue;
                }
                Err(e) => {
                    warn!(
                        show = %show.name,
                        season = row.season,
                        episode = row.episode,
                        error = %e,
                        "Episode lookup failed, skipping"
                    );
                    continue;
                }
            };

            for terms in build_episode_terms(&show, Some(&episode), PROPER_SUFFIX) {
                for candidate in provider.search_candidates(&terms).await {
                    found.push(ProperCandidate {
                        candidate,
                        discovered_at: Utc::now(),
                        show: Arc::clone(&show),
                    });
                }
            }
        }

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::SearchMode;
    use crate::testing::fixtures::{entry, episode, recent, show};
    use crate::testing::{MockLibrary, MockProvider};

    fn aired() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 10, 1).unwrap()
    }

    fn since() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 9, 30).unwrap()
    }

    #[tokio::test]
    async fn test_finds_propers_with_suffix() {
        let library = MockLibrary::new();
        let show_x = show(1, "Show X");
        library.add_recent(recent(&show_x, 2, 5, aired()));
        library.add_episode(episode(1, 2, 5, aired()));
        library.add_show(show_x);

        let provider = MockProvider::new();
        provider
            .set_results(vec![entry("Show X S02E05 PROPER 720p HDTV x264", 9, 10, 1)])
            .await;

        let finder = ProperFinder::new(Arc::new(library));
        let propers = finder.find_propers(&provider, since()).await;

        assert_eq!(propers.len(), 1);
        assert_eq!(propers[0].candidate.title, "Show.X.S02E05.PROPER.720p.HDTV.x264");
        assert_eq!(propers[0].show.name, "Show X");

        let searched = provider.recorded_searches().await;
        assert_eq!(searched.len(), 1);
        assert_eq!(
            searched[0].terms.get(SearchMode::Episode),
            ["Show X S02E05 PROPER|REPACK".to_string()]
        );
    }

    #[tokio::test]
    async fn test_show_looked_up_once_per_run() {
        let library = MockLibrary::new();
        let show_x = show(1, "Show X");
        for number in [5, 6] {
            library.add_recent(recent(&show_x, 2, number, aired()));
            library.add_episode(episode(1, 2, number, aired()));
        }
        library.add_show(show_x);

        let provider = MockProvider::new();
        provider.set_results(vec![entry("Show X PROPER", 1, 1, 1)]).await;

        let finder = ProperFinder::new(Arc::new(library));
        let propers = finder.find_propers(&provider, since()).await;
        assert_eq!(propers.len(), 2);
        assert!(Arc::ptr_eq(&propers[0].show, &propers[1].show));
    }

    #[tokio::test]
    async fn test_missing_show_or_episode_is_skipped() {
        let library = MockLibrary::new();
        let show_x = show(1, "Show X");
        library.add_recent(recent(&show_x, 2, 5, aired()));
        library.add_recent(recent(&show(2, "Gone"), 1, 1, aired()));
        library.add_show(show_x);

        let provider = MockProvider::new();
        let finder = ProperFinder::new(Arc::new(library));
        assert!(finder.find_propers(&provider, since()).await.is_empty());
        assert!(provider.recorded_searches().await.is_empty());
    }

    #[tokio::test]
    async fn test_older_episodes_ignored() {
        let library = MockLibrary::new();
        let show_x = show(1, "Show X");
        let old = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        library.add_recent(recent(&show_x, 1, 1, old));
        library.add_episode(episode(1, 1, 1, old));
        library.add_show(show_x);

        let provider = MockProvider::new();
        let finder = ProperFinder::new(Arc::new(library));
        assert!(finder.find_propers(&provider, since()).await.is_empty());
        assert!(provider.recorded_searches().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_show_lookup_keeps_other_propers() {
        let library = MockLibrary::new();
        let show_x = show(1, "Show X");
        library.add_recent(recent(&show_x, 2, 5, aired()));
        library.add_episode(episode(1, 2, 5, aired()));
        library.add_show(show_x);

        let show_y = show(2, "Show Y");
        library.add_recent(recent(&show_y, 1, 3, aired()));
        library.add_episode(episode(2, 1, 3, aired()));
        library.add_show(show_y);
        library.fail_show(2, "disk I/O error");

        let provider = MockProvider::new();
        provider
            .set_results(vec![entry("Show X S02E05 REPACK 720p HDTV x264", 4, 6, 1)])
            .await;

        let finder = ProperFinder::new(Arc::new(library));
        let propers = finder.find_propers(&provider, since()).await;

        assert_eq!(propers.len(), 1);
        assert_eq!(propers[0].show.id, 1);
        assert_eq!(provider.recorded_searches().await.len(), 1);
    }

    #[tokio::test]
    async fn test_library_error_yields_empty() {
        let library = MockLibrary::new();
        library.fail_with("database is locked");

        let provider = MockProvider::new();
        let finder = ProperFinder::new(Arc::new(library));
        assert!(finder.find_propers(&provider, since()).await.is_empty());
    }
}
