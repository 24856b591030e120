//! Threshold filtering and seeder ranking.

use super::{RawEntry, SearchMode};

/// Minimum peers a non-RSS result must have.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thresholds {
    pub min_seed: u32,
    pub min_leech: u32,
}

impl Thresholds {
    fn admits(&self, entry: &RawEntry) -> bool {
        entry.seeders >= self.min_seed && entry.leechers >= self.min_leech
    }
}

/// Filter one mode's entries and order them by seeders, highest first.
/// The sort is stable: equal seeders keep discovery order.
pub fn filter_and_rank(
    entries: Vec<RawEntry>,
    mode: SearchMode,
    thresholds: &Thresholds,
) -> Vec<RawEntry> {
    let mut kept: Vec<RawEntry> = entries
        .into_iter()
        .filter(|e| mode.is_passive() || thresholds.admits(e))
        .filter(|e| !e.title.is_empty() && !e.download_url.is_empty())
        .collect();
    kept.sort_by(|a, b| b.seeders.cmp(&a.seeders));
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, seeders: u32, leechers: u32) -> RawEntry {
        RawEntry {
            title: title.to_string(),
            download_url: format!("download.php?id={}", title),
            id: 1,
            seeders,
            leechers,
        }
    }

    fn titles(entries: &[RawEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn test_sorted_by_seeders_descending_and_stable() {
        let ranked = filter_and_rank(
            vec![
                entry("a", 5, 0),
                entry("b", 10, 0),
                entry("c", 5, 0),
                entry("d", 1, 0),
                entry("e", 10, 0),
            ],
            SearchMode::Episode,
            &Thresholds::default(),
        );
        assert_eq!(titles(&ranked), vec!["b", "e", "a", "c", "d"]);
        assert!(ranked.windows(2).all(|w| w[0].seeders >= w[1].seeders));
    }

    #[test]
    fn test_thresholds_apply_outside_rss() {
        let thresholds = Thresholds {
            min_seed: 3,
            min_leech: 1,
        };
        let entries = vec![entry("ok", 3, 1), entry("few-seeds", 2, 5), entry("no-leech", 9, 0)];

        let episode = filter_and_rank(entries.clone(), SearchMode::Episode, &thresholds);
        assert_eq!(titles(&episode), vec!["ok"]);

        let season = filter_and_rank(entries.clone(), SearchMode::Season, &thresholds);
        assert_eq!(titles(&season), vec!["ok"]);

        let rss = filter_and_rank(entries, SearchMode::Rss, &thresholds);
        assert_eq!(titles(&rss), vec!["no-leech", "ok", "few-seeds"]);
    }

    #[test]
    fn test_empty_title_or_url_dropped() {
        let mut no_url = entry("no-url", 5, 5);
        no_url.download_url.clear();
        let ranked = filter_and_rank(
            vec![entry("", 5, 5), no_url, entry("fine", 1, 1)],
            SearchMode::Rss,
            &Thresholds::default(),
        );
        assert_eq!(titles(&ranked), vec!["fine"]);
    }
}
