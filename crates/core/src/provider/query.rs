//! Search term generation for seasons and episodes.

use deunicode::deunicode;
use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::library::{Episode, Show, ShowKind};

use super::{SearchMode, SearchTerms};

/// Suffix the tracker uses for complete-season packs.
pub const SEASON_MARKER: &str = "Temporada Completa";

/// Suffix appended to episode terms when looking for re-releases.
pub const PROPER_SUFFIX: &str = "PROPER|REPACK";

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static DOTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{2,}").unwrap());

/// Fold a term to what the search form accepts: ASCII only, dots as
/// spaces, single spaces. A trailing space is kept.
pub fn normalize_term(term: &str) -> String {
    let ascii = deunicode(term).replace('.', " ");
    WHITESPACE.replace_all(&ascii, " ").into_owned()
}

/// Turn a show name into the dotted form release groups use.
pub fn sanitize_scene_name(name: &str) -> String {
    let stripped: String = name
        .chars()
        .filter(|c| !matches!(c, ',' | ':' | '(' | ')' | '\'' | '!' | '?' | '\u{2019}'))
        .collect();

    let dotted = stripped
        .replace("- ", ".")
        .replace(' ', ".")
        .replace('&', "and")
        .replace('/', ".");

    DOTS.replace_all(&dotted, ".").trim_end_matches('.').to_string()
}

/// Season pack terms, one per show name.
pub fn build_season_terms(show: &Show, episode: Option<&Episode>) -> Vec<SearchTerms> {
    let Some(episode) = episode else {
        return Vec::new();
    };

    let terms = show
        .all_names()
        .into_iter()
        .filter_map(|name| {
            let term = match show.kind {
                ShowKind::AirByDate | ShowKind::Sports => {
                    format!("{} {}", name, episode.airdate?.format("%Y"))
                }
                ShowKind::Anime => format!("{} {}", name, episode.scene_absolute_number?),
                ShowKind::Standard => {
                    format!("{} {} {}", name, episode.scene_season, SEASON_MARKER)
                }
            };
            Some(normalize_term(&term))
        })
        .collect();

    vec![SearchTerms::for_mode(SearchMode::Season, terms)]
}

/// Single episode terms, one per show name. `suffix` is appended to
/// standard-numbered shows only.
pub fn build_episode_terms(
    show: &Show,
    episode: Option<&Episode>,
    suffix: &str,
) -> Vec<SearchTerms> {
    let Some(episode) = episode else {
        return Vec::new();
    };

    let terms = show
        .all_names()
        .into_iter()
        .filter_map(|name| {
            let name = sanitize_scene_name(&name);
            let term = match show.kind {
                ShowKind::AirByDate => {
                    format!("{} {}", name, episode.airdate?.format("%Y|%m|%d"))
                }
                ShowKind::Sports => {
                    format!("{} {}", name, episode.airdate?.format("%Y|%m|%d|%b"))
                }
                ShowKind::Anime => format!("{} {}", name, episode.absolute_number?),
                ShowKind::Standard => format!(
                    "{} S{:02}E{:02} {}",
                    name, episode.scene_season, episode.scene_episode, suffix
                ),
            };
            Some(normalize_term(&term))
        })
        .collect();

    vec![SearchTerms::for_mode(SearchMode::Episode, terms)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn show(name: &str, kind: ShowKind, aliases: &[&str]) -> Show {
        Show {
            id: 1,
            name: name.to_string(),
            kind,
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn episode(season: u32, number: u32) -> Episode {
        Episode {
            show_id: 1,
            season,
            episode: number,
            scene_season: season,
            scene_episode: number,
            absolute_number: Some(27),
            scene_absolute_number: Some(28),
            airdate: NaiveDate::from_ymd_opt(2014, 10, 7),
        }
    }

    #[test]
    fn test_standard_episode_term() {
        let terms = build_episode_terms(
            &show("Show X", ShowKind::Standard, &[]),
            Some(&episode(2, 5)),
            "",
        );
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].episode, vec!["Show X S02E05 ".to_string()]);
        assert!(terms[0].season.is_empty());
    }

    #[test]
    fn test_standard_episode_term_with_suffix() {
        let terms = build_episode_terms(
            &show("Show X", ShowKind::Standard, &[]),
            Some(&episode(2, 5)),
            PROPER_SUFFIX,
        );
        assert_eq!(terms[0].episode, vec!["Show X S02E05 PROPER|REPACK".to_string()]);
    }

    #[test]
    fn test_episode_uses_scene_numbering() {
        let mut ep = episode(2, 5);
        ep.scene_season = 3;
        ep.scene_episode = 1;
        let terms = build_episode_terms(&show("Show X", ShowKind::Standard, &[]), Some(&ep), "");
        assert_eq!(terms[0].episode, vec!["Show X S03E01 ".to_string()]);
    }

    #[test]
    fn test_standard_season_term() {
        let terms = build_season_terms(
            &show("Show X", ShowKind::Standard, &["Show Ex"]),
            Some(&episode(3, 1)),
        );
        assert_eq!(
            terms[0].season,
            vec![
                "Show X 3 Temporada Completa".to_string(),
                "Show Ex 3 Temporada Completa".to_string(),
            ]
        );
        assert!(terms[0].episode.is_empty());
    }

    #[test]
    fn test_air_by_date_terms() {
        let s = show("Daily Show", ShowKind::AirByDate, &[]);
        let ep = episode(1, 1);
        assert_eq!(
            build_season_terms(&s, Some(&ep))[0].season,
            vec!["Daily Show 2014".to_string()]
        );
        assert_eq!(
            build_episode_terms(&s, Some(&ep), "")[0].episode,
            vec!["Daily Show 2014|10|07".to_string()]
        );
    }

    #[test]
    fn test_sports_episode_term_has_month() {
        let terms = build_episode_terms(
            &show("Big League", ShowKind::Sports, &[]),
            Some(&episode(1, 1)),
            "",
        );
        assert_eq!(terms[0].episode, vec!["Big League 2014|10|07|Oct".to_string()]);
    }

    #[test]
    fn test_anime_terms() {
        let s = show("Some Anime", ShowKind::Anime, &[]);
        let ep = episode(1, 1);
        assert_eq!(
            build_season_terms(&s, Some(&ep))[0].season,
            vec!["Some Anime 28".to_string()]
        );
        assert_eq!(
            build_episode_terms(&s, Some(&ep), "")[0].episode,
            vec!["Some Anime 27".to_string()]
        );
    }

    #[test]
    fn test_missing_airdate_skips_term() {
        let mut ep = episode(1, 1);
        ep.airdate = None;
        let terms = build_episode_terms(&show("Daily", ShowKind::AirByDate, &[]), Some(&ep), "");
        assert_eq!(terms.len(), 1);
        assert!(terms[0].is_empty());
    }

    #[test]
    fn test_absent_episode_yields_nothing() {
        let s = show("Show X", ShowKind::Standard, &[]);
        assert!(build_season_terms(&s, None).is_empty());
        assert!(build_episode_terms(&s, None, PROPER_SUFFIX).is_empty());
    }

    #[test]
    fn test_sanitize_scene_name() {
        assert_eq!(sanitize_scene_name("Show X"), "Show.X");
        assert_eq!(sanitize_scene_name("Marvel's Agents of S.H.I.E.L.D."), "Marvels.Agents.of.S.H.I.E.L.D");
        assert_eq!(sanitize_scene_name("Law & Order: SVU"), "Law.and.Order.SVU");
        assert_eq!(sanitize_scene_name("Face/Off"), "Face.Off");
        assert_eq!(sanitize_scene_name("Who? - The Show!"), "Who.The.Show");
    }

    #[test]
    fn test_normalize_term() {
        assert_eq!(normalize_term("Café.Tacvba  S01E01 "), "Cafe Tacvba S01E01 ");
        assert_eq!(normalize_term("Coração  Indomável"), "Coracao Indomavel");
        assert_eq!(normalize_term("a\t\tb"), "a b");
        assert_eq!(normalize_term("a \n\t b  "), "a b ");
    }

    #[test]
    fn test_episode_term_transliterates_names() {
        let terms = build_episode_terms(
            &show("Família Soprano", ShowKind::Standard, &[]),
            Some(&episode(1, 2)),
            "",
        );
        assert_eq!(terms[0].episode, vec!["Familia Soprano S01E02 ".to_string()]);
    }
}
