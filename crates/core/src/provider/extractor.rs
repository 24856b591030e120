//! Result page extraction.
//!
//! The tracker renders results as table rows sharing the `closest` id.
//! All markup knowledge lives here; ranking only sees [`RawEntry`].

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use super::RawEntry;

/// Text shown by the tracker when a search matched nothing.
pub const NO_RESULTS_MARKER: &str = "Nenhum Torrent foi Encontrado";

/// What a result page turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// The tracker explicitly reported no matches.
    NoResults,
    /// Neither rows nor the no-results marker: login page, maintenance
    /// notice or a layout change.
    UnexpectedPage,
    /// Well-formed rows, in page order. Malformed rows are already dropped.
    Entries(Vec<RawEntry>),
}

#[derive(Debug, Error)]
pub enum PageParseError {
    #[error("invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },
}

/// Turns a result page into entries.
pub trait ResultParser: Send + Sync {
    fn parse(&self, html: &str) -> Result<PageOutcome, PageParseError>;
}

/// Parser for the Manicomio Share result table.
pub struct ManicomioParser {
    row: Selector,
    cell: Selector,
    link: Selector,
    image: Selector,
    download: Selector,
    peers: Selector,
}

fn selector(css: &str) -> Result<Selector, PageParseError> {
    Selector::parse(css).map_err(|e| PageParseError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

impl ManicomioParser {
    pub fn new() -> Result<Self, PageParseError> {
        Ok(Self {
            row: selector("#closest")?,
            cell: selector("td")?,
            link: selector("a")?,
            image: selector("img")?,
            download: selector("a.btn.btn-default.btn-xs")?,
            peers: selector("span.h3o")?,
        })
    }

    /// Extract one row. Any missing or malformed field drops the row.
    fn parse_row(&self, row: ElementRef<'_>) -> Option<RawEntry> {
        let name_cell = row.select(&self.cell).nth(1)?;

        let title = name_cell
            .select(&self.link)
            .next()?
            .value()
            .attr("title")?
            .to_string();

        let download_url = row
            .select(&self.download)
            .next()?
            .value()
            .attr("href")?
            .to_string();

        let id = name_cell
            .select(&self.image)
            .next()?
            .value()
            .attr("id")?
            .replace("img", "")
            .trim()
            .parse()
            .ok()?;

        let mut peers = row
            .select(&self.peers)
            .map(|span| span.text().collect::<String>());
        let seeders = peers.next()?.trim().parse().ok()?;
        let leechers = peers.next()?.trim().parse().ok()?;

        Some(RawEntry {
            title,
            download_url,
            id,
            seeders,
            leechers,
        })
    }
}

impl ResultParser for ManicomioParser {
    fn parse(&self, html: &str) -> Result<PageOutcome, PageParseError> {
        let document = Html::parse_document(html);

        if document
            .root_element()
            .text()
            .any(|text| text.trim() == NO_RESULTS_MARKER)
        {
            return Ok(PageOutcome::NoResults);
        }

        let rows: Vec<ElementRef<'_>> = document.select(&self.row).collect();
        if rows.is_empty() {
            return Ok(PageOutcome::UnexpectedPage);
        }

        Ok(PageOutcome::Entries(
            rows.into_iter()
                .filter_map(|row| self.parse_row(row))
                .collect(),
        ))
    }
}
