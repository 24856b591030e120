//! Manicomio Share search provider.
//!
//! The pipeline runs leaf-first:
//! - [`query`] builds season and episode terms for a show
//! - [`session`] keeps the tracker cookies alive
//! - [`extractor`] turns a result page into [`RawEntry`] rows
//! - [`rank`] applies thresholds and orders each mode by seeders
//!
//! [`ManicomioProvider`] drives those steps per term. [`ProperFinder`] and
//! [`RssCache`] sit on top of any [`TorrentProvider`].

pub mod extractor;
mod manicomio;
mod propers;
pub mod query;
pub mod rank;
mod rss;
pub mod session;
mod types;
pub mod urls;

pub use extractor::{ManicomioParser, PageOutcome, PageParseError, ResultParser};
pub use manicomio::{ManicomioProvider, PROVIDER_NAME};
pub use propers::ProperFinder;
pub use query::{build_episode_terms, build_season_terms, PROPER_SUFFIX};
pub use rank::{filter_and_rank, Thresholds};
pub use rss::{RssCache, RssSnapshot};
pub use session::{Credentials, SessionManager};
pub use types::*;
pub use urls::SiteUrls;
