pub mod config;
pub mod library;
pub mod metrics;
pub mod provider;
pub mod quality;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, LibraryConfig,
    ProviderConfig, SanitizedConfig, ServerConfig,
};
pub use library::{Library, LibraryError, SqliteLibrary};
pub use provider::{
    Candidate, ManicomioProvider, ProperCandidate, ProperFinder, ProviderError, ProviderStatus,
    RawEntry, RssCache, SearchMode, SearchTerms, TorrentProvider,
};
pub use quality::Quality;
