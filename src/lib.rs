//! podcast_directory - Browse a podcast catalog from the terminal
//!
//! This library loads the show catalog of the podcast API, resolves every
//! show's seasons, and derives searchable, filterable, sortable pages of
//! shows together with a text rendering of them.

mod browser;
mod catalog;
mod catalog_source;
mod config;
mod genres;
mod query;
mod selection;
mod view;

use std::sync::Arc;
use thiserror::Error;

// Re-export error types
pub use catalog_source::CatalogError;
pub use config::ConfigError;

pub use browser::{Browser, BrowserAction};
pub use catalog::{Catalog, CatalogLoad, LoadEvent, LoadSummary, SeasonOutcome, load_catalog};
pub use catalog_source::{
    CatalogSource, PodcastApi, Season, SeasonRoute, Show, parse_seasons, parse_show_list,
};
pub use config::{Config, ConfigLayer};
pub use genres::{
    GENRES, Genre, UNKNOWN_GENRE, genre_by_id, genre_names, validate_genre_filter,
};
pub use query::{
    DEFAULT_PAGE_SIZE, DerivedPage, QueryState, SortDirection, SortKey, derive_page,
    filter_shows, sort_shows,
};
pub use selection::Selection;
pub use view::{
    format_updated, render_card, render_controls, render_detail, render_header, render_page,
};

/// Top-level error type for podcast_directory operations
#[derive(Debug, Error)]
pub enum PodcastDirectoryError {
    /// Error while loading configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error while loading the catalog
    #[error("Could not load the podcast catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Loads the catalog described by the configuration and opens a session on it
///
/// The catalog is loaded on a background task; progress events are emitted
/// through the provided callback, which can be empty for silent operation.
///
/// # Examples
///
/// ```no_run
/// use podcast_directory::{Config, LoadEvent, open_directory};
///
/// # async fn run() -> Result<(), podcast_directory::PodcastDirectoryError> {
/// let browser = open_directory(&Config::default(), |event| {
///     if let LoadEvent::Complete { show_count, .. } = event {
///         println!("Loaded {} shows", show_count);
///     }
/// })
/// .await?;
/// println!("{} pages", browser.page().total_pages);
/// # Ok(())
/// # }
/// ```
pub async fn open_directory<F>(
    config: &Config,
    progress_callback: F,
) -> Result<Browser, PodcastDirectoryError>
where
    F: FnMut(LoadEvent) + Send + 'static,
{
    let source = PodcastApi::new(&config.api_base_url, config.request_timeout)?;
    let catalog = CatalogLoad::spawn(Arc::new(source), progress_callback)
        .wait()
        .await?;

    Ok(Browser::new(catalog, config.page_size))
}
