//! Data structures and traits for podcast catalog retrieval.
//!
//! This module provides the canonical show and season structures the rest of
//! the crate works with, as well as the trait implemented by catalog sources.
mod api_types;
mod podcast_api;

pub use api_types::{parse_seasons, parse_show_list};
pub use podcast_api::PodcastApi;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur while talking to a catalog source.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request could not be sent or the connection failed
    #[error("Request failed: {0}")]
    RequestError(String),

    /// The server answered with a non-success status
    #[error("HTTP {status} {reason} from {url}")]
    HttpStatus {
        url: String,
        status: u16,
        reason: String,
    },

    /// Failed to parse the response body
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The load task was torn down before it finished
    #[error("Catalog load was aborted")]
    Aborted,
}

/// Which endpoint a season request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonRoute {
    /// `/seasons/{id}`
    Primary,
    /// `/shows/{id}/seasons`
    Fallback,
}

/// A season of a show, normalized from whatever layout the API used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Season {
    /// The season number (1-based list position when the API omits it)
    pub season_number: u32,
    /// Season title, `"Untitled Season"` when the API omits it
    pub title: String,
    /// Number of episodes, 0 when unknown
    pub episode_count: usize,
}

/// A podcast show as listed in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Show {
    /// API identifier, always kept as a string
    pub id: String,
    /// Show title (may be empty when the API omitted it)
    pub title: String,
    /// Cover image URL
    pub image: Option<String>,
    /// Description as delivered by the API, possibly containing HTML
    pub description: String,
    /// Genre ids, see [`crate::genres`]
    pub genres: Vec<u32>,
    /// Last update time, `None` when missing or unparsable
    pub updated: Option<DateTime<Utc>>,
    /// Seasons, empty until the loader has resolved them
    pub seasons: Vec<Season>,
    /// Season count announced by the show list before seasons are loaded
    pub listed_season_count: Option<usize>,
}

impl Show {
    /// Number of seasons to display for this show.
    ///
    /// Prefers the loaded season list and falls back to the count the show
    /// list announced.
    pub fn season_count(&self) -> usize {
        if self.seasons.is_empty() {
            self.listed_season_count.unwrap_or(0)
        } else {
            self.seasons.len()
        }
    }
}

/// Trait for sources that can deliver the podcast catalog.
///
/// The production implementation is [`PodcastApi`]; anything else that can
/// answer these two questions (fixtures, mirrors) can stand in for it.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches the full show list.
    ///
    /// Seasons are not populated by this call, apart from whatever season
    /// data the list itself carries.
    async fn fetch_shows(&self) -> Result<Vec<Show>, CatalogError>;

    /// Fetches the seasons of a single show from the given endpoint.
    async fn fetch_seasons(
        &self,
        show_id: &str,
        route: SeasonRoute,
    ) -> Result<Vec<Season>, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(seasons: Vec<Season>, listed: Option<usize>) -> Show {
        Show {
            id: "1".to_string(),
            title: "Test".to_string(),
            image: None,
            description: String::new(),
            genres: Vec::new(),
            updated: None,
            seasons,
            listed_season_count: listed,
        }
    }

    #[test]
    fn test_season_count_prefers_loaded_list() {
        let season = Season {
            season_number: 1,
            title: "One".to_string(),
            episode_count: 3,
        };
        assert_eq!(show(vec![season], Some(4)).season_count(), 1);
        assert_eq!(show(Vec::new(), Some(4)).season_count(), 4);
        assert_eq!(show(Vec::new(), None).season_count(), 0);
    }
}
