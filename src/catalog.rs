//! Catalog loading
//!
//! This module fetches the show list once and resolves every show's seasons
//! concurrently, falling back to a secondary endpoint and finally to the
//! season data the show already carried. The result is an immutable
//! [`Catalog`] that is owned by whoever started the load.

use crate::catalog_source::{CatalogError, CatalogSource, Season, SeasonRoute, Show};
use futures::future::join_all;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// How a show's season list was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonOutcome {
    /// The primary season endpoint answered
    Primary,
    /// The primary endpoint failed, the fallback endpoint answered
    Fallback,
    /// Both endpoints failed, the show kept whatever seasons it carried
    Default,
}

/// Tally of season outcomes for a finished load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub primary: usize,
    pub fallback: usize,
    pub defaulted: usize,
}

impl LoadSummary {
    fn record(&mut self, outcome: SeasonOutcome) {
        match outcome {
            SeasonOutcome::Primary => self.primary += 1,
            SeasonOutcome::Fallback => self.fallback += 1,
            SeasonOutcome::Default => self.defaulted += 1,
        }
    }
}

/// Progress event emitted while the catalog loads
///
/// These events allow library users to report progress or stay silent.
#[derive(Debug, Clone)]
pub enum LoadEvent {
    /// Requesting the show list
    FetchingShows,

    /// The show list arrived
    ShowsFetched { count: usize },

    /// Season requests for all shows have been issued
    FetchingSeasons { count: usize },

    /// One show's seasons are resolved
    SeasonsResolved {
        show_id: String,
        outcome: SeasonOutcome,
    },

    /// Catalog is ready
    Complete {
        show_count: usize,
        summary: LoadSummary,
    },
}

/// The loaded show collection
///
/// Built once per session and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    shows: Vec<Show>,
    summary: LoadSummary,
}

impl Catalog {
    /// Wraps an already complete show list
    pub fn new(shows: Vec<Show>) -> Self {
        Self {
            shows,
            summary: LoadSummary::default(),
        }
    }

    pub fn shows(&self) -> &[Show] {
        &self.shows
    }

    /// Finds a show by its id
    pub fn find(&self, id: &str) -> Option<&Show> {
        self.shows.iter().find(|show| show.id == id)
    }

    pub fn len(&self) -> usize {
        self.shows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shows.is_empty()
    }

    /// Season outcomes of the load that produced this catalog
    pub fn summary(&self) -> LoadSummary {
        self.summary
    }
}

/// Loads the full catalog from a source
///
/// Fetches the show list, then requests every show's seasons at once and
/// waits for all of them. A failing season request never affects other
/// shows: the fallback endpoint is tried, and if that fails too the show
/// keeps the seasons it carried (usually none). Only a failure of the show
/// list itself fails the load, in which case no catalog is produced.
///
/// Progress events are emitted through the provided callback.
///
/// # Examples
///
/// ```no_run
/// use podcast_directory::{LoadEvent, PodcastApi, load_catalog};
/// use std::time::Duration;
///
/// # async fn run() -> Result<(), podcast_directory::CatalogError> {
/// let api = PodcastApi::new(PodcastApi::DEFAULT_BASE_URL, Duration::from_secs(10))?;
/// let catalog = load_catalog(&api, |event| {
///     if let LoadEvent::ShowsFetched { count } = event {
///         println!("{} shows", count);
///     }
/// })
/// .await?;
/// println!("Loaded {} shows", catalog.len());
/// # Ok(())
/// # }
/// ```
pub async fn load_catalog<S, F>(source: &S, mut progress_callback: F) -> Result<Catalog, CatalogError>
where
    S: CatalogSource + ?Sized,
    F: FnMut(LoadEvent),
{
    progress_callback(LoadEvent::FetchingShows);

    let shows = match source.fetch_shows().await {
        Ok(shows) => shows,
        Err(e) => {
            error!(error = %e, "catalog load failed");
            return Err(e);
        }
    };

    progress_callback(LoadEvent::ShowsFetched { count: shows.len() });
    progress_callback(LoadEvent::FetchingSeasons { count: shows.len() });

    let resolutions = join_all(shows.iter().map(|show| resolve_seasons(source, show))).await;

    let mut summary = LoadSummary::default();
    let mut loaded = Vec::with_capacity(shows.len());

    for (mut show, (seasons, outcome)) in shows.into_iter().zip(resolutions) {
        summary.record(outcome);
        show.seasons = seasons;

        progress_callback(LoadEvent::SeasonsResolved {
            show_id: show.id.clone(),
            outcome,
        });
        loaded.push(show);
    }

    info!(
        shows = loaded.len(),
        primary = summary.primary,
        fallback = summary.fallback,
        defaulted = summary.defaulted,
        "catalog loaded"
    );

    progress_callback(LoadEvent::Complete {
        show_count: loaded.len(),
        summary,
    });

    Ok(Catalog {
        shows: loaded,
        summary,
    })
}

/// Resolves one show's seasons: primary endpoint, fallback endpoint, default.
async fn resolve_seasons<S>(source: &S, show: &Show) -> (Vec<Season>, SeasonOutcome)
where
    S: CatalogSource + ?Sized,
{
    match source.fetch_seasons(&show.id, SeasonRoute::Primary).await {
        Ok(seasons) => return (seasons, SeasonOutcome::Primary),
        Err(e) => {
            debug!(show_id = %show.id, error = %e, "primary season fetch failed, trying fallback");
        }
    }

    match source.fetch_seasons(&show.id, SeasonRoute::Fallback).await {
        Ok(seasons) => (seasons, SeasonOutcome::Fallback),
        Err(e) => {
            warn!(show_id = %show.id, error = %e, "season fallback failed, keeping carried seasons");
            (show.seasons.clone(), SeasonOutcome::Default)
        }
    }
}

/// Guard for a catalog load running on a background task
///
/// Dropping the guard before the load finishes aborts the task, so a load
/// whose consumer went away never delivers its result.
#[derive(Debug)]
pub struct CatalogLoad {
    handle: Option<JoinHandle<Result<Catalog, CatalogError>>>,
}

impl CatalogLoad {
    /// Starts loading the catalog on the tokio runtime
    ///
    /// Must be called from within a runtime.
    pub fn spawn<F>(source: Arc<dyn CatalogSource>, progress_callback: F) -> Self
    where
        F: FnMut(LoadEvent) + Send + 'static,
    {
        let handle =
            tokio::spawn(async move { load_catalog(source.as_ref(), progress_callback).await });

        Self {
            handle: Some(handle),
        }
    }

    /// Returns true once the background load has finished
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Waits for the load to finish and returns its result
    pub async fn wait(mut self) -> Result<Catalog, CatalogError> {
        let joined = match self.handle.as_mut() {
            Some(handle) => handle.await,
            None => return Err(CatalogError::Aborted),
        };
        self.handle = None;

        joined.unwrap_or_else(|_| Err(CatalogError::Aborted))
    }
}

impl Drop for CatalogLoad {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
