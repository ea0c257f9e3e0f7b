//! List derivation
//!
//! Turns the full show list plus the user's current query (search text,
//! genre filter, sort order, page) into the page of shows to display.
//! Derivation is a pure function; a new [`DerivedPage`] replaces the old one
//! on every change.

use crate::catalog_source::Show;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Number of shows per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Field the list is ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Case-insensitive title order
    #[default]
    Title,
    /// Last update time, unknown dates count as the epoch
    Date,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "title" => Ok(SortKey::Title),
            "date" | "updated" => Ok(SortKey::Date),
            other => Err(format!("unknown sort key '{}', expected 'title' or 'date'", other)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Title => write!(f, "Title"),
            SortKey::Date => write!(f, "Date"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "Ascending"),
            SortDirection::Descending => write!(f, "Descending"),
        }
    }
}

/// The user's current view on the catalog
///
/// Any change to the search text, genre filter or sort order sends the user
/// back to page 1. The page is always at least 1 and the page size never
/// changes after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    search_text: String,
    genre: Option<u32>,
    sort_key: SortKey,
    sort_direction: SortDirection,
    page: usize,
    page_size: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl QueryState {
    /// Creates an unfiltered, title-ascending query on page 1
    ///
    /// A page size of 0 is treated as 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            search_text: String::new(),
            genre: None,
            sort_key: SortKey::default(),
            sort_direction: SortDirection::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn genre(&self) -> Option<u32> {
        self.genre
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.page = 1;
    }

    pub fn set_genre(&mut self, genre: Option<u32>) {
        self.genre = genre;
        self.page = 1;
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
        self.page = 1;
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.sort_direction = direction;
        self.page = 1;
    }

    pub fn toggle_sort_direction(&mut self) {
        self.set_sort_direction(self.sort_direction.toggled());
    }

    /// Jumps to a page; 0 is treated as 1
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Pulls the page back into `1..=total_pages`
    pub fn clamp_page(&mut self, total_pages: usize) {
        self.page = self.page.clamp(1, total_pages.max(1));
    }

    /// Moves forward one page, staying on the last page
    pub fn next_page(&mut self, total_pages: usize) {
        self.page = (self.page + 1).min(total_pages.max(1));
    }

    /// Moves back one page, staying on the first page
    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }
}

/// One page of results derived from the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedPage {
    /// Shows on this page, at most `page_size` of them
    pub shows: Vec<Show>,
    /// Number of pages, at least 1
    pub total_pages: usize,
    /// Number of shows that passed the filters
    pub filtered_count: usize,
    /// The page this was derived for
    pub page: usize,
}

/// Returns true if the show passes the query's search and genre filters
fn matches_filters(show: &Show, needle: &str, genre: Option<u32>) -> bool {
    let title_matches = needle.is_empty() || show.title.to_lowercase().contains(needle);
    let genre_matches = genre.is_none_or(|id| show.genres.contains(&id));
    title_matches && genre_matches
}

/// Filters shows by the query's search text and genre
pub fn filter_shows<'a>(shows: &'a [Show], query: &QueryState) -> Vec<&'a Show> {
    let needle = query.search_text.to_lowercase();
    shows
        .iter()
        .filter(|show| matches_filters(show, &needle, query.genre))
        .collect()
}

fn compare_shows(a: &Show, b: &Show, key: SortKey) -> Ordering {
    match key {
        SortKey::Title => a
            .title
            .chars()
            .flat_map(char::to_lowercase)
            .cmp(b.title.chars().flat_map(char::to_lowercase)),
        SortKey::Date => a.updated.unwrap_or_default().cmp(&b.updated.unwrap_or_default()),
    }
}

/// Sorts shows in place; equal shows keep their relative order
pub fn sort_shows(shows: &mut [&Show], key: SortKey, direction: SortDirection) {
    shows.sort_by(|a, b| direction.apply(compare_shows(a, b, key)));
}

/// Derives the visible page for a query
///
/// Never fails: a page past the end yields an empty page, and the caller
/// is expected to clamp the query's page with [`QueryState::clamp_page`].
///
/// # Examples
///
/// ```
/// use podcast_directory::{QueryState, derive_page};
///
/// let page = derive_page(&[], &QueryState::default());
/// assert!(page.shows.is_empty());
/// assert_eq!(page.total_pages, 1);
/// ```
pub fn derive_page(shows: &[Show], query: &QueryState) -> DerivedPage {
    let mut filtered = filter_shows(shows, query);
    sort_shows(&mut filtered, query.sort_key, query.sort_direction);

    let filtered_count = filtered.len();
    let total_pages = filtered_count.div_ceil(query.page_size).max(1);
    let start = (query.page - 1).saturating_mul(query.page_size);

    let visible = filtered
        .into_iter()
        .skip(start)
        .take(query.page_size)
        .cloned()
        .collect();

    DerivedPage {
        shows: visible,
        total_pages,
        filtered_count,
        page: query.page,
    }
}
