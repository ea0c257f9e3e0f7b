//! Browsing session state
//!
//! [`Browser`] owns everything a browsing session needs: the loaded catalog,
//! the user's query, the derived page and the opened show. User interactions
//! are expressed as [`BrowserAction`]s.

use crate::catalog::Catalog;
use crate::catalog_source::Show;
use crate::query::{DerivedPage, QueryState, SortKey, derive_page};
use crate::selection::Selection;

/// A user interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserAction {
    /// Replace the search text
    Search(String),
    /// Restrict to one genre, or `None` for all genres
    FilterGenre(Option<u32>),
    /// Order by another field
    SortBy(SortKey),
    /// Flip ascending/descending
    ToggleDirection,
    NextPage,
    PreviousPage,
    /// Jump to a 1-based page
    GoToPage(usize),
    /// Open the show at this 0-based position of the current page
    Open(usize),
    /// Close the detail view
    CloseDetail,
}

/// A browsing session over a loaded catalog
#[derive(Debug, Clone)]
pub struct Browser {
    catalog: Catalog,
    query: QueryState,
    selection: Selection,
    page: DerivedPage,
}

impl Browser {
    /// Starts a session on page 1 with the given page size
    pub fn new(catalog: Catalog, page_size: usize) -> Self {
        let query = QueryState::new(page_size);
        let page = derive_page(catalog.shows(), &query);

        Self {
            catalog,
            query,
            selection: Selection::default(),
            page,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    /// The currently visible page
    pub fn page(&self) -> &DerivedPage {
        &self.page
    }

    /// The show opened in the detail view, if any
    pub fn selected(&self) -> Option<&Show> {
        self.selection.current()
    }

    /// Applies a user interaction
    pub fn apply(&mut self, action: BrowserAction) {
        match action {
            BrowserAction::Search(text) => self.query.set_search_text(text),
            BrowserAction::FilterGenre(genre) => self.query.set_genre(genre),
            BrowserAction::SortBy(key) => self.query.set_sort_key(key),
            BrowserAction::ToggleDirection => self.query.toggle_sort_direction(),
            BrowserAction::NextPage => self.query.next_page(self.page.total_pages),
            BrowserAction::PreviousPage => self.query.previous_page(),
            BrowserAction::GoToPage(page) => self.query.set_page(page),
            BrowserAction::Open(index) => {
                if let Some(show) = self.page.shows.get(index) {
                    self.selection.select(&self.catalog, show);
                }
                return;
            }
            BrowserAction::CloseDetail => {
                self.selection.clear();
                return;
            }
        }
        self.refresh();
    }

    /// Opens a show by id; returns false if the catalog has no such show
    pub fn open_by_id(&mut self, id: &str) -> bool {
        match self.catalog.find(id) {
            Some(show) => {
                self.selection.select(&self.catalog, show);
                true
            }
            None => false,
        }
    }

    /// Re-derives the visible page, pulling the page number back into range
    fn refresh(&mut self) {
        let mut page = derive_page(self.catalog.shows(), &self.query);
        if self.query.page() > page.total_pages {
            self.query.clamp_page(page.total_pages);
            page = derive_page(self.catalog.shows(), &self.query);
        }
        self.page = page;
    }
}
