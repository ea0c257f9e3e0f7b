//! Detail view selection
//!
//! Tracks the single show that is currently opened in the detail view.

use crate::catalog::Catalog;
use crate::catalog_source::Show;

/// The currently opened show, if any
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    current: Option<Show>,
}

impl Selection {
    /// Opens a show
    ///
    /// The catalog's copy of the show is preferred, since that is the one
    /// with resolved seasons; the given show is used if the catalog does not
    /// know its id.
    pub fn select(&mut self, catalog: &Catalog, show: &Show) {
        let authoritative = catalog.find(&show.id).unwrap_or(show);
        self.current = Some(authoritative.clone());
    }

    /// Closes the detail view
    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Show> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_source::Season;

    fn show(id: &str, seasons: Vec<Season>) -> Show {
        Show {
            id: id.to_string(),
            title: format!("Show {}", id),
            image: None,
            description: String::new(),
            genres: Vec::new(),
            updated: None,
            seasons,
            listed_season_count: Some(2),
        }
    }

    #[test]
    fn test_select_prefers_catalog_copy() {
        let loaded = show(
            "5",
            vec![Season {
                season_number: 1,
                title: "One".to_string(),
                episode_count: 8,
            }],
        );
        let catalog = Catalog::new(vec![loaded.clone()]);
        let mut selection = Selection::default();

        selection.select(&catalog, &show("5", Vec::new()));

        assert_eq!(selection.current(), Some(&loaded));
    }

    #[test]
    fn test_select_unknown_show_uses_given_one() {
        let catalog = Catalog::new(vec![show("1", Vec::new())]);
        let stranger = show("77", Vec::new());
        let mut selection = Selection::default();

        selection.select(&catalog, &stranger);

        assert_eq!(selection.current(), Some(&stranger));
    }

    #[test]
    fn test_select_replaces_and_clear_empties() {
        let catalog = Catalog::new(vec![show("1", Vec::new()), show("2", Vec::new())]);
        let mut selection = Selection::default();

        selection.select(&catalog, &show("1", Vec::new()));
        selection.select(&catalog, &show("2", Vec::new()));
        assert_eq!(selection.current().map(|s| s.id.as_str()), Some("2"));

        selection.clear();
        assert!(selection.current().is_none());
    }
}
