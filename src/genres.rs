//! Genre reference data
//!
//! The podcast API identifies genres by small numeric ids. This module holds
//! the static table that maps those ids to display names, and the resolver
//! used by cards, the detail view and the genre filter.

/// Label used for genre ids that are not present in the reference table
pub const UNKNOWN_GENRE: &str = "Unknown";

/// A single genre of the reference table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Genre {
    /// Numeric id as used in show records
    pub id: u32,
    /// Human readable name
    pub title: &'static str,
}

/// The fixed genre set served by the podcast API
pub const GENRES: &[Genre] = &[
    Genre {
        id: 1,
        title: "Personal Growth",
    },
    Genre {
        id: 2,
        title: "Investigative Journalism",
    },
    Genre {
        id: 3,
        title: "History",
    },
    Genre {
        id: 4,
        title: "Comedy",
    },
    Genre {
        id: 5,
        title: "Entertainment",
    },
    Genre {
        id: 6,
        title: "Business",
    },
    Genre {
        id: 7,
        title: "Fiction",
    },
    Genre {
        id: 8,
        title: "News",
    },
    Genre {
        id: 9,
        title: "Kids and Family",
    },
];

/// Looks up a single genre by id
pub fn genre_by_id(id: u32, genres: &[Genre]) -> Option<&Genre> {
    genres.iter().find(|genre| genre.id == id)
}

/// Checks an optional genre filter against the table
///
/// Returns the filter unchanged when it is empty or names a known genre.
pub fn validate_genre_filter(genre: Option<u32>, genres: &[Genre]) -> Result<Option<u32>, String> {
    match genre {
        Some(id) if genre_by_id(id, genres).is_none() => Err(format!(
            "Unknown genre id {} (run `genres` to list the known ids)",
            id
        )),
        genre => Ok(genre),
    }
}

/// Resolves genre ids to display names
///
/// The returned names keep the order of `ids`. Ids missing from `genres`
/// resolve to [`UNKNOWN_GENRE`]. An empty id list yields an empty name list;
/// callers pick their own label for that case.
///
/// # Examples
///
/// ```
/// use podcast_directory::{GENRES, genre_names};
///
/// assert_eq!(genre_names(&[3, 42], GENRES), vec!["History", "Unknown"]);
/// ```
pub fn genre_names(ids: &[u32], genres: &[Genre]) -> Vec<&'static str> {
    ids.iter()
        .map(|id| genre_by_id(*id, genres).map_or(UNKNOWN_GENRE, |genre| genre.title))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_names_keep_order() {
        assert_eq!(
            genre_names(&[8, 1, 4], GENRES),
            vec!["News", "Personal Growth", "Comedy"]
        );
    }

    #[test]
    fn test_unknown_ids_use_placeholder() {
        assert_eq!(genre_names(&[0, 5, 99], GENRES), vec!["Unknown", "Entertainment", "Unknown"]);
    }

    #[test]
    fn test_empty_ids() {
        assert!(genre_names(&[], GENRES).is_empty());
    }

    #[test]
    fn test_custom_table() {
        let table = [Genre { id: 7, title: "Drama" }];
        assert_eq!(genre_names(&[7, 1], &table), vec!["Drama", "Unknown"]);
    }

    #[test]
    fn test_genre_by_id() {
        assert_eq!(genre_by_id(9, GENRES).map(|g| g.title), Some("Kids and Family"));
        assert!(genre_by_id(10, GENRES).is_none());
    }

    #[test]
    fn test_validate_genre_filter() {
        assert_eq!(validate_genre_filter(None, GENRES), Ok(None));
        assert_eq!(validate_genre_filter(Some(4), GENRES), Ok(Some(4)));

        let err = validate_genre_filter(Some(99), GENRES).unwrap_err();
        assert!(err.contains("99"));
    }
}
