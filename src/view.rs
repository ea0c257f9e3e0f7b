//! Text rendering
//!
//! Renders the header, the query controls, the list of show cards and the
//! detail view as plain text for the terminal.

use crate::catalog_source::{Season, Show};
use crate::genres::{Genre, genre_by_id, genre_names};
use crate::query::{DerivedPage, QueryState};
use chrono::{DateTime, Utc};

const NO_TITLE: &str = "No Title";
const NO_DESCRIPTION: &str = "No description available";
const NO_GENRES: &str = "No genres available";
const NO_SEASONS: &str = "No seasons available";

pub fn render_header() -> String {
    "=== PodcastApp ===".to_string()
}

/// Formats a show's update time, e.g. `Updated October 3, 2022`
pub fn format_updated(updated: Option<DateTime<Utc>>) -> String {
    match updated {
        Some(timestamp) => format!("Updated {}", timestamp.format("%B %-d, %Y")),
        None => "Updated unknown".to_string(),
    }
}

fn display_title(show: &Show) -> &str {
    if show.title.trim().is_empty() {
        NO_TITLE
    } else {
        &show.title
    }
}

fn season_label(count: usize) -> String {
    if count == 1 {
        "1 season".to_string()
    } else {
        format!("{} seasons", count)
    }
}

/// Renders genre names as tags, or a single placeholder tag
fn render_tags(ids: &[u32], genres: &[Genre]) -> String {
    let names = genre_names(ids, genres);
    if names.is_empty() {
        return format!("[{}]", NO_GENRES);
    }
    names
        .iter()
        .map(|name| format!("[{}]", name))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders the current search, filter, sort and page state
pub fn render_controls(query: &QueryState, page: &DerivedPage, genres: &[Genre]) -> String {
    let genre = match query.genre() {
        None => "All Genres".to_string(),
        Some(id) => genre_by_id(id, genres).map_or_else(|| format!("#{}", id), |g| g.title.to_string()),
    };
    let results = if page.filtered_count == 1 {
        "1 result".to_string()
    } else {
        format!("{} results", page.filtered_count)
    };

    format!(
        "Search: \"{}\" | Genre: {} | Sort: {} ({})\nPage {} of {} ({})",
        query.search_text(),
        genre,
        query.sort_key(),
        query.sort_direction(),
        page.page,
        page.total_pages,
        results
    )
}

/// Renders a single show card; `number` is its 1-based position on the page
pub fn render_card(number: usize, show: &Show, genres: &[Genre]) -> String {
    format!(
        "{:>2}. {}\n    {} | {}\n    {}",
        number,
        display_title(show),
        season_label(show.season_count()),
        render_tags(&show.genres, genres),
        format_updated(show.updated)
    )
}

/// Renders all cards of a page
pub fn render_page(page: &DerivedPage, genres: &[Genre]) -> String {
    if page.shows.is_empty() {
        return "No shows match the current search.".to_string();
    }
    page.shows
        .iter()
        .enumerate()
        .map(|(index, show)| render_card(index + 1, show, genres))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_season(season: &Season) -> String {
    let episodes = if season.episode_count == 1 {
        "1 episode".to_string()
    } else {
        format!("{} episodes", season.episode_count)
    };
    format!(
        "  Season {}: {} - {}",
        season.season_number, season.title, episodes
    )
}

/// Renders the detail view of a show
///
/// HTML in the description is converted to plain text.
pub fn render_detail(show: &Show, genres: &[Genre]) -> String {
    let description = nanohtml2text::html2text(&show.description).trim().to_string();
    let description = if description.is_empty() {
        NO_DESCRIPTION.to_string()
    } else {
        description
    };

    let seasons = if show.seasons.is_empty() {
        format!("  {}", NO_SEASONS)
    } else {
        show.seasons
            .iter()
            .map(render_season)
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut out = format!("=== {} ===\n", display_title(show));
    if let Some(image) = &show.image {
        out.push_str(&format!("Cover: {}\n", image));
    }
    out.push_str(&format!("\nDescription\n  {}\n", description));
    out.push_str(&format!("\nGenres\n  {}\n", render_tags(&show.genres, genres)));
    out.push_str(&format!("\n{}\n", format_updated(show.updated)));
    out.push_str(&format!("\nSeasons\n{}", seasons));
    out
}
