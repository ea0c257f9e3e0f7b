/// Podcast API response types for deserialization.
///
/// These structures mirror the JSON the podcast API actually sends, including
/// its inconsistent layouts, and convert into the canonical [`Show`] and
/// [`Season`] structures exactly once.
use super::{CatalogError, Season, Show};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const UNTITLED_SEASON: &str = "Untitled Season";

/// Reads an optional field, treating a value of the wrong type as absent.
///
/// One malformed field must not reject the record, and through the untagged
/// wrappers the whole payload along with it.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// The show list arrives either bare or wrapped in an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ShowListPayload {
    Bare(Vec<ApiShow>),
    Shows { shows: Vec<ApiShow> },
    Data { data: Vec<ApiShow> },
}

impl ShowListPayload {
    fn into_shows(self) -> Vec<Show> {
        let shows = match self {
            ShowListPayload::Bare(shows)
            | ShowListPayload::Shows { shows }
            | ShowListPayload::Data { data: shows } => shows,
        };
        shows.into_iter().map(ApiShow::into_show).collect()
    }
}

/// Show ids are strings in the live API, numbers in some mirrors.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiId {
    Text(String),
    Number(u64),
}

impl ApiId {
    fn into_string(self) -> String {
        match self {
            ApiId::Text(text) => text,
            ApiId::Number(number) => number.to_string(),
        }
    }
}

/// The `seasons` field of a show record: a count in the list endpoint, a
/// list everywhere else.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiShowSeasons {
    Count(usize),
    List(Vec<ApiSeason>),
}

/// A single show record.
#[derive(Debug, Deserialize)]
struct ApiShow {
    id: ApiId,
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    image: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    genres: Option<Vec<u32>>,
    #[serde(default)]
    updated: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    seasons: Option<ApiShowSeasons>,
    #[serde(default, deserialize_with = "lenient")]
    season: Option<Vec<ApiSeason>>,
    #[serde(default, deserialize_with = "lenient")]
    episodes: Option<Vec<ApiSeason>>,
}

impl ApiShow {
    fn into_show(self) -> Show {
        let (carried, listed_season_count) = match (self.seasons, self.season, self.episodes) {
            (Some(ApiShowSeasons::List(list)), _, _) => (list, None),
            (Some(ApiShowSeasons::Count(count)), _, _) => (Vec::new(), Some(count)),
            (None, Some(list), _) | (None, None, Some(list)) => (list, None),
            (None, None, None) => (Vec::new(), None),
        };

        Show {
            id: self.id.into_string(),
            title: self.title.unwrap_or_default(),
            image: self.image.filter(|image| !image.is_empty()),
            description: self.description.unwrap_or_default(),
            genres: self.genres.unwrap_or_default(),
            updated: self.updated.as_ref().and_then(parse_updated),
            seasons: normalize_seasons(carried),
            listed_season_count,
        }
    }
}

/// The body of a season endpoint response.
///
/// Variant order matters: serde tries them top to bottom.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SeasonPayload {
    List(Vec<ApiSeason>),
    Seasons { seasons: Vec<ApiSeason> },
    Season { season: Vec<ApiSeason> },
    Episodes { episodes: Vec<ApiSeason> },
}

impl SeasonPayload {
    fn into_seasons(self) -> Vec<Season> {
        let raw = match self {
            SeasonPayload::List(raw)
            | SeasonPayload::Seasons { seasons: raw }
            | SeasonPayload::Season { season: raw }
            | SeasonPayload::Episodes { episodes: raw } => raw,
        };
        normalize_seasons(raw)
    }
}

/// A single season record in any of the known layouts.
#[derive(Debug, Deserialize)]
struct ApiSeason {
    #[serde(rename = "seasonNumber", default, deserialize_with = "lenient")]
    season_number: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    number: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    season: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(rename = "episodeCount", default, deserialize_with = "lenient")]
    episode_count: Option<usize>,
    #[serde(default, deserialize_with = "lenient")]
    episodes: Option<Vec<IgnoredAny>>,
    #[serde(rename = "episodeNumbers", default, deserialize_with = "lenient")]
    episode_numbers: Option<Vec<IgnoredAny>>,
}

impl ApiSeason {
    /// Converts into a [`Season`]; `position` is the 0-based list index.
    fn into_season(self, position: usize) -> Season {
        let season_number = self
            .season_number
            .or(self.number)
            .or(self.season)
            .unwrap_or_else(|| u32::try_from(position + 1).unwrap_or(u32::MAX));

        let title = self
            .title
            .filter(|title| !title.trim().is_empty())
            .or(self.name.filter(|name| !name.trim().is_empty()))
            .unwrap_or_else(|| UNTITLED_SEASON.to_string());

        // A zero count defers to the episode arrays.
        let episode_count = self
            .episode_count
            .filter(|count| *count > 0)
            .or(self.episodes.map(|episodes| episodes.len()))
            .or(self.episode_numbers.map(|numbers| numbers.len()))
            .unwrap_or(0);

        Season {
            season_number,
            title,
            episode_count,
        }
    }
}

fn normalize_seasons(raw: Vec<ApiSeason>) -> Vec<Season> {
    raw.into_iter()
        .enumerate()
        .map(|(position, season)| season.into_season(position))
        .collect()
}

/// Reads the `updated` field: a timestamp string or epoch milliseconds.
fn parse_updated(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_timestamp(text),
        Value::Number(number) => number.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// Parses an API timestamp.
///
/// Accepts RFC 3339 (what the API sends) and bare `YYYY-MM-DD` dates.
/// Anything else yields `None`.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

/// Parses the body of the show list endpoint.
///
/// Accepts a bare array as well as objects wrapping the array under `shows`
/// or `data`.
pub fn parse_show_list(body: &str) -> Result<Vec<Show>, CatalogError> {
    serde_json::from_str::<ShowListPayload>(body)
        .map(ShowListPayload::into_shows)
        .map_err(|e| CatalogError::ParseError(e.to_string()))
}

/// Parses the body of a season endpoint into canonical seasons.
pub fn parse_seasons(body: &str) -> Result<Vec<Season>, CatalogError> {
    serde_json::from_str::<SeasonPayload>(body)
        .map(SeasonPayload::into_seasons)
        .map_err(|e| CatalogError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_show_list_shapes() {
        let record = r#"{"id":"10716","title":"Something Was Wrong","genres":[2],"seasons":14,"updated":"2022-11-03T07:00:00.000Z"}"#;

        for body in [
            format!("[{}]", record),
            format!(r#"{{"shows":[{}]}}"#, record),
            format!(r#"{{"data":[{}]}}"#, record),
        ] {
            let shows = parse_show_list(&body).unwrap();
            assert_eq!(shows.len(), 1);
            assert_eq!(shows[0].id, "10716");
            assert_eq!(shows[0].title, "Something Was Wrong");
            assert_eq!(shows[0].genres, vec![2]);
            assert_eq!(shows[0].listed_season_count, Some(14));
            assert!(shows[0].seasons.is_empty());
        }
    }

    #[test]
    fn test_show_list_rejects_unknown_shape() {
        assert!(matches!(
            parse_show_list(r#"{"items":[]}"#),
            Err(CatalogError::ParseError(_))
        ));
        assert!(parse_show_list("not json").is_err());
    }

    #[test]
    fn test_show_tolerates_missing_and_null_fields() {
        let shows = parse_show_list(r#"[{"id":42,"title":null,"genres":null}]"#).unwrap();
        assert_eq!(shows[0].id, "42");
        assert_eq!(shows[0].title, "");
        assert!(shows[0].genres.is_empty());
        assert!(shows[0].updated.is_none());
        assert_eq!(shows[0].season_count(), 0);
    }

    #[test]
    fn test_show_carrying_season_list() {
        let shows =
            parse_show_list(r#"[{"id":"1","season":[{"title":"Pilot","episodeCount":2}]}]"#)
                .unwrap();
        assert_eq!(
            shows[0].seasons,
            vec![Season {
                season_number: 1,
                title: "Pilot".to_string(),
                episode_count: 2,
            }]
        );
    }

    #[test]
    fn test_timestamps() {
        assert_eq!(
            parse_timestamp("2022-11-03T07:00:00.000Z"),
            Some(Utc.with_ymd_and_hms(2022, 11, 3, 7, 0, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2021-01-15"),
            Some(Utc.with_ymd_and_hms(2021, 1, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("last tuesday"), None);
    }

    #[test]
    fn test_season_payload_layouts() {
        let bare = r#"[{"seasonNumber":1,"title":"First","episodeCount":5}]"#;
        let keyed = r#"{"id":"7","seasons":[{"season":1,"title":"First","episodes":[{},{},{},{},{}]}]}"#;
        let singular = r#"{"season":[{"number":1,"name":"First","episodeNumbers":[1,2,3,4,5]}]}"#;
        let episodes = r#"{"episodes":[{"title":"First","episodeCount":5}]}"#;

        let expected = vec![Season {
            season_number: 1,
            title: "First".to_string(),
            episode_count: 5,
        }];

        for body in [bare, keyed, singular, episodes] {
            assert_eq!(parse_seasons(body).unwrap(), expected, "payload: {}", body);
        }
    }

    #[test]
    fn test_season_placeholders() {
        let seasons = parse_seasons(r#"[{}, {"title":"  "}]"#).unwrap();
        assert_eq!(
            seasons,
            vec![
                Season {
                    season_number: 1,
                    title: "Untitled Season".to_string(),
                    episode_count: 0,
                },
                Season {
                    season_number: 2,
                    title: "Untitled Season".to_string(),
                    episode_count: 0,
                },
            ]
        );
    }

    #[test]
    fn test_show_list_tolerates_mistyped_fields() {
        let body = r#"[
            {"id":"1","title":"Good","updated":"2022-11-03T07:00:00.000Z"},
            {"id":"2","title":"Millis","updated":1667458800000},
            {"id":"3","title":"Odd","updated":true,"season":3,"genres":"comedy","image":7}
        ]"#;

        let shows = parse_show_list(body).unwrap();
        assert_eq!(shows.len(), 3);
        assert_eq!(
            shows[1].updated,
            Some(Utc.with_ymd_and_hms(2022, 11, 3, 7, 0, 0).unwrap())
        );
        assert!(shows[2].updated.is_none());
        assert!(shows[2].seasons.is_empty());
        assert!(shows[2].genres.is_empty());
        assert!(shows[2].image.is_none());
        assert_eq!(shows[2].title, "Odd");
    }

    #[test]
    fn test_season_tolerates_mistyped_fields() {
        let seasons = parse_seasons(
            r#"[
                {"seasonNumber":1,"title":"First","episodes":12},
                {"seasonNumber":"two","title":"Second","episodeCount":3}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            seasons,
            vec![
                Season {
                    season_number: 1,
                    title: "First".to_string(),
                    episode_count: 0,
                },
                Season {
                    season_number: 2,
                    title: "Second".to_string(),
                    episode_count: 3,
                },
            ]
        );
    }

    #[test]
    fn test_zero_episode_count_defers_to_arrays() {
        let seasons =
            parse_seasons(r#"[{"episodeCount":0,"episodes":[{},{},{}]},{"episodeCount":0}]"#)
                .unwrap();
        assert_eq!(seasons[0].episode_count, 3);
        assert_eq!(seasons[1].episode_count, 0);
    }

    #[test]
    fn test_season_payload_garbage() {
        assert!(parse_seasons(r#""nope""#).is_err());
        assert!(parse_seasons(r#"{"message":"not found"}"#).is_err());
    }
}
