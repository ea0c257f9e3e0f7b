/// Podcast API catalog source implementation.
use super::api_types::{parse_seasons, parse_show_list};
use super::{CatalogError, CatalogSource, Season, SeasonRoute, Show};
use async_trait::async_trait;
use std::time::Duration;

/// Catalog source for the public podcast API.
///
/// This source fetches the show list from the API root and season data from
/// the per-show season endpoints.
pub struct PodcastApi {
    client: reqwest::Client,
    base_url: String,
}

impl PodcastApi {
    /// The public podcast API
    pub const DEFAULT_BASE_URL: &'static str = "https://podcast-api.netlify.app";

    /// Creates a source for the given API root with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::RequestError(e.to_string()))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Creates a source that issues its requests through `client`.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn shows_url(&self) -> String {
        format!("{}/", self.base_url)
    }

    fn seasons_url(&self, show_id: &str, route: SeasonRoute) -> String {
        match route {
            SeasonRoute::Primary => format!("{}/seasons/{}", self.base_url, show_id),
            SeasonRoute::Fallback => format!("{}/shows/{}/seasons", self.base_url, show_id),
        }
    }

    /// Issues a GET request and returns the body of a successful response.
    async fn get_text(&self, url: &str) -> Result<String, CatalogError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::RequestError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| CatalogError::RequestError(e.to_string()))
    }
}

#[async_trait]
impl CatalogSource for PodcastApi {
    async fn fetch_shows(&self) -> Result<Vec<Show>, CatalogError> {
        let body = self.get_text(&self.shows_url()).await?;
        parse_show_list(&body)
    }

    async fn fetch_seasons(
        &self,
        show_id: &str,
        route: SeasonRoute,
    ) -> Result<Vec<Season>, CatalogError> {
        let body = self.get_text(&self.seasons_url(show_id, route)).await?;
        parse_seasons(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves a single canned HTTP response on a local port and returns the
    /// base URL to reach it.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}", address)
    }

    fn local_api(base_url: &str) -> PodcastApi {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        PodcastApi::with_client(client, base_url)
    }

    #[test]
    fn test_urls() {
        let api = PodcastApi::new("https://example.test/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.shows_url(), "https://example.test/");
        assert_eq!(
            api.seasons_url("10716", SeasonRoute::Primary),
            "https://example.test/seasons/10716"
        );
        assert_eq!(
            api.seasons_url("10716", SeasonRoute::Fallback),
            "https://example.test/shows/10716/seasons"
        );
    }

    #[tokio::test]
    async fn test_fetch_shows_from_server() {
        let base_url = serve_once("200 OK", r#"[{"id":"1","title":"One","seasons":2}]"#).await;
        let shows = local_api(&base_url).fetch_shows().await.unwrap();
        assert_eq!(shows.len(), 1);
        assert_eq!(shows[0].title, "One");
        assert_eq!(shows[0].listed_season_count, Some(2));
    }

    #[tokio::test]
    async fn test_error_status_maps_to_http_status() {
        let base_url = serve_once("404 Not Found", r#"{"message":"not found"}"#).await;
        let result = local_api(&base_url)
            .fetch_seasons("10716", SeasonRoute::Primary)
            .await;

        match result {
            Err(CatalogError::HttpStatus {
                url,
                status,
                reason,
            }) => {
                assert_eq!(status, 404);
                assert_eq!(reason, "Not Found");
                assert!(url.ends_with("/seasons/10716"));
            }
            other => panic!("expected HttpStatus, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_bad_body_maps_to_parse_error() {
        let base_url = serve_once("200 OK", "<html>maintenance</html>").await;
        let result = local_api(&base_url).fetch_shows().await;
        assert!(matches!(result, Err(CatalogError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_maps_to_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let result = local_api(&format!("http://{}", address))
            .fetch_shows()
            .await;
        assert!(matches!(result, Err(CatalogError::RequestError(_))));
    }
}
