use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub type FetchResult<T> = Result<T, FetchError>;

const EXPORT_BASE: &str = "https://docs.google.com/spreadsheets/d";

/// Client for the Google Sheets CSV export endpoint.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for SheetsClient {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("ultiscores/0.1 (tournament results pipeline)")
                .build()
                .unwrap_or_default(),
            base_url: EXPORT_BASE.to_owned(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
pub enum FetchError {
    Network(reqwest::Error, String),
    Status(reqwest::Error, String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            FetchError::Status(e, url) => write!(f, "HTTP error for {url}: {e}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Network(e, _) | FetchError::Status(e, _) => Some(e),
        }
    }
}

impl SheetsClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at a different host. Tests use this against a local
    /// mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Download one worksheet tab as CSV text.
    ///
    /// The gviz endpoint serves any sheet shared as "anyone with the link";
    /// no API key involved.
    pub async fn fetch_tab(&self, sheet_id: &str, tab: &str) -> FetchResult<String> {
        let url = format!(
            "{}/{}/gviz/tq?tqx=out:csv&sheet={}",
            self.base_url, sheet_id, tab
        );
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FetchError::Network(e, url.clone()))?;

        match response.error_for_status() {
            Ok(res) => res
                .text()
                .await
                .map_err(|e| FetchError::Network(e, url)),
            Err(e) => Err(FetchError::Status(e, url)),
        }
    }
}
