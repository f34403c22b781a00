//! Fetch-and-parse for remote point CSVs.
//!
//! Loads never fail loudly: network and parse errors are logged and the
//! caller gets an empty [`PointSet`]. A load is tied to its owner through a
//! [`CancellationToken`]; once the owner cancels, a late completion is
//! reported as [`LoadOutcome::Cancelled`] and must not be applied.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::record::{parse_points, PointSet};

#[derive(Debug)]
pub enum LoadError {
    /// The request could not be sent or the body could not be read.
    Network(String),
    /// The server answered with a non-success status.
    Status(u16),
    /// The body was not valid CSV.
    Parse(csv::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Network(msg) => write!(f, "Network error: {}", msg),
            LoadError::Status(code) => write!(f, "Bad response status: {}", code),
            LoadError::Parse(e) => write!(f, "CSV parse error: {}", e),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for LoadError {
    fn from(e: csv::Error) -> Self {
        LoadError::Parse(e)
    }
}

/// Source of CSV text for a resource locator.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    async fn fetch_text(&self, url: &str) -> Result<String, LoadError>;
}

/// Single-threaded cancellation flag shared between a component and its loads.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Rc<Cell<bool>>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug, PartialEq)]
pub enum LoadOutcome {
    /// Rows to render. Empty when the load failed.
    Loaded(PointSet),
    /// The owner was torn down while the load was in flight.
    Cancelled,
}

impl LoadOutcome {
    pub fn into_points(self) -> Option<PointSet> {
        match self {
            LoadOutcome::Loaded(points) => Some(points),
            LoadOutcome::Cancelled => None,
        }
    }
}

/// Fetch `url` and parse it as a headed CSV of points.
pub async fn load_points<F: Fetch>(
    fetcher: &F,
    url: &str,
    token: &CancellationToken,
) -> LoadOutcome {
    if token.is_cancelled() {
        return LoadOutcome::Cancelled;
    }

    let result = fetcher
        .fetch_text(url)
        .await
        .and_then(|body| parse_points(&body));

    if token.is_cancelled() {
        log::debug!("Ignoring late completion for {}", url);
        return LoadOutcome::Cancelled;
    }

    match result {
        Ok(points) => {
            log::info!("Loaded {} points from {}", points.len(), url);
            LoadOutcome::Loaded(points)
        }
        Err(e) => {
            log::warn!("Failed to load {}: {}", url, e);
            LoadOutcome::Loaded(PointSet::default())
        }
    }
}

#[cfg(feature = "api")]
pub use self::reqwest_fetcher::ReqwestFetcher;

#[cfg(feature = "api")]
mod reqwest_fetcher {
    use super::{Fetch, LoadError};
    use reqwest::{Client, StatusCode};

    /// `Fetch` over a shared reqwest client, for native tools.
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestFetcher {
        client: Client,
    }

    impl ReqwestFetcher {
        pub fn new(client: Client) -> Self {
            Self { client }
        }
    }

    impl Fetch for ReqwestFetcher {
        async fn fetch_text(&self, url: &str) -> Result<String, LoadError> {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| LoadError::Network(e.to_string()))?;
            if response.status() != StatusCode::OK {
                return Err(LoadError::Status(response.status().as_u16()));
            }
            response
                .text()
                .await
                .map_err(|e| LoadError::Network(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    enum Reply {
        Body(&'static str),
        Fail(u16),
    }

    /// Stub that answers with a fixed reply and can cancel a token mid-flight.
    struct StubFetcher {
        reply: Reply,
        cancel_during: Option<CancellationToken>,
        requested: RefCell<Vec<String>>,
    }

    impl StubFetcher {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                cancel_during: None,
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl Fetch for StubFetcher {
        async fn fetch_text(&self, url: &str) -> Result<String, LoadError> {
            self.requested.borrow_mut().push(url.to_string());
            if let Some(token) = &self.cancel_during {
                token.cancel();
            }
            match self.reply {
                Reply::Body(body) => Ok(body.to_string()),
                Reply::Fail(code) => Err(LoadError::Status(code)),
            }
        }
    }

    #[tokio::test]
    async fn loads_and_parses_rows() {
        let fetcher = StubFetcher::new(Reply::Body("LON,LAT,VOL\n-100,20,100\n"));
        let outcome = load_points(&fetcher, "http://x/data.csv", &CancellationToken::new()).await;
        let points = outcome.into_points().unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(fetcher.requested.borrow().as_slice(), ["http://x/data.csv"]);
    }

    #[tokio::test]
    async fn network_failure_degrades_to_empty() {
        let fetcher = StubFetcher::new(Reply::Fail(404));
        let outcome = load_points(&fetcher, "http://x/missing.csv", &CancellationToken::new()).await;
        assert_eq!(outcome.into_points().map(|p| p.len()), Some(0));
    }

    #[tokio::test]
    async fn cancelled_before_start_skips_fetch() {
        let fetcher = StubFetcher::new(Reply::Body("LON,LAT\n1,2\n"));
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(load_points(&fetcher, "http://x", &token).await, LoadOutcome::Cancelled);
        assert!(fetcher.requested.borrow().is_empty());
    }

    #[tokio::test]
    async fn late_completion_after_teardown_is_ignored() {
        let token = CancellationToken::new();
        let mut fetcher = StubFetcher::new(Reply::Body("LON,LAT\n1,2\n"));
        fetcher.cancel_during = Some(token.clone());
        assert_eq!(load_points(&fetcher, "http://x", &token).await, LoadOutcome::Cancelled);
    }

    #[test]
    fn error_display() {
        assert_eq!(LoadError::Status(500).to_string(), "Bad response status: 500");
        assert_eq!(
            LoadError::Network("timeout".into()).to_string(),
            "Network error: timeout"
        );
    }
}
