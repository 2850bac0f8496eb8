use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("HTTP status code '{0}'")]
    HttpStatus(u16),
}

/// A successfully fetched page.
pub struct FetchedPage {
    /// HTTP status code of the final response (after redirects).
    pub status: u16,
    /// Response body decoded to text.
    pub body: String,
}

/// How to fetch a URL. The default is [`HttpFetcher`]; callers with special
/// needs (custom headers, authentication, canned responses in tests) supply
/// their own implementation.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Default fetcher: a plain blocking GET with a request timeout.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(HttpFetcher { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        let response = self.client.get(parsed).send().map_err(map_reqwest_error)?;

        let status = response.status();

        // A status of 400 or above aborts the watch: no extraction is
        // attempted against an error page, and no fingerprint is stored.
        if status.as_u16() >= 400 {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response.text().map_err(map_reqwest_error)?;

        Ok(FetchedPage {
            status: status.as_u16(),
            body,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::Timeout(err.to_string());
    }
    FetchError::Network(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_is_rejected_before_any_io() {
        let fetcher = HttpFetcher::new(Duration::from_secs(1)).unwrap();
        let result = fetcher.fetch("not a url");
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn test_http_status_error_display_names_the_code() {
        let err = FetchError::HttpStatus(404);
        assert_eq!(err.to_string(), "HTTP status code '404'");
    }
}
