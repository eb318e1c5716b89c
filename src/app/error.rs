use thiserror::Error;

#[derive(Error, Debug)]
pub enum GleanerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Sitemap parsing error: {0}")]
    SitemapParse(String),

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No article content found in {0}")]
    Extraction(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GleanerError {
    /// Network, status and cache failures: the branch that issued the fetch ends here.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Status { .. } | Self::InvalidUrl(_) | Self::Io(_)
        )
    }

    /// Malformed feed, sitemap or JSON payloads.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::FeedParse(_) | Self::SitemapParse(_) | Self::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GleanerError>;
