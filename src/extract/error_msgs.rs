use thiserror::Error;

#[derive(Debug, Error)]
pub enum YoutubeError {
    #[error("API key not found in YouTube config")]
    ApiKeyNotFound,

    #[error("the API request for comment data failed: {0}")]
    ApiRequestError(#[from] reqwest::Error),

    #[error("could not extract ytInitialData from the watch page")]
    InitialDataNotFound,

    #[error("comment sort menu not found")]
    SortMenuNotFound,

    #[error("continuation endpoint has no token")]
    ContinuationNotFound,

    #[error("error returned from server: {0}")]
    Server(String),

    #[error("malformed JSON in response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bad extraction pattern: {0}")]
    Pattern(#[from] regex::Error),
}
