use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Engine returned {status} for {endpoint}: {body}")]
    EngineStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Malformed response from {endpoint}: {source}")]
    MalformedResponse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid question catalog: {0}")]
    Catalog(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FlowError>;
