use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single request against the metadata API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} from {endpoint}")]
    Status { endpoint: String, status: StatusCode },

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected payload from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Status and transport failures read as "no data" to the pipeline.
    /// A body that does not decode means upstream data is broken.
    pub fn is_soft(&self) -> bool {
        matches!(self, FetchError::Status { .. } | FetchError::Transport { .. })
    }
}

/// Swallow soft failures into the empty payload, reporting them on the log.
pub fn or_empty<T: Default>(result: Result<T, FetchError>) -> Result<T, FetchError> {
    match result {
        Ok(value) => Ok(value),
        Err(FetchError::Status { endpoint, status }) => {
            tracing::warn!(status = status.as_u16(), %endpoint, "request failed, treating as empty");
            Ok(T::default())
        }
        Err(FetchError::Transport { endpoint, source }) => {
            tracing::warn!(%endpoint, error = %source, "request failed, treating as empty");
            Ok(T::default())
        }
        Err(e) => Err(e),
    }
}
