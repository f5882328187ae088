//! Mapping of HTTP failures to RepositoryError.

use haven_core::storage::RepositoryError;
use reqwest::StatusCode;

/// Maps transport errors to RepositoryError.
pub fn map_reqwest_error(err: reqwest::Error) -> RepositoryError {
    if err.is_connect() || err.is_timeout() {
        RepositoryError::ConnectionFailed(err.to_string())
    } else if err.is_decode() {
        RepositoryError::Serialization(err.to_string())
    } else {
        RepositoryError::QueryFailed(err.to_string())
    }
}

/// Maps a non-success PostgREST response to RepositoryError.
pub fn map_status(status: StatusCode, body: &str) -> RepositoryError {
    let message = format!("{status}: {body}");
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            RepositoryError::InvalidData(message)
        }
        s if s.is_server_error() => RepositoryError::ConnectionFailed(message),
        _ => RepositoryError::QueryFailed(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_connection_failures() {
        assert!(matches!(
            map_status(StatusCode::SERVICE_UNAVAILABLE, "down"),
            RepositoryError::ConnectionFailed(_)
        ));
    }

    #[test]
    fn test_bad_request_is_invalid_data() {
        let err = map_status(StatusCode::BAD_REQUEST, "bad column");
        assert_eq!(err.to_string(), "Invalid data: 400 Bad Request: bad column");
    }

    #[test]
    fn test_auth_failure_is_query_failure() {
        assert!(matches!(
            map_status(StatusCode::UNAUTHORIZED, "invalid api key"),
            RepositoryError::QueryFailed(_)
        ));
    }
}
