//! Errors surfaced by the service layer.

use thiserror::Error;

/// Failure of a service call, classified the way the query boundary reports it
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was rejected before reaching the store.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The requested entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of entity that was requested.
        entity: &'static str,
        /// Identifier (or year) that had no match.
        id: i64,
    },
    /// The store failed while answering the request.
    #[error("storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// HTTP status the boundary maps this error to
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::InvalidInput(_) => 400,
            ServiceError::NotFound { .. } => 404,
            ServiceError::Storage(_) => 500,
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ServiceError::InvalidInput("bad".into()).status_code(), 400);
        assert_eq!(ServiceError::not_found("circuit", 999).status_code(), 404);
        assert_eq!(
            ServiceError::from(anyhow::anyhow!("disk I/O error")).status_code(),
            500
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = ServiceError::not_found("circuit", 999);
        assert_eq!(err.to_string(), "circuit 999 not found");
    }
}
