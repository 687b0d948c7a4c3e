use thiserror::Error;

/// Failure reported by a [`RecordStore`](crate::store::RecordStore) operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user #{0} not found")]
    NotFound(u32),
    #[error("service unavailable during {0}")]
    Unavailable(&'static str),
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<StoreError>,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Attach a short description of the failed operation to a store error.
pub trait Context<T> {
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T> Context<T> for Result<T> {
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| StoreError::WithContext {
            context: f(),
            source: Box::new(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn context_wraps_and_keeps_source() {
        let res: Result<()> = Err(StoreError::NotFound(7));
        let err = res.with_ctx(|| "save user".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "save user: user #7 not found");
        let src = err.source().expect("source kept");
        assert_eq!(src.to_string(), "user #7 not found");
    }
}
