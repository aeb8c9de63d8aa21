use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid context type: {0}")]
    InvalidContext(String),

    #[error("fragment is not attached to a screen")]
    DetachedFragment,

    #[error("no result mappers were supplied")]
    MissingResultMappers,

    #[error("could not encode or decode payload")]
    Codec(#[from] serde_cbor::Error),

    #[error("screen hook failed")]
    Hook(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_error_keeps_source() {
        use std::error::Error as _;

        let error = Error::Hook(anyhow::anyhow!("camera unavailable"));

        assert_eq!(error.to_string(), "screen hook failed");
        assert_eq!(error.source().map(|s| s.to_string()), Some("camera unavailable".to_string()));
    }
}
