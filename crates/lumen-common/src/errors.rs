use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("config file already exists: {0} (use --force to replace it)")]
    AlreadyExists(PathBuf),
}

/// Failures of the persistent key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serialize(String),

    #[error("store file is corrupt: {0}")]
    Corrupt(String),

    #[error("store watch error: {0}")]
    Watch(String),
}

/// Failures of a single remote request (listing or asset).
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("response too short ({len} characters, need at least {min})")]
    TooShort { len: usize, min: usize },

    #[error("response parse error: {0}")]
    Parse(String),
}

/// Any setup failure of the host binary.
#[derive(Debug, thiserror::Error)]
pub enum LumenError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("themes.min_css_len = 0".into());
        assert_eq!(
            err.to_string(),
            "config validation error: themes.min_css_len = 0"
        );
    }

    #[test]
    fn fetch_error_display() {
        let err = FetchError::Status {
            url: "https://example.com/a.css".into(),
            status: 404,
        };
        assert_eq!(err.to_string(), "https://example.com/a.css returned HTTP 404");

        let err = FetchError::TooShort { len: 3, min: 10 };
        assert_eq!(
            err.to_string(),
            "response too short (3 characters, need at least 10)"
        );

        let err = FetchError::Network("connection refused".into());
        assert_eq!(err.to_string(), "network error: connection refused");
    }

    #[test]
    fn store_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: StoreError = io_err.into();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(err.to_string().contains("read-only"));
    }

    #[test]
    fn lumen_error_conversions() {
        let err: LumenError = ConfigError::ParseError("bad toml".into()).into();
        assert!(matches!(err, LumenError::Config(_)));
        assert!(err.to_string().contains("bad toml"));

        let err: LumenError = StoreError::Corrupt("truncated".into()).into();
        assert!(matches!(err, LumenError::Store(_)));

        let err: LumenError = FetchError::Parse("not json".into()).into();
        assert!(matches!(err, LumenError::Fetch(_)));
        assert_eq!(err.to_string(), "response parse error: not json");
    }
}
