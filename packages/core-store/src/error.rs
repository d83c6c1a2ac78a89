//! Error types for pathstate.
//!
//! Reads never fail: a path that does not resolve is `None`. Errors come from
//! user code running inside a write (middleware) and from serde conversions.

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Middleware refused the new snapshot; nothing was published.
    #[error("middleware rejected the update: {message}")]
    Middleware { message: String },

    #[error("An error occurred while encoding a value: {message}")]
    Encode { message: String },

    #[error("An error occurred while decoding a value: {message}")]
    Decode { message: String },

    #[error("{message}")]
    Other { message: String },
}

impl Error {
    pub fn middleware(message: impl Into<String>) -> Self {
        Error::Middleware {
            message: message.into(),
        }
    }

    pub fn encode(message: impl Into<String>) -> Self {
        Error::Encode {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Error::Decode {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middleware_display() {
        let e = Error::middleware("version must be positive");
        assert_eq!(
            e.to_string(),
            "middleware rejected the update: version must be positive"
        );
    }

    #[test]
    fn codec_display() {
        assert!(Error::decode("expected a string")
            .to_string()
            .contains("decoding"));
        assert!(Error::encode("bad float").to_string().contains("encoding"));
    }

    #[test]
    fn other_display() {
        let e = Error::Other {
            message: "something went wrong".to_string(),
        };
        assert_eq!(format!("{}", e), "something went wrong");
    }
}
