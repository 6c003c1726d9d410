#![forbid(unsafe_code)]

//! Content errors.

use std::fmt;

/// Errors from loading catalog data.
#[derive(Debug)]
pub enum ContentError {
    /// The catalog JSON did not parse or did not match the schema.
    Json(serde_json::Error),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid catalog JSON: {err}"),
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_error_displays_and_chains() {
        let err: ContentError = serde_json::from_str::<u32>("{").unwrap_err().into();
        assert!(err.to_string().starts_with("invalid catalog JSON"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
