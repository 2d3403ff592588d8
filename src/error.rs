//! Error type shared by the message, layout and render stages.

use thiserror::Error;

/// Everything that can stop a single render cycle.
#[derive(Debug, Error)]
pub enum Error {
    /// The inbound message was not valid JSON or did not match the message shape
    #[error("invalid message: {0}")]
    Json(#[from] serde_json::Error),

    /// The message carried no table under the requested config id
    #[error("no rows under table '{0}'")]
    MissingTable(String),

    /// A style option that has no fallback was not configured
    #[error("style option '{0}' is required but not set")]
    MissingStyle(&'static str),

    /// A link referenced a node index outside the node list
    #[error("link {link} references missing node {node}")]
    MissingNode { link: usize, node: usize },

    /// The graph contains a cycle, so nodes cannot be assigned columns
    #[error("circular link")]
    CircularLink,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn read(path: &str) -> Result<String> {
        Ok(std::fs::read_to_string(path)?)
    }

    #[test]
    fn test_io_error_converts() {
        let err = read("/nonexistent/sankey-input.json").unwrap_err();
        match &err {
            Error::Io(inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::NotFound);
                assert_eq!(err.to_string(), inner.to_string());
            }
            other => panic!("expected an io error, got {:?}", other),
        }
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::MissingStyle("node_font_color").to_string(),
            "style option 'node_font_color' is required but not set"
        );
        assert_eq!(
            Error::MissingTable("DEFAULT".into()).to_string(),
            "no rows under table 'DEFAULT'"
        );
    }
}
