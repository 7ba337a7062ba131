use std::path::PathBuf;

use crate::docs::XmlError;

/// Failures loading or reading a documentation set.
///
/// Only whole-document problems end up here. Missing optional pieces inside a
/// document (an absent description, a class without base classes) are not
/// errors and simply leave that part out of the reply.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    #[error("Doxygen XML not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed Doxygen XML in {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: XmlError,
    },

    #[error("member {id} is not defined in {}", path.display())]
    MissingMember { id: String, path: PathBuf },
}

impl DocError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DocError::SourceNotFound(_))
    }
}
