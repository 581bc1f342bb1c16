use std::error::Error;
use std::fmt::{Display, Formatter};

/// Everything that can abort a curation run. `Query` covers the listing
/// side, `Deletion` the delete fan-out, `Config` anything caught before
/// the first remote call.
#[derive(Debug)]
pub enum CurationError {
    Query(Box<dyn Error + Send + Sync>),
    Deletion(Box<dyn Error + Send + Sync>),
    Config(String),
}

impl CurationError {
    pub fn query(source: impl Error + Send + Sync + 'static) -> Self {
        CurationError::Query(Box::new(source))
    }

    pub fn deletion(source: impl Error + Send + Sync + 'static) -> Self {
        CurationError::Deletion(Box::new(source))
    }
}

impl Display for CurationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CurationError::Query(e) => write!(f, "listing indices failed: {}", e),
            CurationError::Deletion(e) => write!(f, "deleting indices failed: {}", e),
            CurationError::Config(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl Error for CurationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CurationError::Query(e) | CurationError::Deletion(e) => Some(e.as_ref()),
            CurationError::Config(_) => None,
        }
    }
}
