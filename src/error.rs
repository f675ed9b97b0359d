use thiserror::Error;

/// Every failure in the pipeline is fatal; there is no partial-success mode.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Cannot open id cache '{path}': {source}")]
    CacheOpen {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed row in id cache '{path}': {source}")]
    CacheParse { path: String, source: csv::Error },

    #[error("Cannot append to id cache '{path}': {source}")]
    CacheAppend { path: String, source: csv::Error },

    #[error("Cannot read contacts document '{path}': {source}")]
    DocumentRead {
        path: String,
        source: std::io::Error,
    },

    #[error("Cannot extract contact name.")]
    NameMissing,

    #[error("Lookup request for '{link}' failed: {source}")]
    LookupTransport { link: String, source: reqwest::Error },

    #[error("Cannot extract Facebook ID for '{link}'")]
    IdMissing { link: String },

    #[error("Cannot write export file '{path}': {source}")]
    ExportWrite {
        path: String,
        source: std::io::Error,
    },
}
