use thiserror::Error;

/// Failure to acquire a backend handle.
///
/// The controller never surfaces these to subscribers; it logs them and stays idle.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The source could not be opened.
    #[error("cannot open {url}: {source}")]
    Open {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// The source opened but could not be decoded.
    #[error("cannot decode {url}: {reason}")]
    Decode { url: String, reason: String },

    /// The engine does not handle this kind of source.
    #[error("unsupported source: {0}")]
    Unsupported(String),

    /// The engine is not available on this host.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The output device could not be opened.
    #[error("audio output error: {0}")]
    Output(String),
}
