use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The indexing root does not exist or is not a directory.
    #[error("invalid directory: {0}")]
    InvalidRoot(PathBuf),

    /// A directory could not be listed; aborts the whole indexing call.
    #[error("unable to list directory {dir}: {source}")]
    ListDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("the search query must contain at least one term")]
    EmptyQuery,
}
