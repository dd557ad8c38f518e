use thiserror::Error;

pub type Result<T> = std::result::Result<T, SubspeedError>;

#[derive(Debug, Error)]
pub enum SubspeedError {
    #[error("malformed timestamp '{0}'")]
    MalformedTimestamp(String),
    #[error("invalid subtitle data: {0}")]
    SubtitleFormat(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("'{0}' not found on PATH")]
    MissingTool(&'static str),
    #[error("failed to run {tool}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("{tool} failed: {stderr}")]
    Tool { tool: &'static str, stderr: String },
    #[error("could not interpret ffprobe output: {0}")]
    Probe(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
