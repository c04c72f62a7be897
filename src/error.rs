pub type GifstripResult<T> = Result<T, GifstripError>;

#[derive(thiserror::Error, Debug)]
pub enum GifstripError {
    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    #[error("empty timeline: {0}")]
    EmptyTimeline(String),

    #[error("write error: {0}")]
    Write(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifstripError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn invalid_frame(msg: impl Into<String>) -> Self {
        Self::InvalidFrame(msg.into())
    }

    pub fn empty_timeline(msg: impl Into<String>) -> Self {
        Self::EmptyTimeline(msg.into())
    }

    pub fn write(msg: impl Into<String>) -> Self {
        Self::Write(msg.into())
    }
}
