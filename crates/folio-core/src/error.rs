use thiserror::Error;

use crate::stage::ElementHandle;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid tween: {0}")]
    InvalidTween(String),

    #[error("Target not found: {0}")]
    TargetNotFound(ElementHandle),

    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Invalid marquee: {0}")]
    InvalidMarquee(String),

    #[error("Invalid magnetic binding: {0}")]
    InvalidMagnet(String),

    #[error("Frame callback failed: {0}")]
    FrameCallback(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
