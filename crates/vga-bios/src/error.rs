use thiserror::Error;

pub type Result<T> = std::result::Result<T, VideoError>;

/// Failures of the typed video-service operations.
///
/// The INT 10h register convention reports these as a sentinel in `AL` (unknown mode) or not at
/// all (bad page); see [`crate::VideoBios::handle_int10`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VideoError {
    #[error("unsupported video mode {0:#04x}")]
    UnsupportedMode(u8),

    #[error("display page {0} out of range (expected 0-7)")]
    PageOutOfRange(u8),
}
