//! Error types for clip generation.

use retrofx_params::ParamError;
use thiserror::Error;

/// Result alias used throughout the synthesizer.
pub type SynthResult<T> = Result<T, SynthError>;

/// Errors surfaced while rendering a clip.
#[derive(Debug, Error)]
pub enum SynthError {
    /// The requested output bit depth has no PCM encoding.
    #[error("unsupported bit depth: {bit_depth} (expected 8, 16, 24, or 32)")]
    UnsupportedFormat { bit_depth: u32 },

    /// The requested sample rate is outside the supported set.
    #[error("invalid sample rate: {rate} Hz (expected 22050, 44100, or 48000)")]
    InvalidSampleRate { rate: u32 },

    /// A parameter slot was addressed by an unrecognized name.
    #[error(transparent)]
    Param(#[from] ParamError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offending_value() {
        let err = SynthError::UnsupportedFormat { bit_depth: 12 };
        assert!(err.to_string().contains("12"));

        let err = SynthError::InvalidSampleRate { rate: 8000 };
        assert!(err.to_string().contains("8000"));
    }
}
