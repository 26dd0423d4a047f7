//! Error types for the parameter model.

use thiserror::Error;

/// Errors that can occur when addressing parameter slots.
#[derive(Debug, Error)]
pub enum ParamError {
    /// A slot name did not match any known parameter.
    ///
    /// The slot enumeration is closed, so this only arises on the
    /// string-keyed lookup path and is treated as a programming error.
    #[error("unknown parameter slot: {name}")]
    UnknownSlot {
        /// The name that failed to resolve.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_slot_message() {
        let err = ParamError::UnknownSlot {
            name: "Reverb".to_string(),
        };
        assert!(err.to_string().contains("Reverb"));
    }
}
