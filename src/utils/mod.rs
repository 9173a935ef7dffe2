//! Utility modules for document decoding
//!
//! Exact duration arithmetic, Enigma text command handling and the
//! score payload scrambler.

pub mod enigma_string;
pub mod fraction;
pub mod score_file_encoder;

// Re-export commonly used types
pub use fraction::Fraction;
pub use score_file_encoder::ScoreFileEncoder;
