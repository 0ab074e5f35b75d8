//! QR scanning for the agent dashboard.
//!
//! Scanning is polymorphic over where the payload comes from:
//!
//! | Source        | [`MockScanner`]            | [`DecodingScanner`]          |
//! |---------------|----------------------------|------------------------------|
//! | Camera        | fixed profile after delay  | frame → [`QrImageDecoder`]   |
//! | Upload        | fixed profile after delay  | bytes → [`QrImageDecoder`]   |
//! | Manual entry  | JSON payload parsed        | JSON payload parsed          |
//!
//! This crate ships no image decoder; plug one in through
//! [`QrImageDecoder`].

mod error;
mod reader;
mod types;

pub use error::{Result, ScanError};
pub use reader::{
    DecodingScanner, FrameSource, MockScanner, QrImageDecoder, QrScanner, DEFAULT_SCAN_DELAY,
};
pub use types::{ScanMethod, ScanOutcome, ScanSource};
