//! QR payload encoding for tourist profiles.
//!
//! The payload is the profile serialized as a JSON object with the keys
//! `name`, `email`, `phone`, `passport`, `destination` and `duration`.
//! Rendering the payload into an image is left to the presentation layer.

use super::error::{RegistryError, Result};
use super::types::TouristProfile;

/// Text content of a tourist QR code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrPayload(String);

impl QrPayload {
    /// Encodes a profile into a payload.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Encoding`] if serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use safetrail_core::registry::{QrPayload, TouristProfile};
    ///
    /// let profile = TouristProfile {
    ///     name: "John Smith".into(),
    ///     email: "john.smith@email.com".into(),
    ///     phone: "+1-555-0123".into(),
    ///     passport: "AB123456789".into(),
    ///     destination: "Paris, France".into(),
    ///     duration: "7 days".into(),
    /// };
    ///
    /// let payload = QrPayload::encode(&profile).unwrap();
    /// assert_eq!(QrPayload::parse(payload.as_str()).unwrap(), profile);
    /// ```
    pub fn encode(profile: &TouristProfile) -> Result<Self> {
        serde_json::to_string(profile)
            .map(Self)
            .map_err(|e| RegistryError::Encoding(e.to_string()))
    }

    /// Parses payload text back into a validated profile.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidPayload`] if the text is not a JSON
    /// profile, or the validation error if a field is blank.
    pub fn parse(text: &str) -> Result<TouristProfile> {
        let profile: TouristProfile = serde_json::from_str(text.trim())
            .map_err(|e| RegistryError::InvalidPayload(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Payload text to render.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the payload, returning its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

/// File name offered when a tourist downloads their QR image.
///
/// # Examples
///
/// ```
/// use safetrail_core::registry::download_file_name;
///
/// assert_eq!(download_file_name("John  Smith"), "tourist-qr-john-smith.png");
/// ```
#[must_use]
pub fn download_file_name(name: &str) -> String {
    let slug = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    format!("tourist-qr-{slug}.png")
}
