//! Scanner implementations and the decoding seams they rely on.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};

use super::error::{Result, ScanError};
use super::types::{ScanMethod, ScanOutcome, ScanSource};
use crate::registry::{QrPayload, TouristProfile};

/// Default time the mock scanner "holds the camera".
pub const DEFAULT_SCAN_DELAY: Duration = Duration::from_secs(2);

/// Reads a tourist profile from a QR source.
pub trait QrScanner {
    /// Scans `source` and returns the validated profile.
    ///
    /// Dropping the returned future cancels the scan.
    ///
    /// # Errors
    ///
    /// Returns a [`ScanError`] when no QR code can be read or the payload
    /// is not a complete tourist profile.
    fn scan(&self, source: ScanSource) -> impl Future<Output = Result<ScanOutcome>> + Send;
}

/// Turns an image into the text encoded in its QR code.
pub trait QrImageDecoder: Send + Sync {
    /// Decodes the first QR code found in `image`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Undecodable`] when no QR code is found.
    fn decode(&self, image: &[u8]) -> Result<String>;
}

/// Captures still frames from a camera.
pub trait FrameSource: Send + Sync {
    /// Captures one frame.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Capture`] if the camera cannot deliver a frame.
    fn capture(&self) -> Result<Vec<u8>>;
}

/// Parses typed payload text. Shared by every scanner.
fn scan_manual(text: &str) -> Result<ScanOutcome> {
    if text.trim().is_empty() {
        return Err(ScanError::EmptyInput);
    }
    let profile = QrPayload::parse(text)?;
    debug!("Parsed manual entry for {}", profile.tourist_id());
    Ok(ScanOutcome::new(profile, ScanMethod::ManualEntry))
}

/// Scanner that decodes real images through a [`QrImageDecoder`].
pub struct DecodingScanner<D: QrImageDecoder> {
    decoder: D,
    camera: Option<Arc<dyn FrameSource>>,
}

impl<D: QrImageDecoder> DecodingScanner<D> {
    /// Creates a scanner without a camera; only uploads and manual entry work.
    #[must_use]
    pub const fn new(decoder: D) -> Self {
        Self {
            decoder,
            camera: None,
        }
    }

    /// Attaches a camera for [`ScanSource::Camera`].
    #[must_use]
    pub fn with_camera(mut self, camera: Arc<dyn FrameSource>) -> Self {
        self.camera = Some(camera);
        self
    }

    fn decode_image(&self, image: &[u8], method: ScanMethod) -> Result<ScanOutcome> {
        if image.is_empty() {
            return Err(ScanError::EmptyImage);
        }
        let text = self.decoder.decode(image)?;
        let profile = QrPayload::parse(&text)?;
        info!("Scanned tourist {} via {}", profile.tourist_id(), method.as_str());
        Ok(ScanOutcome::new(profile, method))
    }
}

impl<D: QrImageDecoder> QrScanner for DecodingScanner<D> {
    async fn scan(&self, source: ScanSource) -> Result<ScanOutcome> {
        let method = source.method();
        match source {
            ScanSource::Camera => {
                let camera = self.camera.as_ref().ok_or(ScanError::NoCamera)?;
                let frame = camera.capture()?;
                self.decode_image(&frame, method)
            }
            ScanSource::Upload(image) => self.decode_image(&image, method),
            ScanSource::ManualEntry(text) => scan_manual(&text),
        }
    }
}

impl<D: QrImageDecoder> std::fmt::Debug for DecodingScanner<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodingScanner")
            .field("has_camera", &self.camera.is_some())
            .finish_non_exhaustive()
    }
}

/// Demo scanner: camera and upload wait, then return a fixed profile.
///
/// Manual entry is parsed for real. Useful for demos and for exercising
/// the agent flow without an image decoder.
#[derive(Debug, Clone)]
pub struct MockScanner {
    delay: Duration,
    profile: TouristProfile,
}

impl MockScanner {
    /// Creates a mock returning [`MockScanner::sample_profile`] after
    /// [`DEFAULT_SCAN_DELAY`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            delay: DEFAULT_SCAN_DELAY,
            profile: Self::sample_profile(),
        }
    }

    /// Sets the simulated scan time.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the profile returned for camera and upload scans.
    #[must_use]
    pub fn with_profile(mut self, profile: TouristProfile) -> Self {
        self.profile = profile;
        self
    }

    /// The fixed record handed out by default.
    #[must_use]
    pub fn sample_profile() -> TouristProfile {
        TouristProfile {
            name: "John Smith".to_string(),
            email: "john.smith@email.com".to_string(),
            phone: "+1-555-0123".to_string(),
            passport: "AB123456789".to_string(),
            destination: "Paris, France".to_string(),
            duration: "7 days".to_string(),
        }
    }

    async fn simulate(&self, method: ScanMethod) -> ScanOutcome {
        tokio::time::sleep(self.delay).await;
        debug!("Mock {} scan finished", method.as_str());
        ScanOutcome::new(self.profile.clone(), method)
    }
}

impl Default for MockScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl QrScanner for MockScanner {
    async fn scan(&self, source: ScanSource) -> Result<ScanOutcome> {
        let method = source.method();
        match source {
            ScanSource::Upload(image) if image.is_empty() => Err(ScanError::EmptyImage),
            ScanSource::Camera | ScanSource::Upload(_) => Ok(self.simulate(method).await),
            ScanSource::ManualEntry(text) => scan_manual(&text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryError;

    /// Decoder that treats the image bytes as UTF-8 payload text.
    struct Utf8Decoder;

    impl QrImageDecoder for Utf8Decoder {
        fn decode(&self, image: &[u8]) -> Result<String> {
            String::from_utf8(image.to_vec())
                .map_err(|e| ScanError::Undecodable(e.to_string()))
        }
    }

    struct FixedCamera(Vec<u8>);

    impl FrameSource for FixedCamera {
        fn capture(&self) -> Result<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenCamera;

    impl FrameSource for BrokenCamera {
        fn capture(&self) -> Result<Vec<u8>> {
            Err(ScanError::Capture("lens cap on".to_string()))
        }
    }

    fn payload() -> String {
        QrPayload::encode(&MockScanner::sample_profile())
            .unwrap()
            .into_string()
    }

    #[tokio::test(start_paused = true)]
    async fn mock_camera_returns_fixed_profile_after_delay() {
        let scanner = MockScanner::new();
        let start = tokio::time::Instant::now();

        let outcome = scanner.scan(ScanSource::Camera).await.unwrap();

        assert_eq!(outcome.method, ScanMethod::Camera);
        assert_eq!(outcome.profile, MockScanner::sample_profile());
        assert!(start.elapsed() >= DEFAULT_SCAN_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn mock_upload_uses_custom_profile() {
        let mut profile = MockScanner::sample_profile();
        profile.name = "Jane Roe".to_string();
        let scanner = MockScanner::new()
            .with_delay(Duration::from_millis(10))
            .with_profile(profile.clone());

        let outcome = scanner.scan(ScanSource::Upload(vec![0x89, 0x50])).await.unwrap();

        assert_eq!(outcome.method, ScanMethod::Upload);
        assert_eq!(outcome.profile, profile);
    }

    #[tokio::test(start_paused = true)]
    async fn outcome_method_follows_source() {
        let mock = MockScanner::new();
        let decoding = DecodingScanner::new(Utf8Decoder)
            .with_camera(Arc::new(FixedCamera(payload().into_bytes())));

        for source in [
            ScanSource::Camera,
            ScanSource::Upload(payload().into_bytes()),
            ScanSource::ManualEntry(payload()),
        ] {
            let expected = source.method();
            let from_mock = mock.scan(source.clone()).await.unwrap();
            let from_decoder = decoding.scan(source).await.unwrap();
            assert_eq!(from_mock.method, expected);
            assert_eq!(from_decoder.method, expected);
        }
    }

    #[tokio::test]
    async fn mock_rejects_empty_upload() {
        let result = MockScanner::new().scan(ScanSource::Upload(Vec::new())).await;
        assert_eq!(result, Err(ScanError::EmptyImage));
    }

    #[tokio::test]
    async fn manual_entry_parses_json() {
        let outcome = MockScanner::new()
            .scan(ScanSource::ManualEntry(payload()))
            .await
            .unwrap();
        assert_eq!(outcome.method, ScanMethod::ManualEntry);
        assert_eq!(outcome.profile.passport, "AB123456789");
    }

    #[tokio::test]
    async fn manual_entry_rejects_invalid_json() {
        let result = MockScanner::new()
            .scan(ScanSource::ManualEntry("{not json".to_string()))
            .await;
        assert!(matches!(
            result,
            Err(ScanError::InvalidData(RegistryError::InvalidPayload(_)))
        ));
    }

    #[tokio::test]
    async fn manual_entry_rejects_blank_input() {
        let result = MockScanner::new()
            .scan(ScanSource::ManualEntry("   ".to_string()))
            .await;
        assert_eq!(result, Err(ScanError::EmptyInput));
    }

    #[tokio::test]
    async fn decoding_scanner_reads_upload() {
        let scanner = DecodingScanner::new(Utf8Decoder);
        let outcome = scanner
            .scan(ScanSource::Upload(payload().into_bytes()))
            .await
            .unwrap();
        assert_eq!(outcome.profile, MockScanner::sample_profile());
    }

    #[tokio::test]
    async fn decoding_scanner_without_camera_fails() {
        let scanner = DecodingScanner::new(Utf8Decoder);
        let result = scanner.scan(ScanSource::Camera).await;
        assert_eq!(result, Err(ScanError::NoCamera));
    }

    #[tokio::test]
    async fn decoding_scanner_reads_camera_frame() {
        let scanner = DecodingScanner::new(Utf8Decoder)
            .with_camera(Arc::new(FixedCamera(payload().into_bytes())));
        let outcome = scanner.scan(ScanSource::Camera).await.unwrap();
        assert_eq!(outcome.method, ScanMethod::Camera);
    }

    #[tokio::test]
    async fn decoding_scanner_surfaces_capture_failure() {
        let scanner = DecodingScanner::new(Utf8Decoder).with_camera(Arc::new(BrokenCamera));
        let result = scanner.scan(ScanSource::Camera).await;
        assert!(matches!(result, Err(ScanError::Capture(_))));
    }

    #[tokio::test]
    async fn decoding_scanner_rejects_undecodable_image() {
        let scanner = DecodingScanner::new(Utf8Decoder);
        let result = scanner.scan(ScanSource::Upload(vec![0xFF, 0xFE, 0xFD])).await;
        assert!(matches!(result, Err(ScanError::Undecodable(_))));
    }

    #[test]
    fn decoding_scanner_debug_hides_decoder() {
        let scanner = DecodingScanner::new(Utf8Decoder);
        let debug_str = format!("{scanner:?}");
        assert!(debug_str.contains("has_camera: false"));
    }
}
