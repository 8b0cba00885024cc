//! Camera capability used by the QR scanner
//!
//! The actual QR decoding happens wherever the camera lives. The scanner only
//! sees a start/stop capability that yields decode events on a channel.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Capacity of a decode channel; frames beyond this are dropped
const DECODE_CHANNEL_CAPACITY: usize = 32;

pub type CameraResult<T> = Result<T, CameraError>;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CameraError {
    #[error("Camera unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to stop camera: {0}")]
    StopFailed(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    Front,
    Environment,
}

impl std::str::FromStr for FacingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "front" | "user" => Ok(FacingMode::Front),
            "environment" | "back" | "rear" => Ok(FacingMode::Environment),
            other => Err(format!("Unknown facing mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanRegion {
    pub width: u32,
    pub height: u32,
}

impl std::str::FromStr for ScanRegion {
    type Err = String;

    /// Parses `WIDTHxHEIGHT`, e.g. `250x250`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("Invalid scan region '{}', expected WIDTHxHEIGHT", s))?;
        let width = w.trim().parse().map_err(|_| format!("Invalid width '{}'", w))?;
        let height = h.trim().parse().map_err(|_| format!("Invalid height '{}'", h))?;
        if width == 0 || height == 0 {
            return Err("Scan region must be non-empty".to_string());
        }
        Ok(ScanRegion { width, height })
    }
}

/// Options handed to the camera when a scan starts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScanConfig {
    pub facing_mode: FacingMode,
    /// Frames per second
    pub scan_rate: u32,
    pub scan_region: ScanRegion,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            facing_mode: FacingMode::Environment,
            scan_rate: 10,
            scan_region: ScanRegion {
                width: 250,
                height: 250,
            },
        }
    }
}

/// What a running camera reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeEvent {
    /// A QR code was decoded into text
    Decoded(String),
    /// A frame couldn't be decoded (usually just "no code in view")
    FrameError(String),
}

/// Start/stop camera capability
#[async_trait]
pub trait Camera: Send + Sync {
    /// Acquire the device and begin decoding. Events arrive on the returned channel
    /// until [`Camera::stop`] is called or the device goes away.
    async fn start(&self, config: &ScanConfig) -> CameraResult<mpsc::Receiver<DecodeEvent>>;

    /// Release the device. Must be safe to call when nothing is running.
    async fn stop(&self) -> CameraResult<()>;

    /// Get the name of this camera
    fn name(&self) -> &str;
}

/// A camera that lives on the remote client.
///
/// The TD's browser owns the physical device and decodes frames itself; it
/// forwards decoded text and failures over the socket, which land here via
/// [`RemoteCamera::feed`] and [`RemoteCamera::mark_unavailable`].
#[derive(Debug, Default)]
pub struct RemoteCamera {
    inner: Mutex<RemoteCameraInner>,
}

#[derive(Debug, Default)]
struct RemoteCameraInner {
    sender: Option<mpsc::Sender<DecodeEvent>>,
    unavailable: Option<String>,
}

impl RemoteCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward an event reported by the client. Returns false if no scan is running.
    pub fn feed(&self, event: DecodeEvent) -> bool {
        let inner = self.lock();
        match &inner.sender {
            Some(sender) => match sender.try_send(event) {
                Ok(()) => true,
                Err(e) => {
                    tracing::debug!("Dropping camera event: {}", e);
                    false
                }
            },
            None => false,
        }
    }

    /// The client couldn't acquire its camera. Ends any running scan and
    /// makes future starts fail until [`RemoteCamera::mark_available`].
    pub fn mark_unavailable(&self, reason: String) {
        let mut inner = self.lock();
        inner.sender = None;
        inner.unavailable = Some(reason);
    }

    pub fn mark_available(&self) {
        self.lock().unavailable = None;
    }

    pub fn is_running(&self) -> bool {
        self.lock().sender.is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RemoteCameraInner> {
        // A poisoned lock only means another holder panicked; the state is still usable
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Camera for RemoteCamera {
    async fn start(&self, config: &ScanConfig) -> CameraResult<mpsc::Receiver<DecodeEvent>> {
        let mut inner = self.lock();
        if let Some(reason) = &inner.unavailable {
            return Err(CameraError::Unavailable(reason.clone()));
        }

        let (tx, rx) = mpsc::channel(DECODE_CHANNEL_CAPACITY);
        inner.sender = Some(tx);
        tracing::debug!("Remote camera started with {:?}", config);
        Ok(rx)
    }

    async fn stop(&self) -> CameraResult<()> {
        self.lock().sender = None;
        Ok(())
    }

    fn name(&self) -> &str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_region() {
        assert_eq!(
            "300x200".parse::<ScanRegion>().unwrap(),
            ScanRegion {
                width: 300,
                height: 200
            }
        );
        assert!("300".parse::<ScanRegion>().is_err());
        assert!("0x10".parse::<ScanRegion>().is_err());
    }

    #[test]
    fn test_parse_facing_mode() {
        assert_eq!("front".parse::<FacingMode>().unwrap(), FacingMode::Front);
        assert_eq!(
            " Environment ".parse::<FacingMode>().unwrap(),
            FacingMode::Environment
        );
        assert!("sideways".parse::<FacingMode>().is_err());
    }

    #[tokio::test]
    async fn test_remote_camera_feeds_running_scan() {
        let camera = RemoteCamera::new();
        assert!(!camera.feed(DecodeEvent::Decoded("early".to_string())));

        let mut rx = camera.start(&ScanConfig::default()).await.unwrap();
        assert!(camera.feed(DecodeEvent::Decoded("hello".to_string())));
        assert_eq!(rx.recv().await, Some(DecodeEvent::Decoded("hello".to_string())));

        camera.stop().await.unwrap();
        assert!(!camera.is_running());
        assert_eq!(rx.recv().await, None);

        // Stopping again is fine
        assert!(camera.stop().await.is_ok());
    }

    #[tokio::test]
    async fn test_unavailable_camera_refuses_start() {
        let camera = RemoteCamera::new();
        camera.mark_unavailable("Permission denied".to_string());
        assert_eq!(
            camera.start(&ScanConfig::default()).await.unwrap_err(),
            CameraError::Unavailable("Permission denied".to_string())
        );

        camera.mark_available();
        assert!(camera.start(&ScanConfig::default()).await.is_ok());
    }
}
