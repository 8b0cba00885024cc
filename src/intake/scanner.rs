//! Single-shot QR scanning on top of a continuous camera decoder
//!
//! Only one decode session exists per scanner. The first decoded text ends
//! the session and releases the camera.

use crate::camera::{Camera, CameraError, DecodeEvent, ScanConfig};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Result of a start request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStart {
    /// A new session was opened with this config
    Started(ScanConfig),
    /// A session was already running; nothing changed
    AlreadyActive,
}

/// What ended an active scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// First successful decode. The scanner has stopped itself.
    Decoded(String),
    /// The camera closed the session without decoding anything
    Ended,
}

pub struct Scanner<C: Camera + ?Sized> {
    camera: Arc<C>,
    config: ScanConfig,
    session: Option<mpsc::Receiver<DecodeEvent>>,
}

impl<C: Camera + ?Sized> Scanner<C> {
    pub fn new(camera: Arc<C>, config: ScanConfig) -> Self {
        Self {
            camera,
            config,
            session: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Open a decode session unless one is already running
    pub async fn start(&mut self) -> Result<ScanStart, CameraError> {
        if self.session.is_some() {
            tracing::debug!("Scan already active on {} camera", self.camera.name());
            return Ok(ScanStart::AlreadyActive);
        }

        let rx = self.camera.start(&self.config).await?;
        self.session = Some(rx);
        tracing::info!("Scan started on {} camera", self.camera.name());
        Ok(ScanStart::Started(self.config))
    }

    /// Wait for the active session to produce its first decode.
    ///
    /// Never resolves while no session is active, so it can sit in a
    /// `select!` next to other event sources.
    pub async fn next_event(&mut self) -> ScanEvent {
        let Some(rx) = self.session.as_mut() else {
            return std::future::pending().await;
        };

        loop {
            match rx.recv().await {
                Some(DecodeEvent::Decoded(text)) => {
                    self.stop().await;
                    return ScanEvent::Decoded(text);
                }
                Some(DecodeEvent::FrameError(e)) => {
                    tracing::trace!("Frame not decoded: {}", e);
                }
                None => {
                    tracing::info!("Camera closed the scan session");
                    self.session = None;
                    return ScanEvent::Ended;
                }
            }
        }
    }

    /// Stop the session and release the camera. No-op when idle; release
    /// failures are logged and swallowed.
    pub async fn stop(&mut self) {
        if self.session.take().is_none() {
            return;
        }

        match self.camera.stop().await {
            Ok(()) => tracing::info!("Scan stopped"),
            Err(e) => tracing::warn!("Ignoring camera release failure: {}", e),
        }
    }
}
