//! Image sample sources and overlay sinks
//!
//! The assembler never touches the filesystem directly: it pulls pixels from
//! an [`ImageSource`] and pushes overlays into an [`OverlaySink`]. The
//! directory-backed implementations live in [`crate::io`].

use crate::bands::RgbBands;
use crate::error::Result;
use chrono::NaiveDateTime;

/// Capture time of a sample. Ordering is by this key, ties by identifier.
pub type CaptureKey = NaiveDateTime;

/// One photo that can be decoded on demand.
pub trait ImageSource: Send + Sync {
    /// Identifier, normally the file name
    fn id(&self) -> &str;

    /// Decode the pixels. Failures are reported as [`crate::Error::Decode`].
    fn load(&self) -> Result<RgbBands>;

    /// Last-modified time, when the source has one
    fn modified(&self) -> Option<CaptureKey> {
        None
    }
}

/// Destination for colour-tinted overlay images, keyed by sample identifier.
pub trait OverlaySink: Send + Sync {
    fn write_overlay(&self, id: &str, image: &RgbBands) -> Result<()>;
}

/// A sink that drops every overlay.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardOverlays;

impl OverlaySink for DiscardOverlays {
    fn write_overlay(&self, _id: &str, _image: &RgbBands) -> Result<()> {
        Ok(())
    }
}

/// An in-memory sample, handy for tests and callers that decode themselves.
#[derive(Debug, Clone)]
pub struct MemorySample {
    pub id: String,
    pub image: RgbBands,
}

impl MemorySample {
    pub fn new(id: impl Into<String>, image: RgbBands) -> Self {
        Self {
            id: id.into(),
            image,
        }
    }
}

impl ImageSource for MemorySample {
    fn id(&self) -> &str {
        &self.id
    }

    fn load(&self) -> Result<RgbBands> {
        Ok(self.image.clone())
    }
}
