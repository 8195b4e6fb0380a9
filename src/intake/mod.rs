//! Upload-side collaborator: accepts candidate files, filters non-images,
//! and tracks per-file decoding that resolves incrementally and in any
//! order. Pixel bytes live here, owned once and looked up by id; layout
//! rectangles never carry copies.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

pub type IntakeResult<T> = std::result::Result<T, IntakeError>;

#[derive(Debug, Error)]
pub enum IntakeError {
    /// Soft error: the image exists but its decode has not resolved yet.
    #[error("image {id} has not finished decoding")]
    PendingResource { id: u64 },

    #[error("unknown image id {id}")]
    UnknownImage { id: u64 },

    #[error("decoded dimensions for image {id} are invalid: {width}x{height}")]
    InvalidDimensions { id: u64, width: f64, height: f64 },

    #[error("decode failed for image {id}")]
    DecodeFailed {
        id: u64,
        #[source]
        source: anyhow::Error,
    },
}

/// Capability the engine consumes; the policy of what counts as an image
/// stays with the host.
pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub name: String,
    pub mime: String,
}

/// Drops non-image candidates from a batch, keeping order.
pub fn filter_image_uploads(candidates: Vec<UploadRequest>) -> Vec<UploadRequest> {
    candidates
        .into_iter()
        .filter(|candidate| is_image_mime(&candidate.mime))
        .collect()
}

/// Raw encoded bytes plus their MIME type; opaque to the layout engine.
#[derive(Debug)]
pub struct PixelData {
    pub bytes: Vec<u8>,
    pub mime: String,
}

/// Lookup seam consumed by the export planner.
pub trait PixelSource {
    fn pixels(&self, id: u64) -> Option<Arc<PixelData>>;
}

/// Emitted once a file's decode resolves with known intrinsic dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedImage {
    pub id: u64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Default)]
pub struct ImageIntake {
    next_id: u64,
    pending: HashMap<u64, UploadRequest>,
    pixels: HashMap<u64, Arc<PixelData>>,
}

impl ImageIntake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an upload whose dimensions are not known yet and hands back
    /// its id. The image stays excluded from packing until
    /// [`complete_decode`](Self::complete_decode) lands.
    pub fn begin_upload(&mut self, request: UploadRequest) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        tracing::debug!(id, name = %request.name, "upload registered, decode pending");
        self.pending.insert(id, request);
        id
    }

    /// Resolves a pending decode. Completions may arrive in any order and
    /// after editing has already begun; callers append the result, never
    /// reorder what is already placed.
    pub fn complete_decode(
        &mut self,
        id: u64,
        width: f64,
        height: f64,
        pixels: PixelData,
    ) -> IntakeResult<DecodedImage> {
        let request = self
            .pending
            .remove(&id)
            .ok_or(IntakeError::UnknownImage { id })?;
        if width <= 0.0 || height <= 0.0 {
            tracing::warn!(id, width, height, name = %request.name, "decode produced invalid dimensions");
            return Err(IntakeError::InvalidDimensions { id, width, height });
        }
        self.pixels.insert(id, Arc::new(pixels));
        tracing::debug!(id, width, height, "decode resolved");
        Ok(DecodedImage { id, width, height })
    }

    /// Records a failed decode, releasing the pending slot.
    pub fn fail_decode(&mut self, id: u64, source: anyhow::Error) -> IntakeError {
        self.pending.remove(&id);
        IntakeError::DecodeFailed { id, source }
    }

    pub fn is_pending(&self, id: u64) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Guard for operations that need resolved pixel data.
    pub fn ensure_resolved(&self, id: u64) -> IntakeResult<()> {
        if self.pixels.contains_key(&id) {
            Ok(())
        } else if self.pending.contains_key(&id) {
            Err(IntakeError::PendingResource { id })
        } else {
            Err(IntakeError::UnknownImage { id })
        }
    }

    /// Drops an image entirely, pending or resolved.
    pub fn remove(&mut self, id: u64) {
        self.pending.remove(&id);
        self.pixels.remove(&id);
    }
}

impl PixelSource for ImageIntake {
    fn pixels(&self, id: u64) -> Option<Arc<PixelData>> {
        self.pixels.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, mime: &str) -> UploadRequest {
        UploadRequest {
            name: name.to_string(),
            mime: mime.to_string(),
        }
    }

    fn png_bytes() -> PixelData {
        PixelData {
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
            mime: "image/png".to_string(),
        }
    }

    #[test]
    fn filter_drops_non_image_candidates_keeping_order() {
        let filtered = filter_image_uploads(vec![
            upload("a.png", "image/png"),
            upload("notes.txt", "text/plain"),
            upload("b.jpg", "image/jpeg"),
        ]);
        let names: Vec<_> = filtered.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.jpg"]);
    }

    #[test]
    fn decodes_resolve_out_of_order() {
        let mut intake = ImageIntake::new();
        let first = intake.begin_upload(upload("a.png", "image/png"));
        let second = intake.begin_upload(upload("b.png", "image/png"));

        let decoded = intake
            .complete_decode(second, 300.0, 200.0, png_bytes())
            .expect("second decode should resolve");
        assert_eq!(decoded.id, second);
        assert!(intake.is_pending(first));
        assert!(!intake.is_pending(second));

        let decoded = intake
            .complete_decode(first, 100.0, 100.0, png_bytes())
            .expect("first decode should resolve");
        assert_eq!(decoded.id, first);
        assert_eq!(intake.pending_count(), 0);
    }

    #[test]
    fn pending_image_is_a_soft_error_until_resolved() {
        let mut intake = ImageIntake::new();
        let id = intake.begin_upload(upload("a.png", "image/png"));

        assert!(matches!(
            intake.ensure_resolved(id),
            Err(IntakeError::PendingResource { .. })
        ));

        intake
            .complete_decode(id, 50.0, 50.0, png_bytes())
            .expect("decode should resolve");
        assert!(intake.ensure_resolved(id).is_ok());
        assert!(intake.pixels(id).is_some());
    }

    #[test]
    fn invalid_dimensions_are_rejected_and_slot_released() {
        let mut intake = ImageIntake::new();
        let id = intake.begin_upload(upload("a.png", "image/png"));

        let err = intake
            .complete_decode(id, 0.0, 120.0, png_bytes())
            .expect_err("zero width should be rejected");
        assert!(matches!(err, IntakeError::InvalidDimensions { .. }));
        assert!(!intake.is_pending(id));
        assert!(matches!(
            intake.ensure_resolved(id),
            Err(IntakeError::UnknownImage { .. })
        ));
    }

    #[test]
    fn failed_decode_releases_the_pending_slot() {
        let mut intake = ImageIntake::new();
        let id = intake.begin_upload(upload("corrupt.png", "image/png"));

        let err = intake.fail_decode(id, anyhow::anyhow!("truncated stream"));
        assert!(matches!(err, IntakeError::DecodeFailed { id: failed, .. } if failed == id));
        assert!(!intake.is_pending(id));
        assert!(matches!(
            intake.ensure_resolved(id),
            Err(IntakeError::UnknownImage { .. })
        ));
    }

    #[test]
    fn remove_drops_pixels_and_pending_state() {
        let mut intake = ImageIntake::new();
        let id = intake.begin_upload(upload("a.png", "image/png"));
        intake
            .complete_decode(id, 10.0, 10.0, png_bytes())
            .expect("decode should resolve");

        intake.remove(id);
        assert!(intake.pixels(id).is_none());
        assert!(matches!(
            intake.ensure_resolved(id),
            Err(IntakeError::UnknownImage { .. })
        ));
    }
}
