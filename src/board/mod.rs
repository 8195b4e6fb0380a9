//! The single arena of image rectangles. Grid pages and the free-form
//! canvas are views holding ordered id lists over this board, so the two
//! modes can never diverge into copies with independent identity.

use std::collections::HashMap;

use thiserror::Error;

use crate::geometry::PageRect;

pub type BoardResult<T> = std::result::Result<T, BoardError>;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("no image with id {id} on the board")]
    ImageNotFound { id: u64 },

    #[error("image {id} is already on the board")]
    DuplicateImage { id: u64 },

    #[error("image {id} has non-positive dimensions {w}x{h}")]
    DegenerateSize { id: u64, w: f64, h: f64 },
}

/// An image placed on a page. Geometry is in page units; in grid mode the
/// position is packer-assigned, in free-form mode it is user-authored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageRect {
    pub id: u64,
    /// Intrinsic width in page units. Always positive.
    pub w: f64,
    /// Intrinsic height in page units. Always positive.
    pub h: f64,
    pub x: f64,
    pub y: f64,
    /// Packer swapped width/height by rotating 90 degrees. Packing-only;
    /// `w`/`h` stay intrinsic.
    pub rotated: bool,
    /// Marks an image the host added after an initial pack, as a hint for
    /// incremental re-packing. Set by the host at insert time; cleared
    /// when a full pack commits.
    pub fresh: bool,
    /// Owning page index in grid mode, `None` in free-form mode.
    pub page: Option<usize>,
}

impl ImageRect {
    pub const fn new(id: u64, w: f64, h: f64) -> Self {
        Self {
            id,
            w,
            h,
            x: 0.0,
            y: 0.0,
            rotated: false,
            fresh: false,
            page: None,
        }
    }

    pub fn rect(&self) -> PageRect {
        PageRect::new(self.x, self.y, self.w, self.h)
    }

    pub fn set_rect(&mut self, rect: PageRect) {
        self.x = rect.x;
        self.y = rect.y;
        self.w = rect.w;
        self.h = rect.h;
    }

    /// Footprint as packed, honoring the rotation flag.
    pub fn packed_size(&self) -> (f64, f64) {
        if self.rotated {
            (self.h, self.w)
        } else {
            (self.w, self.h)
        }
    }
}

#[derive(Debug, Default)]
pub struct ImageBoard {
    order: Vec<u64>,
    images: HashMap<u64, ImageRect>,
}

impl ImageBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an image. Late decode arrivals land here too; insertion
    /// order is never rewritten afterwards.
    pub fn insert(&mut self, image: ImageRect) -> BoardResult<()> {
        if self.images.contains_key(&image.id) {
            return Err(BoardError::DuplicateImage { id: image.id });
        }
        if image.w <= 0.0 || image.h <= 0.0 {
            return Err(BoardError::DegenerateSize {
                id: image.id,
                w: image.w,
                h: image.h,
            });
        }
        self.order.push(image.id);
        self.images.insert(image.id, image);
        Ok(())
    }

    pub fn remove(&mut self, id: u64) -> BoardResult<ImageRect> {
        let image = self
            .images
            .remove(&id)
            .ok_or(BoardError::ImageNotFound { id })?;
        self.order.retain(|entry| *entry != id);
        Ok(image)
    }

    pub fn get(&self, id: u64) -> BoardResult<&ImageRect> {
        self.images.get(&id).ok_or(BoardError::ImageNotFound { id })
    }

    pub fn get_mut(&mut self, id: u64) -> BoardResult<&mut ImageRect> {
        self.images
            .get_mut(&id)
            .ok_or(BoardError::ImageNotFound { id })
    }

    pub fn contains(&self, id: u64) -> bool {
        self.images.contains_key(&id)
    }

    pub fn ids(&self) -> &[u64] {
        &self.order
    }

    /// Images in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ImageRect> + '_ {
        self.order.iter().filter_map(|id| self.images.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Voids grid page membership for every image, ahead of a wholesale
    /// reassignment.
    pub fn clear_page_assignments(&mut self) {
        for image in self.images.values_mut() {
            image.page = None;
        }
    }

    /// Clears the `fresh` flags once a full pack has consumed them.
    pub fn settle_fresh(&mut self) {
        for image in self.images.values_mut() {
            image.fresh = false;
        }
    }
}
