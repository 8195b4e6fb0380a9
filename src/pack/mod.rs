//! Pagination: repeatedly hand the remaining images to a bin packer, one
//! page per pass, until everything is placed or the packer stalls.

mod shelf;

pub use shelf::ShelfPacker;

use thiserror::Error;

use crate::config::{ConfigError, LayoutConfig};

/// One rectangle as offered to the packer: identity plus intrinsic size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackItem {
    pub id: u64,
    pub w: f64,
    pub h: f64,
}

/// One rectangle as placed by the packer. `w`/`h` are the packed footprint;
/// when `rotated` is set they are the intrinsic size swapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackedRect {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub rotated: bool,
}

/// Result of a single packer invocation. The contract requires
/// `packed + unpacked + rejected` to partition the input exactly: no
/// rectangle duplicated, none lost.
#[derive(Debug, Default)]
pub struct PackOutcome {
    pub packed: Vec<PackedRect>,
    pub unpacked: Vec<PackItem>,
    /// Items that cannot fit the container even alone.
    pub rejected: Vec<u64>,
}

/// The opaque bin-packing primitive. [`ShelfPacker`] is the built-in
/// implementation; hosts may substitute their own.
pub trait BoxPacker {
    fn pack(&self, items: &[PackItem], config: &LayoutConfig) -> PackOutcome;
}

/// An ordered set of rectangles that fit one container together.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub rects: Vec<PackedRect>,
}

impl Page {
    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.rects.iter().map(|rect| rect.id)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PackFailure {
    #[error("images {ids:?} exceed the container bounds even alone")]
    Unplaceable { ids: Vec<u64> },

    #[error("packer made no progress with {remaining} images unplaced")]
    NoProgress { remaining: usize },
}

/// Outcome of a full pagination run. Pages produced before a failure are
/// kept; the failure rides alongside rather than replacing them.
#[derive(Debug, Default)]
pub struct PackReport {
    pub pages: Vec<Page>,
    pub failure: Option<PackFailure>,
}

impl PackReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    pub fn placed_count(&self) -> usize {
        self.pages.iter().map(|page| page.rects.len()).sum()
    }
}

/// Packs `items` across as many pages as needed.
///
/// Each pass must place at least one rectangle; a pass that leaves the
/// working set unshrunk aborts with [`PackFailure::NoProgress`], and the
/// pass count is additionally capped at the input size as a safety valve
/// against a misbehaving packer. Rejected items abort immediately with
/// [`PackFailure::Unplaceable`], keeping the pages packed so far.
pub fn paginate(
    items: &[PackItem],
    config: &LayoutConfig,
    packer: &dyn BoxPacker,
) -> Result<PackReport, ConfigError> {
    config.validate()?;

    let mut report = PackReport::default();
    let mut working: Vec<PackItem> = items.to_vec();
    let max_passes = items.len();
    let mut passes = 0usize;

    while !working.is_empty() {
        if passes >= max_passes {
            tracing::warn!(remaining = working.len(), passes, "pagination pass cap reached");
            report.failure = Some(PackFailure::NoProgress {
                remaining: working.len(),
            });
            break;
        }
        passes += 1;

        let outcome = packer.pack(&working, config);
        if !outcome.rejected.is_empty() {
            tracing::warn!(rejected = ?outcome.rejected, "packer rejected oversize images");
            report.failure = Some(PackFailure::Unplaceable {
                ids: outcome.rejected,
            });
            break;
        }
        if outcome.packed.is_empty() || outcome.unpacked.len() >= working.len() {
            tracing::warn!(remaining = working.len(), "packer made no progress");
            report.failure = Some(PackFailure::NoProgress {
                remaining: working.len(),
            });
            break;
        }

        tracing::debug!(
            page = report.pages.len(),
            placed = outcome.packed.len(),
            remaining = outcome.unpacked.len(),
            "pagination pass complete"
        );
        report.pages.push(Page {
            rects: outcome.packed,
        });
        working = outcome.unpacked;
    }

    tracing::info!(
        pages = report.pages.len(),
        placed = report.placed_count(),
        complete = report.is_complete(),
        "pagination finished"
    );
    Ok(report)
}
