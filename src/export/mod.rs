//! Export boundary: turns finalized layout geometry into a per-page plan
//! in output points and drives an [`ExportSink`] over it. The PDF and
//! print-stream backends live with the host; they only see this interface.

use thiserror::Error;

use crate::board::ImageBoard;
use crate::config::{LayoutConfig, A4_HEIGHT_PT, A4_WIDTH_PT};
use crate::freeform::FreeFormLayout;
use crate::grid::GridLayout;
use crate::intake::{PixelData, PixelSource};

pub type ExportResult<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    /// An image reached export before its decode resolved.
    #[error("pixel data for image {id} has not resolved yet")]
    PendingPixels { id: u64 },

    #[error("export sink failed")]
    Sink(#[from] anyhow::Error),
}

/// One image finalized for output. Geometry is in output points; `w`/`h`
/// are the on-page footprint, already swapped when `rotated` is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub rotated: bool,
    /// Stroke a visible border around the image.
    pub border: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportPage {
    pub width_pt: f64,
    pub height_pt: f64,
    pub placements: Vec<Placement>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExportPlan {
    pub pages: Vec<ExportPage>,
}

/// Consumer side of an export: a PDF writer, a print stream, a test
/// recorder. Driven page by page, first page first.
pub trait ExportSink {
    fn begin_page(&mut self, width_pt: f64, height_pt: f64) -> anyhow::Result<()>;
    fn place_image(&mut self, placement: &Placement, pixels: &PixelData) -> anyhow::Result<()>;
    fn end_page(&mut self) -> anyhow::Result<()>;
}

/// Plans a grid-mode export: one output page per layout page, ordered by
/// page index, geometry scaled from page units to A4 points here and only
/// here.
pub fn plan_grid_export(
    board: &ImageBoard,
    grid: &GridLayout,
    config: &LayoutConfig,
) -> ExportPlan {
    let scale_x = A4_WIDTH_PT / config.width;
    let scale_y = A4_HEIGHT_PT / config.height;

    let mut plan = ExportPlan::default();
    for ids in grid.pages() {
        let mut placements = Vec::with_capacity(ids.len());
        for id in ids {
            let Ok(image) = board.get(*id) else { continue };
            let (w, h) = image.packed_size();
            placements.push(Placement {
                id: *id,
                x: image.x * scale_x,
                y: image.y * scale_y,
                w: w * scale_x,
                h: h * scale_y,
                rotated: image.rotated,
                border: config.show_border,
            });
        }
        plan.pages.push(ExportPage {
            width_pt: A4_WIDTH_PT,
            height_pt: A4_HEIGHT_PT,
            placements,
        });
    }
    tracing::info!(pages = plan.pages.len(), "grid export planned");
    plan
}

/// Plans a free-form export: one synthesized page spanning the canvas down
/// to `max_y`, as a single continuous strip. Scaling is uniform so the
/// strip keeps the page's aspect per unit.
pub fn plan_freeform_export(
    board: &ImageBoard,
    freeform: &FreeFormLayout,
    config: &LayoutConfig,
) -> ExportPlan {
    let scale = A4_WIDTH_PT / config.width;
    let height_units = freeform.max_y().max(config.height);

    let mut placements = Vec::with_capacity(freeform.ids().len());
    for id in freeform.ids() {
        let Ok(image) = board.get(*id) else { continue };
        placements.push(Placement {
            id: *id,
            x: image.x * scale,
            y: image.y * scale,
            w: image.w * scale,
            h: image.h * scale,
            rotated: false,
            border: config.show_border,
        });
    }

    let plan = ExportPlan {
        pages: vec![ExportPage {
            width_pt: A4_WIDTH_PT,
            height_pt: height_units * scale,
            placements,
        }],
    };
    tracing::info!(
        height_pt = plan.pages[0].height_pt,
        images = plan.pages[0].placements.len(),
        "free-form export planned"
    );
    plan
}

/// Drives a sink over a plan. Every placement must have resolved pixels;
/// a pending decode aborts the export before the sink sees a partial page.
pub fn render(
    plan: &ExportPlan,
    pixels: &dyn PixelSource,
    sink: &mut dyn ExportSink,
) -> ExportResult<()> {
    for page in &plan.pages {
        for placement in &page.placements {
            if pixels.pixels(placement.id).is_none() {
                return Err(ExportError::PendingPixels { id: placement.id });
            }
        }
    }

    for page in &plan.pages {
        sink.begin_page(page.width_pt, page.height_pt)?;
        for placement in &page.placements {
            let data = pixels
                .pixels(placement.id)
                .ok_or(ExportError::PendingPixels { id: placement.id })?;
            sink.place_image(placement, &data)?;
        }
        sink.end_page()?;
    }
    Ok(())
}
