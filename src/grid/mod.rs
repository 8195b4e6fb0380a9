//! Grid mode: owns the paginated pages and rebuilds them from scratch
//! whenever the image set or container settings change. No incremental
//! patching; repacking is cheap next to interaction frequency.

use crate::board::ImageBoard;
use crate::config::{ConfigError, LayoutConfig};
use crate::pack::{paginate, BoxPacker, PackItem, PackReport};

/// Handle for one rebuild. Tickets are ordered; committing a stale ticket
/// is a no-op so rapid successive rebuilds resolve last-writer-wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildTicket {
    generation: u64,
}

#[derive(Debug, Default)]
pub struct GridLayout {
    pages: Vec<Vec<u64>>,
    generation: u64,
}

impl GridLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Ordered image ids on one page.
    pub fn page_ids(&self, index: usize) -> Option<&[u64]> {
        self.pages.get(index).map(Vec::as_slice)
    }

    pub fn pages(&self) -> &[Vec<u64>] {
        &self.pages
    }

    pub fn begin_rebuild(&mut self) -> RebuildTicket {
        self.generation += 1;
        RebuildTicket {
            generation: self.generation,
        }
    }

    /// Runs pagination over every image on the board. Pure with respect to
    /// this layout; nothing is committed yet.
    pub fn compute(
        &self,
        board: &ImageBoard,
        config: &LayoutConfig,
        packer: &dyn BoxPacker,
    ) -> Result<PackReport, ConfigError> {
        let items: Vec<PackItem> = board
            .iter()
            .map(|image| PackItem {
                id: image.id,
                w: image.w,
                h: image.h,
            })
            .collect();
        paginate(&items, config, packer)
    }

    /// Writes packer-assigned geometry back to the board and replaces the
    /// page list, unless a newer rebuild has been issued since `ticket`.
    /// Returns whether the commit happened.
    pub fn commit(
        &mut self,
        ticket: RebuildTicket,
        report: &PackReport,
        board: &mut ImageBoard,
    ) -> bool {
        if ticket.generation < self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                latest = self.generation,
                "dropping stale rebuild commit"
            );
            return false;
        }

        // Membership from any previous pack is void, including for images
        // the new report failed to place; board and grid must agree.
        board.clear_page_assignments();
        self.pages.clear();
        for (index, page) in report.pages.iter().enumerate() {
            let mut ids = Vec::with_capacity(page.rects.len());
            for rect in &page.rects {
                if let Ok(image) = board.get_mut(rect.id) {
                    image.x = rect.x;
                    image.y = rect.y;
                    image.rotated = rect.rotated;
                    image.page = Some(index);
                }
                ids.push(rect.id);
            }
            self.pages.push(ids);
        }
        board.settle_fresh();
        tracing::info!(pages = self.pages.len(), "grid layout committed");
        true
    }

    /// Synchronous rebuild: ticket, compute, commit.
    pub fn rebuild(
        &mut self,
        board: &mut ImageBoard,
        config: &LayoutConfig,
        packer: &dyn BoxPacker,
    ) -> Result<PackReport, ConfigError> {
        let ticket = self.begin_rebuild();
        let report = self.compute(board, config, packer)?;
        self.commit(ticket, &report, board);
        Ok(report)
    }
}
