use super::{BoxPacker, PackItem, PackOutcome, PackedRect};
use crate::config::LayoutConfig;

/// Built-in shelf packer: items are sorted tallest-first and laid out
/// left-to-right in shelves inside the margin inset, with `padding` between
/// neighbours. Deliberately simple; hosts wanting tighter packing swap in
/// their own [`BoxPacker`].
#[derive(Debug, Default)]
pub struct ShelfPacker;

impl ShelfPacker {
    /// Picks the orientation that fits the container alone, preferring the
    /// intrinsic one. `None` means the item is unplaceable outright.
    fn orient(
        item: &PackItem,
        inner_w: f64,
        inner_h: f64,
        allow_rotation: bool,
    ) -> Option<(f64, f64, bool)> {
        if item.w <= inner_w && item.h <= inner_h {
            return Some((item.w, item.h, false));
        }
        if allow_rotation && item.h <= inner_w && item.w <= inner_h {
            return Some((item.h, item.w, true));
        }
        None
    }
}

impl BoxPacker for ShelfPacker {
    fn pack(&self, items: &[PackItem], config: &LayoutConfig) -> PackOutcome {
        let inner_w = config.inner_width();
        let inner_h = config.inner_height();
        let padding = config.padding;
        let origin = config.margin;

        let mut ordered: Vec<&PackItem> = items.iter().collect();
        ordered.sort_by(|a, b| b.h.total_cmp(&a.h));

        let mut outcome = PackOutcome::default();
        let mut x = 0.0f64;
        let mut y = 0.0f64;
        let mut shelf_h = 0.0f64;

        for item in ordered {
            let Some((w, h, rotated)) =
                Self::orient(item, inner_w, inner_h, config.allow_rotation)
            else {
                outcome.rejected.push(item.id);
                continue;
            };

            if x > 0.0 && x + w > inner_w {
                x = 0.0;
                y += shelf_h + padding;
                shelf_h = 0.0;
            }
            if y + h > inner_h {
                outcome.unpacked.push(*item);
                continue;
            }

            outcome.packed.push(PackedRect {
                id: item.id,
                x: origin + x,
                y: origin + y,
                w,
                h,
                rotated,
            });
            x += w + padding;
            shelf_h = shelf_h.max(h);
        }

        outcome
    }
}
