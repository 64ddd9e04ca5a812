//! Layout application: binding a page's media assets to template slots.
//!
//! Policy, in order of precedence:
//! - the `"freeform"` template clears every binding and freezes slotted
//!   assets to their last slot geometry so nothing visually jumps;
//! - media fill slots in existing order up to the template capacity;
//! - overflow media are demoted to freeform, never dropped;
//! - non-media assets are always freeform, whatever the template says.

use crate::asset::UnifiedAsset;
use crate::geometry::{Position, Size};
use crate::page::{LayoutSlot, Page};

/// Reserved template id that dissolves the layout instead of applying one.
pub const FREEFORM_TEMPLATE_ID: &str = "freeform";

/// Slot-relative coverage stored on a freshly bound asset: it spans the
/// whole slot until the user pans or zooms within it.
const SLOT_FULL_COVERAGE: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
    Square,
}

/// A named, ordered list of slots. `image_count` is the slot capacity used
/// both for catalog filtering and for the overflow cut-off when applying.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutTemplate {
    pub id: String,
    pub name: String,
    pub orientation: Orientation,
    pub image_count: u32,
    #[serde(default)]
    pub slots: Vec<LayoutSlot>,
}

impl LayoutTemplate {
    pub fn freeform() -> Self {
        Self {
            id: FREEFORM_TEMPLATE_ID.to_string(),
            name: "Freeform".to_string(),
            orientation: Orientation::Square,
            image_count: 0,
            slots: Vec::new(),
        }
    }

    pub fn is_freeform(&self) -> bool {
        self.id == FREEFORM_TEMPLATE_ID
    }

    /// Catalog filter predicate: same orientation class and enough slots.
    pub fn fits(&self, orientation: Orientation, image_count: u32) -> bool {
        self.orientation == orientation && self.image_count >= image_count
    }
}

/// Clear an asset's binding, freezing its page coordinates to the slot it
/// occupied so the demotion is visually a no-op. Assets that were already
/// freeform keep their coordinates.
fn demote_to_freeform(asset: &mut UnifiedAsset, old_slots: &[LayoutSlot]) {
    if let Some(i) = asset.slot.take()
        && let Some(slot) = old_slots.get(i as usize)
    {
        asset.position = slot.position;
        asset.size = slot.size;
    }
}

fn bind_to_slot(asset: &mut UnifiedAsset, index: u32) {
    asset.slot = Some(index);
    asset.position = Position::new(SLOT_FULL_COVERAGE, SLOT_FULL_COVERAGE);
    asset.size = Size::new(SLOT_FULL_COVERAGE, SLOT_FULL_COVERAGE);
}

/// Apply `template` to `page` in place.
pub fn apply_layout(page: &mut Page, template: &LayoutTemplate) {
    let old_slots = std::mem::take(&mut page.layout_slots);

    if template.is_freeform() {
        for asset in &mut page.assets {
            demote_to_freeform(asset, &old_slots);
        }
        page.layout_template = Some(FREEFORM_TEMPLATE_ID.to_string());
        return;
    }

    let capacity = template.image_count;
    let mut next_slot: u32 = 0;
    for asset in &mut page.assets {
        if asset.kind.is_media() && next_slot < capacity {
            bind_to_slot(asset, next_slot);
            next_slot += 1;
        } else {
            demote_to_freeform(asset, &old_slots);
        }
    }

    page.layout_template = Some(template.id.clone());
    page.layout_slots = template.slots.clone();
}

/// Spread application: a landscape template authored across two pages. The
/// two pages' media merge (left order first), the left page receives the
/// layout plus every slotted and overflow asset, and the right page becomes
/// an empty freeform page.
pub fn apply_layout_spread(left: &mut Page, right: &mut Page, template: &LayoutTemplate) {
    let right_slots = std::mem::take(&mut right.layout_slots);
    // Right half of a spread starts blank; only its media carries over.
    for mut asset in right.assets.drain(..) {
        if asset.kind.is_media() {
            demote_to_freeform(&mut asset, &right_slots);
            left.assets.push(asset);
        }
    }

    apply_layout(left, template);

    right.layout_template = None;
}
