//! The album aggregate: page collection plus the operations the editing
//! surface calls. Every mutating operation keeps two invariants as its final
//! step: `total_pages == pages.len()` and `pages[i].page_number == i + 1`.
//!
//! Failure policy is silent containment: an unknown id, removing the last
//! page, or reordering a cover returns `false` and leaves the album
//! untouched. Nothing here panics or errors.

use crate::asset::{AssetDraft, AssetPatch, ExtraBag, UnifiedAsset, fresh_id};
use crate::geometry::Position;
use crate::layout::{self, LayoutTemplate, Orientation};
use crate::page::{Page, PagePatch};
use crate::zorder::{self, RestackDirection};

/// Version stamp of the persisted `Album` JSON shape.
pub const SCHEMA_VERSION: u32 = 2;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AlbumConfig {
    pub page_width: f64,
    pub page_height: f64,
    pub orientation: Orientation,
    #[serde(default)]
    pub spread_view: bool,
    #[serde(default, skip_serializing_if = "ExtraBag::is_empty")]
    pub extra: ExtraBag,
}

impl Default for AlbumConfig {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            orientation: Orientation::Portrait,
            spread_view: false,
            extra: ExtraBag::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Album {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub id: String,
    pub title: String,
    pub family_id: String,
    #[serde(default)]
    pub config: AlbumConfig,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub total_pages: u32,
    /// Uploaded but not yet placed on any page.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unplaced: Vec<UnifiedAsset>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl Album {
    /// One empty freeform page, numbered 1.
    pub fn new_empty(
        id: impl Into<String>,
        title: impl Into<String>,
        family_id: impl Into<String>,
    ) -> Self {
        let mut album = Self {
            schema_version: SCHEMA_VERSION,
            id: id.into(),
            title: title.into(),
            family_id: family_id.into(),
            config: AlbumConfig::default(),
            pages: vec![Page::new_freeform(1)],
            total_pages: 0,
            unplaced: Vec::new(),
            is_published: false,
            created_at: None,
            updated_at: None,
        };
        album.renumber();
        album
    }

    /// Restore the page-number and page-count invariants. Called as the last
    /// step of every structural operation.
    pub fn renumber(&mut self) {
        for (i, page) in self.pages.iter_mut().enumerate() {
            page.page_number = (i + 1) as u32;
        }
        self.total_pages = self.pages.len() as u32;
    }

    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == page_id)
    }

    pub fn page_mut(&mut self, page_id: &str) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == page_id)
    }

    pub fn page_index(&self, page_id: &str) -> Option<usize> {
        self.pages.iter().position(|p| p.id == page_id)
    }

    // ---- page ops ----------------------------------------------------

    /// Insert a new page (a pair in spread view) at `at_index`, or append.
    /// Returns the id of the (left) new page.
    pub fn add_page(
        &mut self,
        template: Option<&LayoutTemplate>,
        at_index: Option<usize>,
    ) -> String {
        let mut page = Page::new_freeform(0);
        if let Some(template) = template {
            layout::apply_layout(&mut page, template);
        }
        let id = page.id.clone();

        let mut at = at_index.unwrap_or(self.pages.len()).min(self.pages.len());
        if self.config.spread_view {
            // Spreads sit at odd 0-based positions after the leading cover;
            // inserting mid-pair would shift the parity every later
            // operation derives pairs from.
            at = if at == 0 {
                1.min(self.pages.len())
            } else {
                at - ((at - 1) % 2)
            };
        }
        self.pages.insert(at, page);
        if self.config.spread_view {
            let mut partner = Page::new_freeform(0);
            if let Some(template) = template {
                layout::apply_layout(&mut partner, template);
            }
            self.pages.insert(at + 1, partner);
        }
        self.renumber();
        id
    }

    /// Refused for the last remaining page.
    pub fn remove_page(&mut self, page_id: &str) -> bool {
        if self.pages.len() <= 1 {
            tracing::debug!(page_id, "remove_page: refusing to remove the last page");
            return false;
        }
        let Some(idx) = self.page_index(page_id) else {
            tracing::debug!(page_id, "remove_page: unknown page, ignoring");
            return false;
        };
        self.pages.remove(idx);
        self.renumber();
        true
    }

    /// Deep copy with fresh page and asset ids, inserted after the source.
    pub fn duplicate_page(&mut self, page_id: &str) -> Option<String> {
        let idx = self.page_index(page_id)?;
        let mut copy = self.pages[idx].clone();
        copy.id = fresh_id();
        for asset in &mut copy.assets {
            asset.id = fresh_id();
        }
        let id = copy.id.clone();
        self.pages.insert(idx + 1, copy);
        self.renumber();
        Some(id)
    }

    /// Move a page (a spread pair in spread view) so it ends up at `to`.
    ///
    /// Spread view treats the first and last pages as covers and refuses to
    /// move them; a spread is the two pages starting at an odd 1-based
    /// position after the leading cover, moved atomically.
    pub fn reorder_pages(&mut self, from: usize, to: usize) -> bool {
        let n = self.pages.len();
        if from >= n || to >= n {
            tracing::debug!(from, to, "reorder_pages: index out of range, ignoring");
            return false;
        }
        if !self.config.spread_view {
            if from == to {
                return false;
            }
            let page = self.pages.remove(from);
            self.pages.insert(to.min(self.pages.len()), page);
            self.renumber();
            return true;
        }

        let last = n - 1;
        if from == 0 || from == last || to == 0 || to == last {
            tracing::debug!(from, to, "reorder_pages: cover pages cannot be moved");
            return false;
        }
        // Snap to the start of the containing spread (0-based odd index).
        let from_start = from - ((from - 1) % 2);
        let to_start = to - ((to - 1) % 2);
        if from_start + 1 >= last || to_start + 1 >= last {
            tracing::debug!(from, to, "reorder_pages: incomplete spread, ignoring");
            return false;
        }
        if from_start == to_start {
            return false;
        }
        let pair: Vec<Page> = self.pages.drain(from_start..from_start + 2).collect();
        let insert_at = to_start.min(self.pages.len() - 1);
        for (offset, page) in pair.into_iter().enumerate() {
            self.pages.insert(insert_at + offset, page);
        }
        self.renumber();
        true
    }

    pub fn update_page(&mut self, page_id: &str, patch: &PagePatch) -> bool {
        let Some(page) = self.page_mut(page_id) else {
            tracing::debug!(page_id, "update_page: unknown page, ignoring");
            return false;
        };
        page.apply_patch(patch);
        true
    }

    /// Strip a page of its media, returning it to the album's unplaced pool
    /// (clearing media is not destruction). Slot placeholders stay.
    pub fn clear_media(&mut self, page_id: &str) -> bool {
        let Some(idx) = self.page_index(page_id) else {
            tracing::debug!(page_id, "clear_media: unknown page, ignoring");
            return false;
        };
        let page = &mut self.pages[idx];
        let before = page.assets.len();
        let mut cleared = Vec::new();
        page.assets.retain_mut(|asset| {
            if asset.kind.is_media() {
                asset.slot = None;
                cleared.push(asset.clone());
                false
            } else {
                true
            }
        });
        let changed = page.assets.len() != before;
        self.unplaced.extend(cleared);
        changed
    }

    // ---- asset ops ---------------------------------------------------

    /// Returns the created asset's id, or None for an unknown page.
    pub fn add_asset(&mut self, page_id: &str, draft: AssetDraft) -> Option<String> {
        let page = self.page_mut(page_id)?;
        let asset = UnifiedAsset::create(draft);
        let id = asset.id.clone();
        page.assets.push(asset);
        Some(id)
    }

    pub fn update_asset(&mut self, page_id: &str, asset_id: &str, patch: &AssetPatch) -> bool {
        let Some(asset) = self
            .page_mut(page_id)
            .and_then(|p| p.asset_mut(asset_id))
        else {
            tracing::debug!(page_id, asset_id, "update_asset: not found, ignoring");
            return false;
        };
        asset.apply_patch(patch);
        true
    }

    pub fn remove_asset(&mut self, page_id: &str, asset_id: &str) -> bool {
        let Some(page) = self.page_mut(page_id) else {
            tracing::debug!(page_id, "remove_asset: unknown page, ignoring");
            return false;
        };
        let before = page.assets.len();
        page.assets.retain(|a| a.id != asset_id);
        page.assets.len() != before
    }

    /// Copy of an existing asset: fresh id, freeform, nudged off its source
    /// and one z above it.
    pub fn duplicate_asset(&mut self, page_id: &str, asset_id: &str) -> Option<String> {
        let page = self.page_mut(page_id)?;
        let source = page.asset(asset_id)?.clone();
        let mut copy = source;
        copy.id = fresh_id();
        copy.slot = None;
        copy.position = Position::new(copy.position.x + 2.0, copy.position.y + 2.0);
        copy.z_index += 1;
        let id = copy.id.clone();
        page.assets.push(copy);
        Some(id)
    }

    pub fn restack(&mut self, page_id: &str, asset_id: &str, direction: RestackDirection) -> bool {
        let Some(page) = self.page_mut(page_id) else {
            tracing::debug!(page_id, "restack: unknown page, ignoring");
            return false;
        };
        zorder::restack(page, asset_id, direction)
    }

    /// Move an asset to another page as freeform at the given coordinates.
    pub fn move_asset_between_pages(
        &mut self,
        asset_id: &str,
        from_page_id: &str,
        to_page_id: &str,
        new_x: f64,
        new_y: f64,
    ) -> bool {
        if self.page_index(to_page_id).is_none() {
            tracing::debug!(to_page_id, "move_asset: unknown target page, ignoring");
            return false;
        }
        let Some(from) = self.page_mut(from_page_id) else {
            tracing::debug!(from_page_id, "move_asset: unknown source page, ignoring");
            return false;
        };
        let Some(idx) = from.assets.iter().position(|a| a.id == asset_id) else {
            tracing::debug!(asset_id, "move_asset: asset not on source page, ignoring");
            return false;
        };
        let mut asset = from.assets.remove(idx);
        asset.slot = None;
        asset.position = Position::new(new_x, new_y);
        self.page_mut(to_page_id)
            .map(|p| p.assets.push(asset))
            .is_some()
    }

    /// Take an asset from the unplaced pool onto a page.
    pub fn place_unplaced(&mut self, asset_id: &str, page_id: &str, x: f64, y: f64) -> bool {
        if self.page_index(page_id).is_none() {
            tracing::debug!(page_id, "place_unplaced: unknown page, ignoring");
            return false;
        }
        let Some(idx) = self.unplaced.iter().position(|a| a.id == asset_id) else {
            tracing::debug!(asset_id, "place_unplaced: not in pool, ignoring");
            return false;
        };
        let mut asset = self.unplaced.remove(idx);
        asset.slot = None;
        asset.position = Position::new(x, y);
        self.page_mut(page_id)
            .map(|p| p.assets.push(asset))
            .is_some()
    }

    // ---- layout ------------------------------------------------------

    /// Apply a template to a page; in spread view a landscape template is
    /// authored across the containing spread (left page owns the result).
    pub fn apply_layout(&mut self, page_id: &str, template: &LayoutTemplate) -> bool {
        let Some(idx) = self.page_index(page_id) else {
            tracing::debug!(page_id, "apply_layout: unknown page, ignoring");
            return false;
        };

        let spread = self.config.spread_view
            && template.orientation == Orientation::Landscape
            && !template.is_freeform();
        if spread {
            let last = self.pages.len() - 1;
            // Covers are not part of any spread; an incomplete pair falls
            // back to a single-page application.
            if idx != 0 && idx != last {
                let start = idx - ((idx - 1) % 2);
                if start + 1 < last {
                    let (a, b) = self.pages.split_at_mut(start + 1);
                    layout::apply_layout_spread(&mut a[start], &mut b[0], template);
                    return true;
                }
            }
        }

        layout::apply_layout(&mut self.pages[idx], template);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetKind;

    fn album_with_pages(n: usize) -> Album {
        let mut album = Album::new_empty("alb", "Test", "fam");
        for _ in 1..n {
            album.add_page(None, None);
        }
        album
    }

    fn assert_numbering(album: &Album) {
        assert_eq!(album.total_pages as usize, album.pages.len());
        for (i, p) in album.pages.iter().enumerate() {
            assert_eq!(p.page_number as usize, i + 1);
        }
    }

    #[test]
    fn new_album_has_one_numbered_page() {
        let album = Album::new_empty("alb", "Test", "fam");
        assert_eq!(album.pages.len(), 1);
        assert_eq!(album.pages[0].page_number, 1);
        assert_eq!(album.total_pages, 1);
        assert!(album.pages[0].layout_template.is_none());
    }

    #[test]
    fn structural_ops_keep_numbering() {
        let mut album = album_with_pages(4);
        assert_numbering(&album);

        album.add_page(None, Some(1));
        assert_numbering(&album);

        let id = album.pages[2].id.clone();
        assert!(album.remove_page(&id));
        assert_numbering(&album);

        album.duplicate_page(&album.pages[0].id.clone()).unwrap();
        assert_numbering(&album);

        assert!(album.reorder_pages(0, 3));
        assert_numbering(&album);
    }

    #[test]
    fn last_page_cannot_be_removed() {
        let mut album = Album::new_empty("alb", "Test", "fam");
        let id = album.pages[0].id.clone();
        assert!(!album.remove_page(&id));
        assert_eq!(album.pages.len(), 1);
    }

    #[test]
    fn spread_add_inserts_pair() {
        let mut album = album_with_pages(2);
        album.config.spread_view = true;
        album.add_page(None, None);
        assert_eq!(album.pages.len(), 4);
        assert_numbering(&album);
    }

    #[test]
    fn spread_add_at_mid_pair_index_snaps_to_boundary() {
        // cover, (p1,p2), back
        let mut album = album_with_pages(4);
        album.config.spread_view = true;
        let (p1, p2) = (album.pages[1].id.clone(), album.pages[2].id.clone());

        // index 2 points into the middle of the (p1,p2) pair
        let new_left = album.add_page(None, Some(2));
        assert_eq!(album.pages.len(), 6);
        assert_numbering(&album);
        // the new pair landed on the boundary in front of (p1,p2)
        assert_eq!(album.pages[1].id, new_left);
        assert_eq!(album.pages[3].id, p1);
        assert_eq!(album.pages[4].id, p2);

        // and pair-wise reorder still moves (p1,p2) as one unit
        assert!(album.reorder_pages(3, 1));
        assert_eq!(album.pages[1].id, p1);
        assert_eq!(album.pages[2].id, p2);
        assert_eq!(album.pages[3].id, new_left);
    }

    #[test]
    fn spread_reorder_moves_pairs_and_protects_covers() {
        // cover, (1,2), (3,4), back
        let mut album = album_with_pages(6);
        album.config.spread_view = true;
        let spread_a = (album.pages[1].id.clone(), album.pages[2].id.clone());
        let spread_b = (album.pages[3].id.clone(), album.pages[4].id.clone());

        assert!(!album.reorder_pages(0, 3)); // front cover
        assert!(!album.reorder_pages(3, 5)); // back cover target

        assert!(album.reorder_pages(1, 3));
        assert_numbering(&album);
        assert_eq!(album.pages[1].id, spread_b.0);
        assert_eq!(album.pages[2].id, spread_b.1);
        assert_eq!(album.pages[3].id, spread_a.0);
        assert_eq!(album.pages[4].id, spread_a.1);
    }

    #[test]
    fn duplicate_page_gets_fresh_ids() {
        let mut album = Album::new_empty("alb", "Test", "fam");
        let page_id = album.pages[0].id.clone();
        let asset_id = album
            .add_asset(&page_id, AssetDraft::of(AssetKind::Image))
            .unwrap();

        let copy_id = album.duplicate_page(&page_id).unwrap();
        assert_ne!(copy_id, page_id);
        let copy = album.page(&copy_id).unwrap();
        assert_eq!(copy.assets.len(), 1);
        assert_ne!(copy.assets[0].id, asset_id);
    }

    #[test]
    fn clear_media_moves_assets_to_unplaced() {
        let mut album = Album::new_empty("alb", "Test", "fam");
        let page_id = album.pages[0].id.clone();
        album.add_asset(&page_id, AssetDraft::of(AssetKind::Image));
        album.add_asset(&page_id, AssetDraft::of(AssetKind::Text));

        assert!(album.clear_media(&page_id));
        let page = album.page(&page_id).unwrap();
        assert_eq!(page.assets.len(), 1);
        assert_eq!(page.assets[0].kind, AssetKind::Text);
        assert_eq!(album.unplaced.len(), 1);

        // and back again
        let pooled = album.unplaced[0].id.clone();
        assert!(album.place_unplaced(&pooled, &page_id, 10.0, 20.0));
        assert!(album.unplaced.is_empty());
        assert_eq!(album.page(&page_id).unwrap().assets.len(), 2);
    }

    #[test]
    fn move_asset_between_pages_repositions_freeform() {
        let mut album = album_with_pages(2);
        let from = album.pages[0].id.clone();
        let to = album.pages[1].id.clone();
        let asset_id = album
            .add_asset(&from, AssetDraft::of(AssetKind::Image))
            .unwrap();

        assert!(album.move_asset_between_pages(&asset_id, &from, &to, 12.0, 34.0));
        assert!(album.page(&from).unwrap().assets.is_empty());
        let moved = album.page(&to).unwrap().asset(&asset_id).unwrap();
        assert_eq!(moved.position, Position::new(12.0, 34.0));
        assert!(moved.slot.is_none());
    }

    #[test]
    fn not_found_ops_are_silent_noops() {
        let mut album = Album::new_empty("alb", "Test", "fam");
        let snapshot = album.clone();
        assert!(!album.update_asset("nope", "nope", &AssetPatch::default()));
        assert!(!album.remove_asset("nope", "x"));
        assert!(!album.remove_page("nope"));
        assert!(!album.update_page("nope", &PagePatch::default()));
        assert_eq!(album, snapshot);
    }
}
