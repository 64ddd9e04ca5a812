//! The editing facade the UI layer talks to: album operations with history
//! wiring, plus whole-document load/serialize.
//!
//! Every mutating call snapshots the pre-mutation album; the snapshot is
//! kept only when the operation actually applied, so silent refusals never
//! leave hollow undo entries. `update_asset` takes a `skip_history` flag for
//! continuous drags, which batch many intermediate patches and commit one
//! entry at the end.

use crate::album::Album;
use crate::asset::{AssetDraft, AssetPatch};
use crate::error::FolioResult;
use crate::history::History;
use crate::layout::LayoutTemplate;
use crate::page::PagePatch;
use crate::zorder::RestackDirection;

pub struct Editor {
    album: Album,
    history: History,
}

impl Editor {
    pub fn new(album: Album) -> Self {
        Self {
            album,
            history: History::new(),
        }
    }

    /// Decode a persisted snapshot (the `Album` JSON shape, verbatim from
    /// the persistence collaborator).
    pub fn load_from(snapshot: serde_json::Value) -> FolioResult<Self> {
        let mut album: Album = serde_json::from_value(snapshot)?;
        album.renumber();
        Ok(Self::new(album))
    }

    /// The snapshot handed back to the persistence collaborator, written as
    /// one atomic document.
    pub fn serialize_to(&self) -> FolioResult<serde_json::Value> {
        Ok(serde_json::to_value(&self.album)?)
    }

    pub fn album(&self) -> &Album {
        &self.album
    }

    fn record<T>(
        &mut self,
        skip_history: bool,
        op: impl FnOnce(&mut Album) -> T,
        applied: impl FnOnce(&T) -> bool,
    ) -> T {
        let before = self.album.clone();
        let out = op(&mut self.album);
        if applied(&out) && !skip_history {
            self.history.push(before);
        }
        out
    }

    // ---- page ops ----------------------------------------------------

    pub fn add_page(&mut self, template: Option<&LayoutTemplate>, at_index: Option<usize>) -> String {
        self.record(false, |a| a.add_page(template, at_index), |_| true)
    }

    pub fn remove_page(&mut self, page_id: &str) -> bool {
        self.record(false, |a| a.remove_page(page_id), |ok| *ok)
    }

    pub fn duplicate_page(&mut self, page_id: &str) -> Option<String> {
        self.record(false, |a| a.duplicate_page(page_id), Option::is_some)
    }

    pub fn reorder_pages(&mut self, from: usize, to: usize) -> bool {
        self.record(false, |a| a.reorder_pages(from, to), |ok| *ok)
    }

    pub fn update_page(&mut self, page_id: &str, patch: &PagePatch) -> bool {
        self.record(false, |a| a.update_page(page_id, patch), |ok| *ok)
    }

    pub fn clear_media(&mut self, page_id: &str) -> bool {
        self.record(false, |a| a.clear_media(page_id), |ok| *ok)
    }

    // ---- asset ops ---------------------------------------------------

    pub fn add_asset(&mut self, page_id: &str, draft: AssetDraft) -> Option<String> {
        self.record(false, |a| a.add_asset(page_id, draft), Option::is_some)
    }

    pub fn update_asset(
        &mut self,
        page_id: &str,
        asset_id: &str,
        patch: &AssetPatch,
        skip_history: bool,
    ) -> bool {
        self.record(
            skip_history,
            |a| a.update_asset(page_id, asset_id, patch),
            |ok| *ok,
        )
    }

    pub fn remove_asset(&mut self, page_id: &str, asset_id: &str) -> bool {
        self.record(false, |a| a.remove_asset(page_id, asset_id), |ok| *ok)
    }

    pub fn duplicate_asset(&mut self, page_id: &str, asset_id: &str) -> Option<String> {
        self.record(false, |a| a.duplicate_asset(page_id, asset_id), Option::is_some)
    }

    pub fn restack(&mut self, page_id: &str, asset_id: &str, direction: RestackDirection) -> bool {
        self.record(false, |a| a.restack(page_id, asset_id, direction), |ok| *ok)
    }

    pub fn move_asset_between_pages(
        &mut self,
        asset_id: &str,
        from_page_id: &str,
        to_page_id: &str,
        new_x: f64,
        new_y: f64,
    ) -> bool {
        self.record(
            false,
            |a| a.move_asset_between_pages(asset_id, from_page_id, to_page_id, new_x, new_y),
            |ok| *ok,
        )
    }

    pub fn place_unplaced(&mut self, asset_id: &str, page_id: &str, x: f64, y: f64) -> bool {
        self.record(
            false,
            |a| a.place_unplaced(asset_id, page_id, x, y),
            |ok| *ok,
        )
    }

    // ---- layout ------------------------------------------------------

    pub fn apply_layout(&mut self, page_id: &str, template: &LayoutTemplate) -> bool {
        self.record(false, |a| a.apply_layout(page_id, template), |ok| *ok)
    }

    // ---- history -----------------------------------------------------

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.album)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.album)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}
