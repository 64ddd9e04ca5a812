//! Restacking: the four z-order moves exposed to the editing surface.

use crate::asset::BACKGROUND_Z;
use crate::page::Page;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestackDirection {
    /// One past the page's current max z.
    Front,
    /// One below the page's current min z (clamped, see below).
    Back,
    /// Swap with the next asset in ascending-z order.
    Forward,
    /// Swap with the previous asset in ascending-z order.
    Backward,
}

/// Negative z is reserved for structural elements; an asset that started at
/// z >= 0 may move down to 0 but never below it.
fn clamp_back(target: i32, original: i32) -> i32 {
    if target < BACKGROUND_Z && original >= BACKGROUND_Z {
        BACKGROUND_Z
    } else {
        target
    }
}

/// Restack `asset_id` on `page`. Returns whether anything changed; an
/// unknown id or a move past either extreme is a no-op.
pub fn restack(page: &mut Page, asset_id: &str, direction: RestackDirection) -> bool {
    let Some(idx) = page.assets.iter().position(|a| a.id == asset_id) else {
        tracing::debug!(asset_id, "restack: asset not on page, ignoring");
        return false;
    };
    let original = page.assets[idx].z_index;

    match direction {
        RestackDirection::Front => {
            let max = page.assets.iter().map(|a| a.z_index).max().unwrap_or(0);
            page.assets[idx].z_index = max + 1;
            page.assets[idx].z_index != original
        }
        RestackDirection::Back => {
            let min = page.assets.iter().map(|a| a.z_index).min().unwrap_or(0);
            page.assets[idx].z_index = clamp_back(min - 1, original);
            page.assets[idx].z_index != original
        }
        RestackDirection::Forward | RestackDirection::Backward => {
            // Rank order: ascending z, ties broken by list position.
            let mut order: Vec<usize> = (0..page.assets.len()).collect();
            order.sort_by_key(|&i| (page.assets[i].z_index, i));
            let rank = order
                .iter()
                .position(|&i| i == idx)
                .unwrap_or_default();

            let neighbor = match direction {
                RestackDirection::Forward => order.get(rank + 1).copied(),
                _ => rank.checked_sub(1).and_then(|r| order.get(r).copied()),
            };
            let Some(other) = neighbor else {
                return false; // already at the extreme
            };

            let other_z = page.assets[other].z_index;
            if other_z == original {
                // Tied band (the default after adding several photos): rank
                // is decided by list position, so swap those instead.
                page.assets.swap(idx, other);
                return true;
            }
            page.assets[other].z_index = original;
            page.assets[idx].z_index = if direction == RestackDirection::Backward {
                clamp_back(other_z, original)
            } else {
                other_z
            };
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetDraft, AssetKind, UnifiedAsset};

    fn page_with_z(zs: &[i32]) -> Page {
        let mut page = Page::new_freeform(1);
        page.assets = zs
            .iter()
            .enumerate()
            .map(|(i, &z)| {
                UnifiedAsset::create(AssetDraft {
                    id: Some(format!("a{i}")),
                    z_index: Some(z),
                    ..AssetDraft::of(AssetKind::Image)
                })
            })
            .collect();
        page
    }

    #[test]
    fn front_jumps_past_max() {
        let mut page = page_with_z(&[10, 20, 30]);
        assert!(restack(&mut page, "a0", RestackDirection::Front));
        assert_eq!(page.asset("a0").unwrap().z_index, 31);
    }

    #[test]
    fn back_clamps_at_zero_for_non_negative_assets() {
        let mut page = page_with_z(&[0, 10]);
        assert!(restack(&mut page, "a1", RestackDirection::Back));
        assert_eq!(page.asset("a1").unwrap().z_index, 0);
    }

    #[test]
    fn back_allows_negative_for_already_negative_assets() {
        let mut page = page_with_z(&[-5, 10]);
        assert!(restack(&mut page, "a0", RestackDirection::Back));
        assert_eq!(page.asset("a0").unwrap().z_index, -6);
    }

    #[test]
    fn forward_swaps_with_next_rank() {
        let mut page = page_with_z(&[10, 20, 30]);
        assert!(restack(&mut page, "a0", RestackDirection::Forward));
        assert_eq!(page.asset("a0").unwrap().z_index, 20);
        assert_eq!(page.asset("a1").unwrap().z_index, 10);
    }

    #[test]
    fn forward_with_tied_z_moves_rank() {
        // three photos, all on the band default
        let mut page = page_with_z(&[10, 10, 10]);
        assert!(restack(&mut page, "a0", RestackDirection::Forward));
        let order: Vec<&str> = page.assets_by_z().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(order, vec!["a1", "a0", "a2"]);

        assert!(restack(&mut page, "a0", RestackDirection::Forward));
        let order: Vec<&str> = page.assets_by_z().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(order, vec!["a1", "a2", "a0"]);
    }

    #[test]
    fn backward_with_tied_z_moves_rank() {
        let mut page = page_with_z(&[10, 10]);
        assert!(restack(&mut page, "a1", RestackDirection::Backward));
        let order: Vec<&str> = page.assets_by_z().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(order, vec!["a1", "a0"]);
    }

    #[test]
    fn forward_at_top_is_noop() {
        let mut page = page_with_z(&[10, 20]);
        assert!(!restack(&mut page, "a1", RestackDirection::Forward));
        assert_eq!(page.asset("a1").unwrap().z_index, 20);
    }

    #[test]
    fn backward_at_bottom_is_noop() {
        let mut page = page_with_z(&[10, 20]);
        assert!(!restack(&mut page, "a0", RestackDirection::Backward));
        assert_eq!(page.asset("a0").unwrap().z_index, 10);
    }

    #[test]
    fn unknown_asset_is_noop() {
        let mut page = page_with_z(&[10]);
        assert!(!restack(&mut page, "nope", RestackDirection::Front));
    }
}
