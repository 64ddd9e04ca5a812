use crate::asset::{AssetKind, UnifiedAsset};
use crate::geometry::{Crop, Position, Size};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    Normal,
    Multiply,
    Screen,
    Overlay,
}

impl Default for BlendMode {
    fn default() -> Self {
        Self::Normal
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BackgroundImage {
    pub url: String,
    #[serde(default = "full_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub position: Position,
    #[serde(default = "unit_scale")]
    pub scale: f64,
}

fn full_opacity() -> f64 {
    100.0
}

fn unit_scale() -> f64 {
    1.0
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Gradient {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub angle: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BackgroundConfig {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<BackgroundImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
    #[serde(default)]
    pub blend_mode: BlendMode,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            color: "#ffffff".to_string(),
            image: None,
            gradient: None,
            blend_mode: BlendMode::Normal,
        }
    }
}

/// A placeholder region defined by a layout template, independent of any
/// asset. A slot with no asset bound renders as an empty placeholder.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutSlot {
    pub id: String,
    pub position: Position,
    pub size: Size,
    pub kind: AssetKind,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
}

/// Per-slot render snapshot derived from the asset list. Lets a layout-only
/// consumer paint without re-joining against `assets`; computed on read, so
/// there is no second copy to keep in sync.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SlotContent {
    pub slot: u32,
    pub asset_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<Crop>,
}

/// Read-only text view of a page, derived from the asset list.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLayer<'a> {
    pub asset: &'a UnifiedAsset,
    pub content: &'a str,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Page {
    pub id: String,
    pub page_number: u32,
    #[serde(default)]
    pub background: BackgroundConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_template: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layout_slots: Vec<LayoutSlot>,
    #[serde(default)]
    pub assets: Vec<UnifiedAsset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Page {
    /// Empty freeform page. `page_number` is provisional until the owning
    /// album renumbers.
    pub fn new_freeform(page_number: u32) -> Self {
        Self {
            id: crate::asset::fresh_id(),
            page_number,
            background: BackgroundConfig::default(),
            layout_template: None,
            layout_slots: Vec::new(),
            assets: Vec::new(),
            updated_at: None,
        }
    }

    pub fn asset(&self, asset_id: &str) -> Option<&UnifiedAsset> {
        self.assets.iter().find(|a| a.id == asset_id)
    }

    pub fn asset_mut(&mut self, asset_id: &str) -> Option<&mut UnifiedAsset> {
        self.assets.iter_mut().find(|a| a.id == asset_id)
    }

    /// The slot geometry an asset is bound to, if any.
    pub fn slot_of(&self, asset: &UnifiedAsset) -> Option<&LayoutSlot> {
        asset
            .slot
            .and_then(|i| self.layout_slots.get(i as usize))
    }

    /// One entry per filled template slot, ascending by slot index.
    pub fn layout_config(&self) -> Vec<SlotContent> {
        let mut entries: Vec<SlotContent> = self
            .assets
            .iter()
            .filter_map(|a| {
                let slot = a.slot?;
                Some(SlotContent {
                    slot,
                    asset_id: a.id.clone(),
                    url: a.url.clone(),
                    rotation: a.transform.rotation,
                    crop: a.transform.crop,
                })
            })
            .collect();
        entries.sort_by_key(|e| e.slot);
        entries
    }

    /// Text assets as a flat read view, ascending by z.
    pub fn text_layers(&self) -> Vec<TextLayer<'_>> {
        let mut layers: Vec<TextLayer<'_>> = self
            .assets
            .iter()
            .filter_map(|a| match &a.config {
                crate::asset::AssetConfig::Text { content, .. } => {
                    Some(TextLayer { asset: a, content })
                }
                _ => None,
            })
            .collect();
        layers.sort_by_key(|l| l.asset.z_index);
        layers
    }

    /// Assets ascending by z-index, the order painters consume.
    pub fn assets_by_z(&self) -> Vec<&UnifiedAsset> {
        let mut out: Vec<&UnifiedAsset> = self.assets.iter().collect();
        out.sort_by_key(|a| a.z_index);
        out
    }
}

/// Field-wise page patch, merged last-write-wins.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct PagePatch {
    pub background: Option<BackgroundConfig>,
    pub updated_at: Option<String>,
}

impl Page {
    pub fn apply_patch(&mut self, patch: &PagePatch) {
        if let Some(bg) = &patch.background {
            self.background = bg.clone();
        }
        if let Some(ts) = &patch.updated_at {
            self.updated_at = Some(ts.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetConfig, AssetDraft, AssetKind, ExtraBag, UnifiedAsset};

    fn text_asset(content: &str, z: i32) -> UnifiedAsset {
        UnifiedAsset::create(AssetDraft {
            z_index: Some(z),
            config: Some(AssetConfig::Text {
                content: content.to_string(),
                font: None,
                font_size: None,
                color: None,
                align: None,
                extra: ExtraBag::new(),
            }),
            ..AssetDraft::of(AssetKind::Text)
        })
    }

    #[test]
    fn layout_config_derives_filled_slots_sorted() {
        let mut page = Page::new_freeform(1);
        let mut a = UnifiedAsset::create(AssetDraft::of(AssetKind::Image));
        a.slot = Some(1);
        a.url = Some("a.jpg".to_string());
        let mut b = UnifiedAsset::create(AssetDraft::of(AssetKind::Image));
        b.slot = Some(0);
        b.url = Some("b.jpg".to_string());
        let c = UnifiedAsset::create(AssetDraft::of(AssetKind::Image)); // freeform
        page.assets = vec![a, b, c];

        let cfg = page.layout_config();
        assert_eq!(cfg.len(), 2);
        assert_eq!(cfg[0].slot, 0);
        assert_eq!(cfg[0].url.as_deref(), Some("b.jpg"));
        assert_eq!(cfg[1].slot, 1);
    }

    #[test]
    fn text_layers_sorted_by_z() {
        let mut page = Page::new_freeform(1);
        page.assets = vec![text_asset("top", 30), text_asset("bottom", 5)];
        let layers = page.text_layers();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].content, "bottom");
        assert_eq!(layers[1].content, "top");
    }

    #[test]
    fn page_json_always_has_assets_array() {
        let page = Page::new_freeform(1);
        let v = serde_json::to_value(&page).unwrap();
        assert!(v["assets"].is_array());

        // and a snapshot missing the field still deserializes
        let de: Page =
            serde_json::from_str(r#"{"id":"p","page_number":1}"#).unwrap();
        assert!(de.assets.is_empty());
        assert!(de.layout_template.is_none());
    }
}
