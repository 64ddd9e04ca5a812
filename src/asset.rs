use std::collections::BTreeMap;

use crate::geometry::{Crop, Position, Size, Transform};

/// Z-index reserved for structural/background elements. Restack never lets a
/// user asset that started at z >= 0 cross below this line.
pub const BACKGROUND_Z: i32 = 0;

/// Everything that can be placed on a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Video,
    Text,
    Ribbon,
    Frame,
    Sticker,
    Map,
    Address,
}

impl AssetKind {
    /// Default z-band per kind, so decorations never start buried under
    /// photos. Applied only when an asset is created without an explicit
    /// z-index; a stored z-index is always preserved verbatim.
    pub fn default_z(self) -> i32 {
        match self {
            Self::Image => 10,
            Self::Video => 15,
            Self::Text => 20,
            Self::Map | Self::Address => 25,
            Self::Frame => 30,
            Self::Ribbon => 40,
            Self::Sticker => 50,
        }
    }

    /// Media kinds participate in slot assignment; everything else stays
    /// freeform when a layout is applied.
    pub fn is_media(self) -> bool {
        matches!(self, Self::Image | Self::Video)
    }
}

/// How media visually occupies its box, independent of placement math.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    Fill,
    Fit,
    Stretch,
    Cover,
}

impl Default for FitMode {
    fn default() -> Self {
        Self::Cover
    }
}

/// Which legacy decoration a unified sticker came from. Recording this keeps
/// the legacy round-trip lossless instead of collapsing frame and ribbon into
/// an unrecoverable "sticker".
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecorationKind {
    Sticker,
    Frame,
    Ribbon,
}

/// Scalar values allowed in the forward-compat `extra` bags.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ConfigScalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

pub type ExtraBag = BTreeMap<String, ConfigScalar>;

fn extra_is_empty(extra: &ExtraBag) -> bool {
    extra.is_empty()
}

/// Kind-specific configuration. A closed set of known fields per variant plus
/// an `extra` escape hatch for fields this version does not know about.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AssetConfig {
    Image {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filter: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filter_intensity: Option<f64>,
        #[serde(default, skip_serializing_if = "extra_is_empty")]
        extra: ExtraBag,
    },
    Video {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        chroma_key: Option<String>,
        #[serde(default)]
        muted: bool,
        #[serde(default, skip_serializing_if = "extra_is_empty")]
        extra: ExtraBag,
    },
    Text {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_size: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        align: Option<String>,
        #[serde(default, skip_serializing_if = "extra_is_empty")]
        extra: ExtraBag,
    },
    Decoration {
        decoration: DecorationKind,
        #[serde(default, skip_serializing_if = "extra_is_empty")]
        extra: ExtraBag,
    },
    Map {
        lat: f64,
        lng: f64,
        zoom: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<String>,
        #[serde(default, skip_serializing_if = "extra_is_empty")]
        extra: ExtraBag,
    },
    Address {
        lines: Vec<String>,
        #[serde(default, skip_serializing_if = "extra_is_empty")]
        extra: ExtraBag,
    },
    None,
}

impl AssetConfig {
    /// The kind-appropriate empty config.
    pub fn default_for(kind: AssetKind) -> Self {
        match kind {
            AssetKind::Image => Self::Image {
                filter: None,
                filter_intensity: None,
                extra: ExtraBag::new(),
            },
            AssetKind::Video => Self::Video {
                chroma_key: None,
                muted: false,
                extra: ExtraBag::new(),
            },
            AssetKind::Text => Self::Text {
                content: String::new(),
                font: None,
                font_size: None,
                color: None,
                align: None,
                extra: ExtraBag::new(),
            },
            AssetKind::Sticker => Self::Decoration {
                decoration: DecorationKind::Sticker,
                extra: ExtraBag::new(),
            },
            AssetKind::Frame => Self::Decoration {
                decoration: DecorationKind::Frame,
                extra: ExtraBag::new(),
            },
            AssetKind::Ribbon => Self::Decoration {
                decoration: DecorationKind::Ribbon,
                extra: ExtraBag::new(),
            },
            AssetKind::Map => Self::Map {
                lat: 0.0,
                lng: 0.0,
                zoom: 12.0,
                style: None,
                extra: ExtraBag::new(),
            },
            AssetKind::Address => Self::Address {
                lines: Vec::new(),
                extra: ExtraBag::new(),
            },
        }
    }

    pub fn decoration_kind(&self) -> Option<DecorationKind> {
        match self {
            Self::Decoration { decoration, .. } => Some(*decoration),
            _ => None,
        }
    }
}

/// One placed item on a page.
///
/// `slot` is the placement authority switch: `None` means freeform, the
/// stored `position`/`size` are page-relative and authoritative; `Some(i)`
/// means bound to slot `i` of the page's layout, the slot geometry is
/// authoritative, and the stored fields hold slot-relative coverage values
/// (100 = spans the whole slot).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UnifiedAsset {
    pub id: String,
    pub kind: AssetKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub position: Position,
    pub size: Size,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<u32>,
    #[serde(default)]
    pub fit: FitMode,
    pub z_index: i32,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub lock_aspect_ratio: bool,
    #[serde(default = "default_config")]
    pub config: AssetConfig,
}

fn default_opacity() -> f64 {
    100.0
}

fn default_true() -> bool {
    true
}

fn default_config() -> AssetConfig {
    AssetConfig::None
}

/// Fresh globally-unique asset/page id.
pub fn fresh_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Deterministic pseudo-random base36 id for hosts without a UUID source
/// (and for reproducible fixtures). One splitmix64 step over the seed.
pub fn fallback_id(seed: u64) -> String {
    let mut z = seed.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^= z >> 31;

    let digits = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut out = String::with_capacity(13);
    for _ in 0..13 {
        out.push(digits[(z % 36) as usize] as char);
        z /= 36;
        if z == 0 {
            z = 0x5851_f42d_4c95_7f2d;
        }
    }
    out
}

/// Input to [`UnifiedAsset::create`]: only the kind is required, every other
/// field is backfilled with its kind-appropriate default.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct AssetDraft {
    pub kind: Option<AssetKind>,
    pub id: Option<String>,
    pub url: Option<String>,
    pub position: Option<Position>,
    pub size: Option<Size>,
    pub transform: Option<Transform>,
    pub fit: Option<FitMode>,
    pub z_index: Option<i32>,
    pub opacity: Option<f64>,
    pub locked: Option<bool>,
    pub visible: Option<bool>,
    pub lock_aspect_ratio: Option<bool>,
    pub config: Option<AssetConfig>,
}

impl AssetDraft {
    pub fn of(kind: AssetKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }
}

/// Field-wise patch, merged last-write-wins into an existing asset.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct AssetPatch {
    pub url: Option<String>,
    pub position: Option<Position>,
    pub size: Option<Size>,
    pub rotation: Option<f64>,
    pub scale: Option<f64>,
    pub crop: Option<Crop>,
    pub fit: Option<FitMode>,
    pub z_index: Option<i32>,
    pub opacity: Option<f64>,
    pub locked: Option<bool>,
    pub visible: Option<bool>,
    pub lock_aspect_ratio: Option<bool>,
    pub config: Option<AssetConfig>,
}

impl UnifiedAsset {
    /// Materialize a draft: fresh id if absent, z-band default if no explicit
    /// z-index, `lock_aspect_ratio` on for media, opacity 100.
    pub fn create(draft: AssetDraft) -> Self {
        let kind = draft.kind.unwrap_or(AssetKind::Image);
        Self {
            id: draft.id.unwrap_or_else(fresh_id),
            kind,
            url: draft.url,
            position: draft.position.unwrap_or_default(),
            size: draft.size.unwrap_or_default(),
            transform: draft.transform.unwrap_or_default(),
            slot: None,
            fit: draft.fit.unwrap_or_default(),
            z_index: draft.z_index.unwrap_or_else(|| kind.default_z()),
            opacity: draft.opacity.unwrap_or(100.0),
            locked: draft.locked.unwrap_or(false),
            visible: draft.visible.unwrap_or(true),
            lock_aspect_ratio: draft.lock_aspect_ratio.unwrap_or(kind.is_media()),
            config: draft
                .config
                .unwrap_or_else(|| AssetConfig::default_for(kind)),
        }
    }

    pub fn apply_patch(&mut self, patch: &AssetPatch) {
        if let Some(url) = &patch.url {
            self.url = Some(url.clone());
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(rotation) = patch.rotation {
            self.transform.rotation = rotation;
        }
        if let Some(scale) = patch.scale {
            self.transform.scale = scale;
        }
        if let Some(crop) = patch.crop {
            self.transform.crop = Some(crop);
        }
        if let Some(fit) = patch.fit {
            self.fit = fit;
        }
        if let Some(z) = patch.z_index {
            self.z_index = z;
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = opacity;
        }
        if let Some(locked) = patch.locked {
            self.locked = locked;
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(lock) = patch.lock_aspect_ratio {
            self.lock_aspect_ratio = lock;
        }
        if let Some(config) = &patch.config {
            self.config = config.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn z_band_defaults() {
        assert_eq!(AssetKind::Image.default_z(), 10);
        assert_eq!(AssetKind::Video.default_z(), 15);
        assert_eq!(AssetKind::Text.default_z(), 20);
        assert_eq!(AssetKind::Map.default_z(), 25);
        assert_eq!(AssetKind::Address.default_z(), 25);
        assert_eq!(AssetKind::Frame.default_z(), 30);
        assert_eq!(AssetKind::Ribbon.default_z(), 40);
        assert_eq!(AssetKind::Sticker.default_z(), 50);
    }

    #[test]
    fn create_backfills_defaults() {
        let a = UnifiedAsset::create(AssetDraft::of(AssetKind::Sticker));
        assert!(!a.id.is_empty());
        assert_eq!(a.z_index, 50);
        assert_eq!(a.opacity, 100.0);
        assert!(a.visible);
        assert!(!a.lock_aspect_ratio); // not media
        assert_eq!(a.config.decoration_kind(), Some(DecorationKind::Sticker));

        let img = UnifiedAsset::create(AssetDraft::of(AssetKind::Image));
        assert_eq!(img.z_index, 10);
        assert!(img.lock_aspect_ratio);
        assert!(img.slot.is_none());
    }

    #[test]
    fn create_keeps_explicit_z() {
        let a = UnifiedAsset::create(AssetDraft {
            z_index: Some(-3),
            ..AssetDraft::of(AssetKind::Image)
        });
        assert_eq!(a.z_index, -3);
    }

    #[test]
    fn patch_merges_last_write_wins() {
        let mut a = UnifiedAsset::create(AssetDraft::of(AssetKind::Image));
        a.apply_patch(&AssetPatch {
            rotation: Some(45.0),
            z_index: Some(7),
            ..AssetPatch::default()
        });
        assert_eq!(a.transform.rotation, 45.0);
        assert_eq!(a.z_index, 7);
        // untouched fields survive
        assert_eq!(a.opacity, 100.0);
    }

    #[test]
    fn fallback_id_is_base36_and_deterministic() {
        let a = fallback_id(42);
        let b = fallback_id(42);
        assert_eq!(a, b);
        assert_eq!(a.len(), 13);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(fallback_id(43), a);
    }

    #[test]
    fn config_json_is_kind_tagged() {
        let c = AssetConfig::default_for(AssetKind::Frame);
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["kind"], "decoration");
        assert_eq!(v["decoration"], "frame");
    }
}
