//! Bidirectional bridge between the legacy per-row schema and the unified
//! per-page shape.
//!
//! The legacy store kept one row per page and one row per asset, with the
//! asset geometry buried in an ad hoc `config` JSON bag. Conversion rules:
//!
//! - a stored z-index is preserved verbatim, byte for byte; the z-band
//!   default applies only when the row has none;
//! - missing or mistyped config fields substitute explicit defaults
//!   (x=50, y=50, width=20, height=20, rotation=0, scale=1); the adapter
//!   never errors on malformed legacy data;
//! - legacy `frame` and `ribbon` normalize to unified `sticker`, with the
//!   original decoration recorded in the config so the reverse conversion
//!   is lossless;
//! - converted assets come out sorted ascending by resolved z-index.

use serde_json::{Value, json};

use crate::album::{Album, AlbumConfig, SCHEMA_VERSION};
use crate::asset::{
    AssetConfig, AssetKind, ConfigScalar, DecorationKind, ExtraBag, FitMode, UnifiedAsset,
};
use crate::geometry::{Crop, Position, Size, Transform};
use crate::page::{BackgroundConfig, Page};

/// One row of the legacy `pages` table.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LegacyPageRow {
    pub id: String,
    pub page_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_id: Option<String>,
}

/// One row of the legacy `assets` table. `config` is the untyped bag the
/// old client wrote; only known keys are interpreted.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LegacyAssetRow {
    pub id: String,
    pub page_id: String,
    pub asset_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(default)]
    pub config: Value,
}

/// Everything the legacy store holds for one album.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LegacyAlbumRows {
    pub album_id: String,
    pub title: String,
    pub family_id: String,
    #[serde(default)]
    pub config: Value,
    pub pages: Vec<LegacyPageRow>,
    pub assets: Vec<LegacyAssetRow>,
}

fn num(config: &Value, key: &str, default: f64) -> f64 {
    config.get(key).and_then(Value::as_f64).unwrap_or(default)
}

fn str_opt(config: &Value, key: &str) -> Option<String> {
    config
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn crop_from(config: &Value) -> Option<Crop> {
    let crop = config.get("crop")?;
    if !crop.is_object() {
        return None;
    }
    Some(Crop {
        zoom: num(crop, "zoom", 1.0),
        x: num(crop, "x", 50.0),
        y: num(crop, "y", 50.0),
    })
}

/// Legacy type string to unified kind plus the z-band the default comes
/// from. Frame and ribbon normalize to sticker; the decoration kind keeps
/// the distinction recoverable.
fn resolve_kind(asset_type: &str) -> (AssetKind, Option<DecorationKind>, i32) {
    match asset_type {
        "image" | "photo" => (AssetKind::Image, None, AssetKind::Image.default_z()),
        "video" => (AssetKind::Video, None, AssetKind::Video.default_z()),
        "text" => (AssetKind::Text, None, AssetKind::Text.default_z()),
        "map" => (AssetKind::Map, None, AssetKind::Map.default_z()),
        "address" => (AssetKind::Address, None, AssetKind::Address.default_z()),
        "frame" => (
            AssetKind::Sticker,
            Some(DecorationKind::Frame),
            AssetKind::Frame.default_z(),
        ),
        "ribbon" => (
            AssetKind::Sticker,
            Some(DecorationKind::Ribbon),
            AssetKind::Ribbon.default_z(),
        ),
        _ => (
            AssetKind::Sticker,
            Some(DecorationKind::Sticker),
            AssetKind::Sticker.default_z(),
        ),
    }
}

fn config_from(row: &LegacyAssetRow, kind: AssetKind, decoration: Option<DecorationKind>) -> AssetConfig {
    match kind {
        AssetKind::Text => AssetConfig::Text {
            content: str_opt(&row.config, "text")
                .or_else(|| str_opt(&row.config, "content"))
                .unwrap_or_default(),
            font: str_opt(&row.config, "font"),
            font_size: row.config.get("fontSize").and_then(Value::as_f64),
            color: str_opt(&row.config, "color"),
            align: str_opt(&row.config, "align"),
            extra: ExtraBag::new(),
        },
        AssetKind::Map => AssetConfig::Map {
            lat: num(&row.config, "lat", 0.0),
            lng: num(&row.config, "lng", 0.0),
            zoom: num(&row.config, "mapZoom", 12.0),
            style: str_opt(&row.config, "style"),
            extra: ExtraBag::new(),
        },
        AssetKind::Sticker => {
            let mut extra = ExtraBag::new();
            let known = matches!(row.asset_type.as_str(), "sticker" | "frame" | "ribbon");
            if !known {
                extra.insert(
                    "legacy_type".to_string(),
                    ConfigScalar::Str(row.asset_type.clone()),
                );
            }
            AssetConfig::Decoration {
                decoration: decoration.unwrap_or(DecorationKind::Sticker),
                extra,
            }
        }
        _ => AssetConfig::default_for(kind),
    }
}

/// Convert one legacy page plus its asset rows into the unified shape.
pub fn legacy_to_unified(page_row: &LegacyPageRow, asset_rows: &[LegacyAssetRow]) -> Page {
    let mut assets: Vec<UnifiedAsset> = asset_rows
        .iter()
        .map(|row| {
            let (kind, decoration, band) = resolve_kind(&row.asset_type);
            let z_index = row.z_index.unwrap_or(band);
            UnifiedAsset {
                id: row.id.clone(),
                kind,
                url: row.url.clone(),
                position: Position::new(num(&row.config, "x", 50.0), num(&row.config, "y", 50.0)),
                size: Size::new(
                    num(&row.config, "width", 20.0),
                    num(&row.config, "height", 20.0),
                ),
                transform: Transform {
                    rotation: num(&row.config, "rotation", 0.0),
                    scale: num(&row.config, "scale", 1.0),
                    crop: crop_from(&row.config),
                },
                slot: None,
                fit: FitMode::default(),
                z_index,
                opacity: num(&row.config, "opacity", 100.0),
                locked: row
                    .config
                    .get("locked")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                visible: row
                    .config
                    .get("visible")
                    .and_then(Value::as_bool)
                    .unwrap_or(true),
                lock_aspect_ratio: kind.is_media(),
                config: config_from(row, kind, decoration),
            }
        })
        .collect();
    // Downstream painters assume ascending z.
    assets.sort_by_key(|a| a.z_index);

    Page {
        id: page_row.id.clone(),
        page_number: page_row.page_number,
        background: BackgroundConfig {
            color: page_row
                .background_color
                .clone()
                .unwrap_or_else(|| "#ffffff".to_string()),
            ..BackgroundConfig::default()
        },
        layout_template: page_row.layout_id.clone(),
        layout_slots: Vec::new(),
        assets,
        updated_at: None,
    }
}

fn legacy_type_of(asset: &UnifiedAsset) -> String {
    match asset.kind {
        AssetKind::Image => "image",
        AssetKind::Video => "video",
        AssetKind::Text => "text",
        AssetKind::Map => "map",
        AssetKind::Address => "address",
        AssetKind::Frame => "frame",
        AssetKind::Ribbon => "ribbon",
        AssetKind::Sticker => match &asset.config {
            AssetConfig::Decoration {
                decoration: DecorationKind::Frame,
                ..
            } => "frame",
            AssetConfig::Decoration {
                decoration: DecorationKind::Ribbon,
                ..
            } => "ribbon",
            // An unknown forward-converted type keeps its original string.
            AssetConfig::Decoration { extra, .. } => match extra.get("legacy_type") {
                Some(ConfigScalar::Str(original)) => return original.clone(),
                _ => "sticker",
            },
            _ => "sticker",
        },
    }
    .to_string()
}

fn config_bag(asset: &UnifiedAsset) -> Value {
    let mut bag = json!({
        "x": asset.position.x,
        "y": asset.position.y,
        "width": asset.size.width,
        "height": asset.size.height,
        "rotation": asset.transform.rotation,
        "scale": asset.transform.scale,
        "opacity": asset.opacity,
        "locked": asset.locked,
        "visible": asset.visible,
    });
    if let Some(crop) = asset.transform.crop {
        bag["crop"] = json!({ "zoom": crop.zoom, "x": crop.x, "y": crop.y });
    }
    if let AssetConfig::Text {
        content,
        font,
        font_size,
        color,
        align,
        ..
    } = &asset.config
    {
        bag["text"] = json!(content);
        if let Some(font) = font {
            bag["font"] = json!(font);
        }
        if let Some(size) = font_size {
            bag["fontSize"] = json!(size);
        }
        if let Some(color) = color {
            bag["color"] = json!(color);
        }
        if let Some(align) = align {
            bag["align"] = json!(align);
        }
    }
    if let AssetConfig::Map {
        lat, lng, zoom, style, ..
    } = &asset.config
    {
        bag["lat"] = json!(lat);
        bag["lng"] = json!(lng);
        bag["mapZoom"] = json!(zoom);
        if let Some(style) = style {
            bag["style"] = json!(style);
        }
    }
    bag
}

/// Convert a unified page back into legacy rows. Slot bindings do not exist
/// in the legacy schema and are dropped; everything the forward conversion
/// reads round-trips exactly.
pub fn unified_to_legacy(page: &Page) -> (LegacyPageRow, Vec<LegacyAssetRow>) {
    let rows = page
        .assets
        .iter()
        .map(|asset| LegacyAssetRow {
            id: asset.id.clone(),
            page_id: page.id.clone(),
            asset_type: legacy_type_of(asset),
            url: asset.url.clone(),
            z_index: Some(asset.z_index),
            config: config_bag(asset),
        })
        .collect();

    (
        LegacyPageRow {
            id: page.id.clone(),
            page_number: page.page_number,
            background_color: Some(page.background.color.clone()),
            layout_id: page.layout_template.clone(),
        },
        rows,
    )
}

/// Assemble a whole unified album from legacy rows. The unplaced-media pool
/// travels through the legacy bridge inside the album config bag.
pub fn legacy_album_to_unified(rows: &LegacyAlbumRows) -> Album {
    let mut pages: Vec<Page> = rows
        .pages
        .iter()
        .map(|page_row| {
            let page_assets: Vec<LegacyAssetRow> = rows
                .assets
                .iter()
                .filter(|a| a.page_id == page_row.id)
                .cloned()
                .collect();
            legacy_to_unified(page_row, &page_assets)
        })
        .collect();
    pages.sort_by_key(|p| p.page_number);

    let unplaced = rows
        .config
        .get("unplaced_media")
        .cloned()
        .and_then(|v| serde_json::from_value::<Vec<UnifiedAsset>>(v).ok())
        .unwrap_or_default();

    let mut album = Album {
        schema_version: SCHEMA_VERSION,
        id: rows.album_id.clone(),
        title: rows.title.clone(),
        family_id: rows.family_id.clone(),
        config: AlbumConfig::default(),
        pages,
        total_pages: 0,
        unplaced,
        is_published: false,
        created_at: None,
        updated_at: None,
    };
    album.renumber();
    album
}

/// Project a unified album onto the legacy row shape (migration tooling and
/// read-compat only; the legacy schema is never a new write target).
pub fn unified_album_to_legacy(album: &Album) -> LegacyAlbumRows {
    let mut pages = Vec::with_capacity(album.pages.len());
    let mut assets = Vec::new();
    for page in &album.pages {
        let (row, mut rows) = unified_to_legacy(page);
        pages.push(row);
        assets.append(&mut rows);
    }

    let mut config = json!({});
    if !album.unplaced.is_empty() {
        config["unplaced_media"] =
            serde_json::to_value(&album.unplaced).unwrap_or(Value::Null);
    }

    LegacyAlbumRows {
        album_id: album.id.clone(),
        title: album.title.clone(),
        family_id: album.family_id.clone(),
        config,
        pages,
        assets,
    }
}
