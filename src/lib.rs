#![forbid(unsafe_code)]

pub mod album;
pub mod asset;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod history;
pub mod layout;
pub mod legacy;
pub mod page;
pub mod schema;
pub mod zorder;

pub use album::{Album, AlbumConfig, SCHEMA_VERSION};
pub use asset::{
    AssetConfig, AssetDraft, AssetKind, AssetPatch, ConfigScalar, DecorationKind, FitMode,
    UnifiedAsset,
};
pub use editor::Editor;
pub use error::{FolioError, FolioResult};
pub use geometry::{Crop, Position, Size, Transform};
pub use history::{HISTORY_CAP, History};
pub use layout::{FREEFORM_TEMPLATE_ID, LayoutTemplate, Orientation};
pub use legacy::{LegacyAlbumRows, LegacyAssetRow, LegacyPageRow};
pub use page::{BackgroundConfig, LayoutSlot, Page, PagePatch, SlotContent};
pub use schema::{SchemaInfo, SchemaSource};
pub use zorder::RestackDirection;
