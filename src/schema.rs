//! Schema detection and load resolution.
//!
//! Storage can hold three generations of an album: legacy rows only,
//! unified blobs only, or both (a half-finished migration). `SchemaInfo` is
//! an explicit value the persistence collaborator probes once and passes
//! in; the model keeps no hidden process-wide cache, so tests control it
//! deterministically.

use crate::album::Album;
use crate::error::{FolioError, FolioResult};
use crate::legacy::{self, LegacyAlbumRows};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SchemaInfo {
    pub has_legacy: bool,
    pub has_unified: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaSource {
    Empty,
    LegacyOnly,
    UnifiedOnly,
    /// Both present; unified data takes precedence on load.
    Hybrid,
}

impl SchemaInfo {
    pub fn source(self) -> SchemaSource {
        match (self.has_legacy, self.has_unified) {
            (false, false) => SchemaSource::Empty,
            (true, false) => SchemaSource::LegacyOnly,
            (false, true) => SchemaSource::UnifiedOnly,
            (true, true) => SchemaSource::Hybrid,
        }
    }

    /// Whether a load should read the unified blobs (legacy is only a
    /// fallback when no unified rows exist).
    pub fn prefers_unified(self) -> bool {
        self.has_unified
    }
}

/// Pick and decode the authoritative source for one album.
///
/// `unified` is the persisted `Album` JSON snapshot; `legacy` the raw rows.
/// Hybrid state resolves to unified. A schema that advertises a source but
/// supplies no data for it is a `Schema` error.
pub fn resolve_load(
    schema: SchemaInfo,
    unified: Option<serde_json::Value>,
    legacy: Option<&LegacyAlbumRows>,
) -> FolioResult<Album> {
    match schema.source() {
        SchemaSource::Empty => Err(FolioError::schema("album has no persisted data")),
        SchemaSource::UnifiedOnly | SchemaSource::Hybrid => {
            let snapshot = unified
                .ok_or_else(|| FolioError::schema("unified schema advertised but no snapshot"))?;
            let mut album: Album = serde_json::from_value(snapshot)?;
            album.renumber();
            Ok(album)
        }
        SchemaSource::LegacyOnly => {
            let rows = legacy
                .ok_or_else(|| FolioError::schema("legacy schema advertised but no rows"))?;
            Ok(legacy::legacy_album_to_unified(rows))
        }
    }
}
