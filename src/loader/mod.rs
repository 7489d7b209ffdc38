pub mod json_loader;
pub mod tsx_loader;

use crate::error::TilesetError;
use crate::tileset::Tileset;
use std::path::Path;

/// Knobs for tileset loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub(crate) strict_frames: bool,
}

impl LoadOptions {
    /// Reject animation frames that reference tiles missing from the tileset.
    ///
    /// Off by default: such frames are kept and logged.
    pub fn strict_frames(mut self, strict: bool) -> Self {
        self.strict_frames = strict;
        self
    }

    /// Whether dangling animation frames fail the load.
    pub fn is_strict_frames(&self) -> bool {
        self.strict_frames
    }
}

/// Descriptor encodings understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TilesetFormat {
    /// Tiled XML (`.tsx`)
    Tsx,
    /// Tiled JSON (`.tsj` / `.json`)
    Json,
}

impl TilesetFormat {
    /// Format implied by a file extension, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsx") => Some(Self::Tsx),
            Some(ext) if ext.eq_ignore_ascii_case("tsj") || ext.eq_ignore_ascii_case("json") => {
                Some(Self::Json)
            }
            _ => None,
        }
    }
}

/// Parses descriptor text already in memory.
pub fn load_tileset_str(
    text: &str,
    format: TilesetFormat,
    options: &LoadOptions,
) -> Result<Tileset, TilesetError> {
    let label = Path::new("<memory>");
    match format {
        TilesetFormat::Tsx => tsx_loader::decode_tsx_str(text, label, options),
        TilesetFormat::Json => json_loader::decode_json_str(text, label, options),
    }
}

/// Reads and parses one tileset file, picking the format from its extension.
pub fn load_tileset(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Tileset, TilesetError> {
    let p = path.as_ref();
    let format =
        TilesetFormat::from_path(p).ok_or_else(|| TilesetError::UnsupportedFormat(p.to_path_buf()))?;

    let txt = std::fs::read_to_string(p).map_err(|source| TilesetError::Io {
        path: p.to_path_buf(),
        source,
    })?;

    match format {
        TilesetFormat::Tsx => tsx_loader::decode_tsx_str(&txt, p, options),
        TilesetFormat::Json => json_loader::decode_json_str(&txt, p, options),
    }
}
