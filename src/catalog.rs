use crate::error::TilesetError;
use crate::loader::{load_tileset, LoadOptions, TilesetFormat};
use crate::tileset::{Tile, Tileset};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
struct Entry {
    #[serde(skip)]
    source: PathBuf,
    #[serde(flatten)]
    tileset: Tileset,
}

/// Registry of loaded tilesets, keyed by tileset name.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct TilesetCatalog {
    #[serde(skip)]
    options: LoadOptions,
    entries: BTreeMap<String, Entry>,
}

impl TilesetCatalog {
    /// Empty catalog with default (lenient) options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty catalog that loads with `options`.
    pub fn with_options(options: LoadOptions) -> Self {
        Self {
            options,
            entries: BTreeMap::new(),
        }
    }

    /// Loads one descriptor and registers it under its name.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<&Tileset, TilesetError> {
        let path = path.as_ref();
        let tileset = load_tileset(path, &self.options)?;
        self.insert(tileset, path.to_path_buf())
    }

    /// Loads every tileset file directly inside `dir`, in file-name order.
    ///
    /// Stops at the first failure; tilesets registered before it stay.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize, TilesetError> {
        let dir = dir.as_ref();
        let io_err = |source: std::io::Error| TilesetError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_file() && TilesetFormat::from_path(&path).is_some() {
                files.push(path);
            }
        }
        files.sort();

        for path in &files {
            self.load_file(path)?;
        }
        Ok(files.len())
    }

    fn insert(&mut self, tileset: Tileset, source: PathBuf) -> Result<&Tileset, TilesetError> {
        use std::collections::btree_map::Entry as Slot;

        match self.entries.entry(tileset.name().to_owned()) {
            Slot::Occupied(slot) => Err(TilesetError::DuplicateTileset {
                name: slot.key().clone(),
            }),
            Slot::Vacant(slot) => {
                log::info!(
                    "registered tileset '{}' from {}",
                    tileset.name(),
                    source.display()
                );
                Ok(&slot.insert(Entry { source, tileset }).tileset)
            }
        }
    }

    /// Tileset registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Tileset> {
        self.entries.get(name).map(|e| &e.tileset)
    }

    /// Tile `id` of tileset `name`.
    pub fn tile(&self, name: &str, id: u32) -> Option<&Tile> {
        self.get(name)?.tile(id)
    }

    /// File the tileset was loaded from.
    pub fn source_path(&self, name: &str) -> Option<&Path> {
        self.entries.get(name).map(|e| e.source.as_path())
    }

    /// Image of tile `id`, resolved against the descriptor's directory.
    pub fn image_path(&self, name: &str, id: u32) -> Option<PathBuf> {
        let entry = self.entries.get(name)?;
        let image = entry.tileset.tile(id)?.image()?;
        let base = entry
            .source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("./"));
        Some(base.join(&image.source))
    }

    /// Names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Tilesets in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Tileset> {
        self.entries.values().map(|e| &e.tileset)
    }

    /// Number of registered tilesets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
