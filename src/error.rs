use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Broad category of a [`TilesetError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The file could not be read.
    Io,
    /// The file extension is not a known tileset format.
    Format,
    /// The markup itself is malformed.
    Parse,
    /// Well-formed markup that does not describe a valid tileset.
    Schema,
    /// Two entries claim the same identity.
    Conflict,
}

/// Error type for tileset loading.
#[derive(Debug, Error)]
pub enum TilesetError {
    /// File I/O error
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// Unsupported file format (not .tsx / .tsj / .json)
    #[error("unsupported tileset format: {0}")]
    UnsupportedFormat(PathBuf),
    /// XML parse error
    #[error("XML parse error in {path}: {source}")]
    Xml {
        /// Offending file, `<memory>` for in-memory text
        path: PathBuf,
        /// Underlying error
        #[source]
        source: roxmltree::Error,
    },
    /// JSON parse error
    #[error("JSON parse error in {path}: {source}")]
    Json {
        /// Offending file, `<memory>` for in-memory text
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
    /// The document root is not a `<tileset>` element
    #[error("expected a <tileset> root element, found <{found}>")]
    UnexpectedRoot {
        /// Tag name of the root that was found
        found: String,
    },
    /// A required attribute is missing
    #[error("<{element}> is missing required attribute '{attribute}'{}", tile_suffix(.tile))]
    MissingAttribute {
        /// Element carrying the attribute
        element: &'static str,
        /// Attribute name
        attribute: &'static str,
        /// Enclosing tile, if any
        tile: Option<u32>,
    },
    /// A numeric attribute does not hold a non-negative integer
    #[error("<{element}> attribute '{attribute}' has non-numeric value '{value}'{}", tile_suffix(.tile))]
    InvalidNumber {
        /// Element carrying the attribute
        element: &'static str,
        /// Attribute name
        attribute: &'static str,
        /// Raw attribute text
        value: String,
        /// Enclosing tile, if any
        tile: Option<u32>,
        /// Underlying error
        #[source]
        source: ParseIntError,
    },
    /// An animation frame references a tile that is not in the tileset (strict mode only)
    #[error("animation of tile {tile} references undefined tile {frame_tile}")]
    DanglingFrame {
        /// Tile owning the animation
        tile: u32,
        /// Tile id referenced by the frame
        frame_tile: u32,
    },
    /// The same tile id is defined twice in one tileset
    #[error("duplicate tile id {id}")]
    DuplicateTile {
        /// Offending tile id
        id: u32,
    },
    /// A tileset with the same name is already registered in the catalog
    #[error("a tileset named '{name}' is already loaded")]
    DuplicateTileset {
        /// Tileset name
        name: String,
    },
}

fn tile_suffix(tile: &Option<u32>) -> String {
    match tile {
        Some(id) => format!(" (tile {id})"),
        None => String::new(),
    }
}

impl TilesetError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TilesetError::Io { .. } => ErrorKind::Io,
            TilesetError::UnsupportedFormat(_) => ErrorKind::Format,
            TilesetError::Xml { .. }
            | TilesetError::Json { .. }
            | TilesetError::UnexpectedRoot { .. } => ErrorKind::Parse,
            TilesetError::MissingAttribute { .. }
            | TilesetError::InvalidNumber { .. }
            | TilesetError::DanglingFrame { .. } => ErrorKind::Schema,
            TilesetError::DuplicateTile { .. } | TilesetError::DuplicateTileset { .. } => {
                ErrorKind::Conflict
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_attribute_message_names_field_and_tile() {
        let err = TilesetError::MissingAttribute {
            element: "image",
            attribute: "source",
            tile: Some(4),
        };
        assert_eq!(
            err.to_string(),
            "<image> is missing required attribute 'source' (tile 4)"
        );
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn duplicate_tile_is_a_conflict() {
        let err = TilesetError::DuplicateTile { id: 7 };
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.to_string(), "duplicate tile id 7");
    }
}
