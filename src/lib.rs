#![warn(missing_docs)]

//! Tiled tileset (`.tsx` / `.tsj`) loader and in-memory tile catalog.
//!
//! Descriptors are parsed into immutable [`Tileset`] values mapping tile ids to
//! image references, custom properties and animations. Rendering and animation
//! playback are left to the consumer.

mod catalog;
mod error;
mod loader;
mod properties;
mod tileset;

pub use catalog::TilesetCatalog;
pub use error::{ErrorKind, TilesetError};
pub use loader::{load_tileset, load_tileset_str, LoadOptions, TilesetFormat};
pub use properties::Properties;
pub use tileset::{Animation, Frame, Grid, Tile, TileImage, Tileset};
