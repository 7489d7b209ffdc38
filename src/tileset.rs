use crate::error::TilesetError;
use crate::loader::LoadOptions;
use crate::properties::Properties;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// A named collection of individually addressable tiles.
///
/// Built once by a loader and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tileset {
    pub(crate) name: String,
    pub(crate) version: Option<String>,
    pub(crate) tiled_version: Option<String>,
    pub(crate) tile_width: u32,
    pub(crate) tile_height: u32,
    pub(crate) tile_count: u32,
    pub(crate) columns: u32,
    pub(crate) spacing: u32, // 0 if not used
    pub(crate) margin: u32,  // 0 if not used
    pub(crate) grid: Option<Grid>,
    pub(crate) image: Option<TileImage>,
    pub(crate) properties: Properties,
    pub(crate) tiles: Vec<Tile>, // document order
    #[serde(skip)]
    pub(crate) index: HashMap<u32, usize>,
}

/// One addressable sprite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pub(crate) id: u32,
    pub(crate) class: Option<String>,
    pub(crate) image: Option<TileImage>,
    pub(crate) properties: Properties,
    pub(crate) animation: Option<Animation>,
}

/// Image reference, relative to the descriptor file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileImage {
    /// Path as written in the descriptor
    pub source: String,
    /// Pixel width, when declared
    pub width: Option<u32>,
    /// Pixel height, when declared
    pub height: Option<u32>,
}

/// Tiled's `<grid>` hint for image-collection tilesets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    /// `orthogonal` or `isometric`
    pub orientation: String,
    /// Grid cell width in pixels
    pub width: u32,
    /// Grid cell height in pixels
    pub height: u32,
}

/// Looping sequence of frames.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Animation {
    frames: Vec<Frame>,
}

/// One animation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Tile shown during this step (not guaranteed to exist in the tileset)
    pub tile_id: u32,
    /// How long the step lasts, in milliseconds
    pub duration_ms: u32,
}

impl Frame {
    /// Frame duration as a [`Duration`].
    pub fn duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.duration_ms))
    }
}

impl Animation {
    pub(crate) fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    /// Frames in document order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when the animation has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Length of one full loop.
    pub fn total_duration(&self) -> Duration {
        self.frames.iter().map(Frame::duration).sum()
    }

    /// Frame visible `elapsed` after the loop started, wrapping around.
    ///
    /// When every frame has zero duration the first frame is returned.
    pub fn frame_at(&self, elapsed: Duration) -> Option<&Frame> {
        let total = self.total_duration().as_millis();
        if total == 0 {
            return self.frames.first();
        }
        let mut t = elapsed.as_millis() % total;
        for frame in &self.frames {
            let d = u128::from(frame.duration_ms);
            if t < d {
                return Some(frame);
            }
            t -= d;
        }
        self.frames.last()
    }
}

impl Tile {
    /// Id, unique within the tileset.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Tiled `class` (or legacy `type`) of the tile.
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// Image of this tile, if it has one.
    pub fn image(&self) -> Option<&TileImage> {
        self.image.as_ref()
    }

    /// Custom properties; empty when the tile declares none.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Animation, if the tile has one.
    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }
}

impl Tileset {
    /// Validates ids and builds the lookup index.
    pub(crate) fn finish(mut self, options: &LoadOptions) -> Result<Self, TilesetError> {
        let mut index = HashMap::with_capacity(self.tiles.len());
        for (i, tile) in self.tiles.iter().enumerate() {
            if index.insert(tile.id, i).is_some() {
                return Err(TilesetError::DuplicateTile { id: tile.id });
            }
        }
        self.index = index;

        for (tile, _, frame_tile) in self.dangling_frames() {
            if options.is_strict_frames() {
                return Err(TilesetError::DanglingFrame { tile, frame_tile });
            }
            log::warn!(
                "tileset '{}': animation of tile {tile} references undefined tile {frame_tile}",
                self.name
            );
        }

        log::debug!(
            "loaded tileset '{}' ({} tiles, {}x{})",
            self.name,
            self.tiles.len(),
            self.tile_width,
            self.tile_height
        );
        Ok(self)
    }

    /// Tileset name (empty when the descriptor has none).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Format version of the descriptor (`version` attribute).
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Version of Tiled that wrote the descriptor.
    pub fn tiled_version(&self) -> Option<&str> {
        self.tiled_version.as_deref()
    }

    /// Grid tile width in pixels.
    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    /// Grid tile height in pixels.
    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// Declared tile count (`tilecount`), not necessarily `tiles().len()`.
    pub fn tile_count(&self) -> u32 {
        self.tile_count
    }

    /// Atlas columns; 0 for image-collection tilesets.
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Pixels between atlas tiles.
    pub fn spacing(&self) -> u32 {
        self.spacing
    }

    /// Pixels around the atlas edge.
    pub fn margin(&self) -> u32 {
        self.margin
    }

    /// Grid hint, when declared.
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    /// Atlas image shared by all tiles, for single-image tilesets.
    pub fn image(&self) -> Option<&TileImage> {
        self.image.as_ref()
    }

    /// Tileset-level custom properties.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Tiles in document order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile with the given id.
    pub fn tile(&self, id: u32) -> Option<&Tile> {
        self.index.get(&id).map(|&i| &self.tiles[i])
    }

    /// True when a tile with this id is defined.
    pub fn contains(&self, id: u32) -> bool {
        self.index.contains_key(&id)
    }

    /// Ids in document order.
    pub fn tile_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.tiles.iter().map(|t| t.id)
    }

    /// Tiles that carry an animation.
    pub fn animated_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.animation.is_some())
    }

    /// Tiles whose property `name` equals `value`.
    pub fn tiles_with_property<'a>(
        &'a self,
        name: &'a str,
        value: &'a str,
    ) -> impl Iterator<Item = &'a Tile> + 'a {
        self.tiles
            .iter()
            .filter(move |t| t.properties.matches(name, value))
    }

    /// `(anchor tile, frame index, referenced id)` for every frame pointing outside the tileset.
    pub fn dangling_frames(&self) -> Vec<(u32, usize, u32)> {
        let mut out = Vec::new();
        for tile in self.animated_tiles() {
            if let Some(anim) = &tile.animation {
                for (i, frame) in anim.frames.iter().enumerate() {
                    if !self.contains(frame.tile_id) {
                        out.push((tile.id, i, frame.tile_id));
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anim(durations: &[u32]) -> Animation {
        Animation::new(
            durations
                .iter()
                .enumerate()
                .map(|(i, &d)| Frame {
                    tile_id: i as u32,
                    duration_ms: d,
                })
                .collect(),
        )
    }

    #[test]
    fn frame_at_wraps_around_the_loop() {
        let a = anim(&[100, 50, 250]);
        assert_eq!(a.total_duration(), Duration::from_millis(400));
        let at = |ms| a.frame_at(Duration::from_millis(ms)).map(|f| f.tile_id);
        assert_eq!(at(0), Some(0));
        assert_eq!(at(99), Some(0));
        assert_eq!(at(100), Some(1));
        assert_eq!(at(149), Some(1));
        assert_eq!(at(150), Some(2));
        assert_eq!(at(399), Some(2));
        assert_eq!(at(400), Some(0));
        assert_eq!(at(1_250), Some(0));
        assert_eq!(at(1_300), Some(1));
    }

    #[test]
    fn frame_at_handles_degenerate_animations() {
        assert_eq!(Animation::default().frame_at(Duration::from_secs(1)), None);
        let zero = anim(&[0, 0]);
        assert_eq!(
            zero.frame_at(Duration::from_millis(30)).map(|f| f.tile_id),
            Some(0)
        );
    }

    fn bare_tileset(ids: &[u32], animation: Option<Animation>) -> Tileset {
        Tileset {
            name: "t".into(),
            version: None,
            tiled_version: None,
            tile_width: 16,
            tile_height: 16,
            tile_count: ids.len() as u32,
            columns: 0,
            spacing: 0,
            margin: 0,
            grid: None,
            image: None,
            properties: Properties::new(),
            tiles: ids
                .iter()
                .map(|&id| Tile {
                    id,
                    class: None,
                    image: None,
                    properties: Properties::new(),
                    animation: if id == ids[0] { animation.clone() } else { None },
                })
                .collect(),
            index: HashMap::new(),
        }
    }

    #[test]
    fn finish_rejects_duplicate_ids() {
        let err = bare_tileset(&[0, 1, 1], None)
            .finish(&LoadOptions::default())
            .expect_err("duplicate must fail");
        assert!(matches!(err, TilesetError::DuplicateTile { id: 1 }));
    }

    #[test]
    fn dangling_frames_are_reported_and_optionally_rejected() {
        let a = Animation::new(vec![
            Frame { tile_id: 0, duration_ms: 10 },
            Frame { tile_id: 9, duration_ms: 10 },
        ]);
        let ts = bare_tileset(&[0, 1], Some(a.clone()))
            .finish(&LoadOptions::default())
            .expect("lenient load");
        assert_eq!(ts.dangling_frames(), vec![(0, 1, 9)]);

        let err = bare_tileset(&[0, 1], Some(a))
            .finish(&LoadOptions::default().strict_frames(true))
            .expect_err("strict load must fail");
        assert!(matches!(
            err,
            TilesetError::DanglingFrame { tile: 0, frame_tile: 9 }
        ));
    }
}
