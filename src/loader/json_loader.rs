// src/loader/json_loader.rs
use crate::error::TilesetError;
use crate::loader::LoadOptions;
use crate::properties::Properties;
use crate::tileset::*;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::path::Path;

#[derive(Deserialize)]
struct JsonTileset {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: Option<JsonValue>, // string since 1.2, number before
    #[serde(default)]
    tiledversion: Option<String>,
    tilewidth: Option<u32>,
    tileheight: Option<u32>,
    tilecount: Option<u32>,
    columns: Option<u32>,
    #[serde(default)]
    spacing: u32,
    #[serde(default)]
    margin: u32,
    #[serde(default)]
    grid: Option<JsonGrid>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    imagewidth: Option<u32>,
    #[serde(default)]
    imageheight: Option<u32>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
    #[serde(default)]
    tiles: Vec<JsonTile>,
}

#[derive(Deserialize)]
struct JsonGrid {
    #[serde(default = "orthogonal")]
    orientation: String,
    width: Option<u32>,
    height: Option<u32>,
}

fn orthogonal() -> String {
    "orthogonal".to_owned()
}

#[derive(Deserialize)]
struct JsonProperty {
    name: Option<String>,
    #[serde(default)]
    value: JsonValue,
}

#[derive(Deserialize)]
struct JsonTile {
    id: Option<u32>,
    #[serde(default)]
    class: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    imagewidth: Option<u32>,
    #[serde(default)]
    imageheight: Option<u32>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
    #[serde(default)]
    animation: Vec<JsonFrame>,
}

#[derive(Deserialize)]
struct JsonFrame {
    tileid: Option<u32>,
    duration: Option<u32>,
}

fn required<T>(
    value: Option<T>,
    element: &'static str,
    attribute: &'static str,
    tile: Option<u32>,
) -> Result<T, TilesetError> {
    value.ok_or(TilesetError::MissingAttribute {
        element,
        attribute,
        tile,
    })
}

fn value_to_text(value: JsonValue) -> String {
    match value {
        JsonValue::String(s) => s,
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

fn properties_from_json(
    props: Vec<JsonProperty>,
    tile: Option<u32>,
) -> Result<Properties, TilesetError> {
    let mut out = Properties::new();
    for p in props {
        let name = required(p.name, "property", "name", tile)?;
        out.insert(name, value_to_text(p.value));
    }
    Ok(out)
}

fn image_from_json(
    source: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
) -> Option<TileImage> {
    source.map(|source| TileImage {
        source,
        width,
        height,
    })
}

fn tile_from_json(tile: JsonTile) -> Result<Tile, TilesetError> {
    let id = required(tile.id, "tile", "id", None)?;
    let frames = tile
        .animation
        .into_iter()
        .map(|f| -> Result<Frame, TilesetError> {
            Ok(Frame {
                tile_id: required(f.tileid, "frame", "tileid", Some(id))?,
                duration_ms: required(f.duration, "frame", "duration", Some(id))?,
            })
        })
        .collect::<Result<Vec<_>, TilesetError>>()?;
    let animation = (!frames.is_empty()).then(|| Animation::new(frames));

    Ok(Tile {
        id,
        class: tile.class.or(tile.kind).filter(|c| !c.is_empty()),
        image: image_from_json(tile.image, tile.imagewidth, tile.imageheight),
        properties: properties_from_json(tile.properties, Some(id))?,
        animation,
    })
}

/// Parses Tiled's JSON tileset export. `path` is only used to label errors.
pub fn decode_json_str(
    text: &str,
    path: &Path,
    options: &LoadOptions,
) -> Result<Tileset, TilesetError> {
    let j: JsonTileset = serde_json::from_str(text).map_err(|source| TilesetError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let tiles = j
        .tiles
        .into_iter()
        .map(tile_from_json)
        .collect::<Result<Vec<_>, _>>()?;

    let grid = j
        .grid
        .map(|g| -> Result<Grid, TilesetError> {
            Ok(Grid {
                orientation: g.orientation,
                width: required(g.width, "grid", "width", None)?,
                height: required(g.height, "grid", "height", None)?,
            })
        })
        .transpose()?;

    let tileset = Tileset {
        name: j.name,
        version: j.version.map(value_to_text),
        tiled_version: j.tiledversion,
        tile_width: required(j.tilewidth, "tileset", "tilewidth", None)?,
        tile_height: required(j.tileheight, "tileset", "tileheight", None)?,
        tile_count: required(j.tilecount, "tileset", "tilecount", None)?,
        columns: required(j.columns, "tileset", "columns", None)?,
        spacing: j.spacing,
        margin: j.margin,
        grid,
        image: image_from_json(j.image, j.imagewidth, j.imageheight),
        properties: properties_from_json(j.properties, None)?,
        tiles,
        index: HashMap::new(),
    };
    tileset.finish(options)
}
