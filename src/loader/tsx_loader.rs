// src/loader/tsx_loader.rs
use crate::error::TilesetError;
use crate::loader::LoadOptions;
use crate::properties::Properties;
use crate::tileset::*;
use roxmltree::{Document, Node};
use std::collections::HashMap;
use std::path::Path;

fn attr(node: Node, name: &str) -> Option<String> {
    node.attribute(name).map(str::to_owned)
}

fn required(
    node: Node,
    element: &'static str,
    attribute: &'static str,
    tile: Option<u32>,
) -> Result<String, TilesetError> {
    attr(node, attribute).ok_or(TilesetError::MissingAttribute {
        element,
        attribute,
        tile,
    })
}

fn number(
    node: Node,
    element: &'static str,
    attribute: &'static str,
    tile: Option<u32>,
) -> Result<Option<u32>, TilesetError> {
    let Some(value) = attr(node, attribute) else {
        return Ok(None);
    };
    match value.trim().parse() {
        Ok(n) => Ok(Some(n)),
        Err(source) => Err(TilesetError::InvalidNumber {
            element,
            attribute,
            value,
            tile,
            source,
        }),
    }
}

fn required_number(
    node: Node,
    element: &'static str,
    attribute: &'static str,
    tile: Option<u32>,
) -> Result<u32, TilesetError> {
    number(node, element, attribute, tile)?.ok_or(TilesetError::MissingAttribute {
        element,
        attribute,
        tile,
    })
}

fn children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |c| c.is_element() && c.tag_name().name() == tag)
}

fn parse_properties(node: Node, tile: Option<u32>) -> Result<Properties, TilesetError> {
    let mut out = Properties::new();
    for props in children(node, "properties") {
        for p in children(props, "property") {
            let name = required(p, "property", "name", tile)?;
            // Multi-line strings are stored as element text instead of `value`.
            let value = attr(p, "value")
                .or_else(|| p.text().map(str::to_owned))
                .unwrap_or_default();
            out.insert(name, value);
        }
    }
    Ok(out)
}

fn parse_image(node: Node, tile: Option<u32>) -> Result<TileImage, TilesetError> {
    Ok(TileImage {
        source: required(node, "image", "source", tile)?,
        width: number(node, "image", "width", tile)?,
        height: number(node, "image", "height", tile)?,
    })
}

fn parse_animation(node: Node, tile: u32) -> Result<Animation, TilesetError> {
    let frames = children(node, "frame")
        .map(|f| -> Result<Frame, TilesetError> {
            Ok(Frame {
                tile_id: required_number(f, "frame", "tileid", Some(tile))?,
                duration_ms: required_number(f, "frame", "duration", Some(tile))?,
            })
        })
        .collect::<Result<Vec<_>, TilesetError>>()?;
    Ok(Animation::new(frames))
}

fn parse_tile(node: Node) -> Result<Tile, TilesetError> {
    let id = required_number(node, "tile", "id", None)?;
    let tile = Some(id);

    let image = children(node, "image")
        .next()
        .map(|n| parse_image(n, tile))
        .transpose()?;
    let animation = children(node, "animation")
        .next()
        .map(|n| parse_animation(n, id))
        .transpose()?
        .filter(|a| !a.is_empty());

    Ok(Tile {
        id,
        class: attr(node, "class").or_else(|| attr(node, "type")),
        image,
        properties: parse_properties(node, tile)?,
        animation,
    })
}

fn parse_grid(node: Node) -> Result<Grid, TilesetError> {
    Ok(Grid {
        orientation: attr(node, "orientation").unwrap_or_else(|| "orthogonal".to_owned()),
        width: required_number(node, "grid", "width", None)?,
        height: required_number(node, "grid", "height", None)?,
    })
}

/// Parses `.tsx` text. `path` is only used to label errors.
pub fn decode_tsx_str(
    text: &str,
    path: &Path,
    options: &LoadOptions,
) -> Result<Tileset, TilesetError> {
    let doc = Document::parse(text).map_err(|source| TilesetError::Xml {
        path: path.to_path_buf(),
        source,
    })?;

    let root = doc.root_element();
    if root.tag_name().name() != "tileset" {
        return Err(TilesetError::UnexpectedRoot {
            found: root.tag_name().name().to_owned(),
        });
    }

    let tiles = children(root, "tile")
        .map(parse_tile)
        .collect::<Result<Vec<_>, _>>()?;

    let grid = children(root, "grid").next().map(parse_grid).transpose()?;
    let image = children(root, "image")
        .next()
        .map(|n| parse_image(n, None))
        .transpose()?;

    let tileset = Tileset {
        name: attr(root, "name").unwrap_or_default(),
        version: attr(root, "version"),
        tiled_version: attr(root, "tiledversion"),
        tile_width: required_number(root, "tileset", "tilewidth", None)?,
        tile_height: required_number(root, "tileset", "tileheight", None)?,
        tile_count: required_number(root, "tileset", "tilecount", None)?,
        columns: required_number(root, "tileset", "columns", None)?,
        spacing: number(root, "tileset", "spacing", None)?.unwrap_or(0),
        margin: number(root, "tileset", "margin", None)?.unwrap_or(0),
        grid,
        image,
        properties: parse_properties(root, None)?,
        tiles,
        index: HashMap::new(),
    };
    tileset.finish(options)
}
