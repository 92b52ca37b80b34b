// src/loader/tmx_loader.rs
use crate::error::MapError;
use crate::gid::Gid;
use crate::layer::{Data, ImageLayer, Layer};
use crate::map::Map;
use crate::object::{Object, ObjectGroup, ObjectShape, Polygon, Polyline};
use crate::property::{Properties, Property};
use crate::tileset::{Image, Tile, Tileset};
use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize)]
struct TmxMap {
    #[serde(rename = "@version", default)]
    version: String,
    #[serde(rename = "@tiledversion")]
    tiled_version: Option<String>,
    #[serde(rename = "@orientation", default)]
    orientation: String,
    #[serde(rename = "@renderorder")]
    render_order: Option<String>,
    #[serde(rename = "@width")]
    width: u32,
    #[serde(rename = "@height")]
    height: u32,
    #[serde(rename = "@tilewidth")]
    tilewidth: u32,
    #[serde(rename = "@tileheight")]
    tileheight: u32,
    #[serde(rename = "@infinite", default)]
    infinite: bool,
    #[serde(rename = "@backgroundcolor")]
    background_color: Option<String>,
    #[serde(default)]
    properties: TmxProperties,
    #[serde(rename = "tileset", default)]
    tilesets: Vec<TmxTileset>,
    #[serde(rename = "layer", default)]
    layers: Vec<TmxLayer>,
    #[serde(rename = "objectgroup", default)]
    object_groups: Vec<TmxObjectGroup>,
    #[serde(rename = "imagelayer", default)]
    image_layers: Vec<TmxImageLayer>,
}

fn default_true() -> bool {
    true
}
fn one() -> f32 {
    1.0
}

#[derive(Deserialize, Default)]
struct TmxProperties {
    #[serde(default)]
    property: Vec<TmxProperty>,
}

#[derive(Deserialize)]
struct TmxProperty {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@type")]
    kind: Option<String>,
    #[serde(rename = "@value")]
    value: Option<String>,
    // multi-line string values are written as element text instead of `value`
    #[serde(rename = "$text")]
    text: Option<String>,
}

#[derive(Deserialize)]
struct TmxImage {
    #[serde(rename = "@source", default)]
    source: String,
    #[serde(rename = "@trans")]
    trans: Option<String>,
    #[serde(rename = "@width", default)]
    width: u32,
    #[serde(rename = "@height", default)]
    height: u32,
}

#[derive(Deserialize)]
struct TmxTile {
    #[serde(rename = "@id")]
    id: u32,
    #[serde(rename = "@type")]
    kind: Option<String>,
    #[serde(rename = "@class")]
    class: Option<String>,
    image: Option<TmxImage>,
    #[serde(default)]
    properties: TmxProperties,
}

#[derive(Deserialize)]
struct TmxTileset {
    #[serde(rename = "@firstgid")]
    firstgid: u32,
    #[serde(rename = "@source")]
    source: Option<String>,
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@tilewidth", default)]
    tilewidth: u32,
    #[serde(rename = "@tileheight", default)]
    tileheight: u32,
    #[serde(rename = "@spacing", default)]
    spacing: u32,
    #[serde(rename = "@margin", default)]
    margin: u32,
    #[serde(rename = "@tilecount", default)]
    tilecount: u32,
    #[serde(rename = "@columns", default)]
    columns: u32,
    image: Option<TmxImage>,
    #[serde(rename = "tile", default)]
    tiles: Vec<TmxTile>,
    #[serde(default)]
    properties: TmxProperties,
}

#[derive(Deserialize)]
struct TmxDataTile {
    // Tiled omits the attribute for empty cells
    #[serde(rename = "@gid", default)]
    gid: u32,
}

#[derive(Deserialize, Default)]
struct TmxData {
    #[serde(rename = "@encoding")]
    encoding: Option<String>,
    #[serde(rename = "@compression")]
    compression: Option<String>,
    #[serde(rename = "$text", default)]
    text: String,
    #[serde(rename = "tile", default)]
    tiles: Vec<TmxDataTile>,
}

#[derive(Deserialize)]
struct TmxLayer {
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@opacity", default = "one")]
    opacity: f32,
    #[serde(rename = "@visible", default = "default_true")]
    visible: bool,
    #[serde(rename = "@offsetx", default)]
    offsetx: f32,
    #[serde(rename = "@offsety", default)]
    offsety: f32,
    #[serde(default)]
    properties: TmxProperties,
    #[serde(default)]
    data: TmxData,
}

#[derive(Deserialize)]
struct TmxPoints {
    #[serde(rename = "@points", default)]
    points: String,
}

/// `<ellipse/>` and `<point/>` carry no data of their own.
#[derive(Deserialize)]
struct TmxMarker {}

#[derive(Deserialize)]
struct TmxObject {
    #[serde(rename = "@id", default)]
    id: u32,
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@type")]
    kind: Option<String>,
    #[serde(rename = "@class")]
    class: Option<String>,
    #[serde(rename = "@x", default)]
    x: f32,
    #[serde(rename = "@y", default)]
    y: f32,
    #[serde(rename = "@width", default)]
    width: f32,
    #[serde(rename = "@height", default)]
    height: f32,
    #[serde(rename = "@rotation", default)]
    rotation: f32,
    #[serde(rename = "@gid")]
    gid: Option<u32>,
    #[serde(rename = "@visible", default = "default_true")]
    visible: bool,
    polygon: Option<TmxPoints>,
    polyline: Option<TmxPoints>,
    ellipse: Option<TmxMarker>,
    point: Option<TmxMarker>,
    #[serde(default)]
    properties: TmxProperties,
}

#[derive(Deserialize)]
struct TmxObjectGroup {
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@color")]
    color: Option<String>,
    #[serde(rename = "@opacity", default = "one")]
    opacity: f32,
    #[serde(rename = "@visible", default = "default_true")]
    visible: bool,
    #[serde(rename = "@offsetx", default)]
    offsetx: f32,
    #[serde(rename = "@offsety", default)]
    offsety: f32,
    #[serde(default)]
    properties: TmxProperties,
    #[serde(rename = "object", default)]
    objects: Vec<TmxObject>,
}

#[derive(Deserialize)]
struct TmxImageLayer {
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@offsetx", default)]
    offsetx: f32,
    #[serde(rename = "@offsety", default)]
    offsety: f32,
    #[serde(rename = "@opacity", default = "one")]
    opacity: f32,
    #[serde(rename = "@visible", default = "default_true")]
    visible: bool,
    #[serde(rename = "@locked", default)]
    locked: bool,
    image: Option<TmxImage>,
    #[serde(default)]
    properties: TmxProperties,
}

fn properties_from_tmx(props: TmxProperties) -> Properties {
    props
        .property
        .into_iter()
        .map(|p| Property {
            name: p.name,
            kind: p.kind,
            value: p.value.or(p.text).unwrap_or_default(),
        })
        .collect()
}

fn image_from_tmx(img: TmxImage) -> Image {
    Image {
        source: img.source,
        trans: img.trans,
        width: img.width,
        height: img.height,
    }
}

fn tileset_from_tmx(ts: TmxTileset) -> Tileset {
    Tileset {
        first_gid: ts.firstgid,
        source: ts.source,
        name: ts.name,
        tile_width: ts.tilewidth,
        tile_height: ts.tileheight,
        spacing: ts.spacing,
        margin: ts.margin,
        tile_count: ts.tilecount,
        columns: ts.columns,
        image: ts.image.map(image_from_tmx),
        tiles: ts
            .tiles
            .into_iter()
            .map(|tile| Tile {
                id: tile.id,
                kind: tile.class.or(tile.kind).unwrap_or_default(),
                image: tile.image.map(image_from_tmx),
                properties: properties_from_tmx(tile.properties),
            })
            .collect(),
        properties: properties_from_tmx(ts.properties),
    }
}

fn layer_from_tmx(l: TmxLayer) -> Layer {
    let data = Data {
        encoding: l.data.encoding,
        compression: l.data.compression,
        raw: l.data.text,
        tiles: l.data.tiles.into_iter().map(|t| Gid(t.gid)).collect(),
    };

    let mut layer = Layer::new(l.name, data);
    layer.opacity = l.opacity;
    layer.visible = l.visible;
    layer.offset_x = l.offsetx;
    layer.offset_y = l.offsety;
    layer.properties = properties_from_tmx(l.properties);
    layer
}

fn object_from_tmx(obj: TmxObject) -> Object {
    let shape = if let Some(p) = obj.polygon {
        ObjectShape::Polygon(Polygon { points: p.points })
    } else if let Some(p) = obj.polyline {
        ObjectShape::Polyline(Polyline { points: p.points })
    } else if obj.ellipse.is_some() {
        ObjectShape::Ellipse
    } else if obj.point.is_some() {
        ObjectShape::Point
    } else {
        ObjectShape::Rectangle
    };

    Object {
        id: obj.id,
        name: obj.name,
        kind: obj.class.or(obj.kind).unwrap_or_default(),
        x: obj.x,
        y: obj.y,
        width: obj.width,
        height: obj.height,
        rotation: obj.rotation,
        gid: obj.gid.map(Gid),
        tile: None,
        visible: obj.visible,
        properties: properties_from_tmx(obj.properties),
        shape,
    }
}

fn object_group_from_tmx(g: TmxObjectGroup) -> ObjectGroup {
    ObjectGroup {
        name: g.name,
        color: g.color,
        opacity: g.opacity,
        visible: g.visible,
        offset_x: g.offsetx,
        offset_y: g.offsety,
        properties: properties_from_tmx(g.properties),
        objects: g.objects.into_iter().map(object_from_tmx).collect(),
    }
}

fn image_layer_from_tmx(l: TmxImageLayer) -> ImageLayer {
    ImageLayer {
        name: l.name,
        offset_x: l.offsetx,
        offset_y: l.offsety,
        opacity: l.opacity,
        visible: l.visible,
        locked: l.locked,
        image: l.image.map(image_from_tmx),
        properties: properties_from_tmx(l.properties),
    }
}

/// Structural parse of a TMX document.
///
/// The returned map still has undecoded layers: `decoded_tiles` is empty and
/// object tiles are unresolved. [`Map::load_from_str`] runs the rest.
pub fn decode_tmx_str(xml: &str) -> Result<Map, MapError> {
    let t: TmxMap = quick_xml::de::from_str(xml)?;

    debug!(
        width = t.width,
        height = t.height,
        tilesets = t.tilesets.len(),
        layers = t.layers.len(),
        object_groups = t.object_groups.len(),
        "parsed TMX document"
    );

    Ok(Map {
        version: t.version,
        tiled_version: t.tiled_version,
        orientation: t.orientation,
        render_order: t.render_order,
        width: t.width,
        height: t.height,
        tile_width: t.tilewidth,
        tile_height: t.tileheight,
        infinite: t.infinite,
        background_color: t.background_color,
        properties: properties_from_tmx(t.properties),
        tilesets: t.tilesets.into_iter().map(tileset_from_tmx).collect(),
        layers: t.layers.into_iter().map(layer_from_tmx).collect(),
        object_groups: t.object_groups.into_iter().map(object_group_from_tmx).collect(),
        image_layers: t.image_layers.into_iter().map(image_layer_from_tmx).collect(),
    })
}
