#![warn(missing_docs)]

//! Tiled TMX loader for Macroquad.
//!
//! Parses a TMX document, decodes every tile layer (XML, CSV or base64 with
//! optional zlib/gzip compression) and resolves each GID to its tileset, local
//! tile id and flip flags. Drawing is left to the caller.
//!
//! ```no_run
//! use macroquad_tiled_tmx::Map;
//!
//! let map = Map::load_from_file("assets/level.tmx")?;
//! let ground = map.layer_by_name("ground").expect("ground layer");
//! for (x, y, tile) in ground.tiles() {
//!     if let Some(tileset) = map.tileset_of(tile) {
//!         println!("({x}, {y}) -> {} #{}", tileset.name, tile.id);
//!     }
//! }
//! # Ok::<(), macroquad_tiled_tmx::MapError>(())
//! ```

mod config;
mod error;
mod geometry;
mod gid;
mod layer;
mod loader {
    pub mod payload;
    pub mod tmx_loader;
}
mod map;
mod object;
mod property;
mod tileset;

pub use config::{LoadOptions, TilesetOrder};
pub use error::{InvalidGidError, MapError, PayloadError, PointsError};
pub use geometry::{decode_points, Point};
pub use gid::{resolve_gid, DecodedTile, Gid, FLIP_D, FLIP_H, FLIP_MASK, FLIP_V, GID_MASK};
pub use layer::{Data, ImageLayer, Layer, TilesetUsage};
pub use loader::payload::{decode_layer_payload, Compression, Encoding};
pub use map::Map;
pub use object::{Ellipse, Object, ObjectGroup, ObjectShape, Polygon, Polyline, ShapeKind};
pub use property::{Properties, Property};
pub use tileset::{Image, Tile, Tileset};
