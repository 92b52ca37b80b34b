use std::io::Read;
use std::path::Path;

use tracing::{debug, trace};

use crate::config::{LoadOptions, TilesetOrder};
use crate::error::MapError;
use crate::gid::{resolve_gid, DecodedTile};
use crate::layer::{ImageLayer, Layer, TilesetUsage};
use crate::loader::payload::decode_layer_payload;
use crate::loader::tmx_loader::decode_tmx_str;
use crate::object::ObjectGroup;
use crate::property::Properties;
use crate::tileset::Tileset;

/// A fully decoded TMX map.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    /// TMX format version.
    pub version: String,
    /// Version of Tiled that saved the file.
    pub tiled_version: Option<String>,
    /// `orthogonal`, `isometric`, `staggered` or `hexagonal`.
    pub orientation: String,
    /// e.g. `right-down`.
    pub render_order: Option<String>,
    /// Width in tiles, not pixels.
    pub width: u32,
    /// Height in tiles, not pixels.
    pub height: u32,
    /// Grid cell width in pixels.
    pub tile_width: u32,
    /// Grid cell height in pixels.
    pub tile_height: u32,
    /// Always false on a loaded map.
    pub infinite: bool,
    /// e.g. `"#202040"`.
    pub background_color: Option<String>,
    /// Custom properties.
    pub properties: Properties,
    /// Sorted by `first_gid`.
    pub tilesets: Vec<Tileset>,
    /// Tile layers in document order.
    pub layers: Vec<Layer>,
    /// Object groups in document order.
    pub object_groups: Vec<ObjectGroup>,
    /// Image layers in document order.
    pub image_layers: Vec<ImageLayer>,
}

impl Map {
    /// Parse and decode a TMX document held in memory.
    pub fn load_from_str(xml: &str) -> Result<Self, MapError> {
        Self::load_from_str_with(xml, &LoadOptions::default())
    }

    /// [`Map::load_from_str`] with explicit options.
    pub fn load_from_str_with(xml: &str, options: &LoadOptions) -> Result<Self, MapError> {
        decode_tmx_str(xml)?.assemble(options)
    }

    /// Read the whole document from `reader`, then load it.
    pub fn load_from_reader<R: Read>(reader: R) -> Result<Self, MapError> {
        Self::load_from_reader_with(reader, &LoadOptions::default())
    }

    /// [`Map::load_from_reader`] with explicit options.
    pub fn load_from_reader_with<R: Read>(mut reader: R, options: &LoadOptions) -> Result<Self, MapError> {
        let mut xml = String::new();
        reader.read_to_string(&mut xml).map_err(MapError::Read)?;
        Self::load_from_str_with(&xml, options)
    }

    /// Load a `.tmx` file. External tilesets and images are not read.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        Self::load_from_file_with(path, &LoadOptions::default())
    }

    /// [`Map::load_from_file`] with explicit options.
    pub fn load_from_file_with<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self, MapError> {
        let p = path.as_ref();
        debug!(path = %p.display(), "loading TMX map");

        let xml = std::fs::read_to_string(p).map_err(|source| MapError::Io {
            path: p.to_path_buf(),
            source,
        })?;
        Self::load_from_str_with(&xml, options)
    }

    fn assemble(mut self, options: &LoadOptions) -> Result<Self, MapError> {
        if self.infinite {
            return Err(MapError::InfiniteMap);
        }

        self.order_tilesets(options.tileset_order)?;

        for layer in &mut self.layers {
            let gids = decode_layer_payload(&layer.data, self.width, self.height).map_err(|source| {
                MapError::Payload {
                    layer: layer.name.clone(),
                    source,
                }
            })?;

            let mut tiles = Vec::with_capacity(gids.len());
            for (index, gid) in gids.into_iter().enumerate() {
                let tile = resolve_gid(gid, &self.tilesets).map_err(|_| MapError::InvalidTileGid {
                    layer: layer.name.clone(),
                    index,
                    gid: gid.raw(),
                })?;
                tiles.push(tile);
            }

            layer.usage = TilesetUsage::of(&tiles);
            layer.decoded_tiles = tiles;
            layer.width = self.width;
            trace!(layer = %layer.name, usage = ?layer.usage, "decoded tile layer");
        }

        for group in &mut self.object_groups {
            for object in &mut group.objects {
                let Some(gid) = object.gid else { continue };
                let tile = resolve_gid(gid, &self.tilesets).map_err(|_| MapError::InvalidObjectGid {
                    group: group.name.clone(),
                    object_id: object.id,
                    gid: gid.raw(),
                })?;
                object.tile = Some(tile);
            }
        }

        debug!(
            layers = self.layers.len(),
            tilesets = self.tilesets.len(),
            object_groups = self.object_groups.len(),
            "assembled map"
        );
        Ok(self)
    }

    fn order_tilesets(&mut self, order: TilesetOrder) -> Result<(), MapError> {
        match order {
            TilesetOrder::Validate => {
                for pair in self.tilesets.windows(2) {
                    if pair[0].first_gid >= pair[1].first_gid {
                        return Err(MapError::UnorderedTilesets {
                            previous: pair[0].first_gid,
                            next: pair[1].first_gid,
                        });
                    }
                }
            }
            TilesetOrder::Sort => self.tilesets.sort_by_key(|ts| ts.first_gid),
        }
        Ok(())
    }

    /// First tile layer called `name`.
    pub fn layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// First object group called `name`.
    pub fn object_group_by_name(&self, name: &str) -> Option<&ObjectGroup> {
        self.object_groups.iter().find(|g| g.name == name)
    }

    /// First image layer called `name`.
    pub fn image_layer_by_name(&self, name: &str) -> Option<&ImageLayer> {
        self.image_layers.iter().find(|l| l.name == name)
    }

    /// First tileset called `name`.
    pub fn tileset_by_name(&self, name: &str) -> Option<&Tileset> {
        self.tilesets.iter().find(|t| t.name == name)
    }

    /// The tileset a decoded tile belongs to; `None` for the nil tile.
    pub fn tileset_of(&self, tile: &DecodedTile) -> Option<&Tileset> {
        tile.tileset.and_then(|i| self.tilesets.get(i))
    }

    /// The single tileset a layer draws from, if it uses exactly one.
    pub fn layer_tileset(&self, layer: &Layer) -> Option<&Tileset> {
        layer.tileset().and_then(|i| self.tilesets.get(i))
    }

    /// Map width in pixels, saturating at `u32::MAX`.
    pub fn pixel_width(&self) -> u32 {
        self.width.saturating_mul(self.tile_width)
    }

    /// Map height in pixels, saturating at `u32::MAX`.
    pub fn pixel_height(&self) -> u32 {
        self.height.saturating_mul(self.tile_height)
    }
}
