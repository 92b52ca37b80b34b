use crate::gid::{DecodedTile, Gid};
use crate::property::Properties;
use crate::tileset::Image;

/// Raw `<data>` element of a tile layer, as found in the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Data {
    /// `csv`, `base64`, or `None` for `<tile>` records.
    pub encoding: Option<String>,
    /// `zlib`, `gzip`, or `None`. Only read for base64.
    pub compression: Option<String>,
    /// Text content (CSV or base64).
    pub raw: String,
    /// `<tile gid=".."/>` records, only used without an encoding.
    pub tiles: Vec<Gid>,
}

/// Which tilesets a layer's non-nil tiles come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TilesetUsage {
    /// Every tile is nil.
    #[default]
    Empty,
    /// Every non-nil tile belongs to the tileset at this index.
    Single(usize),
    /// Tiles come from more than one tileset.
    Multiple,
}

impl TilesetUsage {
    pub(crate) fn of(tiles: &[DecodedTile]) -> Self {
        let mut usage = TilesetUsage::Empty;
        for ts in tiles.iter().filter_map(|t| t.tileset) {
            match usage {
                TilesetUsage::Empty => usage = TilesetUsage::Single(ts),
                TilesetUsage::Single(current) if current != ts => return TilesetUsage::Multiple,
                _ => {}
            }
        }
        usage
    }
}

/// A tile layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Layer name.
    pub name: String,
    /// 0.0 to 1.0, defaults to 1.0.
    pub opacity: f32,
    /// Defaults to true.
    pub visible: bool,
    /// Horizontal draw offset in pixels.
    pub offset_x: f32,
    /// Vertical draw offset in pixels.
    pub offset_y: f32,
    /// Custom properties.
    pub properties: Properties,
    /// The payload as found in the document.
    pub data: Data,
    /// Resolved tiles; cell `(x, y)` lives at `y * width + x`.
    pub decoded_tiles: Vec<DecodedTile>,
    pub(crate) width: u32,
    pub(crate) usage: TilesetUsage,
}

impl Layer {
    pub(crate) fn new(name: String, data: Data) -> Self {
        Layer {
            name,
            opacity: 1.0,
            visible: true,
            offset_x: 0.0,
            offset_y: 0.0,
            properties: Properties::new(),
            data,
            decoded_tiles: Vec::new(),
            width: 0,
            usage: TilesetUsage::Empty,
        }
    }

    /// Index of the only tileset used by this layer. `None` if the layer is
    /// empty or mixes tilesets.
    pub fn tileset(&self) -> Option<usize> {
        match self.usage {
            TilesetUsage::Single(index) => Some(index),
            _ => None,
        }
    }

    /// True when every tile is nil.
    pub fn is_empty(&self) -> bool {
        self.usage == TilesetUsage::Empty
    }

    /// True when tiles come from more than one tileset.
    pub fn uses_multiple_tilesets(&self) -> bool {
        self.usage == TilesetUsage::Multiple
    }

    /// Which tilesets the layer draws from.
    pub fn tileset_usage(&self) -> TilesetUsage {
        self.usage
    }

    /// Tile at cell `(x, y)`, `None` outside the grid.
    pub fn tile(&self, x: u32, y: u32) -> Option<&DecodedTile> {
        if x >= self.width {
            return None;
        }
        self.decoded_tiles
            .get(y as usize * self.width as usize + x as usize)
    }

    /// Every cell in row-major order as `(x, y, tile)`.
    pub fn tiles(&self) -> impl Iterator<Item = (u32, u32, &DecodedTile)> + '_ {
        let width = self.width.max(1);
        self.decoded_tiles
            .iter()
            .enumerate()
            .map(move |(i, t)| (i as u32 % width, i as u32 / width, t))
    }
}

/// An `<imagelayer>`: a single image placed on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageLayer {
    /// Layer name.
    pub name: String,
    /// Horizontal draw offset in pixels.
    pub offset_x: f32,
    /// Vertical draw offset in pixels.
    pub offset_y: f32,
    /// 0.0 to 1.0, defaults to 1.0.
    pub opacity: f32,
    /// Defaults to true.
    pub visible: bool,
    /// Locked for editing in Tiled.
    pub locked: bool,
    /// The image to place, if one is set.
    pub image: Option<Image>,
    /// Custom properties.
    pub properties: Properties,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(ts: usize) -> DecodedTile {
        DecodedTile {
            tileset: Some(ts),
            nil: false,
            ..DecodedTile::NIL
        }
    }

    #[test]
    fn usage_of_all_nil_is_empty() {
        assert_eq!(TilesetUsage::of(&[DecodedTile::NIL; 4]), TilesetUsage::Empty);
        assert_eq!(TilesetUsage::of(&[]), TilesetUsage::Empty);
    }

    #[test]
    fn usage_ignores_nil_tiles() {
        let tiles = [DecodedTile::NIL, tile(2), DecodedTile::NIL, tile(2)];
        assert_eq!(TilesetUsage::of(&tiles), TilesetUsage::Single(2));
    }

    #[test]
    fn usage_of_mixed_tilesets_is_multiple() {
        let tiles = [tile(0), DecodedTile::NIL, tile(1), tile(0)];
        assert_eq!(TilesetUsage::of(&tiles), TilesetUsage::Multiple);
    }

    #[test]
    fn grid_access_is_row_major() {
        let mut layer = Layer::new("ground".into(), Data::default());
        layer.width = 2;
        layer.decoded_tiles = vec![DecodedTile::NIL, tile(0), tile(1), DecodedTile::NIL];

        assert_eq!(layer.tile(1, 0), Some(&tile(0)));
        assert_eq!(layer.tile(0, 1), Some(&tile(1)));
        assert_eq!(layer.tile(2, 0), None);
        assert_eq!(layer.tile(0, 2), None);

        let coords: Vec<_> = layer.tiles().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords, [(0, 0), (1, 0), (0, 1), (1, 1)]);
    }
}
