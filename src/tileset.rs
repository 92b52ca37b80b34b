use crate::property::Properties;

/// Reference to an external image file. Pixel data is never loaded here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Image {
    /// Path as written in the document, relative to the map or tileset file.
    pub source: String,
    /// Colour treated as transparent, e.g. `"ff00ff"`.
    pub trans: Option<String>,
    /// Declared width in pixels, 0 if absent.
    pub width: u32,
    /// Declared height in pixels, 0 if absent.
    pub height: u32,
}

/// Per-tile metadata inside a tileset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tile {
    /// Local id within the tileset.
    pub id: u32,
    /// The `type` (or `class`) attribute.
    pub kind: String,
    /// Own image, for image-collection tilesets.
    pub image: Option<Image>,
    /// Custom properties.
    pub properties: Properties,
}

/// One tile atlas. Owns the GIDs from `first_gid` up to the next tileset's `first_gid`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tileset {
    /// First GID owned by this tileset.
    pub first_gid: u32,
    /// Path of an external `.tsx` file, if the tileset is not embedded.
    pub source: Option<String>,
    /// Tileset name.
    pub name: String,
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// Pixels between tiles in the atlas.
    pub spacing: u32,
    /// Pixels around the atlas edge.
    pub margin: u32,
    /// Number of tiles, from `tilecount`.
    pub tile_count: u32,
    /// Tiles per atlas row.
    pub columns: u32,
    /// Atlas image.
    pub image: Option<Image>,
    /// Only tiles that carry metadata are listed.
    pub tiles: Vec<Tile>,
    /// Custom properties.
    pub properties: Properties,
}

impl Tileset {
    /// Metadata for local tile `id`, if the tileset declares any.
    pub fn tile(&self, id: u32) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    /// Whether the bare `gid` falls inside this tileset's declared range.
    pub fn contains(&self, gid: u32) -> bool {
        gid >= self.first_gid && gid - self.first_gid < self.tile_count
    }

    /// Atlas rows, rounding a partial last row up.
    pub fn rows(&self) -> u32 {
        if self.columns == 0 {
            0
        } else {
            self.tile_count.div_ceil(self.columns)
        }
    }
}
