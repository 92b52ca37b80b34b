use serde::Deserialize;

/// How the loader treats the order of `<tileset>` elements.
///
/// GID resolution walks tilesets from the highest `firstgid` down, which is only
/// correct on a list sorted by `firstgid`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TilesetOrder {
    /// Fail with [`MapError::UnorderedTilesets`](crate::MapError::UnorderedTilesets)
    /// unless first GIDs are strictly ascending.
    #[default]
    Validate,
    /// Stable-sort tilesets by first GID before resolving.
    Sort,
}

/// Options for [`Map::load_from_str_with`](crate::Map::load_from_str_with) and friends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// What to do when tilesets are not sorted by first GID.
    pub tileset_order: TilesetOrder,
}

impl LoadOptions {
    /// Builder-style setter for [`LoadOptions::tileset_order`].
    pub fn tileset_order(mut self, order: TilesetOrder) -> Self {
        self.tileset_order = order;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::value::{Error as ValueError, MapDeserializer};

    fn from_pairs(pairs: Vec<(&'static str, &'static str)>) -> Result<LoadOptions, ValueError> {
        LoadOptions::deserialize(MapDeserializer::<_, ValueError>::new(pairs.into_iter()))
    }

    #[test]
    fn defaults_to_validation() {
        assert_eq!(LoadOptions::default().tileset_order, TilesetOrder::Validate);
        assert_eq!(from_pairs(vec![]).unwrap(), LoadOptions::default());
    }

    #[test]
    fn reads_order_from_host_config() {
        let opts = from_pairs(vec![("tileset_order", "sort")]).unwrap();
        assert_eq!(opts.tileset_order, TilesetOrder::Sort);
        assert!(from_pairs(vec![("tileset_order", "shuffle")]).is_err());
    }

    #[test]
    fn builder_sets_order() {
        let opts = LoadOptions::default().tileset_order(TilesetOrder::Sort);
        assert_eq!(opts.tileset_order, TilesetOrder::Sort);
    }
}
