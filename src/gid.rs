use std::fmt;

use crate::error::InvalidGidError;
use crate::tileset::Tileset;

/// Horizontal flip flag (bit 31).
pub const FLIP_H: u32 = 0x8000_0000;
/// Vertical flip flag (bit 30).
pub const FLIP_V: u32 = 0x4000_0000;
/// Diagonal flip flag (bit 29), i.e. swap x and y.
pub const FLIP_D: u32 = 0x2000_0000;
/// All three flip flags.
pub const FLIP_MASK: u32 = FLIP_H | FLIP_V | FLIP_D;
/// Keeps the lower 29 bits.
pub const GID_MASK: u32 = !FLIP_MASK;

/// Global tile id as stored in layer data: 29 bits of index, 3 flip flags on top.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Gid(pub u32);

impl Gid {
    /// GID 0: no tile in this cell.
    pub const EMPTY: Gid = Gid(0);

    /// Value as stored, flags included.
    #[inline] pub fn raw(self) -> u32 { self.0 }
    /// Bare GID with the flip flags masked off.
    #[inline] pub fn clean(self) -> u32 { self.0 & GID_MASK }
    /// Flipped horizontally.
    #[inline] pub fn flip_h(self) -> bool { (self.0 & FLIP_H) != 0 }
    /// Flipped vertically.
    #[inline] pub fn flip_v(self) -> bool { (self.0 & FLIP_V) != 0 }
    /// Flipped diagonally.
    #[inline] pub fn flip_d(self) -> bool { (self.0 & FLIP_D) != 0 }
    /// The whole stored value is zero. A flag-only GID is not empty.
    #[inline] pub fn is_empty(self) -> bool { self == Gid::EMPTY }
}

impl From<u32> for Gid {
    fn from(raw: u32) -> Self {
        Gid(raw)
    }
}

impl fmt::Display for Gid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A GID resolved against the map's tilesets.
///
/// `tileset` is an index into [`Map::tilesets`](crate::Map::tilesets); use
/// [`Map::tileset_of`](crate::Map::tileset_of) to get the tileset itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodedTile {
    /// Tile index local to the owning tileset.
    pub id: u32,
    /// Owning tileset, `None` only for the nil tile.
    pub tileset: Option<usize>,
    /// Bit 31 of the GID.
    pub horizontal_flip: bool,
    /// Bit 30 of the GID.
    pub vertical_flip: bool,
    /// Bit 29 of the GID.
    pub diagonal_flip: bool,
    /// Set only on [`DecodedTile::NIL`].
    pub nil: bool,
}

impl DecodedTile {
    /// The tile stored for GID 0: nothing placed in this cell.
    pub const NIL: DecodedTile = DecodedTile {
        id: 0,
        tileset: None,
        horizontal_flip: false,
        vertical_flip: false,
        diagonal_flip: false,
        nil: true,
    };

    /// Whether this is the empty cell.
    #[inline]
    pub fn is_nil(&self) -> bool {
        self.nil
    }
}

impl Default for DecodedTile {
    fn default() -> Self {
        DecodedTile::NIL
    }
}

/// Resolve `gid` to the tileset that owns it.
///
/// Tilesets are scanned from the last one backwards and the first with
/// `first_gid <= bare gid` wins, so `tilesets` must be sorted by `first_gid`.
pub fn resolve_gid(gid: Gid, tilesets: &[Tileset]) -> Result<DecodedTile, InvalidGidError> {
    if gid.is_empty() {
        return Ok(DecodedTile::NIL);
    }

    let bare = gid.clean();
    let (index, tileset) = tilesets
        .iter()
        .enumerate()
        .rev()
        .find(|(_, ts)| ts.first_gid <= bare)
        .ok_or(InvalidGidError { gid })?;

    Ok(DecodedTile {
        id: bare - tileset.first_gid,
        tileset: Some(index),
        horizontal_flip: gid.flip_h(),
        vertical_flip: gid.flip_v(),
        diagonal_flip: gid.flip_d(),
        nil: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tileset(first_gid: u32, name: &str) -> Tileset {
        Tileset {
            first_gid,
            name: name.to_owned(),
            ..Tileset::default()
        }
    }

    #[test]
    fn zero_is_nil() {
        let tile = resolve_gid(Gid(0), &[]).expect("gid 0 never fails");
        assert!(tile.is_nil());
        assert_eq!(tile, DecodedTile::NIL);
    }

    #[test]
    fn picks_highest_first_gid_not_above_bare_gid() {
        let sets = [tileset(1, "a"), tileset(17, "b"), tileset(40, "c")];

        let t = resolve_gid(Gid(16), &sets).unwrap();
        assert_eq!((t.tileset, t.id), (Some(0), 15));

        let t = resolve_gid(Gid(17), &sets).unwrap();
        assert_eq!((t.tileset, t.id), (Some(1), 0));

        let t = resolve_gid(Gid(45), &sets).unwrap();
        assert_eq!((t.tileset, t.id), (Some(2), 5));
        assert!(!t.is_nil());
    }

    #[test]
    fn horizontal_flag_is_carried_and_masked() {
        let sets = [tileset(1, "a"), tileset(10, "b")];
        let t = resolve_gid(Gid(FLIP_H | 12), &sets).unwrap();

        assert!(t.horizontal_flip);
        assert!(!t.vertical_flip);
        assert!(!t.diagonal_flip);
        assert_eq!(t.id, 2);
        assert_eq!(t.tileset, Some(1));
    }

    #[test]
    fn all_flags_do_not_change_ownership() {
        let sets = [tileset(1, "a")];
        let plain = resolve_gid(Gid(3), &sets).unwrap();
        let flipped = resolve_gid(Gid(FLIP_MASK | 3), &sets).unwrap();

        assert_eq!(plain.id, flipped.id);
        assert_eq!(plain.tileset, flipped.tileset);
        assert!(flipped.horizontal_flip && flipped.vertical_flip && flipped.diagonal_flip);
    }

    #[test]
    fn gid_below_every_tileset_is_invalid() {
        let sets = [tileset(5, "a")];
        assert_eq!(
            resolve_gid(Gid(3), &sets),
            Err(InvalidGidError { gid: Gid(3) })
        );
        assert!(resolve_gid(Gid(1), &[]).is_err());
    }

    #[test]
    fn only_zero_is_empty() {
        assert!(Gid::EMPTY.is_empty());
        assert_eq!(Gid::default(), Gid::EMPTY);
        assert!(!Gid(FLIP_H).is_empty());
        assert_eq!(Gid(FLIP_H).clean(), Gid::EMPTY.raw());
    }

    #[test]
    fn flag_only_gid_is_invalid_when_first_gid_is_one() {
        // bare GID 0 with a flip bit set is not the nil tile
        let sets = [tileset(1, "a")];
        assert!(resolve_gid(Gid(FLIP_V), &sets).is_err());
    }
}
