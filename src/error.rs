use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::gid::Gid;
use crate::object::ShapeKind;

/// Error type for the TMX map loader.
#[derive(Debug, Error)]
pub enum MapError {
    /// The map file could not be opened or read.
    #[error("failed to read map file {path:?}: {source}")]
    Io {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
    /// A reader handed to the loader failed before the document was complete.
    #[error("failed to read map data: {0}")]
    Read(#[source] io::Error),
    /// The document is not well-formed XML or does not follow the TMX schema.
    #[error("malformed TMX document: {0}")]
    Xml(#[from] quick_xml::DeError),
    /// Infinite (chunked) maps are not supported.
    #[error("infinite maps are not supported")]
    InfiniteMap,
    /// Tilesets must appear in strictly ascending `firstgid` order.
    #[error("tileset with firstgid {next} follows tileset with firstgid {previous}")]
    UnorderedTilesets {
        /// First GID of the earlier tileset
        previous: u32,
        /// First GID of the tileset that breaks the ordering
        next: u32,
    },
    /// A tile layer's payload could not be decoded.
    #[error("layer '{layer}': {source}")]
    Payload {
        /// Layer name
        layer: String,
        /// What went wrong while decoding
        #[source]
        source: PayloadError,
    },
    /// A layer cell holds a GID that no tileset owns.
    #[error("layer '{layer}': GID {gid} at index {index} matches no tileset")]
    InvalidTileGid {
        /// Layer name
        layer: String,
        /// Row-major cell index
        index: usize,
        /// The raw GID, flags included
        gid: u32,
    },
    /// A tile object holds a GID that no tileset owns.
    #[error("object group '{group}': object {object_id} has GID {gid} which matches no tileset")]
    InvalidObjectGid {
        /// Object group name
        group: String,
        /// Object id
        object_id: u32,
        /// The raw GID, flags included
        gid: u32,
    },
    /// A polygon or polyline point list is malformed.
    #[error(transparent)]
    Points(#[from] PointsError),
    /// A geometry query was made against an object of another shape.
    #[error("object '{object}' is a {found}, not a {expected}")]
    ShapeMismatch {
        /// Object name
        object: String,
        /// Shape the caller asked for
        expected: ShapeKind,
        /// Shape the object actually has
        found: ShapeKind,
    },
}

/// Failure while turning a layer's `<data>` element into GIDs.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// `encoding` is not `csv` or `base64`.
    #[error("unknown data encoding '{0}'")]
    UnknownEncoding(String),
    /// `compression` is not `zlib` or `gzip`.
    #[error("unknown data compression '{0}'")]
    UnknownCompression(String),
    /// The base64 text does not decode.
    #[error("invalid base64 data: {0}")]
    Base64(#[from] base64::DecodeError),
    /// The decoded bytes are not a valid zlib or gzip stream.
    #[error("could not decompress data: {0}")]
    Decompress(#[source] io::Error),
    /// A CSV cell is not an unsigned 32-bit integer.
    #[error("invalid CSV token '{token}': {source}")]
    InvalidCsvToken {
        /// The cell after filtering
        token: String,
        /// Why it failed to parse
        #[source]
        source: std::num::ParseIntError,
    },
    /// The payload does not cover exactly `width * height` cells.
    #[error("decoded {found} {unit}, expected {expected}")]
    DataLength {
        /// Count required by the map size
        expected: usize,
        /// Count actually decoded
        found: usize,
        /// `"tiles"` or `"bytes"`
        unit: &'static str,
    },
}

/// A bare GID that is smaller than every tileset's first GID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("GID {gid} matches no tileset")]
pub struct InvalidGidError {
    /// The GID as stored, flags included.
    pub gid: Gid,
}

/// A point-list token that is not of the form `x,y`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid point '{token}' in points string")]
pub struct PointsError {
    /// The offending `x,y` token.
    pub token: String,
}
