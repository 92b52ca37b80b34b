use std::io::Read;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::{GzDecoder, ZlibDecoder};
use tracing::trace;

use crate::error::PayloadError;
use crate::gid::Gid;
use crate::layer::Data;

/// Value of a `<data encoding="..">` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// No attribute: one `<tile gid=".."/>` element per cell.
    Xml,
    /// Comma-separated GIDs.
    Csv,
    /// Little-endian `u32` GIDs, possibly compressed.
    Base64,
}

impl Encoding {
    /// Parse the attribute; missing or empty means [`Encoding::Xml`].
    pub fn from_tag(tag: Option<&str>) -> Result<Self, PayloadError> {
        match tag.unwrap_or("") {
            "" => Ok(Encoding::Xml),
            "csv" => Ok(Encoding::Csv),
            "base64" => Ok(Encoding::Base64),
            other => Err(PayloadError::UnknownEncoding(other.to_owned())),
        }
    }
}

/// Value of a `<data compression="..">` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Plain base64.
    None,
    /// zlib stream.
    Zlib,
    /// gzip stream.
    Gzip,
}

impl Compression {
    /// Parse the attribute; missing or empty means [`Compression::None`].
    pub fn from_tag(tag: Option<&str>) -> Result<Self, PayloadError> {
        match tag.unwrap_or("") {
            "" => Ok(Compression::None),
            "zlib" => Ok(Compression::Zlib),
            "gzip" => Ok(Compression::Gzip),
            other => Err(PayloadError::UnknownCompression(other.to_owned())),
        }
    }
}

/// Decode a layer's `<data>` into exactly `width * height` GIDs, row-major.
pub fn decode_layer_payload(data: &Data, width: u32, height: u32) -> Result<Vec<Gid>, PayloadError> {
    let expected = width as usize * height as usize;
    let encoding = Encoding::from_tag(data.encoding.as_deref())?;
    trace!(?encoding, compression = data.compression.as_deref(), expected, "decoding layer payload");

    match encoding {
        Encoding::Xml => decode_xml(&data.tiles, expected),
        Encoding::Csv => decode_csv(&data.raw, expected),
        Encoding::Base64 => {
            let compression = Compression::from_tag(data.compression.as_deref())?;
            decode_base64(&data.raw, compression, expected)
        }
    }
}

fn check_len(found: usize, expected: usize, unit: &'static str) -> Result<(), PayloadError> {
    if found != expected {
        return Err(PayloadError::DataLength {
            expected,
            found,
            unit,
        });
    }
    Ok(())
}

fn decode_xml(tiles: &[Gid], expected: usize) -> Result<Vec<Gid>, PayloadError> {
    check_len(tiles.len(), expected, "tiles")?;
    Ok(tiles.to_vec())
}

fn decode_csv(raw: &str, expected: usize) -> Result<Vec<Gid>, PayloadError> {
    // Tiled wraps CSV rows over several lines; only digits and commas matter.
    let clean: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .collect();

    let gids = clean
        .split(',')
        .map(|token| {
            token
                .parse::<u32>()
                .map(Gid)
                .map_err(|source| PayloadError::InvalidCsvToken {
                    token: token.to_owned(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    check_len(gids.len(), expected, "tiles")?;
    Ok(gids)
}

fn decode_base64(raw: &str, compression: Compression, expected: usize) -> Result<Vec<Gid>, PayloadError> {
    // Tiled may wrap long payloads; whitespace anywhere is not part of the data.
    let text: String = raw.split_ascii_whitespace().collect();
    let bytes = STANDARD.decode(text)?;

    let bytes = match compression {
        Compression::None => bytes,
        Compression::Zlib => inflate(ZlibDecoder::new(&bytes[..]))?,
        Compression::Gzip => inflate(GzDecoder::new(&bytes[..]))?,
    };

    check_len(bytes.len(), expected * 4, "bytes")?;

    Ok(bytes
        .chunks_exact(4)
        .map(|b| Gid(u32::from_le_bytes([b[0], b[1], b[2], b[3]])))
        .collect())
}

fn inflate<R: Read>(mut decoder: R) -> Result<Vec<u8>, PayloadError> {
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(PayloadError::Decompress)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::{GzEncoder, ZlibEncoder};
    use std::io::Write;

    fn gid_bytes(gids: &[u32]) -> Vec<u8> {
        gids.iter().flat_map(|g| g.to_le_bytes()).collect()
    }

    fn zlib(bytes: &[u8]) -> Vec<u8> {
        let mut enc = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(bytes).unwrap();
        enc.finish().unwrap()
    }

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut enc = GzEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(bytes).unwrap();
        enc.finish().unwrap()
    }

    fn data(encoding: Option<&str>, compression: Option<&str>, raw: String) -> Data {
        Data {
            encoding: encoding.map(str::to_owned),
            compression: compression.map(str::to_owned),
            raw,
            tiles: Vec::new(),
        }
    }

    fn raw_gids(gids: Vec<Gid>) -> Vec<u32> {
        gids.into_iter().map(Gid::raw).collect()
    }

    #[test]
    fn xml_records_in_document_order() {
        let mut d = data(None, None, String::new());
        d.tiles = [3, 0, 1, 2, 0, 7].into_iter().map(Gid).collect();
        let gids = decode_layer_payload(&d, 3, 2).unwrap();
        assert_eq!(raw_gids(gids), [3, 0, 1, 2, 0, 7]);
    }

    #[test]
    fn xml_record_count_must_match() {
        for (w, h) in [(1, 1), (3, 2), (4, 4)] {
            let n = w * h;
            for count in [n - 1, n + 1] {
                let mut d = data(None, None, String::new());
                d.tiles = vec![Gid(1); count as usize];
                let err = decode_layer_payload(&d, w, h).unwrap_err();
                assert!(matches!(err, PayloadError::DataLength { found, .. } if found == count as usize));
            }
        }
    }

    #[test]
    fn csv_ignores_whitespace_and_newlines() {
        let d = data(Some("csv"), None, "\n1,2,\n 0,4\r\n".into());
        let gids = decode_layer_payload(&d, 2, 2).unwrap();
        assert_eq!(raw_gids(gids), [1, 2, 0, 4]);
    }

    #[test]
    fn csv_round_trip_with_zero_gids() {
        let grid = [0u32, 5, 0, 0, 2147483649, 12, 0, 1, 9];
        let text = grid
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let gids = decode_layer_payload(&data(Some("csv"), None, text), 3, 3).unwrap();
        assert_eq!(raw_gids(gids), grid);
    }

    #[test]
    fn csv_reports_bad_token() {
        // trailing comma leaves an empty token
        let err = decode_layer_payload(&data(Some("csv"), None, "1,2,".into()), 3, 1).unwrap_err();
        assert!(matches!(err, PayloadError::InvalidCsvToken { token, .. } if token.is_empty()));

        let err =
            decode_layer_payload(&data(Some("csv"), None, "1,99999999999".into()), 2, 1).unwrap_err();
        assert!(matches!(err, PayloadError::InvalidCsvToken { token, .. } if token == "99999999999"));
    }

    #[test]
    fn csv_length_mismatch() {
        let err = decode_layer_payload(&data(Some("csv"), None, "1,2,3".into()), 2, 2).unwrap_err();
        assert!(matches!(
            err,
            PayloadError::DataLength { expected: 4, found: 3, unit: "tiles" }
        ));
    }

    #[test]
    fn base64_is_little_endian_row_major() {
        let grid = [1u32, 0x0102_0304, 0, 0x8000_0002];
        let text = format!("\n   {}\n  ", STANDARD.encode(gid_bytes(&grid)));
        let gids = decode_layer_payload(&data(Some("base64"), None, text), 2, 2).unwrap();
        assert_eq!(raw_gids(gids), grid);
    }

    #[test]
    fn base64_wrapped_across_lines() {
        let grid: Vec<u32> = (0..16).collect();
        let text = STANDARD.encode(zlib(&gid_bytes(&grid)));
        let (head, tail) = text.split_at(text.len() / 2);
        let wrapped = format!("\n  {head}\r\n   {tail}\n");

        let d = data(Some("base64"), Some("zlib"), wrapped);
        assert_eq!(raw_gids(decode_layer_payload(&d, 4, 4).unwrap()), grid);

        let text = STANDARD.encode(gid_bytes(&grid));
        let wrapped = format!("{}\n   {}", &text[..40], &text[40..]);
        let d = data(Some("base64"), None, wrapped);
        assert_eq!(raw_gids(decode_layer_payload(&d, 4, 4).unwrap()), grid);
    }

    #[test]
    fn base64_compressed_variants_agree() {
        let grid: Vec<u32> = (0..16).collect();
        let bytes = gid_bytes(&grid);

        for (tag, payload) in [("zlib", zlib(&bytes)), ("gzip", gzip(&bytes))] {
            let d = data(Some("base64"), Some(tag), STANDARD.encode(payload));
            let gids = decode_layer_payload(&d, 4, 4).unwrap();
            assert_eq!(raw_gids(gids), grid, "compression {tag}");
        }
    }

    #[test]
    fn base64_zlib_wrong_length_is_data_length_error() {
        // decompresses fine, but to 60 bytes instead of 64
        let bytes = gid_bytes(&[1; 15]);
        let d = data(Some("base64"), Some("zlib"), STANDARD.encode(zlib(&bytes)));
        let err = decode_layer_payload(&d, 4, 4).unwrap_err();
        assert!(matches!(
            err,
            PayloadError::DataLength { expected: 64, found: 60, unit: "bytes" }
        ));
    }

    #[test]
    fn base64_garbage_fails() {
        let d = data(Some("base64"), None, "!!not base64!!".into());
        assert!(matches!(
            decode_layer_payload(&d, 1, 1),
            Err(PayloadError::Base64(_))
        ));

        let d = data(Some("base64"), Some("zlib"), STANDARD.encode([1u8, 2, 3, 4]));
        assert!(matches!(
            decode_layer_payload(&d, 1, 1),
            Err(PayloadError::Decompress(_))
        ));
    }

    #[test]
    fn unknown_tags() {
        let err = decode_layer_payload(&data(Some("hex"), None, String::new()), 1, 1).unwrap_err();
        assert!(matches!(err, PayloadError::UnknownEncoding(tag) if tag == "hex"));

        let err = decode_layer_payload(&data(Some("base64"), Some("zstd"), "AAAAAA==".into()), 1, 1)
            .unwrap_err();
        assert!(matches!(err, PayloadError::UnknownCompression(tag) if tag == "zstd"));
    }

    #[test]
    fn compression_tag_is_ignored_for_csv() {
        let d = data(Some("csv"), Some("zstd"), "7".into());
        assert_eq!(raw_gids(decode_layer_payload(&d, 1, 1).unwrap()), [7]);
    }
}
