//! On-disk encoding of annotated documents.
//!
//! Every entry is a small self-identifying header followed by the body:
//!
//! ```text
//! offset  size  field
//! 0       4     magic "ANDC"
//! 4       2     schema version (big-endian u16)
//! 6       1     codec (0 = none, 1 = zstd)
//! 7       ..    body: bincode(serde, standard config) of CacheEntry, compressed per codec
//! ```
//!
//! Encoding is deterministic: the same entry and [`CompressionConfig`] always
//! produce the same bytes. Decoding is strict; a wrong magic, unknown
//! version/codec, undecodable body or trailing bytes are all errors.

use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use zstd::{decode_all, encode_all};

use crate::error::CodecError;
use crate::types::AnnotatedDocument;

/// Bump this value whenever the on-disk entry layout changes.
pub const CACHE_SCHEMA_VERSION: u16 = 1;

const MAGIC: [u8; 4] = *b"ANDC";
const HEADER_LEN: usize = 7;

/// What a cache file holds: the annotated document plus the digest of the
/// source it was produced from, when known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub source_digest: Option<String>,
    pub document: AnnotatedDocument,
}

#[derive(Serialize)]
struct EntryRef<'a> {
    source_digest: Option<&'a str>,
    document: &'a AnnotatedDocument,
}

/// Compression codec options for cache entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionCodec {
    /// No compression (handy when inspecting entries by hand).
    None,
    #[default]
    Zstd,
}

impl CompressionCodec {
    fn tag(self) -> u8 {
        match self {
            CompressionCodec::None => 0,
            CompressionCodec::Zstd => 1,
        }
    }

    fn from_tag(tag: u8) -> Result<Self, CodecError> {
        match tag {
            0 => Ok(CompressionCodec::None),
            1 => Ok(CompressionCodec::Zstd),
            other => Err(CodecError::UnknownCodec(other)),
        }
    }
}

/// Compression behavior for newly written entries. Reading always follows
/// the codec recorded in the entry header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    pub codec: CompressionCodec,
    /// Zstd level (1-22, higher compresses better but slower).
    pub level: i32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            codec: CompressionCodec::default(),
            level: 3,
        }
    }
}

impl CompressionConfig {
    pub fn new(codec: CompressionCodec, level: i32) -> Self {
        Self { codec, level }
    }

    pub fn with_codec(mut self, codec: CompressionCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        match self.codec {
            CompressionCodec::None => Ok(data.to_vec()),
            CompressionCodec::Zstd => {
                encode_all(data, self.level).map_err(|e| CodecError::Compression(e.to_string()))
            }
        }
    }
}

fn decompress(codec: CompressionCodec, data: &[u8]) -> Result<Vec<u8>, CodecError> {
    match codec {
        CompressionCodec::None => Ok(data.to_vec()),
        CompressionCodec::Zstd => {
            decode_all(data).map_err(|e| CodecError::Compression(e.to_string()))
        }
    }
}

/// Serializes an entry with header and optional compression.
pub fn encode_entry(entry: &CacheEntry, cfg: &CompressionConfig) -> Result<Vec<u8>, CodecError> {
    encode_document(&entry.document, entry.source_digest.as_deref(), cfg)
}

/// Same bytes as [`encode_entry`] without taking ownership of the document.
pub fn encode_document(
    document: &AnnotatedDocument,
    source_digest: Option<&str>,
    cfg: &CompressionConfig,
) -> Result<Vec<u8>, CodecError> {
    let entry = EntryRef {
        source_digest,
        document,
    };
    let body = encode_to_vec(&entry, standard()).map_err(|e| CodecError::Encode(e.to_string()))?;
    let body = cfg.compress(&body)?;
    let mut out = Vec::with_capacity(HEADER_LEN + body.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&CACHE_SCHEMA_VERSION.to_be_bytes());
    out.push(cfg.codec.tag());
    out.extend_from_slice(&body);
    Ok(out)
}

/// Parses bytes written by [`encode_entry`].
pub fn decode_entry(bytes: &[u8]) -> Result<CacheEntry, CodecError> {
    if bytes.len() < HEADER_LEN {
        return Err(CodecError::Truncated(bytes.len()));
    }
    if bytes[..4] != MAGIC {
        return Err(CodecError::BadMagic);
    }
    let version = u16::from_be_bytes([bytes[4], bytes[5]]);
    if version != CACHE_SCHEMA_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }
    let codec = CompressionCodec::from_tag(bytes[6])?;
    let body = decompress(codec, &bytes[HEADER_LEN..])?;
    let (entry, read): (CacheEntry, usize) =
        decode_from_slice(&body, standard()).map_err(|e| CodecError::Decode(e.to_string()))?;
    if read != body.len() {
        return Err(CodecError::TrailingBytes(body.len() - read));
    }
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaggedToken;

    fn sample_entry() -> CacheEntry {
        CacheEntry {
            source_digest: Some("ab".repeat(32)),
            document: AnnotatedDocument::new(vec![vec![vec![
                TaggedToken::new("Он", "SPRO"),
                TaggedToken::new("шел", "V"),
                TaggedToken::new("домой", "ADV"),
                TaggedToken::new(".", "NONLEX"),
            ]]]),
        }
    }

    #[test]
    fn zstd_and_plain_entries_round_trip() {
        for codec in [CompressionCodec::Zstd, CompressionCodec::None] {
            let cfg = CompressionConfig::default().with_codec(codec);
            let bytes = encode_entry(&sample_entry(), &cfg).expect("encode");
            assert_eq!(&bytes[..4], b"ANDC");
            assert_eq!(decode_entry(&bytes).expect("decode"), sample_entry());
        }
    }

    #[test]
    fn empty_document_round_trips_as_empty() {
        let entry = CacheEntry::default();
        let bytes = encode_entry(&entry, &CompressionConfig::default()).expect("encode");
        let decoded = decode_entry(&bytes).expect("decode");
        assert!(decoded.document.paragraphs.is_empty());
        assert_eq!(decoded.source_digest, None);
    }

    #[test]
    fn borrowed_and_owned_encodings_match() {
        let entry = sample_entry();
        let cfg = CompressionConfig::default();
        let owned = encode_entry(&entry, &cfg).expect("encode");
        let borrowed =
            encode_document(&entry.document, entry.source_digest.as_deref(), &cfg).expect("encode");
        assert_eq!(owned, borrowed);
    }

    #[test]
    fn encoding_is_deterministic() {
        let cfg = CompressionConfig::default();
        let a = encode_entry(&sample_entry(), &cfg).expect("encode");
        let b = encode_entry(&sample_entry(), &cfg).expect("encode");
        assert_eq!(a, b);
    }

    #[test]
    fn malformed_entries_are_rejected() {
        assert_eq!(decode_entry(b"AND"), Err(CodecError::Truncated(3)));
        assert_eq!(decode_entry(b"NOPE\0\x01\x00"), Err(CodecError::BadMagic));
        assert_eq!(
            decode_entry(b"ANDC\0\x09\x00"),
            Err(CodecError::UnsupportedVersion(9))
        );
        assert_eq!(decode_entry(b"ANDC\0\x01\x07"), Err(CodecError::UnknownCodec(7)));

        let cfg = CompressionConfig::default().with_codec(CompressionCodec::None);
        let mut bytes = encode_entry(&sample_entry(), &cfg).expect("encode");
        bytes.truncate(bytes.len() - 3);
        assert!(matches!(decode_entry(&bytes), Err(CodecError::Decode(_))));
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let cfg = CompressionConfig::default().with_codec(CompressionCodec::None);
        let mut bytes = encode_entry(&sample_entry(), &cfg).expect("encode");
        bytes.extend_from_slice(&[0, 0]);
        assert_eq!(decode_entry(&bytes), Err(CodecError::TrailingBytes(2)));
    }
}
