//! GZIP member header parsing (RFC 1952 Section 2.3).

use gzdec_core::Crc32;
use gzdec_core::bitstream::BitBuffer;
use gzdec_core::error::{CodecError, Result};

/// GZIP magic bytes.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// GZIP compression method: DEFLATE.
pub const CM_DEFLATE: u8 = 8;

/// GZIP header flags.
pub mod flags {
    /// Text file.
    pub const FTEXT: u8 = 0x01;
    /// Header CRC present.
    pub const FHCRC: u8 = 0x02;
    /// Extra field present.
    pub const FEXTRA: u8 = 0x04;
    /// Original filename present.
    pub const FNAME: u8 = 0x08;
    /// Comment present.
    pub const FCOMMENT: u8 = 0x10;
    /// Bits that must be zero.
    pub const RESERVED: u8 = 0xE0;
}

/// GZIP member header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GzipHeader {
    /// Compression method (always 8 for DEFLATE).
    pub method: u8,
    /// Flags.
    pub flags: u8,
    /// Modification time (Unix timestamp, 0 if unknown).
    pub mtime: u32,
    /// Extra flags.
    pub xfl: u8,
    /// Operating system.
    pub os: u8,
    /// Extra field payload (if FEXTRA flag set).
    pub extra: Option<Vec<u8>>,
    /// Original filename (if FNAME flag set).
    pub filename: Option<String>,
    /// Comment (if FCOMMENT flag set).
    pub comment: Option<String>,
    /// Header CRC16 (if FHCRC flag set); already verified.
    pub header_crc: Option<u16>,
}

impl Default for GzipHeader {
    fn default() -> Self {
        Self {
            method: CM_DEFLATE,
            flags: 0,
            mtime: 0,
            xfl: 0,
            os: 255, // Unknown OS
            extra: None,
            filename: None,
            comment: None,
            header_crc: None,
        }
    }
}

impl GzipHeader {
    /// Parse a complete header from the front of `input`.
    ///
    /// The read position must be byte-aligned at the first magic byte. When
    /// `input` ends inside the header this fails with
    /// [`CodecError::UnexpectedEof`] and the caller rewinds; malformed
    /// headers are reported as soon as the offending byte is seen.
    pub fn parse(input: &mut BitBuffer) -> Result<Self> {
        let start = input.checkpoint();

        let id1 = input.read_u8()?;
        if id1 != GZIP_MAGIC[0] {
            return Err(CodecError::invalid_magic(GZIP_MAGIC, [id1]));
        }
        let id2 = input.read_u8()?;
        if id2 != GZIP_MAGIC[1] {
            return Err(CodecError::invalid_magic(GZIP_MAGIC, [id1, id2]));
        }

        let method = input.read_u8()?;
        if method != CM_DEFLATE {
            return Err(CodecError::unsupported_method(method));
        }

        let flags = input.read_u8()?;
        if flags & flags::RESERVED != 0 {
            return Err(CodecError::invalid_header(format!(
                "unknown header flags set: {:#04x}",
                flags & flags::RESERVED
            )));
        }

        let mtime = input.read_u32_le()?;
        let xfl = input.read_u8()?;
        let os = input.read_u8()?;

        let extra = if flags & flags::FEXTRA != 0 {
            let xlen = input.read_u16_le()? as usize;
            let bytes = input.take_bytes(xlen);
            if bytes.len() < xlen {
                return Err(CodecError::unexpected_eof(((xlen - bytes.len()) * 8) as u32));
            }
            Some(bytes.to_vec())
        } else {
            None
        };

        let filename = if flags & flags::FNAME != 0 {
            Some(read_null_terminated(input)?)
        } else {
            None
        };

        let comment = if flags & flags::FCOMMENT != 0 {
            Some(read_null_terminated(input)?)
        } else {
            None
        };

        let header_crc = if flags & flags::FHCRC != 0 {
            let computed = Crc32::compute(input.bytes_since(start)) as u16;
            let expected = input.read_u16_le()?;
            if expected != computed {
                return Err(CodecError::header_crc_mismatch(expected, computed));
            }
            Some(expected)
        } else {
            None
        };

        Ok(Self {
            method,
            flags,
            mtime,
            xfl,
            os,
            extra,
            filename,
            comment,
            header_crc,
        })
    }

    /// Whether the compressor flagged the payload as probably text.
    pub fn is_text(&self) -> bool {
        self.flags & flags::FTEXT != 0
    }

    /// Name of the operating system recorded in the header.
    pub fn os_name(&self) -> &'static str {
        match self.os {
            0 => "FAT",
            1 => "Amiga",
            2 => "VMS",
            3 => "Unix",
            4 => "VM/CMS",
            5 => "Atari TOS",
            6 => "HPFS",
            7 => "Macintosh",
            8 => "Z-System",
            9 => "CP/M",
            10 => "TOPS-20",
            11 => "NTFS",
            12 => "QDOS",
            13 => "Acorn RISCOS",
            _ => "unknown",
        }
    }
}

/// Read a null-terminated Latin-1/UTF-8 string, lossily decoded.
fn read_null_terminated(input: &mut BitBuffer) -> Result<String> {
    let mut bytes = Vec::new();
    loop {
        match input.read_u8()? {
            0 => break,
            byte => bytes.push(byte),
        }
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_header(flags: u8) -> Vec<u8> {
        vec![0x1F, 0x8B, CM_DEFLATE, flags, 0x78, 0x56, 0x34, 0x12, 0x00, 0x03]
    }

    fn parse(bytes: &[u8]) -> Result<GzipHeader> {
        let mut input = BitBuffer::new();
        input.extend(bytes);
        GzipHeader::parse(&mut input)
    }

    #[test]
    fn test_parse_minimal() {
        let header = parse(&minimal_header(0)).unwrap();
        assert_eq!(header.method, CM_DEFLATE);
        assert_eq!(header.mtime, 0x12345678);
        assert_eq!(header.os_name(), "Unix");
        assert!(header.filename.is_none());
        assert!(!header.is_text());
    }

    #[test]
    fn test_parse_optional_fields() {
        let mut bytes = minimal_header(flags::FEXTRA | flags::FNAME | flags::FCOMMENT);
        bytes.extend_from_slice(&[3, 0, b'a', b'b', b'c']);
        bytes.extend_from_slice(b"data.txt\0");
        bytes.extend_from_slice(b"a comment\0");

        let header = parse(&bytes).unwrap();
        assert_eq!(header.extra.as_deref(), Some(&b"abc"[..]));
        assert_eq!(header.filename.as_deref(), Some("data.txt"));
        assert_eq!(header.comment.as_deref(), Some("a comment"));
    }

    #[test]
    fn test_header_crc() {
        let mut bytes = minimal_header(flags::FHCRC | flags::FNAME);
        bytes.extend_from_slice(b"x\0");
        let crc16 = Crc32::compute(&bytes) as u16;

        let mut good = bytes.clone();
        good.extend_from_slice(&crc16.to_le_bytes());
        assert_eq!(parse(&good).unwrap().header_crc, Some(crc16));

        let mut bad = bytes;
        bad.extend_from_slice(&(crc16 ^ 1).to_le_bytes());
        let err = parse(&bad).unwrap_err();
        assert!(matches!(err, CodecError::HeaderCrcMismatch { .. }));
    }

    #[test]
    fn test_bad_magic_reported_early() {
        let err = parse(b"P").unwrap_err();
        assert!(matches!(err, CodecError::InvalidMagic { .. }));
        assert!(err.to_string().contains("incorrect header check"));

        let err = parse(&[0x1F, 0x8C]).unwrap_err();
        assert!(matches!(err, CodecError::InvalidMagic { .. }));
    }

    #[test]
    fn test_unsupported_method() {
        let mut bytes = minimal_header(0);
        bytes[2] = 7;
        let err = parse(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedMethod { method: 7 }));
    }

    #[test]
    fn test_reserved_flags_rejected() {
        let err = parse(&minimal_header(0x20)).unwrap_err();
        assert!(err.to_string().contains("unknown header flags set"));
    }

    #[test]
    fn test_incomplete_header_is_starved() {
        let mut bytes = minimal_header(flags::FNAME);
        bytes.extend_from_slice(b"unterminated");

        for len in 0..bytes.len() {
            let err = parse(&bytes[..len]).unwrap_err();
            assert!(err.is_starved(), "prefix of {} bytes", len);
        }
    }

    #[test]
    fn test_extra_field_split() {
        let mut bytes = minimal_header(flags::FEXTRA);
        bytes.extend_from_slice(&[4, 0, 1, 2]);
        assert!(parse(&bytes).unwrap_err().is_starved());

        bytes.extend_from_slice(&[3, 4]);
        assert_eq!(parse(&bytes).unwrap().extra, Some(vec![1, 2, 3, 4]));
    }
}
