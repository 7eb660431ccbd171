//! ZIP container writer for template packages, IDML and DOCX files
//!
//! Writes plain (non-ZIP64) archives: stored or raw-DEFLATE entries, a
//! central directory, and an end-of-central-directory record.

use crate::types::{RenderError, Result};

/// Local file header signature
const SIG_LOCAL_FILE_HEADER: u32 = 0x04034b50;

/// Central directory entry signature
const SIG_CD_ENTRY: u32 = 0x02014b50;

/// End of central directory signature
const SIG_EOCD: u32 = 0x06054b50;

const VERSION: u16 = 20;
const METHOD_STORED: u16 = 0;
const METHOD_DEFLATE: u16 = 8;
/// General purpose flag bit 11: names are UTF-8
const FLAG_UTF8: u16 = 0x0800;
/// 1980-01-01 00:00 in MS-DOS format, for reproducible output
const DOS_TIME: u16 = 0;
const DOS_DATE: u16 = 0x0021;
const DEFLATE_LEVEL: u8 = 6;

/// How an entry's bytes are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Stored,
    Deflated,
}

struct CentralEntry {
    name: String,
    method: u16,
    crc32: u32,
    compressed_size: u32,
    size: u32,
    local_offset: u32,
}

/// Builds a ZIP archive in memory
pub struct ZipWriter {
    buf: Vec<u8>,
    entries: Vec<CentralEntry>,
}

impl Default for ZipWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ZipWriter {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Append a file. Names use forward slashes and must be unique.
    pub fn add_file(&mut self, name: &str, data: &[u8], compression: Compression) -> Result<()> {
        if self.entries.iter().any(|e| e.name == name) {
            return Err(RenderError::Archive(format!("Duplicate entry: {}", name)));
        }

        let size = to_u32(data.len(), name)?;
        let crc32 = crc32fast::hash(data);
        let deflated;
        let (method, payload) = match compression {
            Compression::Stored => (METHOD_STORED, data),
            Compression::Deflated => {
                deflated = miniz_oxide::deflate::compress_to_vec(data, DEFLATE_LEVEL);
                // Keep whichever representation is smaller
                if deflated.len() < data.len() {
                    (METHOD_DEFLATE, deflated.as_slice())
                } else {
                    (METHOD_STORED, data)
                }
            }
        };
        let compressed_size = to_u32(payload.len(), name)?;
        let local_offset = to_u32(self.buf.len(), name)?;
        let name_bytes = name.as_bytes();
        let name_len = u16::try_from(name_bytes.len())
            .map_err(|_| RenderError::Archive(format!("Entry name too long: {}", name)))?;

        let zip = &mut self.buf;
        zip.extend_from_slice(&SIG_LOCAL_FILE_HEADER.to_le_bytes());
        zip.extend_from_slice(&VERSION.to_le_bytes());
        zip.extend_from_slice(&FLAG_UTF8.to_le_bytes());
        zip.extend_from_slice(&method.to_le_bytes());
        zip.extend_from_slice(&DOS_TIME.to_le_bytes());
        zip.extend_from_slice(&DOS_DATE.to_le_bytes());
        zip.extend_from_slice(&crc32.to_le_bytes());
        zip.extend_from_slice(&compressed_size.to_le_bytes());
        zip.extend_from_slice(&size.to_le_bytes());
        zip.extend_from_slice(&name_len.to_le_bytes());
        zip.extend_from_slice(&0u16.to_le_bytes());
        zip.extend_from_slice(name_bytes);
        zip.extend_from_slice(payload);

        self.entries.push(CentralEntry {
            name: name.to_string(),
            method,
            crc32,
            compressed_size,
            size,
            local_offset,
        });
        Ok(())
    }

    /// Write the central directory and return the archive bytes
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let cd_offset = to_u32(self.buf.len(), "central directory")?;
        let zip = &mut self.buf;

        for entry in &self.entries {
            let name_bytes = entry.name.as_bytes();
            zip.extend_from_slice(&SIG_CD_ENTRY.to_le_bytes());
            zip.extend_from_slice(&VERSION.to_le_bytes());
            zip.extend_from_slice(&VERSION.to_le_bytes());
            zip.extend_from_slice(&FLAG_UTF8.to_le_bytes());
            zip.extend_from_slice(&entry.method.to_le_bytes());
            zip.extend_from_slice(&DOS_TIME.to_le_bytes());
            zip.extend_from_slice(&DOS_DATE.to_le_bytes());
            zip.extend_from_slice(&entry.crc32.to_le_bytes());
            zip.extend_from_slice(&entry.compressed_size.to_le_bytes());
            zip.extend_from_slice(&entry.size.to_le_bytes());
            zip.extend_from_slice(&(name_bytes.len() as u16).to_le_bytes());
            zip.extend_from_slice(&0u16.to_le_bytes()); // extra
            zip.extend_from_slice(&0u16.to_le_bytes()); // comment
            zip.extend_from_slice(&0u16.to_le_bytes()); // disk
            zip.extend_from_slice(&0u16.to_le_bytes()); // internal attributes
            zip.extend_from_slice(&0u32.to_le_bytes()); // external attributes
            zip.extend_from_slice(&entry.local_offset.to_le_bytes());
            zip.extend_from_slice(name_bytes);
        }

        let cd_size = to_u32(zip.len(), "central directory")? - cd_offset;
        let count = u16::try_from(self.entries.len())
            .map_err(|_| RenderError::Archive("Too many entries".to_string()))?;

        zip.extend_from_slice(&SIG_EOCD.to_le_bytes());
        zip.extend_from_slice(&0u16.to_le_bytes());
        zip.extend_from_slice(&0u16.to_le_bytes());
        zip.extend_from_slice(&count.to_le_bytes());
        zip.extend_from_slice(&count.to_le_bytes());
        zip.extend_from_slice(&cd_size.to_le_bytes());
        zip.extend_from_slice(&cd_offset.to_le_bytes());
        zip.extend_from_slice(&0u16.to_le_bytes());

        Ok(self.buf)
    }
}

fn to_u32(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len).map_err(|_| RenderError::Archive(format!("{} exceeds 4 GiB", what)))
}

/// Read back every entry of an archive written by [`ZipWriter`], in order.
pub fn read_entries(bytes: &[u8]) -> Result<Vec<(String, Vec<u8>)>> {
    let eocd = bytes
        .len()
        .checked_sub(22)
        .filter(|&at| read_u32(bytes, at) == Some(SIG_EOCD))
        .ok_or_else(|| RenderError::Archive("Missing end of central directory".to_string()))?;

    let count = read_u16(bytes, eocd + 10).unwrap_or(0) as usize;
    let mut at = read_u32(bytes, eocd + 16).unwrap_or(0) as usize;
    let mut entries = Vec::with_capacity(count);

    for _ in 0..count {
        let field = |offset: usize| read_u32(bytes, at + offset);
        if field(0) != Some(SIG_CD_ENTRY) {
            return Err(RenderError::Archive("Bad central directory entry".to_string()));
        }
        let truncated = || RenderError::Archive("Truncated central directory".to_string());
        let method = read_u16(bytes, at + 10).ok_or_else(truncated)?;
        let crc = field(16).ok_or_else(truncated)?;
        let compressed = field(20).ok_or_else(truncated)? as usize;
        let name_len = read_u16(bytes, at + 28).ok_or_else(truncated)? as usize;
        let extra_len = read_u16(bytes, at + 30).ok_or_else(truncated)? as usize;
        let comment_len = read_u16(bytes, at + 32).ok_or_else(truncated)? as usize;
        let local = field(42).ok_or_else(truncated)? as usize;
        let name = bytes
            .get(at + 46..at + 46 + name_len)
            .map(|n| String::from_utf8_lossy(n).into_owned())
            .ok_or_else(truncated)?;

        let local_name_len = read_u16(bytes, local + 26).ok_or_else(truncated)? as usize;
        let local_extra_len = read_u16(bytes, local + 28).ok_or_else(truncated)? as usize;
        let start = local + 30 + local_name_len + local_extra_len;
        let payload = bytes.get(start..start + compressed).ok_or_else(truncated)?;

        let data = match method {
            METHOD_STORED => payload.to_vec(),
            METHOD_DEFLATE => miniz_oxide::inflate::decompress_to_vec(payload)
                .map_err(|e| RenderError::Archive(format!("Inflate failed for {}: {:?}", name, e)))?,
            other => {
                return Err(RenderError::Archive(format!(
                    "Unsupported method {} for {}",
                    other, name
                )));
            }
        };
        if crc32fast::hash(&data) != crc {
            return Err(RenderError::Archive(format!("CRC mismatch for {}", name)));
        }

        entries.push((name, data));
        at += 46 + name_len + extra_len + comment_len;
    }

    Ok(entries)
}

fn read_u16(bytes: &[u8], at: usize) -> Option<u16> {
    bytes
        .get(at..at + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
}

fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    bytes
        .get(at..at + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}
