//! On-disk journal format
//!
//! ```text
//! file   := MAGIC(8) record*
//! record := len:u32 LE | crc32(len ++ payload):u32 LE | payload[len]
//! ```
//!
//! `payload` is a bincode-encoded [`JournalEntry`] of at most
//! [`MAX_RECORD_LEN`] bytes. The checksum covers the length prefix, so a
//! damaged length is caught like damaged payload. A record cut short by a
//! crash is only tolerated at the tail, where it is truncated away on open.

use super::{Journal, JournalEntry};
use crate::durability::DurabilityMode;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use stockguard_core::{Error, Result};
use tracing::{debug, warn};

/// File magic and format version
pub const JOURNAL_MAGIC: [u8; 8] = *b"SGLEDG01";

const RECORD_HEADER_SIZE: usize = 8;

/// Largest payload a record may carry
pub const MAX_RECORD_LEN: usize = 1 << 20;

/// Journal backed by a single append-only file
pub struct FileJournal {
    path: PathBuf,
    writer: BufWriter<File>,
    mode: DurabilityMode,
}

impl FileJournal {
    /// Open (or create) the journal file for appending
    ///
    /// A new file gets the magic header. An existing file must already have
    /// been validated by [`read_journal`], which also trims a torn tail.
    pub fn open(path: impl AsRef<Path>, mode: DurabilityMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;

        if file.metadata()?.len() == 0 {
            file.write_all(&JOURNAL_MAGIC)?;
            file.sync_all()?;
        }

        debug!(path = %path.display(), mode = ?mode, "journal opened");
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            mode,
        })
    }

    /// Path of the journal file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn encode_record(entry: &JournalEntry) -> Result<Vec<u8>> {
    let payload = bincode::serialize(entry).map_err(|e| Error::Serialization(e.to_string()))?;
    if payload.len() > MAX_RECORD_LEN {
        return Err(Error::Serialization(format!(
            "entry too large: {} bytes (max {})",
            payload.len(),
            MAX_RECORD_LEN
        )));
    }
    let len = payload.len() as u32;

    let mut buf = Vec::with_capacity(RECORD_HEADER_SIZE + payload.len());
    buf.write_u32::<LittleEndian>(len)?;
    buf.write_u32::<LittleEndian>(record_checksum(len, &payload))?;
    buf.extend_from_slice(&payload);
    Ok(buf)
}

impl Journal for FileJournal {
    fn append(&mut self, entry: &JournalEntry) -> Result<()> {
        let record = encode_record(entry)?;
        self.writer
            .write_all(&record)
            .and_then(|_| self.writer.flush())
            .map_err(|e| Error::Journal(format!("append to {} failed: {}", self.path.display(), e)))?;

        if self.mode.requires_immediate_fsync() {
            self.sync()?;
        }
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        self.writer
            .flush()
            .and_then(|_| self.writer.get_ref().sync_data())
            .map_err(|e| Error::Journal(format!("sync of {} failed: {}", self.path.display(), e)))
    }
}

/// Result of decoding a journal file
#[derive(Debug, Default)]
pub struct ReplayReport {
    /// Entries in commit order
    pub entries: Vec<JournalEntry>,
    /// Byte offset a torn tail was truncated at, if any
    pub truncated_at: Option<u64>,
}

/// Decode every record in a journal file
///
/// A missing file yields an empty report. A short or checksum-failing final
/// record is treated as a torn write: the file is truncated to the last good
/// record. The same failure anywhere before the tail is [`Error::Corruption`],
/// as is a length beyond [`MAX_RECORD_LEN`] or a "short" record followed by
/// a valid one.
pub fn read_journal(path: impl AsRef<Path>) -> Result<ReplayReport> {
    let path = path.as_ref();
    let mut file = match OpenOptions::new().read(true).write(true).open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ReplayReport::default()),
        Err(e) => return Err(e.into()),
    };

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    if bytes.is_empty() {
        return Ok(ReplayReport::default());
    }
    if bytes.len() < JOURNAL_MAGIC.len() || bytes[..JOURNAL_MAGIC.len()] != JOURNAL_MAGIC {
        return Err(Error::Corruption(format!(
            "{} is not a stockguard journal",
            path.display()
        )));
    }

    let mut report = ReplayReport::default();
    let mut offset = JOURNAL_MAGIC.len();
    while offset < bytes.len() {
        match decode_record(&bytes[offset..]) {
            Ok((entry, consumed)) => {
                report.entries.push(entry);
                offset += consumed;
            }
            Err(RecordError::Torn) if !has_valid_record_after(&bytes, offset) => {
                truncate_tail(&mut file, path, offset as u64)?;
                report.truncated_at = Some(offset as u64);
                break;
            }
            Err(RecordError::ChecksumMismatch { consumed }) if offset + consumed == bytes.len() => {
                truncate_tail(&mut file, path, offset as u64)?;
                report.truncated_at = Some(offset as u64);
                break;
            }
            Err(RecordError::Torn) => {
                return Err(Error::Corruption(format!(
                    "record at offset {} in {} runs past end of file but later records are intact",
                    offset,
                    path.display()
                )));
            }
            Err(RecordError::TooLong(len)) => {
                return Err(Error::Corruption(format!(
                    "record at offset {} in {} claims {} bytes (max {})",
                    offset,
                    path.display(),
                    len,
                    MAX_RECORD_LEN
                )));
            }
            Err(RecordError::ChecksumMismatch { .. }) => {
                return Err(Error::Corruption(format!(
                    "checksum mismatch at offset {} in {}",
                    offset,
                    path.display()
                )));
            }
            Err(RecordError::Decode(msg)) => {
                return Err(Error::Corruption(format!(
                    "undecodable record at offset {} in {}: {}",
                    offset,
                    path.display(),
                    msg
                )));
            }
        }
    }

    Ok(report)
}

enum RecordError {
    Torn,
    TooLong(usize),
    ChecksumMismatch { consumed: usize },
    Decode(String),
}

fn decode_record(buf: &[u8]) -> std::result::Result<(JournalEntry, usize), RecordError> {
    if buf.len() < RECORD_HEADER_SIZE {
        return Err(RecordError::Torn);
    }
    let mut header = Cursor::new(&buf[..RECORD_HEADER_SIZE]);
    let len = header.read_u32::<LittleEndian>().map_err(|_| RecordError::Torn)? as usize;
    let crc = header.read_u32::<LittleEndian>().map_err(|_| RecordError::Torn)?;
    if len > MAX_RECORD_LEN {
        return Err(RecordError::TooLong(len));
    }

    let end = RECORD_HEADER_SIZE + len;
    if buf.len() < end {
        return Err(RecordError::Torn);
    }
    let payload = &buf[RECORD_HEADER_SIZE..end];
    if record_checksum(len as u32, payload) != crc {
        return Err(RecordError::ChecksumMismatch { consumed: end });
    }
    let entry = bincode::deserialize(payload).map_err(|e| RecordError::Decode(e.to_string()))?;
    Ok((entry, end))
}

fn record_checksum(len: u32, payload: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&len.to_le_bytes());
    hasher.update(payload);
    hasher.finalize()
}

/// Whether any intact record starts after the record at `offset`
///
/// A genuinely torn write is the last thing in the file. If a checksummed
/// record follows, the short record is damage, not a tear.
fn has_valid_record_after(bytes: &[u8], offset: usize) -> bool {
    (offset + 1..bytes.len()).any(|start| decode_record(&bytes[start..]).is_ok())
}

fn truncate_tail(file: &mut File, path: &Path, offset: u64) -> Result<()> {
    warn!(
        path = %path.display(),
        offset,
        "torn record at journal tail, truncating"
    );
    file.set_len(offset)?;
    file.seek(SeekFrom::End(0))?;
    file.sync_all()?;
    Ok(())
}
