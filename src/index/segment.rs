//! The on-disk segment file.
//!
//! A segment is a header followed by self-delimiting `(term, postings)`
//! records. Nothing else is stored: the term → offset table is rebuilt by a
//! forward scan, and a single record can be read back from a known offset.
//!
//! ```text
//! file    := header record*
//! header  := "QSEG" | version: u32 LE
//! record  := varint(term_len) term_bytes
//!            varint(doc_count) varint(first_id) varint(delta){doc_count - 1}
//!            crc32: u32 LE
//! ```
//!
//! Lengths and counts are unsigned LEB128 varints and must be positive. The
//! checksum covers every byte of the record before it. A zero-length file is a
//! valid, empty segment.

use std::io::{self, Read, Seek, SeekFrom, Write};

use ahash::AHashMap;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, warn};

use crate::error::{QuillError, Result};
use crate::index::posting::{DocId, PostingList};
use crate::storage::{Storage, StorageInput, StorageOutput};
use crate::util::varint;

/// Magic bytes at the start of every non-empty segment file.
pub const SEGMENT_MAGIC: [u8; 4] = *b"QSEG";

/// Current segment format version.
pub const SEGMENT_VERSION: u32 = 1;

/// Size of the segment header in bytes; the first record starts here.
pub const SEGMENT_HEADER_LEN: u64 = 8;

/// Longest term, in bytes, a record may hold.
pub const MAX_TERM_LEN: u64 = 64 * 1024;

/// One term and its postings, as stored in a segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRecord {
    /// The term.
    pub term: String,
    /// Documents containing the term.
    pub postings: PostingList,
}

/// Encode a single record, checksum included.
pub fn encode_record(term: &str, postings: &PostingList) -> Result<Vec<u8>> {
    if term.is_empty() {
        return Err(QuillError::format("cannot write a record for an empty term"));
    }
    if term.len() as u64 > MAX_TERM_LEN {
        return Err(QuillError::format(format!(
            "term of {} bytes exceeds the {MAX_TERM_LEN} byte limit",
            term.len()
        )));
    }
    if postings.is_empty() {
        return Err(QuillError::format(format!(
            "cannot write an empty posting list for term {term:?}"
        )));
    }

    let mut buf = Vec::with_capacity(term.len() + postings.len() * 2 + 16);
    varint::write_u64(&mut buf, term.len() as u64)?;
    buf.extend_from_slice(term.as_bytes());

    varint::write_u64(&mut buf, postings.len() as u64)?;
    let mut previous: DocId = 0;
    for (i, doc_id) in postings.iter().enumerate() {
        let value = if i == 0 { doc_id } else { doc_id - previous };
        varint::write_u64(&mut buf, value)?;
        previous = doc_id;
    }

    let checksum = crc32fast::hash(&buf);
    buf.write_u32::<LittleEndian>(checksum)?;
    Ok(buf)
}

/// Read one record starting at the reader's current position.
///
/// Returns `None` on a clean end of input before the record's first byte,
/// otherwise the record and the number of bytes it occupied.
pub fn read_record<R: Read>(
    reader: &mut R,
    verify_checksum: bool,
) -> Result<Option<(SegmentRecord, u64)>> {
    let mut body = ChecksumReader::new(reader);

    let term_len = match varint::read_u64_or_eof(&mut body)? {
        Some(len) => len,
        None => return Ok(None),
    };
    if term_len == 0 {
        return Err(QuillError::format("record term length must be positive"));
    }
    if term_len > MAX_TERM_LEN {
        return Err(QuillError::format(format!(
            "record term length {term_len} exceeds the {MAX_TERM_LEN} byte limit"
        )));
    }

    let mut term_bytes = vec![0u8; term_len as usize];
    body.read_exact(&mut term_bytes).map_err(truncated)?;
    let term = String::from_utf8(term_bytes)
        .map_err(|e| QuillError::format(format!("record term is not valid UTF-8: {e}")))?;

    let doc_count = varint::read_u64(&mut body)?;
    if doc_count == 0 {
        return Err(QuillError::format(format!(
            "posting list length for term {term:?} must be positive"
        )));
    }

    // The count is untrusted until the IDs are actually there
    let mut doc_ids = Vec::with_capacity(doc_count.min(4096) as usize);
    let mut previous: DocId = 0;
    for i in 0..doc_count {
        let value = varint::read_u64(&mut body)?;
        let doc_id = if i == 0 {
            value
        } else if value == 0 {
            return Err(QuillError::format(format!(
                "posting list for term {term:?} is not strictly ascending"
            )));
        } else {
            previous.checked_add(value).ok_or_else(|| {
                QuillError::format(format!("document id overflow in term {term:?}"))
            })?
        };
        doc_ids.push(doc_id);
        previous = doc_id;
    }

    let computed = body.checksum();
    let consumed = body.consumed() + 4;
    let stored = body.into_inner().read_u32::<LittleEndian>().map_err(truncated)?;
    if verify_checksum && stored != computed {
        return Err(QuillError::format(format!(
            "checksum mismatch for term {term:?}: stored {stored:#010x}, computed {computed:#010x}"
        )));
    }

    let postings = PostingList::from_sorted(doc_ids).ok_or_else(|| {
        QuillError::format(format!("posting list for term {term:?} is not sorted"))
    })?;

    Ok(Some((SegmentRecord { term, postings }, consumed)))
}

fn truncated(err: io::Error) -> QuillError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        QuillError::format("truncated record")
    } else {
        err.into()
    }
}

/// Counts and checksums every byte read through it.
struct ChecksumReader<'a, R: Read> {
    inner: &'a mut R,
    hasher: crc32fast::Hasher,
    consumed: u64,
}

impl<'a, R: Read> ChecksumReader<'a, R> {
    fn new(inner: &'a mut R) -> Self {
        ChecksumReader {
            inner,
            hasher: crc32fast::Hasher::new(),
            consumed: 0,
        }
    }

    fn checksum(&self) -> u32 {
        self.hasher.clone().finalize()
    }

    fn consumed(&self) -> u64 {
        self.consumed
    }

    fn into_inner(self) -> &'a mut R {
        self.inner
    }
}

impl<R: Read> Read for ChecksumReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        self.consumed += n as u64;
        Ok(n)
    }
}

/// Writes a complete segment: header first, then records in call order.
pub struct SegmentWriter<W: StorageOutput> {
    output: W,
    position: u64,
}

impl<W: StorageOutput> SegmentWriter<W> {
    /// Start a new segment on `output`, writing the header.
    pub fn new(mut output: W) -> Result<Self> {
        output.write_all(&SEGMENT_MAGIC)?;
        output.write_u32::<LittleEndian>(SEGMENT_VERSION)?;

        Ok(SegmentWriter {
            output,
            position: SEGMENT_HEADER_LEN,
        })
    }

    /// Append a record and return the offset it starts at.
    pub fn write_record(&mut self, term: &str, postings: &PostingList) -> Result<u64> {
        let encoded = encode_record(term, postings)?;
        let offset = self.position;

        self.output.write_all(&encoded)?;
        self.position += encoded.len() as u64;

        Ok(offset)
    }

    /// Flush, sync and close the output. Returns the segment size in bytes.
    pub fn finish(mut self) -> Result<u64> {
        self.output.close()?;
        Ok(self.position)
    }
}

/// Reads records from an existing segment.
#[derive(Debug)]
pub struct SegmentReader {
    input: Box<dyn StorageInput>,
    size: u64,
    verify_checksums: bool,
}

impl SegmentReader {
    /// Open the segment `name` in `storage` and validate its header.
    pub fn open(storage: &dyn Storage, name: &str, verify_checksums: bool) -> Result<Self> {
        let input = storage.open_input(name)?;
        Self::from_input(input, verify_checksums)
    }

    /// Wrap an already opened input and validate its header.
    pub fn from_input(mut input: Box<dyn StorageInput>, verify_checksums: bool) -> Result<Self> {
        let size = input.size()?;

        if size > 0 {
            let mut header = [0u8; SEGMENT_HEADER_LEN as usize];
            input.seek(SeekFrom::Start(0))?;
            input.read_exact(&mut header).map_err(|e| {
                if e.kind() == io::ErrorKind::UnexpectedEof {
                    QuillError::format("truncated segment header")
                } else {
                    e.into()
                }
            })?;

            if header[..4] != SEGMENT_MAGIC {
                return Err(QuillError::format("not a segment file (bad magic)"));
            }
            let version = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
            if version != SEGMENT_VERSION {
                return Err(QuillError::format(format!(
                    "unsupported segment version {version}"
                )));
            }
        }

        Ok(SegmentReader {
            input,
            size,
            verify_checksums,
        })
    }

    /// Size of the segment file in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Scan every record from the start and build the term → offset table.
    ///
    /// Any malformed record aborts the scan.
    pub fn scan(&mut self) -> Result<AHashMap<String, u64>> {
        let mut offsets = AHashMap::new();
        if self.size == 0 {
            return Ok(offsets);
        }

        self.input.seek(SeekFrom::Start(SEGMENT_HEADER_LEN))?;
        let mut position = SEGMENT_HEADER_LEN;

        while let Some((record, len)) = read_record(&mut self.input, self.verify_checksums)? {
            if let Some(previous) = offsets.insert(record.term, position) {
                warn!("segment holds a duplicate record at offset {position} (previous at {previous}); keeping the later one");
            }
            position += len;
        }

        debug!("scanned {} records, {position} bytes", offsets.len());
        Ok(offsets)
    }

    /// Seek to `offset` and read exactly one record.
    pub fn read_at(&mut self, offset: u64) -> Result<SegmentRecord> {
        if offset < SEGMENT_HEADER_LEN || offset >= self.size {
            return Err(QuillError::format(format!(
                "offset {offset} is outside the record area of a {} byte segment",
                self.size
            )));
        }

        self.input.seek(SeekFrom::Start(offset))?;
        match read_record(&mut self.input, self.verify_checksums)? {
            Some((record, _)) => Ok(record),
            None => Err(QuillError::format(format!("no record at offset {offset}"))),
        }
    }

    /// Read the postings of `term`, stored at `offset`.
    ///
    /// Fails with a consistency error if a different term lives there.
    pub fn read_term_postings(&mut self, term: &str, offset: u64) -> Result<PostingList> {
        let record = self.read_at(offset)?;
        if record.term != term {
            return Err(QuillError::consistency(term, record.term));
        }
        Ok(record.postings)
    }
}
