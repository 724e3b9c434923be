//! The index engine: buffered additions, AND search and full-compaction save.
//!
//! An [`Index`] keeps two tables behind one reader-writer lock:
//!
//! - an in-memory `term → postings` table holding everything added since the
//!   last save, and
//! - the `term → offset` table of the segment file on disk, rebuilt by a full
//!   scan on open.
//!
//! Searching merges both sides per term. Saving rewrites the whole segment
//! into a temporary file and renames it over the old one, so a failed save
//! never leaves a half-written segment behind.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ahash::AHashMap;
use log::{debug, info, warn};
use parking_lot::RwLock;

use crate::analysis::analyzer::{Analyzer, StandardAnalyzer};
use crate::error::{QuillError, Result};
use crate::index::config::IndexConfig;
use crate::index::posting::{DocId, PostingList};
use crate::index::segment::{MAX_TERM_LEN, SegmentReader, SegmentWriter};
use crate::storage::{FileStorage, Storage, StorageOutput};

/// Point-in-time counters for an [`Index`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Terms with additions not yet saved.
    pub memory_terms: usize,

    /// Terms in the segment file.
    pub disk_terms: usize,

    /// Whether anything was added since the last save.
    pub unsaved: bool,
}

#[derive(Debug, Default)]
struct IndexState {
    memory: AHashMap<String, PostingList>,
    offsets: AHashMap<String, u64>,
    dirty: bool,
}

/// A full-text index over caller-numbered documents.
///
/// `Index` is `Send + Sync`; share it between threads with an `Arc`.
///
/// ```
/// use quill::Index;
///
/// let index = Index::in_memory();
/// index.add(1, "first document");
/// index.add(2, "second document");
///
/// assert_eq!(index.search("document").unwrap(), vec![1, 2]);
/// assert_eq!(index.search("first document").unwrap(), vec![1]);
/// assert!(index.search("third").unwrap().is_empty());
/// ```
pub struct Index {
    storage: Option<Arc<dyn Storage>>,
    file_name: String,
    path: Option<PathBuf>,
    analyzer: Arc<dyn Analyzer>,
    config: IndexConfig,
    state: RwLock<IndexState>,
}

impl Index {
    /// Open the index stored at `path` with the default configuration.
    ///
    /// An empty path gives a memory-only index. A path that does not exist
    /// yet gives an empty index; the file and any missing parent directories
    /// are created on the first save. Opening never writes to disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, IndexConfig::default())
    }

    /// Open the index stored at `path`.
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: IndexConfig) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Ok(Self::in_memory_with_config(config));
        }

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                QuillError::invalid_config(format!(
                    "index path {} does not name a file",
                    path.display()
                ))
            })?;
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let storage = FileStorage::new(directory, config.storage.clone())?;
        let mut index = Self::with_storage(Arc::new(storage), file_name, config)?;
        index.path = Some(path.to_path_buf());
        Ok(index)
    }

    /// Create a memory-only index. It can be searched but never saved.
    pub fn in_memory() -> Self {
        Self::in_memory_with_config(IndexConfig::default())
    }

    fn in_memory_with_config(config: IndexConfig) -> Self {
        Index {
            storage: None,
            file_name: String::new(),
            path: None,
            analyzer: Arc::new(StandardAnalyzer::default()),
            config,
            state: RwLock::new(IndexState::default()),
        }
    }

    /// Open the segment `name` kept in `storage`.
    ///
    /// The segment is scanned in full; any malformed record fails the open.
    pub fn with_storage(
        storage: Arc<dyn Storage>,
        name: &str,
        config: IndexConfig,
    ) -> Result<Self> {
        if name.is_empty() {
            return Err(QuillError::invalid_config(
                "segment file name must not be empty",
            ));
        }

        let offsets = if storage.file_exists(name) {
            let mut reader = SegmentReader::open(&*storage, name, config.verify_checksums)?;
            reader.scan()?
        } else {
            AHashMap::new()
        };
        info!("opened index {name} with {} terms on disk", offsets.len());

        Ok(Index {
            storage: Some(storage),
            file_name: name.to_string(),
            path: None,
            analyzer: Arc::new(StandardAnalyzer::default()),
            config,
            state: RwLock::new(IndexState {
                offsets,
                ..IndexState::default()
            }),
        })
    }

    /// Replace the analyzer used for both documents and queries.
    ///
    /// Changing the analyzer of an index that already holds data makes old
    /// terms unreachable by queries analyzed the new way.
    pub fn with_analyzer(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Add a document's text under `doc_id`.
    ///
    /// Adding the same text to the same ID again has no further effect.
    /// Terms longer than [`MAX_TERM_LEN`] bytes are not indexed, and are
    /// ignored in queries too.
    pub fn add(&self, doc_id: DocId, text: &str) {
        let terms = self.terms(text);

        let mut state = self.state.write();
        for term in terms {
            state.memory.entry(term).or_default().insert(doc_id);
        }
        state.dirty = true;
    }

    /// Return the IDs of documents containing every term of `query`, ascending.
    ///
    /// A query that analyzes to no terms matches nothing.
    pub fn search(&self, query: &str) -> Result<Vec<DocId>> {
        let terms = self.terms(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let state = self.state.read();
        let mut segment = self.segment_cursor();
        let mut result: Option<PostingList> = None;

        for term in &terms {
            let postings = merged_postings(&state, term, &mut segment)?;
            if postings.is_empty() {
                debug!("search {query:?}: term {term:?} not found");
                return Ok(Vec::new());
            }

            result = Some(match result {
                Some(acc) => acc.intersect(&postings),
                None => postings,
            });
        }

        let hits = result.map(PostingList::into_vec).unwrap_or_default();
        debug!("search {query:?}: {} terms, {} hits", terms.len(), hits.len());
        Ok(hits)
    }

    /// Write every term to a fresh segment and swap it in.
    ///
    /// Does nothing if nothing was added since the last save. Fails with
    /// [`QuillError::InvalidConfiguration`] on a memory-only index. On any
    /// failure the old segment and the in-memory state are left as they were.
    pub fn save(&self) -> Result<()> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| QuillError::invalid_config("memory-only index can't be saved"))?;

        let mut state = self.state.write();
        if !state.dirty {
            debug!("save of {}: nothing to do", self.file_name);
            return Ok(());
        }

        let (temp_name, output) = storage.create_temp_output(&self.file_name)?;
        let written = self
            .write_segment(&state, output)
            .and_then(|written| {
                storage.rename_file(&temp_name, &self.file_name)?;
                Ok(written)
            });

        let (offsets, bytes) = match written {
            Ok(written) => written,
            Err(e) => {
                if let Err(cleanup) = storage.delete_file(&temp_name) {
                    warn!("failed to remove temporary segment {temp_name}: {cleanup}");
                }
                return Err(e);
            }
        };

        info!(
            "saved index {}: {} terms, {bytes} bytes",
            self.file_name,
            offsets.len()
        );
        state.memory.clear();
        state.offsets = offsets;
        state.dirty = false;
        Ok(())
    }

    /// Get the current counters.
    pub fn stats(&self) -> IndexStats {
        let state = self.state.read();
        IndexStats {
            memory_terms: state.memory.len(),
            disk_terms: state.offsets.len(),
            unsaved: state.dirty,
        }
    }

    /// Check whether anything was added since the last save.
    pub fn is_dirty(&self) -> bool {
        self.state.read().dirty
    }

    /// Number of distinct terms in the segment file.
    pub fn disk_term_count(&self) -> usize {
        self.state.read().offsets.len()
    }

    /// The path this index was opened from, if it was opened from a path.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The configuration this index was opened with.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Analyze `text`, dropping terms too long to be stored in a segment.
    fn terms(&self, text: &str) -> Vec<String> {
        let mut terms = self.analyzer.terms(text);
        terms.retain(|term| {
            let keep = term.len() as u64 <= MAX_TERM_LEN;
            if !keep {
                debug!("dropping term of {} bytes", term.len());
            }
            keep
        });
        terms
    }

    fn segment_cursor(&self) -> SegmentCursor<'_> {
        SegmentCursor {
            storage: self.storage.as_deref(),
            name: &self.file_name,
            verify_checksums: self.config.verify_checksums,
            reader: None,
        }
    }

    /// Merge memory and disk for every term, in term order, into `output`.
    ///
    /// Returns the new offset table and the segment size.
    fn write_segment(
        &self,
        state: &IndexState,
        output: Box<dyn StorageOutput>,
    ) -> Result<(AHashMap<String, u64>, u64)> {
        let mut terms: Vec<&str> = state
            .memory
            .keys()
            .chain(state.offsets.keys())
            .map(String::as_str)
            .collect();
        terms.sort_unstable();
        terms.dedup();

        let mut segment = self.segment_cursor();
        let mut writer = SegmentWriter::new(output)?;
        let mut offsets = AHashMap::with_capacity(terms.len());

        for term in terms {
            let postings = merged_postings(state, term, &mut segment)?;
            let offset = writer.write_record(term, &postings)?;
            offsets.insert(term.to_string(), offset);
        }

        let bytes = writer.finish()?;
        Ok((offsets, bytes))
    }
}

impl fmt::Debug for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Index")
            .field("file_name", &self.file_name)
            .field("path", &self.path)
            .field("analyzer", &self.analyzer.name())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// Lazily opened reader over the current segment, reused across terms.
struct SegmentCursor<'a> {
    storage: Option<&'a dyn Storage>,
    name: &'a str,
    verify_checksums: bool,
    reader: Option<SegmentReader>,
}

impl SegmentCursor<'_> {
    fn read(&mut self, term: &str, offset: u64) -> Result<PostingList> {
        let reader = match self.reader.take() {
            Some(reader) => reader,
            None => {
                let storage = self.storage.ok_or_else(|| {
                    QuillError::other(format!("term {term:?} has an offset but no segment"))
                })?;
                SegmentReader::open(storage, self.name, self.verify_checksums)?
            }
        };
        self.reader.insert(reader).read_term_postings(term, offset)
    }
}

/// Union of the saved and unsaved postings of `term`.
fn merged_postings(
    state: &IndexState,
    term: &str,
    segment: &mut SegmentCursor<'_>,
) -> Result<PostingList> {
    let on_disk = match state.offsets.get(term) {
        Some(&offset) => segment.read(term, offset)?,
        None => PostingList::new(),
    };

    Ok(match state.memory.get(term) {
        Some(in_memory) => on_disk.union(in_memory),
        None => on_disk,
    })
}
