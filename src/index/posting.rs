//! Posting lists: the sorted set of documents that contain a term.

use serde::{Deserialize, Serialize};

/// Caller-assigned document identifier.
pub type DocId = u64;

/// Posting list for a term.
///
/// Document IDs are always held in strictly ascending order without
/// duplicates; [`PostingList::intersect`] and the segment encoder rely on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostingList {
    doc_ids: Vec<DocId>,
}

impl PostingList {
    /// Create an empty posting list.
    pub fn new() -> Self {
        PostingList::default()
    }

    /// Build a posting list from IDs in any order, possibly repeated.
    pub fn from_unsorted(mut doc_ids: Vec<DocId>) -> Self {
        doc_ids.sort_unstable();
        doc_ids.dedup();
        PostingList { doc_ids }
    }

    /// Wrap IDs that are already strictly ascending.
    ///
    /// Returns `None` if the input is not sorted or contains duplicates.
    pub fn from_sorted(doc_ids: Vec<DocId>) -> Option<Self> {
        if doc_ids.windows(2).all(|pair| pair[0] < pair[1]) {
            Some(PostingList { doc_ids })
        } else {
            None
        }
    }

    /// Insert a document, keeping the list sorted.
    ///
    /// Returns `false` if the document was already present.
    pub fn insert(&mut self, doc_id: DocId) -> bool {
        // Adds usually arrive in ascending order
        if self.doc_ids.last().is_none_or(|&last| last < doc_id) {
            self.doc_ids.push(doc_id);
            return true;
        }

        match self.doc_ids.binary_search(&doc_id) {
            Ok(_) => false,
            Err(pos) => {
                self.doc_ids.insert(pos, doc_id);
                true
            }
        }
    }

    /// Check whether a document is in the list.
    pub fn contains(&self, doc_id: DocId) -> bool {
        self.doc_ids.binary_search(&doc_id).is_ok()
    }

    /// Merge two posting lists into their sorted, deduplicated union.
    pub fn union(&self, other: &PostingList) -> PostingList {
        let (a, b) = (&self.doc_ids, &other.doc_ids);
        let mut result = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);

        while i < a.len() && j < b.len() {
            if a[i] < b[j] {
                result.push(a[i]);
                i += 1;
            } else if a[i] > b[j] {
                result.push(b[j]);
                j += 1;
            } else {
                result.push(a[i]);
                i += 1;
                j += 1;
            }
        }
        result.extend_from_slice(&a[i..]);
        result.extend_from_slice(&b[j..]);

        PostingList { doc_ids: result }
    }

    /// Intersect two posting lists (linear merge, O(|a| + |b|)).
    pub fn intersect(&self, other: &PostingList) -> PostingList {
        let (a, b) = (&self.doc_ids, &other.doc_ids);
        let mut result = Vec::with_capacity(a.len().min(b.len()));
        let (mut i, mut j) = (0, 0);

        while i < a.len() && j < b.len() {
            if a[i] < b[j] {
                i += 1;
            } else if a[i] > b[j] {
                j += 1;
            } else {
                result.push(a[i]);
                i += 1;
                j += 1;
            }
        }

        PostingList { doc_ids: result }
    }

    /// Number of documents in the list.
    pub fn len(&self) -> usize {
        self.doc_ids.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.doc_ids.is_empty()
    }

    /// The document IDs in ascending order.
    pub fn as_slice(&self) -> &[DocId] {
        &self.doc_ids
    }

    /// Iterate over the document IDs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = DocId> + '_ {
        self.doc_ids.iter().copied()
    }

    /// Consume the list and return the document IDs.
    pub fn into_vec(self) -> Vec<DocId> {
        self.doc_ids
    }
}

impl FromIterator<DocId> for PostingList {
    fn from_iter<I: IntoIterator<Item = DocId>>(iter: I) -> Self {
        PostingList::from_unsorted(iter.into_iter().collect())
    }
}
