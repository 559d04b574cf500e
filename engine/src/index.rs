use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

pub type DocId = u64;

/// Thread-safe store owning the document registry and the inverted index.
/// Ids are allocated from an atomic counter; both maps sit behind their own
/// lock so indexing workers can register and merge concurrently.
#[derive(Default)]
pub struct IndexStore {
    next_doc_id: AtomicU64,
    docs: RwLock<HashMap<DocId, PathBuf>>,
    index: RwLock<HashMap<String, HashMap<DocId, u64>>>,
}

impl IndexStore {
    pub fn new() -> Self { Self::default() }

    /// Assign a fresh id to `path` and record the association. Every call
    /// allocates a new id, including repeat calls for the same path.
    pub fn register_document(&self, path: &Path) -> DocId {
        let doc_id = self.next_doc_id.fetch_add(1, Ordering::Relaxed);
        self.docs.write().insert(doc_id, path.to_path_buf());
        doc_id
    }

    /// Add `counts` into the inverted index under `doc_id`. Merges are
    /// additive: an existing entry for the same (term, doc) pair is summed
    /// into, never overwritten.
    pub fn merge_term_frequencies(&self, doc_id: DocId, counts: HashMap<String, u64>) {
        let mut index = self.index.write();
        for (term, count) in counts {
            *index.entry(term).or_default().entry(doc_id).or_insert(0) += count;
        }
    }

    /// All documents containing `term` (case-folded) with their frequency.
    pub fn lookup(&self, term: &str) -> Vec<(DocId, u64)> {
        let term = term.to_lowercase();
        match self.index.read().get(&term) {
            Some(postings) => postings.iter().map(|(&doc_id, &freq)| (doc_id, freq)).collect(),
            None => Vec::new(),
        }
    }

    pub fn resolve_path(&self, doc_id: DocId) -> Option<PathBuf> {
        self.docs.read().get(&doc_id).cloned()
    }

    pub fn document_count(&self) -> usize {
        self.docs.read().len()
    }

    pub fn term_count(&self) -> usize {
        self.index.read().len()
    }
}
