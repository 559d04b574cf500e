use crate::error::EngineError;
use crate::index::{DocId, IndexStore};
use crate::tokenizer::term_frequencies;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Filesystem metadata artifacts that are never indexed.
const RESERVED_MARKER: &str = ".DS_Store";

/// Maximum number of ranked results returned by a search.
const RESULT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct IndexResult {
    pub elapsed: Duration,
    /// Cumulative bytes read across all indexing calls in this process.
    pub total_bytes_read: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub path: PathBuf,
    pub frequency: u64,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub elapsed: Duration,
    pub hits: Vec<SearchHit>,
}

/// Indexing and search front-end over an [`IndexStore`].
///
/// Crawling is breadth-first and level-synchronous: each dequeued directory
/// fans its entries out across at most `workers` scoped threads, and the
/// scope join is a barrier, so no two directories' workers ever overlap.
pub struct Engine {
    store: IndexStore,
    workers: usize,
    bytes_read: AtomicU64,
}

impl Engine {
    pub fn new(workers: usize) -> Self {
        Self {
            store: IndexStore::new(),
            workers: workers.max(1),
            bytes_read: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    /// Walk `root` breadth-first and index every regular file under it.
    ///
    /// A missing or non-directory root fails with [`EngineError::InvalidRoot`]
    /// before any store mutation. A directory that cannot be listed aborts
    /// the whole call with [`EngineError::ListDir`]; documents committed by
    /// earlier levels stay in the store. Per-file read and decode failures
    /// are logged and skipped.
    pub fn index_files(&self, root: &Path) -> Result<IndexResult, EngineError> {
        let start = Instant::now();
        if !root.is_dir() {
            return Err(EngineError::InvalidRoot(root.to_path_buf()));
        }

        let pending: Mutex<VecDeque<PathBuf>> = Mutex::new(VecDeque::new());
        pending.lock().push_back(root.to_path_buf());

        loop {
            let dir = match pending.lock().pop_front() {
                Some(dir) => dir,
                None => break,
            };
            let entries = list_dir(&dir)?;
            if entries.is_empty() {
                continue;
            }

            // Worker budget is recomputed per directory; the configured
            // count itself is never narrowed.
            let workers = self.workers.min(entries.len());
            let slice_len = entries.len().div_ceil(workers);
            let pending = &pending;
            thread::scope(|s| {
                for slice in entries.chunks(slice_len) {
                    s.spawn(move || {
                        for entry in slice {
                            self.index_entry(entry, pending);
                        }
                    });
                }
            });
        }

        let total_bytes_read = self.bytes_read.load(Ordering::Relaxed);
        let elapsed = start.elapsed();
        tracing::info!(
            root = %root.display(),
            total_bytes_read,
            elapsed_s = elapsed.as_secs_f64(),
            documents = self.store.document_count(),
            "indexing finished"
        );
        Ok(IndexResult { elapsed, total_bytes_read })
    }

    fn index_entry(&self, entry: &DirEntry, pending: &Mutex<VecDeque<PathBuf>>) {
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "skipping unreadable entry");
                return;
            }
        };
        if file_type.is_dir() {
            pending.lock().push_back(path);
        } else if file_type.is_file() {
            self.index_file(&path);
        }
    }

    fn index_file(&self, path: &Path) {
        if path.file_name().is_some_and(|name| name == RESERVED_MARKER) {
            tracing::debug!(path = %path.display(), "skipping filesystem marker file");
            return;
        }
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "error reading file, skipping");
                return;
            }
        };
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(_) => {
                tracing::warn!(path = %path.display(), "skipping file with non-text content");
                return;
            }
        };
        self.bytes_read.fetch_add(text.len() as u64, Ordering::Relaxed);
        let doc_id = self.store.register_document(path);
        let counts = term_frequencies(&text);
        tracing::debug!(path = %path.display(), doc_id, terms = counts.len(), "indexed file");
        self.store.merge_term_frequencies(doc_id, counts);
    }

    /// Rank documents by their summed frequency across `terms` and return
    /// the top results, highest total first, ties broken by ascending
    /// document id.
    pub fn search_files(&self, terms: &[String]) -> Result<SearchResult, EngineError> {
        if terms.is_empty() {
            return Err(EngineError::EmptyQuery);
        }
        let start = Instant::now();

        let mut totals: HashMap<DocId, u64> = HashMap::new();
        for term in terms {
            for (doc_id, freq) in self.store.lookup(term) {
                *totals.entry(doc_id).or_insert(0) += freq;
            }
        }

        let mut ranked: Vec<SearchHit> = totals
            .into_iter()
            .filter_map(|(doc_id, frequency)| {
                self.store
                    .resolve_path(doc_id)
                    .map(|path| SearchHit { doc_id, path, frequency })
            })
            .collect();
        ranked.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.doc_id.cmp(&b.doc_id)));
        ranked.truncate(RESULT_LIMIT);

        Ok(SearchResult { elapsed: start.elapsed(), hits: ranked })
    }
}

fn list_dir(dir: &Path) -> Result<Vec<DirEntry>, EngineError> {
    fs::read_dir(dir)
        .and_then(|entries| entries.collect())
        .map_err(|source| EngineError::ListDir { dir: dir.to_path_buf(), source })
}
