//! The cloud document-store boundary. `BookStore` is an interface only:
//! this crate ships the `MemoryStore` reference implementation used by
//! tests and offline runs, not a real cloud SDK client.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use crate::book::{booklet_id, Book, BookPosition};

/// Failure storing or retrieving book data. Per the error handling design,
/// callers log this and continue rather than abort the batch loop.
#[derive(Debug)]
pub enum StoreError {
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "book store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// The persistence boundary a real backing store (Firestore, S3, etc.)
/// implements. Every operation is phrased in terms of [`Book`]'s own
/// document/blob formats so a store never has to know chess semantics.
pub trait BookStore {
    /// Write the book's metadata document (`Book::to_document`-equivalent
    /// top-level fields, keyed by `book.id()`).
    fn store_book(&self, book: &Book) -> Result<(), StoreError>;

    /// Enumerate every booklet document for this book and merge its
    /// positions into `book.poscache`, decoding each blob.
    fn sync_cache(&self, book: &mut Book) -> Result<(), StoreError>;

    /// Group `book.poscache` by booklet index and write one document per
    /// booklet containing its position blobs.
    fn upload_cache(&self, book: &Book) -> Result<(), StoreError>;
}

/// In-process, `HashMap`-backed store: booklet id -> (position id -> blob).
/// Used by tests and as the default for local/offline runs; exercises the
/// exact same trait a cloud-backed store would.
#[derive(Default)]
pub struct MemoryStore {
    booklets: Mutex<HashMap<String, HashMap<String, String>>>,
    metadata: Mutex<HashMap<String, HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Read-only diagnostic: every metadata document id currently stored.
    #[must_use]
    pub fn list_books(&self) -> Vec<String> {
        let metadata = self.metadata.lock().unwrap_or_else(|e| e.into_inner());
        let mut ids: Vec<String> = metadata.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl BookStore for MemoryStore {
    fn store_book(&self, book: &Book) -> Result<(), StoreError> {
        let doc = book_metadata_document(book);
        let mut metadata = self.metadata.lock().unwrap_or_else(|e| e.into_inner());
        metadata.insert(book.id(), doc);
        Ok(())
    }

    fn sync_cache(&self, book: &mut Book) -> Result<(), StoreError> {
        let booklets = self.booklets.lock().unwrap_or_else(|e| e.into_inner());
        for doc in booklets.values() {
            for blob in doc.values() {
                let pos = BookPosition::from_blob(blob);
                book.store_position(pos);
            }
        }
        Ok(())
    }

    fn upload_cache(&self, book: &Book) -> Result<(), StoreError> {
        let mut grouped: HashMap<String, HashMap<String, String>> = HashMap::new();
        for (posid, pos) in &book.poscache {
            let id = booklet_id(posid, book.modulus);
            grouped.entry(id).or_default().insert(posid.clone(), pos.to_blob());
        }
        let mut booklets = self.booklets.lock().unwrap_or_else(|e| e.into_inner());
        for (id, doc) in grouped {
            booklets.entry(id).or_default().extend(doc);
        }
        Ok(())
    }
}

fn book_metadata_document(book: &Book) -> HashMap<String, String> {
    let mut doc = HashMap::new();
    doc.insert("name".to_string(), book.name.clone());
    doc.insert("variantkey".to_string(), book.variantkey.clone());
    doc.insert("rootfen".to_string(), book.rootfen.clone());
    doc.insert("mod".to_string(), book.modulus.to_string());
    doc.insert("analysisdepth".to_string(), book.analysisdepth.to_string());
    doc.insert("enginedepth".to_string(), book.enginedepth.to_string());
    doc.insert("numcycles".to_string(), book.numcycles.to_string());
    doc.insert("batchsize".to_string(), book.batchsize.to_string());
    doc.insert("minimaxafter".to_string(), book.minimaxafter.to_string());
    doc.insert("cutoff".to_string(), book.cutoff.to_string());
    let widths = book
        .widths
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(",");
    doc.insert("widths".to_string(), widths);
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::START_FEN;
    use crate::book::BookMove;
    use std::collections::HashMap as Map;

    fn sample_book() -> Book {
        Book {
            name: "test".to_string(),
            variantkey: "atomic".to_string(),
            rootfen: START_FEN.to_string(),
            modulus: 4,
            analysisdepth: 6,
            enginedepth: 18,
            numcycles: 1,
            batchsize: 1,
            minimaxafter: 10,
            cutoff: 9000,
            widths: vec![3, 2, 1],
            poscache: Map::new(),
        }
    }

    #[test]
    fn upload_then_sync_round_trips_positions() {
        let store = MemoryStore::new();
        let mut book = sample_book();
        let mut pos = BookPosition::new(START_FEN);
        pos.moves
            .insert("e2e4".to_string(), BookMove::new("e2e4", 30));
        book.store_position(pos);

        store.upload_cache(&book).unwrap();

        let mut fresh = sample_book();
        store.sync_cache(&mut fresh).unwrap();
        let synced = fresh.get_position(START_FEN).expect("position synced back");
        assert_eq!(synced.moves["e2e4"].score, 30);
    }

    #[test]
    fn store_book_is_listed_afterward() {
        let store = MemoryStore::new();
        let book = sample_book();
        store.store_book(&book).unwrap();
        assert_eq!(store.list_books(), vec![book.id()]);
    }

    #[test]
    fn upload_cache_groups_by_booklet_index() {
        let store = MemoryStore::new();
        let mut book = sample_book();
        book.store_position(BookPosition::new(START_FEN));
        book.store_position(BookPosition::new(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        ));
        store.upload_cache(&book).unwrap();

        let booklets = store.booklets.lock().unwrap();
        let total: usize = booklets.values().map(HashMap::len).sum();
        assert_eq!(total, 2);
        for posid in booklets.keys() {
            assert!(posid.starts_with("booklet"));
        }
    }
}
