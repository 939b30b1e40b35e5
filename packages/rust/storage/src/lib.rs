//! Persisted symbol index over libSQL.
//!
//! The index file uses the fixed `searchIndex(id, name, type, path)` schema
//! consumed by the documentation browser; the schema and the set of display
//! kinds are an external contract and must not be altered casually.
//!
//! Builds are never incremental: [`SymbolIndex::create`] deletes any
//! existing store and starts fresh. Inserts buffer in memory and land in a
//! single transaction at [`SymbolIndex::flush`], so a build that fails
//! partway leaves no partially visible index.

use std::collections::HashSet;
use std::path::Path;

use libsql::{Connection, Database, params};
use tracing::error;

use docpack_shared::{DocpackError, KindMap, Result};

/// Creation statements for the index store. The unique triple index makes
/// re-insertion of an identical row a no-op at the SQL level as well.
const SCHEMA_SQL: &str = "\
CREATE TABLE searchIndex(id INTEGER PRIMARY KEY, name TEXT, type TEXT, path TEXT);
CREATE UNIQUE INDEX anchor ON searchIndex (name, type, path);";

/// One stored symbol row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Fully qualified name.
    pub name: String,
    /// Display kind (already mapped).
    pub kind: String,
    /// Relative page path, optionally suffixed `#anchor`.
    pub path: String,
}

/// Write handle for one build's symbol index.
pub struct SymbolIndex {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
    kinds: KindMap,
    pending: Vec<Symbol>,
    seen: HashSet<(String, String, String)>,
}

impl SymbolIndex {
    /// Delete any existing store at `path` and create a fresh one.
    pub async fn create(path: &Path, kinds: KindMap) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DocpackError::io(parent, e))?;
        }
        match std::fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(DocpackError::Storage(format!("cannot remove old index: {e}"))),
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DocpackError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| DocpackError::Storage(e.to_string()))?;

        conn.execute_batch(SCHEMA_SQL)
            .await
            .map_err(|e| DocpackError::Storage(e.to_string()))?;

        Ok(Self {
            db,
            conn,
            kinds,
            pending: Vec::new(),
            seen: HashSet::new(),
        })
    }

    /// Record a symbol.
    ///
    /// An empty kind is a no-op. A kind missing from the map logs an error
    /// and skips the row — one bad symbol never fails the build. Re-adding
    /// an identical triple is silently ignored.
    pub fn add(&mut self, name: &str, kind: &str, location: &str) {
        if kind.is_empty() {
            return;
        }

        let Some(display_kind) = self.kinds.display_kind(kind) else {
            error!(kind, path = location, "unknown kind");
            return;
        };

        let key = (
            name.to_string(),
            display_kind.to_string(),
            location.to_string(),
        );
        if !self.seen.insert(key.clone()) {
            return;
        }

        let (name, kind, path) = key;
        self.pending.push(Symbol { name, kind, path });
    }

    /// Rows buffered so far.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Write all buffered rows in one transaction, commit, and release the
    /// store. Returns the number of rows written.
    pub async fn flush(self) -> Result<usize> {
        let tx = self
            .conn
            .transaction()
            .await
            .map_err(|e| DocpackError::Storage(e.to_string()))?;

        let count = self.pending.len();
        for row in &self.pending {
            tx.execute(
                "INSERT OR IGNORE INTO searchIndex(name, type, path) VALUES (?1, ?2, ?3)",
                params![row.name.as_str(), row.kind.as_str(), row.path.as_str()],
            )
            .await
            .map_err(|e| DocpackError::Storage(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| DocpackError::Storage(e.to_string()))?;

        Ok(count)
    }

    /// Read every row of an index file in insertion order. Verification and
    /// test support.
    pub async fn read_all(path: &Path) -> Result<Vec<Symbol>> {
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DocpackError::Storage(e.to_string()))?;
        let conn = db
            .connect()
            .map_err(|e| DocpackError::Storage(e.to_string()))?;

        let mut rows = conn
            .query(
                "SELECT name, type, path FROM searchIndex ORDER BY id",
                params![],
            )
            .await
            .map_err(|e| DocpackError::Storage(e.to_string()))?;

        let mut symbols = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DocpackError::Storage(e.to_string()))?
        {
            symbols.push(Symbol {
                name: row
                    .get::<String>(0)
                    .map_err(|e| DocpackError::Storage(e.to_string()))?,
                kind: row
                    .get::<String>(1)
                    .map_err(|e| DocpackError::Storage(e.to_string()))?,
                path: row
                    .get::<String>(2)
                    .map_err(|e| DocpackError::Storage(e.to_string()))?,
            });
        }
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_kinds() -> KindMap {
        KindMap::from_pairs([
            ("gd", "Guide"),
            ("mod", "Module"),
            ("struct", "Struct"),
            ("method", "Method"),
        ])
    }

    fn temp_index_path(tag: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "docpack_test_{tag}_{}.dsidx",
            std::process::id()
        ))
    }

    #[tokio::test]
    async fn insertion_is_idempotent() {
        let path = temp_index_path("idem");
        let mut idx = SymbolIndex::create(&path, test_kinds()).await.unwrap();

        idx.add("foo::Bar", "struct", "foo/struct.Bar.html");
        idx.add("foo::Bar", "struct", "foo/struct.Bar.html");
        assert_eq!(idx.pending(), 1);

        let written = idx.flush().await.unwrap();
        assert_eq!(written, 1);

        let rows = SymbolIndex::read_all(&path).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0],
            Symbol {
                name: "foo::Bar".into(),
                kind: "Struct".into(),
                path: "foo/struct.Bar.html".into(),
            }
        );
    }

    #[tokio::test]
    async fn empty_kind_is_noop_and_unknown_kind_is_skipped() {
        let path = temp_index_path("kinds");
        let mut idx = SymbolIndex::create(&path, test_kinds()).await.unwrap();

        idx.add("x", "", "x.html");
        idx.add("y", "no-such-kind", "y.html");
        assert_eq!(idx.pending(), 0);

        idx.add("z", "gd", "z.html");
        assert_eq!(idx.flush().await.unwrap(), 1);

        let rows = SymbolIndex::read_all(&path).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, "Guide");
    }

    #[tokio::test]
    async fn create_discards_previous_store() {
        let path = temp_index_path("fresh");

        let mut idx = SymbolIndex::create(&path, test_kinds()).await.unwrap();
        idx.add("old", "mod", "old/index.html");
        idx.flush().await.unwrap();

        let idx = SymbolIndex::create(&path, test_kinds()).await.unwrap();
        idx.flush().await.unwrap();

        let rows = SymbolIndex::read_all(&path).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn rows_keep_insertion_order() {
        let path = temp_index_path("order");
        let mut idx = SymbolIndex::create(&path, test_kinds()).await.unwrap();

        idx.add("a::new", "method", "a/struct.A.html#method.new");
        idx.add("", "mod", "index.html");
        idx.add("b", "gd", "b.html");
        let written = idx.flush().await.unwrap();
        assert_eq!(written, 3);

        let rows = SymbolIndex::read_all(&path).await.unwrap();
        assert_eq!(rows[0].path, "a/struct.A.html#method.new");
        // The root module's name is the empty string — a valid entry.
        assert_eq!(rows[1].name, "");
        assert_eq!(rows[2].kind, "Guide");
    }
}
