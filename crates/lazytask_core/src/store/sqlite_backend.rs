//! Embedded SQLite emulation of Redis hash/set/list primitives.
//!
//! # Responsibility
//! - Give single-process deployments and tests a store without a server.
//! - Keep the same key layout as the Redis backend.
//!
//! # Invariants
//! - Each primitive runs as one SQLite statement or one transaction.
//! - Set members enumerate in first-insertion order (`rowid`).
//! - List positions grow monotonically per key.

use super::{FieldMap, KvBackend, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Key-value backend stored in SQLite tables `kv_hashes`, `kv_sets`, `kv_lists`.
pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Opens (and migrates) a file-backed store.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a private in-memory store.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }
}

impl KvBackend for SqliteBackend {
    fn kind(&self) -> &'static str {
        "sqlite"
    }

    fn ping(&mut self) -> StoreResult<()> {
        self.conn.query_row("SELECT 1;", [], |_| Ok(()))?;
        Ok(())
    }

    fn exists(&mut self, key: &str) -> StoreResult<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM kv_hashes WHERE key = ?1
                 UNION ALL SELECT 1 FROM kv_sets WHERE key = ?1
                 UNION ALL SELECT 1 FROM kv_lists WHERE key = ?1
                 LIMIT 1;",
                [key],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn hexists(&mut self, key: &str, field: &str) -> StoreResult<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM kv_hashes WHERE key = ?1 AND field = ?2;",
                params![key, field],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn hset(&mut self, key: &str, fields: &[(&str, &str)]) -> StoreResult<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO kv_hashes (key, field, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT (key, field) DO UPDATE SET value = excluded.value;",
            )?;
            for &(field, value) in fields {
                stmt.execute(params![key, field, value])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn hgetall(&mut self, key: &str) -> StoreResult<FieldMap> {
        read_hash(&self.conn, key)
    }

    fn hgetall_many(&mut self, keys: &[String]) -> StoreResult<Vec<FieldMap>> {
        let tx = self.conn.transaction()?;
        let mut rows = Vec::with_capacity(keys.len());
        for key in keys {
            rows.push(read_hash(&tx, key)?);
        }
        tx.commit()?;
        Ok(rows)
    }

    fn sadd(&mut self, key: &str, member: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO kv_sets (key, member) VALUES (?1, ?2);",
            params![key, member],
        )?;
        Ok(())
    }

    fn smembers(&mut self, key: &str) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT member FROM kv_sets WHERE key = ?1 ORDER BY rowid ASC;")?;
        let members = stmt
            .query_map([key], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(members)
    }

    fn rpush(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_lists (key, position, value)
             VALUES (
                ?1,
                (SELECT COALESCE(MAX(position), -1) + 1 FROM kv_lists WHERE key = ?1),
                ?2
             );",
            params![key, value],
        )?;
        Ok(())
    }

    fn lrange_all(&mut self, key: &str) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM kv_lists WHERE key = ?1 ORDER BY position ASC;")?;
        let values = stmt
            .query_map([key], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(values)
    }
}

fn read_hash(conn: &Connection, key: &str) -> StoreResult<FieldMap> {
    let mut stmt = conn.prepare_cached("SELECT field, value FROM kv_hashes WHERE key = ?1;")?;
    let fields = stmt
        .query_map([key], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<Result<FieldMap, _>>()?;
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::SqliteBackend;
    use crate::store::KvBackend;

    #[test]
    fn hset_merges_fields_and_hgetall_reads_them_back() {
        let mut backend = SqliteBackend::open_in_memory().unwrap();
        backend.hset("h", &[("a", "1"), ("b", "2")]).unwrap();
        backend.hset("h", &[("b", "3")]).unwrap();

        let fields = backend.hgetall("h").unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["a"], "1");
        assert_eq!(fields["b"], "3");
        assert!(backend.hgetall("missing").unwrap().is_empty());
    }

    #[test]
    fn exists_covers_every_collection_kind() {
        let mut backend = SqliteBackend::open_in_memory().unwrap();
        assert!(!backend.exists("k").unwrap());
        backend.sadd("s", "x").unwrap();
        backend.rpush("l", "x").unwrap();
        backend.hset("h", &[("f", "v")]).unwrap();
        assert!(backend.exists("s").unwrap());
        assert!(backend.exists("l").unwrap());
        assert!(backend.exists("h").unwrap());
    }

    #[test]
    fn hexists_only_matches_hash_fields() {
        let mut backend = SqliteBackend::open_in_memory().unwrap();
        backend.hset("h", &[("id", "1")]).unwrap();
        backend.sadd("s", "id").unwrap();
        backend.rpush("l", "id").unwrap();

        assert!(backend.hexists("h", "id").unwrap());
        assert!(!backend.hexists("h", "name").unwrap());
        assert!(!backend.hexists("s", "id").unwrap());
        assert!(!backend.hexists("l", "id").unwrap());
    }

    #[test]
    fn sets_ignore_duplicates_and_lists_keep_them_in_order() {
        let mut backend = SqliteBackend::open_in_memory().unwrap();
        backend.sadd("s", "b").unwrap();
        backend.sadd("s", "a").unwrap();
        backend.sadd("s", "b").unwrap();
        assert_eq!(backend.smembers("s").unwrap(), vec!["b", "a"]);

        backend.rpush("l", "x").unwrap();
        backend.rpush("l", "y").unwrap();
        backend.rpush("l", "x").unwrap();
        backend.rpush("other", "z").unwrap();
        assert_eq!(backend.lrange_all("l").unwrap(), vec!["x", "y", "x"]);
        assert!(backend.lrange_all("missing").unwrap().is_empty());
    }

    #[test]
    fn hgetall_many_preserves_key_order_and_reports_missing_as_empty() {
        let mut backend = SqliteBackend::open_in_memory().unwrap();
        backend.hset("one", &[("id", "1")]).unwrap();
        backend.hset("two", &[("id", "2")]).unwrap();

        let keys = vec!["two".to_string(), "ghost".to_string(), "one".to_string()];
        let rows = backend.hgetall_many(&keys).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["id"], "2");
        assert!(rows[1].is_empty());
        assert_eq!(rows[2]["id"], "1");
    }
}
