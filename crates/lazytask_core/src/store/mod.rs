//! Key-value store client and backends.
//!
//! # Responsibility
//! - Expose hash/set/list primitives used by repositories.
//! - Own the single shared store connection and its lifecycle.
//! - Hide backend differences (Redis vs embedded SQLite) behind `KvBackend`.
//!
//! # Invariants
//! - Every primitive is atomic per command; nothing spans commands.
//! - A command that fails at the connection level is retried once.

mod client;
mod redis_backend;
mod sqlite_backend;
mod url;

pub use client::StoreClient;
pub use redis_backend::RedisBackend;
pub use sqlite_backend::SqliteBackend;
pub use url::StoreUrl;

use crate::db::DbError;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Flat string field mapping stored under one hash key.
pub type FieldMap = HashMap<String, String>;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the store client and its backends.
#[derive(Debug)]
pub enum StoreError {
    /// Connection could not be established or the store stopped answering.
    Unavailable(String),
    /// Connection string is missing a supported scheme.
    UnsupportedUrl(String),
    /// Redis command failure.
    Redis(redis::RedisError),
    /// Embedded SQLite failure.
    Db(DbError),
}

impl StoreError {
    /// Whether the failure is transport-level and worth a reconnect.
    pub fn is_connection_error(&self) -> bool {
        match self {
            Self::Unavailable(_) => true,
            Self::Redis(err) => {
                err.is_io_error()
                    || err.is_connection_dropped()
                    || err.is_connection_refusal()
                    || err.is_timeout()
            }
            Self::UnsupportedUrl(_) | Self::Db(_) => false,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
            Self::UnsupportedUrl(url) => write!(
                f,
                "unsupported store url `{url}`; expected redis://, rediss://, sqlite://<path> or sqlite::memory:"
            ),
            Self::Redis(err) => write!(f, "redis error: {err}"),
            Self::Db(err) => write!(f, "sqlite store error: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Redis(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Unavailable(_) | Self::UnsupportedUrl(_) => None,
        }
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(value: redis::RedisError) -> Self {
        Self::Redis(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Primitive commands a key-value backend must provide.
///
/// Semantics follow Redis: missing keys read as empty collections, writes
/// create keys on demand.
pub trait KvBackend: Send {
    /// Short backend label used in log events.
    fn kind(&self) -> &'static str;
    fn ping(&mut self) -> StoreResult<()>;
    fn exists(&mut self, key: &str) -> StoreResult<bool>;
    /// Whether `key` is a hash holding `field`; other key types read as false.
    fn hexists(&mut self, key: &str, field: &str) -> StoreResult<bool>;
    /// Sets every `(field, value)` pair on the hash, keeping other fields.
    fn hset(&mut self, key: &str, fields: &[(&str, &str)]) -> StoreResult<()>;
    fn hgetall(&mut self, key: &str) -> StoreResult<FieldMap>;
    /// Reads many hashes in one round-trip, preserving `keys` order.
    fn hgetall_many(&mut self, keys: &[String]) -> StoreResult<Vec<FieldMap>>;
    fn sadd(&mut self, key: &str, member: &str) -> StoreResult<()>;
    fn smembers(&mut self, key: &str) -> StoreResult<Vec<String>>;
    fn rpush(&mut self, key: &str, value: &str) -> StoreResult<()>;
    /// Returns the whole list (`LRANGE key 0 -1`).
    fn lrange_all(&mut self, key: &str) -> StoreResult<Vec<String>>;
}
