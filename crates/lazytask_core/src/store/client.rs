//! Shared store handle with lazy connect and single-retry policy.
//!
//! # Responsibility
//! - Own the one backend connection used by every repository call.
//! - Provide explicit `connect` / `health_check` / `close` lifecycle.
//!
//! # Invariants
//! - At most one backend connection exists per client.
//! - A command failing with a connection-level error is retried exactly once
//!   on a fresh connection, then surfaced.
//! - Commands from concurrent callers are serialized; no cross-command lock.

use super::{
    FieldMap, KvBackend, RedisBackend, SqliteBackend, StoreError, StoreResult, StoreUrl,
};
use log::{debug, error, info, warn};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

type BackendSlot = Option<Box<dyn KvBackend>>;

/// Process-wide key-value store handle, shared by reference.
pub struct StoreClient {
    url: StoreUrl,
    backend: Mutex<BackendSlot>,
}

impl StoreClient {
    /// Creates a client for `url` without connecting.
    ///
    /// # Errors
    /// - `UnsupportedUrl` when the scheme is not recognized.
    pub fn new(url: &str) -> StoreResult<Self> {
        Ok(Self::from_url(StoreUrl::parse(url)?))
    }

    /// Creates a client for an already parsed URL without connecting.
    pub fn from_url(url: StoreUrl) -> Self {
        Self {
            url,
            backend: Mutex::new(None),
        }
    }

    /// Wraps an already open backend; used by tests and embedded callers.
    pub fn with_backend(url: StoreUrl, backend: Box<dyn KvBackend>) -> Self {
        Self {
            url,
            backend: Mutex::new(Some(backend)),
        }
    }

    pub fn url(&self) -> &StoreUrl {
        &self.url
    }

    /// Returns whether a backend connection is currently held.
    pub fn is_connected(&self) -> bool {
        self.lock().is_some()
    }

    /// Establishes the connection if needed, then verifies liveness.
    ///
    /// Idempotent: on an open connection this is only a ping.
    pub fn connect(&self) -> StoreResult<()> {
        let started_at = Instant::now();
        let backend_label = self.url.backend_label();
        info!("event=store_connect module=store status=start backend={backend_label}");
        match self.health_check() {
            Ok(()) => {
                info!(
                    "event=store_connect module=store status=ok backend={backend_label} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_connect module=store status=error backend={backend_label} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    /// Issues a ping round-trip.
    ///
    /// # Errors
    /// - `Unavailable` when the store cannot be reached or does not answer.
    pub fn health_check(&self) -> StoreResult<()> {
        self.run("ping", |backend| backend.ping())
            .map_err(|err| match err {
                StoreError::Unavailable(_) => err,
                other => StoreError::Unavailable(other.to_string()),
            })
    }

    /// Drops the backend connection. The next command reconnects lazily.
    pub fn close(&self) {
        if self.lock().take().is_some() {
            info!(
                "event=store_close module=store status=ok backend={}",
                self.url.backend_label()
            );
        }
    }

    pub fn exists(&self, key: &str) -> StoreResult<bool> {
        self.run("exists", |backend| backend.exists(key))
    }

    pub fn hexists(&self, key: &str, field: &str) -> StoreResult<bool> {
        self.run("hexists", |backend| backend.hexists(key, field))
    }

    pub fn hset(&self, key: &str, fields: &[(&str, &str)]) -> StoreResult<()> {
        self.run("hset", |backend| backend.hset(key, fields))
    }

    pub fn hgetall(&self, key: &str) -> StoreResult<FieldMap> {
        self.run("hgetall", |backend| backend.hgetall(key))
    }

    /// Reads many hashes in one batched round-trip (not a transaction).
    pub fn hgetall_many(&self, keys: &[String]) -> StoreResult<Vec<FieldMap>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        self.run("hgetall_many", |backend| backend.hgetall_many(keys))
    }

    pub fn sadd(&self, key: &str, member: &str) -> StoreResult<()> {
        self.run("sadd", |backend| backend.sadd(key, member))
    }

    pub fn smembers(&self, key: &str) -> StoreResult<Vec<String>> {
        self.run("smembers", |backend| backend.smembers(key))
    }

    pub fn rpush(&self, key: &str, value: &str) -> StoreResult<()> {
        self.run("rpush", |backend| backend.rpush(key, value))
    }

    pub fn lrange_all(&self, key: &str) -> StoreResult<Vec<String>> {
        self.run("lrange", |backend| backend.lrange_all(key))
    }

    fn run<T>(
        &self,
        command: &'static str,
        mut op: impl FnMut(&mut dyn KvBackend) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let started_at = Instant::now();
        let mut slot = self.lock();

        let result = match self.attempt(&mut slot, &mut op) {
            Err(err) if err.is_connection_error() => {
                warn!(
                    "event=store_command module=store status=retry command={command} error={err}"
                );
                *slot = None;
                self.attempt(&mut slot, &mut op)
            }
            other => other,
        };

        match &result {
            Ok(_) => debug!(
                "event=store_command module=store status=ok command={command} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => {
                if err.is_connection_error() {
                    *slot = None;
                }
                error!(
                    "event=store_command module=store status=error command={command} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
            }
        }
        result
    }

    fn attempt<T>(
        &self,
        slot: &mut BackendSlot,
        op: &mut impl FnMut(&mut dyn KvBackend) -> StoreResult<T>,
    ) -> StoreResult<T> {
        if slot.is_none() {
            *slot = Some(self.open_backend()?);
        }
        match slot.as_deref_mut() {
            Some(backend) => op(backend),
            None => Err(StoreError::Unavailable("no store connection".to_string())),
        }
    }

    fn open_backend(&self) -> StoreResult<Box<dyn KvBackend>> {
        let opened: StoreResult<Box<dyn KvBackend>> = match &self.url {
            StoreUrl::Redis(url) => RedisBackend::connect(url).map(|b| Box::new(b) as _),
            StoreUrl::SqliteFile(path) => SqliteBackend::open(path).map(|b| Box::new(b) as _),
            StoreUrl::SqliteMemory => SqliteBackend::open_in_memory().map(|b| Box::new(b) as _),
        };
        match opened {
            Ok(backend) => {
                debug!(
                    "event=store_open module=store status=ok backend={}",
                    backend.kind()
                );
                Ok(backend)
            }
            Err(StoreError::Unavailable(message)) => Err(StoreError::Unavailable(message)),
            Err(other) => Err(StoreError::Unavailable(other.to_string())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BackendSlot> {
        // A panic inside one command leaves the slot usable; the next
        // connection-level failure replaces the backend anyway.
        self.backend.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
