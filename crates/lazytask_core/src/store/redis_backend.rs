//! Redis-backed key-value primitives.
//!
//! # Invariants
//! - One synchronous connection per backend; the client serializes access.
//! - Batched hash reads use a non-transactional pipeline.

use super::{FieldMap, KvBackend, StoreError, StoreResult};
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// Key-value backend speaking to a Redis server.
pub struct RedisBackend {
    conn: redis::Connection,
}

impl RedisBackend {
    /// Opens a connection to `url`.
    ///
    /// # Errors
    /// - `Unavailable` when the URL is malformed or the server cannot be reached.
    pub fn connect(url: &str) -> StoreResult<Self> {
        let client = redis::Client::open(url)
            .map_err(|err| StoreError::Unavailable(format!("invalid redis url: {err}")))?;
        let conn = client
            .get_connection_with_timeout(CONNECT_TIMEOUT)
            .map_err(|err| StoreError::Unavailable(format!("redis connect failed: {err}")))?;
        conn.set_read_timeout(Some(COMMAND_TIMEOUT))?;
        conn.set_write_timeout(Some(COMMAND_TIMEOUT))?;
        Ok(Self { conn })
    }
}

impl KvBackend for RedisBackend {
    fn kind(&self) -> &'static str {
        "redis"
    }

    fn ping(&mut self) -> StoreResult<()> {
        redis::cmd("PING").query::<String>(&mut self.conn)?;
        Ok(())
    }

    fn exists(&mut self, key: &str) -> StoreResult<bool> {
        let count: i64 = redis::cmd("EXISTS").arg(key).query(&mut self.conn)?;
        Ok(count > 0)
    }

    fn hexists(&mut self, key: &str, field: &str) -> StoreResult<bool> {
        // HEXISTS on a set or list answers WRONGTYPE; check the type first.
        let kind: String = redis::cmd("TYPE").arg(key).query(&mut self.conn)?;
        if kind != "hash" {
            return Ok(false);
        }
        Ok(redis::cmd("HEXISTS")
            .arg(key)
            .arg(field)
            .query(&mut self.conn)?)
    }

    fn hset(&mut self, key: &str, fields: &[(&str, &str)]) -> StoreResult<()> {
        if fields.is_empty() {
            return Ok(());
        }
        let mut cmd = redis::cmd("HSET");
        cmd.arg(key);
        for (field, value) in fields {
            cmd.arg(*field).arg(*value);
        }
        cmd.query::<()>(&mut self.conn)?;
        Ok(())
    }

    fn hgetall(&mut self, key: &str) -> StoreResult<FieldMap> {
        Ok(redis::cmd("HGETALL").arg(key).query(&mut self.conn)?)
    }

    fn hgetall_many(&mut self, keys: &[String]) -> StoreResult<Vec<FieldMap>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut pipe = redis::pipe();
        for key in keys {
            pipe.cmd("HGETALL").arg(key);
        }
        Ok(pipe.query(&mut self.conn)?)
    }

    fn sadd(&mut self, key: &str, member: &str) -> StoreResult<()> {
        redis::cmd("SADD")
            .arg(key)
            .arg(member)
            .query::<()>(&mut self.conn)?;
        Ok(())
    }

    fn smembers(&mut self, key: &str) -> StoreResult<Vec<String>> {
        Ok(redis::cmd("SMEMBERS").arg(key).query(&mut self.conn)?)
    }

    fn rpush(&mut self, key: &str, value: &str) -> StoreResult<()> {
        redis::cmd("RPUSH")
            .arg(key)
            .arg(value)
            .query::<()>(&mut self.conn)?;
        Ok(())
    }

    fn lrange_all(&mut self, key: &str) -> StoreResult<Vec<String>> {
        Ok(redis::cmd("LRANGE")
            .arg(key)
            .arg(0)
            .arg(-1)
            .query(&mut self.conn)?)
    }
}
