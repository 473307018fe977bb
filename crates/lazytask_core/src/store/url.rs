use super::{StoreError, StoreResult};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const SQLITE_MEMORY_URL: &str = "sqlite::memory:";
const SQLITE_FILE_PREFIX: &str = "sqlite://";

/// Parsed store connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUrl {
    /// `redis://` or `rediss://` URL passed through to the Redis client.
    Redis(String),
    /// `sqlite://<path>` file-backed embedded store.
    SqliteFile(PathBuf),
    /// `sqlite::memory:` process-private embedded store.
    SqliteMemory,
}

impl StoreUrl {
    pub fn parse(raw: &str) -> StoreResult<Self> {
        let trimmed = raw.trim();
        if trimmed.starts_with("redis://") || trimmed.starts_with("rediss://") {
            return Ok(Self::Redis(trimmed.to_string()));
        }
        if trimmed == SQLITE_MEMORY_URL {
            return Ok(Self::SqliteMemory);
        }
        if let Some(path) = trimmed.strip_prefix(SQLITE_FILE_PREFIX) {
            if !path.is_empty() {
                return Ok(Self::SqliteFile(PathBuf::from(path)));
            }
        }
        Err(StoreError::UnsupportedUrl(redact(trimmed)))
    }

    /// Backend label for log events; never includes credentials.
    pub fn backend_label(&self) -> &'static str {
        match self {
            Self::Redis(_) => "redis",
            Self::SqliteFile(_) => "sqlite_file",
            Self::SqliteMemory => "sqlite_memory",
        }
    }
}

impl Display for StoreUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Redis(url) => write!(f, "{}", redact(url)),
            Self::SqliteFile(path) => write!(f, "{SQLITE_FILE_PREFIX}{}", path.display()),
            Self::SqliteMemory => write!(f, "{SQLITE_MEMORY_URL}"),
        }
    }
}

/// Replaces `user:password@` in a URL authority with `***@`.
fn redact(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    match rest.split_once('@') {
        Some((_, host)) => format!("{scheme}://***@{host}"),
        None => url.to_string(),
    }
}
