//! One-time, session scoped payloads surfaced on the next request.
//!
//! A failed submission writes `{report, form}` under the session and the form
//! path, then redirects back to the form. The next GET of that form reads and
//! clears the payload in one step. Unread payloads expire with the session.
use crate::conf::{self, FlashBackend};
use crate::erx::{self, Erx, Layouted, PreL4, ResultE, ResultEX};
use crate::model::facade::redis::Redis;
use crate::web::input::SubmittedForm;
use crate::web::tools::found;
use crate::web::validation::ErrorReport;
use async_trait::async_trait;
use axum::response::Response;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashPayload {
    pub report: ErrorReport,
    pub form: SubmittedForm,
    pub created_at: i64,
}

impl FlashPayload {
    pub fn new(report: ErrorReport, form: SubmittedForm) -> Self {
        Self { report, form, created_at: chrono::Utc::now().timestamp_micros() }
    }

    fn encode(&self) -> ResultE<String> {
        serde_json::to_string(self).map_err(|e| session_erx("0001", &format!("flash encode: {}", e)))
    }

    fn decode(raw: &str) -> ResultE<FlashPayload> {
        serde_json::from_str(raw).map_err(|e| session_erx("0002", &format!("flash decode: {}", e)))
    }
}

fn session_erx(detail: &str, message: &str) -> Erx {
    Erx::with_code(Layouted::middleware(PreL4::SESS.four(), detail), message)
}

/// `{prefix}:{session}:{path}`
pub fn flash_key(prefix: &str, session: &str, path: &str) -> String {
    format!("{}:{}:{}", prefix, session, path)
}

/// Session scoped flash storage.
///
/// `save` returns only after the backend acknowledged the write. `read` is
/// read-and-clear: a payload is returned at most once.
#[async_trait]
pub trait FlashStore: Send + Sync {
    fn name(&self) -> &'static str;

    async fn save(&self, session: &str, path: &str, payload: &FlashPayload) -> ResultEX;

    async fn read(&self, session: &str, path: &str) -> ResultE<Option<FlashPayload>>;

    async fn clear(&self, session: &str, path: &str) -> ResultEX;
}

/// In-process store, entries live as long as the session ttl. Expired
/// entries are dropped on every save, so abandoned flows do not pile up.
pub struct MemoryFlashStore {
    prefix: String,
    ttl: Duration,
    entries: DashMap<String, (Instant, String)>,
}

impl MemoryFlashStore {
    pub fn new(prefix: &str, ttl: Duration) -> Self {
        Self { prefix: prefix.to_string(), ttl, entries: DashMap::new() }
    }

    /// drop every expired entry, returns how many were removed
    pub fn purge(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, (deadline, _)| *deadline > now);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl FlashStore for MemoryFlashStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn save(&self, session: &str, path: &str, payload: &FlashPayload) -> ResultEX {
        let raw = payload.encode()?;
        let purged = self.purge();
        if purged > 0 {
            debug!("purged {} expired flash entries", purged);
        }
        self.entries.insert(flash_key(&self.prefix, session, path), (Instant::now() + self.ttl, raw));
        Ok(())
    }

    async fn read(&self, session: &str, path: &str) -> ResultE<Option<FlashPayload>> {
        let Some((_, (deadline, raw))) = self.entries.remove(&flash_key(&self.prefix, session, path)) else {
            return Ok(None);
        };

        if deadline <= Instant::now() {
            debug!("flash expired for session {} at {}", session, path);
            return Ok(None);
        }

        FlashPayload::decode(&raw).map(Some)
    }

    async fn clear(&self, session: &str, path: &str) -> ResultEX {
        self.entries.remove(&flash_key(&self.prefix, session, path));
        Ok(())
    }
}

/// Redis store: `SET key value EX ttl` on save, `GETDEL` on read.
pub struct RedisFlashStore {
    prefix: String,
    ttl_secs: u64,
    redis: Redis,
}

impl RedisFlashStore {
    pub fn new(prefix: &str, ttl_secs: u64, redis: Redis) -> Self {
        Self { prefix: prefix.to_string(), ttl_secs, redis }
    }
}

#[async_trait]
impl FlashStore for RedisFlashStore {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn save(&self, session: &str, path: &str, payload: &FlashPayload) -> ResultEX {
        let raw = payload.encode()?;
        self.redis.set_ex(&flash_key(&self.prefix, session, path), raw, self.ttl_secs).await
    }

    async fn read(&self, session: &str, path: &str) -> ResultE<Option<FlashPayload>> {
        let raw: Option<String> = self.redis.getdel(&flash_key(&self.prefix, session, path)).await?;
        match raw {
            None => Ok(None),
            Some(raw) => FlashPayload::decode(&raw).map(Some),
        }
    }

    async fn clear(&self, session: &str, path: &str) -> ResultEX {
        self.redis.del(&flash_key(&self.prefix, session, path)).await.map(|_| ())
    }
}

/// build the configured store
pub fn make_store(session: &conf::Session) -> ResultE<Arc<dyn FlashStore>> {
    let store: Arc<dyn FlashStore> = match session.backend {
        FlashBackend::Memory => Arc::new(MemoryFlashStore::new(&session.prefix, Duration::from_secs(session.ttl_secs))),
        FlashBackend::Redis => {
            let connect = session.redis.as_deref().ok_or_else(|| erx::smp("session.redis is not configured"))?;
            Arc::new(RedisFlashStore::new(&session.prefix, session.ttl_secs, Redis::open(connect)?))
        },
    };

    info!("flash store: {}", store.name());
    Ok(store)
}

/// Stashes a failed submission and sends the browser back to the form.
#[derive(Clone)]
pub struct FlashRedirector {
    store: Arc<dyn FlashStore>,
}

impl FlashRedirector {
    pub fn new(store: Arc<dyn FlashStore>) -> Self {
        Self { store }
    }

    /// The store acknowledges the write before the 302 is built, so an
    /// immediate GET of `target` sees the payload.
    pub async fn redirect_with_errors(
        &self, session: &str, report: ErrorReport, form: SubmittedForm, target: &str,
    ) -> ResultE<Response> {
        let size = report.size();
        let payload = FlashPayload::new(report, form);
        self.store.save(session, target, &payload).await?;

        info!("flashed {} field error(s) for session {}, redirect to {}", size, session, target);
        Ok(found(target))
    }

    /// read-and-clear for the request rendering `path`
    pub async fn consume(&self, session: &str, path: &str) -> ResultE<Option<FlashPayload>> {
        self.store.read(session, path).await
    }
}
