// src/engine/session_cache.rs

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, oneshot};
use tokio::task::JoinHandle;

use crate::engine::QuizError;
use crate::models::session::Session;
use crate::utils::clock::Clock;

/// In-memory store of quizzes in flight, keyed by session id.
///
/// Expiry is sweep-driven only: `get` never checks age, so a session stays
/// readable until the next sweep after its max age has passed. Sessions are
/// handed out as `Arc`s; a sweep removing an entry never affects a reader
/// already holding it.
///
/// The cache is process-local. Instances behind a load balancer without
/// session affinity will not see each other's quizzes.
pub struct SessionCache {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    clock: Arc<dyn Clock>,
    max_age: chrono::Duration,
}

impl SessionCache {
    pub fn new(clock: Arc<dyn Clock>, max_age: Duration) -> Self {
        let max_age = chrono::Duration::from_std(max_age).unwrap_or(chrono::Duration::MAX);
        Self {
            sessions: RwLock::new(HashMap::new()),
            clock,
            max_age,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Inserts a new session. A duplicate id is an internal error; ids are
    /// generated fresh and must never collide.
    pub async fn put(&self, session: Session) -> Result<(), QuizError> {
        let mut sessions = self.sessions.write().await;
        match sessions.entry(session.session_id.clone()) {
            Entry::Occupied(entry) => Err(QuizError::SessionIdCollision(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(session));
                Ok(())
            }
        }
    }

    pub async fn get(&self, session_id: &str) -> Option<Arc<Session>> {
        self.sessions.read().await.get(session_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Removes every session whose age at `now` has reached `max_age`.
    /// Returns the number of sessions evicted.
    pub async fn sweep(&self, now: DateTime<Utc>, max_age: chrono::Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| now - session.created_at < max_age);
        before - sessions.len()
    }

    /// Sweeps using the cache's own clock and configured max age.
    pub async fn sweep_expired(&self) -> usize {
        let evicted = self.sweep(self.clock.now(), self.max_age).await;
        if evicted > 0 {
            tracing::info!("Evicted {} expired quiz session(s)", evicted);
        } else {
            tracing::debug!("Session sweep found nothing to evict");
        }
        evicted
    }

    /// Spawns the periodic eviction task on the current tokio runtime.
    pub fn start(self: &Arc<Self>, interval: Duration) -> SweeperHandle {
        let cache = Arc::clone(self);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; skip it so the first
            // sweep happens one full interval after start.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        cache.sweep_expired().await;
                    }
                    _ = &mut shutdown_rx => break,
                }
            }
            tracing::info!("Session sweeper stopped");
        });

        tracing::info!("Session sweeper started (interval {:?})", interval);
        SweeperHandle {
            shutdown: Some(shutdown_tx),
            task,
        }
    }
}

/// Owns the background sweep task. Dropping the handle without calling
/// [`SweeperHandle::stop`] also ends the task.
pub struct SweeperHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            tracing::error!("Session sweeper task failed: {:?}", e);
        }
    }
}
