//! Per-browser page state.
//!
//! Everything a page shows between requests (chat messages, the active
//! search, uploaded previews, the last generated image, one-shot notices)
//! lives here, keyed by a cookie. Nothing is persisted; a session is dropped
//! after sitting idle for the configured time, swept on incoming requests.

use std::{
    collections::HashSet,
    sync::Arc,
    time::{Duration, Instant},
};

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::pages::{recommend::Chat, try_on::TryOnView, wardrobe::WardrobeView};

/// User actions that talk to a service. Each may have one request in flight
/// per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Upload,
    Search,
    Recommend,
    TryOn,
}

/// Shown once on the next render, then discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Success(String),
    Error(String),
}

#[derive(Debug)]
pub struct Session {
    last_seen: Instant,
    busy: HashSet<Action>,
    notice: Option<Notice>,
    pub chat: Chat,
    pub wardrobe: WardrobeView,
    pub try_on: TryOnView,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            last_seen: Instant::now(),
            busy: HashSet::new(),
            notice: None,
            chat: Chat::default(),
            wardrobe: WardrobeView::default(),
            try_on: TryOnView::default(),
        }
    }
}

impl Session {
    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn is_busy(&self, action: Action) -> bool {
        self.busy.contains(&action)
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

/// Upper bound on how often idle sessions are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Clone, Debug)]
pub struct Sessions {
    cookie_name: String,
    ttl: Duration,
    sessions: Arc<DashMap<Uuid, SessionHandle>>,
    last_sweep: Arc<Mutex<Instant>>,
}

impl Sessions {
    pub fn new(cookie_name: String, ttl: Duration) -> Self {
        Self {
            cookie_name,
            ttl,
            sessions: Arc::new(DashMap::new()),
            last_sweep: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Finds the session named by the cookie, or starts a new one and sets
    /// the cookie on the returned jar.
    pub fn resolve(&self, jar: CookieJar) -> (CookieJar, SessionHandle) {
        if self.sweep_due() {
            self.evict_idle();
        }

        let known = jar
            .get(&self.cookie_name)
            .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
            .and_then(|id| self.sessions.get(&id).map(|s| s.value().clone()));

        if let Some(session) = known {
            session.lock().last_seen = Instant::now();
            return (jar, session);
        }

        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(Session::default()));
        self.sessions.insert(id, session.clone());
        debug!(task = "new session", sessions = self.sessions.len());

        let cookie = Cookie::build((self.cookie_name.clone(), id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);

        (jar.add(cookie), session)
    }

    /// At most one sweep per `SWEEP_INTERVAL`, or per ttl when that is shorter.
    fn sweep_due(&self) -> bool {
        let mut last_sweep = self.last_sweep.lock();
        if last_sweep.elapsed() < self.ttl.min(SWEEP_INTERVAL) {
            return false;
        }

        *last_sweep = Instant::now();
        true
    }

    fn evict_idle(&self) {
        let before = self.sessions.len();
        let ttl = self.ttl;
        self.sessions
            .retain(|_, session| session.lock().last_seen.elapsed() < ttl);

        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            info!(task = "evict sessions", evicted = evicted);
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Marks an action as in flight until dropped.
#[derive(Debug)]
pub struct Busy {
    session: SessionHandle,
    action: Action,
}

impl Busy {
    /// `None` when the action is already running for this session.
    pub fn begin(session: &SessionHandle, action: Action) -> Option<Busy> {
        if !session.lock().busy.insert(action) {
            return None;
        }

        Some(Busy {
            session: session.clone(),
            action,
        })
    }
}

impl Drop for Busy {
    fn drop(&mut self) {
        self.session.lock().busy.remove(&self.action);
    }
}
