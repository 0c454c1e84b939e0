use std::sync::Arc;
use std::time::{Duration, Instant};

use common::Platform;
use common::leaderboard::{LeaderboardKind, LeaderboardRow, UserSubmissionHistory};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::{AdminAction, ClientError, LeaderboardApi};
use crate::heatmap::Heatmap;
use crate::session::Session;

/// How long a toast stays visible after it is raised.
pub const TOAST_TTL: Duration = Duration::from_secs(5);

pub const LOAD_ERROR_MESSAGE: &str = "Failed to load leaderboard data. Please try again later.";

#[derive(Clone, Debug, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Success(Vec<LeaderboardRow>),
    Error(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub raised_at: Instant,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) >= TOAST_TTL
    }
}

/// Result of a background fetch, tagged with the generation that started it.
/// Table results carry the table generation, heatmap results the filter
/// generation.
#[derive(Debug)]
enum PageEvent {
    Table(u64, Result<Vec<LeaderboardRow>, ClientError>),
    Heatmap(u64, Result<Vec<UserSubmissionHistory>, ClientError>),
}

/// State of the leaderboard page.
///
/// Changing the metric or platform starts a new generation: in-flight fetches
/// from the previous one are aborted, and any result that still arrives for an
/// old generation is dropped. Every table fetch, including the reload after an
/// admin action, also takes a fresh table generation so only the latest table
/// result is applied.
pub struct LeaderboardPage {
    api: Arc<dyn LeaderboardApi>,
    session: Session,
    kind: LeaderboardKind,
    platform: Option<Platform>,
    year: i32,
    state: LoadState,
    heatmap: Heatmap,
    heatmap_pending: bool,
    action_loading: bool,
    toast: Option<Toast>,
    generation: u64,
    table_generation: u64,
    table_task: Option<JoinHandle<()>>,
    heatmap_task: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<PageEvent>,
    rx: mpsc::UnboundedReceiver<PageEvent>,
}

impl LeaderboardPage {
    pub fn new(api: Arc<dyn LeaderboardApi>, session: Session, year: i32) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            session,
            kind: LeaderboardKind::default(),
            platform: None,
            year,
            state: LoadState::Idle,
            heatmap: Heatmap::empty(year),
            heatmap_pending: false,
            action_loading: false,
            toast: None,
            generation: 0,
            table_generation: 0,
            table_task: None,
            heatmap_task: None,
            tx,
            rx,
        }
    }

    /// Set the initial filters without fetching.
    pub fn with_filters(mut self, kind: LeaderboardKind, platform: Option<Platform>) -> Self {
        self.kind = kind;
        self.platform = platform;
        self
    }

    pub fn kind(&self) -> LeaderboardKind {
        self.kind
    }

    pub fn platform(&self) -> Option<Platform> {
        self.platform
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn heatmap(&self) -> &Heatmap {
        &self.heatmap
    }

    pub fn action_loading(&self) -> bool {
        self.action_loading
    }

    pub fn show_admin_controls(&self) -> bool {
        self.session.is_admin()
    }

    /// The toast, unless it has expired by `now`.
    pub fn toast(&self, now: Instant) -> Option<&Toast> {
        self.toast.as_ref().filter(|t| !t.is_expired(now))
    }

    /// Drop the toast once it has expired.
    pub fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }
    }

    /// Start loading the table and the heatmap for the current filters.
    pub fn load(&mut self) {
        self.abort_in_flight();
        self.generation += 1;
        self.spawn_table_fetch();
        self.spawn_heatmap_fetch();
    }

    pub fn set_kind(&mut self, kind: LeaderboardKind) {
        if self.kind != kind {
            self.kind = kind;
            self.load();
        }
    }

    pub fn set_platform(&mut self, platform: Option<Platform>) {
        if self.platform != platform {
            self.platform = platform;
            self.load();
        }
    }

    fn abort_in_flight(&mut self) {
        for task in [self.table_task.take(), self.heatmap_task.take()]
            .into_iter()
            .flatten()
        {
            task.abort();
        }
    }

    fn spawn_table_fetch(&mut self) {
        if let Some(task) = self.table_task.take() {
            task.abort();
        }
        self.table_generation += 1;
        self.state = LoadState::Loading;

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let (generation, kind, platform) = (self.table_generation, self.kind, self.platform);
        self.table_task = Some(tokio::spawn(async move {
            let result = api.leaderboard(kind, platform).await;
            let _ = tx.send(PageEvent::Table(generation, result));
        }));
    }

    fn spawn_heatmap_fetch(&mut self) {
        self.heatmap_pending = true;

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let (generation, platform, year) = (self.generation, self.platform, self.year);
        self.heatmap_task = Some(tokio::spawn(async move {
            let result = api.submission_history(platform, year).await;
            let _ = tx.send(PageEvent::Heatmap(generation, result));
        }));
    }

    fn is_settled(&self) -> bool {
        self.state != LoadState::Loading && !self.heatmap_pending
    }

    /// Wait until the current generation's table and heatmap have both arrived.
    pub async fn settle(&mut self) {
        while !self.is_settled() {
            match self.rx.recv().await {
                Some(event) => self.apply(event),
                None => break,
            }
        }
    }

    fn apply(&mut self, event: PageEvent) {
        match event {
            PageEvent::Table(generation, _) if generation != self.table_generation => {
                debug!(generation, current = self.table_generation, "Dropping stale table");
            }
            PageEvent::Heatmap(generation, _) if generation != self.generation => {
                debug!(generation, current = self.generation, "Dropping stale heatmap");
            }
            PageEvent::Table(_, Ok(rows)) => {
                self.table_task = None;
                self.state = LoadState::Success(rows);
            }
            PageEvent::Table(_, Err(e)) => {
                warn!("Error fetching leaderboard: {}", e);
                self.table_task = None;
                self.state = LoadState::Error(LOAD_ERROR_MESSAGE.to_string());
            }
            PageEvent::Heatmap(_, result) => {
                self.heatmap_task = None;
                self.heatmap_pending = false;
                self.heatmap = match result {
                    Ok(histories) => Heatmap::from_histories(self.year, &histories),
                    Err(e) => {
                        warn!("Error fetching heatmap data: {}", e);
                        Heatmap::empty(self.year)
                    }
                };
            }
        }
    }

    /// Run an admin action. On success the table is reloaded; either way a
    /// toast reports the outcome.
    pub async fn run_admin_action(&mut self, action: AdminAction) {
        if !self.session.is_admin() {
            self.raise_toast(ToastKind::Error, "Admin privileges required.".into());
            return;
        }
        if self.action_loading {
            return;
        }

        self.action_loading = true;
        self.toast = None;
        let result = self.api.run_admin(action).await;
        self.action_loading = false;

        match result {
            Ok(message) => {
                self.raise_toast(ToastKind::Success, message);
                self.spawn_table_fetch();
            }
            Err(e) => {
                warn!("{} failed: {}", action.label(), e);
                self.raise_toast(ToastKind::Error, action.failure_message().into());
            }
        }
    }

    fn raise_toast(&mut self, kind: ToastKind, message: String) {
        self.toast = Some(Toast {
            kind,
            message,
            raised_at: Instant::now(),
        });
    }
}

impl Drop for LeaderboardPage {
    fn drop(&mut self) {
        self.abort_in_flight();
    }
}
