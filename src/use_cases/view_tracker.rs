// View tracking for a mounted content page.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::time::Duration;
use tokio::task::JoinSet;

use crate::domain::errors::{DispatchError, TrackingError};
use crate::domain::ports::{CookieStore, ViewCounter};
use crate::domain::views::IncrementViewsResult;
use crate::use_cases::resolve_guest::GuestIdentifierResolver;

/// Delay before a page view counts.
pub const DEFAULT_DWELL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone)]
pub struct TrackerSettings {
    /// Time the page must stay mounted before a view is reported.
    pub dwell: Duration,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            dwell: DEFAULT_DWELL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TrackerState {
    Idle = 0,
    Waiting = 1,
    Resolving = 2,
    Dispatched = 3,
    // Resolution failed; nothing was sent and the attempt is spent.
    Abandoned = 4,
}

impl From<u8> for TrackerState {
    fn from(value: u8) -> Self {
        match value {
            1 => TrackerState::Waiting,
            2 => TrackerState::Resolving,
            3 => TrackerState::Dispatched,
            4 => TrackerState::Abandoned,
            _ => TrackerState::Idle,
        }
    }
}

// Per-instance tracking record shared with the tracker's own tasks only.
#[derive(Debug)]
struct TrackingAttempt {
    has_tracked: AtomicBool,
    state: AtomicU8,
}

impl TrackingAttempt {
    fn new() -> Self {
        Self {
            has_tracked: AtomicBool::new(false),
            state: AtomicU8::new(TrackerState::Idle as u8),
        }
    }

    // Claims the single dispatch slot. Only the first caller gets `true`.
    fn claim(&self) -> bool {
        self.has_tracked
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn set_state(&self, state: TrackerState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

/// Reports at most one view for a content item per tracker instance.
///
/// Each call to [`ViewTracker::track`] starts a dwell timer; when a timer fires
/// the first one to claim the attempt resolves the guest identifier and sends
/// the increment mutation. Errors are logged and dropped. Pending timers and
/// in-flight dispatches are aborted when the tracker is unmounted or dropped.
pub struct ViewTracker<S, V> {
    content_id: Arc<str>,
    resolver: Arc<GuestIdentifierResolver<S>>,
    counter: Arc<V>,
    settings: TrackerSettings,
    attempt: Arc<TrackingAttempt>,
    tasks: JoinSet<()>,
}

impl<S, V> ViewTracker<S, V>
where
    S: CookieStore + 'static,
    V: ViewCounter + 'static,
{
    pub fn new(
        content_id: impl Into<Arc<str>>,
        resolver: Arc<GuestIdentifierResolver<S>>,
        counter: Arc<V>,
        settings: TrackerSettings,
    ) -> Self {
        Self {
            content_id: content_id.into(),
            resolver,
            counter,
            settings,
            attempt: Arc::new(TrackingAttempt::new()),
            tasks: JoinSet::new(),
        }
    }

    pub fn content_id(&self) -> &str {
        &self.content_id
    }

    pub fn has_tracked(&self) -> bool {
        self.attempt.has_tracked.load(Ordering::Acquire)
    }

    pub fn state(&self) -> TrackerState {
        TrackerState::from(self.attempt.state.load(Ordering::Acquire))
    }

    /// Runs the mount effect: schedules a dispatch after the dwell time.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn track(&mut self) {
        // Reap finished timers so re-runs don't accumulate handles.
        while self.tasks.try_join_next().is_some() {}

        if self.has_tracked() {
            tracing::debug!(content_id = %self.content_id, "view already tracked");
            return;
        }
        if self.state() == TrackerState::Idle {
            self.attempt.set_state(TrackerState::Waiting);
        }

        self.tasks.spawn(dwell_then_dispatch(
            self.content_id.clone(),
            self.resolver.clone(),
            self.counter.clone(),
            self.settings.dwell,
            self.attempt.clone(),
        ));
    }

    /// Waits until every scheduled timer and dispatch has finished.
    pub async fn settled(&mut self) {
        while self.tasks.join_next().await.is_some() {}
    }

    /// Tears the tracker down, cancelling anything still pending.
    pub fn unmount(mut self) {
        self.tasks.abort_all();
        tracing::debug!(content_id = %self.content_id, "view tracker unmounted");
    }
}

async fn dwell_then_dispatch<S, V>(
    content_id: Arc<str>,
    resolver: Arc<GuestIdentifierResolver<S>>,
    counter: Arc<V>,
    dwell: Duration,
    attempt: Arc<TrackingAttempt>,
) where
    S: CookieStore,
    V: ViewCounter,
{
    tokio::time::sleep(dwell).await;

    if !attempt.claim() {
        tracing::debug!(content_id = %content_id, "view already claimed, skipping");
        return;
    }

    attempt.set_state(TrackerState::Resolving);
    let outcome = dispatch(&content_id, &resolver, counter.as_ref(), &attempt).await;

    match outcome {
        Ok(result) => tracing::info!(
            content_id = %content_id,
            views = ?result.data.map(|count| count.views),
            "view tracked"
        ),
        Err(err) => tracing::error!(content_id = %content_id, error = %err, "failed to track view"),
    }
}

#[tracing::instrument(name = "track_view", skip_all, fields(content_id = %content_id))]
async fn dispatch<S, V>(
    content_id: &str,
    resolver: &GuestIdentifierResolver<S>,
    counter: &V,
    attempt: &TrackingAttempt,
) -> Result<IncrementViewsResult, TrackingError>
where
    S: CookieStore,
    V: ViewCounter,
{
    let identifier = match resolver.resolve().await {
        Ok(identifier) => identifier,
        Err(err) => {
            attempt.set_state(TrackerState::Abandoned);
            return Err(err.into());
        }
    };

    let result = counter
        .increment_views(content_id, identifier.as_str())
        .await;
    attempt.set_state(TrackerState::Dispatched);
    let result = result?;
    if !result.success {
        let message = result.message.unwrap_or_else(|| "no message".to_string());
        return Err(DispatchError::Rejected(message).into());
    }

    Ok(result)
}
