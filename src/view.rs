use std::sync::{Arc, Mutex, MutexGuard};

use chrono_tz::Tz;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::client::{FetchError, WorkoutClient};
use crate::render::{self, EMPTY_HTML, ERROR_HTML, LOADING_HTML};

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Failed to render workouts: {0}")]
    Render(#[from] askama::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState {
    Idle,
    Loading,
    Empty,
    Error,
    Populated(String),
}

impl DisplayState {
    pub fn html(&self) -> &str {
        match self {
            DisplayState::Idle => "",
            DisplayState::Loading => LOADING_HTML,
            DisplayState::Empty => EMPTY_HTML,
            DisplayState::Error => ERROR_HTML,
            DisplayState::Populated(cards) => cards.as_str(),
        }
    }
}

/// Issued by [`DisplayRegion::begin`]; only the latest ticket may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug)]
struct RegionInner {
    latest: u64,
    state: DisplayState,
}

/// Handle to the `workoutList` region. Clones share the same content.
#[derive(Debug, Clone)]
pub struct DisplayRegion {
    inner: Arc<Mutex<RegionInner>>,
}

impl Default for DisplayRegion {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayRegion {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(RegionInner {
                latest: 0,
                state: DisplayState::Idle,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegionInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn begin(&self) -> Ticket {
        Self::advance(&mut self.lock())
    }

    /// Like [`begin`](Self::begin), setting `filter` under the same lock so the
    /// latest ticket always belongs to the latest filter value.
    pub fn begin_filtered(&self, filter: &FilterControl, user_id: &str) -> Ticket {
        let mut inner = self.lock();
        filter.set(user_id);
        Self::advance(&mut inner)
    }

    fn advance(inner: &mut RegionInner) -> Ticket {
        inner.latest += 1;
        inner.state = DisplayState::Loading;
        Ticket(inner.latest)
    }

    /// Returns `false` and leaves the region untouched if `ticket` is stale.
    pub fn commit(&self, ticket: Ticket, state: DisplayState) -> bool {
        let mut inner = self.lock();
        if ticket.0 != inner.latest {
            return false;
        }
        inner.state = state;
        true
    }

    pub fn snapshot(&self) -> DisplayState {
        self.lock().state.clone()
    }

    pub fn html(&self) -> String {
        self.lock().state.html().to_string()
    }
}

/// Handle to the `userFilter` control. An empty value means no filter.
#[derive(Debug, Clone, Default)]
pub struct FilterControl {
    value: Arc<Mutex<String>>,
}

impl FilterControl {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            value: Arc::new(Mutex::new(initial.into())),
        }
    }

    pub fn value(&self) -> String {
        self.value
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set(&self, value: impl Into<String>) {
        *self
            .value
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = value.into();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    PageReady,
    FilterChanged(String),
}

impl Trigger {
    /// Page load starts from the control's default, i.e. no filter.
    pub fn user_id(self) -> String {
        match self {
            Trigger::PageReady => String::new(),
            Trigger::FilterChanged(value) => value,
        }
    }
}

/// What one load produced, paired with the filter it ran with.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub user_id: String,
    pub state: DisplayState,
    /// `false` when a newer load owned the region by the time this one finished.
    pub committed: bool,
}

pub struct WorkoutHistoryView {
    client: WorkoutClient,
    filter: FilterControl,
    region: DisplayRegion,
    timezone: Tz,
}

impl WorkoutHistoryView {
    pub fn new(
        client: WorkoutClient,
        filter: FilterControl,
        region: DisplayRegion,
        timezone: Tz,
    ) -> Self {
        Self {
            client,
            filter,
            region,
            timezone,
        }
    }

    pub fn filter(&self) -> &FilterControl {
        &self.filter
    }

    pub fn region(&self) -> &DisplayRegion {
        &self.region
    }

    pub async fn handle(&self, trigger: Trigger) -> LoadOutcome {
        self.load_workouts(trigger.user_id()).await
    }

    /// Refreshes the region from the API for `user_id` (empty = all users).
    /// A stale result leaves the region alone but is still returned to the caller.
    pub async fn load_workouts(&self, user_id: String) -> LoadOutcome {
        let ticket = self.region.begin_filtered(&self.filter, &user_id);

        let state = match self.fetch_and_render(&user_id).await {
            Ok(state) => state,
            Err(err) => {
                error!(error = %err, user_id = %user_id, "failed to load workouts");
                DisplayState::Error
            }
        };

        let committed = self.region.commit(ticket, state.clone());
        if !committed {
            debug!(?ticket, user_id = %user_id, "discarding stale workout response");
        }
        LoadOutcome {
            user_id,
            state,
            committed,
        }
    }

    async fn fetch_and_render(&self, user_id: &str) -> Result<DisplayState, ViewError> {
        let workouts = self.client.fetch_workouts(user_id).await?;
        if workouts.is_empty() {
            return Ok(DisplayState::Empty);
        }

        let cards = render::render_workouts(&workouts, self.timezone)?;
        info!(count = workouts.len(), user_id = %user_id, "loaded workouts");
        Ok(DisplayState::Populated(cards))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_starts_idle() {
        let region = DisplayRegion::new();
        assert_eq!(region.snapshot(), DisplayState::Idle);
        assert_eq!(region.html(), "");
    }

    #[test]
    fn test_begin_shows_loading() {
        let region = DisplayRegion::new();
        region.begin();
        assert_eq!(region.snapshot(), DisplayState::Loading);
        assert_eq!(region.html(), LOADING_HTML);
    }

    #[test]
    fn test_stale_ticket_cannot_commit() {
        let region = DisplayRegion::new();
        let older = region.begin();
        let newer = region.begin();
        assert!(older < newer);

        assert!(region.commit(newer, DisplayState::Empty));
        assert!(!region.commit(older, DisplayState::Error));
        assert_eq!(region.snapshot(), DisplayState::Empty);
    }

    #[test]
    fn test_cloned_handles_share_state() {
        let region = DisplayRegion::new();
        let other = region.clone();
        let ticket = region.begin();
        other.commit(ticket, DisplayState::Populated("<div>x</div>".into()));
        assert_eq!(region.html(), "<div>x</div>");
    }

    #[test]
    fn test_filter_control() {
        let filter = FilterControl::default();
        assert_eq!(filter.value(), "");
        filter.set("nettle");
        assert_eq!(filter.clone().value(), "nettle");
    }

    #[test]
    fn test_begin_filtered_sets_filter() {
        let region = DisplayRegion::new();
        let filter = FilterControl::new("nettle");
        let ticket = region.begin_filtered(&filter, "bramble");

        assert_eq!(filter.value(), "bramble");
        assert_eq!(region.snapshot(), DisplayState::Loading);
        assert!(region.commit(ticket, DisplayState::Empty));
    }

    #[test]
    fn test_page_ready_uses_no_filter() {
        assert_eq!(Trigger::PageReady.user_id(), "");
        assert_eq!(Trigger::FilterChanged("nettle".into()).user_id(), "nettle");
    }

    fn unreachable_view(filter: FilterControl) -> WorkoutHistoryView {
        let base_url = url::Url::parse("http://127.0.0.1:9").unwrap();
        let client = WorkoutClient::new(base_url, None).unwrap();
        WorkoutHistoryView::new(client, filter, DisplayRegion::new(), Tz::UTC)
    }

    #[tokio::test]
    async fn test_unreachable_api_shows_error() {
        let view = unreachable_view(FilterControl::default());
        let outcome = view.handle(Trigger::PageReady).await;

        assert_eq!(outcome.state, DisplayState::Error);
        assert!(outcome.committed);
        assert_eq!(view.region().html(), ERROR_HTML);
    }

    #[tokio::test]
    async fn test_page_ready_resets_previous_filter() {
        let view = unreachable_view(FilterControl::new("nettle"));
        let outcome = view.handle(Trigger::PageReady).await;

        assert_eq!(outcome.user_id, "");
        assert_eq!(view.filter().value(), "");
    }
}
