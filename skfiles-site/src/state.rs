use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;

use skfiles_calendar::{
    CalendarError, CalendarResult, CalendarWidget, Controlled, EventOwner, LocalEvents, WeekStart,
    YearMonth,
};

use crate::{
    calendar::{CalendarMode, HomePage},
    contact::Relay,
    content::ContentProvider,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<dyn ContentProvider>,
    pub events: Arc<RwLock<LocalEvents>>,
    pub relay: Relay,
    pub calendar_mode: CalendarMode,
    pub week_start: WeekStart,
}

impl AppState {
    pub fn new(
        content: Arc<dyn ContentProvider>,
        relay: Relay,
        calendar_mode: CalendarMode,
        week_start: WeekStart,
    ) -> Self {
        let events = content.seed_events().iter().cloned().collect::<LocalEvents>();

        Self {
            content,
            events: Arc::new(RwLock::new(events)),
            relay,
            calendar_mode,
            week_start,
        }
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    pub fn current_month(&self) -> CalendarResult<YearMonth> {
        let today = self.today();
        YearMonth::containing(today).ok_or_else(|| CalendarError::InvalidDate(today.to_string()))
    }

    /// Runs `view` against a widget over the shared events, owned the way
    /// the configured mode says. The write lock is held for the whole call,
    /// so widget operations never interleave.
    pub async fn with_calendar<T>(
        &self,
        month: YearMonth,
        view: impl FnOnce(&mut CalendarWidget<&mut dyn EventOwner>) -> T,
    ) -> T {
        let mut events = self.events.write().await;
        self.run_widget(&mut events, month, view)
    }

    /// Like [`AppState::with_calendar`], but over a copy taken under the read
    /// lock. Changes made through the widget are discarded.
    pub async fn view_calendar<T>(
        &self,
        month: YearMonth,
        view: impl FnOnce(&mut CalendarWidget<&mut dyn EventOwner>) -> T,
    ) -> T {
        let mut snapshot = self.events.read().await.clone();
        self.run_widget(&mut snapshot, month, view)
    }

    fn run_widget<T>(
        &self,
        events: &mut LocalEvents,
        month: YearMonth,
        view: impl FnOnce(&mut CalendarWidget<&mut dyn EventOwner>) -> T,
    ) -> T {
        match self.calendar_mode {
            CalendarMode::SelfContained => {
                let owner: &mut dyn EventOwner = events;
                let mut widget = CalendarWidget::new(owner, month).week_start(self.week_start);
                view(&mut widget)
            }
            CalendarMode::Controlled => {
                let mut home = Controlled::new(HomePage::new(events));
                let owner: &mut dyn EventOwner = &mut home;
                let mut widget = CalendarWidget::new(owner, month).week_start(self.week_start);
                view(&mut widget)
            }
        }
    }
}
