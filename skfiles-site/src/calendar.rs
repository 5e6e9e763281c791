//! Calendar widget endpoints.
//!
//! The widget's transient state (open form, month on screen) lives in the
//! query string; the events live in [`AppState`]. Mutations are HTML form
//! posts that redirect back to the home page.

use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use log::info;
use serde::Deserialize;

use skfiles_calendar::{
    events_to_ics, parse_calendar_day, CalendarError, CalendarResult, CalendarWidget, Event,
    EventCallbacks, EventDraft, EventId, EventOwner, LocalEvents, NewEvent, YearMonth,
};

use crate::{error::SiteError, pages, render, state::AppState};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CalendarMode {
    /// The home page owns the events and the widget delegates to it.
    #[default]
    Controlled,
    /// The widget owns the events; day clicks prefill the add form.
    SelfContained,
}

impl FromStr for CalendarMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "controlled" => Ok(CalendarMode::Controlled),
            "self-contained" | "self_contained" | "local" => Ok(CalendarMode::SelfContained),
            other => Err(format!("expected `controlled` or `self-contained`, got `{other}`")),
        }
    }
}

/// The home page acting as the parent of a controlled widget.
pub struct HomePage<'a> {
    events: &'a mut LocalEvents,
}

impl<'a> HomePage<'a> {
    pub fn new(events: &'a mut LocalEvents) -> Self {
        Self { events }
    }
}

impl EventCallbacks for HomePage<'_> {
    fn events(&self) -> &[Event] {
        self.events.events()
    }

    fn on_add_event(&mut self, event: NewEvent) -> EventId {
        let title = event.title().to_string();
        let id = self.events.add_event(event);
        info!("Added event {id} ({title})");
        id
    }

    fn on_update_event(&mut self, event: Event) {
        let id = event.id().clone();
        if self.events.update_event(event) {
            info!("Updated event {id}");
        }
    }

    fn on_delete_event(&mut self, id: &EventId) {
        if let Some(event) = self.events.delete_event(id) {
            info!("Deleted event {id} ({})", event.title);
        }
    }
}

/// Widget state carried in the home page query string.
#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub month: Option<String>,
    pub day: Option<String>,
    pub edit: Option<String>,
    pub delete: Option<String>,
    #[serde(default)]
    pub add: bool,
}

impl CalendarQuery {
    pub fn month(&self, state: &AppState) -> CalendarResult<YearMonth> {
        if let Some(month) = self.month.as_deref().filter(|month| !month.is_empty()) {
            return month.parse();
        }

        match self.day.as_deref().filter(|day| !day.is_empty()) {
            Some(day) => {
                let date = parse_calendar_day(day)?;
                YearMonth::containing(date).ok_or(CalendarError::InvalidDate(day.to_string()))
            }
            None => state.current_month(),
        }
    }

    /// Opens whichever panel the query asks for.
    pub fn apply<O: EventOwner>(&self, widget: &mut CalendarWidget<O>) -> CalendarResult<()> {
        if let Some(day) = self.day.as_deref().filter(|day| !day.is_empty()) {
            widget.on_day_click(parse_calendar_day(day)?);
        } else if self.add {
            widget.open_add_form();
        }

        if let Some(id) = &self.edit {
            widget.begin_edit(&EventId::new(id.as_str()));
        }

        if let Some(id) = &self.delete {
            widget.request_delete(&EventId::new(id.as_str()));
        }

        Ok(())
    }
}

fn back_to(month: YearMonth) -> Response {
    Redirect::to(&format!("/?month={month}")).into_response()
}

/// Home page with the widget showing the rejected form and why.
fn rejected(state: &AppState, widget: String) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, Html(pages::home_page(state, &widget))).into_response()
}

/// POST /calendar/events
pub async fn add_event(
    State(state): State<AppState>,
    Form(draft): Form<EventDraft>,
) -> Result<Response, SiteError> {
    let month = match parse_calendar_day(&draft.date).ok().and_then(YearMonth::containing) {
        Some(month) => month,
        None => state.current_month()?,
    };

    let outcome = state
        .with_calendar(month, |widget| {
            widget.open_add_form();
            if let Some(fields) = widget.draft_mut() {
                *fields = draft;
            }

            match widget.submit() {
                Ok(_) => Ok(()),
                Err(err) => Err(render::calendar_widget(widget, Some(&err.to_string()))),
            }
        })
        .await;

    match outcome {
        Ok(()) => Ok(back_to(month)),
        Err(widget) => Ok(rejected(&state, widget)),
    }
}

/// POST /calendar/events/:id
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(draft): Form<EventDraft>,
) -> Result<Response, SiteError> {
    let id = EventId::new(id);
    let month = match parse_calendar_day(&draft.date).ok().and_then(YearMonth::containing) {
        Some(month) => month,
        None => state.current_month()?,
    };

    let outcome = state
        .with_calendar(month, |widget| {
            if !widget.begin_edit(&id) {
                return Err(SiteError::Calendar(CalendarError::EventNotFound(id.clone())));
            }
            if let Some(fields) = widget.draft_mut() {
                *fields = draft;
            }

            match widget.submit() {
                Ok(_) => Ok(None),
                Err(err @ CalendarError::EventNotFound(_)) => Err(err.into()),
                Err(err) => Ok(Some(render::calendar_widget(widget, Some(&err.to_string())))),
            }
        })
        .await?;

    match outcome {
        None => Ok(back_to(month)),
        Some(widget) => Ok(rejected(&state, widget)),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub confirm: String,
}

/// POST /calendar/events/:id/delete
///
/// Only removes the event when the confirmation form was used.
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Result<Response, SiteError> {
    let id = EventId::new(id);
    let month = {
        let events = state.events.read().await;
        let event = events
            .event(&id)
            .ok_or_else(|| CalendarError::EventNotFound(id.clone()))?;
        YearMonth::containing(event.date)
            .ok_or_else(|| CalendarError::InvalidDate(event.date.to_string()))?
    };

    state
        .with_calendar(month, |widget| {
            if !widget.request_delete(&id) {
                return Err(CalendarError::EventNotFound(id.clone()));
            }

            if form.confirm == "yes" {
                widget.confirm_delete().map(|_| ())
            } else {
                widget.cancel();
                Ok(())
            }
        })
        .await?;

    Ok(back_to(month))
}

#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    pub date: Option<String>,
}

/// GET /api/events
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<Vec<Event>>, SiteError> {
    let events = state.events.read().await;

    let selected = match query.date.as_deref() {
        Some(date) => {
            let day = parse_calendar_day(date)?;
            events.events_on(day).into_iter().cloned().collect()
        }
        None => events.events().to_vec(),
    };

    Ok(Json(selected))
}

/// GET /calendar.ics
pub async fn export_ics(State(state): State<AppState>) -> Response {
    let events = state.events.read().await;
    let title = &state.content.site().title;

    (
        [(header::CONTENT_TYPE, "text/calendar")],
        events_to_ics(title, events.events()).to_string(),
    )
        .into_response()
}
