use std::iter;

use chrono::{NaiveDate, Weekday};
use log::debug;

use crate::{
    CalendarError, CalendarResult, Event, EventDraft, EventId, EventOwner, WeekStart, YearMonth,
};

/// Which form, if any, the widget currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Panel {
    #[default]
    Closed,
    Add(EventDraft),
    Edit {
        id: EventId,
        draft: EventDraft,
    },
    ConfirmDelete(EventId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridCell<'a> {
    /// Padding before the first day of the month.
    Blank,
    Day(DayCell<'a>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    pub events: Vec<&'a Event>,
}

impl DayCell<'_> {
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }
}

/// Month view over an event collection plus the add/edit/delete forms.
#[derive(Debug)]
pub struct CalendarWidget<O> {
    owner: O,
    month: YearMonth,
    week_start: WeekStart,
    panel: Panel,
}

impl<O: EventOwner> CalendarWidget<O> {
    pub fn new(owner: O, month: YearMonth) -> Self {
        Self {
            owner,
            month,
            week_start: WeekStart::default(),
            panel: Panel::Closed,
        }
    }

    #[must_use]
    pub fn week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn go_to(&mut self, month: YearMonth) {
        self.month = month;
    }

    pub fn previous_month(&mut self) {
        self.month = self.month.pred();
    }

    pub fn next_month(&mut self) {
        self.month = self.month.succ();
    }

    pub fn owner(&self) -> &O {
        &self.owner
    }

    pub fn into_owner(self) -> O {
        self.owner
    }

    pub fn events(&self) -> &[Event] {
        self.owner.events()
    }

    pub fn event(&self, id: &EventId) -> Option<&Event> {
        self.owner.event(id)
    }

    pub fn events_for_date(&self, date: NaiveDate) -> Vec<&Event> {
        self.owner.events_on(date)
    }

    pub fn weekdays(&self) -> impl Iterator<Item = Weekday> {
        self.week_start.weekdays()
    }

    /// Leading blanks followed by one cell per day of the month.
    pub fn grid(&self) -> impl Iterator<Item = GridCell<'_>> + '_ {
        let month = self.month;
        let blanks = iter::repeat_with(|| GridCell::Blank)
            .take(month.first_weekday_offset(self.week_start) as usize);

        let days = (1..=month.days())
            .filter_map(move |day| month.day(day))
            .map(move |date| {
                GridCell::Day(DayCell {
                    date,
                    events: self.owner.events_on(date),
                })
            });

        blanks.chain(days)
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn accepts_day_clicks(&self) -> bool {
        self.owner.accepts_day_clicks()
    }

    pub fn open_add_form(&mut self) {
        self.panel = Panel::Add(EventDraft::default());
    }

    /// Opens the add form with `date` filled in. Ignored in controlled mode.
    pub fn on_day_click(&mut self, date: NaiveDate) -> bool {
        if !self.owner.accepts_day_clicks() {
            debug!("Ignoring click on {date}, events are owned by the parent");
            return false;
        }

        self.panel = Panel::Add(EventDraft::for_date(date));
        true
    }

    pub fn begin_edit(&mut self, id: &EventId) -> bool {
        let Some(event) = self.owner.event(id) else {
            return false;
        };

        self.panel = Panel::Edit {
            id: id.clone(),
            draft: EventDraft::from_event(event),
        };
        true
    }

    /// The fields of the open add or edit form.
    pub fn draft_mut(&mut self) -> Option<&mut EventDraft> {
        match &mut self.panel {
            Panel::Add(draft) | Panel::Edit { draft, .. } => Some(draft),
            Panel::Closed | Panel::ConfirmDelete(_) => None,
        }
    }

    /// Submits the open add or edit form.
    ///
    /// A draft that fails validation leaves both the collection and the form
    /// untouched.
    pub fn submit(&mut self) -> CalendarResult<EventId> {
        let id = match &self.panel {
            Panel::Add(draft) => {
                let details = draft.validate()?;
                self.owner.add_event(details)
            }
            Panel::Edit { id, draft } => {
                let details = draft.validate()?;
                if !self.owner.update_event(Event::new(id.clone(), details)) {
                    let missing = id.clone();
                    self.panel = Panel::Closed;
                    return Err(CalendarError::EventNotFound(missing));
                }
                id.clone()
            }
            Panel::Closed | Panel::ConfirmDelete(_) => return Err(CalendarError::NoOpenForm),
        };

        self.panel = Panel::Closed;
        Ok(id)
    }

    /// First step of a delete: asks for confirmation, removes nothing.
    pub fn request_delete(&mut self, id: &EventId) -> bool {
        if self.owner.event(id).is_none() {
            return false;
        }

        self.panel = Panel::ConfirmDelete(id.clone());
        true
    }

    pub fn confirm_delete(&mut self) -> CalendarResult<Event> {
        let Panel::ConfirmDelete(id) = &self.panel else {
            return Err(CalendarError::NoOpenForm);
        };

        let removed = self
            .owner
            .delete_event(id)
            .ok_or_else(|| CalendarError::EventNotFound(id.clone()));

        self.panel = Panel::Closed;
        removed
    }

    pub fn cancel(&mut self) {
        self.panel = Panel::Closed;
    }
}
