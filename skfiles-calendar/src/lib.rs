mod date;
mod error;
mod owner;
mod structs;
mod widget;

#[cfg(feature = "ics")]
mod ics;

pub use date::{days_in_month, first_weekday_offset, parse_calendar_day, WeekStart, YearMonth};
pub use error::{CalendarError, CalendarResult};
pub use owner::{Controlled, EventCallbacks, EventOwner, IdGenerator, LocalEvents};
pub use structs::{Event, EventDraft, EventId, NewEvent};
pub use widget::{CalendarWidget, DayCell, GridCell, Panel};

#[cfg(feature = "ics")]
pub use crate::ics::events_to_ics;
