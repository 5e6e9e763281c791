use thiserror::Error;

use crate::EventId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("event title is required")]
    MissingTitle,

    #[error("event date is required")]
    MissingDate,

    #[error("not a calendar date: {0:?}")]
    InvalidDate(String),

    #[error("not a calendar month: {0:?}")]
    InvalidMonth(String),

    #[error("no event with id {0}")]
    EventNotFound(EventId),

    #[error("no event form is open")]
    NoOpenForm,
}

pub type CalendarResult<T> = Result<T, CalendarError>;
