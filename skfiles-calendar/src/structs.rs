use std::fmt;

use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize};

use crate::{parse_calendar_day, CalendarError, CalendarResult};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct EventId(String);

impl EventId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A calendar entry. The id is fixed at creation, everything else can be
/// replaced by an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Event {
    id: EventId,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "deserialize_title"))]
    pub title: String,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "deserialize_calendar_day"))]
    pub date: NaiveDate,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub description: Option<String>,
}

impl Event {
    pub fn new(id: EventId, details: NewEvent) -> Self {
        Self {
            id,
            title: details.title,
            date: details.date,
            description: details.description,
        }
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn is_on(&self, day: NaiveDate) -> bool {
        self.date == day
    }

    /// Replaces the editable fields, keeping the id.
    pub fn apply(&mut self, details: NewEvent) {
        self.title = details.title;
        self.date = details.date;
        self.description = details.description;
    }

    #[must_use]
    pub fn with_details(&self, details: NewEvent) -> Self {
        Self::new(self.id.clone(), details)
    }
}

#[cfg(feature = "serde")]
fn deserialize_title<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = String::deserialize(deserializer)?;
    normalize_title(&raw).map_err(serde::de::Error::custom)
}

#[cfg(feature = "serde")]
fn deserialize_calendar_day<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_calendar_day(&raw).map_err(serde::de::Error::custom)
}

/// Trimmed title, or `MissingTitle` when nothing is left.
pub(crate) fn normalize_title(title: &str) -> CalendarResult<String> {
    match title.trim() {
        "" => Err(CalendarError::MissingTitle),
        title => Ok(title.to_string()),
    }
}

/// Validated fields of an event that has no id yet.
///
/// Only constructed through [`NewEvent::new`], so the title is never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    title: String,
    date: NaiveDate,
    description: Option<String>,
}

impl NewEvent {
    pub fn new<S: AsRef<str>>(title: S, date: NaiveDate) -> CalendarResult<Self> {
        Ok(Self {
            title: normalize_title(title.as_ref())?,
            date,
            description: None,
        })
    }

    /// Sets the description; blank text clears it.
    #[must_use]
    pub fn with_description<S: AsRef<str>>(mut self, description: S) -> Self {
        let description = description.as_ref().trim();
        self.description = (!description.is_empty()).then(|| description.to_string());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Raw contents of the add/edit form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct EventDraft {
    pub title: String,
    pub date: String,
    pub description: String,
}

impl EventDraft {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }

    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            date: event.date.format("%Y-%m-%d").to_string(),
            description: event.description.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> CalendarResult<NewEvent> {
        if self.title.trim().is_empty() {
            return Err(CalendarError::MissingTitle);
        }
        let date = parse_calendar_day(&self.date)?;

        Ok(NewEvent::new(&self.title, date)?.with_description(&self.description))
    }
}
