//! Who holds the event collection.
//!
//! The widget only ever talks to an [`EventOwner`]. [`LocalEvents`] keeps the
//! collection itself; [`Controlled`] reads a parent's collection and hands
//! every mutation back to the parent through [`EventCallbacks`].

use chrono::{NaiveDate, Utc};
use log::debug;

use crate::{Event, EventId, NewEvent};

pub trait EventOwner {
    /// Events in insertion order.
    fn events(&self) -> &[Event];

    fn add_event(&mut self, event: NewEvent) -> EventId;

    /// Replaces the entry with the same id. Returns `false`, and changes
    /// nothing, when no entry has that id or the new title is blank.
    fn update_event(&mut self, event: Event) -> bool;

    fn delete_event(&mut self, id: &EventId) -> Option<Event>;

    /// Whether clicking a day may open a prefilled add form.
    fn accepts_day_clicks(&self) -> bool;

    fn event(&self, id: &EventId) -> Option<&Event> {
        self.events().iter().find(|event| event.id() == id)
    }

    fn events_on(&self, day: NaiveDate) -> Vec<&Event> {
        self.events().iter().filter(|event| event.is_on(day)).collect()
    }

    fn len(&self) -> usize {
        self.events().len()
    }

    fn is_empty(&self) -> bool {
        self.events().is_empty()
    }
}

impl<O: EventOwner + ?Sized> EventOwner for &mut O {
    fn events(&self) -> &[Event] {
        (**self).events()
    }

    fn add_event(&mut self, event: NewEvent) -> EventId {
        (**self).add_event(event)
    }

    fn update_event(&mut self, event: Event) -> bool {
        (**self).update_event(event)
    }

    fn delete_event(&mut self, id: &EventId) -> Option<Event> {
        (**self).delete_event(id)
    }

    fn accepts_day_clicks(&self) -> bool {
        (**self).accepts_day_clicks()
    }
}

/// Hands out ids from the current time in milliseconds, bumped past the
/// previous id when the clock has not moved on.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn next_id(&mut self) -> EventId {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last + 1);
        EventId::new(self.last.to_string())
    }
}

/// Self-contained owner: the collection lives here and ids are assigned here.
#[derive(Debug, Clone, Default)]
pub struct LocalEvents {
    events: Vec<Event>,
    ids: IdGenerator,
}

impl LocalEvents {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FromIterator<Event> for LocalEvents {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        let mut events: Vec<Event> = Vec::new();
        for event in iter {
            if !event.has_title() {
                debug!("Dropping event {} without a title", event.id());
                continue;
            }
            if events.iter().any(|existing| existing.id() == event.id()) {
                debug!("Dropping event with duplicate id {}", event.id());
                continue;
            }
            events.push(event);
        }

        Self {
            events,
            ids: IdGenerator::default(),
        }
    }
}

impl EventOwner for LocalEvents {
    fn events(&self) -> &[Event] {
        &self.events
    }

    fn add_event(&mut self, event: NewEvent) -> EventId {
        let id = loop {
            let id = self.ids.next_id();
            if self.event(&id).is_none() {
                break id;
            }
        };

        debug!("Adding event {id} on {}", event.date());
        self.events.push(Event::new(id.clone(), event));
        id
    }

    fn update_event(&mut self, event: Event) -> bool {
        if !event.has_title() {
            debug!("Ignoring update of event {} with a blank title", event.id());
            return false;
        }

        let Some(slot) = self.events.iter_mut().find(|slot| slot.id() == event.id()) else {
            debug!("Ignoring update of unknown event {}", event.id());
            return false;
        };

        debug!("Updating event {}", event.id());
        *slot = event;
        true
    }

    fn delete_event(&mut self, id: &EventId) -> Option<Event> {
        let position = self.events.iter().position(|event| event.id() == id)?;
        debug!("Deleting event {id}");
        Some(self.events.remove(position))
    }

    fn accepts_day_clicks(&self) -> bool {
        true
    }
}

/// What a parent that owns the events exposes to a controlled widget.
pub trait EventCallbacks {
    fn events(&self) -> &[Event];

    /// The parent stores the event and decides its id.
    fn on_add_event(&mut self, event: NewEvent) -> EventId;

    fn on_update_event(&mut self, event: Event);

    fn on_delete_event(&mut self, id: &EventId);
}

/// Controlled owner: reads and mutates through the parent.
#[derive(Debug)]
pub struct Controlled<C> {
    parent: C,
}

impl<C: EventCallbacks> Controlled<C> {
    pub fn new(parent: C) -> Self {
        Self { parent }
    }

    pub fn parent(&self) -> &C {
        &self.parent
    }

    pub fn into_parent(self) -> C {
        self.parent
    }
}

impl<C: EventCallbacks> EventOwner for Controlled<C> {
    fn events(&self) -> &[Event] {
        self.parent.events()
    }

    fn add_event(&mut self, event: NewEvent) -> EventId {
        self.parent.on_add_event(event)
    }

    fn update_event(&mut self, event: Event) -> bool {
        if !event.has_title() || self.event(event.id()).is_none() {
            return false;
        }

        self.parent.on_update_event(event);
        true
    }

    fn delete_event(&mut self, id: &EventId) -> Option<Event> {
        let removed = self.event(id).cloned()?;
        self.parent.on_delete_event(id);
        Some(removed)
    }

    fn accepts_day_clicks(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::CalendarError;

    fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[derive(Default)]
    struct Parent {
        events: Vec<Event>,
        next: u32,
        calls: Vec<&'static str>,
    }

    impl EventCallbacks for Parent {
        fn events(&self) -> &[Event] {
            &self.events
        }

        fn on_add_event(&mut self, event: NewEvent) -> EventId {
            self.calls.push("add");
            self.next += 1;
            let id = EventId::new(format!("parent-{}", self.next));
            self.events.push(Event::new(id.clone(), event));
            id
        }

        fn on_update_event(&mut self, event: Event) {
            self.calls.push("update");
            self.events = self
                .events
                .drain(..)
                .map(|existing| if existing.id() == event.id() { event.clone() } else { existing })
                .collect();
        }

        fn on_delete_event(&mut self, id: &EventId) {
            self.calls.push("delete");
            self.events.retain(|event| event.id() != id);
        }
    }

    #[test]
    fn test_id_generator_is_unique_within_a_millisecond() {
        let mut ids = IdGenerator::default();
        let generated = (0..1000).map(|_| ids.next_id()).collect::<HashSet<_>>();
        assert_eq!(generated.len(), 1000);
    }

    #[test]
    fn test_local_add_update_delete() {
        let mut events = LocalEvents::new();
        let id = events.add_event(NewEvent::new("Workshop", march(25)).unwrap());
        let other = events.add_event(NewEvent::new("Presentation", march(28)).unwrap());
        assert_eq!(events.len(), 2);

        let mut edited = events.event(&id).unwrap().clone();
        edited.title = "Workshop (updated)".into();
        assert!(events.update_event(edited));
        assert_eq!(events.event(&id).unwrap().title, "Workshop (updated)");
        assert_eq!(events.event(&other).unwrap().title, "Presentation");

        assert_eq!(events.delete_event(&id).map(|event| event.title), Some("Workshop (updated)".into()));
        assert_eq!(events.len(), 1);
        assert!(events.delete_event(&id).is_none());
    }

    #[test]
    fn test_local_update_unknown_id_is_noop() {
        let mut events = LocalEvents::new();
        events.add_event(NewEvent::new("Workshop", march(25)).unwrap());
        let before = events.events().to_vec();

        let stranger = Event::new("missing".into(), NewEvent::new("Ghost", march(1)).unwrap());
        assert!(!events.update_event(stranger));
        assert_eq!(events.events(), before.as_slice());
    }

    #[test]
    fn test_blank_titles_never_reach_the_collection() {
        assert_eq!(NewEvent::new("", march(25)), Err(CalendarError::MissingTitle));
        assert_eq!(NewEvent::new("   ", march(25)), Err(CalendarError::MissingTitle));

        let mut events = LocalEvents::new();
        let id = events.add_event(NewEvent::new("  Workshop ", march(25)).unwrap());
        assert_eq!(events.event(&id).unwrap().title, "Workshop");

        let mut blank = events.event(&id).unwrap().clone();
        blank.title = "   ".into();
        assert!(!events.update_event(blank.clone()));
        assert_eq!(events.event(&id).unwrap().title, "Workshop");

        let mut owner = Controlled::new(Parent::default());
        let id = owner.add_event(NewEvent::new("Workshop", march(25)).unwrap());
        let mut blank = owner.event(&id).unwrap().clone();
        blank.title.clear();
        assert!(!owner.update_event(blank));
        assert_eq!(owner.parent().calls, ["add"]);
    }

    #[test]
    fn test_local_from_seed_drops_blank_titles() {
        let mut blank = Event::new("2".into(), NewEvent::new("placeholder", march(2)).unwrap());
        blank.title = " ".into();

        let events = [Event::new("1".into(), NewEvent::new("first", march(1)).unwrap()), blank]
            .into_iter()
            .collect::<LocalEvents>();

        assert_eq!(events.len(), 1);
        assert!(events.event(&"2".into()).is_none());
    }

    #[test]
    fn test_local_keeps_insertion_order_and_same_day_events() {
        let mut events = LocalEvents::new();
        events.add_event(NewEvent::new("b", march(25)).unwrap());
        events.add_event(NewEvent::new("a", march(25)).unwrap());

        let titles = events.events_on(march(25)).into_iter().map(|event| event.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, ["b", "a"]);
    }

    #[test]
    fn test_local_from_seed_drops_duplicate_ids() {
        let events = [
            Event::new("1".into(), NewEvent::new("first", march(1)).unwrap()),
            Event::new("1".into(), NewEvent::new("again", march(2)).unwrap()),
            Event::new("2".into(), NewEvent::new("second", march(3)).unwrap()),
        ]
        .into_iter()
        .collect::<LocalEvents>();

        assert_eq!(events.len(), 2);
        assert_eq!(events.event(&"1".into()).unwrap().title, "first");
    }

    #[test]
    fn test_controlled_forwards_to_parent() {
        let mut owner = Controlled::new(Parent::default());
        assert!(!owner.accepts_day_clicks());

        let id = owner.add_event(NewEvent::new("Workshop", march(25)).unwrap());
        assert_eq!(id.as_str(), "parent-1");

        let edited = owner.event(&id).unwrap().with_details(NewEvent::new("Moved", march(26)).unwrap());
        assert!(owner.update_event(edited));
        assert_eq!(owner.events_on(march(26)).len(), 1);

        assert!(owner.delete_event(&id).is_some());
        assert!(owner.is_empty());
        assert_eq!(owner.parent().calls, ["add", "update", "delete"]);
    }

    #[test]
    fn test_controlled_skips_callbacks_for_unknown_ids() {
        let mut owner = Controlled::new(Parent::default());
        let stranger = Event::new("missing".into(), NewEvent::new("Ghost", march(1)).unwrap());

        assert!(!owner.update_event(stranger));
        assert!(owner.delete_event(&"missing".into()).is_none());
        assert!(owner.into_parent().calls.is_empty());
    }
}
