use chrono::NaiveDate;

use skfiles_calendar::{
    CalendarWidget, Controlled, Event, EventCallbacks, EventId, EventOwner, GridCell, LocalEvents,
    NewEvent, YearMonth,
};

fn march_25() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 25).unwrap()
}

fn indicator_on<O: EventOwner>(widget: &CalendarWidget<O>, date: NaiveDate) -> bool {
    widget.grid().any(|cell| match cell {
        GridCell::Day(day) => day.date == date && day.has_events(),
        GridCell::Blank => false,
    })
}

/// Creates the workshop, renames it, then deletes it, checking the grid
/// indicator along the way.
fn workshop_lifecycle<O: EventOwner>(widget: &mut CalendarWidget<O>, add_via_day_click: bool) {
    let original_len = widget.events().len();

    if add_via_day_click {
        assert!(widget.on_day_click(march_25()));
    } else {
        assert!(!widget.on_day_click(march_25()));
        widget.open_add_form();
        widget.draft_mut().unwrap().date = "2024-03-25".into();
    }
    widget.draft_mut().unwrap().title = "Workshop".into();

    let id = widget.submit().unwrap();
    assert!(indicator_on(widget, march_25()));
    assert_eq!(widget.events().len(), original_len + 1);

    assert!(widget.begin_edit(&id));
    widget.draft_mut().unwrap().title = "Workshop (updated)".into();
    assert_eq!(widget.submit(), Ok(id.clone()));
    assert!(indicator_on(widget, march_25()));
    assert_eq!(widget.event(&id).unwrap().title, "Workshop (updated)");

    assert!(widget.request_delete(&id));
    assert!(indicator_on(widget, march_25()));
    widget.confirm_delete().unwrap();

    assert!(!indicator_on(widget, march_25()));
    assert_eq!(widget.events().len(), original_len);
}

#[test]
fn self_contained_workshop_lifecycle() {
    let mut widget = CalendarWidget::new(LocalEvents::new(), YearMonth::new(2024, 3).unwrap());
    workshop_lifecycle(&mut widget, true);
}

struct HomePage {
    events: Vec<Event>,
    added: usize,
}

impl EventCallbacks for HomePage {
    fn events(&self) -> &[Event] {
        &self.events
    }

    fn on_add_event(&mut self, event: NewEvent) -> EventId {
        self.added += 1;
        let id = EventId::new(format!("home-{}", self.added));
        self.events.push(Event::new(id.clone(), event));
        id
    }

    fn on_update_event(&mut self, event: Event) {
        if let Some(slot) = self.events.iter_mut().find(|slot| slot.id() == event.id()) {
            *slot = event;
        }
    }

    fn on_delete_event(&mut self, id: &EventId) {
        self.events.retain(|event| event.id() != id);
    }
}

#[test]
fn controlled_workshop_lifecycle() {
    let seeded = Event::new(
        "1".into(),
        NewEvent::new("Research Presentation", NaiveDate::from_ymd_opt(2024, 3, 28).unwrap()).unwrap(),
    );
    let home = HomePage {
        events: vec![seeded],
        added: 0,
    };

    let mut widget = CalendarWidget::new(Controlled::new(home), YearMonth::new(2024, 3).unwrap());
    workshop_lifecycle(&mut widget, false);

    let home = widget.into_owner().into_parent();
    assert_eq!(home.added, 1);
    assert_eq!(home.events.len(), 1);
}

#[test]
fn stored_timestamps_match_by_calendar_day() {
    let events: Vec<Event> = serde_json::from_str(
        r#"[
            {"id": "late", "title": "Late call", "date": "2024-03-25T23:59:00-08:00"},
            {"id": "early", "title": "Early run", "date": "2024-03-25T05:00:00+09:00"},
            {"id": "plain", "title": "Workshop", "date": "2024-03-25"},
            {"id": "other", "title": "Next day", "date": "2024-03-26T00:00:00Z"}
        ]"#,
    )
    .unwrap();

    let widget = CalendarWidget::new(
        events.into_iter().collect::<LocalEvents>(),
        YearMonth::new(2024, 3).unwrap(),
    );

    let ids = widget
        .events_for_date(march_25())
        .into_iter()
        .map(|event| event.id().as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, ["late", "early", "plain"]);
}
