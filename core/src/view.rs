//! Tree Builder
//!
//! [`render`] derives the declarative tree for a state snapshot. It reads only
//! its argument, so equal states always produce equal trees.
//!
//! Layout of the produced tree:
//!
//! ```text
//! app
//! ├── controls (row)
//! │   ├── input      value = location_text, on input -> SetLocation
//! │   └── button     "SAVE", on click -> SubmitLookup
//! ├── status         "Loading..." | error text | last result
//! └── history
//!     └── row per entry, keyed by id, with a delete button
//! ```

use crate::model::{Entry, LookupStatus, State, Units, WeatherReport};
use crate::tree::{button, container, input, row, text, Action, Handler, Node, Tag};

/// Index of the controls row under the root
pub const CONTROLS: usize = 0;
/// Index of the status region under the root
pub const STATUS: usize = 1;
/// Index of the history list under the root
pub const HISTORY: usize = 2;

/// Label on the submit control
pub const SAVE_LABEL: &str = "SAVE";
/// Label on each delete control
pub const DELETE_LABEL: &str = "Delete";

/// Render a state snapshot into a tree
#[must_use]
pub fn render(state: &State) -> Node {
    container([
        controls(state),
        status_region(state),
        history_list(&state.history, state.units),
    ])
    .class("app")
}

fn controls(state: &State) -> Node {
    row([
        input(state.location_text.as_str())
            .class("location")
            .attr("placeholder", "Location")
            .on(Handler::on_input(Action::SetLocation)),
        button(SAVE_LABEL)
            .class("primary")
            .on(Handler::on_click(Action::SubmitLookup)),
    ])
    .class("controls")
}

fn status_region(state: &State) -> Node {
    match &state.lookup_status {
        LookupStatus::Loading => container([text("Loading...")]).class("loading"),
        LookupStatus::Error { message } => container([text(message.as_str())]).class("error"),
        LookupStatus::Idle => match &state.pending_lookup {
            Some(report) => search_result(report, state.units),
            None => Node::new(Tag::Container).class("search-result"),
        },
    }
}

fn search_result(report: &WeatherReport, units: Units) -> Node {
    let suffix = units.suffix();
    let mut lines = vec![
        text(format!("Name: {}", report.name)),
        text(format!("Temp: {}{suffix}", report.temperature)),
        text(format!("Max Temp: {}{suffix}", report.temperature_max)),
        text(format!("Min Temp: {}{suffix}", report.temperature_min)),
    ];
    if let Some(observed) = report.observed_at {
        lines.push(text(format!("Observed: {}", observed.format("%Y-%m-%d %H:%M UTC"))));
    }
    container(lines).class("search-result")
}

fn history_list(history: &[Entry], units: Units) -> Node {
    container(history.iter().map(|entry| weather_row(entry, units))).class("history")
}

fn weather_row(entry: &Entry, units: Units) -> Node {
    let suffix = units.suffix();
    row([
        text(format!("Location: {}", entry.location)),
        text(format!("Temperature: {}{suffix}", entry.temperature)),
        text(format!("Max Temperature: {}{suffix}", entry.temperature_max)),
        text(format!("Min Temperature: {}{suffix}", entry.temperature_min)),
        button(DELETE_LABEL)
            .class("delete")
            .on(Handler::on_click(Action::DeleteEntry { id: entry.id })),
    ])
    .key(entry.id)
    .class("weather-row")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntryId;
    use crate::tree::{Key, Trigger};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_is_pure() {
        let state = State::seeded();
        assert_eq!(render(&state), render(&state.clone()));
    }

    #[test]
    fn test_input_bound_to_location_text() {
        let mut state = State::seeded();
        state.location_text = "Paris".to_string();
        let tree = render(&state);
        let input = tree.at(&[CONTROLS, 0]).unwrap();
        assert_eq!(input.tag, Tag::Input);
        assert_eq!(input.get_attr("value"), Some("Paris"));
        assert_eq!(
            input.handler(Trigger::Input).map(|h| &h.action),
            Some(&Action::SetLocation)
        );
    }

    #[test]
    fn test_submit_button_starts_lookup() {
        let tree = render(&State::seeded());
        let save = tree.at(&[CONTROLS, 1]).unwrap();
        assert_eq!(save.text.as_deref(), Some(SAVE_LABEL));
        assert!(save
            .handler(Trigger::Click)
            .is_some_and(|h| h.action.starts_lookup()));
    }

    #[test]
    fn test_loading_region() {
        let mut state = State::seeded();
        state.lookup_status = LookupStatus::Loading;
        let status = render(&state).at(&[STATUS]).cloned().unwrap();
        assert_eq!(status.get_attr("class"), Some("loading"));
        assert_eq!(status.children[0].text.as_deref(), Some("Loading..."));
    }

    #[test]
    fn test_error_region() {
        let mut state = State::seeded();
        state.lookup_status = LookupStatus::Error {
            message: "not found".to_string(),
        };
        let status = render(&state).at(&[STATUS]).cloned().unwrap();
        assert_eq!(status.get_attr("class"), Some("error"));
        assert_eq!(status.children[0].text.as_deref(), Some("not found"));
    }

    #[test]
    fn test_idle_region_shows_last_result() {
        let mut state = State::seeded();
        state.pending_lookup = Some(
            WeatherReport::new("Paris", 15.0, 17.0, 12.5)
                .with_observed_at(chrono::Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()),
        );
        let status = render(&state).at(&[STATUS]).cloned().unwrap();
        let lines: Vec<_> = status
            .children
            .iter()
            .filter_map(|n| n.text.clone())
            .collect();
        assert_eq!(
            lines,
            vec![
                "Name: Paris".to_string(),
                "Temp: 15°C".to_string(),
                "Max Temp: 17°C".to_string(),
                "Min Temp: 12.5°C".to_string(),
                "Observed: 2024-05-01 12:30 UTC".to_string(),
            ]
        );
    }

    #[test]
    fn test_idle_without_result_is_empty() {
        let status = render(&State::seeded()).at(&[STATUS]).cloned().unwrap();
        assert!(status.children.is_empty());
    }

    #[test]
    fn test_history_rows_keyed_by_id() {
        let mut state = State::seeded();
        state.history.push(Entry {
            id: EntryId(5),
            location: "Oslo".to_string(),
            temperature: -3.0,
            temperature_max: -1.0,
            temperature_min: -6.0,
        });
        let tree = render(&state);
        let history = tree.at(&[HISTORY]).unwrap();
        let keys: Vec<_> = history.children.iter().map(|n| n.key.clone()).collect();
        assert_eq!(
            keys,
            vec![Some(Key::from(EntryId(1))), Some(Key::from(EntryId(5)))]
        );
        let delete = history.children[1].children.last().unwrap();
        assert!(delete.handles(&Action::DeleteEntry { id: EntryId(5) }));
    }

    #[test]
    fn test_units_change_suffix() {
        let state = State::seeded().with_units(Units::Imperial);
        let tree = render(&state);
        let row = tree.at(&[HISTORY, 0]).unwrap();
        assert_eq!(row.children[1].text.as_deref(), Some("Temperature: 20°F"));
    }

    #[test]
    fn test_consumed_fields_change_tree() {
        let base = State::seeded();

        let mut typed = base.clone();
        typed.location_text = "x".to_string();
        assert_ne!(render(&base), render(&typed));

        let mut loading = base.clone();
        loading.lookup_status = LookupStatus::Loading;
        assert_ne!(render(&base), render(&loading));

        let mut emptied = base.clone();
        emptied.history.clear();
        assert_ne!(render(&base), render(&emptied));
    }
}
