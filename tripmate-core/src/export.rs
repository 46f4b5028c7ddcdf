//! Read-only projections of a trip session for download and sharing.

use crate::trip::TripSession;

/// Full session dump, pretty-printed.
pub fn session_json(session: &TripSession) -> serde_json::Result<String> {
    serde_json::to_string_pretty(session)
}

/// File name offered for the JSON download. Whitespace runs become `-` and
/// characters that are not allowed in a file name become `_`, so the result
/// is always one path component.
pub fn export_file_name(destination: &str) -> String {
    let mut name = String::from("tripmate-");
    let mut in_whitespace = false;
    for ch in destination.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                name.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if ch.is_control() || matches!(ch, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
            name.push('_');
        } else {
            name.push(ch);
        }
    }
    name.push_str(".json");
    name
}

/// Plain-text summary for the clipboard: a header line, a blank line, and
/// one line per day listing activity names in order.
pub fn share_text(session: &TripSession) -> String {
    let mut text = format!(
        "My TripMate itinerary: {} ({})\n\n",
        session.destination,
        session.date_range_label()
    );
    let days: Vec<String> = session
        .plan
        .days()
        .iter()
        .map(|day| {
            let names: Vec<&str> = day.activities.iter().map(|a| a.name.as_str()).collect();
            format!("Day {}: {}", day.day, names.join(" → "))
        })
        .collect();
    text.push_str(&days.join("\n"));
    text
}
