//! Terminal rendering of trips

use colored::Colorize;

use crate::domain::{Provenance, Trip, progress};

/// Short id shown in listings; any unique prefix resolves
pub fn short_id(id: &str) -> &str {
    let end = id.char_indices().nth(16).map(|(i, _)| i).unwrap_or(id.len());
    &id[..end]
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

/// One line per trip: id, date, progress, description
pub fn history_line(trip: &Trip) -> String {
    let (packed, total) = progress(&trip.packing_list);
    format!(
        "{}  {}  {:>3}/{:<3}  {}",
        short_id(&trip.id).cyan(),
        trip.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
        packed,
        total,
        first_line(&trip.description)
    )
}

/// Full checklist with 1-based positions for `toggle`
pub fn trip_detail(trip: &Trip) -> String {
    let (packed, total) = progress(&trip.packing_list);
    let mut out = String::new();

    out.push_str(&format!("{} {}\n", "Trip:".bold(), trip.id.cyan()));
    out.push_str(&format!("{}\n", trip.description));
    out.push_str(&format!("{} {}/{}\n", "Packed:".bold(), packed, total));

    for (ci, category) in trip.packing_list.iter().enumerate() {
        out.push_str(&format!("\n{} {}\n", format!("{}.", ci + 1).dimmed(), category.name.bold()));
        for (ii, item) in category.items.iter().enumerate() {
            let mark = if item.packed { "[x]".green() } else { "[ ]".normal() };
            let tag = match item.source {
                Provenance::Oracle => " (ai)".yellow().to_string(),
                Provenance::User => String::new(),
            };
            out.push_str(&format!("  {}.{:<3} {} {}{}\n", ci + 1, ii + 1, mark, item.name, tag));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RawCategory, RawItem};
    use crate::reconcile;

    fn trip() -> Trip {
        let mut list = reconcile::mint_list(vec![RawCategory::new(
            "ציוד חיוני",
            vec![RawItem::user("אולר"), RawItem::oracle("Headlamp")],
        )]);
        list[0].items[0].packed = true;
        Trip::new("Desert hike\n\nפרטים נוספים:\n- נוסעים ברכב? כן", list)
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("trip-0190a6b2c4e87d3e9f1a"), "trip-0190a6b2c4e");
        assert_eq!(short_id("trip-1"), "trip-1");
    }

    #[test]
    fn test_history_line() {
        let line = history_line(&trip());
        assert!(line.contains("1/2"));
        assert!(line.contains("Desert hike"));
        assert!(!line.contains("פרטים נוספים"));
    }

    #[test]
    fn test_trip_detail_positions_and_tags() {
        let detail = trip_detail(&trip());
        assert!(detail.contains("ציוד חיוני"));
        assert!(detail.contains("1.1"));
        assert!(detail.contains("אולר"));
        assert!(detail.contains("Headlamp"));
        assert!(detail.contains("(ai)"));
        assert!(detail.contains("[x]"));
    }
}
