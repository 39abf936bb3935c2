//! A described journey and its packing list

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{IdKind, generate_id};
use super::list::PackingList;

/// One history entry
///
/// Identity and description are fixed at creation; only the packing list
/// changes afterwards (refinement replaces it, toggles flip packed flags).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    #[serde(rename = "tripDescription")]
    pub description: String,
    pub packing_list: PackingList,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    /// Create a trip with a freshly minted id, stamped now
    pub fn new(description: impl Into<String>, packing_list: PackingList) -> Self {
        Self {
            id: generate_id(IdKind::Trip),
            description: description.into(),
            packing_list,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_wire_format() {
        let trip = Trip::new("3-day desert hike", vec![]);
        let json = serde_json::to_value(&trip).unwrap();

        assert!(json["id"].as_str().unwrap().starts_with("trip-"));
        assert_eq!(json["tripDescription"], "3-day desert hike");
        assert!(json["packingList"].is_array());
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn test_trip_reads_stored_history_entry() {
        let stored = r#"{
            "id": "trip-1718000000000",
            "tripDescription": "סופ\"ש בצפון",
            "packingList": [
                {
                    "id": "cat-0-1718000000000",
                    "category": "אישי",
                    "items": [
                        {"id": "item-0-0-1718000000000", "name": "תיק שחור אישי", "source": "user", "packed": true}
                    ]
                }
            ],
            "createdAt": "2024-06-10T06:13:20.000Z"
        }"#;

        let trip: Trip = serde_json::from_str(stored).unwrap();
        assert_eq!(trip.id, "trip-1718000000000");
        assert_eq!(trip.packing_list[0].name, "אישי");
        assert!(trip.packing_list[0].items[0].packed);
    }
}
