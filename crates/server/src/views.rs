//! JSON shapes returned by the query surface.

use data_loader::{Order, ReservationRecord, WaiterId};
use serde::{Deserialize, Serialize};

use crate::waiters::waiter_name;

/// One reservation as shown to floor staff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    pub diner_name: String,
    pub number_of_people: u32,
    /// 12-hour display time, e.g. "7:30 PM"
    pub start_time: String,
    pub orders: Vec<Order>,
    /// Present only once the allergy line has been computed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
}

impl TableView {
    pub fn from_record(record: &ReservationRecord, allergies: Option<String>) -> Self {
        Self {
            diner_name: record.diner_name.clone(),
            number_of_people: record.number_of_people,
            start_time: record.start_time.to_12_hour(),
            orders: record.orders.clone(),
            allergies,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaiterAssignment {
    pub waiter_id: WaiterId,
    pub waiter_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub tables: Vec<TableView>,
}

impl WaiterAssignment {
    pub fn new(waiter_id: WaiterId, tables: Vec<TableView>, summary: Option<String>) -> Self {
        Self {
            waiter_id,
            waiter_name: waiter_name(waiter_id).to_string(),
            summary,
            tables,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetAttendanceRequest {
    pub waiter_ids: Vec<WaiterId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceUpdate {
    pub assignments: Vec<WaiterAssignment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendance {
    pub present_waiters: Vec<WaiterId>,
    pub assignments: Vec<WaiterAssignment>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    pub total_reservations: usize,
    pub total_guests: u64,
    pub special_events: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DinerAllergies {
    pub diner_name: String,
    pub allergies: String,
    /// Occasion name, `null` when there is none
    pub special_event: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DinerPreferences {
    pub diner_name: String,
    pub preferences: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::parse_clock_time;
    use serde_json::json;

    #[test]
    fn test_table_view_json() {
        let record = ReservationRecord {
            diner_name: "Ana".to_string(),
            start_time: parse_clock_time("19:05").unwrap(),
            number_of_people: 2,
            orders: vec![],
        };
        let without = serde_json::to_value(TableView::from_record(&record, None)).unwrap();
        assert_eq!(
            without,
            json!({"diner_name": "Ana", "number_of_people": 2, "start_time": "7:05 PM", "orders": []})
        );

        let with = serde_json::to_value(TableView::from_record(&record, Some("Peanuts".into()))).unwrap();
        assert_eq!(with["allergies"], "Peanuts");
    }

    #[test]
    fn test_special_event_serializes_null() {
        let view = DinerAllergies {
            diner_name: "Ana".to_string(),
            allergies: "No Allergies".to_string(),
            special_event: None,
        };
        assert!(serde_json::to_value(view).unwrap()["special_event"].is_null());
    }
}
