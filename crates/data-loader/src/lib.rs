//! # Data Loader Crate
//!
//! This crate handles loading the fine-dining dataset and turning it into
//! assignable reservation records.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Diner, Reservation, Order, ClockTime, ReservationRecord)
//! - **parser**: Time normalization and dataset JSON parsing
//! - **index**: The loaded dataset and the reservation extractor
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DiningIndex;
//! use std::path::Path;
//!
//! // Load the dataset (a missing file yields an empty index)
//! let index = DiningIndex::load_or_empty(Path::new("fine-dining-dataset.json"));
//!
//! // Flatten into records + diner side table
//! let extraction = index.extract_reservations();
//! println!("{} reservations to assign", extraction.records.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::DiningIndex;
pub use parser::parse_clock_time;
pub use types::{
    // Type aliases
    WaiterId,
    DinerLookup,
    // Core types
    Diner,
    Reservation,
    Order,
    FreeText,
    DiningData,
    ClockTime,
    ReservationRecord,
    Extraction,
    DatasetCounts,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_index() {
        let index = DiningIndex::default();
        let counts = index.counts();

        assert_eq!(counts.diners, 0);
        assert_eq!(counts.reservations, 0);
        assert_eq!(counts.guests, 0);
        assert!(index.get_diner("anyone").is_none());
    }

    #[test]
    fn test_record_serializes_24_hour_time() {
        let record = ReservationRecord {
            diner_name: "Marcel".to_string(),
            start_time: parse_clock_time("6:45 PM").unwrap(),
            number_of_people: 2,
            orders: vec![],
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["start_time"], "18:45");

        let back: ReservationRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_dietary_tags_are_deduplicated() {
        let diner = Diner {
            name: "Tag".to_string(),
            reservations: vec![Reservation {
                start_time: "18:00".to_string(),
                number_of_people: 2,
                orders: vec![
                    Order {
                        item: "Salade".to_string(),
                        dietary_tags: vec!["vegan".to_string(), "nut-free".to_string()],
                        price: 14.0,
                    },
                    Order {
                        item: "Sorbet".to_string(),
                        dietary_tags: vec!["vegan".to_string()],
                        price: 9.0,
                    },
                ],
            }],
            emails: vec![],
            reviews: vec![],
        };

        assert_eq!(diner.dietary_tags(), vec!["vegan", "nut-free"]);
    }
}
