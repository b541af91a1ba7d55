//! Helper functions to render diner and table context for prompts.
//!
//! Every enricher needs the same few facts about a diner; gathering them
//! here keeps the prompts consistent.

use data_loader::{Diner, ReservationRecord};

/// Emails, reviews and dietary tags of a diner as prompt text
pub fn diner_context(diner: &Diner) -> String {
    let mut sections = Vec::new();

    sections.push(format!("Diner: {}", diner.name));

    let tags = diner.dietary_tags();
    if tags.is_empty() {
        sections.push("Dietary tags on orders: none".to_string());
    } else {
        sections.push(format!("Dietary tags on orders: {}", tags.join(", ")));
    }

    sections.push(numbered("Emails", diner.emails.iter().map(|e| e.to_prompt_text())));
    sections.push(numbered("Reviews", diner.reviews.iter().map(|r| r.to_prompt_text())));

    sections.join("\n\n")
}

/// Reservations of a diner, one line each
pub fn reservation_lines(diner: &Diner) -> String {
    if diner.reservations.is_empty() {
        return "Reservations: none".to_string();
    }
    let lines: Vec<String> = diner
        .reservations
        .iter()
        .map(|r| {
            let items: Vec<&str> = r.orders.iter().map(|o| o.item.as_str()).collect();
            format!(
                "- {} for {} people; orders: {}",
                r.start_time,
                r.number_of_people,
                if items.is_empty() { "none".to_string() } else { items.join(", ") }
            )
        })
        .collect();
    format!("Reservations:\n{}", lines.join("\n"))
}

/// A waiter's tables, one line each, in the order given
pub fn table_lines(tables: &[ReservationRecord]) -> String {
    tables
        .iter()
        .map(|t| {
            let orders: Vec<String> = t
                .orders
                .iter()
                .map(|o| {
                    if o.dietary_tags.is_empty() {
                        o.item.clone()
                    } else {
                        format!("{} ({})", o.item, o.dietary_tags.join(", "))
                    }
                })
                .collect();
            format!(
                "- {} | {} | party of {} | {}",
                t.start_time,
                t.diner_name,
                t.number_of_people,
                if orders.is_empty() { "no orders yet".to_string() } else { orders.join("; ") }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn numbered(title: &str, entries: impl Iterator<Item = String>) -> String {
    let body: Vec<String> = entries
        .filter(|text| !text.trim().is_empty())
        .enumerate()
        .map(|(i, text)| format!("{}. {}", i + 1, text))
        .collect();
    if body.is_empty() {
        format!("{title}: none")
    } else {
        format!("{title}:\n{}", body.join("\n"))
    }
}
