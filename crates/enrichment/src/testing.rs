//! Scripted generators and fixtures for tests in this crate.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use data_loader::{Diner, FreeText, Order, Reservation, ReservationRecord, parse_clock_time};
use llm_client::{GenerationRequest, LlmClientError, TextGenerator};

/// Replies with a fixed text (or fails) and remembers every prompt
pub struct ScriptedGenerator {
    reply: Option<String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &GenerationRequest) -> llm_client::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());
        self.reply
            .clone()
            .ok_or_else(|| LlmClientError::Transport("connection refused".to_string()))
    }
}

pub fn sample_diner(name: &str) -> Diner {
    Diner {
        name: name.to_string(),
        reservations: vec![Reservation {
            start_time: "19:00".to_string(),
            number_of_people: 2,
            orders: vec![Order {
                item: "Risotto".to_string(),
                dietary_tags: vec!["vegetarian".to_string()],
                price: 28.0,
            }],
        }],
        emails: vec![FreeText::from("Please note I cannot eat shellfish.")],
        reviews: vec![FreeText::from("Lovely anniversary dinner last year.")],
    }
}

pub fn record(name: &str, time: &str, party: u32) -> ReservationRecord {
    ReservationRecord {
        diner_name: name.to_string(),
        start_time: parse_clock_time(time).unwrap(),
        number_of_people: party,
        orders: vec![],
    }
}
