//! # Enrichment Crate
//!
//! Per-diner and per-waiter facts derived from free text through the
//! text-generation service, plus the cache that keeps them.
//!
//! ## Components
//!
//! ### Enrichers
//! - [`AllergyExtractor`]: one line of allergies, default "No Allergies"
//! - [`EventDetector`]: birthday, anniversary... default none
//! - [`PreferenceExtractor`]: short service preferences, default empty
//! - [`SummaryWriter`]: briefing for a waiter's section, default a
//!   templated sentence from counts
//!
//! Enrichers never return an error. Generation failures, timeouts and
//! malformed output are logged and replaced by the default.
//!
//! ### Derived-Data Cache
//! [`DerivedCache`] memoizes all four, keyed by diner name or waiter id,
//! and is cleared wholesale by its owner.
//!
//! ## Example Usage
//!
//! ```ignore
//! use enrichment::{DerivedCache, Enrichers};
//!
//! let enrichers = Enrichers::new(generator);
//! let mut cache = DerivedCache::new();
//! let event = cache.special_event_for(&diner, &enrichers).await;
//! if event.has_event {
//!     println!("{}: {:?}", diner.name, event.event_type);
//! }
//! ```

pub mod allergies;
pub mod cache;
pub mod context;
pub mod error;
pub mod preferences;
pub mod special_events;
pub mod summary;

#[cfg(test)]
mod testing;

pub use allergies::{AllergyExtractor, NO_ALLERGIES};
pub use cache::{CacheSizes, DerivedCache, Enrichers, MemoTable};
pub use error::EnrichError;
pub use preferences::PreferenceExtractor;
pub use special_events::{EventDetector, SpecialEvent};
pub use summary::{SummaryWriter, fallback_summary};
