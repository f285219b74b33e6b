//! # Cadence Core Library
//!
//! The recurring-event engine behind the Cadence planner: expands an
//! authored event template into a dated series, tracks series membership,
//! and reconciles edits and deletes against the series without losing
//! completion state or project linkage.
//!
//! ## Features
//!
//! - **Fixed-Interval Recurrence**: daily, weekly, monthly, and yearly
//!   stepping with calendar-aware month/year arithmetic
//! - **Edit Scopes**: sever one occurrence from its series, or regenerate
//!   the whole series from an edited template
//! - **Completion Carry-Over**: user progress survives regeneration,
//!   keyed by series position
//! - **Project Anchoring**: a project's last occurrence is held through a
//!   regeneration so its event count never transiently drops to zero
//! - **Abstract Persistence**: the engine talks to an `EventStore` trait;
//!   a SQLite implementation ships in [`repository`]
//!
//! ## Core Modules
//!
//! - [`db`]: database connection and schema management
//! - [`models`]: occurrence, recurrence, and edit-session types
//! - [`repository`]: `EventStore`/`ProjectLookup` traits and the SQLite store
//! - [`recurrence`]: template-to-series expansion
//! - [`completion`]: completion-state capture and carry-over
//! - [`series`]: series identity stamping and id generation
//! - [`resolver`]: the edit-scope state machine
//! - [`error`]: error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cadence_core::{
//!     db,
//!     models::{EditSession, OccurrenceDraft, Recurrence, RecurrenceKind},
//!     repository::SqliteStore,
//!     resolver::EditScopeResolver,
//! };
//! use chrono::{Duration, Utc};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = db::establish_connection("events.db").await?;
//!     let store = SqliteStore::new(pool);
//!     let resolver = EditScopeResolver::new(store.clone(), store);
//!
//!     // Author a weekly event; it expands into a series of occurrences.
//!     let start = Utc::now();
//!     let draft = OccurrenceDraft {
//!         name: "Team sync".to_string(),
//!         start_at: Some(start),
//!         end_at: Some(start + Duration::minutes(30)),
//!         recurrence: Recurrence {
//!             kind: RecurrenceKind::Weekly,
//!             until: None,
//!             count: Some(12),
//!         },
//!         ..Default::default()
//!     };
//!
//!     let outcome = resolver.submit(draft, EditSession::Create).await?;
//!     println!("created: {:?}", outcome);
//!
//!     Ok(())
//! }
//! ```

pub mod completion;
pub mod db;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod repository;
pub mod resolver;
pub mod series;
