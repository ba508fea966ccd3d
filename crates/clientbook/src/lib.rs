//! `clientbook` - Local client records for fitness professionals
//!
//! This library stores client records (contact details, fitness goal, start
//! date) in a local key/value store, validates and searches them, and fetches
//! exercise suggestions from a public exercise catalog for the detail view.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod render;
pub mod repository;
pub mod search;
pub mod storage;
pub mod suggestions;
pub mod validate;
pub mod view;

pub use client::{Client, ClientDraft, ClientId};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use repository::{ClientRepository, Snapshot};
pub use search::filter;
pub use storage::{MemoryStore, RecordStore, SqliteStore, StoreStats};
pub use suggestions::{ExerciseCatalog, ExerciseSummary, FetchError, HttpExerciseCatalog};
pub use validate::{validate, ValidationErrors, ValidationIssue};
pub use view::{SuggestionPanel, View, ViewController};
