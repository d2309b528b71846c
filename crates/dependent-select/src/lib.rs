//! Dependent Select
//!
//! Keeps a dependent selection control (staff) consistent with a parent
//! selection control (course) by querying an asynchronous staff source.
//!
//! Layers:
//! - model: staff records, options and the explicit sync state
//! - source: the staff data source contract and its wire format
//! - controls: the two UI controls the sync writes into
//! - sync: the synchronizer itself
//! - config: page-level configuration and sentinel labels

mod config;
mod controls;
mod model;
mod source;
mod sync;

pub use config::{ConfigError, SelectorConfig, SentinelLabels};
pub use controls::{preferred_selection, DependentControl, ParentControl};
pub use model::{SelectOption, StaffId, StaffRecord, SyncOutcome, SyncState};
pub use source::{ensure_success, with_timeout, FetchError, PayloadShape, StaffEndpoint, StaffSource};
pub use sync::DependentSelect;
