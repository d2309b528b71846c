//! UI Components
//!
//! Leptos components mounted alongside the server-rendered form.

mod sync_status;

pub use sync_status::SyncStatus;
