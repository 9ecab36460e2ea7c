//! Resource caches for the EcoDelicias client.
//!
//! A [`ResourceCache`] mirrors one remote collection: it loads the full list
//! on mount and applies create/update/delete locally only after the server
//! confirms them. Each change produces a new immutable snapshot and a
//! [`CacheEvent`]. [`ReportsCache`] loads the admin dashboard data.

mod cache;
mod cache_fsm;
mod error;
mod filter;
mod reports;

#[cfg(test)]
mod tests;

pub use cache::{BlogCache, CacheChange, CacheEvent, RecipeCache, ResourceCache};
pub use cache_fsm::{CacheMachine, CacheMachineInput, CacheMachineState, CacheState};
pub use error::{CacheError, CacheResult};
pub use filter::{BlogFilter, RecipeFilter, RecordFilter};
pub use reports::{AdminReport, ReportRow, ReportSource, ReportsCache, REPORTS_ERROR};
