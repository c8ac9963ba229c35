//! Test infrastructure for the search repository.
//!
//! - [`mock`] - An in-memory [`SearchApi`](helios_search_repository::client::SearchApi)
//!   that records every request it receives
//! - [`fixtures`] - Entity type and documents used across tests

#![allow(dead_code)]

pub mod fixtures;
pub mod mock;

pub use fixtures::*;
pub use mock::*;
