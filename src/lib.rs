//! Library crate for usertable.
//!
//! This crate exposes the building blocks of the TUI:
//! - User records and their enums (`model`)
//! - The memoized filter, search, sort and paginate pipeline (`view`)
//! - Validation of the "new user" draft (`form`)
//! - Labels, dates and placeholder avatars (`format`)
//! - The record store boundary and its mock (`store`)
//! - Store error types (`error`)
//! - Application state and update loop (`app`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `usertable` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod error;
pub mod form;
pub mod format;
pub mod model;
pub mod store;
pub mod ui;
pub mod view;

pub use error::{Result, StoreError};
