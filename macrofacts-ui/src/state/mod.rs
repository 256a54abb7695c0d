//! State Management
//!
//! Session, theme and toast state shared by every page.

pub mod global;

pub use global::{provide_global_state, use_global_state, GlobalState};
