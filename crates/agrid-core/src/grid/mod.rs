//! Grid state and logic (UI-agnostic).

mod columns;
mod data;
mod filter;
mod sort;
mod state;

pub use state::GridEngine;
