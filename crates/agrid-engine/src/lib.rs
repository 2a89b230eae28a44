//! agrid_engine - column tree builder, sort ordering and filter evaluation.

pub mod engine;
