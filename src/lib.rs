//! Accretion — black hole mass simulation service and play runner.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod simulation;
pub mod web;
pub mod runner;
