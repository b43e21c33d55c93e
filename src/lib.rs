//! pagecheck - Library for normalizing colors and dates read from web UIs
//!
//! This library provides functionality to:
//! - Normalize color names, hex strings, and `rgb()` strings to one comparable form
//! - Parse, render, and compare dates using token patterns (`MM/DD/YYYY`, `MMM DD, YYYY`, ...)
//! - Assert UI values against expectations with readable failure messages
//! - Run batches of assertion cases from JSONL files

pub mod assertions;
pub mod check;
pub mod cli;
pub mod color;
pub mod config;
pub mod datetime;
