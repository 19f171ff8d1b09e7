//! tallysheet_engine - Spreadsheet formula engine.

pub mod engine;
pub mod functions;
