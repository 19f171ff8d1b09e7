//! tallysheet-core - UI-agnostic document model + configuration.

pub mod config;
pub mod document;
pub mod error;

pub use config::Config;
pub use document::Document;
pub use error::{Result, TallysheetError};

pub use tallysheet_engine::engine::CellRef;
