//! Data models: parsed invoices, the flat result table, and configuration.

pub mod config;
pub mod invoice;
pub mod table;
