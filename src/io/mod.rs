pub mod config;
pub mod dialogs;
pub mod error;
pub mod persistence;
