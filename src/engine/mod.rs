pub mod apply_command;
pub mod damage;
pub mod engine;
pub mod list_view;
pub mod mob;
pub mod protocol;
pub mod store;
