pub mod command_outcome;
pub mod encounter_file;
pub mod ids;
pub mod individual;
pub mod list_item;
pub mod mob;
pub mod player;
pub mod settings;
pub mod threat;
