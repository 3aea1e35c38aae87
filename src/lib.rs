pub mod engine;
pub mod io;
pub mod model;

pub use engine::engine::Engine;
pub use engine::store::EncounterState;
pub use model::ids::EntityId;
