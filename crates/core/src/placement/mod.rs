pub mod engine;

pub use engine::PlacementEngine;
