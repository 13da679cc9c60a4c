//! Re-exports of mockall-generated port mocks, shared across the core's unit tests.

pub use crate::ports::{
    MockActivityStore, MockLearnerAdmin, MockPlacementSessionStore, MockProgressStore, MockWordCatalog,
};
