pub mod activity_store;
pub mod learner_admin;
pub mod placement_session_store;
pub mod progress_store;
pub mod word_catalog;

pub use activity_store::ActivityStore;
pub use learner_admin::LearnerAdmin;
pub use placement_session_store::PlacementSessionStore;
pub use progress_store::{DueFilter, ProgressStore};
pub use word_catalog::WordCatalog;

#[cfg(any(test, feature = "testing"))]
pub use activity_store::MockActivityStore;
#[cfg(any(test, feature = "testing"))]
pub use learner_admin::MockLearnerAdmin;
#[cfg(any(test, feature = "testing"))]
pub use placement_session_store::MockPlacementSessionStore;
#[cfg(any(test, feature = "testing"))]
pub use progress_store::MockProgressStore;
#[cfg(any(test, feature = "testing"))]
pub use word_catalog::MockWordCatalog;
