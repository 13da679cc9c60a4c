use chrono::{DateTime, Utc};

/// Injected wall-clock abstraction. The core never calls `Utc::now()` directly
/// outside this module; every time-dependent operation takes a `&Clock`.
#[derive(Debug, Clone)]
pub enum Clock {
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(at) => *at,
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Clock::System
    }
}
