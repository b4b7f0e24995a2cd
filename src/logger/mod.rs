//! Process-wide tracing subscriber. Starts at `info` and is reloaded once the
//! settings are known.

mod logger;
pub use logger::*;

pub use tracing::{debug, error, info, trace, warn};
