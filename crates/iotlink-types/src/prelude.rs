pub use crate::error::{Error, IlResult};

pub use tracing::{debug, error, info, warn};

// vim: ts=4
