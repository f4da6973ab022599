pub use iotlink_types::prelude::*;

// vim: ts=4
