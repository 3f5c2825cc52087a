//! Library side of the accessibility pipeline CLI.

pub mod logging;
pub mod pipeline;
