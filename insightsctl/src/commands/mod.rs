//! Command implementations

pub mod encode;
pub mod import;
pub mod log;

use crate::cli::InputArgs;
use insights_core::prelude::Compression;

/// Compression level requested on the command line
pub(crate) fn compression(input: &InputArgs) -> Compression {
    input.level.map(Compression::new).unwrap_or_default()
}
