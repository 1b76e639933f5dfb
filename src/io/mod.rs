//! Audio hosts: where the rendered mix ends up.

pub mod offline;
pub mod output;

pub use offline::{OfflineHandle, OfflineHost};
pub use output::CpalHost;
