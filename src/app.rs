//! Application module: the UI-side model.
//!
//! `App` holds everything the terminal UI reads when drawing: pane focus,
//! per-pane selections, search results, the scanned file list, the library
//! view and the latest progress snapshot from the poller.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
