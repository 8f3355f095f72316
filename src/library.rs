//! Local file intake and the persistent metadata store.
//!
//! `scan` walks the configured music directory into `LocalFile`s for the
//! files pane; `MetadataStore` is the JSON-backed library of rated tracks.

mod model;
mod scan;
mod store;

pub use model::LocalFile;
pub use scan::{probe_duration, scan};
pub use store::{LibraryEntry, MetadataStore, parse_rating};

#[cfg(test)]
mod tests;
