//! The yt-dlp service boundary: video search, audio extraction for the
//! stream engine, and the permanent downloader.
//!
//! All three call the `yt-dlp` executable and parse its JSON output; no
//! retry policy and no timeouts — each call blocks its worker thread until
//! the tool returns or errors.

mod download;
mod extract;
mod search;

pub use download::{Downloader, is_url, sanitize_filename};
pub use extract::{ExtractedAudio, extract_audio};
pub use search::{SearchHit, search};

#[cfg(test)]
mod tests;
