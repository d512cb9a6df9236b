//! CLI operation mode handlers.
//!
//! - [`repositories`]: List and filter the repositories on a host
//! - [`review`]: Open, and optionally submit, a pull request review
//!
//! Output formatting utilities are in [`output`]; [`ConsoleHost`] stands in
//! for a review window.

mod console_host;
mod error;
pub mod logging;
pub mod output;
pub mod repositories;
pub mod review;

pub use console_host::ConsoleHost;
pub use error::CliError;
