//! Spotify Queue Broker Library
//!
//! This library lets a single "driver" account authorize once against the Spotify
//! Web API and then relays a small set of calls on behalf of any number of
//! unauthenticated "passenger" clients: searching tracks, browsing playlists and
//! adding songs to the queue of the driver's active playback device.
//!
//! # Modules
//!
//! - `api` - HTTP handlers exposed to the driver and passengers
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy and its HTTP translation
//! - `management` - Token lifecycle for the driver session
//! - `server` - Router assembly and the listening loop
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Upstream payloads and client-facing projections
//! - `utils` - Formatting and projection helpers
//!
//! # Example
//!
//! ```
//! use spotqueue::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> spotqueue::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env()?;
//!     server::start_api_server(config).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the process boundary (startup, binding, serving) where any error is
/// fatal. Request handling uses [`error::AppError`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Driver account connected");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for startup failures. Request handlers log with [`warning!`] and
/// return an [`error::AppError`] to the caller instead.
///
/// # Example
///
/// ```
/// error!("Cannot bind {}: {}", addr, e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("[search] upstream returned {}", status);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
