//! Envmon Core
//!
//! The monitoring console assembled: configuration, the HTTP client for the
//! external service and the [`Console`] facade tying session, sidebar and
//! reference data together.
//!
//! # Example
//!
//! ```rust,ignore
//! use envmon_core::prelude::*;
//!
//! # async fn example() -> ConsoleResult<()> {
//! let console = Console::from_config(&ConsoleConfig::load("envmon.toml")?)?;
//!
//! let outcome = console.login(&Credentials::new("admin", "111111")).await?;
//! println!("landing on {}", outcome.route().name);
//!
//! let report = console.reference().load_all().await;
//! for section in &console.sidebar().sections {
//!     println!("{}", section.title);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod console;
pub mod error;
pub mod http;
pub mod telemetry;

// Re-exports
pub use config::{ApiConfig, ConsoleConfig, LogConfig, MarkerConfig, DEFAULT_BASE_URL};
pub use console::{load_navigation, Console};
pub use error::{ConfigError, ConsoleError, ConsoleResult};
pub use http::HttpApi;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building a console
    pub use crate::{Console, ConsoleConfig, ConsoleError, ConsoleResult, HttpApi};
    pub use envmon_session::{Credentials, NavTarget, NavigationOutcome};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
