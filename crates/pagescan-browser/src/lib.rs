//! Browser page sessions for pagescan.
//!
//! Provides the [`PageSession`] abstraction the scanner drives, and a
//! Chromium-backed implementation that either connects to a remote browser
//! or launches one locally.

pub mod engine;
pub mod error;
pub mod session;

pub use engine::{ChromiumPage, ChromiumPageFactory};
pub use error::{BrowserError, Result};
pub use session::{extract_domain, LaunchTarget, PageSession, PageSessionFactory};
