//! Envmon Session
//!
//! The authentication gate of the console.
//!
//! # Overview
//!
//! - **Session**: the logged-in principal, mutated only by `login`/`logout`
//! - **MarkerStore**: the advisory `authenticated` marker that survives reloads
//! - **RouteTable**: every view with its path, title and layout
//! - **RouteGuard**: synchronous gate run on every navigation
//! - **LoginFlow**: replays the destination that was denied before login
//!
//! # Example
//!
//! ```rust,ignore
//! use envmon_session::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example(auth: Arc<dyn AuthService>) -> SessionResult<()> {
//! let session = Session::restore(auth, Arc::new(MemoryMarkerStore::new()));
//! let guard = RouteGuard::new(Arc::new(RouteTable::standard()));
//! let flow = LoginFlow::new();
//!
//! let outcome = guard.check(&session, &"/report".into());
//! flow.observe(&outcome);
//!
//! let next = flow.submit(&session, &Credentials::new("op1", "secret1")).await?;
//! assert!(!guard.check(&session, &next).is_redirect());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod auth;
pub mod error;
pub mod guard;
pub mod login;
pub mod marker;
pub mod route;
pub mod session;
pub mod user;

// Re-exports
pub use auth::AuthService;
pub use error::{AuthenticationError, MarkerError, SessionError, SessionResult};
pub use guard::{NavigationOutcome, RouteGuard};
pub use login::LoginFlow;
pub use marker::{AuthMarker, FileMarkerStore, MarkerStore, MemoryMarkerStore, MARKER_KEY};
pub use route::{Layout, NavTarget, RouteDef, RouteTable, HOME_ROUTE, LOGIN_ROUTE, NOT_FOUND_ROUTE};
pub use session::{Session, SessionView};
pub use user::{Credentials, User, MIN_PASSWORD_LEN};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for session handling
    pub use crate::{
        AuthService, Credentials, LoginFlow, MarkerStore, MemoryMarkerStore, NavTarget,
        NavigationOutcome, RouteGuard, RouteTable, Session, SessionError, SessionResult,
        SessionView, User,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
