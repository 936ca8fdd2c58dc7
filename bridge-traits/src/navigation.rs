//! Navigation Abstraction
//!
//! The core never touches a real location bar. It asks the host for the
//! current path and requests redirects through [`Navigator`], so the whole
//! session subsystem runs the same in a browser, a desktop shell or a test.

use serde::{Deserialize, Serialize};

/// In-memory state carried along with a redirect.
///
/// This mirrors the history-state object a browser router attaches to a
/// navigation. It is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    /// Path the user originally tried to reach
    pub from: Option<String>,
}

impl NavigationState {
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            from: Some(path.into()),
        }
    }
}

/// Host navigation capability
///
/// Paths returned by [`current_path`](Navigator::current_path) include the
/// query string, if any, and the application base path, if one is
/// configured. Redirect targets are passed in the same form.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::navigation::Navigator;
///
/// fn go_home(nav: &dyn Navigator) {
///     if nav.current_path() != "/" {
///         nav.redirect("/", None);
///     }
/// }
/// ```
pub trait Navigator: Send + Sync {
    /// Current location path (with query string)
    fn current_path(&self) -> String;

    /// Navigate to `target`, replacing the current location
    fn redirect(&self, target: &str, state: Option<NavigationState>);

    /// State attached to the navigation that produced the current location
    fn current_state(&self) -> Option<NavigationState> {
        None
    }
}
