//! Application routes the session core navigates to.
//!
//! Route constants are app-relative. [`Routes`] prefixes them with the
//! configured base path for navigation and strips it again when reading the
//! navigator's current location, so comparisons always happen on
//! app-relative paths without query string or fragment.

use core_runtime::config::normalize_base_path;

/// Login surface; also where the user lands after an expired session.
pub const LOGIN_PATH: &str = "/profile";
pub const REGISTER_PATH: &str = "/register";
pub const NETWORK_ERROR_PATH: &str = "/network-error";
pub const ERROR_PATH_PREFIX: &str = "/error";
pub const DEFAULT_DESTINATION: &str = "/";
pub const EXPIRED_QUERY: &str = "expired=true";

/// Paths that never become a return target and never trigger an auth redirect.
pub const WHITELIST: &[&str] = &[ERROR_PATH_PREFIX, NETWORK_ERROR_PATH, LOGIN_PATH, REGISTER_PATH];

/// HTTP statuses that get a dedicated error view.
pub fn is_recognized_error_status(status: u16) -> bool {
    matches!(status, 404 | 409 | 418 | 429 | 500..=599)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Routes {
    base_path: String,
}

impl Routes {
    pub fn new(base_path: &str) -> Self {
        Self {
            base_path: normalize_base_path(base_path),
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Prefixes an app-relative path with the base path.
    pub fn href(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_path, path)
        } else {
            format!("{}/{}", self.base_path, path)
        }
    }

    /// Turns a navigator location back into an app-relative path, keeping
    /// the query string.
    pub fn strip_base(&self, location: &str) -> String {
        if self.base_path.is_empty() {
            return ensure_leading_slash(location);
        }
        match location.strip_prefix(self.base_path.as_str()) {
            Some("") => "/".to_string(),
            Some(rest) if rest.starts_with(['/', '?', '#']) => ensure_leading_slash(rest),
            _ => ensure_leading_slash(location),
        }
    }

    pub fn login(&self) -> String {
        self.href(LOGIN_PATH)
    }

    pub fn login_expired(&self) -> String {
        format!("{}?{}", self.href(LOGIN_PATH), EXPIRED_QUERY)
    }

    pub fn network_error(&self) -> String {
        self.href(NETWORK_ERROR_PATH)
    }

    pub fn error_view(&self, status: u16) -> String {
        self.href(&format!("{}/{}", ERROR_PATH_PREFIX, status))
    }

    pub fn default_destination(&self) -> String {
        self.href(DEFAULT_DESTINATION)
    }

    pub fn is_login_surface(&self, path: &str) -> bool {
        matches_prefix(path_only(path), LOGIN_PATH)
    }

    pub fn is_network_error(&self, path: &str) -> bool {
        path_only(path) == NETWORK_ERROR_PATH
    }

    pub fn is_whitelisted(&self, path: &str) -> bool {
        let path = path_only(path);
        WHITELIST.iter().any(|prefix| matches_prefix(path, prefix))
    }

    /// Status family (`status / 100`) of the error view at `path`, if any.
    pub fn error_family(&self, path: &str) -> Option<u16> {
        path_only(path)
            .strip_prefix(ERROR_PATH_PREFIX)?
            .strip_prefix('/')?
            .split('/')
            .next()?
            .parse::<u16>()
            .ok()
            .map(|status| status / 100)
    }
}

/// Drops query string and fragment.
pub fn path_only(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

fn matches_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
