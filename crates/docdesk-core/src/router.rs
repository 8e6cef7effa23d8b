//! The set of top-level views and the single rule for moving between them.

/// One of the mutually exclusive top-level views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Documents,
    Chat,
}

/// The data load a view needs on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loader {
    Stats,
    Documents,
    ChatGreeting,
}

/// Authenticated views in navigation order.
pub const SHELL_ROUTES: &[Route] = &[Route::Dashboard, Route::Documents, Route::Chat];

impl Route {
    /// Parse a location fragment such as `#documents` or `chat`.
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        let name = fragment.trim().trim_start_matches('#').trim_start_matches('/');
        match name.to_lowercase().as_str() {
            "login" => Some(Self::Login),
            "register" | "signup" => Some(Self::Register),
            "dashboard" | "" => Some(Self::Dashboard),
            "documents" | "docs" => Some(Self::Documents),
            "chat" => Some(Self::Chat),
            _ => None,
        }
    }

    pub fn fragment(&self) -> &'static str {
        match self {
            Self::Login => "#login",
            Self::Register => "#register",
            Self::Dashboard => "#dashboard",
            Self::Documents => "#documents",
            Self::Chat => "#chat",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Register => "Create account",
            Self::Dashboard => "Dashboard",
            Self::Documents => "Documents",
            Self::Chat => "Chat",
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Dashboard | Self::Documents | Self::Chat)
    }

    pub fn loader(&self) -> Option<Loader> {
        match self {
            Self::Dashboard => Some(Loader::Stats),
            Self::Documents => Some(Loader::Documents),
            Self::Chat => Some(Loader::ChatGreeting),
            Self::Login | Self::Register => None,
        }
    }

    /// Next authenticated view, wrapping. Unauthenticated views map to the dashboard.
    pub fn next_shell(&self) -> Self {
        match SHELL_ROUTES.iter().position(|r| r == self) {
            Some(i) => SHELL_ROUTES[(i + 1) % SHELL_ROUTES.len()],
            None => Self::Dashboard,
        }
    }

    pub fn prev_shell(&self) -> Self {
        match SHELL_ROUTES.iter().position(|r| r == self) {
            Some(0) => SHELL_ROUTES[SHELL_ROUTES.len() - 1],
            Some(i) => SHELL_ROUTES[i - 1],
            None => Self::Dashboard,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.fragment().trim_start_matches('#'))
    }
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    pub load: Option<Loader>,
    /// The requested route was refused and replaced by the login view.
    pub redirected: bool,
}

/// Resolve a navigation request. Every authenticated route is gated the same
/// way: without a session the result is the login view, with no load.
pub fn resolve(requested: Route, has_session: bool) -> Navigation {
    if requested.requires_auth() && !has_session {
        return Navigation {
            route: Route::Login,
            load: None,
            redirected: true,
        };
    }
    Navigation {
        route: requested,
        load: requested.loader(),
        redirected: false,
    }
}

/// Where the app starts: the dashboard when a session was restored, login otherwise.
pub fn initial(has_session: bool) -> Navigation {
    resolve(Route::Dashboard, has_session)
}
