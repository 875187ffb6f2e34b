use yew_router::prelude::*;

use crate::session::AuthState;

#[derive(Clone, Debug, PartialEq, Eq, Routable)]
pub enum Route {
    #[at("/")]
    Login,
    #[at("/dashboard")]
    Dashboard,
    #[at("/dashboard/user")]
    UserHome,
    #[at("/dashboard/user/maintenances")]
    Maintenances,
    #[at("/dashboard/user/movements")]
    Movements,
    #[at("/dashboard/user/reports")]
    Reports,
    #[at("/dashboard/admin")]
    Admin,
    #[not_found]
    #[at("/404")]
    NotFound,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Only reachable without a session (the login screen).
    Public,
    Protected,
    /// Never rendered; always sent back to the login route.
    Unmatched,
}

impl Route {
    pub fn access(&self) -> Access {
        match self {
            Route::Login => Access::Public,
            Route::NotFound => Access::Unmatched,
            _ => Access::Protected,
        }
    }

    /// The user-area section this route shows, if any.
    pub fn section(&self) -> Option<Section> {
        match self {
            Route::Maintenances => Some(Section::Maintenances),
            Route::Movements => Some(Section::Movements),
            Route::Reports => Some(Section::Reports),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Maintenances,
    Movements,
    Reports,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Maintenances, Section::Movements, Section::Reports];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Maintenances => "Maintenances",
            Section::Movements => "Movements",
            Section::Reports => "Queries & Reports",
        }
    }

    pub fn route(&self) -> Route {
        match self {
            Section::Maintenances => Route::Maintenances,
            Section::Movements => Route::Movements,
            Section::Reports => Route::Reports,
        }
    }
}

/// Where to send the user instead of `route`, or `None` to render it.
///
/// Evaluated once per navigation. While the session is still being checked no
/// redirect is issued; the caller shows a placeholder instead.
pub fn redirect_for(route: &Route, auth: &AuthState) -> Option<Route> {
    let signed_in = match auth {
        AuthState::Checking => return None,
        AuthState::Authenticated(_) => true,
        AuthState::Anonymous => false,
    };
    match route.access() {
        Access::Unmatched => Some(Route::Login),
        Access::Public if signed_in => Some(Route::UserHome),
        Access::Protected if !signed_in => Some(Route::Login),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use chrono::{TimeZone, Utc};

    fn signed_in() -> AuthState {
        AuthState::Authenticated(Session {
            user_id: "u1".into(),
            user_name: "ana".into(),
            expires_at: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
            remember: true,
        })
    }

    #[test]
    fn protected_routes_need_a_session() {
        for route in [
            Route::Dashboard,
            Route::UserHome,
            Route::Maintenances,
            Route::Movements,
            Route::Reports,
            Route::Admin,
        ] {
            assert_eq!(redirect_for(&route, &AuthState::Anonymous), Some(Route::Login));
            assert_eq!(redirect_for(&route, &signed_in()), None);
        }
    }

    #[test]
    fn login_bounces_signed_in_users_to_the_dashboard() {
        assert_eq!(redirect_for(&Route::Login, &signed_in()), Some(Route::UserHome));
        assert_eq!(redirect_for(&Route::Login, &AuthState::Anonymous), None);
    }

    #[test]
    fn unknown_paths_go_home() {
        assert_eq!(redirect_for(&Route::NotFound, &signed_in()), Some(Route::Login));
        assert_eq!(redirect_for(&Route::NotFound, &AuthState::Anonymous), Some(Route::Login));
    }

    #[test]
    fn nothing_redirects_while_checking() {
        assert_eq!(redirect_for(&Route::Reports, &AuthState::Checking), None);
        assert_eq!(redirect_for(&Route::Login, &AuthState::Checking), None);
    }

    #[test]
    fn paths_match_the_routing_surface() {
        assert_eq!(Route::recognize("/"), Some(Route::Login));
        assert_eq!(Route::recognize("/dashboard/user/movements"), Some(Route::Movements));
        assert_eq!(Route::Admin.to_path(), "/dashboard/admin");
    }
}
