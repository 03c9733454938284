//! Session guard in front of the protected pages.

use gotify_admin_core::SessionStore;

use super::state::Route;

/// Whether the protected pages may render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Guard {
    /// Initial state until the stored session has been inspected.
    #[default]
    Checking,
    Authenticated,
    /// Login view; `return_to` is restored after a successful login.
    Unauthenticated { return_to: Route },
}

impl Guard {
    /// Leave `Checking` based on whether a token is stored. No-op afterwards.
    pub fn check(&mut self, session: &SessionStore, requested: Route) {
        if *self == Self::Checking {
            *self = if session.is_authenticated() {
                Self::Authenticated
            } else {
                Self::Unauthenticated {
                    return_to: requested,
                }
            };
        }
    }

    /// Login went through; returns the route to show.
    pub fn login_succeeded(&mut self) -> Option<Route> {
        match *self {
            Self::Unauthenticated { return_to } => {
                *self = Self::Authenticated;
                Some(return_to)
            }
            Self::Checking | Self::Authenticated => None,
        }
    }

    /// Back to the login view, remembering `current`.
    pub fn revoke(&mut self, current: Route) {
        *self = Self::Unauthenticated { return_to: current };
    }

    pub const fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use gotify_admin_core::ClientIdentity;

    #[test]
    fn no_token_requires_login_for_requested_route() {
        let mut guard = Guard::default();
        guard.check(&SessionStore::in_memory(), Route::Users);
        assert_eq!(
            guard,
            Guard::Unauthenticated {
                return_to: Route::Users
            }
        );
    }

    #[test]
    fn stored_token_skips_login() {
        let session = SessionStore::in_memory();
        session
            .persist("Ctok", &ClientIdentity { id: 1, name: "c".into() })
            .unwrap();
        let mut guard = Guard::default();
        guard.check(&session, Route::Messages);
        assert!(guard.is_authenticated());
    }

    #[test]
    fn check_runs_once() {
        let session = SessionStore::in_memory();
        let mut guard = Guard::default();
        guard.check(&session, Route::Clients);
        session
            .persist("Ctok", &ClientIdentity { id: 1, name: "c".into() })
            .unwrap();
        guard.check(&session, Route::Messages);
        assert!(!guard.is_authenticated());
    }

    #[test]
    fn login_returns_to_requested_route() {
        let mut guard = Guard::Unauthenticated {
            return_to: Route::Applications,
        };
        assert_eq!(guard.login_succeeded(), Some(Route::Applications));
        assert!(guard.is_authenticated());
        assert_eq!(guard.login_succeeded(), None);
    }

    #[test]
    fn revoke_remembers_current_route() {
        let mut guard = Guard::Authenticated;
        guard.revoke(Route::Clients);
        assert_eq!(
            guard,
            Guard::Unauthenticated {
                return_to: Route::Clients
            }
        );
    }
}
