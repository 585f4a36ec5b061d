//! Route guard: gate navigation on the session's derived flags.
//!
//! The guard only reads the session. Authentication is checked strictly
//! before admin, so an anonymous request for an admin page lands on the login
//! page rather than home.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::sync::Arc;

use crate::router::RouteMatch;
use crate::session::{HOME_PATH, LOGIN_PATH, Session, SessionContext};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(&'static str),
}

/// Decide a navigation from the destination's requirements and a session.
#[must_use]
pub fn decide(requires_auth: bool, requires_admin: bool, session: &Session) -> GuardDecision {
    if requires_auth && !session.is_authenticated() {
        GuardDecision::Redirect(LOGIN_PATH)
    } else if requires_admin && !session.is_admin() {
        GuardDecision::Redirect(HOME_PATH)
    } else {
        GuardDecision::Proceed
    }
}

#[derive(Clone, Debug)]
pub struct RouteGuard {
    session: Arc<SessionContext>,
}

impl RouteGuard {
    #[must_use]
    pub fn new(session: Arc<SessionContext>) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn check(&self, target: &RouteMatch<'_>) -> GuardDecision {
        let decision = decide(target.requires_auth(), target.requires_admin(), &self.session.snapshot());
        if let GuardDecision::Redirect(to) = decision {
            tracing::info!(path = %target.path, route = target.route().name, redirect = to, "navigation redirected");
        }
        decision
    }
}
