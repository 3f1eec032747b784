//! Auth badge: one status query per page load, projected onto the badge and
//! the gated generator / login-prompt regions.

use std::sync::{Arc, Mutex};

use client_core::CanvasApi;
use shared::protocol::{LOGIN_PATH, LOGOUT_PATH};
use tracing::{debug, info, warn};

use super::{
    events::{FlowError, FlowKind},
    lock,
};
use crate::surface::{Content, Inline, Link, Region, RenderSurface};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthBadgeState {
    Unrendered,
    Querying,
    Authenticated,
    Unauthenticated,
    /// The status query failed; the page shows the logged-out mode.
    Fallback(FlowError),
}

pub struct AuthBadgeController {
    api: Arc<dyn CanvasApi>,
    surface: Arc<dyn RenderSurface>,
    state: Mutex<AuthBadgeState>,
}

impl AuthBadgeController {
    pub fn new(api: Arc<dyn CanvasApi>, surface: Arc<dyn RenderSurface>) -> Self {
        Self {
            api,
            surface,
            state: Mutex::new(AuthBadgeState::Unrendered),
        }
    }

    pub fn state(&self) -> AuthBadgeState {
        lock(&self.state).clone()
    }

    /// Issues the status query unless one was already issued.
    pub async fn run(&self) -> AuthBadgeState {
        {
            let mut state = lock(&self.state);
            if *state != AuthBadgeState::Unrendered {
                debug!(state = ?*state, "auth status already queried");
                return state.clone();
            }
            *state = AuthBadgeState::Querying;
        }

        let next = match self.api.auth_status().await {
            Ok(auth) if auth.logged_in => {
                self.render(true);
                AuthBadgeState::Authenticated
            }
            Ok(_) => {
                self.render(false);
                AuthBadgeState::Unauthenticated
            }
            Err(err) => {
                let err = FlowError::from_client(FlowKind::AuthBadge, &err);
                warn!(
                    flow = err.flow().name(),
                    category = ?err.category(),
                    detail = err.detail(),
                    "auth status failed; showing logged-out mode"
                );
                self.render(false);
                AuthBadgeState::Fallback(err)
            }
        };
        info!(state = ?next, "auth badge rendered");
        *lock(&self.state) = next.clone();
        next
    }

    fn render(&self, logged_in: bool) {
        let link = if logged_in {
            Link::same_context(LOGOUT_PATH, "Logout Spotify")
        } else {
            Link::same_context(LOGIN_PATH, "Login with Spotify")
        };
        self.surface
            .set_content(Region::AuthStatus, Content::Message(vec![Inline::Link(link)]));
        if self.surface.has_region(Region::CanvasGenerator) {
            self.surface.set_visible(Region::CanvasGenerator, logged_in);
        }
        if self.surface.has_region(Region::LoginPrompt) {
            self.surface.set_visible(Region::LoginPrompt, !logged_in);
        }
    }
}

#[cfg(test)]
#[path = "../tests/auth_badge_tests.rs"]
mod tests;
