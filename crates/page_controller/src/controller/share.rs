//! Share flow: publishes the current form parameters to the showcase once an
//! artifact has been rendered.

use std::sync::{Arc, Mutex};

use client_core::CanvasApi;
use shared::{domain::CanvasParams, protocol::ShareRequest};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{
    events::{FlowError, FlowKind},
    generation::ArtifactAvailability,
    lock,
};
use crate::surface::{Content, Control, Inline, Link, Region, RenderSurface};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareState {
    Disabled,
    Armed,
    Sharing,
    Shared,
    Failed(FlowError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShareRejected {
    #[error("no rendered canvas to share")]
    NotArmed,
    #[error("a share is already in progress")]
    InFlight,
}

struct ShareInner {
    state: ShareState,
    armed_for: Option<u64>,
}

pub struct ShareController {
    api: Arc<dyn CanvasApi>,
    surface: Arc<dyn RenderSurface>,
    availability: watch::Receiver<ArtifactAvailability>,
    gallery_route: String,
    inner: Mutex<ShareInner>,
}

impl ShareController {
    pub fn new(
        api: Arc<dyn CanvasApi>,
        surface: Arc<dyn RenderSurface>,
        availability: watch::Receiver<ArtifactAvailability>,
        gallery_route: impl Into<String>,
    ) -> Self {
        Self {
            api,
            surface,
            availability,
            gallery_route: gallery_route.into(),
            inner: Mutex::new(ShareInner {
                state: ShareState::Disabled,
                armed_for: None,
            }),
        }
    }

    pub fn state(&self) -> ShareState {
        let mut inner = lock(&self.inner);
        self.reconcile(&mut inner);
        inner.state.clone()
    }

    /// Publishes `params`. No deduplication: sharing the same canvas twice
    /// creates two showcase entries.
    pub async fn share(
        &self,
        params: CanvasParams,
        share_anonymously: bool,
    ) -> Result<ShareState, ShareRejected> {
        self.begin()?;
        debug!(share_anonymously, "share requested");

        let outcome = self
            .api
            .share_to_showcase(ShareRequest::new(params, share_anonymously))
            .await
            .map(|_| ())
            .map_err(|err| FlowError::from_client(FlowKind::Share, &err));
        Ok(self.finish(outcome))
    }

    /// Fails an armed flow without issuing a request.
    pub fn reject(&self, error: FlowError) -> Result<ShareState, ShareRejected> {
        self.begin()?;
        Ok(self.finish(Err(error)))
    }

    fn reconcile(&self, inner: &mut ShareInner) {
        if inner.state == ShareState::Sharing {
            return;
        }
        match *self.availability.borrow() {
            ArtifactAvailability::Hidden => {
                inner.state = ShareState::Disabled;
            }
            ArtifactAvailability::Rendered { generation } => {
                if inner.state == ShareState::Disabled || inner.armed_for != Some(generation) {
                    inner.state = ShareState::Armed;
                    inner.armed_for = Some(generation);
                }
            }
        }
    }

    fn begin(&self) -> Result<(), ShareRejected> {
        let mut inner = lock(&self.inner);
        self.reconcile(&mut inner);
        match inner.state {
            ShareState::Disabled => return Err(ShareRejected::NotArmed),
            ShareState::Sharing => return Err(ShareRejected::InFlight),
            ShareState::Armed | ShareState::Shared | ShareState::Failed(_) => {}
        }
        inner.state = ShareState::Sharing;
        self.surface.set_enabled(Control::ShareButton, false);
        self.surface.set_content(Region::ShareStatus, Content::Loader);
        Ok(())
    }

    fn finish(&self, outcome: Result<(), FlowError>) -> ShareState {
        let mut inner = lock(&self.inner);
        self.surface.set_enabled(Control::ShareButton, true);
        inner.state = match outcome {
            Ok(()) => {
                self.surface.set_content(
                    Region::ShareStatus,
                    Content::Message(vec![
                        Inline::text("Shared successfully! View "),
                        Inline::Link(Link::same_context(self.gallery_route.clone(), "Showcase")),
                        Inline::text("."),
                    ]),
                );
                info!("canvas shared to showcase");
                ShareState::Shared
            }
            Err(error) => {
                warn!(
                    flow = error.flow().name(),
                    category = ?error.category(),
                    detail = error.detail(),
                    "share failed"
                );
                self.surface
                    .set_content(Region::ShareStatus, Content::Error(error.user_message()));
                ShareState::Failed(error)
            }
        };
        inner.state.clone()
    }
}

#[cfg(test)]
#[path = "../tests/share_tests.rs"]
mod tests;
