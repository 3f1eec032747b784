//! Generation flow: form submission → canvas request → rendered artifact or
//! error, with the share affordance shown only while an artifact is rendered.

use std::sync::{Arc, Mutex};

use client_core::{CanvasApi, CanvasImage};
use shared::domain::CanvasParams;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{
    events::{FlowError, FlowKind},
    lock,
};
use crate::{
    display::{DisplayHandle, DisplayHandles},
    surface::{Content, ImageView, Region, RenderSurface},
};

const CANVAS_ALT: &str = "Top Canvas";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Requesting,
    Rendered,
    Failed(FlowError),
}

/// Whether an artifact is currently on display. `generation` increases with
/// every successful render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactAvailability {
    Hidden,
    Rendered { generation: u64 },
}

struct GenerationInner {
    state: GenerationState,
    displayed: Option<DisplayHandle>,
    renders: u64,
    /// Set once the page is torn down; responses landing afterwards are
    /// dropped without touching the surface or the handle registry.
    released: bool,
}

pub struct GenerationController {
    api: Arc<dyn CanvasApi>,
    surface: Arc<dyn RenderSurface>,
    handles: Arc<DisplayHandles>,
    availability: watch::Sender<ArtifactAvailability>,
    inner: Mutex<GenerationInner>,
}

impl GenerationController {
    pub fn new(
        api: Arc<dyn CanvasApi>,
        surface: Arc<dyn RenderSurface>,
        handles: Arc<DisplayHandles>,
    ) -> Self {
        let (availability, _) = watch::channel(ArtifactAvailability::Hidden);
        Self {
            api,
            surface,
            handles,
            availability,
            inner: Mutex::new(GenerationInner {
                state: GenerationState::Idle,
                displayed: None,
                renders: 0,
                released: false,
            }),
        }
    }

    pub fn state(&self) -> GenerationState {
        lock(&self.inner).state.clone()
    }

    pub fn availability(&self) -> ArtifactAvailability {
        *self.availability.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ArtifactAvailability> {
        self.availability.subscribe()
    }

    /// Runs one generation with the params captured at trigger time. A
    /// submission while another is pending is not cancelled: whichever
    /// response lands last owns the display.
    pub async fn submit(&self, params: CanvasParams) -> GenerationState {
        if !self.begin() {
            debug!("generation controller released; submission ignored");
            return self.state();
        }
        debug!(
            item_type = %params.item_type,
            time_range = %params.time_range,
            limit = params.limit.get(),
            "canvas requested"
        );

        match self.api.top_canvas(params).await {
            Ok(image) => self.render(image),
            Err(err) => self.fail(FlowError::from_client(FlowKind::Generation, &err)),
        }
    }

    /// Fails the flow without issuing a request, e.g. for invalid form input.
    pub fn reject(&self, error: FlowError) -> GenerationState {
        self.begin();
        self.fail(error)
    }

    /// Revokes the displayed artifact's handle and stops accepting results.
    /// Used on page unload.
    pub fn release(&self) -> bool {
        let mut inner = lock(&self.inner);
        inner.released = true;
        inner
            .displayed
            .take()
            .is_some_and(|handle| self.handles.revoke(&handle))
    }

    fn begin(&self) -> bool {
        let mut inner = lock(&self.inner);
        if inner.released {
            return false;
        }
        inner.state = GenerationState::Requesting;
        if let Some(handle) = inner.displayed.take() {
            self.handles.revoke(&handle);
        }
        self.surface.set_content(Region::CanvasContainer, Content::Loader);
        self.hide_share();
        true
    }

    fn render(&self, image: CanvasImage) -> GenerationState {
        let mut inner = lock(&self.inner);
        if inner.released {
            debug!("canvas arrived after release; dropped");
            return inner.state.clone();
        }
        if let Some(previous) = inner.displayed.take() {
            self.handles.revoke(&previous);
        }
        let mime_type = image.mime_type();
        let handle = self.handles.create(image.bytes, mime_type);
        self.surface.set_content(
            Region::CanvasContainer,
            Content::Image(ImageView {
                src: handle.url().to_string(),
                alt: CANVAS_ALT.to_string(),
            }),
        );
        self.surface.set_visible(Region::ShareControls, true);

        inner.renders += 1;
        inner.displayed = Some(handle);
        inner.state = GenerationState::Rendered;
        self.availability.send_replace(ArtifactAvailability::Rendered {
            generation: inner.renders,
        });
        info!(generation = inner.renders, "canvas rendered");
        inner.state.clone()
    }

    fn fail(&self, error: FlowError) -> GenerationState {
        let mut inner = lock(&self.inner);
        warn!(
            flow = error.flow().name(),
            category = ?error.category(),
            detail = error.detail(),
            "canvas generation failed"
        );
        if inner.released {
            return inner.state.clone();
        }
        if let Some(previous) = inner.displayed.take() {
            self.handles.revoke(&previous);
        }
        self.surface
            .set_content(Region::CanvasContainer, Content::Error(error.user_message()));
        self.hide_share();
        inner.state = GenerationState::Failed(error);
        inner.state.clone()
    }

    fn hide_share(&self) {
        self.surface.set_visible(Region::ShareControls, false);
        self.availability.send_replace(ArtifactAvailability::Hidden);
    }
}

#[cfg(test)]
#[path = "../tests/generation_tests.rs"]
mod tests;
