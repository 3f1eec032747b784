//! Page orchestration: runs each controller whose mount point exists and
//! forwards user actions to the right flow.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use client_core::CanvasApi;
use tracing::{debug, info};

use super::{
    auth_badge::{AuthBadgeController, AuthBadgeState},
    events::{FlowError, FlowKind},
    gallery::{GalleryController, GalleryState, TimestampFormat},
    generation::{GenerationController, GenerationState},
    share::{ShareController, ShareRejected, ShareState},
};
use crate::{
    display::DisplayHandles,
    form::CanvasForm,
    surface::{Region, RenderSurface},
};

pub const DEFAULT_GALLERY_ROUTE: &str = "/showcase";

#[derive(Debug, Clone)]
pub struct PageConfig {
    /// Path of the page being driven.
    pub path: String,
    pub gallery_route: String,
    pub timestamps: TimestampFormat,
    /// Origin embedded in display handle URLs.
    pub origin: String,
}

impl PageConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn is_gallery_route(&self) -> bool {
        self.path == self.gallery_route
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            gallery_route: DEFAULT_GALLERY_ROUTE.to_string(),
            timestamps: TimestampFormat::default(),
            origin: "null".to_string(),
        }
    }
}

/// Which flows initialization started, and where the one-shot flows ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInit {
    pub auth: Option<AuthBadgeState>,
    pub gallery: Option<GalleryState>,
    pub generation_armed: bool,
}

pub struct Page {
    config: PageConfig,
    surface: Arc<dyn RenderSurface>,
    form: CanvasForm,
    handles: Arc<DisplayHandles>,
    auth: AuthBadgeController,
    generation: GenerationController,
    share: ShareController,
    gallery: GalleryController,
    generation_armed: AtomicBool,
}

impl Page {
    pub fn new(
        config: PageConfig,
        api: Arc<dyn CanvasApi>,
        surface: Arc<dyn RenderSurface>,
    ) -> Self {
        let handles = Arc::new(DisplayHandles::new(config.origin.clone()));
        let generation = GenerationController::new(
            Arc::clone(&api),
            Arc::clone(&surface),
            Arc::clone(&handles),
        );
        let share = ShareController::new(
            Arc::clone(&api),
            Arc::clone(&surface),
            generation.subscribe(),
            config.gallery_route.clone(),
        );
        let auth = AuthBadgeController::new(Arc::clone(&api), Arc::clone(&surface));
        let gallery = GalleryController::new(api, Arc::clone(&surface), config.timestamps);

        Self {
            config,
            surface,
            form: CanvasForm::default(),
            handles,
            auth,
            generation,
            share,
            gallery,
            generation_armed: AtomicBool::new(false),
        }
    }

    /// Page-load trigger. The auth badge and gallery run concurrently; the
    /// generation flow is only armed for later submissions.
    pub async fn initialize(&self) -> PageInit {
        let generation_armed = self.surface.has_region(Region::CanvasForm);
        if generation_armed {
            self.surface.set_visible(Region::ShareControls, false);
            self.generation_armed.store(true, Ordering::SeqCst);
        }

        let auth = async {
            if self.surface.has_region(Region::AuthStatus) {
                Some(self.auth.run().await)
            } else {
                debug!("no auth badge mount point");
                None
            }
        };
        let gallery = async {
            if self.config.is_gallery_route()
                && self.surface.has_region(Region::ShowcaseContainer)
            {
                Some(self.gallery.load().await)
            } else {
                None
            }
        };
        let (auth, gallery) = futures::join!(auth, gallery);

        info!(path = %self.config.path, generation_armed, "page initialized");
        PageInit {
            auth,
            gallery,
            generation_armed,
        }
    }

    /// Form submission. Returns `None` when the page has no generation form.
    pub async fn submit_generation(&self) -> Option<GenerationState> {
        if !self.generation_armed.load(Ordering::SeqCst) {
            debug!("generation form not mounted; ignoring submit");
            return None;
        }
        let state = match self.form.snapshot().params() {
            Ok(params) => self.generation.submit(params).await,
            Err(err) => self
                .generation
                .reject(FlowError::validation(FlowKind::Generation, &err)),
        };
        Some(state)
    }

    /// Share click. Form values are read now, not at generation time.
    pub async fn share(&self) -> Result<ShareState, ShareRejected> {
        let values = self.form.snapshot();
        match values.params() {
            Ok(params) => self.share.share(params, values.share_anonymously).await,
            Err(err) => self.share.reject(FlowError::validation(FlowKind::Share, &err)),
        }
    }

    /// Revokes every live display handle. Canvas responses still in flight
    /// are dropped when they land, and later submissions are ignored.
    pub fn unload(&self) -> usize {
        self.generation_armed.store(false, Ordering::SeqCst);
        let released = usize::from(self.generation.release());
        released + self.handles.revoke_all()
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn form(&self) -> &CanvasForm {
        &self.form
    }

    pub fn handles(&self) -> &DisplayHandles {
        &self.handles
    }

    pub fn auth(&self) -> &AuthBadgeController {
        &self.auth
    }

    pub fn generation(&self) -> &GenerationController {
        &self.generation
    }

    pub fn share_flow(&self) -> &ShareController {
        &self.share
    }

    pub fn gallery(&self) -> &GalleryController {
        &self.gallery
    }
}

#[cfg(test)]
#[path = "../tests/orchestration_tests.rs"]
mod tests;
