//! Client-side orchestration of the canvas page: auth badge, canvas
//! generation, showcase sharing and the public gallery.

pub mod controller;
pub mod display;
pub mod form;
pub mod surface;

pub use controller::{
    auth_badge::{AuthBadgeController, AuthBadgeState},
    events::{FlowError, FlowErrorCategory, FlowKind},
    gallery::{GalleryController, GalleryState, TimestampFormat},
    generation::{ArtifactAvailability, GenerationController, GenerationState},
    orchestration::{Page, PageConfig, PageInit, DEFAULT_GALLERY_ROUTE},
    share::{ShareController, ShareRejected, ShareState},
};
pub use display::{DisplayBlob, DisplayHandle, DisplayHandles};
pub use form::{CanvasForm, FormValues};
pub use surface::{
    Content, Control, ImageView, Inline, Link, MemorySurface, Region, RenderSurface,
    ShowcaseEntry, SurfaceOp,
};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
