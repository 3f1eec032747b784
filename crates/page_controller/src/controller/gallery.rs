//! Gallery flow: lists published canvases in server order.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use client_core::CanvasApi;
use shared::{domain::ShowcaseItem, protocol::image_path};
use tracing::{debug, info, warn};
use url::Url;

use super::{
    events::{FlowError, FlowKind},
    lock,
};
use crate::surface::{Content, ImageView, Inline, Link, Region, RenderSurface, ShowcaseEntry};

const PROFILE_BASE_URL: &str = "https://open.spotify.com/user";
const EMPTY_SHOWCASE_MESSAGE: &str = "The showcase is empty. Be the first to share a canvas!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryState {
    Idle,
    Loading,
    Populated(usize),
    Empty,
    Failed(FlowError),
}

/// Renders creation timestamps as `M/D/YYYY, HH:MM AM` in a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampFormat {
    offset: FixedOffset,
}

impl TimestampFormat {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    pub fn local() -> Self {
        Self::new(Local::now().offset().fix())
    }

    pub fn format(&self, timestamp: &DateTime<Utc>) -> String {
        timestamp
            .with_timezone(&self.offset)
            .format("%-m/%-d/%Y, %I:%M %p")
            .to_string()
    }
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self::local()
    }
}

pub fn profile_url(creator_id: &str) -> String {
    let Ok(mut url) = Url::parse(PROFILE_BASE_URL) else {
        return format!("{PROFILE_BASE_URL}/{creator_id}");
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push(creator_id);
    }
    url.into()
}

pub fn showcase_entry(item: &ShowcaseItem, timestamps: &TimestampFormat) -> ShowcaseEntry {
    let created = timestamps.format(&item.created_at);
    let byline = match item.creator_profile_id() {
        Some(creator_id) => vec![
            Inline::text("By "),
            Inline::Link(Link::new_context(
                profile_url(creator_id),
                item.creator_name.clone(),
            )),
            Inline::text(format!(" on {created}")),
        ],
        None => vec![Inline::text(format!(
            "By {} on {created}",
            item.creator_name
        ))],
    };
    ShowcaseEntry {
        image: ImageView {
            src: image_path(&item.image_filename),
            alt: format!("Canvas by {}", item.creator_name),
        },
        byline,
    }
}

pub struct GalleryController {
    api: Arc<dyn CanvasApi>,
    surface: Arc<dyn RenderSurface>,
    timestamps: TimestampFormat,
    state: Mutex<GalleryState>,
}

impl GalleryController {
    pub fn new(
        api: Arc<dyn CanvasApi>,
        surface: Arc<dyn RenderSurface>,
        timestamps: TimestampFormat,
    ) -> Self {
        Self {
            api,
            surface,
            timestamps,
            state: Mutex::new(GalleryState::Idle),
        }
    }

    pub fn state(&self) -> GalleryState {
        lock(&self.state).clone()
    }

    /// Fetches and renders the gallery. Runs at most once; later calls return
    /// the current state without a request.
    pub async fn load(&self) -> GalleryState {
        {
            let mut state = lock(&self.state);
            if *state != GalleryState::Idle {
                debug!(state = ?*state, "gallery already loaded");
                return state.clone();
            }
            *state = GalleryState::Loading;
            self.surface
                .set_content(Region::ShowcaseContainer, Content::Loader);
        }

        let next = match self.api.showcase_items().await {
            Ok(items) if items.is_empty() => {
                self.surface.set_content(
                    Region::ShowcaseContainer,
                    Content::message(EMPTY_SHOWCASE_MESSAGE),
                );
                GalleryState::Empty
            }
            Ok(items) => {
                let entries: Vec<_> = items
                    .iter()
                    .map(|item| showcase_entry(item, &self.timestamps))
                    .collect();
                self.surface
                    .set_content(Region::ShowcaseContainer, Content::Gallery(entries));
                GalleryState::Populated(items.len())
            }
            Err(err) => {
                let err = FlowError::from_client(FlowKind::Gallery, &err);
                warn!(
                    flow = err.flow().name(),
                    category = ?err.category(),
                    detail = err.detail(),
                    "showcase load failed"
                );
                self.surface
                    .set_content(Region::ShowcaseContainer, Content::Error(err.user_message()));
                GalleryState::Failed(err)
            }
        };
        info!(state = ?next, "gallery loaded");
        *lock(&self.state) = next.clone();
        next
    }
}

#[cfg(test)]
#[path = "../tests/gallery_tests.rs"]
mod tests;
