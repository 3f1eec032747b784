//! Render surface: the page regions controllers project their state onto.

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use tracing::trace;

use crate::controller::lock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    AuthStatus,
    CanvasGenerator,
    LoginPrompt,
    CanvasForm,
    CanvasContainer,
    ShareControls,
    ShareStatus,
    ShowcaseContainer,
}

impl Region {
    pub const ALL: [Region; 8] = [
        Region::AuthStatus,
        Region::CanvasGenerator,
        Region::LoginPrompt,
        Region::CanvasForm,
        Region::CanvasContainer,
        Region::ShareControls,
        Region::ShareStatus,
        Region::ShowcaseContainer,
    ];

    /// Visibility before any controller has touched the region. The share
    /// controls ship hidden.
    pub fn initially_visible(self) -> bool {
        !matches!(self, Region::ShareControls)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    ShareButton,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub label: String,
    /// Open in a new browsing context.
    pub new_context: bool,
}

impl Link {
    pub fn same_context(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            label: label.into(),
            new_context: false,
        }
    }

    pub fn new_context(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            label: label.into(),
            new_context: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Link(Link),
}

impl Inline {
    pub fn text(value: impl Into<String>) -> Self {
        Inline::Text(value.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageView {
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowcaseEntry {
    pub image: ImageView,
    pub byline: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Content {
    #[default]
    Empty,
    Loader,
    Image(ImageView),
    Error(String),
    Message(Vec<Inline>),
    Gallery(Vec<ShowcaseEntry>),
}

impl Content {
    pub fn message(text: impl Into<String>) -> Self {
        Content::Message(vec![Inline::text(text)])
    }

    /// Plain-text rendering, links shown as `label <href>`.
    pub fn to_plain_text(&self) -> String {
        match self {
            Content::Empty => String::new(),
            Content::Loader => "Loading...".to_string(),
            Content::Image(image) => format!("[{}] {}", image.alt, image.src),
            Content::Error(message) => format!("Error: {message}"),
            Content::Message(parts) => inline_text(parts),
            Content::Gallery(entries) => entries
                .iter()
                .map(|entry| {
                    format!(
                        "[{}] {}\n  {}",
                        entry.image.alt,
                        entry.image.src,
                        inline_text(&entry.byline)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

fn inline_text(parts: &[Inline]) -> String {
    parts
        .iter()
        .map(|part| match part {
            Inline::Text(text) => text.clone(),
            Inline::Link(link) => format!("{} <{}>", link.label, link.href),
        })
        .collect()
}

/// Operations a UI binding must provide. Calls against a region that is not
/// mounted are ignored.
pub trait RenderSurface: Send + Sync {
    fn has_region(&self, region: Region) -> bool;
    fn set_visible(&self, region: Region, visible: bool);
    fn set_content(&self, region: Region, content: Content);
    fn set_enabled(&self, control: Control, enabled: bool);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOp {
    Visible(Region, bool),
    Content(Region, Content),
    Enabled(Control, bool),
}

#[derive(Debug, Default)]
struct MemorySurfaceState {
    content: HashMap<Region, Content>,
    visible: HashMap<Region, bool>,
    enabled: HashMap<Control, bool>,
    ops: Vec<SurfaceOp>,
}

/// Surface kept in memory: current projection plus an ordered log of every
/// applied operation.
#[derive(Debug)]
pub struct MemorySurface {
    regions: HashSet<Region>,
    state: Mutex<MemorySurfaceState>,
}

impl MemorySurface {
    pub fn new(regions: impl IntoIterator<Item = Region>) -> Self {
        Self {
            regions: regions.into_iter().collect(),
            state: Mutex::new(MemorySurfaceState::default()),
        }
    }

    pub fn with_all_regions() -> Self {
        Self::new(Region::ALL)
    }

    pub fn content(&self, region: Region) -> Content {
        lock(&self.state)
            .content
            .get(&region)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_visible(&self, region: Region) -> bool {
        lock(&self.state)
            .visible
            .get(&region)
            .copied()
            .unwrap_or_else(|| region.initially_visible())
    }

    pub fn is_enabled(&self, control: Control) -> bool {
        lock(&self.state)
            .enabled
            .get(&control)
            .copied()
            .unwrap_or(true)
    }

    pub fn ops(&self) -> Vec<SurfaceOp> {
        lock(&self.state).ops.clone()
    }

    /// Operations applied to one region, in order.
    pub fn region_ops(&self, region: Region) -> Vec<SurfaceOp> {
        lock(&self.state)
            .ops
            .iter()
            .filter(|op| match op {
                SurfaceOp::Visible(r, _) | SurfaceOp::Content(r, _) => *r == region,
                SurfaceOp::Enabled(..) => false,
            })
            .cloned()
            .collect()
    }

    fn record(&self, region: Option<Region>, op: SurfaceOp) -> bool {
        if let Some(region) = region {
            if !self.regions.contains(&region) {
                trace!(?region, "ignoring op on unmounted region");
                return false;
            }
        }
        let mut state = lock(&self.state);
        match &op {
            SurfaceOp::Visible(region, visible) => {
                state.visible.insert(*region, *visible);
            }
            SurfaceOp::Content(region, content) => {
                state.content.insert(*region, content.clone());
            }
            SurfaceOp::Enabled(control, enabled) => {
                state.enabled.insert(*control, *enabled);
            }
        }
        state.ops.push(op);
        true
    }
}

impl RenderSurface for MemorySurface {
    fn has_region(&self, region: Region) -> bool {
        self.regions.contains(&region)
    }

    fn set_visible(&self, region: Region, visible: bool) {
        self.record(Some(region), SurfaceOp::Visible(region, visible));
    }

    fn set_content(&self, region: Region, content: Content) {
        self.record(Some(region), SurfaceOp::Content(region, content));
    }

    fn set_enabled(&self, control: Control, enabled: bool) {
        self.record(None, SurfaceOp::Enabled(control, enabled));
    }
}
