//! Render surface that echoes every projection change to stdout.

use page_controller::{Content, Control, MemorySurface, Region, RenderSurface};

pub struct TerminalSurface {
    inner: MemorySurface,
}

impl TerminalSurface {
    pub fn new(regions: impl IntoIterator<Item = Region>) -> Self {
        Self {
            inner: MemorySurface::new(regions),
        }
    }

    pub fn memory(&self) -> &MemorySurface {
        &self.inner
    }
}

impl RenderSurface for TerminalSurface {
    fn has_region(&self, region: Region) -> bool {
        self.inner.has_region(region)
    }

    fn set_visible(&self, region: Region, visible: bool) {
        if self.inner.has_region(region) {
            println!("[{region:?}] {}", if visible { "shown" } else { "hidden" });
        }
        self.inner.set_visible(region, visible);
    }

    fn set_content(&self, region: Region, content: Content) {
        if self.inner.has_region(region) {
            println!("[{region:?}] {}", content.to_plain_text());
        }
        self.inner.set_content(region, content);
    }

    fn set_enabled(&self, control: Control, enabled: bool) {
        println!("[{control:?}] {}", if enabled { "enabled" } else { "disabled" });
        self.inner.set_enabled(control, enabled);
    }
}
