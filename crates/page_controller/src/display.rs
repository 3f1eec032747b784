//! Revocable display handles for in-memory artifacts, addressed by
//! `blob:` URLs.

use std::{collections::HashMap, sync::Arc, sync::Mutex};

use tracing::debug;
use uuid::Uuid;

use crate::controller::lock;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayHandle {
    url: String,
}

impl DisplayHandle {
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBlob {
    pub bytes: Arc<[u8]>,
    pub mime_type: &'static str,
}

#[derive(Debug)]
pub struct DisplayHandles {
    origin: String,
    live: Mutex<HashMap<String, DisplayBlob>>,
}

impl DisplayHandles {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into().trim_end_matches('/').to_string(),
            live: Mutex::new(HashMap::new()),
        }
    }

    pub fn create(&self, bytes: Vec<u8>, mime_type: &'static str) -> DisplayHandle {
        let url = format!("blob:{}/{}", self.origin, Uuid::new_v4());
        let blob = DisplayBlob {
            bytes: bytes.into(),
            mime_type,
        };
        lock(&self.live).insert(url.clone(), blob);
        debug!(%url, "created display handle");
        DisplayHandle { url }
    }

    pub fn resolve(&self, url: &str) -> Option<DisplayBlob> {
        lock(&self.live).get(url).cloned()
    }

    /// Returns whether the handle was still live.
    pub fn revoke(&self, handle: &DisplayHandle) -> bool {
        let removed = lock(&self.live).remove(&handle.url).is_some();
        if removed {
            debug!(url = %handle.url, "revoked display handle");
        }
        removed
    }

    pub fn revoke_all(&self) -> usize {
        let mut live = lock(&self.live);
        let count = live.len();
        live.clear();
        count
    }

    pub fn live_count(&self) -> usize {
        lock(&self.live).len()
    }
}
