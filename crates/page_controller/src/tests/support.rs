//! Scripted `CanvasApi` for controller tests.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use client_core::{CanvasApi, CanvasImage, ClientError, ClientResult};
use shared::{
    domain::{AuthState, CanvasParams, Limit, ShowcaseItem, TimeRange, TopItemType},
    protocol::{HealthCheck, ShareAck, ShareRequest},
};
use tokio::sync::oneshot;

pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";
pub const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0\0\x10JFIF\0";

pub enum Reply<T> {
    Ready(ClientResult<T>),
    /// Resolves only once the paired sender fires (or is dropped).
    Gated(oneshot::Receiver<()>, ClientResult<T>),
}

impl<T> Reply<T> {
    pub fn gated(result: ClientResult<T>) -> (oneshot::Sender<()>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Reply::Gated(rx, result))
    }

    async fn resolve(self) -> ClientResult<T> {
        match self {
            Reply::Ready(result) => result,
            Reply::Gated(rx, result) => {
                let _ = rx.await;
                result
            }
        }
    }
}

#[derive(Default)]
pub struct FakeCanvasApi {
    auth: Mutex<VecDeque<Reply<AuthState>>>,
    canvas: Mutex<VecDeque<Reply<CanvasImage>>>,
    share: Mutex<VecDeque<Reply<ShareAck>>>,
    showcase: Mutex<VecDeque<Reply<Vec<ShowcaseItem>>>>,
    pub auth_calls: Mutex<usize>,
    pub canvas_calls: Mutex<Vec<CanvasParams>>,
    pub share_calls: Mutex<Vec<ShareRequest>>,
    pub showcase_calls: Mutex<usize>,
}

impl FakeCanvasApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_auth(&self, reply: Reply<AuthState>) {
        self.auth.lock().unwrap().push_back(reply);
    }

    pub fn push_canvas(&self, reply: Reply<CanvasImage>) {
        self.canvas.lock().unwrap().push_back(reply);
    }

    pub fn push_share(&self, reply: Reply<ShareAck>) {
        self.share.lock().unwrap().push_back(reply);
    }

    pub fn push_showcase(&self, reply: Reply<Vec<ShowcaseItem>>) {
        self.showcase.lock().unwrap().push_back(reply);
    }

    pub fn canvas_calls(&self) -> Vec<CanvasParams> {
        self.canvas_calls.lock().unwrap().clone()
    }

    pub fn share_calls(&self) -> Vec<ShareRequest> {
        self.share_calls.lock().unwrap().clone()
    }

    pub fn showcase_call_count(&self) -> usize {
        *self.showcase_calls.lock().unwrap()
    }

    pub fn auth_call_count(&self) -> usize {
        *self.auth_calls.lock().unwrap()
    }
}

fn unscripted<T>(endpoint: &'static str) -> Reply<T> {
    Reply::Ready(Err(ClientError::Status {
        endpoint,
        status: 503,
    }))
}

#[async_trait]
impl CanvasApi for FakeCanvasApi {
    async fn auth_status(&self) -> ClientResult<AuthState> {
        *self.auth_calls.lock().unwrap() += 1;
        let reply = self.auth.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| unscripted("/auth-status")).resolve().await
    }

    async fn top_canvas(&self, params: CanvasParams) -> ClientResult<CanvasImage> {
        self.canvas_calls.lock().unwrap().push(params);
        let reply = self.canvas.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| unscripted("/top-canvas")).resolve().await
    }

    async fn share_to_showcase(&self, request: ShareRequest) -> ClientResult<ShareAck> {
        self.share_calls.lock().unwrap().push(request);
        let reply = self.share.lock().unwrap().pop_front();
        reply
            .unwrap_or_else(|| unscripted("/share-to-showcase"))
            .resolve()
            .await
    }

    async fn showcase_items(&self) -> ClientResult<Vec<ShowcaseItem>> {
        *self.showcase_calls.lock().unwrap() += 1;
        let reply = self.showcase.lock().unwrap().pop_front();
        reply
            .unwrap_or_else(|| unscripted("/showcase-items"))
            .resolve()
            .await
    }

    async fn healthcheck(&self) -> ClientResult<HealthCheck> {
        Ok(HealthCheck {
            status: "healthy".into(),
            version: "test".into(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        })
    }
}

pub fn png() -> ClientResult<CanvasImage> {
    CanvasImage::from_bytes(PNG_BYTES.to_vec())
}

pub fn jpeg() -> ClientResult<CanvasImage> {
    CanvasImage::from_bytes(JPEG_BYTES.to_vec())
}

pub fn server_error(endpoint: &'static str) -> ClientError {
    ClientError::Status {
        endpoint,
        status: 500,
    }
}

pub fn artists_short_term() -> CanvasParams {
    CanvasParams::new(
        TopItemType::Artists,
        TimeRange::ShortTerm,
        Limit::new(10).unwrap(),
    )
}

pub fn showcase_item(
    image_filename: &str,
    creator_name: &str,
    creator_spotify_id: Option<&str>,
) -> ShowcaseItem {
    ShowcaseItem {
        image_filename: image_filename.to_string(),
        creator_name: creator_name.to_string(),
        creator_spotify_id: creator_spotify_id.map(str::to_string),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 34, 56).unwrap(),
    }
}
