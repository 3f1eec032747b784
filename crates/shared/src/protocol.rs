use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CanvasParams, Limit, TimeRange, TopItemType};

pub const AUTH_STATUS_PATH: &str = "/auth-status";
pub const TOP_CANVAS_PATH: &str = "/top-canvas";
pub const SHARE_TO_SHOWCASE_PATH: &str = "/share-to-showcase";
pub const SHOWCASE_ITEMS_PATH: &str = "/showcase-items";
pub const HEALTHCHECK_PATH: &str = "/healthcheck";
pub const IMAGES_PATH: &str = "/images";
pub const LOGIN_PATH: &str = "/login";
pub const LOGOUT_PATH: &str = "/logout";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthStatusResponse {
    pub logged_in: bool,
}

/// Query string of `GET /top-canvas`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopCanvasQuery {
    #[serde(rename = "type")]
    pub item_type: TopItemType,
    pub time_range: TimeRange,
    pub limit: Limit,
}

impl From<CanvasParams> for TopCanvasQuery {
    fn from(params: CanvasParams) -> Self {
        Self {
            item_type: params.item_type,
            time_range: params.time_range,
            limit: params.limit,
        }
    }
}

/// Body of `POST /share-to-showcase`. The server re-renders the canvas from
/// these parameters; image bytes are never uploaded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShareRequest {
    #[serde(rename = "type")]
    pub item_type: TopItemType,
    pub time_range: TimeRange,
    pub limit: Limit,
    pub share_anonymously: bool,
}

impl ShareRequest {
    pub fn new(params: CanvasParams, share_anonymously: bool) -> Self {
        Self {
            item_type: params.item_type,
            time_range: params.time_range,
            limit: params.limit,
            share_anonymously,
        }
    }
}

/// Whatever JSON document the server acknowledges a share with. Only its
/// parseability matters; the shape is not inspected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ShareAck(pub serde_json::Value);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthCheck {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

pub fn image_path(image_filename: &str) -> String {
    format!("{IMAGES_PATH}/{image_filename}")
}
