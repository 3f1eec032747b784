//! Flow error modeling: every failure collapses to one user-facing message
//! per flow, with a category kept for logging.

use client_core::ClientError;
use shared::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowKind {
    AuthBadge,
    Generation,
    Share,
    Gallery,
}

impl FlowKind {
    pub fn name(self) -> &'static str {
        match self {
            FlowKind::AuthBadge => "auth_badge",
            FlowKind::Generation => "generation",
            FlowKind::Share => "share",
            FlowKind::Gallery => "gallery",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            FlowKind::AuthBadge => "Could not determine login status.",
            FlowKind::Generation => "Failed to generate canvas. Please try again.",
            FlowKind::Share => "Failed to share. Please try again.",
            FlowKind::Gallery => "Failed to load showcase items.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowErrorCategory {
    Transport,
    Status,
    Payload,
    Validation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowError {
    flow: FlowKind,
    category: FlowErrorCategory,
    detail: String,
}

impl FlowError {
    pub fn from_client(flow: FlowKind, err: &ClientError) -> Self {
        let category = match err {
            ClientError::Config(_) | ClientError::Transport { .. } => FlowErrorCategory::Transport,
            ClientError::Status { .. } => FlowErrorCategory::Status,
            ClientError::Payload { .. } => FlowErrorCategory::Payload,
        };
        Self {
            flow,
            category,
            detail: err.to_string(),
        }
    }

    pub fn validation(flow: FlowKind, err: &DomainError) -> Self {
        Self {
            flow,
            category: FlowErrorCategory::Validation,
            detail: err.to_string(),
        }
    }

    /// What the user sees. Only locally detected validation problems carry
    /// their own text; everything from the network uses the flow's message.
    pub fn user_message(&self) -> String {
        match self.category {
            FlowErrorCategory::Validation => format!("Invalid canvas options: {}", self.detail),
            _ => self.flow.failure_message().to_string(),
        }
    }

    pub fn flow(&self) -> FlowKind {
        self.flow
    }

    pub fn category(&self) -> FlowErrorCategory {
        self.category
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}
