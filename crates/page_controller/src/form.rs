use std::sync::Mutex;

use shared::{
    domain::{CanvasParams, Limit, TimeRange, TopItemType},
    error::DomainError,
};

use crate::controller::lock;

/// Raw values of the generation form, as a user would have entered them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub item_type: String,
    pub time_range: String,
    pub limit: String,
    pub share_anonymously: bool,
}

impl Default for FormValues {
    fn default() -> Self {
        Self::from_params(CanvasParams::default(), false)
    }
}

impl FormValues {
    pub fn from_params(params: CanvasParams, share_anonymously: bool) -> Self {
        Self {
            item_type: params.item_type.to_string(),
            time_range: params.time_range.to_string(),
            limit: params.limit.to_string(),
            share_anonymously,
        }
    }

    pub fn params(&self) -> Result<CanvasParams, DomainError> {
        CanvasParams::from_form(&self.item_type, &self.time_range, &self.limit)
    }
}

/// The live generation form. Each read is a snapshot; later edits never
/// reach a request that already took one.
#[derive(Debug, Default)]
pub struct CanvasForm {
    values: Mutex<FormValues>,
}

impl CanvasForm {
    pub fn new(values: FormValues) -> Self {
        Self {
            values: Mutex::new(values),
        }
    }

    pub fn snapshot(&self) -> FormValues {
        lock(&self.values).clone()
    }

    pub fn set_item_type(&self, item_type: TopItemType) {
        lock(&self.values).item_type = item_type.to_string();
    }

    pub fn set_time_range(&self, time_range: TimeRange) {
        lock(&self.values).time_range = time_range.to_string();
    }

    pub fn set_limit(&self, limit: Limit) {
        lock(&self.values).limit = limit.to_string();
    }

    /// Sets the limit field verbatim, as typed.
    pub fn set_limit_raw(&self, limit: impl Into<String>) {
        lock(&self.values).limit = limit.into();
    }

    pub fn set_share_anonymously(&self, share_anonymously: bool) {
        lock(&self.values).share_anonymously = share_anonymously;
    }

    pub fn replace(&self, values: FormValues) {
        *lock(&self.values) = values;
    }
}
