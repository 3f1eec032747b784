use std::{collections::HashMap, fs, path::Path};

use anyhow::{bail, Context};
use chrono::FixedOffset;
use page_controller::{TimestampFormat, DEFAULT_GALLERY_ROUTE};
use tracing::warn;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub gallery_route: String,
    pub utc_offset_minutes: Option<i32>,
    pub session_cookie: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            gallery_route: DEFAULT_GALLERY_ROUTE.into(),
            utc_offset_minutes: None,
            session_cookie: None,
        }
    }
}

impl Settings {
    /// Host-local offset unless one is configured.
    pub fn timestamp_format(&self) -> TimestampFormat {
        self.utc_offset_minutes
            .and_then(|minutes| minutes.checked_mul(60))
            .and_then(FixedOffset::east_opt)
            .map(TimestampFormat::new)
            .unwrap_or_else(TimestampFormat::local)
    }

    /// Origin of the server URL, e.g. `http://127.0.0.1:8000`.
    pub fn origin(&self) -> anyhow::Result<String> {
        let url = Url::parse(&self.server_url)
            .with_context(|| format!("invalid server url '{}'", self.server_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("server url '{}' must use http or https", self.server_url);
        }
        Ok(url.origin().ascii_serialization())
    }
}

/// File settings with process environment overrides on top.
pub fn load_settings(config_path: &Path) -> Settings {
    let mut settings = read_settings_file(config_path);
    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

/// Defaults overlaid with the config file, if it exists and parses.
fn read_settings_file(config_path: &Path) -> Settings {
    let mut settings = Settings::default();
    if let Ok(raw) = fs::read_to_string(config_path) {
        apply_file(&mut settings, &raw);
    }
    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
        warn!("ignoring unreadable config file");
        return;
    };
    if let Some(v) = file_cfg.get("server_url") {
        settings.server_url = v.clone();
    }
    if let Some(v) = file_cfg.get("gallery_route") {
        settings.gallery_route = v.clone();
    }
    if let Some(v) = file_cfg.get("utc_offset_minutes") {
        set_offset(settings, v);
    }
    if let Some(v) = file_cfg.get("session_cookie") {
        settings.session_cookie = Some(v.clone());
    }
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("CANVAS_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("APP__GALLERY_ROUTE") {
        settings.gallery_route = v;
    }

    if let Some(v) = lookup("APP__UTC_OFFSET_MINUTES") {
        set_offset(settings, &v);
    }

    if let Some(v) = lookup("APP__SESSION_COOKIE") {
        settings.session_cookie = Some(v);
    }
}

fn set_offset(settings: &mut Settings, raw: &str) {
    match raw.trim().parse::<i32>() {
        Ok(minutes)
            if minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .is_some() =>
        {
            settings.utc_offset_minutes = Some(minutes);
        }
        _ => warn!(value = raw, "ignoring invalid utc offset"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
