use crate::error::PreviewError;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

pub const CONFIG_ELEMENT_ID: &str = "preview-config";

const DEFAULT_LOG_LEVEL: Level = Level::INFO;
const DEFAULT_ANIMATION_DURATION_MS: u64 = 200;
const DEFAULT_MOBILE_BREAKPOINT_PX: f64 = 820.0;
const DEFAULT_NOD_DURATION_MS: u64 = 300;
const DEFAULT_RETURN_DURATION_MS: u64 = 600;
const DEFAULT_SCENE_URL: &str = "https://prod.spline.design/FaL6Mf-9kilRQg91/scene.splinecode";

const ANIMATION_DURATION_MS_BOUNDS: (u64, u64) = (0, 5_000);
const MOBILE_BREAKPOINT_PX_BOUNDS: (f64, f64) = (200.0, 4_000.0);
const TRANSITION_DURATION_MS_BOUNDS: (u64, u64) = (50, 5_000);

/// Page-level settings, embedded as JSON in `<script id="preview-config">`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreviewConfig {
    pub log_level: String,
    /// CSS owns the fade timing; kept so pages can document it alongside the rest.
    pub animation_duration_ms: u64,
    pub video: VideoConfig,
    pub responsive: ResponsiveConfig,
    pub nodding: NoddingConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct VideoConfig {
    pub attribute: String,
    pub container_id: String,
    pub video_id: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResponsiveConfig {
    pub attribute: String,
    pub desktop_overlay_id: String,
    pub mobile_overlay_id: String,
    pub close_class: String,
    pub mobile_breakpoint_px: f64,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoddingConfig {
    pub canvas_id: String,
    pub scene_url: String,
    pub bone_name: String,
    pub link_selector: String,
    pub event_name: String,
    pub nod_state: String,
    pub base_state: String,
    pub easing: String,
    pub nod_duration_ms: u64,
    pub return_duration_ms: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            animation_duration_ms: DEFAULT_ANIMATION_DURATION_MS,
            video: VideoConfig::default(),
            responsive: ResponsiveConfig::default(),
            nodding: NoddingConfig::default(),
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            attribute: "data-video".to_string(),
            container_id: "video-preview-container".to_string(),
            video_id: "video-preview".to_string(),
        }
    }
}

impl Default for ResponsiveConfig {
    fn default() -> Self {
        Self {
            attribute: "data-responsive-preview".to_string(),
            desktop_overlay_id: "responsive-preview-overlay".to_string(),
            mobile_overlay_id: "responsive-preview-overlay-mobile".to_string(),
            close_class: "responsive-preview-close-mobile".to_string(),
            mobile_breakpoint_px: DEFAULT_MOBILE_BREAKPOINT_PX,
        }
    }
}

impl Default for NoddingConfig {
    fn default() -> Self {
        Self {
            canvas_id: "spline-canvas".to_string(),
            scene_url: DEFAULT_SCENE_URL.to_string(),
            bone_name: "Bone001".to_string(),
            link_selector: ".gradient-link.large".to_string(),
            event_name: "mouseDown".to_string(),
            nod_state: "Nod".to_string(),
            base_state: "Base State".to_string(),
            easing: "easeInOut".to_string(),
            nod_duration_ms: DEFAULT_NOD_DURATION_MS,
            return_duration_ms: DEFAULT_RETURN_DURATION_MS,
        }
    }
}

impl PreviewConfig {
    /// Parses the embedded JSON. Out-of-range numbers fall back to their defaults.
    pub fn from_json(raw: &str) -> Result<Self, PreviewError> {
        let parsed: Self = serde_json::from_str(raw)?;
        Ok(parsed.within_bounds())
    }

    pub fn max_level(&self) -> Level {
        Level::from_str(self.log_level.trim()).unwrap_or(DEFAULT_LOG_LEVEL)
    }

    fn within_bounds(mut self) -> Self {
        self.animation_duration_ms = within_bounds(
            self.animation_duration_ms,
            DEFAULT_ANIMATION_DURATION_MS,
            ANIMATION_DURATION_MS_BOUNDS,
        );
        self.responsive.mobile_breakpoint_px = within_bounds(
            self.responsive.mobile_breakpoint_px,
            DEFAULT_MOBILE_BREAKPOINT_PX,
            MOBILE_BREAKPOINT_PX_BOUNDS,
        );
        self.nodding.nod_duration_ms = within_bounds(
            self.nodding.nod_duration_ms,
            DEFAULT_NOD_DURATION_MS,
            TRANSITION_DURATION_MS_BOUNDS,
        );
        self.nodding.return_duration_ms = within_bounds(
            self.nodding.return_duration_ms,
            DEFAULT_RETURN_DURATION_MS,
            TRANSITION_DURATION_MS_BOUNDS,
        );
        self
    }
}

impl NoddingConfig {
    pub fn nod_duration(&self) -> Duration {
        Duration::from_millis(self.nod_duration_ms)
    }

    pub fn return_duration(&self) -> Duration {
        Duration::from_millis(self.return_duration_ms)
    }
}

fn within_bounds<T: PartialOrd>(value: T, default: T, bounds: (T, T)) -> T {
    if value >= bounds.0 && value <= bounds.1 {
        value
    } else {
        default
    }
}
