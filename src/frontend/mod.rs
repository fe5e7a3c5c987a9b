mod console;
mod dom;
mod nodding;
mod responsive;
mod video;

use crate::config::{PreviewConfig, CONFIG_ELEMENT_ID};
use crate::error::PreviewError;
use tracing::{debug, warn};
use web_sys::Event;

pub fn run() {
    console_error_panic_hook::set_once();

    let (config, config_error) = match read_config() {
        Ok(config) => (config, None),
        Err(error) => (PreviewConfig::default(), Some(error)),
    };
    console::init(config.max_level());
    if let Some(error) = config_error {
        warn!(%error, "falling back to default preview config");
    }

    if let Err(error) = when_ready(move || start(config)) {
        warn!(%error, "preview overlays not started");
    }
}

fn read_config() -> Result<PreviewConfig, PreviewError> {
    let Some(element) = dom::document()?.get_element_by_id(CONFIG_ELEMENT_ID) else {
        return Ok(PreviewConfig::default());
    };

    PreviewConfig::from_json(&element.text_content().unwrap_or_default())
}

fn when_ready(start: impl FnOnce() + 'static) -> Result<(), PreviewError> {
    let document = dom::document()?;
    if document.ready_state() != "loading" {
        start();
        return Ok(());
    }

    let mut start = Some(start);
    dom::listen_with_options(
        &document,
        "DOMContentLoaded",
        &dom::once_options(),
        move |_: Event| {
            if let Some(start) = start.take() {
                start();
            }
        },
    )
}

fn start(config: PreviewConfig) {
    let environment = dom::environment();
    debug!(
        viewport_width = environment.viewport_width,
        touch_capable = environment.touch_capable,
        animation_duration_ms = config.animation_duration_ms,
        "starting preview overlays"
    );

    if let Err(error) = video::install(&config.video, environment) {
        warn!(%error, "video previews disabled");
    }

    if let Err(error) = responsive::install(&config.responsive, environment) {
        warn!(%error, "responsive previews disabled");
    }

    nodding::install(config.nodding);
}
