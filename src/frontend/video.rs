use super::dom::{self, ClassOverlay};
use crate::config::VideoConfig;
use crate::device::{Environment, InteractionMode};
use crate::error::PreviewError;
use crate::hover_video::{HoverVideoController, MediaElement};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Element, Event, HtmlElement, HtmlVideoElement};

const CONTAINER_CLASS: &str = "video-preview-container";
const VIDEO_CLASS: &str = "video-preview";
const FALLBACK_TEXT: &str = "Your browser does not support the video tag.";
const HAVE_CURRENT_DATA: u16 = 2;

type VideoController = HoverVideoController<Element, ClassOverlay, PreviewVideo>;

#[derive(Clone)]
struct PreviewVideo {
    element: HtmlVideoElement,
}

impl MediaElement for PreviewVideo {
    fn source(&self) -> Option<String> {
        self.element
            .get_attribute("src")
            .filter(|value| !value.is_empty())
    }

    fn set_source(&self, source: &str) {
        self.element.set_src(source);
    }

    fn clear_source(&self) {
        self.element.set_src("");
    }

    fn load(&self) {
        self.element.load();
    }

    fn pause(&self) {
        if let Err(error) = self.element.pause() {
            warn!(?error, "failed to pause video preview");
        }
    }

    fn rewind(&self) {
        self.element.set_current_time(0.0);
    }

    fn play(&self) {
        let promise = match self.element.play() {
            Ok(promise) => promise,
            Err(error) => {
                warn!(?error, "video autoplay failed");
                return;
            }
        };

        spawn_local(async move {
            if let Err(error) = JsFuture::from(promise).await {
                warn!(?error, "video autoplay failed");
            }
        });
    }

    fn is_ready(&self) -> bool {
        self.element.ready_state() >= HAVE_CURRENT_DATA
    }
}

pub fn install(config: &VideoConfig, environment: Environment) -> Result<(), PreviewError> {
    let document = dom::document()?;
    let (container, video) = preview_elements(&document, config)?;
    let controller = Rc::new(RefCell::new(VideoController::new(
        config.attribute.clone(),
        ClassOverlay::new(container.clone()),
        PreviewVideo {
            element: video.clone(),
        },
    )));

    {
        let controller = Rc::clone(&controller);
        dom::listen(&video, "loadeddata", move |_: Event| {
            controller.borrow_mut().data_loaded();
        })?;
    }
    {
        let controller = Rc::clone(&controller);
        dom::listen(&video, "error", move |_: Event| {
            controller.borrow_mut().load_failed();
        })?;
    }

    let selector = dom::attribute_selector(&config.attribute);
    let triggers = dom::query_all(&document, &selector)?;
    let mode = environment.touch_mode();
    for trigger in &triggers {
        attach(&controller, trigger, mode)?;
    }

    if mode == InteractionMode::Tap {
        let controller = Rc::clone(&controller);
        let container = container.clone();
        dom::listen_with_options(
            &document,
            "click",
            &dom::capture_options(),
            move |event: Event| {
                let target = dom::classify_tap(&event, Some(&container), &selector, None);
                controller.borrow_mut().document_tap(target);
            },
        )?;
    }

    {
        let controller = Rc::clone(&controller);
        dom::listen(&dom::browser_window()?, "beforeunload", move |_: Event| {
            controller.borrow_mut().teardown();
        })?;
    }

    info!(triggers = triggers.len(), ?mode, "video previews ready");
    Ok(())
}

fn attach(
    controller: &Rc<RefCell<VideoController>>,
    trigger: &Element,
    mode: InteractionMode,
) -> Result<(), PreviewError> {
    match mode {
        InteractionMode::Tap => {
            let controller = Rc::clone(controller);
            let element = trigger.clone();
            dom::listen_with_options(
                trigger,
                "click",
                &dom::non_passive_options(),
                move |event: Event| {
                    dom::swallow(&event);
                    controller.borrow_mut().tap(&element);
                },
            )
        }
        InteractionMode::Hover => {
            {
                let controller = Rc::clone(controller);
                let element = trigger.clone();
                dom::listen(trigger, "mouseenter", move |_: Event| {
                    controller.borrow_mut().hover_enter(&element);
                })?;
            }
            let controller = Rc::clone(controller);
            dom::listen(trigger, "mouseleave", move |_: Event| {
                controller.borrow_mut().hover_leave();
            })
        }
    }
}

/// Reuses the page's preview markup, or builds it when the page has none.
fn preview_elements(
    document: &Document,
    config: &VideoConfig,
) -> Result<(Element, HtmlVideoElement), PreviewError> {
    if let Some(container) = document.get_element_by_id(&config.container_id) {
        let video = document
            .get_element_by_id(&config.video_id)
            .ok_or_else(|| PreviewError::MissingElement(format!("#{}", config.video_id)))?
            .dyn_into::<HtmlVideoElement>()
            .map_err(|_| PreviewError::Dom(format!("#{} is not a <video>", config.video_id)))?;
        return Ok((container, video));
    }

    let container = document.create_element("div")?;
    container.set_id(&config.container_id);
    container.set_class_name(CONTAINER_CLASS);
    container.set_attribute("aria-hidden", "true")?;

    let video = document
        .create_element("video")?
        .dyn_into::<HtmlVideoElement>()
        .map_err(|_| PreviewError::Dom("failed to create <video>".to_string()))?;
    video.set_id(&config.video_id);
    video.set_class_name(VIDEO_CLASS);
    video.set_muted(true);
    video.set_loop(true);
    video.set_attribute("playsinline", "")?;
    video.set_preload("metadata");
    video.set_text_content(Some(FALLBACK_TEXT));

    container.append_child(&video)?;
    let body: HtmlElement = document
        .body()
        .ok_or_else(|| PreviewError::MissingElement("body".to_string()))?;
    body.append_child(&container)?;

    Ok((container, video))
}
