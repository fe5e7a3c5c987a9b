use super::dom;
use crate::config::NoddingConfig;
use crate::error::PreviewError;
use crate::nodding::{
    find_bone, AnimationTarget, NodSettings, NodTimer, NoddingController, Scene, Scheduler,
    Transition,
};
use js_sys::{Array, Promise, JSON};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::{error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Event, HtmlCanvasElement};

#[wasm_bindgen(raw_module = "https://unpkg.com/@splinetool/runtime@latest/build/runtime.js")]
extern "C" {
    type Application;

    #[wasm_bindgen(constructor)]
    fn new(canvas: &HtmlCanvasElement) -> Application;

    #[wasm_bindgen(method)]
    fn load(this: &Application, url: &str) -> Promise;

    #[wasm_bindgen(method, js_name = findObjectByName)]
    fn find_object_by_name(this: &Application, name: &str) -> Option<SplineObject>;

    #[wasm_bindgen(method, catch, js_name = getAllObjects)]
    fn get_all_objects(this: &Application) -> Result<Array, JsValue>;

    type SplineObject;

    #[wasm_bindgen(method, getter)]
    fn name(this: &SplineObject) -> Option<String>;

    #[wasm_bindgen(method, catch, js_name = emitEvent)]
    fn emit_event_with_options(
        this: &SplineObject,
        event: &str,
        options: &JsValue,
    ) -> Result<(), JsValue>;
}

struct SplineScene {
    application: Application,
}

impl Scene for SplineScene {
    type Object = SplineObject;

    fn find_object_by_name(&self, name: &str) -> Option<SplineObject> {
        self.application.find_object_by_name(name)
    }

    fn object_names(&self) -> Vec<String> {
        self.application
            .get_all_objects()
            .map(|objects| {
                objects
                    .iter()
                    .filter_map(|object| object.unchecked_into::<SplineObject>().name())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl AnimationTarget for SplineObject {
    fn emit_event(&self, event: &str, transition: &Transition) {
        let options = match serde_json::to_string(transition)
            .map_err(PreviewError::from)
            .and_then(|json| JSON::parse(&json).map_err(PreviewError::from))
        {
            Ok(options) => options,
            Err(error) => {
                warn!(%error, state = %transition.state, "failed to encode transition");
                return;
            }
        };

        if let Err(error) = self.emit_event_with_options(event, &options) {
            warn!(?error, state = %transition.state, "scene rejected transition");
        }
    }
}

type LinkController = NoddingController<SplineObject, WindowScheduler>;

/// `setTimeout` wrapper that routes fired timers back into the controller.
struct WindowScheduler {
    controller: Weak<RefCell<LinkController>>,
}

/// Clears its timeout when cancelled; the callback lives as long as the handle.
struct PendingTimeout {
    id: i32,
    _callback: Closure<dyn FnMut()>,
}

impl Scheduler for WindowScheduler {
    type Handle = PendingTimeout;

    fn schedule(&self, delay: Duration, timer: NodTimer) -> Result<PendingTimeout, PreviewError> {
        let controller = Weak::clone(&self.controller);
        let callback: Closure<dyn FnMut()> = Closure::once(move || {
            if let Some(controller) = controller.upgrade() {
                controller.borrow_mut().on_timer(timer);
            }
        });

        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let id = dom::browser_window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            millis,
        )?;

        Ok(PendingTimeout {
            id,
            _callback: callback,
        })
    }

    fn cancel(&self, handle: PendingTimeout) {
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(handle.id);
        }
    }
}

/// Loads the scene in the background; failures leave the link inert.
pub fn install(config: NoddingConfig) {
    spawn_local(async move {
        if let Err(error) = start(&config).await {
            error!(%error, "nodding animation disabled");
        }
    });
}

async fn start(config: &NoddingConfig) -> Result<(), PreviewError> {
    let document = dom::document()?;
    let canvas = document
        .get_element_by_id(&config.canvas_id)
        .ok_or_else(|| PreviewError::MissingElement(format!("#{}", config.canvas_id)))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| PreviewError::Dom(format!("#{} is not a <canvas>", config.canvas_id)))?;

    info!(url = %config.scene_url, "loading scene");
    let application = Application::new(&canvas);
    JsFuture::from(application.load(&config.scene_url))
        .await
        .map_err(|error| PreviewError::SceneLoad(format!("{error:?}")))?;
    let scene = SplineScene { application };

    let bone = find_bone(&scene, &config.bone_name)?;
    let link = document
        .query_selector(&config.link_selector)?
        .ok_or_else(|| PreviewError::MissingElement(config.link_selector.clone()))?;

    let settings = NodSettings::from(config);
    let controller: Rc<RefCell<LinkController>> = Rc::new_cyclic(|weak| {
        RefCell::new(NoddingController::new(
            bone,
            WindowScheduler {
                controller: Weak::clone(weak),
            },
            settings,
        ))
    });

    {
        let controller = Rc::clone(&controller);
        dom::listen(&link, "mouseenter", move |_: Event| {
            controller.borrow_mut().hover_enter();
        })?;
    }
    dom::listen(&link, "mouseleave", move |_: Event| {
        controller.borrow_mut().hover_leave();
    })?;

    info!(bone = %config.bone_name, "nodding animation ready");
    Ok(())
}
