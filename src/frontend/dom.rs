use crate::device::Environment;
use crate::error::PreviewError;
use crate::overlay::{Overlay, TapTarget, Trigger, ACTIVE_CLASS};
use js_sys::Reflect;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, AddEventListenerOptions, Document, Element, Event, EventTarget, Window};

const FALLBACK_VIEWPORT_WIDTH: f64 = 1280.0;

pub fn browser_window() -> Result<Window, PreviewError> {
    window().ok_or_else(|| PreviewError::Dom("no global window".to_string()))
}

pub fn document() -> Result<Document, PreviewError> {
    browser_window()?
        .document()
        .ok_or_else(|| PreviewError::Dom("window has no document".to_string()))
}

pub fn environment() -> Environment {
    let Some(win) = window() else {
        return Environment {
            viewport_width: FALLBACK_VIEWPORT_WIDTH,
            touch_capable: false,
        };
    };

    let viewport_width = win
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(FALLBACK_VIEWPORT_WIDTH);
    let has_touch_handler =
        Reflect::has(&win, &JsValue::from_str("ontouchstart")).unwrap_or(false);
    let touch_points = win.navigator().max_touch_points();

    Environment {
        viewport_width,
        touch_capable: has_touch_handler || touch_points > 0,
    }
}

/// Every element matching `selector`, skipping non-element nodes.
pub fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, PreviewError> {
    let nodes = document.query_selector_all(selector)?;

    Ok((0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// Attaches a listener for the lifetime of the page.
pub fn listen<E, F>(target: &EventTarget, event: &str, handler: F) -> Result<(), PreviewError>
where
    E: FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let callback = Closure::<dyn FnMut(E)>::new(handler);
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

pub fn listen_with_options<E, F>(
    target: &EventTarget,
    event: &str,
    options: &AddEventListenerOptions,
    handler: F,
) -> Result<(), PreviewError>
where
    E: FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let callback = Closure::<dyn FnMut(E)>::new(handler);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        callback.as_ref().unchecked_ref(),
        options,
    )?;
    callback.forget();
    Ok(())
}

pub fn capture_options() -> AddEventListenerOptions {
    let options = AddEventListenerOptions::new();
    options.set_capture(true);
    options
}

pub fn non_passive_options() -> AddEventListenerOptions {
    let options = AddEventListenerOptions::new();
    options.set_passive(false);
    options
}

pub fn once_options() -> AddEventListenerOptions {
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    options
}

/// Stops a trigger tap from following its link or reaching outer handlers.
pub fn swallow(event: &Event) {
    event.prevent_default();
    event.stop_propagation();
}

/// Classifies a document-level tap against one overlay and its triggers.
pub fn classify_tap(
    event: &Event,
    overlay: Option<&Element>,
    trigger_selector: &str,
    close_class: Option<&str>,
) -> TapTarget {
    let Some(target) = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
    else {
        return TapTarget::default();
    };

    TapTarget {
        inside_overlay: overlay.is_some_and(|overlay| overlay.contains(Some(target.as_ref()))),
        on_trigger: matches!(target.closest(trigger_selector), Ok(Some(_))),
        on_close_control: close_class.is_some_and(|class| target.class_list().contains(class)),
    }
}

pub fn attribute_selector(attribute: &str) -> String {
    format!("[{attribute}]")
}

/// An overlay element whose visibility is the `active` class plus `aria-hidden`.
#[derive(Clone)]
pub struct ClassOverlay {
    element: Element,
}

impl ClassOverlay {
    pub fn new(element: Element) -> Self {
        Self { element }
    }
}

impl Overlay for ClassOverlay {
    fn show(&self) {
        let _ = self.element.class_list().add_1(ACTIVE_CLASS);
        let _ = self.element.set_attribute("aria-hidden", "false");
    }

    fn hide(&self) {
        let _ = self.element.class_list().remove_1(ACTIVE_CLASS);
        let _ = self.element.set_attribute("aria-hidden", "true");
    }

    fn is_active(&self) -> bool {
        self.element.class_list().contains(ACTIVE_CLASS)
    }
}

impl Trigger for Element {
    fn marker(&self, attribute: &str) -> Option<String> {
        self.get_attribute(attribute)
    }
}
