use super::dom::{self, ClassOverlay};
use crate::config::ResponsiveConfig;
use crate::device::{DeviceClass, Environment, InteractionMode};
use crate::error::PreviewError;
use crate::responsive_preview::ResponsivePreviewController;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info};
use web_sys::{Element, Event};

type ResponsiveController = ResponsivePreviewController<Element, ClassOverlay>;

pub fn install(config: &ResponsiveConfig, environment: Environment) -> Result<(), PreviewError> {
    let document = dom::document()?;
    let desktop = document.get_element_by_id(&config.desktop_overlay_id);
    let mobile = document.get_element_by_id(&config.mobile_overlay_id);
    let controller = Rc::new(RefCell::new(ResponsiveController::new(
        config.attribute.clone(),
        desktop.clone().map(ClassOverlay::new),
        mobile.clone().map(ClassOverlay::new),
    )?));

    let breakpoint = config.mobile_breakpoint_px;
    let device_now = move || dom::environment().device_class(breakpoint);

    let selector = dom::attribute_selector(&config.attribute);
    let triggers = dom::query_all(&document, &selector)?;
    let mode = environment.device_class(breakpoint).interaction_mode();
    for trigger in &triggers {
        attach(&controller, trigger, mode, device_now)?;
    }

    let close_selector = format!(".{}", config.close_class);
    if let Some(close) = mobile
        .as_ref()
        .map(|mobile| mobile.query_selector(&close_selector))
        .transpose()?
        .flatten()
    {
        let controller = Rc::clone(&controller);
        dom::listen(&close, "click", move |event: Event| {
            dom::swallow(&event);
            controller.borrow_mut().close();
        })?;
    } else {
        debug!(selector = %close_selector, "mobile overlay has no close control");
    }

    if environment.touch_capable {
        let controller = Rc::clone(&controller);
        let close_class = config.close_class.clone();
        dom::listen_with_options(
            &document,
            "click",
            &dom::capture_options(),
            move |event: Event| {
                let device = device_now();
                let overlay = match device {
                    DeviceClass::Desktop => desktop.as_ref(),
                    DeviceClass::Mobile => mobile.as_ref(),
                };
                let target =
                    dom::classify_tap(&event, overlay, &selector, Some(close_class.as_str()));
                controller.borrow_mut().document_tap(target, device);
            },
        )?;
    }

    info!(
        triggers = triggers.len(),
        ?mode,
        device = environment.device_class(breakpoint).as_str(),
        "responsive previews ready"
    );
    Ok(())
}

fn attach(
    controller: &Rc<RefCell<ResponsiveController>>,
    trigger: &Element,
    mode: InteractionMode,
    device_now: impl Fn() -> DeviceClass + Copy + 'static,
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
                    controller.borrow_mut().tap(&element, device_now());
                },
            )
        }
        InteractionMode::Hover => {
            {
                let controller = Rc::clone(controller);
                let element = trigger.clone();
                dom::listen(trigger, "mouseenter", move |_: Event| {
                    controller.borrow_mut().hover_enter(&element, device_now());
                })?;
            }
            let controller = Rc::clone(controller);
            dom::listen(trigger, "mouseleave", move |_: Event| {
                controller.borrow_mut().hover_leave();
            })
        }
    }
}
