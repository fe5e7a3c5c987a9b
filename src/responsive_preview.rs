use crate::device::DeviceClass;
use crate::error::PreviewError;
use crate::overlay::{Overlay, TapTarget, Trigger};
use tracing::debug;

/// Shows the desktop or mobile layout preview, never both.
pub struct ResponsivePreviewController<T, O> {
    attribute: String,
    desktop: Option<O>,
    mobile: Option<O>,
    current_target: Option<T>,
}

impl<T, O> ResponsivePreviewController<T, O>
where
    T: Trigger,
    O: Overlay,
{
    /// Fails when neither overlay variant exists on the page.
    pub fn new(
        attribute: impl Into<String>,
        desktop: Option<O>,
        mobile: Option<O>,
    ) -> Result<Self, PreviewError> {
        if desktop.is_none() && mobile.is_none() {
            return Err(PreviewError::MissingElement(
                "responsive preview overlays".to_string(),
            ));
        }

        Ok(Self {
            attribute: attribute.into(),
            desktop,
            mobile,
            current_target: None,
        })
    }

    pub fn current_target(&self) -> Option<&T> {
        self.current_target.as_ref()
    }

    /// The overlay that is currently showing, if any.
    pub fn visible(&self) -> Option<DeviceClass> {
        let active = |overlay: &Option<O>| overlay.as_ref().is_some_and(|overlay| overlay.is_active());

        if active(&self.mobile) {
            Some(DeviceClass::Mobile)
        } else if active(&self.desktop) {
            Some(DeviceClass::Desktop)
        } else {
            None
        }
    }

    pub fn hover_enter(&mut self, trigger: &T, device: DeviceClass) {
        if !self.is_trigger(trigger) {
            return;
        }

        self.current_target = Some(trigger.clone());
        self.show(device);
    }

    pub fn hover_leave(&mut self) {
        self.close();
    }

    pub fn tap(&mut self, trigger: &T, device: DeviceClass) {
        if !self.is_trigger(trigger) {
            return;
        }

        let Some(active) = self.overlay_for(device) else {
            return;
        };

        if self.current_target.as_ref() == Some(trigger) && active.is_active() {
            self.close();
            return;
        }

        self.current_target = Some(trigger.clone());
        self.show(device);
    }

    /// Explicit close control, and the shared exit path for every hide.
    pub fn close(&mut self) {
        for overlay in [&self.desktop, &self.mobile].into_iter().flatten() {
            overlay.hide();
        }
        self.current_target = None;
    }

    pub fn document_tap(&mut self, target: TapTarget, device: DeviceClass) {
        let Some(active) = self.overlay_for(device) else {
            return;
        };

        if active.is_active() && target.is_outside() {
            self.close();
        }
    }

    fn is_trigger(&self, trigger: &T) -> bool {
        trigger.marker(&self.attribute).is_some()
    }

    fn overlay_for(&self, device: DeviceClass) -> Option<&O> {
        match device {
            DeviceClass::Desktop => self.desktop.as_ref(),
            DeviceClass::Mobile => self.mobile.as_ref(),
        }
    }

    fn show(&self, device: DeviceClass) {
        let (shown, sibling) = match device {
            DeviceClass::Desktop => (&self.desktop, &self.mobile),
            DeviceClass::Mobile => (&self.mobile, &self.desktop),
        };

        let Some(shown) = shown else {
            debug!(device = device.as_str(), "no responsive overlay for device class");
            return;
        };

        if let Some(sibling) = sibling {
            sibling.hide();
        }
        shown.show();
    }
}
