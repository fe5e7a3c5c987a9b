/// What the page can observe about the device when an event arrives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Environment {
    pub viewport_width: f64,
    pub touch_capable: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    Desktop,
    Mobile,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionMode {
    Hover,
    Tap,
}

impl Environment {
    /// Narrow viewports (inclusive of the breakpoint) and any touch-capable device count as mobile.
    pub fn device_class(&self, mobile_breakpoint_px: f64) -> DeviceClass {
        if self.viewport_width <= mobile_breakpoint_px || self.touch_capable {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn touch_mode(&self) -> InteractionMode {
        if self.touch_capable {
            InteractionMode::Tap
        } else {
            InteractionMode::Hover
        }
    }
}

impl DeviceClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
        }
    }

    pub fn interaction_mode(self) -> InteractionMode {
        match self {
            Self::Desktop => InteractionMode::Hover,
            Self::Mobile => InteractionMode::Tap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(viewport_width: f64, touch_capable: bool) -> Environment {
        Environment {
            viewport_width,
            touch_capable,
        }
    }

    #[test]
    fn breakpoint_width_is_mobile() {
        assert_eq!(env(820.0, false).device_class(820.0), DeviceClass::Mobile);
        assert_eq!(env(821.0, false).device_class(820.0), DeviceClass::Desktop);
    }

    #[test]
    fn touch_capability_forces_mobile_on_wide_viewports() {
        let tablet = env(1366.0, true);

        assert_eq!(tablet.device_class(820.0), DeviceClass::Mobile);
        assert_eq!(tablet.touch_mode(), InteractionMode::Tap);
    }

    #[test]
    fn wide_pointer_device_hovers() {
        let desktop = env(1440.0, false);

        assert_eq!(desktop.device_class(820.0), DeviceClass::Desktop);
        assert_eq!(desktop.touch_mode(), InteractionMode::Hover);
        assert_eq!(
            desktop.device_class(820.0).interaction_mode(),
            InteractionMode::Hover
        );
    }
}
