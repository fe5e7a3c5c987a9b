pub const ACTIVE_CLASS: &str = "active";

/// A preview surface whose visibility is driven by the `active` class and `aria-hidden`.
pub trait Overlay {
    fn show(&self);
    fn hide(&self);
    fn is_active(&self) -> bool;
}

/// An element that may carry a preview marker attribute.
pub trait Trigger: Clone + PartialEq {
    fn marker(&self, attribute: &str) -> Option<String>;
}

/// Where a document-level tap landed, relative to one controller's surfaces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TapTarget {
    pub inside_overlay: bool,
    pub on_trigger: bool,
    pub on_close_control: bool,
}

impl TapTarget {
    pub fn is_outside(&self) -> bool {
        !(self.inside_overlay || self.on_trigger || self.on_close_control)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{Overlay, Trigger};
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    pub(crate) struct FakeOverlay {
        active: Rc<Cell<bool>>,
        shows: Rc<Cell<usize>>,
    }

    impl FakeOverlay {
        pub(crate) fn shows(&self) -> usize {
            self.shows.get()
        }
    }

    impl Overlay for FakeOverlay {
        fn show(&self) {
            self.active.set(true);
            self.shows.set(self.shows.get() + 1);
        }

        fn hide(&self) {
            self.active.set(false);
        }

        fn is_active(&self) -> bool {
            self.active.get()
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    pub(crate) struct FakeTrigger {
        id: u32,
        attributes: Vec<(String, String)>,
    }

    impl FakeTrigger {
        pub(crate) fn bare(id: u32) -> Self {
            Self {
                id,
                attributes: Vec::new(),
            }
        }

        pub(crate) fn with(id: u32, attribute: &str, value: &str) -> Self {
            Self {
                id,
                attributes: vec![(attribute.to_string(), value.to_string())],
            }
        }
    }

    impl Trigger for FakeTrigger {
        fn marker(&self, attribute: &str) -> Option<String> {
            self.attributes
                .iter()
                .find(|(name, _)| name == attribute)
                .map(|(_, value)| value.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tap_is_outside_only_when_nothing_matched() {
        assert!(TapTarget::default().is_outside());
        assert!(!TapTarget {
            inside_overlay: true,
            ..TapTarget::default()
        }
        .is_outside());
        assert!(!TapTarget {
            on_trigger: true,
            ..TapTarget::default()
        }
        .is_outside());
        assert!(!TapTarget {
            on_close_control: true,
            ..TapTarget::default()
        }
        .is_outside());
    }
}
