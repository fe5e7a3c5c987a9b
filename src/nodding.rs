//! The "nod" gesture on a rigged bone, driven by hovering a single link.
//!
//! The bone moves between two named animation states. Every timed step goes
//! through a cancellable [`Scheduler`] handle owned by the controller, so a
//! leave that interrupts a nod replaces the pending step instead of racing it.

use crate::config::NoddingConfig;
use crate::error::PreviewError;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Payload for the runtime's `emitEvent`, serialized as `{state, duration, easing}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Transition {
    pub state: String,
    /// Seconds.
    pub duration: f64,
    pub easing: String,
}

pub trait AnimationTarget {
    fn emit_event(&self, event: &str, transition: &Transition);
}

pub trait Scene {
    type Object: AnimationTarget;

    fn find_object_by_name(&self, name: &str) -> Option<Self::Object>;
    /// Names of every object in the scene, for diagnostics.
    fn object_names(&self) -> Vec<String>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodTimer {
    NodFinished,
    Settled,
}

pub trait Scheduler {
    type Handle;

    fn schedule(&self, delay: Duration, timer: NodTimer) -> Result<Self::Handle, PreviewError>;
    fn cancel(&self, handle: Self::Handle);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodPhase {
    Base,
    Nodding,
    /// Nod finished with the pointer still over the link.
    Held,
    Returning,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodSettings {
    pub event_name: String,
    pub nod: Transition,
    pub base: Transition,
    pub nod_delay: Duration,
    pub return_delay: Duration,
}

impl From<&NoddingConfig> for NodSettings {
    fn from(config: &NoddingConfig) -> Self {
        let nod_delay = config.nod_duration();
        let return_delay = config.return_duration();

        Self {
            event_name: config.event_name.clone(),
            nod: Transition {
                state: config.nod_state.clone(),
                duration: nod_delay.as_secs_f64(),
                easing: config.easing.clone(),
            },
            base: Transition {
                state: config.base_state.clone(),
                duration: return_delay.as_secs_f64(),
                easing: config.easing.clone(),
            },
            nod_delay,
            return_delay,
        }
    }
}

pub fn find_bone<S: Scene>(scene: &S, name: &str) -> Result<S::Object, PreviewError> {
    scene
        .find_object_by_name(name)
        .ok_or_else(|| PreviewError::MissingSceneObject {
            name: name.to_string(),
            available: scene.object_names(),
        })
}

pub struct NoddingController<A, S: Scheduler> {
    target: A,
    scheduler: S,
    settings: NodSettings,
    phase: NodPhase,
    is_hovering: bool,
    pending: Option<(NodTimer, S::Handle)>,
}

impl<A, S> NoddingController<A, S>
where
    A: AnimationTarget,
    S: Scheduler,
{
    pub fn new(target: A, scheduler: S, settings: NodSettings) -> Self {
        Self {
            target,
            scheduler,
            settings,
            phase: NodPhase::Base,
            is_hovering: false,
            pending: None,
        }
    }

    pub fn phase(&self) -> NodPhase {
        self.phase
    }

    pub fn is_hovering(&self) -> bool {
        self.is_hovering
    }

    pub fn hover_enter(&mut self) {
        self.is_hovering = true;

        match self.phase {
            NodPhase::Nodding | NodPhase::Held => {}
            NodPhase::Base | NodPhase::Returning => {
                self.disarm();
                self.emit_nod();
            }
        }
    }

    pub fn hover_leave(&mut self) {
        self.is_hovering = false;

        match self.phase {
            NodPhase::Nodding | NodPhase::Held => {
                self.disarm();
                self.emit_base();
            }
            NodPhase::Base | NodPhase::Returning => {}
        }
    }

    pub fn on_timer(&mut self, timer: NodTimer) {
        if self.pending.as_ref().map(|(pending, _)| *pending) != Some(timer) {
            debug!(?timer, phase = ?self.phase, "ignoring stale nod timer");
            return;
        }
        self.pending = None;

        match (timer, self.phase) {
            (NodTimer::NodFinished, NodPhase::Nodding) if self.is_hovering => {
                self.phase = NodPhase::Held;
            }
            (NodTimer::NodFinished, NodPhase::Nodding) => self.emit_base(),
            (NodTimer::Settled, NodPhase::Returning) => self.phase = NodPhase::Base,
            (timer, phase) => debug!(?timer, ?phase, "nod timer fired in unexpected phase"),
        }
    }

    fn emit_nod(&mut self) {
        self.target.emit_event(&self.settings.event_name, &self.settings.nod);
        self.phase = NodPhase::Nodding;

        if !self.arm(self.settings.nod_delay, NodTimer::NodFinished) {
            self.phase = NodPhase::Held;
        }
    }

    fn emit_base(&mut self) {
        self.target.emit_event(&self.settings.event_name, &self.settings.base);
        self.phase = NodPhase::Returning;

        if !self.arm(self.settings.return_delay, NodTimer::Settled) {
            self.phase = NodPhase::Base;
        }
    }

    fn arm(&mut self, delay: Duration, timer: NodTimer) -> bool {
        match self.scheduler.schedule(delay, timer) {
            Ok(handle) => {
                self.pending = Some((timer, handle));
                true
            }
            Err(error) => {
                warn!(%error, ?timer, "failed to schedule nod timer");
                false
            }
        }
    }

    fn disarm(&mut self) {
        if let Some((_, handle)) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct RecordingBone {
        emitted: Rc<RefCell<Vec<(String, Transition)>>>,
    }

    impl RecordingBone {
        fn states(&self) -> Vec<String> {
            self.emitted
                .borrow()
                .iter()
                .map(|(_, transition)| transition.state.clone())
                .collect()
        }
    }

    impl AnimationTarget for RecordingBone {
        fn emit_event(&self, event: &str, transition: &Transition) {
            self.emitted
                .borrow_mut()
                .push((event.to_string(), transition.clone()));
        }
    }

    #[derive(Clone, Default)]
    struct ManualScheduler {
        next_id: Rc<Cell<u32>>,
        scheduled: Rc<RefCell<Vec<(u32, Duration, NodTimer)>>>,
        cancelled: Rc<RefCell<Vec<u32>>>,
        failing: Rc<Cell<bool>>,
    }

    impl ManualScheduler {
        fn last(&self) -> (u32, Duration, NodTimer) {
            *self.scheduled.borrow().last().expect("a timer was scheduled")
        }

        fn cancelled(&self) -> Vec<u32> {
            self.cancelled.borrow().clone()
        }
    }

    impl Scheduler for ManualScheduler {
        type Handle = u32;

        fn schedule(&self, delay: Duration, timer: NodTimer) -> Result<u32, PreviewError> {
            if self.failing.get() {
                return Err(PreviewError::Dom("setTimeout unavailable".to_string()));
            }
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            self.scheduled.borrow_mut().push((id, delay, timer));
            Ok(id)
        }

        fn cancel(&self, handle: u32) {
            self.cancelled.borrow_mut().push(handle);
        }
    }

    struct FakeScene {
        names: Vec<&'static str>,
    }

    impl Scene for FakeScene {
        type Object = RecordingBone;

        fn find_object_by_name(&self, name: &str) -> Option<RecordingBone> {
            self.names.contains(&name).then(RecordingBone::default)
        }

        fn object_names(&self) -> Vec<String> {
            self.names.iter().map(|name| name.to_string()).collect()
        }
    }

    type Controller = NoddingController<RecordingBone, ManualScheduler>;

    fn controller() -> (Controller, RecordingBone, ManualScheduler) {
        let bone = RecordingBone::default();
        let scheduler = ManualScheduler::default();
        let settings = NodSettings::from(&NoddingConfig::default());
        let controller = NoddingController::new(bone.clone(), scheduler.clone(), settings);
        (controller, bone, scheduler)
    }

    #[test]
    fn default_settings_match_runtime_payloads() {
        let settings = NodSettings::from(&NoddingConfig::default());

        assert_eq!(settings.event_name, "mouseDown");
        assert_eq!(
            settings.nod,
            Transition {
                state: "Nod".to_string(),
                duration: 0.3,
                easing: "easeInOut".to_string(),
            }
        );
        assert_eq!(settings.base.state, "Base State");
        assert_eq!(settings.base.duration, 0.6);
        assert_eq!(
            serde_json::to_value(&settings.nod).expect("serializable"),
            serde_json::json!({ "state": "Nod", "duration": 0.3, "easing": "easeInOut" })
        );
    }

    #[test]
    fn hover_enter_nods_and_schedules_finish() {
        let (mut controller, bone, scheduler) = controller();

        controller.hover_enter();

        assert_eq!(bone.states(), vec!["Nod"]);
        assert_eq!(bone.emitted.borrow()[0].0, "mouseDown");
        let (_, delay, timer) = scheduler.last();
        assert_eq!(delay, Duration::from_millis(300));
        assert_eq!(timer, NodTimer::NodFinished);
        assert_eq!(controller.phase(), NodPhase::Nodding);
    }

    #[test]
    fn early_leave_returns_to_base_exactly_once() {
        let (mut controller, bone, scheduler) = controller();

        controller.hover_enter();
        let (nod_timer, _, _) = scheduler.last();
        controller.hover_leave();

        assert_eq!(scheduler.cancelled(), vec![nod_timer]);
        assert_eq!(controller.phase(), NodPhase::Returning);

        // A cancelled timer that still slips through must not emit again.
        controller.on_timer(NodTimer::NodFinished);

        let (_, delay, timer) = scheduler.last();
        assert_eq!((delay, timer), (Duration::from_millis(600), NodTimer::Settled));
        controller.on_timer(NodTimer::Settled);

        assert_eq!(bone.states(), vec!["Nod", "Base State"]);
        assert_eq!(controller.phase(), NodPhase::Base);
        assert!(!controller.is_hovering());
    }

    #[test]
    fn nod_holds_while_pointer_stays() {
        let (mut controller, bone, _scheduler) = controller();

        controller.hover_enter();
        controller.on_timer(NodTimer::NodFinished);

        assert_eq!(controller.phase(), NodPhase::Held);
        assert_eq!(bone.states(), vec!["Nod"]);

        controller.hover_leave();
        assert_eq!(bone.states(), vec!["Nod", "Base State"]);

        controller.on_timer(NodTimer::Settled);
        assert_eq!(controller.phase(), NodPhase::Base);
    }

    #[test]
    fn repeated_enter_during_nod_does_not_overlap() {
        let (mut controller, bone, scheduler) = controller();

        controller.hover_enter();
        controller.hover_enter();

        assert_eq!(bone.states(), vec!["Nod"]);
        assert_eq!(scheduler.scheduled.borrow().len(), 1);
    }

    #[test]
    fn reentering_while_returning_replaces_pending_settle() {
        let (mut controller, bone, scheduler) = controller();

        controller.hover_enter();
        controller.hover_leave();
        let (settle_timer, _, _) = scheduler.last();

        controller.hover_enter();

        assert!(scheduler.cancelled().contains(&settle_timer));
        assert_eq!(bone.states(), vec!["Nod", "Base State", "Nod"]);
        assert_eq!(controller.phase(), NodPhase::Nodding);

        controller.on_timer(NodTimer::Settled);
        assert_eq!(controller.phase(), NodPhase::Nodding);
    }

    #[test]
    fn leave_at_rest_emits_nothing() {
        let (mut controller, bone, _scheduler) = controller();

        controller.hover_leave();
        controller.hover_leave();

        assert!(bone.states().is_empty());
        assert_eq!(controller.phase(), NodPhase::Base);
    }

    #[test]
    fn scheduling_failure_does_not_wedge_the_controller() {
        let (mut controller, bone, scheduler) = controller();
        scheduler.failing.set(true);

        controller.hover_enter();
        assert_eq!(controller.phase(), NodPhase::Held);

        controller.hover_leave();
        assert_eq!(controller.phase(), NodPhase::Base);

        controller.hover_enter();
        assert_eq!(bone.states(), vec!["Nod", "Base State", "Nod"]);
    }

    #[test]
    fn missing_bone_reports_available_objects() {
        let scene = FakeScene {
            names: vec!["Camera", "Head"],
        };

        let error = find_bone(&scene, "Bone001").err().expect("bone is missing");

        match error {
            PreviewError::MissingSceneObject { name, available } => {
                assert_eq!(name, "Bone001");
                assert_eq!(available, vec!["Camera", "Head"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(find_bone(&scene, "Head").is_ok());
    }
}
