//! Hover (or tap) to preview a looping video in a shared overlay.
//!
//! One overlay and one media element serve every `[data-video]` trigger on the
//! page. The last trigger to activate owns them; there is no queueing.

use crate::overlay::{Overlay, TapTarget, Trigger};
use tracing::{debug, warn};

/// The media half of the preview, modelled after `HTMLVideoElement`.
pub trait MediaElement {
    /// The source as it was assigned, `None` when empty.
    fn source(&self) -> Option<String>;
    fn set_source(&self, source: &str);
    fn clear_source(&self);
    fn load(&self);
    fn pause(&self);
    fn rewind(&self);
    /// Starts playback. Implementations log (and swallow) a rejected start.
    fn play(&self);
    /// Whether the current frame is decoded and playback could begin.
    fn is_ready(&self) -> bool;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VideoPhase {
    Idle,
    Loading { source: String },
    Playing { source: String },
}

pub struct HoverVideoController<T, O, M> {
    attribute: String,
    overlay: O,
    media: M,
    current_target: Option<T>,
    phase: VideoPhase,
}

impl<T, O, M> HoverVideoController<T, O, M>
where
    T: Trigger,
    O: Overlay,
    M: MediaElement,
{
    pub fn new(attribute: impl Into<String>, overlay: O, media: M) -> Self {
        Self {
            attribute: attribute.into(),
            overlay,
            media,
            current_target: None,
            phase: VideoPhase::Idle,
        }
    }

    pub fn phase(&self) -> &VideoPhase {
        &self.phase
    }

    pub fn current_target(&self) -> Option<&T> {
        self.current_target.as_ref()
    }

    pub fn hover_enter(&mut self, trigger: &T) {
        let Some(source) = self.source_of(trigger) else {
            return;
        };

        self.current_target = Some(trigger.clone());
        self.present(source);
    }

    pub fn hover_leave(&mut self) {
        self.hide();
        self.current_target = None;
    }

    /// Touch activation. A second tap on the open trigger closes it.
    pub fn tap(&mut self, trigger: &T) {
        let Some(source) = self.source_of(trigger) else {
            return;
        };

        if self.current_target.as_ref() == Some(trigger) && self.phase != VideoPhase::Idle {
            self.hide();
            self.current_target = None;
            return;
        }

        self.current_target = Some(trigger.clone());
        self.present(source);
    }

    pub fn document_tap(&mut self, target: TapTarget) {
        if !self.overlay.is_active() {
            return;
        }

        if target.is_outside() {
            self.hide();
            self.current_target = None;
        }
    }

    pub fn data_loaded(&mut self) {
        let VideoPhase::Loading { source } = &self.phase else {
            debug!(phase = ?self.phase, "ignoring data-loaded outside of a pending load");
            return;
        };

        let source = source.clone();
        self.overlay.show();
        self.media.play();
        self.phase = VideoPhase::Playing { source };
    }

    pub fn load_failed(&mut self) {
        if self.phase == VideoPhase::Idle {
            debug!("ignoring media error while no preview is requested");
            return;
        }

        let source = self.media.source().unwrap_or_default();
        warn!(%source, "failed to load video preview");
        self.hide();
    }

    /// Releases the network and decoder resources before the page goes away.
    pub fn teardown(&mut self) {
        self.media.pause();
        self.media.clear_source();
        self.phase = VideoPhase::Idle;
        self.current_target = None;
    }

    fn source_of(&self, trigger: &T) -> Option<String> {
        trigger
            .marker(&self.attribute)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn present(&mut self, source: String) {
        if self.media.source().as_deref() != Some(source.as_str()) {
            debug!(%source, "loading video preview");
            self.media.pause();
            self.media.rewind();
            self.media.set_source(&source);
            self.media.load();
            self.phase = VideoPhase::Loading { source };
            return;
        }

        self.media.rewind();
        if !self.media.is_ready() {
            // Restart the load so a fresh data-loaded or error event follows.
            self.media.load();
            self.phase = VideoPhase::Loading { source };
            return;
        }

        self.overlay.show();
        self.media.play();
        self.phase = VideoPhase::Playing { source };
    }

    fn hide(&mut self) {
        self.overlay.hide();
        self.media.pause();
        self.media.rewind();
        self.phase = VideoPhase::Idle;
    }
}
