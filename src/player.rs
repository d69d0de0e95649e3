use std::sync::{Arc, Mutex, PoisonError};

use gstreamer as gst;
use gstreamer::prelude::*;
use gstreamer_app as gst_app;

use crate::error::Error;
use crate::frame::Frame;
use crate::sink::{self, CallbackSlot};

/// Handles of one live pipeline. Both exist together or not at all.
struct Active {
    pipeline: gst::Pipeline,
    sink: gst_app::AppSink,
}

impl Active {
    /// Stop the pipeline and drop both handles.
    fn release(self) {
        if let Err(err) = self.pipeline.set_state(gst::State::Null) {
            log::warn!("failed to stop pipeline: {err}");
        }
    }
}

/// One pipeline's lifecycle: parse a description, run it, forward decoded
/// frames to the registered callback, tear it down on replacement or
/// release.
///
/// A player is either idle (no pipeline) or playing (pipeline and appsink
/// both live); `play` always tears down the previous pipeline before
/// constructing the next one, so at most one pipeline is live per player
/// at any time.
pub struct Player {
    init_args: Vec<String>,
    description: Option<String>,
    active: Option<Active>,
    callback: CallbackSlot,
}

impl Player {
    /// Create an idle player. Never fails; configuration problems are
    /// reported by [`play`](Player::play).
    pub fn new(init_args: &[String]) -> Self {
        Player {
            init_args: init_args.to_vec(),
            description: None,
            active: None,
            callback: Arc::new(Mutex::new(None)),
        }
    }

    /// Replace the frame callback. Takes effect for subsequently delivered
    /// frames; an in-flight delivery keeps the callback it already holds.
    pub fn set_frame_callback<F>(&self, callback: F)
    where
        F: FnMut(&Frame<'_>) + Send + 'static,
    {
        *self
            .callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Box::new(callback));
    }

    /// Construct and start the pipeline described by `description`.
    ///
    /// Any previously playing pipeline is fully torn down first. On any
    /// failure the error is logged and returned, and the player is left
    /// idle with no partial state.
    ///
    /// The pipeline must contain an `appsink` element named `"sink"`; the
    /// frame-delivery bridge is installed there before the pipeline is set
    /// to `Playing`.
    pub fn play(&mut self, description: &str) -> Result<(), Error> {
        if !self.init_args.is_empty() {
            log::error!(
                "unsupported initialization arguments: {:?}",
                self.init_args
            );
            return Err(Error::UnsupportedConfiguration);
        }
        gst::init()?;

        self.teardown();
        self.description = Some(description.to_owned());

        let element = gst::parse::launch(description).map_err(|err| {
            log::error!("failed to parse pipeline description: {err}");
            err
        })?;
        let pipeline = element.downcast::<gst::Pipeline>().map_err(|_| {
            log::error!("pipeline description {description:?} did not produce a pipeline");
            Error::NotAPipeline
        })?;

        let Some(element) = pipeline.by_name("sink") else {
            log::error!("no element named \"sink\" in pipeline {description:?}");
            return Err(Error::MissingSink);
        };
        let appsink = element.downcast::<gst_app::AppSink>().map_err(|_| {
            log::error!("element \"sink\" in pipeline {description:?} is not an appsink");
            Error::NotAnAppSink
        })?;

        let active = Active {
            pipeline,
            sink: appsink,
        };
        sink::install(&active.sink, Arc::clone(&self.callback));

        if let Err(err) = active.pipeline.set_state(gst::State::Playing) {
            log::error!("failed to set pipeline to Playing: {err}");
            active.release();
            return Err(err.into());
        }

        self.active = Some(active);
        Ok(())
    }

    /// Stop and release the pipeline, if any. The host integration must
    /// call this before tearing down whatever render target consumes the
    /// frames; afterwards the player is idle and can `play` again.
    pub fn detach_and_release(&mut self) {
        self.teardown();
    }

    /// True while a pipeline is live.
    pub fn is_playing(&self) -> bool {
        self.active.is_some()
    }

    /// The most recently played pipeline description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Idempotent: a no-op when already idle.
    fn teardown(&mut self) {
        if let Some(active) = self.active.take() {
            active.release();
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        if self.active.is_some() {
            log::warn!(
                "player dropped while playing; call detach_and_release() \
                 before the host render target is torn down"
            );
            self.teardown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_args_are_rejected_at_play() {
        let mut player = Player::new(&["--gst-debug=3".to_owned()]);
        let err = player.play("videotestsrc ! appsink name=sink");
        assert!(matches!(err, Err(Error::UnsupportedConfiguration)));
        assert!(!player.is_playing());
    }
}
