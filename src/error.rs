use gstreamer as gst;
use thiserror::Error;

/// Top-level crate error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("{0}")]
    Glib(#[from] gst::glib::Error),
    #[error("pipeline description did not produce a pipeline")]
    NotAPipeline,
    #[error("no element named \"sink\" in pipeline")]
    MissingSink,
    #[error("element \"sink\" is not an appsink")]
    NotAnAppSink,
    #[error("{0}")]
    StateChange(#[from] gst::StateChangeError),
    #[error("initialization arguments are not supported")]
    UnsupportedConfiguration,
}
