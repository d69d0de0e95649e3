use std::sync::{Arc, Mutex};

use gstreamer as gst;
use gstreamer_app as gst_app;
use gstreamer_video as gst_video;

use crate::frame::{Frame, FrameCallback};

/// Shared slot holding the currently registered frame callback.
///
/// The appsink bridge and the owning [`Player`](crate::player::Player) each
/// hold a reference, so replacing the callback never touches the pipeline.
pub(crate) type CallbackSlot = Arc<Mutex<Option<FrameCallback>>>;

/// Install the frame-delivery bridge on an appsink.
///
/// The pipeline invokes the `new-sample` closure from one of its own
/// streaming threads; the closure must stay quick and must always report
/// `FlowSuccess::Ok` so an unprocessable frame never stalls or tears down
/// the pipeline.
pub(crate) fn install(sink: &gst_app::AppSink, slot: CallbackSlot) {
    sink.set_callbacks(
        gst_app::AppSinkCallbacks::builder()
            .new_sample(move |sink| {
                // Pull unconditionally, even with no callback registered,
                // so samples never pile up inside the appsink.
                if let Ok(sample) = sink.pull_sample() {
                    deliver(&sample, &slot);
                }
                Ok(gst::FlowSuccess::Ok)
            })
            .build(),
    );
}

/// Forward one sample to the registered callback, if any.
///
/// Samples without a buffer or without caps are consumed silently.
pub(crate) fn deliver(sample: &gst::Sample, slot: &Mutex<Option<FrameCallback>>) {
    let Some(buffer) = sample.buffer() else {
        return;
    };
    let Some(caps) = sample.caps() else {
        return;
    };

    let info = match gst_video::VideoInfo::from_caps(caps) {
        Ok(info) => info,
        Err(err) => {
            log::warn!("dropping frame with non-video caps {caps}: {err}");
            return;
        }
    };
    let map = match buffer.map_readable() {
        Ok(map) => map,
        Err(err) => {
            log::warn!("failed to map frame buffer readable: {err}");
            return;
        }
    };

    let frame = Frame::new(
        map.as_slice(),
        info.width(),
        info.height(),
        info.stride()[0] as usize,
    );

    if let Ok(mut guard) = slot.lock()
        && let Some(ref mut callback) = *guard
    {
        callback(&frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn callback_slot(callback: Option<FrameCallback>) -> CallbackSlot {
        Arc::new(Mutex::new(callback))
    }

    fn rgba_sample(width: u32, height: u32) -> (gst::Sample, gst_video::VideoInfo) {
        let info = gst_video::VideoInfo::builder(gst_video::VideoFormat::Rgba, width, height)
            .build()
            .unwrap();
        let caps = info.to_caps().unwrap();
        let buffer = gst::Buffer::with_size(info.size()).unwrap();
        let sample = gst::Sample::builder().buffer(&buffer).caps(&caps).build();
        (sample, info)
    }

    #[test]
    fn sample_without_buffer_skips_callback() {
        gst::init().unwrap();

        let delivered = Arc::new(AtomicU64::new(0));
        let count = Arc::clone(&delivered);
        let slot = callback_slot(Some(Box::new(move |_frame| {
            count.fetch_add(1, Ordering::Relaxed);
        })));

        let sample = gst::Sample::builder().build();
        deliver(&sample, &slot);

        assert_eq!(delivered.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn sample_without_callback_is_consumed() {
        gst::init().unwrap();

        let (sample, _info) = rgba_sample(2, 2);
        let slot = callback_slot(None);
        deliver(&sample, &slot);
    }

    #[test]
    fn frame_geometry_matches_caps() {
        gst::init().unwrap();

        let (sample, info) = rgba_sample(2, 2);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_ref = Arc::clone(&seen);
        let slot = callback_slot(Some(Box::new(move |frame| {
            seen_ref
                .lock()
                .unwrap()
                .push((frame.len(), frame.width(), frame.height(), frame.stride()));
        })));

        deliver(&sample, &slot);
        deliver(&sample, &slot);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2, "one delivery per sample");
        for &(len, width, height, stride) in seen.iter() {
            assert_eq!(width, 2);
            assert_eq!(height, 2);
            assert_eq!(stride, info.stride()[0] as usize);
            assert_eq!(len, info.size());
        }
    }
}
