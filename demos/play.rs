use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use pipeline_stream::PlayerRegistry;

const DEFAULT_PIPELINE: &str =
    "videotestsrc ! videoconvert ! video/x-raw,format=RGBA ! appsink name=sink";

fn main() {
    env_logger::init();

    let description = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_PIPELINE.to_owned());
    println!("Playing: {description}");

    let registry = PlayerRegistry::new();
    let player = registry.get(0, &[]);

    let frame_count = Arc::new(AtomicU64::new(0));
    let count_clone = frame_count.clone();
    let target_frames: u64 = 60;

    player
        .lock()
        .expect("player lock poisoned")
        .set_frame_callback(move |frame| {
            let n = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
            println!(
                "Frame {}: {}x{} stride={} bytes={}",
                n,
                frame.width(),
                frame.height(),
                frame.stride(),
                frame.len(),
            );
        });

    player
        .lock()
        .expect("player lock poisoned")
        .play(&description)
        .expect("failed to start pipeline");

    // Wait until we've seen enough frames
    loop {
        std::thread::sleep(Duration::from_millis(100));
        if frame_count.load(Ordering::Relaxed) >= target_frames {
            break;
        }
    }

    registry.dispose(0);
    println!(
        "\nDone. Received {} frames.",
        frame_count.load(Ordering::Relaxed)
    );
}
