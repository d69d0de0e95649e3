/// A borrowed video frame. Lifetime tied to callback scope (zero-copy).
///
/// The pixel data borrows the mapped GStreamer buffer and is only valid
/// until the frame callback returns.
pub struct Frame<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    stride: usize,
}

impl<'a> Frame<'a> {
    pub(crate) fn new(data: &'a [u8], width: u32, height: u32, stride: usize) -> Self {
        Frame {
            data,
            width,
            height,
            stride,
        }
    }

    /// Raw pixel bytes of the frame.
    pub fn data(&self) -> &[u8] {
        self.data
    }

    /// Total byte length of the frame data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Pixel width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride of the first plane, in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }
}

/// Callback invoked for each decoded frame, on a pipeline streaming thread.
pub type FrameCallback = Box<dyn FnMut(&Frame<'_>) + Send + 'static>;
