//! Hand-off point between a visibility map and whatever displays it.

use crate::error::Result;

/// A borrowed view of a full fog-of-war raster.
///
/// `data` is row-major RGBA8, `pitch` bytes per row, with no padding between
/// rows (`pitch == width * 4`).
#[derive(Debug, Clone, Copy)]
pub struct RasterFrame<'a> {
    pub width: usize,
    pub height: usize,
    pub pitch: usize,
    pub data: &'a [u8],
}

impl<'a> RasterFrame<'a> {
    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        // `max(1)` keeps an empty raster from asking for zero-sized chunks
        self.data.chunks_exact(self.pitch.max(1))
    }
}

/// Receives raster uploads, e.g. a GPU texture or an image file writer.
pub trait RasterSink {
    fn upload(&mut self, frame: &RasterFrame<'_>) -> Result<()>;
}

/// Keeps a copy of the last uploaded frame.
#[derive(Debug, Default, Clone)]
pub struct SnapshotSink {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
    pub uploads: usize,
}

impl RasterSink for SnapshotSink {
    fn upload(&mut self, frame: &RasterFrame<'_>) -> Result<()> {
        self.width = frame.width;
        self.height = frame.height;
        self.data.clear();
        self.data.extend_from_slice(frame.data);
        self.uploads += 1;
        Ok(())
    }
}
