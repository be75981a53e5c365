use std::io::Write;

use rtsopen_core::error::Result;
use rtsopen_core::fog_of_war::{RasterFrame, RasterSink};

/// Writes each uploaded frame as a binary PPM (`P6`), dropping alpha.
#[derive(Debug)]
pub struct PpmSink<W> {
    writer: W,
}

impl<W: Write> PpmSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RasterSink for PpmSink<W> {
    fn upload(&mut self, frame: &RasterFrame<'_>) -> Result<()> {
        write!(self.writer, "P6\n{} {}\n255\n", frame.width, frame.height)?;
        let mut row_rgb = Vec::with_capacity(frame.width * 3);
        for row in frame.rows() {
            row_rgb.clear();
            for texel in row.chunks_exact(4) {
                row_rgb.extend_from_slice(&texel[..3]);
            }
            self.writer.write_all(&row_rgb)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
