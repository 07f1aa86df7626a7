//! Frame recording / playback.
//!
//! [`FrameEncoder`] and [`FrameDecoder`] persist [`Frame`]s to a byte stream
//! using a compact length-prefixed binary encoding, so an animation run can
//! be captured and replayed later.
//!
//! ## Wire format
//!
//! Each frame is written as:
//! ```text
//! [total_byte_len: u32 LE]
//! [time_ms: u64 LE]
//! [width: i32 LE]
//! [height: i32 LE]
//! [num_cells: u32 LE]
//! for each cell:
//!   [pos.x: i32 LE] [pos.y: i32 LE]
//!   [color: u32 LE]
//! ```

use std::io::{self, Read, Write};

use crate::color::Color;
use crate::geom::Point;
use crate::tile::{Frame, FrameCell, Tile};

/// Bytes per serialized cell: pos(8) + color(4) = 12
const CELL_SIZE: usize = 12;
/// Header size: time_ms(8) + width(4) + height(4) + num_cells(4) = 20
const HEADER_SIZE: usize = 20;

// ---------------------------------------------------------------------------
// FrameEncoder
// ---------------------------------------------------------------------------

/// Encodes [`Frame`]s to a byte-oriented writer.
pub struct FrameEncoder<W: Write> {
    writer: W,
}

impl<W: Write> FrameEncoder<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write a single frame.
    pub fn encode(&mut self, frame: &Frame) -> io::Result<()> {
        let num_cells = frame.cells.len() as u32;
        let total_len = (HEADER_SIZE + frame.cells.len() * CELL_SIZE) as u32;

        // Length prefix
        self.writer.write_all(&total_len.to_le_bytes())?;

        // Header
        self.writer.write_all(&frame.time_ms.to_le_bytes())?;
        self.writer.write_all(&frame.width.to_le_bytes())?;
        self.writer.write_all(&frame.height.to_le_bytes())?;
        self.writer.write_all(&num_cells.to_le_bytes())?;

        // Cells
        for fc in &frame.cells {
            self.writer.write_all(&fc.pos.x.to_le_bytes())?;
            self.writer.write_all(&fc.pos.y.to_le_bytes())?;
            self.writer.write_all(&fc.tile.color.0.to_le_bytes())?;
        }

        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the encoder, returning the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

// ---------------------------------------------------------------------------
// FrameDecoder
// ---------------------------------------------------------------------------

/// Decodes [`Frame`]s from a byte-oriented reader.
pub struct FrameDecoder<R: Read> {
    reader: R,
}

impl<R: Read> FrameDecoder<R> {
    /// Wrap a reader.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read the next frame, or `None` at EOF.
    pub fn decode(&mut self) -> io::Result<Option<Frame>> {
        // Read length prefix
        let mut len_buf = [0u8; 4];
        match self.reader.read_exact(&mut len_buf) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        }
        let total_len = u32::from_le_bytes(len_buf) as usize;

        if total_len < HEADER_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "frame too small",
            ));
        }

        // Read the entire frame payload
        let mut data = vec![0u8; total_len];
        self.reader.read_exact(&mut data)?;

        // Parse header
        let time_ms = u64::from_le_bytes(data[0..8].try_into().unwrap());
        let width = i32::from_le_bytes(data[8..12].try_into().unwrap());
        let height = i32::from_le_bytes(data[12..16].try_into().unwrap());
        let num_cells = u32::from_le_bytes(data[16..20].try_into().unwrap()) as usize;

        let expected = HEADER_SIZE + num_cells * CELL_SIZE;
        if total_len != expected {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "frame size mismatch: expected {} bytes, got {}",
                    expected, total_len
                ),
            ));
        }

        // Parse cells
        let mut cells = Vec::with_capacity(num_cells);
        let mut offset = HEADER_SIZE;
        for _ in 0..num_cells {
            let x = i32::from_le_bytes(data[offset..offset + 4].try_into().unwrap());
            let y = i32::from_le_bytes(data[offset + 4..offset + 8].try_into().unwrap());
            let color = u32::from_le_bytes(data[offset + 8..offset + 12].try_into().unwrap());

            cells.push(FrameCell {
                pos: Point::new(x, y),
                tile: Tile::new(Color(color)),
            });

            offset += CELL_SIZE;
        }

        Ok(Some(Frame {
            cells,
            width,
            height,
            time_ms,
        }))
    }

    /// Consume the decoder, returning the inner reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}
