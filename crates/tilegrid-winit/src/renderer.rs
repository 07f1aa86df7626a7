//! Renders tile frames into a pixel buffer.
//!
//! Each tile occupies a `cell_width × cell_height` pixel block. Only the
//! top-left `(cell_width - 2) × (cell_height - 2)` rectangle is filled with
//! the tile color; the remaining 2px stripes keep the gap color and read as
//! grid lines.

use tilegrid_core::{Color, tile::Frame};

pub(crate) struct TileRenderer {
    cols: usize,
    rows: usize,
    cell_width: usize,
    cell_height: usize,
    /// Packed pixel buffer, `(cols * cell_width) x (rows * cell_height)`.
    pixels: Vec<u32>,
}

#[inline]
fn pack(c: Color) -> u32 {
    0xFF00_0000 | ((c.r() as u32) << 16) | ((c.g() as u32) << 8) | (c.b() as u32)
}

impl TileRenderer {
    pub fn new(cols: usize, rows: usize, cell_width: usize, cell_height: usize, gap: Color) -> Self {
        let cell_width = cell_width.max(1);
        let cell_height = cell_height.max(1);
        let pixel_count = (cols * cell_width) * (rows * cell_height);
        Self {
            cols,
            rows,
            cell_width,
            cell_height,
            pixels: vec![pack(gap); pixel_count],
        }
    }

    /// Cell size in pixels.
    pub fn cell_size(&self) -> (usize, usize) {
        (self.cell_width, self.cell_height)
    }

    /// Total pixel buffer width.
    pub fn pixel_width(&self) -> usize {
        self.cols * self.cell_width
    }

    /// Total pixel buffer height.
    pub fn pixel_height(&self) -> usize {
        self.rows * self.cell_height
    }

    /// Apply a frame diff to the internal pixel buffer.
    pub fn apply_frame(&mut self, frame: &Frame) {
        for fc in &frame.cells {
            if fc.pos.x < 0 || fc.pos.y < 0 {
                continue;
            }
            let col = fc.pos.x as usize;
            let row = fc.pos.y as usize;
            if col >= self.cols || row >= self.rows {
                log::warn!("frame cell outside grid at ({col}, {row})");
                continue;
            }
            self.fill_cell(col, row, fc.tile.color);
        }
    }

    /// Fill one tile's inset rectangle. The 2px right/bottom stripes are
    /// never touched after construction; they are the grid lines.
    fn fill_cell(&mut self, col: usize, row: usize, color: Color) {
        let buf_w = self.pixel_width();
        let x0 = col * self.cell_width;
        let y0 = row * self.cell_height;
        let w = self.cell_width.saturating_sub(2);
        let h = self.cell_height.saturating_sub(2);
        let pixel = pack(color);

        for dy in 0..h {
            let row_start = (y0 + dy) * buf_w + x0;
            self.pixels[row_start..row_start + w].fill(pixel);
        }
    }

    /// Copy the internal pixel buffer into a surface buffer, clearing any
    /// area the grid does not cover.
    pub fn blit_to_buffer(&self, buf: &mut [u32], buf_width: usize, buf_height: usize) {
        let src_w = self.pixel_width();
        let src_h = self.pixel_height();
        let copy_w = src_w.min(buf_width);
        let copy_h = src_h.min(buf_height);

        if buf_width > src_w || buf_height > src_h {
            buf.fill(0xFF00_0000);
        }

        for y in 0..copy_h {
            let src_start = y * src_w;
            let dst_start = y * buf_width;
            let src_end = src_start + copy_w;
            let dst_end = dst_start + copy_w;
            if src_end <= self.pixels.len() && dst_end <= buf.len() {
                buf[dst_start..dst_end].copy_from_slice(&self.pixels[src_start..src_end]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilegrid_core::{Point, Tile, tile::FrameCell};

    fn frame_with(pos: Point, color: Color) -> Frame {
        Frame {
            cells: vec![FrameCell {
                pos,
                tile: Tile::new(color),
            }],
            width: 2,
            height: 2,
            time_ms: 0,
        }
    }

    #[test]
    fn fill_preserves_two_pixel_gap() {
        let gap = Color::from_rgb(1, 1, 1);
        let fill = Color::from_rgb(200, 200, 200);
        let mut r = TileRenderer::new(2, 2, 10, 10, gap);
        r.apply_frame(&frame_with(Point::ZERO, fill));

        let w = r.pixel_width();
        // Inside the inset rectangle.
        assert_eq!(r.pixels[0], pack(fill));
        assert_eq!(r.pixels[7 * w + 7], pack(fill));
        // The 2px stripes on the right and bottom stay gap-colored.
        assert_eq!(r.pixels[8], pack(gap));
        assert_eq!(r.pixels[9], pack(gap));
        assert_eq!(r.pixels[8 * w], pack(gap));
        assert_eq!(r.pixels[9 * w + 9], pack(gap));
        // The neighboring cell is untouched.
        assert_eq!(r.pixels[10], pack(gap));
    }

    #[test]
    fn out_of_grid_cells_are_skipped() {
        let mut r = TileRenderer::new(2, 2, 4, 4, Color::DEFAULT);
        r.apply_frame(&frame_with(Point::new(5, 5), Color::from_rgb(9, 9, 9)));
        assert!(r.pixels.iter().all(|&p| p == pack(Color::DEFAULT)));
    }
}
