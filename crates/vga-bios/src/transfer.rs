//! Text transfers between the caller and plane memory.
//!
//! Plane 0 holds character codes and plane 1 attributes. Scrolls and single-plane writes go
//! through a planar session; operations that touch whole cells use the interleaved view.

use bitflags::bitflags;
use tracing::warn;

use crate::error::Result;
use crate::io::{MemoryWindow, VgaHardware};
use crate::planar::{PlaneAccess, PlanarSession};
use crate::state::CursorPos;
use crate::VideoBios;

/// Character written into cells exposed by a scroll.
pub const BLANK: u8 = 0x00;

/// Attribute used when teletype output scrolls the screen.
pub const TELETYPE_SCROLL_ATTR: u8 = 0x07;

bitflags! {
    /// Write String mode byte (`AL` of function 13h).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WriteStringFlags: u8 {
        const MOVE_CURSOR = 1 << 0;
        const WRITE_ATTRIBUTE = 1 << 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScrollDirection {
    Up,
    Down,
}

impl VideoBios {
    /// Scrolls the `cols` x `rows` region at the top-left of the active page up by `count` rows.
    ///
    /// `count >= rows` blanks the whole region; `count == 0` does nothing.
    pub fn scroll_up<H: VgaHardware + ?Sized>(
        &mut self,
        hw: &mut H,
        count: u8,
        attr: u8,
        cols: u8,
        rows: u8,
    ) {
        let page = self.state.active_page;
        self.scroll(hw, page, ScrollDirection::Up, count, attr, cols, rows);
    }

    /// Mirror of [`Self::scroll_up`]; exposed rows appear at the top.
    pub fn scroll_down<H: VgaHardware + ?Sized>(
        &mut self,
        hw: &mut H,
        count: u8,
        attr: u8,
        cols: u8,
        rows: u8,
    ) {
        let page = self.state.active_page;
        self.scroll(hw, page, ScrollDirection::Down, count, attr, cols, rows);
    }

    #[allow(clippy::too_many_arguments)]
    fn scroll<H: VgaHardware + ?Sized>(
        &mut self,
        hw: &mut H,
        page: u8,
        direction: ScrollDirection,
        count: u8,
        attr: u8,
        cols: u8,
        rows: u8,
    ) {
        if count == 0 {
            return;
        }

        let region = ScrollRegion {
            cols: cols.min(self.state.columns) as usize,
            rows: rows.min(self.state.rows),
            stride: self.state.columns as u16,
        };
        let page_start = self.state.page_start(page);

        let mut session = PlanarSession::open(hw, PlaneAccess::plane(0), page_start);
        region.scroll(&mut *session, direction, count, BLANK);
        session.select_plane(1);
        region.scroll(&mut *session, direction, count, attr);
    }

    /// Fills `count` cells from the page's cursor with `attr:chr`. The cursor does not move.
    pub fn write_char_attr<H: VgaHardware + ?Sized>(
        &mut self,
        hw: &mut H,
        page: u8,
        chr: u8,
        attr: u8,
        count: u16,
    ) -> Result<()> {
        let pos = self.cursor_of(page)?;
        let offset = self.state.cell_index(pos).wrapping_mul(2);

        let mut session =
            PlanarSession::open(hw, PlaneAccess::Interleaved, self.state.page_start(page));
        session.fill_u16(offset, u16::from_le_bytes([chr, attr]), count as usize);
        Ok(())
    }

    /// Fills `count` character codes from the page's cursor, leaving attributes alone.
    pub fn write_char<H: VgaHardware + ?Sized>(
        &mut self,
        hw: &mut H,
        page: u8,
        chr: u8,
        count: u16,
    ) -> Result<()> {
        let pos = self.cursor_of(page)?;
        let offset = self.state.cell_index(pos);

        let mut session = PlanarSession::open(hw, PlaneAccess::plane(0), self.state.page_start(page));
        session.fill(offset, chr, count as usize);
        Ok(())
    }

    /// Writes one cell at the page's cursor and advances it, scrolling at the bottom right.
    ///
    /// Every byte is drawn as a glyph; control characters get no special treatment.
    pub fn write_teletype<H: VgaHardware + ?Sized>(
        &mut self,
        hw: &mut H,
        page: u8,
        chr: u8,
        attr: u8,
    ) -> Result<()> {
        let pos = self.cursor_of(page)?;
        let offset = self.state.cell_index(pos).wrapping_mul(2);
        {
            let mut session =
                PlanarSession::open(hw, PlaneAccess::Interleaved, self.state.page_start(page));
            session.write_u16(offset, u16::from_le_bytes([chr, attr]));
        }

        let mut next = CursorPos::new(pos.x.saturating_add(1), pos.y);
        if next.x >= self.state.columns {
            next.x = 0;
            if next.y.saturating_add(1) >= self.state.rows {
                let (columns, rows) = (self.state.columns, self.state.rows);
                self.scroll(
                    hw,
                    page,
                    ScrollDirection::Up,
                    1,
                    TELETYPE_SCROLL_ATTR,
                    columns,
                    rows,
                );
                next.y = rows.saturating_sub(1);
            } else {
                next.y += 1;
            }
        }

        self.set_cursor_position(hw, page, next.x, next.y)
    }

    /// Copies the zero-terminated string at linear address `buffer` to `(x, y)` on the active
    /// page.
    ///
    /// With [`WriteStringFlags::WRITE_ATTRIBUTE`] the attribute plane is filled over one cell
    /// more than the string length. Returns the number of characters written.
    pub fn write_string<H: VgaHardware + ?Sized>(
        &mut self,
        hw: &mut H,
        flags: WriteStringFlags,
        buffer: u32,
        attr: u8,
        x: u8,
        y: u8,
    ) -> Result<u16> {
        let len = self.string_length(hw, buffer);
        let page = self.state.active_page;
        let index = self.state.cell_index(CursorPos::new(x, y));

        {
            let mut session =
                PlanarSession::open(hw, PlaneAccess::plane(0), self.state.page_start(page));
            session.copy_from_linear(index, buffer, len as usize);
            if flags.contains(WriteStringFlags::WRITE_ATTRIBUTE) {
                session.select_plane(1);
                session.fill(index, attr, len as usize + 1);
            }
        }

        if flags.contains(WriteStringFlags::MOVE_CURSOR) {
            let end = self.state.position_of(index.wrapping_add(len));
            self.set_cursor_position(hw, page, end.x, end.y)?;
        }
        Ok(len)
    }

    /// Reads the cell under the page's cursor as `(character, attribute)`.
    pub fn read_char_attr<H: VgaHardware + ?Sized>(
        &mut self,
        hw: &mut H,
        page: u8,
    ) -> Result<(u8, u8)> {
        let pos = self.cursor_of(page)?;
        let offset = self.state.cell_index(pos).wrapping_mul(2);

        let mut session =
            PlanarSession::open(hw, PlaneAccess::Interleaved, self.state.page_start(page));
        let [chr, attr] = session.read_u16(offset).to_le_bytes();
        Ok((chr, attr))
    }

    fn string_length<H: VgaHardware + ?Sized>(&self, hw: &mut H, buffer: u32) -> u16 {
        let limit = self.config.string_scan_limit;
        let mut len = 0u16;
        while len < limit {
            if hw.read_linear_u8(buffer.wrapping_add(len as u32)) == 0 {
                return len;
            }
            len += 1;
        }
        warn!(
            buffer = format_args!("{buffer:#07x}"),
            limit, "write string reached the scan limit without a terminator"
        );
        len
    }
}

#[derive(Debug, Clone, Copy)]
struct ScrollRegion {
    cols: usize,
    rows: u8,
    stride: u16,
}

impl ScrollRegion {
    fn row(&self, row: u8) -> u16 {
        self.stride.wrapping_mul(row as u16)
    }

    fn clear<W: MemoryWindow + ?Sized>(&self, win: &mut W, rows: core::ops::Range<u8>, fill: u8) {
        for row in rows {
            win.fill(self.row(row), fill, self.cols);
        }
    }

    fn scroll<W: MemoryWindow + ?Sized>(
        &self,
        win: &mut W,
        direction: ScrollDirection,
        count: u8,
        fill: u8,
    ) {
        if count >= self.rows {
            self.clear(win, 0..self.rows, fill);
            return;
        }

        let kept = self.rows - count;
        match direction {
            ScrollDirection::Up => {
                for row in 0..kept {
                    win.copy(self.row(row), self.row(row + count), self.cols);
                }
                self.clear(win, kept..self.rows, fill);
            }
            ScrollDirection::Down => {
                for row in (count..self.rows).rev() {
                    win.copy(self.row(row), self.row(row - count), self.cols);
                }
                self.clear(win, 0..count, fill);
            }
        }
    }
}
