use tracing::debug;

use crate::error::{Result, VideoError};
use crate::io::{PortIo, RegisterFile, VgaRegisters};
use crate::regs::{
    CursorShape, CRTC_CURSOR_END, CRTC_CURSOR_LOCATION_HIGH, CRTC_CURSOR_LOCATION_LOW,
    CRTC_CURSOR_START, CRTC_START_ADDRESS_HIGH, CRTC_START_ADDRESS_LOW,
};
use crate::state::{CursorPos, PAGE_COUNT};
use crate::VideoBios;

fn check_page(page: u8) -> Result<usize> {
    if (page as usize) < PAGE_COUNT {
        Ok(page as usize)
    } else {
        Err(VideoError::PageOutOfRange(page))
    }
}

impl VideoBios {
    fn crtc(&self) -> RegisterFile {
        RegisterFile::Crtc(self.config.crtc)
    }

    pub fn set_cursor_size<H: PortIo + ?Sized>(&mut self, hw: &mut H, shape: CursorShape) {
        let crtc = self.crtc();
        hw.write_reg_split(crtc, CRTC_CURSOR_START, shape.start);
        hw.write_reg_split(crtc, CRTC_CURSOR_END, shape.end & CursorShape::END_MASK);
    }

    /// Current cursor shape as programmed in the CRT controller.
    pub fn cursor_shape<H: PortIo + ?Sized>(&self, hw: &mut H) -> CursorShape {
        let crtc = self.crtc();
        let start = hw.read_reg(crtc, CRTC_CURSOR_START) & CursorShape::END_MASK;
        let end = hw.read_reg(crtc, CRTC_CURSOR_END);
        CursorShape::new(start, end)
    }

    /// Stores the cursor for `page`, clamped to the current geometry.
    ///
    /// The hardware cursor follows only when `page` is the active page.
    pub fn set_cursor_position<H: PortIo + ?Sized>(
        &mut self,
        hw: &mut H,
        page: u8,
        x: u8,
        y: u8,
    ) -> Result<()> {
        let slot = check_page(page)?;
        let pos = self.state.clamp(x, y);
        self.state.cursor[slot] = pos;
        if page == self.state.active_page {
            self.apply_cursor(hw, pos);
        }
        Ok(())
    }

    /// Cursor shape registers plus the stored position of `page`.
    pub fn cursor_position<H: PortIo + ?Sized>(
        &self,
        hw: &mut H,
        page: u8,
    ) -> Result<(CursorShape, CursorPos)> {
        let slot = check_page(page)?;
        Ok((self.cursor_shape(hw), self.state.cursor[slot]))
    }

    /// Makes `page` visible and moves the hardware cursor to its stored position.
    pub fn set_active_page<H: PortIo + ?Sized>(&mut self, hw: &mut H, page: u8) -> Result<()> {
        let slot = check_page(page)?;
        let [hi, lo] = self.state.page_start(page).to_be_bytes();

        let crtc = self.crtc();
        hw.write_reg_split(crtc, CRTC_START_ADDRESS_HIGH, hi);
        hw.write_reg_split(crtc, CRTC_START_ADDRESS_LOW, lo);
        self.state.active_page = page;
        self.apply_cursor(hw, self.state.cursor[slot]);

        debug!(page, start = u16::from_be_bytes([hi, lo]), "active page changed");
        Ok(())
    }

    pub(crate) fn cursor_of(&self, page: u8) -> Result<CursorPos> {
        check_page(page).map(|slot| self.state.cursor[slot])
    }

    pub(crate) fn apply_cursor<H: PortIo + ?Sized>(&self, hw: &mut H, pos: CursorPos) {
        let [hi, lo] = self.state.cell_index(pos).to_be_bytes();
        let crtc = self.crtc();
        hw.write_reg_split(crtc, CRTC_CURSOR_LOCATION_HIGH, hi);
        hw.write_reg_split(crtc, CRTC_CURSOR_LOCATION_LOW, lo);
    }
}
