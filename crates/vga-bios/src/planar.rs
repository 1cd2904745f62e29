//! Scoped access to plane memory.
//!
//! Every transfer runs inside a [`PlanarSession`]: opening one captures the registers that
//! control plane selection, reprograms them for the requested [`PlaneAccess`] and points the
//! memory window at the aperture. Dropping it puts the window back first and then the
//! registers, so no exit path can leak the transfer configuration to the next call.

use core::ops::{Deref, DerefMut};

use tracing::trace;

use crate::io::{MemoryWindow, PortIo, RegisterFile, VgaHardware, VgaRegisters};
use crate::regs::{
    GraphicsMisc, GraphicsMode, MemoryMap, PlaneMask, SeqMemoryMode, GC_MISC, GC_MODE,
    GC_READ_MAP, SEQ_MAP_MASK, SEQ_MEMORY_MODE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneAccess {
    /// Planes 0 and 1 through odd/even addressing: even offsets are characters, odd offsets
    /// attributes. Mapped at `B8000`.
    Interleaved,
    /// Sequential addressing with explicit write mask and read plane. Mapped at `A0000`.
    Planar { write: PlaneMask, read: u8 },
}

impl PlaneAccess {
    /// Write and read a single plane.
    pub fn plane(plane: u8) -> Self {
        Self::Planar {
            write: PlaneMask::single(plane),
            read: plane & 0x03,
        }
    }

    /// Window segment for a page starting at `page_start` in the interleaved view.
    fn window_segment(self, page_start: u16) -> u16 {
        match self {
            Self::Interleaved => MemoryMap::B8000.segment().wrapping_add(page_start >> 4),
            // One interleaved byte pair is one plane byte.
            Self::Planar { .. } => MemoryMap::A0000Wide.segment().wrapping_add(page_start >> 5),
        }
    }
}

/// Registers a session reprograms, in capture order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedRegisterSet {
    pub seq_map_mask: u8,
    pub seq_memory_mode: u8,
    pub gc_read_map: u8,
    pub gc_mode: u8,
    pub gc_misc: u8,
}

impl SavedRegisterSet {
    pub fn capture<H: PortIo + ?Sized>(hw: &mut H) -> Self {
        Self {
            seq_map_mask: hw.read_reg(RegisterFile::Sequencer, SEQ_MAP_MASK),
            seq_memory_mode: hw.read_reg(RegisterFile::Sequencer, SEQ_MEMORY_MODE),
            gc_read_map: hw.read_reg(RegisterFile::Graphics, GC_READ_MAP),
            gc_mode: hw.read_reg(RegisterFile::Graphics, GC_MODE),
            gc_misc: hw.read_reg(RegisterFile::Graphics, GC_MISC),
        }
    }

    pub fn restore<H: PortIo + ?Sized>(&self, hw: &mut H) {
        hw.write_reg_split(RegisterFile::Sequencer, SEQ_MAP_MASK, self.seq_map_mask);
        hw.write_reg_split(RegisterFile::Sequencer, SEQ_MEMORY_MODE, self.seq_memory_mode);
        hw.write_reg_split(RegisterFile::Graphics, GC_READ_MAP, self.gc_read_map);
        hw.write_reg_split(RegisterFile::Graphics, GC_MODE, self.gc_mode);
        hw.write_reg_split(RegisterFile::Graphics, GC_MISC, self.gc_misc);
    }
}

pub struct PlanarSession<'a, H: VgaHardware + ?Sized> {
    hw: &'a mut H,
    saved: SavedRegisterSet,
    saved_window: u16,
}

impl<'a, H: VgaHardware + ?Sized> PlanarSession<'a, H> {
    /// Opens a session over the page starting at `page_start` (interleaved-view bytes).
    pub fn open(hw: &'a mut H, access: PlaneAccess, page_start: u16) -> Self {
        let saved = SavedRegisterSet::capture(hw);
        let saved_window = hw.window_segment();
        let misc = GraphicsMisc::from_bits(saved.gc_misc);

        let (map_mask, memory_mode, read_map, mode, misc) = match access {
            PlaneAccess::Interleaved => (
                PlaneMask::PLANE0 | PlaneMask::PLANE1,
                SeqMemoryMode::EXTENDED_MEMORY,
                0,
                GraphicsMode::default().with_odd_even(true),
                misc.with_chain_odd_even(true)
                    .with_memory_map(MemoryMap::B8000),
            ),
            PlaneAccess::Planar { write, read } => (
                write,
                SeqMemoryMode::EXTENDED_MEMORY | SeqMemoryMode::ODD_EVEN_DISABLE,
                read & 0x03,
                GraphicsMode::default(),
                misc.with_chain_odd_even(false)
                    .with_memory_map(MemoryMap::A0000Wide),
            ),
        };

        hw.write_reg(RegisterFile::Sequencer, SEQ_MAP_MASK, map_mask.bits());
        hw.write_reg(RegisterFile::Sequencer, SEQ_MEMORY_MODE, memory_mode.bits());
        hw.write_reg(RegisterFile::Graphics, GC_READ_MAP, read_map);
        hw.write_reg(RegisterFile::Graphics, GC_MODE, mode.bits());
        hw.write_reg(RegisterFile::Graphics, GC_MISC, misc.bits());

        let segment = access.window_segment(page_start);
        hw.set_window_segment(segment);
        trace!(?access, segment = format_args!("{segment:#06x}"), "planar session opened");

        Self {
            hw,
            saved,
            saved_window,
        }
    }

    /// Switches a planar session to writing and reading `plane` only.
    pub fn select_plane(&mut self, plane: u8) {
        self.hw.write_reg(
            RegisterFile::Sequencer,
            SEQ_MAP_MASK,
            PlaneMask::single(plane).bits(),
        );
        self.hw
            .write_reg(RegisterFile::Graphics, GC_READ_MAP, plane & 0x03);
    }

    pub fn saved(&self) -> &SavedRegisterSet {
        &self.saved
    }
}

impl<H: VgaHardware + ?Sized> Deref for PlanarSession<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        &*self.hw
    }
}

impl<H: VgaHardware + ?Sized> DerefMut for PlanarSession<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        &mut *self.hw
    }
}

impl<H: VgaHardware + ?Sized> Drop for PlanarSession<'_, H> {
    fn drop(&mut self) {
        self.hw.set_window_segment(self.saved_window);
        self.saved.restore(self.hw);
        trace!("planar session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Access, RecordingHw};
    use pretty_assertions::assert_eq;

    fn text_mode_hw() -> RecordingHw {
        let mut hw = RecordingHw::new();
        hw.sequencer[2] = 0x03;
        hw.sequencer[4] = 0x02;
        hw.graphics[5] = 0x10;
        hw.graphics[6] = 0x0E;
        hw.set_window_segment(0x1234);
        hw.log.clear();
        hw
    }

    #[test]
    fn session_saves_programs_and_restores_in_order() {
        let mut hw = text_mode_hw();
        {
            let session = PlanarSession::open(&mut hw, PlaneAccess::plane(0), 0x0800);
            assert_eq!(session.window_segment(), 0xA040);
        }

        assert_eq!(
            hw.log,
            vec![
                Access::OutByte(0x3C4, 0x02),
                Access::InByte(0x3C5, 0x03),
                Access::OutByte(0x3C4, 0x04),
                Access::InByte(0x3C5, 0x02),
                Access::OutByte(0x3CE, 0x04),
                Access::InByte(0x3CF, 0x00),
                Access::OutByte(0x3CE, 0x05),
                Access::InByte(0x3CF, 0x10),
                Access::OutByte(0x3CE, 0x06),
                Access::InByte(0x3CF, 0x0E),
                Access::OutWord(0x3C4, 0x0102),
                Access::OutWord(0x3C4, 0x0604),
                Access::OutWord(0x3CE, 0x0004),
                Access::OutWord(0x3CE, 0x0005),
                Access::OutWord(0x3CE, 0x0006),
                Access::Window(0xA040),
                Access::Window(0x1234),
                Access::OutByte(0x3C4, 0x02),
                Access::OutByte(0x3C5, 0x03),
                Access::OutByte(0x3C4, 0x04),
                Access::OutByte(0x3C5, 0x02),
                Access::OutByte(0x3CE, 0x04),
                Access::OutByte(0x3CF, 0x00),
                Access::OutByte(0x3CE, 0x05),
                Access::OutByte(0x3CF, 0x10),
                Access::OutByte(0x3CE, 0x06),
                Access::OutByte(0x3CF, 0x0E),
            ]
        );
        assert_eq!(hw.window_segment(), 0x1234);
    }

    #[test]
    fn interleaved_session_maps_the_text_aperture() {
        let mut hw = text_mode_hw();
        hw.graphics[6] = 0x05;
        {
            let session = PlanarSession::open(&mut hw, PlaneAccess::Interleaved, 0x1000);
            assert_eq!(session.window_segment(), 0xB900);
            assert_eq!(session.saved().gc_misc, 0x05);
        }
        assert_eq!(hw.graphics[6], 0x05);
        assert!(hw.writes().contains(&Access::OutWord(0x3CE, 0x0F06)));
    }

    #[test]
    fn select_plane_reprograms_mask_and_read_map() {
        let mut hw = text_mode_hw();
        {
            let mut session = PlanarSession::open(&mut hw, PlaneAccess::plane(0), 0);
            session.select_plane(1);
            assert_eq!((session.sequencer[2], session.graphics[4]), (0x02, 0x01));
        }
        assert_eq!((hw.sequencer[2], hw.graphics[4]), (0x03, 0x00));
    }

    #[test]
    fn zero_length_transfer_still_restores() {
        let mut hw = text_mode_hw();
        {
            let mut session = PlanarSession::open(&mut hw, PlaneAccess::plane(1), 0);
            session.fill(0, 0, 0);
        }
        assert_eq!(hw.sequencer[4], 0x02);
        assert_eq!(hw.graphics[5], 0x10);
        assert_eq!(hw.window_segment(), 0x1234);
    }
}
