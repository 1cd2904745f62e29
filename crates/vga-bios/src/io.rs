//! Register programming primitives.
//!
//! Everything the video service does to the hardware goes through two narrow capabilities:
//! [`PortIo`] for the VGA register ports and [`MemoryWindow`] for the relocatable memory window
//! through which plane memory is visible. Platform backends implement the handful of required
//! methods; the block transfers have byte-at-a-time defaults that backends may override.

/// Sequencer index port; data follows at `+1`.
pub const SEQ_INDEX: u16 = 0x3C4;

/// Graphics Controller index port; data follows at `+1`.
pub const GC_INDEX: u16 = 0x3CE;

/// Attribute Controller index/data port (flip-flop multiplexed).
pub const ATTR_INDEX_DATA: u16 = 0x3C0;

/// Miscellaneous Output register (write).
pub const MISC_OUTPUT_WRITE: u16 = 0x3C2;

/// DAC ports.
pub const DAC_WRITE_INDEX: u16 = 0x3C8;
pub const DAC_DATA: u16 = 0x3C9;

/// Byte-wide port access.
pub trait PortIo {
    fn in_u8(&mut self, port: u16) -> u8;
    fn out_u8(&mut self, port: u16, value: u8);

    /// Word write: low byte to `port`, high byte to `port + 1`.
    ///
    /// On an index port this programs index and data in one access.
    fn out_u16(&mut self, port: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.out_u8(port, lo);
        self.out_u8(port.wrapping_add(1), hi);
    }
}

/// The relocatable memory window.
///
/// The window is addressed like a real-mode segment: `segment * 16 + offset`, with 16-bit
/// offsets that wrap.
pub trait MemoryWindow {
    fn window_segment(&self) -> u16;
    fn set_window_segment(&mut self, segment: u16);

    fn read_u8(&mut self, offset: u16) -> u8;
    fn write_u8(&mut self, offset: u16, value: u8);

    /// Reads caller memory outside the window (string buffers and the like).
    fn read_linear_u8(&mut self, addr: u32) -> u8;

    fn read_u16(&mut self, offset: u16) -> u16 {
        let lo = self.read_u8(offset) as u16;
        let hi = self.read_u8(offset.wrapping_add(1)) as u16;
        lo | (hi << 8)
    }

    fn write_u16(&mut self, offset: u16, value: u16) {
        self.write_u8(offset, (value & 0xFF) as u8);
        self.write_u8(offset.wrapping_add(1), (value >> 8) as u8);
    }

    /// Forward byte copy within the window.
    fn copy(&mut self, dst: u16, src: u16, len: usize) {
        for i in 0..len {
            let b = self.read_u8(src.wrapping_add(i as u16));
            self.write_u8(dst.wrapping_add(i as u16), b);
        }
    }

    fn fill(&mut self, dst: u16, value: u8, len: usize) {
        for i in 0..len {
            self.write_u8(dst.wrapping_add(i as u16), value);
        }
    }

    /// Fills `count` consecutive little-endian words.
    fn fill_u16(&mut self, dst: u16, value: u16, count: usize) {
        for i in 0..count {
            self.write_u16(dst.wrapping_add((i * 2) as u16), value);
        }
    }

    /// Copies `len` bytes of caller memory at linear `src` into the window.
    fn copy_from_linear(&mut self, dst: u16, src: u32, len: usize) {
        for i in 0..len {
            let b = self.read_linear_u8(src.wrapping_add(i as u32));
            self.write_u8(dst.wrapping_add(i as u16), b);
        }
    }
}

/// Everything the video service needs from the platform.
pub trait VgaHardware: PortIo + MemoryWindow {}

impl<T: PortIo + MemoryWindow + ?Sized> VgaHardware for T {}

/// Which CRT controller port pair is decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CrtcIo {
    /// `0x3B4/0x3B5`.
    #[default]
    Mono,
    /// `0x3D4/0x3D5`.
    Color,
}

impl CrtcIo {
    pub const fn index_port(self) -> u16 {
        match self {
            Self::Mono => 0x3B4,
            Self::Color => 0x3D4,
        }
    }

    pub const fn data_port(self) -> u16 {
        self.index_port() + 1
    }

    /// Input Status 1; reading it resets the attribute controller flip-flop.
    pub const fn input_status_port(self) -> u16 {
        match self {
            Self::Mono => 0x3BA,
            Self::Color => 0x3DA,
        }
    }
}

/// An index/data register group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterFile {
    Sequencer,
    Graphics,
    Crtc(CrtcIo),
}

impl RegisterFile {
    pub const fn index_port(self) -> u16 {
        match self {
            Self::Sequencer => SEQ_INDEX,
            Self::Graphics => GC_INDEX,
            Self::Crtc(io) => io.index_port(),
        }
    }

    pub const fn data_port(self) -> u16 {
        self.index_port() + 1
    }
}

/// 6-bit DAC colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// Index-then-data register access on top of [`PortIo`].
pub trait VgaRegisters: PortIo {
    /// Single word write to the index port (`out dx, ax` with AL=index, AH=value).
    fn write_reg(&mut self, file: RegisterFile, index: u8, value: u8) {
        self.out_u16(file.index_port(), u16::from_le_bytes([index, value]));
    }

    /// Separate index and data byte writes.
    fn write_reg_split(&mut self, file: RegisterFile, index: u8, value: u8) {
        self.out_u8(file.index_port(), index);
        self.out_u8(file.data_port(), value);
    }

    fn read_reg(&mut self, file: RegisterFile, index: u8) -> u8 {
        self.out_u8(file.index_port(), index);
        self.in_u8(file.data_port())
    }

    /// Writes one attribute controller register. The caller must have reset the flip-flop.
    fn write_attribute(&mut self, index: u8, value: u8) {
        self.out_u8(ATTR_INDEX_DATA, index);
        self.out_u8(ATTR_INDEX_DATA, value);
    }

    /// Streams `colors` into the DAC starting at entry `start`.
    fn write_dac(&mut self, start: u8, colors: &[Rgb]) {
        self.out_u8(DAC_WRITE_INDEX, start);
        for c in colors {
            self.out_u8(DAC_DATA, c.red);
            self.out_u8(DAC_DATA, c.green);
            self.out_u8(DAC_DATA, c.blue);
        }
    }
}

impl<T: PortIo + ?Sized> VgaRegisters for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Access, RecordingHw};
    use pretty_assertions::assert_eq;

    #[test]
    fn write_reg_is_one_word_access_to_the_index_port() {
        let mut hw = RecordingHw::new();
        hw.write_reg(RegisterFile::Sequencer, 0x02, 0x0F);
        hw.write_reg(RegisterFile::Crtc(CrtcIo::Color), 0x0E, 0x01);

        assert_eq!(
            hw.log,
            vec![
                Access::OutWord(0x3C4, 0x0F02),
                Access::OutWord(0x3D4, 0x010E),
            ]
        );
        assert_eq!(hw.sequencer[0x02], 0x0F);
    }

    #[test]
    fn read_reg_selects_index_then_reads_data() {
        let mut hw = RecordingHw::new();
        hw.graphics[0x06] = 0x0E;

        assert_eq!(hw.read_reg(RegisterFile::Graphics, 0x06), 0x0E);
        assert_eq!(
            hw.log,
            vec![Access::OutByte(0x3CE, 0x06), Access::InByte(0x3CF, 0x0E)]
        );
    }

    #[test]
    fn dac_stream_writes_index_then_rgb_triplets() {
        let mut hw = RecordingHw::new();
        hw.write_dac(0x10, &[Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)]);

        let data: Vec<_> = hw.log.iter().skip(1).copied().collect();
        assert_eq!(hw.log[0], Access::OutByte(DAC_WRITE_INDEX, 0x10));
        assert_eq!(
            data,
            (1..=6).map(|v| Access::OutByte(DAC_DATA, v)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn default_block_transfers_wrap_within_the_segment() {
        let mut hw = RecordingHw::new();
        hw.set_window_segment(0xB800);
        hw.fill(0xFFFF, 0xAA, 2);

        assert_eq!(hw.read_u8(0xFFFF), 0xAA);
        assert_eq!(hw.read_u8(0x0000), 0xAA);

        hw.fill_u16(0x0010, 0x0741, 2);
        hw.copy(0x0020, 0x0010, 4);
        assert_eq!(hw.read_u16(0x0022), 0x0741);
    }
}
