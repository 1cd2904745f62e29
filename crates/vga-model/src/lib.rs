//! Register-level VGA device model.
//!
//! The model covers what a video BIOS touches:
//! - the Sequencer, Graphics Controller, CRTC and Attribute Controller register files, each
//!   behind its index/data port pair (CRTC is decoded at both the mono `0x3B4` and color `0x3D4`
//!   bases),
//! - four 64KiB planes with VGA read latches, write modes 0-3 and read modes 0/1,
//! - odd/even and chain-4 host address decode through the Graphics Controller memory map,
//! - the DAC write/read index and 3-byte RGB stream.
//!
//! Nothing is rendered. Tests inspect plane memory and register state directly.

mod decode;

pub use decode::MemoryMap;
use decode::{HostTarget, decode_host_address};

/// Size of VGA plane memory (64KiB).
pub const VGA_PLANE_SIZE: usize = 64 * 1024;

/// Number of bit-planes backing legacy VGA memory.
pub const VGA_PLANE_COUNT: usize = 4;

/// Legacy VGA memory window covering the 128KiB aperture (`A0000-BFFFF`).
pub const VGA_LEGACY_MEM_START: u32 = 0xA0000;
pub const VGA_LEGACY_MEM_END: u32 = 0xBFFFF;

/// Full legacy VGA I/O decode range, including the mono + color CRTC aliasing ranges.
pub const VGA_LEGACY_IO_START: u16 = 0x3B0;
pub const VGA_LEGACY_IO_END: u16 = 0x3DF;

const SEQUENCER_REGS: usize = 5;
const GRAPHICS_REGS: usize = 9;
const CRTC_REGS: usize = 25;
const ATTRIBUTE_REGS: usize = 21;

/// Port I/O trait (shared with whatever drives the device).
pub trait PortIO {
    fn port_read(&mut self, port: u16, size: usize) -> u32;
    fn port_write(&mut self, port: u16, size: usize, val: u32);
}

fn io_all_ones(size: usize) -> u32 {
    match size {
        0 => 0,
        1 => 0xFF,
        2 => 0xFFFF,
        _ => 0xFFFF_FFFF,
    }
}

/// One DAC palette entry, stored as the 6-bit components the guest wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone)]
pub struct VgaDevice {
    misc_output: u8,

    sequencer_index: u8,
    sequencer: [u8; SEQUENCER_REGS],

    graphics_index: u8,
    graphics: [u8; GRAPHICS_REGS],

    crtc_index: u8,
    crtc: [u8; CRTC_REGS],

    attribute_index: u8,
    attribute_flip_flop_data: bool,
    attribute: [u8; ATTRIBUTE_REGS],

    pel_mask: u8,
    dac_write_index: u8,
    dac_write_subindex: u8,
    dac_write_latch: [u8; 3],
    dac_read_index: u8,
    dac_read_subindex: u8,
    dac: [Rgb; 256],

    vram: Vec<u8>,
    latches: [u8; VGA_PLANE_COUNT],
}

impl Default for VgaDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl VgaDevice {
    /// Creates a device in its power-on state: all registers zero except the Graphics
    /// Controller bit mask (0xFF) and the PEL mask (0xFF), planes zeroed.
    pub fn new() -> Self {
        let mut graphics = [0; GRAPHICS_REGS];
        graphics[8] = 0xFF;
        Self {
            misc_output: 0,
            sequencer_index: 0,
            sequencer: [0; SEQUENCER_REGS],
            graphics_index: 0,
            graphics,
            crtc_index: 0,
            crtc: [0; CRTC_REGS],
            attribute_index: 0,
            attribute_flip_flop_data: false,
            attribute: [0; ATTRIBUTE_REGS],
            pel_mask: 0xFF,
            dac_write_index: 0,
            dac_write_subindex: 0,
            dac_write_latch: [0; 3],
            dac_read_index: 0,
            dac_read_subindex: 0,
            dac: [Rgb::default(); 256],
            vram: vec![0; VGA_PLANE_COUNT * VGA_PLANE_SIZE],
            latches: [0; VGA_PLANE_COUNT],
        }
    }

    pub fn misc_output(&self) -> u8 {
        self.misc_output
    }

    pub fn sequencer_reg(&self, idx: u8) -> u8 {
        self.sequencer.get(idx as usize).copied().unwrap_or(0)
    }

    pub fn graphics_reg(&self, idx: u8) -> u8 {
        self.graphics.get(idx as usize).copied().unwrap_or(0)
    }

    pub fn crtc_reg(&self, idx: u8) -> u8 {
        self.crtc.get(idx as usize).copied().unwrap_or(0)
    }

    pub fn attribute_reg(&self, idx: u8) -> u8 {
        self.attribute.get((idx & 0x1F) as usize).copied().unwrap_or(0)
    }

    pub fn dac_entry(&self, idx: u8) -> Rgb {
        self.dac[idx as usize]
    }

    /// Raw contents of one plane.
    pub fn plane(&self, plane: usize) -> &[u8] {
        &self.vram[plane * VGA_PLANE_SIZE..(plane + 1) * VGA_PLANE_SIZE]
    }

    pub fn plane_mut(&mut self, plane: usize) -> &mut [u8] {
        &mut self.vram[plane * VGA_PLANE_SIZE..(plane + 1) * VGA_PLANE_SIZE]
    }

    /// CRTC start address (regs 0x0C/0x0D).
    pub fn start_address(&self) -> u16 {
        u16::from_be_bytes([self.crtc[0x0C], self.crtc[0x0D]])
    }

    /// CRTC cursor location (regs 0x0E/0x0F).
    pub fn cursor_location(&self) -> u16 {
        u16::from_be_bytes([self.crtc[0x0E], self.crtc[0x0F]])
    }

    /// Character and attribute of a text cell, addressed as a plane offset.
    pub fn text_cell(&self, offset: usize) -> (u8, u8) {
        let off = offset & (VGA_PLANE_SIZE - 1);
        (self.vram[off], self.vram[VGA_PLANE_SIZE + off])
    }

    /// Currently decoded host memory map (Graphics Controller misc bits 2-3).
    pub fn memory_map(&self) -> MemoryMap {
        MemoryMap::from_misc(self.graphics[6])
    }

    fn chain4_enabled(&self) -> bool {
        (self.sequencer[4] & 0x08) != 0
    }

    fn odd_even_enabled(&self) -> bool {
        // Odd/even requires the graphics controller bit plus the sequencer not disabling it.
        (self.graphics[5] & 0x10) != 0 && (self.sequencer[4] & 0x04) == 0
    }

    /// Reads from guest physical memory inside the legacy VGA aperture.
    ///
    /// Addresses outside the currently decoded memory map float high.
    pub fn mem_read_u8(&mut self, paddr: u32) -> u8 {
        match decode_host_address(
            self.memory_map(),
            self.chain4_enabled(),
            self.odd_even_enabled(),
            paddr,
        ) {
            Some(HostTarget::Single { plane, off }) => self.vram[plane * VGA_PLANE_SIZE + off],
            Some(HostTarget::Planar { off }) => self.read_u8_planar(off),
            None => 0xFF,
        }
    }

    /// Writes to guest physical memory inside the legacy VGA aperture.
    pub fn mem_write_u8(&mut self, paddr: u32, value: u8) {
        match decode_host_address(
            self.memory_map(),
            self.chain4_enabled(),
            self.odd_even_enabled(),
            paddr,
        ) {
            Some(HostTarget::Single { plane, off }) => {
                // Chained modes still honour the map mask for the selected plane.
                if self.sequencer[2] & (1 << plane) != 0 {
                    self.vram[plane * VGA_PLANE_SIZE + off] = value;
                }
            }
            Some(HostTarget::Planar { off }) => self.write_u8_planar(off, value),
            None => {}
        }
    }

    fn plane_offset(&self, off: usize) -> usize {
        // VGA planes are 64KiB. The 128KiB memory map wraps on real hardware, so we do the same.
        off & (VGA_PLANE_SIZE - 1)
    }

    fn load_latches(&mut self, off: usize) {
        let off = self.plane_offset(off);
        for plane in 0..VGA_PLANE_COUNT {
            self.latches[plane] = self.vram[plane * VGA_PLANE_SIZE + off];
        }
    }

    fn read_u8_planar(&mut self, off: usize) -> u8 {
        self.load_latches(off);
        let read_mode = (self.graphics[5] >> 3) & 0x01;
        if read_mode == 0 {
            let plane = (self.graphics[4] & 0x03) as usize;
            self.latches[plane]
        } else {
            self.read_mode_1_color_compare(self.graphics[2], self.graphics[7])
        }
    }

    fn read_mode_1_color_compare(&self, color_compare: u8, color_dont_care: u8) -> u8 {
        let mut diff = 0u8;
        let compare = color_compare & 0x0F;
        let dont_care = color_dont_care & 0x0F;

        for plane in 0..VGA_PLANE_COUNT {
            let bit = 1u8 << plane;
            // Cleared "don't care" bits exclude the plane from the comparison.
            let care_mask = if dont_care & bit != 0 { 0xFF } else { 0x00 };
            let compare_byte = if compare & bit != 0 { 0xFF } else { 0x00 };
            diff |= (self.latches[plane] ^ compare_byte) & care_mask;
        }

        !diff
    }

    fn alu(func_select: u8, data: u8, latch: u8) -> u8 {
        match func_select & 0x03 {
            0 => data,
            1 => data & latch,
            2 => data | latch,
            _ => data ^ latch,
        }
    }

    fn write_u8_planar(&mut self, off: usize, value: u8) {
        let off = self.plane_offset(off);

        let write_mode = self.graphics[5] & 0x03;
        if write_mode != 1 {
            self.load_latches(off);
        }

        let data_rotate = self.graphics[3];
        let rotate_count = data_rotate & 0x07;
        let func_select = (data_rotate >> 3) & 0x03;
        let bit_mask = self.graphics[8];
        let rotated = value.rotate_right(rotate_count as u32);

        let map_mask = self.sequencer[2] & 0x0F;
        let set_reset = self.graphics[0];
        let enable_set_reset = self.graphics[1];

        for plane in 0..VGA_PLANE_COUNT {
            let bit = 1u8 << plane;
            if map_mask & bit == 0 {
                continue;
            }

            let latch = self.latches[plane];
            let expand = |set: bool| if set { 0xFF } else { 0x00 };
            let result = match write_mode {
                0 => {
                    let data = if enable_set_reset & bit != 0 {
                        expand(set_reset & bit != 0)
                    } else {
                        rotated
                    };
                    let alu = Self::alu(func_select, data, latch);
                    (alu & bit_mask) | (latch & !bit_mask)
                }
                1 => latch,
                2 => {
                    let alu = Self::alu(func_select, expand(value & bit != 0), latch);
                    (alu & bit_mask) | (latch & !bit_mask)
                }
                _ => {
                    let alu = Self::alu(func_select, expand(set_reset & bit != 0), latch);
                    let mask = bit_mask & rotated;
                    (alu & mask) | (latch & !mask)
                }
            };

            self.vram[plane * VGA_PLANE_SIZE + off] = result;
        }
    }

    fn write_dac_data(&mut self, value: u8) {
        let component = self.dac_write_subindex as usize;
        self.dac_write_latch[component] = value & 0x3F;

        self.dac_write_subindex = (self.dac_write_subindex + 1) % 3;
        if self.dac_write_subindex != 0 {
            return;
        }

        let [r, g, b] = self.dac_write_latch;
        self.dac[self.dac_write_index as usize] = Rgb { r, g, b };
        self.dac_write_index = self.dac_write_index.wrapping_add(1);
    }

    fn read_dac_data(&mut self) -> u8 {
        let entry = self.dac[self.dac_read_index as usize];
        let v = match self.dac_read_subindex {
            0 => entry.r,
            1 => entry.g,
            _ => entry.b,
        };
        self.dac_read_subindex = (self.dac_read_subindex + 1) % 3;
        if self.dac_read_subindex == 0 {
            self.dac_read_index = self.dac_read_index.wrapping_add(1);
        }
        v
    }

    fn write_sequencer_reg(&mut self, idx: u8, value: u8) {
        if let Some(reg) = self.sequencer.get_mut(idx as usize) {
            *reg = value;
        }
    }

    fn write_graphics_reg(&mut self, idx: u8, value: u8) {
        if let Some(reg) = self.graphics.get_mut(idx as usize) {
            *reg = value;
        }
    }

    fn write_crtc_reg(&mut self, idx: u8, value: u8) {
        // Vertical retrace end bit 7 write-protects CRTC registers 0-7.
        if idx <= 0x07 && (self.crtc[0x11] & 0x80) != 0 {
            return;
        }
        if let Some(reg) = self.crtc.get_mut(idx as usize) {
            *reg = value;
        }
    }

    fn write_attribute_reg(&mut self, idx: u8, value: u8) {
        if let Some(reg) = self.attribute.get_mut((idx & 0x1F) as usize) {
            *reg = value;
        }
    }

    pub fn port_read_u8(&mut self, port: u16) -> u8 {
        match port {
            // Real hardware reads Misc Output at 0x3CC (0x3C2 is Input Status 0).
            0x3CC => self.misc_output,

            0x3C4 => self.sequencer_index,
            0x3C5 => self.sequencer_reg(self.sequencer_index),

            0x3CE => self.graphics_index,
            0x3CF => self.graphics_reg(self.graphics_index),

            0x3D4 | 0x3B4 => self.crtc_index,
            0x3D5 | 0x3B5 => self.crtc_reg(self.crtc_index),

            0x3C1 => self.attribute_reg(self.attribute_index),

            // Input status 1. Reading resets the attribute flip-flop.
            0x3DA | 0x3BA => {
                self.attribute_flip_flop_data = false;
                0x00
            }

            0x3C6 => self.pel_mask,
            0x3C7 => self.dac_read_index,
            0x3C8 => self.dac_write_index,
            0x3C9 => self.read_dac_data(),

            _ => 0xFF,
        }
    }

    pub fn port_write_u8(&mut self, port: u16, val: u8) {
        match port {
            0x3C2 => self.misc_output = val,

            0x3C4 => self.sequencer_index = val,
            0x3C5 => self.write_sequencer_reg(self.sequencer_index, val),

            0x3CE => self.graphics_index = val,
            0x3CF => self.write_graphics_reg(self.graphics_index, val),

            0x3D4 | 0x3B4 => self.crtc_index = val,
            0x3D5 | 0x3B5 => self.write_crtc_reg(self.crtc_index, val),

            // Attribute controller (index/data with flip-flop).
            0x3C0 => {
                if !self.attribute_flip_flop_data {
                    self.attribute_index = val & 0x1F;
                    self.attribute_flip_flop_data = true;
                } else {
                    self.write_attribute_reg(self.attribute_index, val);
                    self.attribute_flip_flop_data = false;
                }
            }

            0x3C6 => self.pel_mask = val,
            0x3C7 => {
                self.dac_read_index = val;
                self.dac_read_subindex = 0;
            }
            0x3C8 => {
                self.dac_write_index = val;
                self.dac_write_subindex = 0;
            }
            0x3C9 => self.write_dac_data(val),

            _ => {}
        }
    }
}

impl PortIO for VgaDevice {
    fn port_read(&mut self, port: u16, size: usize) -> u32 {
        match size {
            0 => 0,
            1 => u32::from(self.port_read_u8(port)),
            2 => {
                let lo = self.port_read_u8(port);
                let hi = self.port_read_u8(port.wrapping_add(1));
                u32::from(u16::from_le_bytes([lo, hi]))
            }
            _ => io_all_ones(size),
        }
    }

    fn port_write(&mut self, port: u16, size: usize, val: u32) {
        match size {
            1 => self.port_write_u8(port, val as u8),
            2 => {
                // `outw` on an index port writes the index (low byte) then the data (high byte).
                let [b0, b1] = (val as u16).to_le_bytes();
                self.port_write_u8(port, b0);
                self.port_write_u8(port.wrapping_add(1), b1);
            }
            _ => {}
        }
    }
}
