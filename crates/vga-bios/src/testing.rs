//! Recording hardware double for unit tests.

use crate::io::{MemoryWindow, PortIo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    OutByte(u16, u8),
    OutWord(u16, u16),
    InByte(u16, u8),
    Window(u16),
}

/// Index/data register files plus a flat 1MiB address space, with every access logged in order.
pub struct RecordingHw {
    pub log: Vec<Access>,
    pub sequencer: [u8; 8],
    pub graphics: [u8; 16],
    pub crtc: [u8; 0x20],
    seq_index: u8,
    gc_index: u8,
    crtc_index: u8,
    window: u16,
    pub memory: Vec<u8>,
}

impl RecordingHw {
    pub fn new() -> Self {
        Self {
            log: Vec::new(),
            sequencer: [0; 8],
            graphics: [0; 16],
            crtc: [0; 0x20],
            seq_index: 0,
            gc_index: 0,
            crtc_index: 0,
            window: 0,
            memory: vec![0; 0x10_0000],
        }
    }

    /// Port writes only, in order.
    pub fn writes(&self) -> Vec<Access> {
        self.log
            .iter()
            .copied()
            .filter(|a| matches!(a, Access::OutByte(..) | Access::OutWord(..)))
            .collect()
    }

    fn apply(&mut self, port: u16, value: u8) {
        match port {
            0x3C4 => self.seq_index = value,
            0x3C5 => self.sequencer[(self.seq_index & 0x07) as usize] = value,
            0x3CE => self.gc_index = value,
            0x3CF => self.graphics[(self.gc_index & 0x0F) as usize] = value,
            0x3B4 | 0x3D4 => self.crtc_index = value,
            0x3B5 | 0x3D5 => self.crtc[(self.crtc_index & 0x1F) as usize] = value,
            _ => {}
        }
    }

    fn linear(&self, offset: u16) -> usize {
        ((self.window as usize) << 4) + offset as usize
    }
}

impl PortIo for RecordingHw {
    fn in_u8(&mut self, port: u16) -> u8 {
        let value = match port {
            0x3C5 => self.sequencer[(self.seq_index & 0x07) as usize],
            0x3CF => self.graphics[(self.gc_index & 0x0F) as usize],
            0x3B5 | 0x3D5 => self.crtc[(self.crtc_index & 0x1F) as usize],
            _ => 0,
        };
        self.log.push(Access::InByte(port, value));
        value
    }

    fn out_u8(&mut self, port: u16, value: u8) {
        self.log.push(Access::OutByte(port, value));
        self.apply(port, value);
    }

    fn out_u16(&mut self, port: u16, value: u16) {
        self.log.push(Access::OutWord(port, value));
        let [lo, hi] = value.to_le_bytes();
        self.apply(port, lo);
        self.apply(port.wrapping_add(1), hi);
    }
}

impl MemoryWindow for RecordingHw {
    fn window_segment(&self) -> u16 {
        self.window
    }

    fn set_window_segment(&mut self, segment: u16) {
        self.log.push(Access::Window(segment));
        self.window = segment;
    }

    fn read_u8(&mut self, offset: u16) -> u8 {
        let addr = self.linear(offset);
        self.memory[addr & 0xF_FFFF]
    }

    fn write_u8(&mut self, offset: u16, value: u8) {
        let addr = self.linear(offset);
        self.memory[addr & 0xF_FFFF] = value;
    }

    fn read_linear_u8(&mut self, addr: u32) -> u8 {
        self.memory[(addr & 0xF_FFFF) as usize]
    }
}
