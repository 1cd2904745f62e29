#![allow(dead_code)]

use vga_bios::{MemoryWindow, PortIo, VideoBios, VideoBiosConfig};
use vga_model::{PortIO, VgaDevice, VGA_LEGACY_MEM_END, VGA_LEGACY_MEM_START};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortAccess {
    In(u16),
    Out(u16, u8),
    OutWord(u16, u16),
}

/// `VgaDevice` plus 1MiB of conventional memory, seen through the BIOS hardware traits.
pub struct ModelHw {
    pub vga: VgaDevice,
    pub ram: Vec<u8>,
    pub ports: Vec<PortAccess>,
    window: u16,
}

impl ModelHw {
    pub fn new() -> Self {
        Self {
            vga: VgaDevice::new(),
            ram: vec![0; 0x10_0000],
            ports: Vec::new(),
            window: 0,
        }
    }

    /// Port writes only, in order.
    pub fn port_writes(&self) -> Vec<PortAccess> {
        self.ports
            .iter()
            .copied()
            .filter(|a| !matches!(a, PortAccess::In(_)))
            .collect()
    }

    /// Copies `bytes` into conventional memory at `addr`.
    pub fn load(&mut self, addr: u32, bytes: &[u8]) {
        let addr = addr as usize;
        self.ram[addr..addr + bytes.len()].copy_from_slice(bytes);
    }

    fn read_phys(&mut self, addr: u32) -> u8 {
        let addr = addr & 0xF_FFFF;
        if (VGA_LEGACY_MEM_START..=VGA_LEGACY_MEM_END).contains(&addr) {
            self.vga.mem_read_u8(addr)
        } else {
            self.ram[addr as usize]
        }
    }

    fn write_phys(&mut self, addr: u32, value: u8) {
        let addr = addr & 0xF_FFFF;
        if (VGA_LEGACY_MEM_START..=VGA_LEGACY_MEM_END).contains(&addr) {
            self.vga.mem_write_u8(addr, value);
        } else {
            self.ram[addr as usize] = value;
        }
    }

    fn linear(&self, offset: u16) -> u32 {
        ((self.window as u32) << 4) + offset as u32
    }
}

impl PortIo for ModelHw {
    fn in_u8(&mut self, port: u16) -> u8 {
        self.ports.push(PortAccess::In(port));
        self.vga.port_read_u8(port)
    }

    fn out_u8(&mut self, port: u16, value: u8) {
        self.ports.push(PortAccess::Out(port, value));
        self.vga.port_write_u8(port, value);
    }

    fn out_u16(&mut self, port: u16, value: u16) {
        self.ports.push(PortAccess::OutWord(port, value));
        self.vga.port_write(port, 2, value as u32);
    }
}

impl MemoryWindow for ModelHw {
    fn window_segment(&self) -> u16 {
        self.window
    }

    fn set_window_segment(&mut self, segment: u16) {
        self.window = segment;
    }

    fn read_u8(&mut self, offset: u16) -> u8 {
        let addr = self.linear(offset);
        self.read_phys(addr)
    }

    fn write_u8(&mut self, offset: u16, value: u8) {
        let addr = self.linear(offset);
        self.write_phys(addr, value);
    }

    fn read_linear_u8(&mut self, addr: u32) -> u8 {
        self.read_phys(addr)
    }
}

/// A service that has run POST against a fresh device.
pub fn booted(config: VideoBiosConfig) -> (VideoBios, ModelHw) {
    let mut bios = VideoBios::new(config);
    let mut hw = ModelHw::new();
    bios.post(&mut hw).expect("POST with the default initial mode");
    hw.ports.clear();
    (bios, hw)
}

/// Plane offset of cell `(x, y)` on `page`.
pub fn cell_offset(bios: &VideoBios, page: u8, x: u8, y: u8) -> usize {
    let state = bios.state();
    state.page_start(page) as usize / 2 + state.columns as usize * y as usize + x as usize
}

/// `(character, attribute)` at `(x, y)` on `page`, read straight from planes 0 and 1.
pub fn cell(bios: &VideoBios, hw: &ModelHw, page: u8, x: u8, y: u8) -> (u8, u8) {
    hw.vga.text_cell(cell_offset(bios, page, x, y))
}

/// Writes a cell straight into planes 0 and 1.
pub fn put_cell(bios: &VideoBios, hw: &mut ModelHw, page: u8, x: u8, y: u8, chr: u8, attr: u8) {
    let off = cell_offset(bios, page, x, y);
    hw.vga.plane_mut(0)[off] = chr;
    hw.vga.plane_mut(1)[off] = attr;
}

/// Fills the whole active geometry of `page` with distinct characters per row.
///
/// Row `y` holds `b'0' + y` with attribute `0x10 + y`.
pub fn fill_rows(bios: &VideoBios, hw: &mut ModelHw, page: u8) {
    let (columns, rows) = (bios.state().columns, bios.state().rows);
    for y in 0..rows {
        for x in 0..columns {
            put_cell(bios, hw, page, x, y, b'0' + y, 0x10 + y);
        }
    }
}
