//! Direct hardware access on x86 machines with the VGA aperture identity mapped.

use core::arch::asm;

use crate::io::{MemoryWindow, PortIo};

#[inline]
unsafe fn outb(port: u16, value: u8) {
    asm!(
        "out dx, al",
        in("dx") port,
        in("al") value,
        options(nomem, nostack, preserves_flags)
    );
}

#[inline]
unsafe fn outw(port: u16, value: u16) {
    asm!(
        "out dx, ax",
        in("dx") port,
        in("ax") value,
        options(nomem, nostack, preserves_flags)
    );
}

#[inline]
unsafe fn inb(port: u16) -> u8 {
    let value: u8;
    asm!(
        "in al, dx",
        in("dx") port,
        out("al") value,
        options(nomem, nostack, preserves_flags)
    );
    value
}

/// The adapter behind real I/O ports and physical memory.
///
/// The memory window is emulated in software: `segment * 16 + offset` is dereferenced as a
/// physical address.
#[derive(Debug)]
pub struct PhysicalVga {
    window: u16,
}

impl PhysicalVga {
    /// # Safety
    ///
    /// The caller must have exclusive access to the VGA ports, and the first MiB of physical
    /// memory must be identity mapped and writable. Only one instance may exist at a time.
    pub unsafe fn new() -> Self {
        Self { window: 0xB800 }
    }

    fn linear(&self, offset: u16) -> usize {
        ((self.window as usize) << 4) + offset as usize
    }
}

impl PortIo for PhysicalVga {
    fn in_u8(&mut self, port: u16) -> u8 {
        // SAFETY: port access was granted when `self` was constructed.
        unsafe { inb(port) }
    }

    fn out_u8(&mut self, port: u16, value: u8) {
        // SAFETY: as above.
        unsafe { outb(port, value) }
    }

    fn out_u16(&mut self, port: u16, value: u16) {
        // SAFETY: as above.
        unsafe { outw(port, value) }
    }
}

impl MemoryWindow for PhysicalVga {
    fn window_segment(&self) -> u16 {
        self.window
    }

    fn set_window_segment(&mut self, segment: u16) {
        self.window = segment;
    }

    fn read_u8(&mut self, offset: u16) -> u8 {
        // SAFETY: low memory is identity mapped per `PhysicalVga::new`.
        unsafe { core::ptr::read_volatile(self.linear(offset) as *const u8) }
    }

    fn write_u8(&mut self, offset: u16, value: u8) {
        // SAFETY: as above.
        unsafe { core::ptr::write_volatile(self.linear(offset) as *mut u8, value) }
    }

    fn read_linear_u8(&mut self, addr: u32) -> u8 {
        // SAFETY: as above.
        unsafe { core::ptr::read_volatile(addr as usize as *const u8) }
    }
}
