/// Host memory window selected by Graphics Controller misc bits 2-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryMap {
    /// `A0000-BFFFF` (128KiB).
    A0000Wide,
    /// `A0000-AFFFF` (64KiB).
    A0000,
    /// `B0000-B7FFF` (32KiB).
    B0000,
    /// `B8000-BFFFF` (32KiB).
    B8000,
}

impl MemoryMap {
    pub fn from_misc(misc: u8) -> Self {
        match (misc >> 2) & 0x03 {
            0 => Self::A0000Wide,
            1 => Self::A0000,
            2 => Self::B0000,
            _ => Self::B8000,
        }
    }

    /// Physical base and size of the window.
    pub fn range(self) -> (u32, u32) {
        match self {
            Self::A0000Wide => (0xA0000, 0x20000),
            Self::A0000 => (0xA0000, 0x10000),
            Self::B0000 => (0xB0000, 0x08000),
            Self::B8000 => (0xB8000, 0x08000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HostTarget {
    /// Chained access that lands in exactly one plane.
    Single { plane: usize, off: usize },
    /// Sequential planar access through the latches.
    Planar { off: usize },
}

pub(crate) fn decode_host_address(
    map: MemoryMap,
    chain4: bool,
    odd_even: bool,
    paddr: u32,
) -> Option<HostTarget> {
    let (base, size) = map.range();
    if paddr < base || paddr >= base + size {
        return None;
    }
    let off = (paddr - base) as usize;

    if chain4 {
        Some(HostTarget::Single {
            plane: off & 0x03,
            off: (off >> 2) & 0xFFFF,
        })
    } else if odd_even {
        Some(HostTarget::Single {
            plane: off & 0x01,
            off: (off >> 1) & 0xFFFF,
        })
    } else {
        Some(HostTarget::Planar { off })
    }
}
