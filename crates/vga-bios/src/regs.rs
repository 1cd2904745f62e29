//! Register indices and bit-packed register values.

use bitflags::bitflags;

// Sequencer.
pub const SEQ_MAP_MASK: u8 = 0x02;
pub const SEQ_CHAR_FONT: u8 = 0x03;
pub const SEQ_MEMORY_MODE: u8 = 0x04;

// Graphics Controller.
pub const GC_SET_RESET: u8 = 0x00;
pub const GC_ENABLE_SET_RESET: u8 = 0x01;
pub const GC_DATA_ROTATE: u8 = 0x03;
pub const GC_READ_MAP: u8 = 0x04;
pub const GC_MODE: u8 = 0x05;
pub const GC_MISC: u8 = 0x06;
pub const GC_BIT_MASK: u8 = 0x08;

// CRT Controller.
pub const CRTC_HORIZONTAL_DISPLAY_END: u8 = 0x01;
pub const CRTC_MAX_SCAN_LINE: u8 = 0x09;
pub const CRTC_CURSOR_START: u8 = 0x0A;
pub const CRTC_CURSOR_END: u8 = 0x0B;
pub const CRTC_START_ADDRESS_HIGH: u8 = 0x0C;
pub const CRTC_START_ADDRESS_LOW: u8 = 0x0D;
pub const CRTC_CURSOR_LOCATION_HIGH: u8 = 0x0E;
pub const CRTC_CURSOR_LOCATION_LOW: u8 = 0x0F;
pub const CRTC_VERTICAL_DISPLAY_END: u8 = 0x12;

// Attribute Controller.
pub const ATTR_MODE_CONTROL: u8 = 0x10;

/// Setting this bit in the attribute index hands the palette back to the display.
pub const ATTR_PALETTE_ADDRESS_SOURCE: u8 = 0x20;

bitflags! {
    /// Sequencer Memory Mode (index 4).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SeqMemoryMode: u8 {
        const EXTENDED_MEMORY = 1 << 1;
        const ODD_EVEN_DISABLE = 1 << 2;
        const CHAIN4 = 1 << 3;
    }
}

bitflags! {
    /// Sequencer Map Mask (index 2).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PlaneMask: u8 {
        const PLANE0 = 1 << 0;
        const PLANE1 = 1 << 1;
        const PLANE2 = 1 << 2;
        const PLANE3 = 1 << 3;
    }
}

impl PlaneMask {
    /// Mask enabling only `plane` (0-3).
    pub fn single(plane: u8) -> Self {
        Self::from_bits_truncate(1 << (plane & 0x03))
    }
}

/// Graphics Controller Mode register (index 5).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphicsMode(u8);

impl GraphicsMode {
    const WRITE_MODE: u8 = 0x03;
    const READ_MODE: u8 = 1 << 3;
    const ODD_EVEN: u8 = 1 << 4;
    const SHIFT_REGISTER: u8 = 0x03 << 5;

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn write_mode(self) -> u8 {
        self.0 & Self::WRITE_MODE
    }

    pub const fn with_write_mode(self, mode: u8) -> Self {
        Self((self.0 & !Self::WRITE_MODE) | (mode & Self::WRITE_MODE))
    }

    pub const fn read_mode(self) -> u8 {
        (self.0 & Self::READ_MODE) >> 3
    }

    pub const fn odd_even(self) -> bool {
        self.0 & Self::ODD_EVEN != 0
    }

    pub const fn with_odd_even(self, enabled: bool) -> Self {
        if enabled {
            Self(self.0 | Self::ODD_EVEN)
        } else {
            Self(self.0 & !Self::ODD_EVEN)
        }
    }

    /// 0: planar, 1: CGA interleaved, 2-3: 256-colour.
    pub const fn shift_register(self) -> u8 {
        (self.0 & Self::SHIFT_REGISTER) >> 5
    }

    pub const fn with_shift_register(self, shift: u8) -> Self {
        Self((self.0 & !Self::SHIFT_REGISTER) | ((shift << 5) & Self::SHIFT_REGISTER))
    }
}

/// Host memory window decoded by the Graphics Controller (misc bits 2-3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryMap {
    /// `A0000-BFFFF`.
    A0000Wide = 0,
    /// `A0000-AFFFF`.
    A0000 = 1,
    /// `B0000-B7FFF`.
    B0000 = 2,
    /// `B8000-BFFFF`.
    B8000 = 3,
}

impl MemoryMap {
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::A0000Wide,
            1 => Self::A0000,
            2 => Self::B0000,
            _ => Self::B8000,
        }
    }

    /// Real-mode segment of the aperture base.
    pub const fn segment(self) -> u16 {
        match self {
            Self::A0000Wide | Self::A0000 => 0xA000,
            Self::B0000 => 0xB000,
            Self::B8000 => 0xB800,
        }
    }
}

/// Graphics Controller Miscellaneous register (index 6).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphicsMisc(u8);

impl GraphicsMisc {
    const GRAPHICS: u8 = 1 << 0;
    const CHAIN_ODD_EVEN: u8 = 1 << 1;
    const MEMORY_MAP: u8 = 0x03 << 2;

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Alphanumeric mode disabled.
    pub const fn graphics(self) -> bool {
        self.0 & Self::GRAPHICS != 0
    }

    pub const fn with_graphics(self, enabled: bool) -> Self {
        if enabled {
            Self(self.0 | Self::GRAPHICS)
        } else {
            Self(self.0 & !Self::GRAPHICS)
        }
    }

    pub const fn chain_odd_even(self) -> bool {
        self.0 & Self::CHAIN_ODD_EVEN != 0
    }

    pub const fn with_chain_odd_even(self, enabled: bool) -> Self {
        if enabled {
            Self(self.0 | Self::CHAIN_ODD_EVEN)
        } else {
            Self(self.0 & !Self::CHAIN_ODD_EVEN)
        }
    }

    pub const fn memory_map(self) -> MemoryMap {
        MemoryMap::from_bits((self.0 & Self::MEMORY_MAP) >> 2)
    }

    pub const fn with_memory_map(self, map: MemoryMap) -> Self {
        Self((self.0 & !Self::MEMORY_MAP) | ((map as u8) << 2))
    }
}

/// Text cursor scan-line range (CRTC 0x0A/0x0B).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorShape {
    pub start: u8,
    pub end: u8,
}

impl CursorShape {
    /// The end register only has five scan-line bits.
    pub const END_MASK: u8 = 0x1F;

    pub const fn new(start: u8, end: u8) -> Self {
        Self {
            start,
            end: end & Self::END_MASK,
        }
    }
}

impl Default for CursorShape {
    fn default() -> Self {
        Self::new(6, 7)
    }
}
