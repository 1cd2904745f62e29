use crate::error::VideoError;
use crate::regs::{GraphicsMisc, GraphicsMode, PlaneMask, SeqMemoryMode};

/// Text geometry groups; every mode in a group programs the same CRTC display-end values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryClass {
    /// 40x25.
    Narrow,
    /// 80x25.
    Wide,
    /// 80x43.
    Tall,
    /// 80x60.
    Tallest,
}

impl GeometryClass {
    pub const fn geometry(self) -> Geometry {
        match self {
            Self::Narrow => Geometry::new(0x28, 0x19),
            Self::Wide => Geometry::new(0x50, 0x19),
            Self::Tall => Geometry::new(0x50, 0x2B),
            Self::Tallest => Geometry::new(0x50, 0x3C),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub columns: u8,
    pub rows: u8,
}

impl Geometry {
    pub const fn new(columns: u8, rows: u8) -> Self {
        Self { columns, rows }
    }
}

/// Everything needed to activate one display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeDescriptor {
    pub mode: u8,
    pub class: GeometryClass,
    /// Stride between pages in the interleaved character/attribute view; 0 for single-page modes.
    pub page_size: u16,
    pub seq_map_mask: PlaneMask,
    /// Character map select, programmed for text modes only.
    pub seq_char_font: Option<u8>,
    pub seq_memory_mode: SeqMemoryMode,
    pub gc_mode: GraphicsMode,
    pub gc_misc: GraphicsMisc,
}

impl ModeDescriptor {
    pub const fn geometry(&self) -> Geometry {
        self.class.geometry()
    }

    pub const fn is_text(&self) -> bool {
        !self.gc_misc.graphics()
    }
}

const fn text(mode: u8, class: GeometryClass, page_size: u16) -> ModeDescriptor {
    ModeDescriptor {
        mode,
        class,
        page_size,
        seq_map_mask: PlaneMask::from_bits_retain(0x03),
        seq_char_font: Some(0x00),
        seq_memory_mode: SeqMemoryMode::from_bits_retain(0x02),
        gc_mode: GraphicsMode::from_bits(0x10),
        gc_misc: GraphicsMisc::from_bits(0x0E),
    }
}

const fn cga4(mode: u8) -> ModeDescriptor {
    ModeDescriptor {
        mode,
        class: GeometryClass::Narrow,
        page_size: 0,
        seq_map_mask: PlaneMask::from_bits_retain(0x03),
        seq_char_font: None,
        seq_memory_mode: SeqMemoryMode::from_bits_retain(0x02),
        gc_mode: GraphicsMode::from_bits(0x30),
        gc_misc: GraphicsMisc::from_bits(0x0F),
    }
}

const fn planar16(mode: u8, class: GeometryClass, page_size: u16) -> ModeDescriptor {
    ModeDescriptor {
        mode,
        class,
        page_size,
        seq_map_mask: PlaneMask::from_bits_retain(0x0F),
        seq_char_font: None,
        seq_memory_mode: SeqMemoryMode::from_bits_retain(0x06),
        gc_mode: GraphicsMode::from_bits(0x00),
        gc_misc: GraphicsMisc::from_bits(0x07),
    }
}

static MODES: [ModeDescriptor; 14] = [
    text(0x00, GeometryClass::Narrow, 0x0800),
    text(0x01, GeometryClass::Narrow, 0x0800),
    text(0x02, GeometryClass::Wide, 0x1000),
    text(0x03, GeometryClass::Wide, 0x1000),
    cga4(0x04),
    cga4(0x05),
    ModeDescriptor {
        mode: 0x06,
        class: GeometryClass::Wide,
        page_size: 0,
        seq_map_mask: PlaneMask::from_bits_retain(0x01),
        seq_char_font: None,
        seq_memory_mode: SeqMemoryMode::from_bits_retain(0x06),
        gc_mode: GraphicsMode::from_bits(0x00),
        gc_misc: GraphicsMisc::from_bits(0x0D),
    },
    planar16(0x0D, GeometryClass::Narrow, 0x2000),
    planar16(0x0E, GeometryClass::Wide, 0x4000),
    planar16(0x0F, GeometryClass::Tall, 0x8000),
    planar16(0x10, GeometryClass::Tall, 0x8000),
    planar16(0x11, GeometryClass::Tallest, 0),
    planar16(0x12, GeometryClass::Tallest, 0),
    ModeDescriptor {
        mode: 0x13,
        class: GeometryClass::Narrow,
        page_size: 0,
        seq_map_mask: PlaneMask::from_bits_retain(0x0F),
        seq_char_font: None,
        seq_memory_mode: SeqMemoryMode::from_bits_retain(0x0E),
        gc_mode: GraphicsMode::from_bits(0x40),
        gc_misc: GraphicsMisc::from_bits(0x01),
    },
];

/// All supported modes, in mode-id order.
pub fn modes() -> &'static [ModeDescriptor] {
    &MODES
}

pub fn lookup(mode: u8) -> Result<&'static ModeDescriptor, VideoError> {
    MODES
        .iter()
        .find(|desc| desc.mode == mode)
        .ok_or(VideoError::UnsupportedMode(mode))
}
