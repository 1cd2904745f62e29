//! One-time adapter bring-up.

use font8x8::legacy::BASIC_LEGACY;
use tracing::debug;

use crate::error::Result;
use crate::io::{
    CrtcIo, RegisterFile, Rgb, VgaHardware, VgaRegisters, ATTR_INDEX_DATA, MISC_OUTPUT_WRITE,
};
use crate::mode;
use crate::planar::{PlaneAccess, PlanarSession};
use crate::regs::{
    ATTR_MODE_CONTROL, ATTR_PALETTE_ADDRESS_SOURCE, CRTC_MAX_SCAN_LINE, GC_BIT_MASK,
    GC_DATA_ROTATE, GC_ENABLE_SET_RESET, GC_SET_RESET,
};
use crate::VideoBios;

/// Byte offset between glyphs in the character generator plane.
pub const GLYPH_STRIDE: u16 = 0x20;

/// Plane holding the character generator.
pub const FONT_PLANE: u8 = 2;

/// The 16 EGA colours as 6-bit DAC values.
pub const DEFAULT_PALETTE: [Rgb; 16] = [
    Rgb::new(0x00, 0x00, 0x00),
    Rgb::new(0x00, 0x00, 0x2A),
    Rgb::new(0x00, 0x2A, 0x00),
    Rgb::new(0x00, 0x2A, 0x2A),
    Rgb::new(0x2A, 0x00, 0x00),
    Rgb::new(0x2A, 0x00, 0x2A),
    Rgb::new(0x2A, 0x15, 0x00),
    Rgb::new(0x2A, 0x2A, 0x2A),
    Rgb::new(0x15, 0x15, 0x15),
    Rgb::new(0x15, 0x15, 0x3F),
    Rgb::new(0x15, 0x3F, 0x15),
    Rgb::new(0x15, 0x3F, 0x3F),
    Rgb::new(0x3F, 0x15, 0x15),
    Rgb::new(0x3F, 0x15, 0x3F),
    Rgb::new(0x3F, 0x3F, 0x15),
    Rgb::new(0x3F, 0x3F, 0x3F),
];

/// Misc output: RAM enable, plus I/O address select for the colour CRTC.
fn misc_output(crtc: CrtcIo) -> u8 {
    match crtc {
        CrtcIo::Mono => 0x02,
        CrtcIo::Color => 0x03,
    }
}

/// Writes the 8x8 glyphs into the character generator plane.
///
/// `font8x8` stores the leftmost pixel in bit 0; the VGA wants it in bit 7.
pub(crate) fn load_font<H: VgaHardware + ?Sized>(hw: &mut H) {
    let mut session = PlanarSession::open(hw, PlaneAccess::plane(FONT_PLANE), 0);
    for (code, glyph) in BASIC_LEGACY.iter().enumerate() {
        let base = code as u16 * GLYPH_STRIDE;
        for (line, bits) in glyph.iter().enumerate() {
            session.write_u8(base + line as u16, bits.reverse_bits());
        }
    }
}

impl VideoBios {
    /// Power-on initialisation; must run before the first service call.
    ///
    /// Safe to repeat. Fails without touching the adapter if the configured initial mode is
    /// unknown.
    pub fn post<H: VgaHardware + ?Sized>(&mut self, hw: &mut H) -> Result<()> {
        let initial_mode = self.config.initial_mode;
        mode::lookup(initial_mode)?;

        let crtc = self.config.crtc;
        hw.out_u8(MISC_OUTPUT_WRITE, misc_output(crtc));
        hw.write_reg(RegisterFile::Graphics, GC_BIT_MASK, 0xFF);
        hw.write_reg(RegisterFile::Graphics, GC_SET_RESET, 0x00);
        hw.write_reg(RegisterFile::Graphics, GC_ENABLE_SET_RESET, 0x00);
        hw.write_reg(RegisterFile::Graphics, GC_DATA_ROTATE, 0x00);

        load_font(hw);

        // 8 scan lines per character row.
        hw.write_reg(RegisterFile::Crtc(crtc), CRTC_MAX_SCAN_LINE, 0x07);
        self.set_cursor_size(hw, self.config.cursor_shape);

        // Reading input status puts the attribute flip-flop on the index phase.
        hw.in_u8(crtc.input_status_port());
        for index in 0..0x10 {
            hw.write_attribute(index, index);
        }
        hw.write_attribute(ATTR_MODE_CONTROL, 0x08);
        hw.out_u8(ATTR_INDEX_DATA, ATTR_PALETTE_ADDRESS_SOURCE);

        hw.write_dac(0, &DEFAULT_PALETTE);

        self.set_mode(hw, initial_mode)?;
        debug!(
            mode = format_args!("{initial_mode:#04x}"),
            "video adapter initialised"
        );
        Ok(())
    }
}
