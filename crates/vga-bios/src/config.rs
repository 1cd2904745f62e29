use crate::io::CrtcIo;
use crate::regs::CursorShape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoBiosConfig {
    /// CRT controller port pair the service programs.
    pub crtc: CrtcIo,
    /// Zero all four planes during Set Mode so the new mode never shows stale data.
    pub clear_planes_on_mode_set: bool,
    /// Reload the 8x8 glyphs into plane 2 when entering a text mode.
    pub reload_font_on_text_mode: bool,
    /// Mode activated at the end of POST.
    pub initial_mode: u8,
    /// Cursor scan lines programmed during POST.
    pub cursor_shape: CursorShape,
    /// Upper bound on the number of bytes scanned for a write-string terminator.
    pub string_scan_limit: u16,
}

impl Default for VideoBiosConfig {
    fn default() -> Self {
        Self {
            crtc: CrtcIo::Mono,
            clear_planes_on_mode_set: true,
            reload_font_on_text_mode: true,
            initial_mode: 0x01,
            cursor_shape: CursorShape::default(),
            string_scan_limit: 0xFFFF,
        }
    }
}
