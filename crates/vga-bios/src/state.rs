/// Number of display pages with their own cursor.
pub const PAGE_COUNT: usize = 8;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CursorPos {
    pub x: u8,
    pub y: u8,
}

impl CursorPos {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

/// The service's view of the display.
///
/// Mutated only through [`crate::VideoBios`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayState {
    pub mode: u8,
    pub columns: u8,
    pub rows: u8,
    pub active_page: u8,
    pub page_size: u16,
    pub cursor: [CursorPos; PAGE_COUNT],
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            mode: 0x01,
            columns: 0x28,
            rows: 0x19,
            active_page: 0,
            page_size: 0x800,
            cursor: [CursorPos::default(); PAGE_COUNT],
        }
    }
}

impl DisplayState {
    /// Start of `page` in the interleaved character/attribute view.
    pub fn page_start(&self, page: u8) -> u16 {
        self.page_size.wrapping_mul(page as u16)
    }

    /// Linear cell index of `pos` on the current geometry.
    pub fn cell_index(&self, pos: CursorPos) -> u16 {
        (self.columns as u16) * (pos.y as u16) + pos.x as u16
    }

    /// Inverse of [`Self::cell_index`].
    pub fn position_of(&self, index: u16) -> CursorPos {
        let columns = self.columns.max(1) as u16;
        CursorPos::new((index % columns) as u8, (index / columns) as u8)
    }

    /// Clamps a coordinate pair into the current geometry.
    pub fn clamp(&self, x: u8, y: u8) -> CursorPos {
        CursorPos::new(
            x.min(self.columns.saturating_sub(1)),
            y.min(self.rows.saturating_sub(1)),
        )
    }
}
