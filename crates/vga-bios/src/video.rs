use tracing::debug;

use crate::config::VideoBiosConfig;
use crate::error::Result;
use crate::io::{RegisterFile, VgaHardware, VgaRegisters};
use crate::mode;
use crate::planar::{PlaneAccess, PlanarSession};
use crate::post::load_font;
use crate::regs::{
    PlaneMask, CRTC_HORIZONTAL_DISPLAY_END, CRTC_START_ADDRESS_HIGH, CRTC_START_ADDRESS_LOW,
    CRTC_VERTICAL_DISPLAY_END, GC_MISC, GC_MODE, SEQ_CHAR_FONT, SEQ_MAP_MASK, SEQ_MEMORY_MODE,
};
use crate::state::DisplayState;

/// Values reported by Get Mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeInfo {
    pub columns: u8,
    pub mode: u8,
    pub active_page: u8,
}

/// The video service: display state plus the configuration it was built with.
///
/// Hardware is passed into every operation, so one instance can drive a real adapter or a test
/// double.
#[derive(Debug, Clone, Default)]
pub struct VideoBios {
    pub(crate) state: DisplayState,
    pub(crate) config: VideoBiosConfig,
}

impl VideoBios {
    pub fn new(config: VideoBiosConfig) -> Self {
        Self {
            state: DisplayState::default(),
            config,
        }
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn config(&self) -> &VideoBiosConfig {
        &self.config
    }

    /// Activates `mode`.
    ///
    /// Unknown modes fail before any register is touched. Display state is committed only
    /// after the whole register sequence has been written.
    pub fn set_mode<H: VgaHardware + ?Sized>(&mut self, hw: &mut H, mode: u8) -> Result<()> {
        let desc = mode::lookup(mode)?;
        let geometry = desc.geometry();
        let crtc = RegisterFile::Crtc(self.config.crtc);

        hw.write_reg(RegisterFile::Sequencer, SEQ_MAP_MASK, desc.seq_map_mask.bits());
        if let Some(font) = desc.seq_char_font {
            hw.write_reg(RegisterFile::Sequencer, SEQ_CHAR_FONT, font);
        }
        hw.write_reg(
            RegisterFile::Sequencer,
            SEQ_MEMORY_MODE,
            desc.seq_memory_mode.bits(),
        );
        hw.write_reg(RegisterFile::Graphics, GC_MODE, desc.gc_mode.bits());
        hw.write_reg(RegisterFile::Graphics, GC_MISC, desc.gc_misc.bits());

        hw.write_reg(crtc, CRTC_HORIZONTAL_DISPLAY_END, geometry.columns);
        hw.write_reg(crtc, CRTC_VERTICAL_DISPLAY_END, geometry.rows);
        hw.write_reg(crtc, CRTC_START_ADDRESS_HIGH, 0);
        hw.write_reg(crtc, CRTC_START_ADDRESS_LOW, 0);

        if self.config.clear_planes_on_mode_set {
            clear_planes(hw);
        }
        if desc.is_text() && self.config.reload_font_on_text_mode {
            load_font(hw);
        }

        self.state.mode = mode;
        self.state.columns = geometry.columns;
        self.state.rows = geometry.rows;
        self.state.page_size = desc.page_size;
        self.state.active_page = 0;
        for slot in 0..self.state.cursor.len() {
            let pos = self.state.cursor[slot];
            self.state.cursor[slot] = self.state.clamp(pos.x, pos.y);
        }

        if desc.is_text() {
            self.apply_cursor(hw, self.state.cursor[0]);
        }

        debug!(
            mode = format_args!("{mode:#04x}"),
            columns = geometry.columns,
            rows = geometry.rows,
            page_size = desc.page_size,
            "video mode set"
        );
        Ok(())
    }

    pub fn get_mode(&self) -> ModeInfo {
        ModeInfo {
            columns: self.state.columns,
            mode: self.state.mode,
            active_page: self.state.active_page,
        }
    }
}

fn clear_planes<H: VgaHardware + ?Sized>(hw: &mut H) {
    let mut session = PlanarSession::open(
        hw,
        PlaneAccess::Planar {
            write: PlaneMask::all(),
            read: 0,
        },
        0,
    );
    session.fill(0, 0, 0x1_0000);
}
