//! INT 10h register-level entry point.

use tracing::trace;

use crate::cpu::CpuState;
use crate::error::Result;
use crate::io::VgaHardware;
use crate::regs::CursorShape;
use crate::transfer::WriteStringFlags;
use crate::VideoBios;

/// `AL` value reported when Set Mode is given an unknown mode.
pub const MODE_FAILURE: u8 = 0xFF;

/// Video service functions, selected by `AH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Function {
    SetMode = 0x00,
    SetCursorShape = 0x01,
    SetCursorPosition = 0x02,
    GetCursorPosition = 0x03,
    SetActivePage = 0x05,
    ScrollUp = 0x06,
    ScrollDown = 0x07,
    ReadCharAttr = 0x08,
    WriteCharAttr = 0x09,
    WriteChar = 0x0A,
    SetColorPalette = 0x0B,
    WriteTeletype = 0x0E,
    GetMode = 0x0F,
    WriteString = 0x13,
}

impl TryFrom<u8> for Function {
    type Error = u8;

    fn try_from(ah: u8) -> core::result::Result<Self, u8> {
        Ok(match ah {
            0x00 => Self::SetMode,
            0x01 => Self::SetCursorShape,
            0x02 => Self::SetCursorPosition,
            0x03 => Self::GetCursorPosition,
            0x05 => Self::SetActivePage,
            0x06 => Self::ScrollUp,
            0x07 => Self::ScrollDown,
            0x08 => Self::ReadCharAttr,
            0x09 => Self::WriteCharAttr,
            0x0A => Self::WriteChar,
            0x0B => Self::SetColorPalette,
            0x0E => Self::WriteTeletype,
            0x0F => Self::GetMode,
            0x13 => Self::WriteString,
            other => return Err(other),
        })
    }
}

/// Page errors are reported by doing nothing.
fn page_result<T>(function: Function, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            trace!(?function, %err, "int10 request ignored");
            None
        }
    }
}

impl VideoBios {
    /// Services one INT 10h call: arguments are taken from `cpu` and results written back to it.
    ///
    /// Unknown functions are ignored without touching the hardware.
    pub fn handle_int10<H: VgaHardware + ?Sized>(&mut self, cpu: &mut CpuState, hw: &mut H) {
        let function = match Function::try_from(cpu.ah()) {
            Ok(function) => function,
            Err(ah) => {
                trace!(ah = format_args!("{ah:#04x}"), "unsupported int10 function");
                return;
            }
        };
        trace!(?function, ax = format_args!("{:#06x}", cpu.ax), "int10");

        match function {
            Function::SetMode => {
                if let Err(err) = self.set_mode(hw, cpu.al()) {
                    trace!(%err, "set mode failed");
                    cpu.set_al(MODE_FAILURE);
                }
            }
            Function::SetCursorShape => {
                self.set_cursor_size(hw, CursorShape::new(cpu.ch(), cpu.cl()));
            }
            Function::SetCursorPosition => {
                let result = self.set_cursor_position(hw, cpu.bh(), cpu.dl(), cpu.dh());
                if page_result(function, result).is_some() {
                    cpu.ax = 0;
                }
            }
            Function::GetCursorPosition => {
                let result = self.cursor_position(hw, cpu.bh());
                if let Some((shape, pos)) = page_result(function, result) {
                    cpu.ax = 0;
                    cpu.set_ch(shape.start);
                    cpu.set_cl(shape.end);
                    cpu.set_dl(pos.x);
                    cpu.set_dh(pos.y);
                }
            }
            Function::SetActivePage => {
                let result = self.set_active_page(hw, cpu.al());
                page_result(function, result);
            }
            Function::ScrollUp | Function::ScrollDown => {
                let cols = cpu.dl().saturating_add(1);
                let rows = cpu.dh().saturating_add(1);
                if function == Function::ScrollUp {
                    self.scroll_up(hw, cpu.al(), cpu.bh(), cols, rows);
                } else {
                    self.scroll_down(hw, cpu.al(), cpu.bh(), cols, rows);
                }
            }
            Function::ReadCharAttr => {
                let result = self.read_char_attr(hw, cpu.bh());
                if let Some((chr, attr)) = page_result(function, result) {
                    cpu.set_ah(attr);
                    cpu.set_al(chr);
                }
            }
            Function::WriteCharAttr => {
                let result = self.write_char_attr(hw, cpu.bh(), cpu.al(), cpu.bl(), cpu.cx);
                page_result(function, result);
            }
            Function::WriteChar => {
                let result = self.write_char(hw, cpu.bh(), cpu.al(), cpu.cx);
                page_result(function, result);
            }
            // Reserved.
            Function::SetColorPalette => {}
            Function::WriteTeletype => {
                let result = self.write_teletype(hw, cpu.bh(), cpu.al(), cpu.bl());
                page_result(function, result);
            }
            Function::GetMode => {
                let info = self.get_mode();
                cpu.set_ah(info.columns);
                cpu.set_al(info.mode);
                cpu.set_bh(info.active_page);
            }
            Function::WriteString => {
                let buffer = ((cpu.es as u32) << 4) + cpu.bp as u32;
                let flags = WriteStringFlags::from_bits_truncate(cpu.al());
                let result = self.write_string(hw, flags, buffer, cpu.bl(), cpu.dl(), cpu.dh());
                page_result(function, result);
            }
        }
    }
}
