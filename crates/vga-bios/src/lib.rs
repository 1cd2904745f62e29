//! Legacy VGA video BIOS service.
//!
//! Implements the INT 10h text-mode contract (mode set, cursor and page control, scrolling and
//! character output) directly on VGA registers. Hardware is reached only through the
//! [`PortIo`] and [`MemoryWindow`] traits, so the same service runs against real ports via
//! [`x86::PhysicalVga`] or against a device model in tests.
//!
//! Plane memory is touched only inside a [`PlanarSession`], which saves the plane-selection
//! registers and the window mapping on entry and restores both on drop.

pub mod config;
pub mod cpu;
pub mod cursor;
pub mod error;
pub mod int10;
pub mod io;
pub mod mode;
pub mod planar;
pub mod post;
pub mod regs;
pub mod state;
pub mod transfer;
pub mod video;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod x86;

#[cfg(test)]
mod testing;

pub use config::VideoBiosConfig;
pub use cpu::CpuState;
pub use error::{Result, VideoError};
pub use int10::Function;
pub use io::{CrtcIo, MemoryWindow, PortIo, Rgb, VgaHardware, VgaRegisters};
pub use mode::{Geometry, GeometryClass, ModeDescriptor};
pub use planar::{PlaneAccess, PlanarSession, SavedRegisterSet};
pub use regs::CursorShape;
pub use state::{CursorPos, DisplayState};
pub use transfer::WriteStringFlags;
pub use video::{ModeInfo, VideoBios};
