/// Register image of a video-service call.
///
/// The caller loads its arguments into these slots before the call and reads results back from
/// the same slots afterwards. Only the registers the INT 10h contract uses are modeled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CpuState {
    pub ax: u16,
    pub bx: u16,
    pub cx: u16,
    pub dx: u16,
    pub bp: u16,
    pub es: u16,
}

fn hi(value: u16) -> u8 {
    (value >> 8) as u8
}

fn lo(value: u16) -> u8 {
    (value & 0xFF) as u8
}

fn with_hi(value: u16, byte: u8) -> u16 {
    ((byte as u16) << 8) | (value & 0x00FF)
}

fn with_lo(value: u16, byte: u8) -> u16 {
    (value & 0xFF00) | (byte as u16)
}

impl CpuState {
    pub fn ah(&self) -> u8 {
        hi(self.ax)
    }

    pub fn set_ah(&mut self, value: u8) {
        self.ax = with_hi(self.ax, value);
    }

    pub fn al(&self) -> u8 {
        lo(self.ax)
    }

    pub fn set_al(&mut self, value: u8) {
        self.ax = with_lo(self.ax, value);
    }

    pub fn bh(&self) -> u8 {
        hi(self.bx)
    }

    pub fn set_bh(&mut self, value: u8) {
        self.bx = with_hi(self.bx, value);
    }

    pub fn bl(&self) -> u8 {
        lo(self.bx)
    }

    pub fn set_bl(&mut self, value: u8) {
        self.bx = with_lo(self.bx, value);
    }

    pub fn ch(&self) -> u8 {
        hi(self.cx)
    }

    pub fn set_ch(&mut self, value: u8) {
        self.cx = with_hi(self.cx, value);
    }

    pub fn cl(&self) -> u8 {
        lo(self.cx)
    }

    pub fn set_cl(&mut self, value: u8) {
        self.cx = with_lo(self.cx, value);
    }

    pub fn dh(&self) -> u8 {
        hi(self.dx)
    }

    pub fn set_dh(&mut self, value: u8) {
        self.dx = with_hi(self.dx, value);
    }

    pub fn dl(&self) -> u8 {
        lo(self.dx)
    }

    pub fn set_dl(&mut self, value: u8) {
        self.dx = with_lo(self.dx, value);
    }
}
