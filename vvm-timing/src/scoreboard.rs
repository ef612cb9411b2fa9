//! The scoreboard: two small busy bitmaps, one per register file, gating
//! dispatch in program order. Each bit is set when a dispatched-but-not-yet-
//! completed instruction has declared that register a source or destination.

use crate::roles::OperandRoles;

/// Fixed-width busy bitmaps over the 8 scalar and 8 vector registers.
#[derive(Clone, Debug, Default)]
pub struct Scoreboard {
    scalar_busy: [bool; 8],
    vector_busy: [bool; 8],
}

impl Scoreboard {
    pub fn new() -> Self {
        Scoreboard::default()
    }

    /// True iff every register `roles` reads or writes is currently clear.
    pub fn dispatchable(&self, roles: &OperandRoles) -> bool {
        roles.ssrc.iter().all(|&r| !self.scalar_busy[r])
            && roles.vsrc.iter().all(|&r| !self.vector_busy[r])
            && roles.sdest.map_or(true, |r| !self.scalar_busy[r])
            && roles.vdest.map_or(true, |r| !self.vector_busy[r])
    }

    /// Sets the destination bit(s) named by `roles`. Called on dispatch.
    pub fn occupy(&mut self, roles: &OperandRoles) {
        if let Some(r) = roles.sdest {
            self.scalar_busy[r] = true;
        }
        if let Some(r) = roles.vdest {
            self.vector_busy[r] = true;
        }
    }

    /// Clears the destination bit(s) named by `roles`. Called on completion.
    pub fn release(&mut self, roles: &OperandRoles) {
        if let Some(r) = roles.sdest {
            self.scalar_busy[r] = false;
        }
        if let Some(r) = roles.vdest {
            self.vector_busy[r] = false;
        }
    }

    /// True iff no destination bit remains set anywhere — the drain
    /// condition's scoreboard clause.
    pub fn is_clear(&self) -> bool {
        self.scalar_busy.iter().all(|&b| !b) && self.vector_busy.iter().all(|&b| !b)
    }
}
