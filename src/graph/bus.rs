//! The fixed three-bus mix topology.
//!
//! ```text
//!   bgm bus ──┐
//!             ├──► master bus ──► compressor ──► output
//!   sfx bus ──┘
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Summing point a voice is routed into
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bus {
    Master,
    /// Background music: pads, bass, drums
    Bgm,
    /// One-shot UI effects
    Sfx,
}

impl Bus {
    pub const ALL: [Bus; 3] = [Bus::Master, Bus::Bgm, Bus::Sfx];

    pub fn name(self) -> &'static str {
        match self {
            Bus::Master => "master",
            Bus::Bgm => "bgm",
            Bus::Sfx => "sfx",
        }
    }
}

/// Per-bus scratch buffers, indexed by `Bus`
pub(crate) struct BusBuffers {
    buffers: [Vec<f32>; 3],
}

impl BusBuffers {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            buffers: [vec![0.0; capacity], vec![0.0; capacity], vec![0.0; capacity]],
        }
    }

    fn index(bus: Bus) -> usize {
        match bus {
            Bus::Master => 0,
            Bus::Bgm => 1,
            Bus::Sfx => 2,
        }
    }

    pub(crate) fn clear(&mut self, frames: usize) {
        for buffer in &mut self.buffers {
            buffer[..frames].fill(0.0);
        }
    }

    pub(crate) fn get_mut(&mut self, bus: Bus, frames: usize) -> &mut [f32] {
        &mut self.buffers[Self::index(bus)][..frames]
    }

    pub(crate) fn get(&self, bus: Bus, frames: usize) -> &[f32] {
        &self.buffers[Self::index(bus)][..frames]
    }

    pub(crate) fn len(&self) -> usize {
        self.buffers.len()
    }
}
