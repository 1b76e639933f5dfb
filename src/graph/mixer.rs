use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    config::EngineConfig,
    dsp::{Compressor, Envelope},
    graph::{
        bus::{Bus, BusBuffers},
        node::{GraphNode, RenderCtx},
    },
    MAX_BLOCK_SIZE,
};

/*
Audio Graph
===========

The graph is split in two halves joined by a lock-free ring buffer:

  GraphController (control thread)            GraphRenderer (audio thread)
  ───────────────────────────────            ────────────────────────────
  play(bus, voice)        ──► GraphCommand ──► voices on bgm / sfx buses
  ramp_master(target, t)  ──► GraphCommand ──► master gain automation
  now()  ◄──────────────── AudioClock ◄────── frames rendered

The audio clock is the number of frames the renderer has produced divided by
the sample rate. It is monotonic and never throttled, so every start and stop
time computed by the sequencer lands on an exact sample no matter how late
the control thread woke up.

Voices carry absolute start times. A voice handed over early simply renders
silence until its start sample comes round; a voice whose last layer has
stopped leaves the mix at the end of the block.

The audio thread never allocates or frees. The voice list is sized up front
and a voice arriving while it is full is refused. Finished and refused voices
travel back over a second queue and are dropped by the controller:

  GraphRenderer ──► retired voices ──► GraphController::collect_retired
*/

/// Voices the renderer holds at once
pub const VOICE_CAPACITY: usize = 256;

/// Monotonic audio clock shared between the renderer and its controllers
#[derive(Debug, Clone)]
pub struct AudioClock {
    frames: Arc<AtomicU64>,
    sample_rate: f32,
}

impl AudioClock {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            frames: Arc::new(AtomicU64::new(0)),
            sample_rate,
        }
    }

    /// Seconds of audio rendered so far
    pub fn now(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn advance(&self, frames: usize) {
        self.frames.fetch_add(frames as u64, Ordering::AcqRel);
    }
}

/// Commands sent from the control side to the renderer
pub enum GraphCommand {
    Play {
        bus: Bus,
        node: Box<dyn GraphNode>,
    },
    /// Approach `target` from `time` with the given time constant
    RampMaster {
        target: f32,
        time: f64,
        time_constant: f64,
    },
}

/// Build a connected controller/renderer pair at `sample_rate`.
pub fn audio_graph(config: &EngineConfig, sample_rate: f32) -> (GraphController, GraphRenderer) {
    let clock = AudioClock::new(sample_rate);
    let (tx, rx) = RingBuffer::<GraphCommand>::new(config.command_capacity.max(1));
    let (retire_tx, retire_rx) = RingBuffer::<Box<dyn GraphNode>>::new(VOICE_CAPACITY * 2);

    let controller = GraphController {
        tx,
        retired: retire_rx,
        clock: clock.clone(),
        dispatched: 0,
        dropped: 0,
    };

    let renderer = GraphRenderer {
        rx,
        retire: retire_tx,
        clock,
        voices: Vec::with_capacity(VOICE_CAPACITY),
        refused: 0,
        master_gain: Envelope::constant(config.master_gain),
        bgm_gain: config.bgm_gain,
        sfx_gain: config.sfx_gain,
        compressor: Compressor::new(&config.compressor, sample_rate),
        buses: BusBuffers::new(MAX_BLOCK_SIZE),
        scratch: vec![0.0; MAX_BLOCK_SIZE],
    };

    (controller, renderer)
}

/// Control-side handle: schedules voices and master automation
pub struct GraphController {
    tx: Producer<GraphCommand>,
    retired: Consumer<Box<dyn GraphNode>>,
    clock: AudioClock,
    dispatched: u64,
    dropped: u64,
}

impl GraphController {
    /// Current audio clock time
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn clock(&self) -> &AudioClock {
        &self.clock
    }

    pub fn sample_rate(&self) -> f32 {
        self.clock.sample_rate()
    }

    /// Number of buses in the topology
    pub fn bus_count(&self) -> usize {
        Bus::ALL.len()
    }

    /// Hand a voice to the renderer. Returns false if the queue was full.
    pub fn play(&mut self, bus: Bus, node: Box<dyn GraphNode>) -> bool {
        self.send(GraphCommand::Play { bus, node })
    }

    pub fn ramp_master(&mut self, target: f32, time: f64, time_constant: f64) -> bool {
        self.send(GraphCommand::RampMaster {
            target,
            time,
            time_constant,
        })
    }

    /// Voices successfully handed to the renderer
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Commands lost to a full queue
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Free voices the renderer has finished with. Returns how many.
    pub fn collect_retired(&mut self) -> usize {
        let mut count = 0;
        while self.retired.pop().is_ok() {
            count += 1;
        }
        count
    }

    fn send(&mut self, command: GraphCommand) -> bool {
        self.collect_retired();
        let is_voice = matches!(command, GraphCommand::Play { .. });
        match self.tx.push(command) {
            Ok(()) => {
                if is_voice {
                    self.dispatched += 1;
                }
                true
            }
            Err(_) => {
                self.dropped += 1;
                tracing::warn!(dropped = self.dropped, "graph command queue full, dropping command");
                false
            }
        }
    }
}

/// Render-side half of the graph: owns buses, voices and the master chain
pub struct GraphRenderer {
    rx: Consumer<GraphCommand>,
    retire: Producer<Box<dyn GraphNode>>,
    clock: AudioClock,
    voices: Vec<(Bus, Box<dyn GraphNode>)>,
    refused: u64,
    master_gain: Envelope,
    bgm_gain: f32,
    sfx_gain: f32,
    compressor: Compressor,
    buses: BusBuffers,
    scratch: Vec<f32>,
}

impl GraphRenderer {
    pub fn sample_rate(&self) -> f32 {
        self.clock.sample_rate()
    }

    pub fn clock(&self) -> &AudioClock {
        &self.clock
    }

    pub fn bus_count(&self) -> usize {
        self.buses.len()
    }

    /// Voices currently held by the renderer (pending or sounding)
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Voices turned away because the voice list was full
    pub fn refused_voices(&self) -> u64 {
        self.refused
    }

    /// Master gain in effect at `time`
    pub fn master_gain_at(&self, time: f64) -> f32 {
        self.master_gain.value_at(time)
    }

    /// Render mono output, advancing the audio clock by `out.len()` frames.
    pub fn render(&mut self, out: &mut [f32]) {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_block(chunk);
        }
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.rx.pop() {
            match command {
                GraphCommand::Play { bus, node } => {
                    if self.voices.len() < VOICE_CAPACITY {
                        self.voices.push((bus, node));
                    } else {
                        self.refused += 1;
                        self.retire(node);
                    }
                }
                GraphCommand::RampMaster {
                    target,
                    time,
                    time_constant,
                } => self.master_gain.set_target_at_time(target, time, time_constant),
            }
        }
    }

    fn render_block(&mut self, out: &mut [f32]) {
        self.drain_commands();

        let frames = out.len();
        let ctx = RenderCtx::new(self.clock.sample_rate(), self.clock.now());
        self.buses.clear(frames);

        for (bus, node) in self.voices.iter_mut() {
            let scratch = &mut self.scratch[..frames];
            scratch.fill(0.0);
            node.render_block(scratch, &ctx);

            for (o, s) in self.buses.get_mut(*bus, frames).iter_mut().zip(scratch.iter()) {
                *o += *s;
            }
        }

        // Fold bgm and sfx into master at their fixed levels
        let (bgm_gain, sfx_gain) = (self.bgm_gain, self.sfx_gain);
        let scratch = &mut self.scratch[..frames];
        for (i, s) in scratch.iter_mut().enumerate() {
            *s = self.buses.get(Bus::Bgm, frames)[i] * bgm_gain
                + self.buses.get(Bus::Sfx, frames)[i] * sfx_gain;
        }
        let master = self.buses.get_mut(Bus::Master, frames);
        for (i, (m, s)) in master.iter_mut().zip(scratch.iter()).enumerate() {
            *m = (*m + *s) * self.master_gain.value_at(ctx.time_of(i));
        }

        self.compressor.render(master);
        out.copy_from_slice(master);

        let block_end = ctx.time_of(frames);
        let mut i = 0;
        while i < self.voices.len() {
            if self.voices[i].1.is_active(block_end) {
                i += 1;
            } else {
                let (_, node) = self.voices.swap_remove(i);
                self.retire(node);
            }
        }
        self.master_gain.prune_before(block_end);
        self.clock.advance(frames);
    }

    fn retire(&mut self, node: Box<dyn GraphNode>) {
        // A full return queue frees the voice here
        let _ = self.retire.push(node);
    }
}
