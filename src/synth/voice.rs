use crate::{
    dsp::{Envelope, NoiseBuffer, Oscillator, SVFilter, Waveform},
    graph::{Bus, GraphNode, RenderCtx},
};

/*
One-Shot Voices
===============

A voice is everything one note or one effect needs, built on the control
thread with absolute times and handed to the renderer:

  Voice
   ├─ Layer:  source ──► [filter (swept cutoff)] ──► gain envelope
   ├─ Layer:  ...
   └─ bus (bgm / sfx)

Each layer has its own start/stop window, so a kick's 50 ms click and its
400 ms body, or the four staggered tones of the level-up arpeggio, live in
one voice. Outside its window a layer is silent and its oscillator phase
does not move.

Voices are write-once. Nothing retunes or cancels them after dispatch; they
end when their last layer stops and the mixer drops them.
*/

/// Sound source of a layer
#[derive(Debug, Clone)]
pub enum Source {
    Tone {
        osc: Oscillator,
        /// Frequency automation (Hz)
        frequency: Envelope,
        /// Fixed detune in cents (100 cents = 1 semitone)
        detune_cents: f32,
    },
    Noise {
        buffer: NoiseBuffer,
        cursor: usize,
    },
}

impl Source {
    #[inline]
    fn next_sample(&mut self, t: f64, sample_rate: f32) -> Option<f32> {
        match self {
            Source::Tone {
                osc,
                frequency,
                detune_cents,
            } => {
                let mut freq = frequency.value_at(t);
                if *detune_cents != 0.0 {
                    freq *= 2.0_f32.powf(*detune_cents / 1200.0);
                }
                Some(osc.next_sample(freq, sample_rate))
            }
            Source::Noise { buffer, cursor } => {
                let sample = buffer.get(*cursor)?;
                *cursor += 1;
                Some(sample)
            }
        }
    }
}

/// Filter with an automated cutoff
#[derive(Debug, Clone)]
pub struct FilterStage {
    filter: SVFilter,
    cutoff: Envelope,
}

impl FilterStage {
    pub fn lowpass(cutoff: Envelope) -> Self {
        Self {
            filter: SVFilter::lowpass(),
            cutoff,
        }
    }

    pub fn highpass(cutoff: Envelope) -> Self {
        Self {
            filter: SVFilter::highpass(),
            cutoff,
        }
    }

    pub fn cutoff(&self) -> &Envelope {
        &self.cutoff
    }
}

#[derive(Debug, Clone)]
pub struct Layer {
    source: Source,
    filter: Option<FilterStage>,
    gain: Envelope,
    start: f64,
    stop: f64,
}

impl Layer {
    /// Oscillator layer. Sounds from `start` until `stop` (set with `.span`).
    pub fn tone(waveform: Waveform, frequency: Envelope) -> Self {
        Self {
            source: Source::Tone {
                osc: Oscillator::new(waveform),
                frequency,
                detune_cents: 0.0,
            },
            filter: None,
            gain: Envelope::constant(1.0),
            start: 0.0,
            stop: 0.0,
        }
    }

    /// Noise layer that plays its buffer once from `start`.
    pub fn noise(buffer: NoiseBuffer, start: f64) -> Self {
        let stop = start + buffer.duration();
        Self {
            source: Source::Noise { buffer, cursor: 0 },
            filter: None,
            gain: Envelope::constant(1.0),
            start,
            stop,
        }
    }

    pub fn detune(mut self, cents: f32) -> Self {
        if let Source::Tone { detune_cents, .. } = &mut self.source {
            *detune_cents = cents;
        }
        self
    }

    pub fn through(mut self, filter: FilterStage) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn gain(mut self, gain: Envelope) -> Self {
        self.gain = gain;
        self
    }

    pub fn span(mut self, start: f64, stop: f64) -> Self {
        self.start = start;
        self.stop = stop.max(start);
        self
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn stop(&self) -> f64 {
        self.stop
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn filter(&self) -> Option<&FilterStage> {
        self.filter.as_ref()
    }

    pub fn gain_envelope(&self) -> &Envelope {
        &self.gain
    }

    /// Waveform of a tone layer
    pub fn waveform(&self) -> Option<Waveform> {
        match &self.source {
            Source::Tone { osc, .. } => Some(osc.waveform()),
            Source::Noise { .. } => None,
        }
    }

    /// Frequency of a tone layer at `t`, detune included
    pub fn frequency_at(&self, t: f64) -> Option<f32> {
        match &self.source {
            Source::Tone {
                frequency,
                detune_cents,
                ..
            } => Some(frequency.value_at(t) * 2.0_f32.powf(*detune_cents / 1200.0)),
            Source::Noise { .. } => None,
        }
    }

    #[inline]
    fn next_sample(&mut self, t: f64, sample_rate: f32) -> f32 {
        if t < self.start || t >= self.stop {
            return 0.0;
        }
        let Some(mut sample) = self.source.next_sample(t, sample_rate) else {
            return 0.0;
        };
        if let Some(stage) = self.filter.as_mut() {
            let cutoff = stage.cutoff.value_at(t);
            sample = stage.filter.next_sample(sample, cutoff, sample_rate);
        }
        sample * self.gain.value_at(t)
    }
}

/// A self-disposing synthesis unit routed to one bus
#[derive(Debug, Clone)]
pub struct Voice {
    label: &'static str,
    bus: Bus,
    layers: Vec<Layer>,
}

impl Voice {
    pub fn new(label: &'static str, bus: Bus) -> Self {
        Self {
            label,
            bus,
            layers: Vec::new(),
        }
    }

    pub fn layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn bus(&self) -> Bus {
        self.bus
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Earliest layer start
    pub fn start_time(&self) -> f64 {
        self.layers
            .iter()
            .map(|l| l.start)
            .fold(f64::INFINITY, f64::min)
    }

    /// Time the last layer stops
    pub fn end_time(&self) -> f64 {
        self.layers
            .iter()
            .map(|l| l.stop)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

impl GraphNode for Voice {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        out.fill(0.0);
        for layer in &mut self.layers {
            for (i, sample) in out.iter_mut().enumerate() {
                *sample += layer.next_sample(ctx.time_of(i), ctx.sample_rate);
            }
        }
    }

    fn is_active(&self, time: f64) -> bool {
        time < self.end_time()
    }
}
