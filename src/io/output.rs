//! Default output device through cpal.

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    FromSample, Sample, SizedSample,
};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::{engine::AudioHost, error::EngineError, graph::GraphRenderer, MAX_BLOCK_SIZE};

/// Plays the rendered mix on the system's default output device.
///
/// The device is opened lazily on the first `sample_rate` call, so building
/// a host is free and an engine that is never initialised never touches the
/// audio system. Mono output is copied to every channel.
pub struct CpalHost {
    output: Option<(cpal::Device, cpal::SupportedStreamConfig)>,
    stream: Option<cpal::Stream>,
    tap: Option<Producer<f32>>,
    closed: bool,
}

impl CpalHost {
    pub fn new() -> Self {
        Self {
            output: None,
            stream: None,
            tap: None,
            closed: false,
        }
    }

    /// Host that also copies every rendered sample into a ring buffer, for
    /// meters and scopes. Samples are dropped when the consumer falls behind.
    pub fn with_tap(capacity: usize) -> (Self, Consumer<f32>) {
        let (tx, rx) = RingBuffer::new(capacity.max(1));
        let host = Self {
            tap: Some(tx),
            ..Self::new()
        };
        (host, rx)
    }

    fn open(&mut self) -> Result<&(cpal::Device, cpal::SupportedStreamConfig), EngineError> {
        if self.output.is_none() {
            let host = cpal::default_host();
            let device = host
                .default_output_device()
                .ok_or(EngineError::NoOutputDevice)?;
            let config = device.default_output_config()?;
            tracing::info!(
                device = %device.name().unwrap_or_default(),
                sample_rate = config.sample_rate().0,
                channels = config.channels(),
                "opened output device"
            );
            self.output = Some((device, config));
        }
        self.output.as_ref().ok_or(EngineError::NoOutputDevice)
    }

    fn build<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        mut renderer: GraphRenderer,
        mut tap: Option<Producer<f32>>,
    ) -> Result<cpal::Stream, EngineError>
    where
        T: Sample + SizedSample + FromSample<f32>,
    {
        let channels = config.channels as usize;
        let mut block = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                for chunk in data.chunks_mut(channels * MAX_BLOCK_SIZE) {
                    let frames = chunk.len() / channels;
                    let block = &mut block[..frames];
                    renderer.render(block);

                    for (frame, &sample) in chunk.chunks_mut(channels).zip(block.iter()) {
                        let sample = if sample.is_finite() {
                            sample.clamp(-1.0, 1.0)
                        } else {
                            0.0
                        };
                        for out in frame.iter_mut() {
                            *out = T::from_sample(sample);
                        }
                    }

                    if let Some(tap) = tap.as_mut() {
                        for &sample in block.iter() {
                            if tap.push(sample).is_err() {
                                break;
                            }
                        }
                    }
                }
            },
            |err| tracing::error!(error = %err, "output stream error"),
            None,
        )?;

        Ok(stream)
    }
}

impl Default for CpalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioHost for CpalHost {
    fn sample_rate(&mut self) -> Result<u32, EngineError> {
        let (_, config) = self.open()?;
        Ok(config.sample_rate().0)
    }

    fn attach(&mut self, renderer: GraphRenderer) -> Result<(), EngineError> {
        if self.closed {
            return Err(EngineError::Disposed);
        }
        let tap = self.tap.take();
        let (device, config) = self.open()?;
        let stream_config: cpal::StreamConfig = config.clone().into();

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => Self::build::<f32>(device, &stream_config, renderer, tap)?,
            cpal::SampleFormat::I16 => Self::build::<i16>(device, &stream_config, renderer, tap)?,
            cpal::SampleFormat::U16 => Self::build::<u16>(device, &stream_config, renderer, tap)?,
            other => return Err(EngineError::UnsupportedSampleFormat(other)),
        };

        stream.play()?;
        self.stream = Some(stream);
        Ok(())
    }

    fn resume(&mut self) -> Result<(), EngineError> {
        match &self.stream {
            Some(stream) => Ok(stream.play()?),
            None if self.closed => Err(EngineError::Disposed),
            None => Ok(()),
        }
    }

    fn detach(&mut self) {
        self.closed = true;
        if self.stream.take().is_some() {
            tracing::info!("output stream closed");
        }
    }
}
