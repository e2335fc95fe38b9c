use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, StreamConfig};

use crate::application::ports::{AudioSink, AudioSinkError};
use crate::domain::DecodedAudioBuffer;

/// Audio output backed by the platform's default device.
///
/// A cpal stream cannot leave the thread it was created on, so a dedicated
/// output thread owns it; this handle only carries the command channel and
/// the shared playing flag. The stream itself is created lazily on the first
/// play and reused for the rest of the session.
pub struct CpalAudioSink {
    commands: mpsc::Sender<PlayCommand>,
    playing: Arc<AtomicBool>,
}

struct PlayCommand {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl CpalAudioSink {
    pub fn new() -> Result<Self, AudioSinkError> {
        let (commands, receiver) = mpsc::channel();
        let playing = Arc::new(AtomicBool::new(false));
        let thread_playing = Arc::clone(&playing);

        std::thread::Builder::new()
            .name("audio-output".to_string())
            .spawn(move || run_output_thread(receiver, thread_playing))
            .map_err(|e| AudioSinkError::OutputUnavailable(format!("spawn: {}", e)))?;

        Ok(Self { commands, playing })
    }
}

impl AudioSink for CpalAudioSink {
    fn play(&self, buffer: &DecodedAudioBuffer) -> Result<(), AudioSinkError> {
        // No overlapping playback: a second play while busy is a no-op.
        if self.playing.swap(true, Ordering::SeqCst) {
            tracing::debug!("Playback already in progress, ignoring play request");
            return Ok(());
        }

        self.commands
            .send(PlayCommand {
                samples: buffer.samples.clone(),
                sample_rate: buffer.format.sample_rate_hz,
            })
            .map_err(|_| {
                self.playing.store(false, Ordering::SeqCst);
                AudioSinkError::OutputUnavailable("audio output thread terminated".to_string())
            })
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}

struct OutputContext {
    stream: cpal::Stream,
    queue: Arc<Mutex<VecDeque<f32>>>,
    sample_rate: u32,
}

fn run_output_thread(commands: mpsc::Receiver<PlayCommand>, playing: Arc<AtomicBool>) {
    let mut output: Option<OutputContext> = None;

    while let Ok(command) = commands.recv() {
        let needs_open = output
            .as_ref()
            .map(|ctx| ctx.sample_rate != command.sample_rate)
            .unwrap_or(true);

        if needs_open {
            match open_output(command.sample_rate, Arc::clone(&playing)) {
                Ok(ctx) => output = Some(ctx),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to open audio output");
                    playing.store(false, Ordering::SeqCst);
                    continue;
                }
            }
        }

        let Some(ctx) = output.as_ref() else { continue };

        if let Ok(mut queue) = ctx.queue.lock() {
            queue.clear();
            queue.extend(command.samples);
        }

        // The platform may have suspended the stream while idle.
        if let Err(e) = ctx.stream.play() {
            tracing::error!(error = %e, "Failed to start playback");
            playing.store(false, Ordering::SeqCst);
        }
    }
}

fn open_output(sample_rate: u32, playing: Arc<AtomicBool>) -> Result<OutputContext, String> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| "no default output device".to_string())?;

    let config = StreamConfig {
        channels: 1,
        sample_rate: SampleRate(sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    let queue = Arc::new(Mutex::new(VecDeque::new()));
    let callback_queue = Arc::clone(&queue);

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let Ok(mut queue) = callback_queue.lock() else {
                    data.fill(0.0);
                    return;
                };
                fill_from_queue(data, &mut queue, &playing);
            },
            |err| tracing::error!(error = %err, "Output stream error"),
            None,
        )
        .map_err(|e| e.to_string())?;

    Ok(OutputContext {
        stream,
        queue,
        sample_rate,
    })
}

/// Copies queued samples into the device buffer, padding with silence.
///
/// The playing flag clears only on the pass that drains the last queued
/// sample. `play` raises the flag before the output thread has filled the
/// queue, so a pass that finds the queue already empty must leave the flag
/// alone or the whole playback would run with `is_playing()` false.
pub fn fill_from_queue(
    data: &mut [f32],
    queue: &mut VecDeque<f32>,
    playing: &AtomicBool,
) {
    let had_samples = !queue.is_empty();
    for sample in data.iter_mut() {
        *sample = queue.pop_front().unwrap_or(0.0);
    }
    if had_samples && queue.is_empty() {
        playing.store(false, Ordering::SeqCst);
    }
}
