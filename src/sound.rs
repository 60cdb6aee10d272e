#![allow(
    // Allow truncation when turning sound durations into sample counts
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use anyhow::Result;
use bevy_ecs::system::Resource;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use crossbeam_channel::{Receiver, Sender, bounded};
use fundsp::hacker32::*;
use log::{debug, error};

use crate::config::AudioConfig;

// Sound effects types that can be played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    BoxSpawn,
    GameOver,
    Reset,
}

impl SoundEffect {
    /// How long the effect rings, in seconds
    #[must_use]
    pub fn duration(self) -> f64 {
        match self {
            SoundEffect::BoxSpawn => 0.15,
            SoundEffect::GameOver => 2.0,
            SoundEffect::Reset => 0.35,
        }
    }
}

// Command to control the audio thread
enum AudioCommand {
    PlaySound(SoundEffect),
    SetVolume(f32), // 0.0 to 1.0
    Quit,
}

#[derive(Resource)]
pub struct AudioState {
    sender: Option<Sender<AudioCommand>>,
    available: Arc<AtomicBool>,
    sound_enabled: bool,
    volume: f32,
}

impl AudioState {
    /// Starts the audio thread with the configured volume.
    #[must_use]
    pub fn new(config: &AudioConfig) -> Self {
        let (sender, receiver) = bounded(64);
        let available = Arc::new(AtomicBool::new(true));
        let volume = config.volume.clamp(0.0, 1.0);

        let thread_available = Arc::clone(&available);
        thread::spawn(move || {
            if let Err(e) = run_audio_thread(receiver, volume) {
                error!("Audio thread error: {e}");
                thread_available.store(false, Ordering::Relaxed);
            }
        });

        Self {
            sender: Some(sender),
            available,
            sound_enabled: config.sound_enabled,
            volume,
        }
    }

    /// An audio state that never touches an output device.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            sender: None,
            available: Arc::new(AtomicBool::new(false)),
            sound_enabled: false,
            volume: 0.0,
        }
    }

    pub fn play_sound(&self, effect: SoundEffect) -> bool {
        if self.sound_enabled {
            if let Some(sender) = &self.sender {
                let _ = sender.try_send(AudioCommand::PlaySound(effect));
            }
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn is_audio_available(&self) -> bool {
        self.sender.is_some() && self.available.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn is_sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn toggle_sound(&mut self) {
        self.sound_enabled = !self.sound_enabled;
    }

    #[must_use]
    pub fn get_volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);

        if let Some(sender) = &self.sender {
            let _ = sender.try_send(AudioCommand::SetVolume(self.volume));
        }
    }
}

impl Drop for AudioState {
    fn drop(&mut self) {
        if let Some(sender) = &self.sender {
            let _ = sender.try_send(AudioCommand::Quit);
        }
    }
}

fn run_audio_thread(receiver: Receiver<AudioCommand>, initial_volume: f32) -> Result<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow::anyhow!("No audio output device found"))?;
    let config = device.default_output_config()?;

    // The stream callback owns the mixer, these channels feed it
    let (sound_sender, sound_receiver) = bounded::<SoundEffect>(64);
    let (volume_sender, volume_receiver) = bounded::<f32>(16);

    let _stream = match config.sample_format() {
        cpal::SampleFormat::F32 => run_audio_stream::<f32>(
            &device,
            &config.into(),
            sound_receiver,
            volume_receiver,
            initial_volume,
        )?,
        cpal::SampleFormat::I16 => run_audio_stream::<i16>(
            &device,
            &config.into(),
            sound_receiver,
            volume_receiver,
            initial_volume,
        )?,
        cpal::SampleFormat::U16 => run_audio_stream::<u16>(
            &device,
            &config.into(),
            sound_receiver,
            volume_receiver,
            initial_volume,
        )?,
        _ => return Err(anyhow::anyhow!("Unsupported audio format")),
    };

    debug!("Audio stream started");

    // Keep the thread (and with it the stream) alive until told to stop
    while let Ok(command) = receiver.recv() {
        match command {
            AudioCommand::PlaySound(effect) => {
                let _ = sound_sender.try_send(effect);
            }
            AudioCommand::SetVolume(volume) => {
                let _ = volume_sender.try_send(volume);
            }
            AudioCommand::Quit => break,
        }
    }

    Ok(())
}

fn run_audio_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    sound_receiver: Receiver<SoundEffect>,
    volume_receiver: Receiver<f32>,
    initial_volume: f32,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let sample_rate = f64::from(config.sample_rate.0);
    let channels = config.channels as usize;

    let mut volume = initial_volume;
    // Each playing effect with the number of samples it has left
    let mut active_sounds: Vec<(Box<dyn AudioUnit>, usize)> = Vec::new();

    let mut next_value = move || {
        while let Ok(new_volume) = volume_receiver.try_recv() {
            volume = new_volume;
        }

        while let Ok(effect) = sound_receiver.try_recv() {
            let mut unit = create_sound_effect(effect);
            unit.set_sample_rate(sample_rate);
            active_sounds.push((unit, (effect.duration() * sample_rate) as usize));
        }

        let mut left = 0.0;
        let mut right = 0.0;
        for (unit, remaining) in &mut active_sounds {
            let (l, r) = unit.get_stereo();
            left += l;
            right += r;
            *remaining = remaining.saturating_sub(1);
        }
        active_sounds.retain(|(_, remaining)| *remaining > 0);

        (
            (left * volume).clamp(-1.0, 1.0),
            (right * volume).clamp(-1.0, 1.0),
        )
    };

    let err_fn = |err| error!("Error in audio stream: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for frame in data.chunks_mut(channels) {
                let sample = next_value();
                let left = T::from_sample(sample.0);
                let right = T::from_sample(sample.1);

                for (channel, sample) in frame.iter_mut().enumerate() {
                    if channel & 1 == 0 {
                        *sample = left;
                    } else {
                        *sample = right;
                    }
                }
            }
        },
        err_fn,
        None,
    )?;

    stream.play()?;

    Ok(stream)
}

// Low thud when a box appears
fn create_box_spawn() -> Box<dyn AudioUnit> {
    let thud = sine_hz(90.0) * envelope(|t| (0.12 - t).max(0.0) * 8.0) * 0.5;
    Box::new(thud >> pan(0.0))
}

// Falling pitch for a lost game
fn create_game_over() -> Box<dyn AudioUnit> {
    let sweep = envelope(|t| lerp(600.0, 200.0, (t * 0.5).min(1.0))) >> sine();
    let node = sweep * envelope(|t| (2.0 - t).max(0.0) * 0.5) * 0.4;
    Box::new(node >> pan(0.0))
}

// Two rising notes when the surface is cleared
fn create_reset() -> Box<dyn AudioUnit> {
    let note = |freq, t_start, t_end| {
        let env = envelope(move |t| if t >= t_start && t < t_end { 0.4 } else { 0.0 });
        sine_hz(freq) * env
    };

    let node = (note(392.0, 0.0, 0.15) + note(523.25, 0.15, 0.35)) * 0.5;
    Box::new(node >> pan(0.0))
}

// Create a sound effect based on type
pub fn create_sound_effect(effect: SoundEffect) -> Box<dyn AudioUnit> {
    match effect {
        SoundEffect::BoxSpawn => create_box_spawn(),
        SoundEffect::GameOver => create_game_over(),
        SoundEffect::Reset => create_reset(),
    }
}
