//! Audio file loading utilities

use crate::{EvalError, Result};
use std::path::Path;
use std::time::Duration;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decoded multichannel audio at its native sample rate.
///
/// Channel order is preserved exactly as stored in the file; for FOA material
/// that is the (W, X, Y, Z) convention. No implicit resampling is performed.
#[derive(Debug, Clone)]
pub struct AudioData {
    /// One sample plane per channel, amplitudes normalized to [-1, 1].
    pub planes: Vec<Vec<f64>>,

    /// Native sample rate in Hz.
    pub sample_rate: u32,

    /// Source file path, kept for error reporting.
    pub source_path: String,
}

impl AudioData {
    /// Load audio from file.
    ///
    /// WAV goes through hound (better precision for 32-bit float); everything
    /// else, notably FLAC, goes through symphonia.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        if let Some(ext) = path.extension() {
            if ext.eq_ignore_ascii_case("wav") {
                return Self::load_wav(path, &path_str);
            }
        }

        Self::load_symphonia(path, &path_str)
    }

    /// Load audio with an optional per-file decode budget.
    ///
    /// The decode runs on a watchdog thread; if the budget elapses the run
    /// fails with [`EvalError::DecodeTimeout`] instead of stalling the batch.
    pub fn load_with_timeout<P: AsRef<Path>>(
        path: P,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let Some(timeout) = timeout else {
            return Self::load(path);
        };

        let path_buf = path.to_path_buf();
        let (tx, rx) = crossbeam_channel::bounded(1);
        std::thread::spawn(move || {
            let _ = tx.send(Self::load(&path_buf));
        });

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(_) => Err(EvalError::DecodeTimeout {
                path: path.display().to_string(),
                secs: timeout.as_secs(),
            }),
        }
    }

    fn load_wav(path: &Path, path_str: &str) -> Result<Self> {
        let reader = hound::WavReader::open(path)
            .map_err(|e| EvalError::Load(format!("{}: {}", path_str, e)))?;

        let spec = reader.spec();
        let sample_rate = spec.sample_rate;
        let num_channels = spec.channels as usize;

        let interleaved: Vec<f64> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .map(|s| s.map(|v| v as f64))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| EvalError::Load(format!("{}: {}", path_str, e)))?,
            hound::SampleFormat::Int => {
                let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f64;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f64 / full_scale))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| EvalError::Load(format!("{}: {}", path_str, e)))?
            }
        };

        Self::from_interleaved(interleaved, num_channels, sample_rate, path_str)
    }

    fn load_symphonia(path: &Path, path_str: &str) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| EvalError::Load(format!("{}: {}", path_str, e)))?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| EvalError::Load(format!("{}: no audio track", path_str)))?;

        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| EvalError::Load(format!("{}: unknown sample rate", path_str)))?;

        let num_channels = track
            .codec_params
            .channels
            .map(|c| c.count())
            .ok_or_else(|| EvalError::Load(format!("{}: unknown channels", path_str)))?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| EvalError::Load(format!("{}: {}", path_str, e)))?;

        let track_id = track.id;
        let mut interleaved: Vec<f64> = Vec::new();
        let mut sample_buf: Option<SampleBuffer<f32>> = None;

        loop {
            let packet = match format.next_packet() {
                Ok(p) => p,
                Err(symphonia::core::errors::Error::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break
                }
                Err(e) => return Err(EvalError::Load(format!("{}: {}", path_str, e))),
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = decoder
                .decode(&packet)
                .map_err(|e| EvalError::Load(format!("{}: {}", path_str, e)))?;

            let buf = sample_buf.get_or_insert_with(|| {
                SampleBuffer::new(decoded.capacity() as u64, *decoded.spec())
            });

            buf.copy_interleaved_ref(decoded);
            interleaved.extend(buf.samples().iter().map(|&s| s as f64));
        }

        Self::from_interleaved(interleaved, num_channels, sample_rate, path_str)
    }

    fn from_interleaved(
        interleaved: Vec<f64>,
        num_channels: usize,
        sample_rate: u32,
        path_str: &str,
    ) -> Result<Self> {
        if num_channels == 0 {
            return Err(EvalError::Load(format!("{}: no channels", path_str)));
        }

        let frames = interleaved.len() / num_channels;
        if frames == 0 {
            return Err(EvalError::Load(format!("{}: no audio frames", path_str)));
        }

        let mut planes = vec![Vec::with_capacity(frames); num_channels];
        for (i, sample) in interleaved.into_iter().enumerate() {
            planes[i % num_channels].push(sample);
        }

        Ok(Self {
            planes,
            sample_rate,
            source_path: path_str.to_string(),
        })
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.planes.len()
    }

    /// Number of sample frames per channel.
    pub fn frames(&self) -> usize {
        self.planes.first().map(|p| p.len()).unwrap_or(0)
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }
}
