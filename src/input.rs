//! WAV loading and input file discovery.

use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::clip::{AudioClip, ClipError};
use crate::SUPPORTED_EXTENSIONS;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
    #[error("WAV has no channels")]
    NoChannels,
    #[error("invalid audio: {0}")]
    Clip(#[from] ClipError),
}

/// Read a WAV file into a mono clip.
pub fn read_wav(path: &Path) -> Result<AudioClip, InputError> {
    let reader = hound::WavReader::open(path)?;
    clip_from_reader(reader)
}

/// Decode any WAV source into a mono [`AudioClip`].
///
/// Integer PCM is scaled by its bit depth into [-1.0, 1.0); multi-channel
/// audio is downmixed by averaging each frame.
pub fn clip_from_reader<R: Read>(mut reader: hound::WavReader<R>) -> Result<AudioClip, InputError> {
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(InputError::NoChannels);
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_value))
                .collect::<Result<_, _>>()?
        }
    };

    let channels = spec.channels as usize;
    let samples: Vec<f32> = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };

    Ok(AudioClip::new(samples, spec.sample_rate)?)
}

/// Collect WAV files from a mix of file and directory arguments.
///
/// Directories are walked recursively; explicit file paths are taken
/// as-is. The result is sorted and de-duplicated so batch output order
/// is stable.
pub fn find_wav_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let ext = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_lowercase();
            if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
                files.push(entry.path().to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();
    files
}
