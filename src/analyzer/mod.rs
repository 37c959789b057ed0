//! Sliding-window clip analysis.
//!
//! `analyze_clip` walks 75%-overlapped windows over one clip, runs the
//! pitch and formant extractors plus the perception model on each, and
//! reduces the per-window trace into display windows and a summary.
//! Per-window work is independent, so the map runs on rayon and collects
//! into a position-indexed vector; only the reduction is sequential.

pub mod formant;
pub mod perception;
pub mod pitch;
pub mod summary;

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::clip::AudioClip;
use formant::FormantExtractor;
use perception::{predict_perception, Perception, PerceptionCues};
use summary::{ClipAnalysis, TracePoint};

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("window size must be positive")]
    ZeroWindow,
    #[error("input error: {0}")]
    Input(#[from] crate::input::InputError),
}

/// Analysis parameters. Everything except the window length is a fixed
/// model constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Window length in milliseconds.
    pub window_ms: u32,
}

pub const DEFAULT_WINDOW_MS: u32 = 1000;

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_WINDOW_MS,
        }
    }
}

/// Analyze one clip into a full trace, display windows, and summary.
///
/// Windows start every `window / 4` samples; the final start offset is
/// the last one that still fits a whole window. A clip shorter than one
/// window yields an empty trace and the neutral summary rather than an
/// error. Identical input always produces an identical result.
pub fn analyze_clip(
    clip: &AudioClip,
    config: &AnalyzerConfig,
) -> Result<ClipAnalysis, AnalyzeError> {
    if config.window_ms == 0 {
        return Err(AnalyzeError::ZeroWindow);
    }

    let samples = clip.samples();
    let sample_rate = clip.sample_rate();
    let window_samples = (sample_rate as u64 * config.window_ms as u64 / 1000) as usize;
    // Step clamped to 1 so sub-4-sample windows still advance.
    let step = (window_samples / 4).max(1);

    let offsets: Vec<usize> = if window_samples == 0 || window_samples > samples.len() {
        Vec::new()
    } else {
        (0..=samples.len() - window_samples).step_by(step).collect()
    };

    log::debug!(
        "analyzing {:.2}s clip: {} windows of {} samples, step {}",
        clip.duration(),
        offsets.len(),
        window_samples,
        step
    );

    let extractor = FormantExtractor::new();
    let trace: Vec<TracePoint> = offsets
        .par_iter()
        .map(|&start| analyze_window(samples, sample_rate, start, window_samples, &extractor))
        .collect();

    let windows = summary::build_display_windows(&trace);
    let summary = summary::summarize(&trace);

    log::info!(
        "clip analyzed: {} windows, {:.0}% voiced, score {:.2} ({})",
        trace.len(),
        summary.voiced_percentage * 100.0,
        summary.avg_score,
        summary.overall_label
    );

    Ok(ClipAnalysis {
        duration: clip.duration(),
        sample_rate,
        windows,
        trace,
        samples: samples.to_vec(),
        summary,
    })
}

/// Analyze a single window into one trace point. Unvoiced windows keep
/// their slot in the trace with the neutral perception entry.
fn analyze_window(
    samples: &[f32],
    sample_rate: u32,
    start: usize,
    window_samples: usize,
    formants: &FormantExtractor,
) -> TracePoint {
    let time = start as f64 / sample_rate as f64;
    let window = &samples[start..start + window_samples];

    let Some(hz) = pitch::extract_pitch(window, sample_rate) else {
        return TracePoint {
            time,
            pitch: None,
            f1: None,
            f2: None,
            h1h2: None,
            perception: Perception::neutral(),
        };
    };

    let estimate = formants.extract(window, sample_rate, hz);

    // H1-H2's 0.0 sentinel means "unknown"; don't feed it to the model
    // as a measurement.
    let perception = predict_perception(&PerceptionCues {
        pitch: Some(hz),
        f1: Some(estimate.f1),
        f2: Some(estimate.f2),
        h1_h2: (estimate.h1h2 != 0.0).then_some(estimate.h1h2),
        ..Default::default()
    });

    TracePoint {
        time,
        pitch: Some(hz),
        f1: Some(estimate.f1),
        f2: Some(estimate.f2),
        h1h2: Some(estimate.h1h2),
        perception,
    }
}

// ── Batch analysis ────────────────────────────────────────────────────

/// One analyzed file.
#[derive(Debug, Serialize)]
pub struct ClipReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub analysis: ClipAnalysis,
}

pub struct BatchResult {
    pub reports: Vec<ClipReport>,
    pub failed: u64,
}

/// Analyze a set of WAV files in parallel with a progress bar.
///
/// Individual file failures are logged and counted, never fatal; report
/// order matches input order.
pub fn analyze_files(
    paths: &[PathBuf],
    config: &AnalyzerConfig,
    jobs: usize,
) -> Result<BatchResult, AnalyzeError> {
    if config.window_ms == 0 {
        return Err(AnalyzeError::ZeroWindow);
    }

    log::info!("Analyzing {} clips with {} workers", paths.len(), jobs);

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap()
        .progress_chars("#>-"),
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .unwrap();

    let results: Vec<Result<ClipReport, AnalyzeError>> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                let result = analyze_path(path, config);
                pb.inc(1);
                result
            })
            .collect()
    });

    let mut reports = Vec::with_capacity(results.len());
    let mut failed: u64 = 0;
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                log::warn!("{}: {}", path.display(), e);
                failed += 1;
            }
        }
    }

    pb.finish_with_message(format!("{} analyzed, {} failed", reports.len(), failed));

    Ok(BatchResult { reports, failed })
}

fn analyze_path(path: &Path, config: &AnalyzerConfig) -> Result<ClipReport, AnalyzeError> {
    log::debug!(
        "Analyzing: {}",
        path.file_name().and_then(|f| f.to_str()).unwrap_or("?")
    );
    let clip = crate::input::read_wav(path)?;
    let analysis = analyze_clip(&clip, config)?;
    Ok(ClipReport {
        path: path.to_path_buf(),
        analysis,
    })
}
