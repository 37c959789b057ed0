//! Formant estimation via spectral peak search.
//!
//! Each voiced window is truncated or zero-padded to a fixed 2048-point
//! transform, Hann-windowed, and run through an FFT. F1 and F2 are the
//! magnitude peaks inside fixed speech bands; H1-H2 compares the levels of
//! the first two harmonics of the detected pitch. Peak search over the raw
//! spectrum, not an LPC tracker.

use std::sync::Arc;

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use serde::Serialize;

/// Fixed FFT length. Bin width is `sample_rate / TRANSFORM_SIZE`.
pub const TRANSFORM_SIZE: usize = 2048;

/// F1 search band in Hz.
pub const F1_BAND_HZ: (f64, f64) = (200.0, 1200.0);

/// F2 search band in Hz.
pub const F2_BAND_HZ: (f64, f64) = (1200.0, 3500.0);

/// Pitch range for which H1-H2 is meaningful.
pub const H1H2_PITCH_RANGE_HZ: (f64, f64) = (50.0, 500.0);

/// Magnitude floor for dB conversion, keeps log10 finite on empty bins.
const DB_FLOOR: f64 = 1e-9;

/// Formant measurements for one voiced window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FormantEstimate {
    /// First formant frequency in Hz.
    pub f1: f64,
    /// Second formant frequency in Hz.
    pub f2: f64,
    /// First minus second harmonic level in dB. 0.0 means "unknown"
    /// (pitch outside the valid range or harmonics beyond Nyquist),
    /// not a measured pressed voice.
    pub h1h2: f64,
}

/// Reusable spectral analyzer. Plans the FFT once; `extract` is then safe
/// to call from parallel workers (the plan is shared, buffers are local).
pub struct FormantExtractor {
    fft: Arc<dyn Fft<f32>>,
}

impl FormantExtractor {
    pub fn new() -> Self {
        let mut planner = FftPlanner::new();
        Self {
            fft: planner.plan_fft_forward(TRANSFORM_SIZE),
        }
    }

    /// Measure F1, F2, and H1-H2 for one voiced window.
    ///
    /// `pitch` is the fundamental detected for this same window; it only
    /// affects H1-H2, never the peak search.
    pub fn extract(&self, samples: &[f32], sample_rate: u32, pitch: f64) -> FormantEstimate {
        let spectrum = self.magnitude_spectrum(samples);
        let bin_hz = sample_rate as f64 / TRANSFORM_SIZE as f64;

        let f1 = peak_in_band(&spectrum, bin_hz, F1_BAND_HZ.0, F1_BAND_HZ.1);
        let f2 = peak_in_band(&spectrum, bin_hz, F2_BAND_HZ.0, F2_BAND_HZ.1);

        let h1h2 = harmonic_level_difference(&spectrum, bin_hz, pitch);

        FormantEstimate { f1, f2, h1h2 }
    }

    /// Hann-windowed magnitude spectrum, first `TRANSFORM_SIZE / 2` bins.
    fn magnitude_spectrum(&self, samples: &[f32]) -> Vec<f32> {
        let n = TRANSFORM_SIZE;
        let mut buf: Vec<Complex<f32>> = (0..n)
            .map(|i| {
                let s = if i < samples.len() { samples[i] } else { 0.0 };
                let hann = 0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / n as f64).cos());
                Complex::new(s * hann as f32, 0.0)
            })
            .collect();

        self.fft.process(&mut buf);

        buf[..n / 2].iter().map(|c| c.norm()).collect()
    }
}

impl Default for FormantExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Frequency of the highest-magnitude bin within [lo, hi] Hz.
/// Returns 0.0 when the band holds no bins (degenerate sample rates).
fn peak_in_band(spectrum: &[f32], bin_hz: f64, lo: f64, hi: f64) -> f64 {
    let mut best_bin = 0usize;
    let mut best_mag = f32::NEG_INFINITY;

    for (bin, &mag) in spectrum.iter().enumerate() {
        let freq = bin as f64 * bin_hz;
        if freq < lo {
            continue;
        }
        if freq > hi {
            break;
        }
        if mag > best_mag {
            best_mag = mag;
            best_bin = bin;
        }
    }

    best_bin as f64 * bin_hz
}

/// H1-H2: level of the bin nearest `pitch` minus the level of the bin
/// nearest `2 * pitch`, in dB. Only defined when the pitch is plausible
/// and both harmonics fall below Nyquist; otherwise 0.0 ("unknown").
fn harmonic_level_difference(spectrum: &[f32], bin_hz: f64, pitch: f64) -> f64 {
    if !(H1H2_PITCH_RANGE_HZ.0..=H1H2_PITCH_RANGE_HZ.1).contains(&pitch) {
        return 0.0;
    }

    let h1_bin = (pitch / bin_hz).round() as usize;
    let h2_bin = (2.0 * pitch / bin_hz).round() as usize;
    if h1_bin >= spectrum.len() || h2_bin >= spectrum.len() {
        return 0.0;
    }

    db(spectrum[h1_bin]) - db(spectrum[h2_bin])
}

/// Amplitude to dB, 20*log10 convention.
fn db(magnitude: f32) -> f64 {
    20.0 * (magnitude as f64).max(DB_FLOOR).log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: u32 = 16000;

    fn tone_mix(partials: &[(f64, f64)], len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| {
                let t = i as f64 / SAMPLE_RATE as f64;
                partials
                    .iter()
                    .map(|&(freq, amp)| amp * (2.0 * std::f64::consts::PI * freq * t).sin())
                    .sum::<f64>() as f32
            })
            .collect()
    }

    #[test]
    fn test_finds_band_peaks() {
        // Energy at 600 Hz (F1 band) and 1800 Hz (F2 band).
        let samples = tone_mix(&[(600.0, 0.8), (1800.0, 0.6)], 4096);
        let est = FormantExtractor::new().extract(&samples, SAMPLE_RATE, 150.0);

        // Bin width at 16 kHz is ~7.8 Hz; allow a few bins of leakage.
        assert!((est.f1 - 600.0).abs() < 25.0, "f1 = {}", est.f1);
        assert!((est.f2 - 1800.0).abs() < 25.0, "f2 = {}", est.f2);
    }

    #[test]
    fn test_peaks_stay_inside_bands() {
        // Dominant energy far outside both bands must not leak the peak
        // outside the band bounds.
        let samples = tone_mix(&[(100.0, 1.0), (5000.0, 1.0)], 4096);
        let est = FormantExtractor::new().extract(&samples, SAMPLE_RATE, 100.0);

        assert!((F1_BAND_HZ.0..=F1_BAND_HZ.1).contains(&est.f1), "f1 = {}", est.f1);
        assert!((F2_BAND_HZ.0..=F2_BAND_HZ.1).contains(&est.f2), "f2 = {}", est.f2);
    }

    #[test]
    fn test_h1h2_measures_harmonic_ratio() {
        // H1 at 200 Hz twice the amplitude of H2 at 400 Hz: expect ~6 dB.
        let samples = tone_mix(&[(200.0, 1.0), (400.0, 0.5)], 4096);
        let est = FormantExtractor::new().extract(&samples, SAMPLE_RATE, 200.0);

        assert!(
            (est.h1h2 - 6.0).abs() < 2.0,
            "h1h2 = {} dB, expected ~6 dB",
            est.h1h2
        );
    }

    #[test]
    fn test_h1h2_negative_for_pressed_spectrum() {
        // H2 louder than H1 flips the sign.
        let samples = tone_mix(&[(200.0, 0.4), (400.0, 1.0)], 4096);
        let est = FormantExtractor::new().extract(&samples, SAMPLE_RATE, 200.0);
        assert!(est.h1h2 < -2.0, "h1h2 = {}", est.h1h2);
    }

    #[test]
    fn test_h1h2_unknown_outside_pitch_range() {
        let samples = tone_mix(&[(200.0, 1.0)], 4096);
        let extractor = FormantExtractor::new();
        assert_eq!(extractor.extract(&samples, SAMPLE_RATE, 30.0).h1h2, 0.0);
        assert_eq!(extractor.extract(&samples, SAMPLE_RATE, 600.0).h1h2, 0.0);
    }

    #[test]
    fn test_short_window_zero_padded() {
        // Shorter than the transform: zero-padding must not panic and the
        // peak still lands near the tone.
        let samples = tone_mix(&[(600.0, 1.0)], 512);
        let est = FormantExtractor::new().extract(&samples, SAMPLE_RATE, 150.0);
        assert!((est.f1 - 600.0).abs() < 40.0, "f1 = {}", est.f1);
    }
}
