//! Autocorrelation pitch detection.
//!
//! Searches lags corresponding to 50-400 Hz and picks the lag with the
//! highest overlap-normalized correlation. Two gates decide voicing: a
//! window RMS floor (rejects silence) and a minimum correlation (rejects
//! aperiodic content). Both thresholds are part of the scoring contract,
//! not tunables.

/// Pitch search band in Hz. Lags outside this band are never considered.
pub const PITCH_SEARCH_MIN_HZ: f64 = 50.0;
pub const PITCH_SEARCH_MAX_HZ: f64 = 400.0;

/// Windows quieter than this RMS are unvoiced regardless of correlation.
pub const VOICING_RMS_FLOOR: f64 = 0.01;

/// Minimum overlap-normalized correlation for a window to count as voiced.
pub const VOICING_MIN_CORRELATION: f64 = 0.3;

/// Estimate the fundamental frequency of one analysis window.
///
/// Returns `None` for unvoiced windows: silence, aperiodic content, or a
/// window too short to hold any candidate lag. Never panics on short input.
///
/// No DC rejection happens here: a constant-offset window is gated only by
/// the RMS and correlation thresholds, so strong near-DC content can read
/// as voicing at a long lag.
pub fn extract_pitch(samples: &[f32], sample_rate: u32) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }

    let n = samples.len() as f64;
    let rms = (samples.iter().map(|&s| (s as f64) * (s as f64)).sum::<f64>() / n).sqrt();
    if rms < VOICING_RMS_FLOOR {
        log::trace!("window unvoiced: rms {:.4} below floor", rms);
        return None;
    }

    // Lag bounds: high pitch = short lag. min_lag clamped to 1 so a
    // degenerate sample rate can't produce a zero lag.
    let min_lag = ((sample_rate as f64 / PITCH_SEARCH_MAX_HZ) as usize).max(1);
    let max_lag = (sample_rate as f64 / PITCH_SEARCH_MIN_HZ) as usize;

    let mut best_lag = 0usize;
    let mut best_corr = f64::NEG_INFINITY;

    for lag in min_lag..max_lag {
        if lag >= samples.len() {
            break;
        }
        let overlap = samples.len() - lag;
        let mut corr = 0.0f64;
        for i in 0..overlap {
            corr += samples[i] as f64 * samples[i + lag] as f64;
        }
        corr /= overlap as f64;

        if corr > best_corr {
            best_corr = corr;
            best_lag = lag;
        }
    }

    if best_lag == 0 || best_corr < VOICING_MIN_CORRELATION {
        log::trace!("window unvoiced: best correlation {:.4}", best_corr);
        return None;
    }

    Some(sample_rate as f64 / best_lag as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, amplitude: f64, sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| {
                (amplitude * (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64).sin())
                    as f32
            })
            .collect()
    }

    #[test]
    fn test_silence_is_unvoiced() {
        let samples = vec![0.0f32; 16000];
        assert_eq!(extract_pitch(&samples, 16000), None);
    }

    #[test]
    fn test_detects_sine_pitch() {
        // 100 Hz at 16 kHz: lag 160 divides exactly, so the estimate is exact.
        let samples = sine(100.0, 1.0, 16000, 16000);
        let pitch = extract_pitch(&samples, 16000).unwrap();
        assert!((pitch - 100.0).abs() < 1.0, "pitch = {pitch}");
    }

    #[test]
    fn test_detects_non_integer_lag_pitch() {
        // 220 Hz at 16 kHz: lag 72.7, so the estimate lands on a nearby lag.
        let samples = sine(220.0, 1.0, 16000, 16000);
        let pitch = extract_pitch(&samples, 16000).unwrap();
        assert!((pitch - 220.0).abs() < 5.0, "pitch = {pitch}");
    }

    #[test]
    fn test_quiet_periodic_signal_fails_correlation_gate() {
        // Amplitude 0.05 passes the RMS floor (rms ~0.035) but peaks at
        // correlation ~0.00125, far below the 0.3 gate.
        let samples = sine(100.0, 0.05, 16000, 16000);
        assert_eq!(extract_pitch(&samples, 16000), None);
    }

    #[test]
    fn test_window_shorter_than_any_lag_is_unvoiced() {
        // At 16 kHz the shortest candidate lag is 40 samples; a 30-sample
        // window holds none of them and must degrade, not panic.
        let samples = sine(220.0, 1.0, 16000, 30);
        assert_eq!(extract_pitch(&samples, 16000), None);
    }

    #[test]
    fn test_empty_window_is_unvoiced() {
        assert_eq!(extract_pitch(&[], 16000), None);
    }

    #[test]
    fn test_pitch_within_search_band() {
        for freq in [60.0, 120.0, 180.0, 240.0, 320.0] {
            let samples = sine(freq, 1.0, 16000, 16000);
            if let Some(pitch) = extract_pitch(&samples, 16000) {
                assert!(
                    (PITCH_SEARCH_MIN_HZ..=PITCH_SEARCH_MAX_HZ + 1.0).contains(&pitch),
                    "pitch {pitch} outside search band for {freq} Hz input"
                );
            }
        }
    }
}
