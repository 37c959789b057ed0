//! Trace aggregation: display windows and clip-level statistics.

use serde::Serialize;

use super::perception::Perception;

/// One analysis window's measurements, in clip order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TracePoint {
    /// Window start time in seconds.
    pub time: f64,
    /// Detected pitch in Hz; `None` marks an unvoiced gap.
    pub pitch: Option<f64>,
    pub f1: Option<f64>,
    pub f2: Option<f64>,
    pub h1h2: Option<f64>,
    pub perception: Perception,
}

impl TracePoint {
    pub fn is_voiced(&self) -> bool {
        self.pitch.is_some()
    }
}

/// Coarse bar for timeline display: up to 4 consecutive trace points
/// averaged over their voiced members.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplayWindow {
    pub start_time: f64,
    pub end_time: f64,
    pub score: f64,
    pub pitch: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PitchRange {
    pub min: f64,
    pub max: f64,
}

/// Clip-level statistics over the voiced trace points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipSummary {
    pub avg_score: f64,
    pub avg_pitch: f64,
    pub pitch_range: PitchRange,
    /// 1.0 = perfectly steady score, 0.0 = wildly varying.
    pub stability: f64,
    pub voiced_percentage: f64,
    pub avg_f1: f64,
    pub avg_f2: f64,
    /// Mean over windows with a known H1-H2 (the 0.0 sentinel is skipped).
    pub avg_h1h2: f64,
    pub overall_label: String,
}

/// Full result of analyzing one clip. Produced once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipAnalysis {
    /// Clip duration in seconds.
    pub duration: f64,
    pub sample_rate: u32,
    pub windows: Vec<DisplayWindow>,
    pub trace: Vec<TracePoint>,
    /// Raw samples, kept for downstream consumers; not serialized.
    #[serde(skip_serializing)]
    pub samples: Vec<f32>,
    pub summary: ClipSummary,
}

/// Clip label from the average score. These thresholds are coarser than
/// the per-point label bands.
pub fn overall_label(avg_score: f64) -> &'static str {
    if avg_score < 0.3 {
        "Masculine"
    } else if avg_score < 0.45 {
        "Masc-Leaning"
    } else if avg_score < 0.55 {
        "Ambiguous"
    } else if avg_score < 0.7 {
        "Fem-Leaning"
    } else {
        "Feminine"
    }
}

/// Group the trace into disjoint runs of 4 points and average each run's
/// voiced members. Runs with no voiced point emit nothing; the final run
/// may be shorter than 4.
pub(crate) fn build_display_windows(trace: &[TracePoint]) -> Vec<DisplayWindow> {
    let mut windows = Vec::with_capacity(trace.len().div_ceil(4));

    for group in trace.chunks(4) {
        let mut voiced = 0usize;
        let mut score_sum = 0.0;
        let mut pitch_sum = 0.0;
        for point in group {
            if let Some(hz) = point.pitch {
                voiced += 1;
                score_sum += point.perception.score;
                pitch_sum += hz;
            }
        }
        if voiced == 0 {
            continue;
        }

        let n = voiced as f64;
        windows.push(DisplayWindow {
            start_time: group[0].time,
            end_time: group[group.len() - 1].time,
            score: score_sum / n,
            pitch: pitch_sum / n,
        });
    }

    windows
}

/// Summarize a trace. With no voiced points every field falls back to
/// its neutral midpoint; nothing here can produce NaN.
pub(crate) fn summarize(trace: &[TracePoint]) -> ClipSummary {
    let voiced: Vec<&TracePoint> = trace.iter().filter(|p| p.is_voiced()).collect();

    if voiced.is_empty() {
        return ClipSummary {
            avg_score: 0.5,
            avg_pitch: 0.0,
            pitch_range: PitchRange { min: 0.0, max: 0.0 },
            stability: 1.0,
            voiced_percentage: 0.0,
            avg_f1: 0.0,
            avg_f2: 0.0,
            avg_h1h2: 0.0,
            overall_label: overall_label(0.5).to_string(),
        };
    }

    let scores: Vec<f64> = voiced.iter().map(|p| p.perception.score).collect();
    let (avg_score, score_std) = mean_std(&scores);

    let pitches: Vec<f64> = voiced.iter().filter_map(|p| p.pitch).collect();
    let (avg_pitch, _) = mean_std(&pitches);
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &hz in &pitches {
        min = min.min(hz);
        max = max.max(hz);
    }

    let f1s: Vec<f64> = voiced.iter().filter_map(|p| p.f1).collect();
    let f2s: Vec<f64> = voiced.iter().filter_map(|p| p.f2).collect();
    let h1h2s: Vec<f64> = voiced
        .iter()
        .filter_map(|p| p.h1h2)
        .filter(|&h| h != 0.0)
        .collect();

    ClipSummary {
        avg_score,
        avg_pitch,
        pitch_range: PitchRange { min, max },
        stability: (1.0 - 2.0 * score_std).max(0.0),
        voiced_percentage: voiced.len() as f64 / trace.len() as f64,
        avg_f1: mean_std(&f1s).0,
        avg_f2: mean_std(&f2s).0,
        avg_h1h2: mean_std(&h1h2s).0,
        overall_label: overall_label(avg_score).to_string(),
    }
}

/// Mean and population standard deviation. Empty input gives (0, 0).
fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}
