//! Perceived voice character model.
//!
//! A pure weighted-factor score: pitch, resonance, vocal weight, and
//! breathiness each map onto a [0, 1] contribution, a pitch-band weight
//! table folds them into one score, and an agreement term pushes
//! consistent cue sets away from the ambiguous middle. Every constant
//! here (crossovers, scales, zone bounds, weight tables) is part of the
//! reproducibility contract — two builds must score a clip identically.

use serde::{Deserialize, Serialize};

// Sigmoid crossover points (score 0.5) and spreads, in Hz.
pub const PITCH_CROSSOVER_HZ: f64 = 157.0;
pub const PITCH_SCALE_HZ: f64 = 25.0;
pub const F1_CROSSOVER_HZ: f64 = 500.0;
pub const F1_SCALE_HZ: f64 = 80.0;
pub const F2_CROSSOVER_HZ: f64 = 1800.0;
pub const F2_SCALE_HZ: f64 = 300.0;

/// Pitch band where pitch alone is a poor predictor and resonance takes
/// most of the weight.
pub const AMBIGUITY_ZONE_HZ: (f64, f64) = (135.0, 175.0);

/// Pitch values outside this range are treated as missing.
pub const PITCH_VALID_HZ: (f64, f64) = (50.0, 500.0);

/// Acoustic cues feeding one prediction. Every field is optional; absent
/// cues fall back to the documented neutral defaults. F1 and F2 are
/// separate named fields — which band a value belongs to is declared by
/// the caller, never inferred from its magnitude.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PerceptionCues {
    /// Fundamental frequency in Hz.
    pub pitch: Option<f64>,
    /// First formant in Hz.
    pub f1: Option<f64>,
    /// Second formant in Hz. Preferred over F1 when both are usable.
    pub f2: Option<f64>,
    /// Legacy resonance brightness index, 0-100.
    pub brightness: Option<f64>,
    /// Explicit vocal weight measurement, 0-100.
    pub vocal_weight: Option<f64>,
    /// H1-H2 in dB; stands in for vocal weight when no explicit value.
    pub h1_h2: Option<f64>,
    /// Breathiness measurement, 0-100.
    pub breathiness: Option<f64>,
}

/// Per-factor contributions, each in [0, 1]. 0.5 is neutral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Contributions {
    pub pitch: f64,
    pub resonance: f64,
    pub vocal_weight: f64,
    pub breathiness: f64,
}

impl Contributions {
    pub const ZERO: Self = Self {
        pitch: 0.0,
        resonance: 0.0,
        vocal_weight: 0.0,
        breathiness: 0.0,
    };

    pub const NEUTRAL: Self = Self {
        pitch: 0.5,
        resonance: 0.5,
        vocal_weight: 0.5,
        breathiness: 0.5,
    };
}

/// One weight table. Each table sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Weights {
    pub pitch: f64,
    pub resonance: f64,
    pub vocal_weight: f64,
    pub breathiness: f64,
}

/// Weights inside the ambiguity zone: resonance dominates.
pub const WEIGHTS_IN_ZONE: Weights = Weights {
    pitch: 0.20,
    resonance: 0.40,
    vocal_weight: 0.30,
    breathiness: 0.10,
};

/// Weights below the zone: pitch carries half the score.
pub const WEIGHTS_BELOW_ZONE: Weights = Weights {
    pitch: 0.50,
    resonance: 0.25,
    vocal_weight: 0.20,
    breathiness: 0.05,
};

/// Weights above the zone.
pub const WEIGHTS_ABOVE_ZONE: Weights = Weights {
    pitch: 0.45,
    resonance: 0.30,
    vocal_weight: 0.20,
    breathiness: 0.05,
};

/// Which input fed the resonance factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResonanceSource {
    F2,
    F1,
    Brightness,
    Neutral,
}

/// Which input fed the vocal weight factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VocalWeightSource {
    Explicit,
    H1H2,
    Neutral,
}

/// Which input fed the breathiness factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreathinessSource {
    Explicit,
    Neutral,
}

/// Which inputs each factor actually consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CueSources {
    pub resonance: ResonanceSource,
    pub vocal_weight: VocalWeightSource,
    pub breathiness: BreathinessSource,
}

impl CueSources {
    pub const NEUTRAL: Self = Self {
        resonance: ResonanceSource::Neutral,
        vocal_weight: VocalWeightSource::Neutral,
        breathiness: BreathinessSource::Neutral,
    };
}

/// One prediction. Score runs dark/low (0.0) to bright/high (1.0);
/// 0.5 is the ambiguous middle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Perception {
    pub score: f64,
    pub confidence: f64,
    /// Score landed in [0.4, 0.6].
    pub is_ambiguous: bool,
    /// Pitch was inside the 135-175 Hz ambiguity zone.
    pub in_ambiguity_zone: bool,
    pub contributions: Contributions,
    /// Weight table used; `None` when no table applied (missing pitch,
    /// unvoiced window).
    pub weights: Option<Weights>,
    pub sources: CueSources,
}

impl Perception {
    /// Entry for an unvoiced window: no evidence either way, so every
    /// contribution sits at the 0.5 midpoint.
    pub fn neutral() -> Self {
        Self {
            score: 0.5,
            confidence: 0.0,
            is_ambiguous: false,
            in_ambiguity_zone: false,
            contributions: Contributions::NEUTRAL,
            weights: None,
            sources: CueSources::NEUTRAL,
        }
    }

    /// Result when pitch is missing or implausible: the cues were
    /// rejected, so contributions report 0 rather than the neutral 0.5.
    fn no_pitch() -> Self {
        Self {
            score: 0.5,
            confidence: 0.0,
            is_ambiguous: true,
            in_ambiguity_zone: false,
            contributions: Contributions::ZERO,
            weights: None,
            sources: CueSources::NEUTRAL,
        }
    }
}

/// Predict perceived voice character from one window's cues.
///
/// Pure and deterministic: identical cues always produce an identical,
/// 2-decimal-rounded result.
pub fn predict_perception(cues: &PerceptionCues) -> Perception {
    let pitch = match cues.pitch {
        Some(p) if (PITCH_VALID_HZ.0..=PITCH_VALID_HZ.1).contains(&p) => p,
        _ => return Perception::no_pitch(),
    };

    // ── Contributions (each 0-1, 0.5 neutral) ─────────────────────────

    let pitch_contrib = sigmoid((pitch - PITCH_CROSSOVER_HZ) / PITCH_SCALE_HZ);

    // Resonance: F2 is the strongest cue when usable, then F1, then the
    // legacy brightness index.
    let (resonance_contrib, resonance_source) = match (cues.f2, cues.f1, cues.brightness) {
        (Some(f2), _, _) if f2 > 1000.0 && f2 < 3500.0 => (
            sigmoid((f2 - F2_CROSSOVER_HZ) / F2_SCALE_HZ),
            ResonanceSource::F2,
        ),
        (_, Some(f1), _) if f1 > 200.0 && f1 < 1200.0 => (
            sigmoid((f1 - F1_CROSSOVER_HZ) / F1_SCALE_HZ),
            ResonanceSource::F1,
        ),
        (_, _, Some(index)) => ((index / 100.0).clamp(0.0, 1.0), ResonanceSource::Brightness),
        _ => (0.5, ResonanceSource::Neutral),
    };

    // Vocal weight: explicit measurement wins; H1-H2 maps 0-10 dB onto
    // the full contribution range.
    let (vocal_weight_contrib, vocal_weight_source) = match (cues.vocal_weight, cues.h1_h2) {
        (Some(vw), _) => ((vw / 100.0).clamp(0.0, 1.0), VocalWeightSource::Explicit),
        (None, Some(h)) => (h.clamp(0.0, 10.0) / 10.0, VocalWeightSource::H1H2),
        (None, None) => (0.5, VocalWeightSource::Neutral),
    };

    let (breathiness_contrib, breathiness_source) = match cues.breathiness {
        Some(b) => ((b / 100.0).clamp(0.0, 1.0), BreathinessSource::Explicit),
        None => (0.5, BreathinessSource::Neutral),
    };

    let contributions = Contributions {
        pitch: pitch_contrib,
        resonance: resonance_contrib,
        vocal_weight: vocal_weight_contrib,
        breathiness: breathiness_contrib,
    };

    // ── Weighted score ────────────────────────────────────────────────

    let in_ambiguity_zone = pitch >= AMBIGUITY_ZONE_HZ.0 && pitch <= AMBIGUITY_ZONE_HZ.1;
    let weights = weight_table(pitch);

    let mut score = contributions.pitch * weights.pitch
        + contributions.resonance * weights.resonance
        + contributions.vocal_weight * weights.vocal_weight
        + contributions.breathiness * weights.breathiness;

    // Agreement boost: when the four contributions cluster, push the
    // score away from the ambiguous middle. Mean absolute deviation can
    // reach at most 0.5, so agreement lives in [0.5, 1].
    let values = [
        contributions.pitch,
        contributions.resonance,
        contributions.vocal_weight,
        contributions.breathiness,
    ];
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let spread = values.iter().map(|c| (c - mean).abs()).sum::<f64>() / values.len() as f64;
    let agreement = 1.0 - spread;

    if agreement > 0.75 {
        let boost = (agreement - 0.75) * 0.2;
        if score > 0.5 {
            score += boost;
        } else {
            score -= boost;
        }
    }
    let score = score.clamp(0.0, 1.0);

    let confidence = ((score - 0.5).abs() * 2.0 * agreement).clamp(0.0, 1.0);

    // Ambiguity is judged on the unrounded score.
    let is_ambiguous = (0.4..=0.6).contains(&score);

    Perception {
        score: round2(score),
        confidence: round2(confidence),
        is_ambiguous,
        in_ambiguity_zone,
        contributions: Contributions {
            pitch: round2(contributions.pitch),
            resonance: round2(contributions.resonance),
            vocal_weight: round2(contributions.vocal_weight),
            breathiness: round2(contributions.breathiness),
        },
        weights: Some(weights),
        sources: CueSources {
            resonance: resonance_source,
            vocal_weight: vocal_weight_source,
            breathiness: breathiness_source,
        },
    }
}

/// Weight table selection is a function of pitch alone: three exhaustive,
/// non-overlapping bands.
fn weight_table(pitch: f64) -> Weights {
    if pitch < AMBIGUITY_ZONE_HZ.0 {
        WEIGHTS_BELOW_ZONE
    } else if pitch <= AMBIGUITY_ZONE_HZ.1 {
        WEIGHTS_IN_ZONE
    } else {
        WEIGHTS_ABOVE_ZONE
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ── Labels & explanations ─────────────────────────────────────────────

/// Vocabulary used when projecting scores into labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    /// Acoustic labels ("Dark / Low" .. "Bright / High").
    #[default]
    Neutral,
    /// Gendered labels ("Masculine" .. "Feminine").
    Gendered,
    /// No labels at all.
    Off,
}

/// Label for a single score. Thresholds at 0.2 / 0.4 / 0.6 / 0.8.
pub fn perception_label(score: f64, mode: LabelMode) -> &'static str {
    match mode {
        LabelMode::Off => "",
        LabelMode::Gendered => {
            if score < 0.2 {
                "Masculine"
            } else if score < 0.4 {
                "Masc-Leaning"
            } else if score < 0.6 {
                "Ambiguous"
            } else if score < 0.8 {
                "Fem-Leaning"
            } else {
                "Feminine"
            }
        }
        LabelMode::Neutral => {
            if score < 0.2 {
                "Dark / Low"
            } else if score < 0.4 {
                "Dark-Leaning"
            } else if score < 0.6 {
                "Balanced"
            } else if score < 0.8 {
                "Bright-Leaning"
            } else {
                "Bright / High"
            }
        }
    }
}

/// One-sentence reading of a prediction, phrased for the chosen mode.
pub fn perception_explanation(p: &Perception, mode: LabelMode) -> String {
    let (bright, dark, middle) = match mode {
        LabelMode::Gendered => ("feminine", "masculine", "ambiguous"),
        _ => ("bright", "dark", "balanced"),
    };
    let pc = p.contributions.pitch;
    let rc = p.contributions.resonance;

    if p.in_ambiguity_zone {
        if rc > 0.6 {
            return format!(
                "Pitch is in the middle range, but your bright resonance shifts perception {bright}."
            );
        }
        if rc < 0.4 {
            return format!(
                "Pitch is in the middle range, but your dark resonance shifts perception {dark}."
            );
        }
        return format!("Both pitch and resonance are in the {middle} zone.");
    }

    if pc > 0.7 && rc > 0.7 {
        format!("Strong {bright} cues from both pitch and resonance.")
    } else if pc < 0.3 && rc < 0.3 {
        format!("Strong {dark} cues from both pitch and resonance.")
    } else if (pc - rc).abs() > 0.4 {
        let p_term = if pc > 0.5 { bright } else { dark };
        let r_term = if rc > 0.5 { bright } else { dark };
        format!("Pitch suggests {p_term}, but resonance suggests {r_term}.")
    } else {
        format!("Perception: {}", perception_label(p.score, mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cues(pitch: f64) -> PerceptionCues {
        PerceptionCues {
            pitch: Some(pitch),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_pitch_returns_rejection_default() {
        let p = predict_perception(&PerceptionCues::default());
        assert_eq!(p.score, 0.5);
        assert_eq!(p.confidence, 0.0);
        assert!(p.is_ambiguous);
        assert!(!p.in_ambiguity_zone);
        assert_eq!(p.contributions, Contributions::ZERO);
        assert_eq!(p.weights, None);
    }

    #[test]
    fn test_out_of_range_pitch_rejected() {
        for pitch in [10.0, 49.9, 500.1, 4000.0] {
            let p = predict_perception(&cues(pitch));
            assert_eq!(p.score, 0.5, "pitch {pitch} should be rejected");
            assert_eq!(p.contributions, Contributions::ZERO);
        }
    }

    #[test]
    fn test_outputs_bounded_across_pitch_range() {
        let mut pitch = PITCH_VALID_HZ.0;
        while pitch <= PITCH_VALID_HZ.1 {
            for extra in [
                PerceptionCues::default(),
                PerceptionCues {
                    f2: Some(2400.0),
                    h1_h2: Some(8.0),
                    ..Default::default()
                },
                PerceptionCues {
                    f1: Some(400.0),
                    vocal_weight: Some(90.0),
                    breathiness: Some(10.0),
                    ..Default::default()
                },
            ] {
                let p = predict_perception(&PerceptionCues {
                    pitch: Some(pitch),
                    ..extra
                });
                for v in [
                    p.score,
                    p.confidence,
                    p.contributions.pitch,
                    p.contributions.resonance,
                    p.contributions.vocal_weight,
                    p.contributions.breathiness,
                ] {
                    assert!((0.0..=1.0).contains(&v), "value {v} at pitch {pitch}");
                }
            }
            pitch += 5.0;
        }
    }

    #[test]
    fn test_weight_bands_are_exhaustive_and_pitch_only() {
        // Band membership depends on pitch alone; other cues must not
        // move a prediction between tables.
        let rich = PerceptionCues {
            f2: Some(2800.0),
            vocal_weight: Some(95.0),
            breathiness: Some(80.0),
            ..Default::default()
        };
        for (pitch, expected) in [
            (50.0, WEIGHTS_BELOW_ZONE),
            (134.9, WEIGHTS_BELOW_ZONE),
            (135.0, WEIGHTS_IN_ZONE),
            (157.0, WEIGHTS_IN_ZONE),
            (175.0, WEIGHTS_IN_ZONE),
            (175.1, WEIGHTS_ABOVE_ZONE),
            (500.0, WEIGHTS_ABOVE_ZONE),
        ] {
            let bare = predict_perception(&cues(pitch));
            let full = predict_perception(&PerceptionCues {
                pitch: Some(pitch),
                ..rich
            });
            assert_eq!(bare.weights, Some(expected), "bare cues at {pitch} Hz");
            assert_eq!(full.weights, Some(expected), "rich cues at {pitch} Hz");
        }
    }

    #[test]
    fn test_each_table_sums_to_one() {
        for w in [WEIGHTS_IN_ZONE, WEIGHTS_BELOW_ZONE, WEIGHTS_ABOVE_ZONE] {
            let sum = w.pitch + w.resonance + w.vocal_weight + w.breathiness;
            assert!((sum - 1.0).abs() < 1e-12, "weights sum to {sum}");
        }
    }

    #[test]
    fn test_bright_reference_scenario() {
        // pitch 190 Hz, F2 2200 Hz, everything else defaulted:
        // contributions ~0.79/0.79/0.5/0.5, above-zone weights, raw score
        // ~0.718, agreement ~0.855 earns a ~0.021 boost.
        let p = predict_perception(&PerceptionCues {
            pitch: Some(190.0),
            f2: Some(2200.0),
            ..Default::default()
        });

        assert!((p.score - 0.74).abs() <= 0.02, "score = {}", p.score);
        assert!((p.confidence - 0.41).abs() <= 0.03, "confidence = {}", p.confidence);
        assert_eq!(p.weights, Some(WEIGHTS_ABOVE_ZONE));
        assert_eq!(p.sources.resonance, ResonanceSource::F2);
        assert!(!p.in_ambiguity_zone);
        assert!(!p.is_ambiguous);
    }

    #[test]
    fn test_dark_voice_scores_low() {
        let p = predict_perception(&PerceptionCues {
            pitch: Some(100.0),
            f2: Some(1100.0),
            ..Default::default()
        });
        assert!(p.score < 0.3, "score = {}", p.score);
        assert!(p.confidence > 0.3, "confidence = {}", p.confidence);
        assert_eq!(p.weights, Some(WEIGHTS_BELOW_ZONE));
    }

    #[test]
    fn test_zone_resonance_dominates() {
        // Mid pitch, bright F2: the in-zone table gives resonance 0.40,
        // so the score should land clearly bright.
        let p = predict_perception(&PerceptionCues {
            pitch: Some(155.0),
            f2: Some(2600.0),
            ..Default::default()
        });
        assert!(p.in_ambiguity_zone);
        assert!(p.score > 0.6, "score = {}", p.score);
    }

    #[test]
    fn test_crossover_pitch_alone_is_ambiguous() {
        // Pitch at the 157 Hz crossover and no other cues: all four
        // contributions sit at 0.5. Float residue in the weighted sum
        // lands a hair above 0.5, so the full-agreement boost of 0.05
        // pushes the score up to 0.55. Still inside the ambiguous band.
        let p = predict_perception(&cues(157.0));
        assert_eq!(p.score, 0.55);
        assert!(p.is_ambiguous);
        assert!(p.in_ambiguity_zone);
        assert_eq!(p.confidence, 0.1);
    }

    #[test]
    fn test_determinism() {
        let input = PerceptionCues {
            pitch: Some(163.0),
            f2: Some(2050.0),
            h1_h2: Some(4.2),
            breathiness: Some(55.0),
            ..Default::default()
        };
        assert_eq!(predict_perception(&input), predict_perception(&input));
    }

    #[test]
    fn test_resonance_fallback_chain() {
        // F2 out of its usable band falls through to F1.
        let p = predict_perception(&PerceptionCues {
            pitch: Some(200.0),
            f2: Some(4000.0),
            f1: Some(600.0),
            ..Default::default()
        });
        assert_eq!(p.sources.resonance, ResonanceSource::F1);

        // No formants at all falls through to the brightness index.
        let p = predict_perception(&PerceptionCues {
            pitch: Some(200.0),
            brightness: Some(70.0),
            ..Default::default()
        });
        assert_eq!(p.sources.resonance, ResonanceSource::Brightness);
        assert_eq!(p.contributions.resonance, 0.7);

        // Nothing usable is neutral.
        let p = predict_perception(&cues(200.0));
        assert_eq!(p.sources.resonance, ResonanceSource::Neutral);
        assert_eq!(p.contributions.resonance, 0.5);
    }

    #[test]
    fn test_vocal_weight_sources() {
        // Explicit value wins over H1-H2.
        let p = predict_perception(&PerceptionCues {
            pitch: Some(200.0),
            vocal_weight: Some(80.0),
            h1_h2: Some(2.0),
            ..Default::default()
        });
        assert_eq!(p.sources.vocal_weight, VocalWeightSource::Explicit);
        assert_eq!(p.contributions.vocal_weight, 0.8);

        // H1-H2 maps 0-10 dB onto 0-1, clamped at both ends.
        for (h, expected) in [(-5.0, 0.0), (0.0, 0.0), (5.0, 0.5), (10.0, 1.0), (15.0, 1.0)] {
            let p = predict_perception(&PerceptionCues {
                pitch: Some(200.0),
                h1_h2: Some(h),
                ..Default::default()
            });
            assert_eq!(p.sources.vocal_weight, VocalWeightSource::H1H2);
            assert_eq!(p.contributions.vocal_weight, expected, "h1h2 = {h}");
        }
    }

    #[test]
    fn test_breathiness_clamped() {
        for (b, expected) in [(-10.0, 0.0), (30.0, 0.3), (150.0, 1.0)] {
            let p = predict_perception(&PerceptionCues {
                pitch: Some(200.0),
                breathiness: Some(b),
                ..Default::default()
            });
            assert_eq!(p.contributions.breathiness, expected, "breathiness = {b}");
        }
    }

    #[test]
    fn test_outputs_rounded_to_two_decimals() {
        let p = predict_perception(&PerceptionCues {
            pitch: Some(183.0),
            f2: Some(2347.0),
            h1_h2: Some(3.7),
            ..Default::default()
        });
        for v in [
            p.score,
            p.confidence,
            p.contributions.pitch,
            p.contributions.resonance,
            p.contributions.vocal_weight,
            p.contributions.breathiness,
        ] {
            assert!(((v * 100.0).round() - v * 100.0).abs() < 1e-9, "unrounded {v}");
        }
    }

    #[test]
    fn test_neutral_entry_for_unvoiced() {
        let p = Perception::neutral();
        assert_eq!(p.score, 0.5);
        assert_eq!(p.confidence, 0.0);
        assert!(!p.is_ambiguous);
        assert!(!p.in_ambiguity_zone);
        assert_eq!(p.contributions, Contributions::NEUTRAL);
        assert_eq!(p.weights, None);
    }

    #[test]
    fn test_labels_per_mode() {
        for (score, gendered, neutral) in [
            (0.1, "Masculine", "Dark / Low"),
            (0.2, "Masc-Leaning", "Dark-Leaning"),
            (0.39, "Masc-Leaning", "Dark-Leaning"),
            (0.4, "Ambiguous", "Balanced"),
            (0.59, "Ambiguous", "Balanced"),
            (0.6, "Fem-Leaning", "Bright-Leaning"),
            (0.8, "Feminine", "Bright / High"),
            (1.0, "Feminine", "Bright / High"),
        ] {
            assert_eq!(perception_label(score, LabelMode::Gendered), gendered);
            assert_eq!(perception_label(score, LabelMode::Neutral), neutral);
            assert_eq!(perception_label(score, LabelMode::Off), "");
        }
    }

    #[test]
    fn test_explanation_zone_phrasing() {
        let p = predict_perception(&PerceptionCues {
            pitch: Some(155.0),
            f2: Some(2600.0),
            ..Default::default()
        });
        let text = perception_explanation(&p, LabelMode::Neutral);
        assert!(text.contains("bright resonance"), "{text}");
        let text = perception_explanation(&p, LabelMode::Gendered);
        assert!(text.contains("feminine"), "{text}");
    }

    #[test]
    fn test_explanation_conflict_phrasing() {
        // High pitch, dark resonance: contributions disagree by > 0.4.
        let p = predict_perception(&PerceptionCues {
            pitch: Some(220.0),
            f2: Some(1200.0),
            ..Default::default()
        });
        let text = perception_explanation(&p, LabelMode::Neutral);
        assert!(
            text.contains("Pitch suggests bright, but resonance suggests dark."),
            "{text}"
        );
    }

    #[test]
    fn test_explanation_strong_agreement() {
        let p = predict_perception(&PerceptionCues {
            pitch: Some(230.0),
            f2: Some(2800.0),
            ..Default::default()
        });
        let text = perception_explanation(&p, LabelMode::Neutral);
        assert!(text.contains("Strong bright cues"), "{text}");
    }
}
