//! Onset event picking
//!
//! Local-maximum detection over the onset envelope with an adaptive
//! threshold: a frame is an onset if it is the maximum of a small
//! neighbourhood AND exceeds the surrounding moving average by a
//! multiplicative margin. Flat or globally loud stretches therefore do not
//! flood the output, and candidates closer than the minimum separation to
//! an accepted onset are dropped.

/// Numerical stability epsilon
const EPSILON: f32 = 1e-10;

/// Onset peak-picking parameters
#[derive(Debug, Clone)]
pub struct OnsetPicker {
    /// Frames before/after that a peak must dominate
    pub pre_max: usize,
    /// Frames before/after that a peak must dominate
    pub post_max: usize,
    /// Frames of local context averaged before the candidate
    pub pre_avg: usize,
    /// Frames of local context averaged after the candidate
    pub post_avg: usize,
    /// A peak must exceed `local_mean * threshold` to count as an onset
    pub threshold: f32,
    /// Minimum separation between accepted onsets, in frames
    pub min_separation: usize,
}

impl Default for OnsetPicker {
    fn default() -> Self {
        Self {
            pre_max: 3,
            post_max: 3,
            pre_avg: 30,
            post_avg: 30,
            threshold: 1.5,
            min_separation: 1,
        }
    }
}

/// Pick onset frames from an onset-strength envelope
///
/// Returns frame indices in increasing order. A perfectly flat envelope
/// (e.g. silence) produces no onsets: the additive epsilon floor keeps the
/// zero-mean case from passing the threshold.
pub fn pick_onsets(envelope: &[f32], picker: &OnsetPicker) -> Vec<usize> {
    let len = envelope.len();
    if len == 0 {
        return Vec::new();
    }

    log::debug!(
        "Picking onsets: {} frames, threshold={:.2}, min_separation={}",
        len,
        picker.threshold,
        picker.min_separation
    );

    let mut onsets: Vec<usize> = Vec::new();

    for i in 0..len {
        // Local maximum over [i - pre_max, i + post_max]
        let lo = i.saturating_sub(picker.pre_max);
        let hi = (i + picker.post_max).min(len - 1);
        if envelope[lo..=hi].iter().any(|&v| v > envelope[i]) {
            continue;
        }

        // Mean of the surrounding context, excluding the candidate itself
        let avg_lo = i.saturating_sub(picker.pre_avg);
        let avg_hi = (i + picker.post_avg).min(len - 1);
        let mut sum = 0.0f32;
        let mut count = 0usize;
        for (j, &value) in envelope[avg_lo..=avg_hi].iter().enumerate() {
            if avg_lo + j != i {
                sum += value;
                count += 1;
            }
        }
        let local_mean = if count > 0 { sum / count as f32 } else { 0.0 };

        if envelope[i] <= local_mean * picker.threshold + EPSILON {
            continue;
        }

        // Enforce minimum separation; earlier onset wins
        if let Some(&last) = onsets.last() {
            if i - last < picker.min_separation.max(1) {
                continue;
            }
        }

        onsets.push(i);
    }

    onsets
}
