//! Energy-peak picking
//!
//! Flags local RMS maxima that stand clear of the track's mean energy,
//! marking candidate high-energy sections (choruses, drops) without firing on
//! every local wiggle. When two candidates fall inside the minimum gap the
//! higher one survives (height-priority, matching the behaviour of the
//! classic `find_peaks` distance rule).

/// Numerical stability epsilon
const EPSILON: f32 = 1e-10;

/// Pick energy peaks from an RMS envelope
///
/// # Arguments
///
/// * `rms` - RMS envelope, one value per frame
/// * `threshold_factor` - A peak must exceed `mean(rms) * threshold_factor`
/// * `min_gap_frames` - Minimum index separation between surviving peaks
///
/// # Returns
///
/// Frame indices of surviving peaks in increasing order. An all-zero
/// envelope produces no peaks: the threshold is floored by epsilon so a
/// zero mean never lets zero-height frames through.
pub fn pick_energy_peaks(rms: &[f32], threshold_factor: f32, min_gap_frames: usize) -> Vec<usize> {
    if rms.len() < 3 {
        return Vec::new();
    }

    let mean = rms.iter().sum::<f32>() / rms.len() as f32;
    let height = (mean * threshold_factor).max(EPSILON);
    let min_gap = min_gap_frames.max(1);

    log::debug!(
        "Picking energy peaks: {} frames, height threshold {:.6}, min gap {} frames",
        rms.len(),
        height,
        min_gap
    );

    // Candidate local maxima above the height threshold
    let mut candidates: Vec<usize> = Vec::new();
    for i in 1..rms.len() - 1 {
        if rms[i] > rms[i - 1] && rms[i] >= rms[i + 1] && rms[i] >= height {
            candidates.push(i);
        }
    }

    // Height-priority gap enforcement: tallest candidates claim their
    // neighbourhood first
    let mut by_height = candidates.clone();
    by_height.sort_by(|&a, &b| {
        rms[b]
            .partial_cmp(&rms[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut accepted: Vec<usize> = Vec::new();
    for i in by_height {
        if accepted
            .iter()
            .all(|&j| i.abs_diff(j) >= min_gap)
        {
            accepted.push(i);
        }
    }

    accepted.sort_unstable();
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_peaks_in_silence() {
        let rms = vec![0.0f32; 200];
        let peaks = pick_energy_peaks(&rms, 1.2, 9);
        assert!(peaks.is_empty());
    }

    #[test]
    fn test_single_bump_single_peak() {
        let mut rms = vec![0.1f32; 100];
        for (offset, value) in [(48, 0.3), (49, 0.6), (50, 1.0), (51, 0.6), (52, 0.3)] {
            rms[offset] = value;
        }
        let peaks = pick_energy_peaks(&rms, 1.2, 9);
        assert_eq!(peaks, vec![50]);
    }

    #[test]
    fn test_peaks_respect_min_gap() {
        let mut rms = vec![0.1f32; 100];
        rms[40] = 1.0;
        rms[44] = 0.9;
        rms[60] = 0.8;
        let peaks = pick_energy_peaks(&rms, 1.2, 9);
        // 44 is inside 40's gap and shorter, so it loses
        assert_eq!(peaks, vec![40, 60]);
        for pair in peaks.windows(2) {
            assert!(pair[1] - pair[0] >= 9);
        }
    }

    #[test]
    fn test_higher_peak_wins_inside_gap() {
        let mut rms = vec![0.1f32; 100];
        rms[40] = 0.7;
        rms[45] = 1.0;
        let peaks = pick_energy_peaks(&rms, 1.2, 9);
        assert_eq!(peaks, vec![45]);
    }

    #[test]
    fn test_peaks_exceed_mean_threshold() {
        let rms: Vec<f32> = (0..300)
            .map(|i| 0.2 + 0.3 * ((i as f32) * 0.1).sin().max(0.0))
            .collect();
        let factor = 1.2;
        let peaks = pick_energy_peaks(&rms, factor, 5);
        let mean = rms.iter().sum::<f32>() / rms.len() as f32;
        for &peak in &peaks {
            assert!(rms[peak] >= mean * factor);
        }
    }

    #[test]
    fn test_flat_loud_signal_produces_no_peaks() {
        // Loud but flat: no local maxima exceed the scaled mean
        let rms = vec![0.8f32; 150];
        let peaks = pick_energy_peaks(&rms, 1.2, 9);
        assert!(peaks.is_empty());
    }

    #[test]
    fn test_too_short_envelope() {
        assert!(pick_energy_peaks(&[1.0, 2.0], 1.2, 5).is_empty());
    }
}
