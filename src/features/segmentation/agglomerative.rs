//! Contiguity-constrained agglomerative clustering
//!
//! Starts with every chroma frame as its own cluster and repeatedly merges
//! the two *temporally adjacent* clusters whose merge least increases the
//! total within-cluster variance (Ward linkage), until the target cluster
//! count remains. Only adjacent clusters ever merge: this is segmentation
//! in time, not arbitrary grouping.
//!
//! The Ward merge cost needs only per-cluster sums and sizes:
//! `cost(A, B) = |A||B| / (|A| + |B|) * ||centroid(A) - centroid(B)||²`.

use crate::error::AnalysisError;
use crate::features::spectral::Spectrogram;

/// Numerical stability epsilon
const EPSILON: f32 = 1e-10;

/// Segmentation outcome
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Frame index of the first frame of each segment after the first;
    /// strictly increasing, every index > 0
    pub boundaries: Vec<usize>,

    /// Requested segment count exceeded the frame count and was clamped
    pub clamped: bool,

    /// Every frame was identical (e.g. silence); boundaries would be
    /// arbitrary, so a single segment is reported instead
    pub degenerate: bool,
}

/// Cluster feature frames into contiguous segments
///
/// # Arguments
///
/// * `frames` - Feature frames (chroma vectors), one per time step
/// * `segment_count` - Target number of contiguous segments K
///
/// # Returns
///
/// K-1 ordered boundary frame indices. If K exceeds the frame count it is
/// clamped to it (flagged, not an error). If all frames are identical the
/// result collapses to a single segment and is flagged degenerate.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a zero segment count or
/// inconsistent frame dimensions.
pub fn segment_frames(
    frames: &Spectrogram,
    segment_count: usize,
) -> Result<Segmentation, AnalysisError> {
    if segment_count == 0 {
        return Err(AnalysisError::InvalidInput(
            "Segment count must be > 0".to_string(),
        ));
    }

    if frames.is_empty() {
        return Ok(Segmentation {
            boundaries: Vec::new(),
            clamped: false,
            degenerate: false,
        });
    }

    let dims = frames[0].len();
    for (i, frame) in frames.iter().enumerate() {
        if frame.len() != dims {
            return Err(AnalysisError::InvalidInput(format!(
                "Inconsistent frame dimensions: frame 0 has {}, frame {} has {}",
                dims,
                i,
                frame.len()
            )));
        }
    }

    let n = frames.len();
    let clamped = segment_count > n;
    let k = segment_count.min(n);

    // All-identical frames (silence folds to all-zero chroma) give zero
    // merge cost everywhere; any boundary placement would be arbitrary
    let degenerate = frames.iter().all(|frame| {
        frame
            .iter()
            .zip(frames[0].iter())
            .all(|(&a, &b)| (a - b).abs() < EPSILON)
    });
    if degenerate {
        log::warn!("All {} feature frames identical, collapsing to one segment", n);
        return Ok(Segmentation {
            boundaries: Vec::new(),
            clamped,
            degenerate: true,
        });
    }

    log::debug!(
        "Segmenting {} frames of dim {} into {} clusters{}",
        n,
        dims,
        k,
        if clamped { " (clamped)" } else { "" }
    );

    // One cluster per frame: (start frame, size, per-dimension sum)
    let mut starts: Vec<usize> = (0..n).collect();
    let mut sizes: Vec<usize> = vec![1; n];
    let mut sums: Vec<Vec<f32>> = frames.clone();

    // Ward cost between each cluster and its right neighbour
    let ward = |size_a: usize, sum_a: &[f32], size_b: usize, sum_b: &[f32]| -> f32 {
        let na = size_a as f32;
        let nb = size_b as f32;
        let mut dist_sq = 0.0f32;
        for (a, b) in sum_a.iter().zip(sum_b.iter()) {
            let diff = a / na - b / nb;
            dist_sq += diff * diff;
        }
        na * nb / (na + nb) * dist_sq
    };

    let mut costs: Vec<f32> = (0..n - 1)
        .map(|i| ward(sizes[i], &sums[i], sizes[i + 1], &sums[i + 1]))
        .collect();

    while starts.len() > k {
        // Cheapest adjacent pair; ties resolve to the earliest pair
        let mut best = 0usize;
        for (i, &cost) in costs.iter().enumerate() {
            if cost < costs[best] {
                best = i;
            }
        }

        // Merge cluster best+1 into cluster best
        sizes[best] += sizes[best + 1];
        let (left, right) = sums.split_at_mut(best + 1);
        for (a, b) in left[best].iter_mut().zip(right[0].iter()) {
            *a += b;
        }
        starts.remove(best + 1);
        sizes.remove(best + 1);
        sums.remove(best + 1);
        costs.remove(best);

        // Only the costs touching the merged cluster change
        if best > 0 {
            costs[best - 1] = ward(
                sizes[best - 1],
                &sums[best - 1],
                sizes[best],
                &sums[best],
            );
        }
        if best < costs.len() {
            costs[best] = ward(
                sizes[best],
                &sums[best],
                sizes[best + 1],
                &sums[best + 1],
            );
        }
    }

    // Boundary = first frame of every cluster after the first
    let boundaries = starts[1..].to_vec();

    Ok(Segmentation {
        boundaries,
        clamped,
        degenerate: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Frames holding `value` in dimension 0, zeros elsewhere
    fn block(value: f32, count: usize) -> Vec<Vec<f32>> {
        vec![vec![value, 0.0, 0.0, 0.0]; count]
    }

    #[test]
    fn test_two_block_signal_one_boundary() {
        let mut frames = block(1.0, 50);
        frames.extend(block(-1.0, 50));

        let result = segment_frames(&frames, 2).unwrap();
        assert!(!result.degenerate);
        assert!(!result.clamped);
        assert_eq!(result.boundaries, vec![50]);
    }

    #[test]
    fn test_three_blocks_two_boundaries() {
        let mut frames = block(1.0, 30);
        frames.extend(block(0.0, 30));
        frames.extend(block(-1.0, 30));

        let result = segment_frames(&frames, 3).unwrap();
        assert_eq!(result.boundaries, vec![30, 60]);
    }

    #[test]
    fn test_boundary_count_matches_target() {
        // Noisy-ish but deterministic frames: ramp in dimension 0
        let frames: Vec<Vec<f32>> = (0..100).map(|i| vec![i as f32, 0.0]).collect();

        for k in [2usize, 5, 10] {
            let result = segment_frames(&frames, k).unwrap();
            assert_eq!(result.boundaries.len(), k - 1, "k={}", k);
            for pair in result.boundaries.windows(2) {
                assert!(pair[0] < pair[1]);
            }
            for &b in &result.boundaries {
                assert!(b > 0 && b < 100);
            }
        }
    }

    #[test]
    fn test_identical_frames_collapse_to_one_segment() {
        let frames = block(0.0, 80);
        let result = segment_frames(&frames, 10).unwrap();
        assert!(result.degenerate);
        assert!(result.boundaries.is_empty());
    }

    #[test]
    fn test_segment_count_clamped_to_frame_count() {
        let frames: Vec<Vec<f32>> = (0..4).map(|i| vec![i as f32 * 10.0]).collect();
        let result = segment_frames(&frames, 10).unwrap();
        assert!(result.clamped);
        // Every frame its own segment: boundaries at 1, 2, 3
        assert_eq!(result.boundaries, vec![1, 2, 3]);
    }

    #[test]
    fn test_only_adjacent_clusters_merge() {
        // A-B-A pattern: unconstrained clustering would pool the two A
        // blocks into one cluster; contiguous clustering must keep three
        // segments with boundaries at the block edges
        let mut frames = block(1.0, 20);
        frames.extend(block(-1.0, 20));
        frames.extend(block(1.0, 20));

        let result = segment_frames(&frames, 3).unwrap();
        assert_eq!(result.boundaries, vec![20, 40]);
    }

    #[test]
    fn test_zero_segment_count_rejected() {
        assert!(segment_frames(&block(1.0, 10), 0).is_err());
    }

    #[test]
    fn test_empty_frames() {
        let result = segment_frames(&Vec::new(), 5).unwrap();
        assert!(result.boundaries.is_empty());
    }
}
