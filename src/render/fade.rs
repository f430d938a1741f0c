//! Boundary fades: short linear ramps that remove clicks at segment joins.

/// One rendered segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub samples: Vec<f32>,
    /// Produced by a `Wait` instance.
    pub silent: bool,
}

impl Segment {
    pub fn voiced(samples: Vec<f32>) -> Self {
        Self {
            samples,
            silent: false,
        }
    }

    pub fn silence(len: usize) -> Self {
        Self {
            samples: vec![0.0; len],
            silent: true,
        }
    }

    /// Whether every sample sits at the neutral level.
    pub fn is_neutral(&self) -> bool {
        self.samples.iter().all(|&s| s == 0.0)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Fade length in samples for `fade_ms` at `sample_rate`.
pub fn fade_len(sample_rate: u32, fade_ms: f64) -> usize {
    (sample_rate as f64 * fade_ms / 1000.0).round().max(0.0) as usize
}

/// Scale the first and/or last samples of `samples` by a linear ramp.
///
/// The ramp is capped at half the buffer so fade-in and fade-out never overlap.
pub fn apply_fade(samples: &mut [f32], len: usize, fade_in: bool, fade_out: bool) {
    let n = len.min(samples.len() / 2);
    if n == 0 {
        return;
    }
    let total = samples.len();
    for i in 0..n {
        let gain = i as f32 / n as f32;
        if fade_in {
            samples[i] *= gain;
        }
        if fade_out {
            samples[total - 1 - i] *= gain;
        }
    }
}

/// Fade every voiced segment at its joins.
///
/// The first segment keeps its start and the last keeps its end; silent and
/// neutral segments are left untouched.
pub fn fade_segments(segments: &mut [Segment], len: usize) {
    let last = segments.len().saturating_sub(1);
    for (i, segment) in segments.iter_mut().enumerate() {
        if segment.silent || segment.is_neutral() {
            continue;
        }
        apply_fade(&mut segment.samples, len, i != 0, i != last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn fade_len_rounds() {
        assert_eq!(fade_len(44_100, 5.0), 221);
        assert_eq!(fade_len(44_100, 0.0), 0);
        assert_eq!(fade_len(1000, 2.4), 2);
    }

    #[test]
    fn fade_in_ramps_from_zero() {
        let mut s = vec![1.0; 10];
        apply_fade(&mut s, 4, true, false);
        assert_eq!(&s[..4], &[0.0, 0.25, 0.5, 0.75]);
        assert!(s[4..].iter().all(|&v| v == 1.0));
    }

    #[test]
    fn fade_out_ramps_to_zero() {
        let mut s = vec![-1.0; 10];
        apply_fade(&mut s, 4, false, true);
        assert_eq!(&s[6..], &[-0.75, -0.5, -0.25, 0.0]);
        assert!(s[..6].iter().all(|&v| v == -1.0));
    }

    #[test]
    fn fade_capped_at_half_segment() {
        let mut s = vec![1.0; 6];
        apply_fade(&mut s, 100, true, true);
        assert_approx_eq!(s[0], 0.0);
        assert_approx_eq!(s[1], 1.0 / 3.0);
        assert_approx_eq!(s[2], 2.0 / 3.0);
        assert_approx_eq!(s[3], 2.0 / 3.0);
        assert_approx_eq!(s[5], 0.0);
    }

    #[test]
    fn tiny_segment_untouched() {
        let mut s = vec![0.8];
        apply_fade(&mut s, 10, true, true);
        assert_eq!(s, vec![0.8]);
    }

    #[test]
    fn outer_boundaries_preserved() {
        let mut segs = vec![
            Segment::voiced(vec![1.0; 8]),
            Segment::voiced(vec![1.0; 8]),
            Segment::voiced(vec![1.0; 8]),
        ];
        fade_segments(&mut segs, 2);
        assert_eq!(segs[0].samples[0], 1.0);
        assert_eq!(segs[0].samples[7], 0.0);
        assert_eq!(segs[1].samples[0], 0.0);
        assert_eq!(segs[1].samples[7], 0.0);
        assert_eq!(segs[2].samples[0], 0.0);
        assert_eq!(segs[2].samples[7], 1.0);
    }

    #[test]
    fn silence_never_faded() {
        let mut segs = vec![Segment::voiced(vec![1.0; 8]), Segment::silence(8)];
        fade_segments(&mut segs, 2);
        assert!(segs[1].samples.iter().all(|&v| v == 0.0));
        assert_eq!(segs[0].samples[0], 1.0);
        assert_eq!(segs[0].samples[7], 0.0);
    }

    #[test]
    fn neutral_voiced_segment_skipped() {
        let mut segs = vec![Segment::voiced(vec![0.0; 8]), Segment::voiced(vec![1.0; 8])];
        assert!(segs[0].is_neutral());
        fade_segments(&mut segs, 2);
        assert_eq!(segs[1].samples[0], 0.0);
        assert_eq!(segs[1].samples[7], 1.0);
    }

    #[test]
    fn single_segment_untouched() {
        let mut segs = vec![Segment::voiced(vec![0.5; 8])];
        fade_segments(&mut segs, 2);
        assert!(segs[0].samples.iter().all(|&v| v == 0.5));
    }

    #[test]
    fn fades_keep_length() {
        let mut segs = vec![Segment::voiced(vec![1.0; 9]), Segment::voiced(vec![1.0; 5])];
        fade_segments(&mut segs, 3);
        assert_eq!(segs[0].len(), 9);
        assert_eq!(segs[1].len(), 5);
    }
}
