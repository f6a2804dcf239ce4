//! Safety limits for substitution runs
//!
//! The frame cap bounds how many placeholder frames a single scan will
//! rewrite, so adversarial input cannot make a run do unbounded work.

/// Default number of frames rewritten per input
pub const DEFAULT_MAX_FRAMES: usize = 10_000;

/// Limits applied to every scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstitutionLimits {
    /// Maximum number of frames processed per scan; later frames are copied verbatim
    pub max_frames: usize,
}

impl Default for SubstitutionLimits {
    fn default() -> Self {
        Self {
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }
}

impl SubstitutionLimits {
    /// Create limits with a custom frame cap
    pub fn with_max_frames(max_frames: usize) -> Self {
        Self { max_frames }
    }
}
