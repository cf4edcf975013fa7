//! Flags controlling how a rotation scheme is applied

/// Selection flags for one rotation run
///
/// - `strict`: enforce each frequency's time window relative to the newest
///   backup (default). Relaxed rotation keeps the N most recent periods
///   regardless of how far back they reach.
/// - `prefer_recent`: pick the newest backup of each period instead of the
///   oldest.
/// - `include` / `exclude`: shell patterns matched against entry names.
///   Exclusion wins over inclusion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationFlags {
    /// Enforce the time window of each frequency
    pub strict: bool,

    /// Prefer the newest backup within a period
    pub prefer_recent: bool,

    /// Only consider entries matching one of these patterns (when non-empty)
    pub include: Vec<String>,

    /// Never consider entries matching any of these patterns
    pub exclude: Vec<String>,
}

impl Default for RotationFlags {
    fn default() -> Self {
        Self {
            strict: true,
            prefer_recent: false,
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl RotationFlags {
    /// Default flags with strict rotation disabled
    pub fn relaxed() -> Self {
        Self {
            strict: false,
            ..Default::default()
        }
    }
}
