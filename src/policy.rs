/// How a window containing NaN samples should be resolved to a median.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NanPolicy {
  /// If any sample in the window is NaN, the emitted median is NaN.
  Strict,
  /// NaNs are excluded from the window before taking the median; a window
  /// with no remaining samples emits NaN.
  Tolerant,
}

impl NanPolicy {
  #[inline]
  pub(crate) fn is_strict(self) -> bool {
    matches!(self, NanPolicy::Strict)
  }
}
