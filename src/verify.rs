/// Outcome of a write followed by a readback.
///
/// A mismatch is reported, not retried; the caller decides what to do with
/// a location that did not take the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verification {
    /// The device returned exactly the bytes that were written.
    Verified,
    /// The first differing byte, as an absolute device offset.
    Mismatch { offset: u16 },
}

impl Verification {
    pub fn is_verified(&self) -> bool {
        matches!(self, Verification::Verified)
    }
}

/// Index of the first byte where `expected` and `actual` differ.
pub(crate) fn first_mismatch(expected: &[u8], actual: &[u8]) -> Option<usize> {
    expected
        .iter()
        .zip(actual)
        .position(|(e, a)| e != a)
        .or_else(|| (expected.len() != actual.len()).then_some(expected.len().min(actual.len())))
}
