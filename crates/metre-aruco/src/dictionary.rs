//! Dictionary metadata and packed marker codes.

/// A fixed ArUco/AprilTag-style dictionary.
#[derive(Clone, Copy, Debug)]
pub struct Dictionary {
    /// Human-readable name (for configuration and logging).
    pub name: &'static str,
    /// Marker side length (number of inner bits per side).
    pub marker_size: usize,
    /// Maximum error-correcting Hamming distance supported by the dictionary.
    pub max_correction_bits: u8,
    /// One `u64` per marker id, encoding the inner `marker_size × marker_size` bits.
    ///
    /// Bit `row * marker_size + col` (least significant first) is the module
    /// at that position; **white = 1**.
    pub codes: &'static [u64],
}

impl Dictionary {
    /// Total number of inner bits per marker.
    #[inline]
    pub fn bit_count(&self) -> usize {
        self.marker_size * self.marker_size
    }

    /// Number of marker ids.
    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    #[inline]
    pub fn code(&self, id: u32) -> Option<u64> {
        self.codes.get(id as usize).copied()
    }

    /// Module colour at `(row, col)` of the data grid; `true` is white.
    pub fn module(&self, id: u32, row: usize, col: usize) -> Option<bool> {
        if row >= self.marker_size || col >= self.marker_size {
            return None;
        }
        let code = self.code(id)?;
        Some((code >> (row * self.marker_size + col)) & 1 == 1)
    }
}
