///
/// Filters chains by one of their 8-bit masks (material or intersection masks)
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct MaskFilter {
    /// If false, every mask value is accepted
    pub enabled:    bool,

    /// The bits to look for
    pub bits:       u8,

    /// If true, the mask must equal `bits` exactly, otherwise any shared bit is a match
    pub exact:      bool,
}

impl MaskFilter {
    ///
    /// A filter that accepts any mask containing one of the specified bits
    ///
    pub fn any_of(bits: u8) -> MaskFilter {
        MaskFilter { enabled: true, bits: bits, exact: false }
    }

    ///
    /// A filter that only accepts masks that are exactly the specified bits
    ///
    pub fn exactly(bits: u8) -> MaskFilter {
        MaskFilter { enabled: true, bits: bits, exact: true }
    }

    ///
    /// True if a mask value passes this filter
    ///
    #[inline]
    pub fn matches(&self, mask: u8) -> bool {
        if !self.enabled {
            true
        } else if self.exact {
            mask == self.bits
        } else {
            (mask & self.bits) != 0
        }
    }
}
