use std::ops::Range;

/// One bit of an external package port.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct IoNet(pub u32);

/// Bits of package ports, LSB first. Ports are allocated as contiguous ranges of `IoNet`s.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct IoValue {
    bits: Vec<IoNet>,
}

bit_vector!(IoValue, IoNet);

impl IoValue {
    pub(crate) fn from_range(range: Range<u32>) -> Self {
        range.map(IoNet).collect()
    }
}
