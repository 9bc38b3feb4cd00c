//! EBML / Matroska element ids used by the duration patcher.

/// An EBML element id, marker bits included (as written in the stream).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u32);

impl ElementId {
    pub const EBML: Self = Self(0x1A45_DFA3);
    pub const SEGMENT: Self = Self(0x1853_8067);
    pub const SEEK_HEAD: Self = Self(0x114D_9B74);
    pub const INFO: Self = Self(0x1549_A966);
    pub const TIMECODE_SCALE: Self = Self(0x2A_D7B1);
    pub const DURATION: Self = Self(0x4489);
    pub const TRACKS: Self = Self(0x1654_AE6B);
    pub const CLUSTER: Self = Self(0x1F43_B675);
    pub const VOID: Self = Self(0xEC);

    /// Human-readable name for known ids.
    pub fn name(&self) -> &'static str {
        match *self {
            Self::EBML => "EBML",
            Self::SEGMENT => "Segment",
            Self::SEEK_HEAD => "SeekHead",
            Self::INFO => "Info",
            Self::TIMECODE_SCALE => "TimecodeScale",
            Self::DURATION => "Duration",
            Self::TRACKS => "Tracks",
            Self::CLUSTER => "Cluster",
            Self::VOID => "Void",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (0x{:X})", self.name(), self.0)
    }
}
