use std::ops::{BitAndAssign, BitOr, BitOrAssign, Not};

/// Hints on how the next pattern should be shaped.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternType(u16);

#[rustfmt::skip]
impl PatternType {
    pub const FORCE_STACK: Self     = Self(1 << 0);
    pub const FORCE_NOT_STACK: Self = Self(1 << 1);
    pub const KEEP_SINGLE: Self     = Self(1 << 2);
    pub const LOW_PROBABILITY: Self = Self(1 << 3);
    pub const GATHERED: Self        = Self(1 << 4);
    pub const MIRROR: Self          = Self(1 << 5);
    pub const REVERSE: Self         = Self(1 << 6);
    pub const CYCLE: Self           = Self(1 << 7);
    pub const STAIR: Self           = Self(1 << 8);
    pub const REVERSE_STAIR: Self   = Self(1 << 9);
}

impl PatternType {
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for PatternType {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for PatternType {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAndAssign for PatternType {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl Not for PatternType {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}
