use std::ops::{BitOr, BitOrAssign};

/// Bitmask of "what changed since this sprite was last serialized".
///
/// The base sprite fields own fixed bits. Subtypes choose among the four
/// `INTERNAL_*` slots for their own fields. `CHILD` carries no data of its
/// own: it marks that some descendant is dirty so a sweep from the root can
/// skip clean subtrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DirtyState(u32);

impl DirtyState {
    pub const EMPTY: DirtyState = DirtyState(0);

    pub const PARENT: DirtyState = DirtyState(1 << 0);
    pub const CHILD: DirtyState = DirtyState(1 << 1);
    pub const SIZE: DirtyState = DirtyState(1 << 2);
    pub const FLAGS: DirtyState = DirtyState(1 << 3);
    pub const POSITION: DirtyState = DirtyState(1 << 4);
    pub const CENTER: DirtyState = DirtyState(1 << 5);
    pub const SCALE: DirtyState = DirtyState(1 << 6);
    pub const COLOR: DirtyState = DirtyState(1 << 7);
    pub const OPACITY: DirtyState = DirtyState(1 << 8);
    pub const ROTATION: DirtyState = DirtyState(1 << 9);
    pub const SORTING: DirtyState = DirtyState(1 << 10);

    pub const INTERNAL_A: DirtyState = DirtyState(1 << 16);
    pub const INTERNAL_B: DirtyState = DirtyState(1 << 17);
    pub const INTERNAL_C: DirtyState = DirtyState(1 << 18);
    pub const INTERNAL_D: DirtyState = DirtyState(1 << 19);

    /// Bits of the attributes every sprite carries
    pub const BASE_FIELDS: DirtyState = DirtyState(
        Self::PARENT.0
            | Self::SIZE.0
            | Self::FLAGS.0
            | Self::POSITION.0
            | Self::CENTER.0
            | Self::SCALE.0
            | Self::COLOR.0
            | Self::OPACITY.0
            | Self::ROTATION.0
            | Self::SORTING.0,
    );

    /// Every bit that carries sprite data
    pub const ALL_FIELDS: DirtyState = DirtyState(
        Self::PARENT.0
            | Self::SIZE.0
            | Self::FLAGS.0
            | Self::POSITION.0
            | Self::CENTER.0
            | Self::SCALE.0
            | Self::COLOR.0
            | Self::OPACITY.0
            | Self::ROTATION.0
            | Self::SORTING.0
            | Self::INTERNAL_A.0
            | Self::INTERNAL_B.0
            | Self::INTERNAL_C.0
            | Self::INTERNAL_D.0,
    );

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub fn is_clear(&self) -> bool {
        self.0 == 0
    }

    /// True if any bit of `other` is set here
    pub fn has(&self, other: DirtyState) -> bool {
        self.0 & other.0 != 0
    }

    pub fn or(&mut self, other: DirtyState) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: DirtyState) {
        self.0 &= !other.0;
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Bits set in both
    pub fn intersection(&self, other: DirtyState) -> DirtyState {
        DirtyState(self.0 & other.0)
    }

    /// Data bits only, without the propagation bit
    pub fn fields(&self) -> DirtyState {
        DirtyState(self.0 & Self::ALL_FIELDS.0)
    }
}

impl BitOr for DirtyState {
    type Output = DirtyState;

    fn bitor(self, rhs: DirtyState) -> DirtyState {
        DirtyState(self.0 | rhs.0)
    }
}

impl BitOrAssign for DirtyState {
    fn bitor_assign(&mut self, rhs: DirtyState) {
        self.0 |= rhs.0;
    }
}
