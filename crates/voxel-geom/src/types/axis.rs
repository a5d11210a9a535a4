// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

/// One of the three box axes. S, T, and R play the roles of X, Y, and Z.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    /// First axis (analogous to X).
    S,
    /// Second axis (analogous to Y).
    T,
    /// Third axis (analogous to Z).
    R,
}

impl Axis {
    /// All axes in S, T, R order.
    pub const ALL: [Self; 3] = [Self::S, Self::T, Self::R];

    /// Position of the axis in S, T, R order.
    pub const fn index(self) -> usize {
        match self {
            Self::S => 0,
            Self::T => 1,
            Self::R => 2,
        }
    }
}

/// Selects one of the two faces normal to an axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side {
    /// The face passing through the box's base point.
    Base,
    /// The face offset from the base point by the full normal axis.
    Opposite,
}
