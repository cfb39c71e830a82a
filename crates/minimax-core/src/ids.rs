//! Alternative and voter identifiers.

use std::fmt;

/// An alternative that may win the election.
///
/// Alternatives are totally ordered by id, which fixes iteration order and
/// tie-breaking everywhere in the workspace.
///
/// # Examples
///
/// ```
/// use minimax_core::Alternative;
///
/// let a1 = Alternative::new(1);
/// let a2 = Alternative::new(2);
/// assert!(a1 < a2);
/// assert_eq!(a1.to_string(), "a1");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Alternative {
    id: u32,
}

impl Alternative {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Alternative { id }
    }

    #[inline]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Returns alternatives `a1..=an`.
    pub fn range(n: u32) -> Vec<Alternative> {
        (1..=n).map(Alternative::new).collect()
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.id)
    }
}

/// A voter whose preferences are partially known.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Voter {
    id: u32,
}

impl Voter {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Voter { id }
    }

    #[inline]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Returns voters `v1..=vn`.
    pub fn range(n: u32) -> Vec<Voter> {
        (1..=n).map(Voter::new).collect()
    }
}

impl fmt::Display for Voter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.id)
    }
}
