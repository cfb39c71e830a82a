//! Single-voter partial orders with known rank bounds.
//!
//! In every fixture `x` is `a1` and `y` is `a2`. The other alternatives are
//! named after their role in the order: `a`, `u`, `c`, `b`, `d`, `f` take
//! ids 3 to 8 and `a'`, `b'`, `c'`, `d'`, `u'` ids 9 to 13.

use minimax_core::{Alternative, PrefKnowledge, Voter};

use crate::knowledge::with_edges;

const X: u32 = 1;
const Y: u32 = 2;
const A: u32 = 3;
const C: u32 = 5;
const B: u32 = 6;
const D: u32 = 7;
const F: u32 = 8;
const A1: u32 = 9;
const B1: u32 = 10;
const C1: u32 = 11;
const D1: u32 = 12;
const U1: u32 = 13;

/// One voter's knowledge together with the expected bounds.
pub struct RankFixture {
    pub knowledge: PrefKnowledge,
    pub voter: Voter,
    pub x: Alternative,
    pub y: Alternative,
    /// Lowest rank `x` can take.
    pub worst_x: usize,
    /// Highest rank `y` can take when `x` is at its worst rank.
    pub best_y: usize,
}

fn fixture(m: u32, edges: &[(u32, u32)], worst_x: usize, best_y: usize) -> RankFixture {
    let edges: Vec<(u32, u32, u32)> = edges.iter().map(|&(w, l)| (1, w, l)).collect();
    RankFixture {
        knowledge: with_edges(m, 1, &edges),
        voter: Voter::new(1),
        x: Alternative::new(X),
        y: Alternative::new(Y),
        worst_x,
        best_y,
    }
}

/// `x` above `y` over 8 alternatives, `u` unrelated to everything.
pub fn x_above_y_8() -> RankFixture {
    fixture(
        8,
        &[(A, X), (X, B), (X, D), (B, Y), (C, Y), (Y, F)],
        4,
        6,
    )
}

/// `x` above `y` over 13 alternatives.
pub fn x_above_y_13() -> RankFixture {
    fixture(
        13,
        &[
            (A, X),
            (X, B),
            (X, D),
            (B, Y),
            (C, Y),
            (Y, F),
            (A1, A),
            (C1, C),
            (X, D1),
            (B1, Y),
            (B, B1),
            (A1, U1),
        ],
        7,
        10,
    )
}

/// `y` above `x` over 8 alternatives.
pub fn y_above_x_8() -> RankFixture {
    fixture(
        8,
        &[(A, Y), (Y, B), (Y, D), (B, X), (C, X), (X, F)],
        7,
        2,
    )
}

/// `y` above `x` over 13 alternatives.
pub fn y_above_x_13() -> RankFixture {
    fixture(
        13,
        &[
            (A, Y),
            (Y, B),
            (Y, D),
            (B, X),
            (C, X),
            (X, F),
            (A1, A),
            (C1, C),
            (X, D1),
            (B1, X),
            (B, B1),
            (A1, U1),
        ],
        11,
        3,
    )
}

/// Nothing known over 8 alternatives.
pub fn zero_knowledge_8() -> RankFixture {
    fixture(8, &[], 8, 1)
}

/// Every fixture above.
pub fn all() -> Vec<RankFixture> {
    vec![
        x_above_y_8(),
        x_above_y_13(),
        y_above_x_8(),
        y_above_x_13(),
        zero_knowledge_8(),
    ]
}
