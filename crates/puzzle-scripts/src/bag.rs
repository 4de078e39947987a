//! Bag representation for the countdown search.
//!
//! A bag is the multiset of digit tiles and operator tiles parsed from the
//! command line. Operators are always visited in the canonical order
//! `+ - * /` so that enumeration and tie-breaking are deterministic.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::error::{PuzzleError, Result};

/// Number of distinct operator symbols.
pub const OPERATOR_KINDS: usize = 4;

/// Arithmetic operator tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    /// All operators in canonical order
    pub const ALL: [Operator; OPERATOR_KINDS] =
        [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div];

    pub fn from_symbol(c: char) -> Option<Operator> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    /// Position in the canonical order
    pub fn index(self) -> usize {
        self as usize
    }

    /// Every tree shape over a run of this operator evaluates the same,
    /// whatever the nesting.
    pub fn is_associative(self) -> bool {
        matches!(self, Operator::Add | Operator::Mul)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Remaining count of each operator, indexed by [`Operator::index`].
///
/// The counts are `Copy`: recursive enumeration hands each level its own
/// copy instead of decrementing and restoring a shared table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OperatorCounts([u32; OPERATOR_KINDS]);

impl OperatorCounts {
    pub fn new(counts: [u32; OPERATOR_KINDS]) -> Self {
        Self(counts)
    }

    pub fn get(&self, op: Operator) -> u32 {
        self.0[op.index()]
    }

    pub fn add(&mut self, op: Operator) {
        self.0[op.index()] += 1;
    }

    /// Total number of operator tiles
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&n| n == 0)
    }

    /// `(operator, count)` pairs in canonical order, zero counts included
    pub fn iter(&self) -> impl Iterator<Item = (Operator, u32)> + '_ {
        Operator::ALL.into_iter().map(move |op| (op, self.get(op)))
    }

    /// Copy of these counts with one `op` reserved (removed).
    ///
    /// Returns `None` when no `op` is left.
    pub fn without_one(&self, op: Operator) -> Option<OperatorCounts> {
        let mut rest = *self;
        let slot = &mut rest.0[op.index()];
        *slot = slot.checked_sub(1)?;
        Some(rest)
    }

    /// Every way of dividing these counts between a left and a right pool.
    pub fn splits(&self) -> Splits {
        Splits {
            pool: *self,
            left: Some([0; OPERATOR_KINDS]),
        }
    }
}

impl fmt::Display for OperatorCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (op, count) in self.iter() {
            for _ in 0..count {
                write!(f, "{}", op)?;
            }
        }
        Ok(())
    }
}

/// Iterator over `(left, right)` partitions of an operator pool.
///
/// The left count of each operator runs from zero up to the pool count,
/// with the last operator in canonical order varying fastest.
#[derive(Debug, Clone)]
pub struct Splits {
    pool: OperatorCounts,
    left: Option<[u32; OPERATOR_KINDS]>,
}

impl Iterator for Splits {
    type Item = (OperatorCounts, OperatorCounts);

    fn next(&mut self) -> Option<Self::Item> {
        let left = self.left?;
        let pool = self.pool.0;
        let right = std::array::from_fn(|i| pool[i] - left[i]);

        self.left = None;
        let mut next = left;
        for i in (0..OPERATOR_KINDS).rev() {
            if next[i] < pool[i] {
                next[i] += 1;
                self.left = Some(next);
                break;
            }
            next[i] = 0;
        }

        Some((OperatorCounts(left), OperatorCounts(right)))
    }
}

/// Count of each digit value 0-9, remembering the order in which digits
/// first appeared
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigitCounts {
    counts: [u32; 10],
    order: SmallVec<[u8; 10]>,
}

impl DigitCounts {
    pub fn get(&self, digit: u8) -> u32 {
        self.counts.get(digit as usize).copied().unwrap_or(0)
    }

    pub fn add(&mut self, digit: u8) {
        if let Some(slot) = self.counts.get_mut(digit as usize) {
            if *slot == 0 {
                self.order.push(digit);
            }
            *slot += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|&n| n as usize).sum()
    }

    /// Every digit tile, grouped by value in order of first appearance and
    /// repeated by its count
    pub fn flatten(&self) -> SmallVec<[u8; 16]> {
        let mut tiles = SmallVec::new();
        for &digit in &self.order {
            for _ in 0..self.counts[digit as usize] {
                tiles.push(digit);
            }
        }
        tiles
    }
}

/// Parsed countdown input: operator tiles and digit tiles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bag {
    pub operators: OperatorCounts,
    pub digits: DigitCounts,
}

impl Bag {
    /// Parse a bag string such as `"25*"`.
    ///
    /// Characters may appear in any order; anything other than an ASCII
    /// digit or one of `+-*/` is rejected.
    pub fn parse(input: &str) -> Result<Bag> {
        let mut bag = Bag::default();
        for (index, character) in input.chars().enumerate() {
            if let Some(op) = Operator::from_symbol(character) {
                bag.operators.add(op);
            } else if character.is_ascii_digit() {
                bag.digits.add(character as u8 - b'0');
            } else {
                return Err(PuzzleError::InvalidBagCharacter { character, index });
            }
        }
        Ok(bag)
    }
}

impl FromStr for Bag {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self> {
        Bag::parse(s)
    }
}
