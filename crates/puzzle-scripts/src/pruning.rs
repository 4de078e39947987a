//! Search space pruning rules for shape enumeration.
//!
//! A pool holding a single associative operator can only produce shapes
//! that all evaluate alike for a given digit ordering, so the enumerator
//! emits one left-associated chain per length instead of every tree.

use std::iter;
use std::rc::Rc;

use crate::bag::{Operator, OperatorCounts};
use crate::shape::Shape;

/// The operator and count when `counts` holds exactly one operator kind
/// and that kind is associative (`+` or `*`).
pub fn associative_chain(counts: &OperatorCounts) -> Option<(Operator, u32)> {
    let mut present = counts.iter().filter(|&(_, count)| count > 0);
    let (op, count) = present.next()?;
    if present.next().is_some() || !op.is_associative() {
        return None;
    }
    Some((op, count))
}

/// Left-associated chains `_ op _`, `(_ op _) op _`, ... with one to
/// `count` applications of `op`.
pub fn chain_shapes(op: Operator, count: u32) -> impl Iterator<Item = Rc<Shape>> {
    let mut shape = Rc::new(Shape::Param);
    let mut remaining = count;
    iter::from_fn(move || {
        if remaining == 0 {
            return None;
        }
        remaining -= 1;
        shape = Shape::binary(Rc::clone(&shape), op, Rc::new(Shape::Param));
        Some(Rc::clone(&shape))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_associative_operator() {
        let adds = OperatorCounts::new([3, 0, 0, 0]);
        assert_eq!(associative_chain(&adds), Some((Operator::Add, 3)));

        let muls = OperatorCounts::new([0, 0, 1, 0]);
        assert_eq!(associative_chain(&muls), Some((Operator::Mul, 1)));
    }

    #[test]
    fn test_no_chain_for_non_associative_or_mixed() {
        assert_eq!(associative_chain(&OperatorCounts::new([0, 2, 0, 0])), None);
        assert_eq!(associative_chain(&OperatorCounts::new([0, 0, 0, 1])), None);
        assert_eq!(associative_chain(&OperatorCounts::new([1, 0, 1, 0])), None);
        assert_eq!(associative_chain(&OperatorCounts::default()), None);
    }

    #[test]
    fn test_chain_shapes_grow_by_one() {
        let chains: Vec<_> = chain_shapes(Operator::Mul, 3).collect();
        assert_eq!(chains.len(), 3);
        for (i, shape) in chains.iter().enumerate() {
            assert_eq!(shape.size(), i + 2);
        }
        assert_eq!(chains[2].to_string(), "((_ * _) * _) * _");
    }
}
