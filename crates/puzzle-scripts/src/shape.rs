//! Expression shapes: enumeration and evaluation.
//!
//! A shape is an operator tree with empty parameter slots. Shapes are
//! immutable and shared through `Rc`, so the same subtree can sit under
//! many parents while the search evaluates each shape against every digit
//! ordering.

use std::fmt;
use std::iter;
use std::rc::Rc;

use log::trace;
use serde::{Serialize, Serializer};

use crate::bag::{Operator, OperatorCounts};
use crate::error::{PuzzleError, Result};
use crate::pruning::{associative_chain, chain_shapes};

/// Lazy stream of shapes
pub type Shapes = Box<dyn Iterator<Item = Rc<Shape>>>;

/// Result of evaluating a shape
///
/// Division yields a float-valued result, and a float operand keeps the
/// result float. Float results are always integral here but print with a
/// trailing `.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Int(u64),
    Float(u64),
    /// Negative difference, inexact or zero division, or overflow
    Undefined,
}

impl Value {
    /// Magnitude of a defined value
    pub fn number(self) -> Option<u64> {
        match self {
            Value::Int(n) | Value::Float(n) => Some(n),
            Value::Undefined => None,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Absolute distance to `target`. Undefined values have no distance
    /// and never win a closest-value comparison.
    pub fn distance(self, target: i64) -> Option<u128> {
        self.number()
            .map(|n| (i128::from(n) - i128::from(target)).unsigned_abs())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}.0", n),
            Value::Undefined => f.write_str("nan"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match *self {
            Value::Int(n) => serializer.serialize_u64(n),
            Value::Float(n) => serializer.serialize_f64(n as f64),
            Value::Undefined => serializer.serialize_none(),
        }
    }
}

impl Operator {
    /// Apply this operator under the countdown rules: results stay
    /// non-negative integers, anything else is undefined.
    pub fn apply(self, left: Value, right: Value) -> Value {
        let (Some(l), Some(r)) = (left.number(), right.number()) else {
            return Value::Undefined;
        };
        let result = match self {
            Operator::Add => l.checked_add(r),
            Operator::Mul => l.checked_mul(r),
            Operator::Sub => l.checked_sub(r),
            Operator::Div => match l.checked_rem(r) {
                Some(0) => Some(l / r),
                _ => None,
            },
        };
        let float = self == Operator::Div || left.is_float() || right.is_float();
        match result {
            Some(n) if float => Value::Float(n),
            Some(n) => Value::Int(n),
            None => Value::Undefined,
        }
    }
}

/// Expression tree without digit values
#[derive(Debug, PartialEq, Eq)]
pub enum Shape {
    /// Slot filled by one digit at evaluation time
    Param,
    Binary {
        left: Rc<Shape>,
        op: Operator,
        right: Rc<Shape>,
        size: usize,
    },
}

impl Shape {
    pub fn binary(left: Rc<Shape>, op: Operator, right: Rc<Shape>) -> Rc<Shape> {
        let size = left.size() + right.size();
        Rc::new(Shape::Binary {
            left,
            op,
            right,
            size,
        })
    }

    /// Number of parameter slots
    pub fn size(&self) -> usize {
        match self {
            Shape::Param => 1,
            Shape::Binary { size, .. } => *size,
        }
    }

    /// Evaluate against digits drawn from `params`, left subtree first.
    ///
    /// Fails only if `params` runs dry; domain failures come back as
    /// [`Value::Undefined`].
    pub fn eval<I>(&self, params: &mut I) -> Result<Value>
    where
        I: Iterator<Item = u8> + ExactSizeIterator,
    {
        let supplied = params.len();
        self.eval_inner(params)
            .ok_or(PuzzleError::ParamsExhausted { supplied })
    }

    fn eval_inner<I: Iterator<Item = u8>>(&self, params: &mut I) -> Option<Value> {
        match self {
            Shape::Param => params.next().map(|d| Value::Int(u64::from(d))),
            Shape::Binary {
                left, op, right, ..
            } => {
                // Both sides always consume their digits, even once the
                // left side is undefined.
                let l = left.eval_inner(params)?;
                let r = right.eval_inner(params)?;
                Some(op.apply(l, r))
            }
        }
    }

    /// Render with `params` in the slots, e.g. `(1 + 2) * 3`.
    pub fn render(&self, params: &[u8]) -> String {
        let mut out = String::new();
        let mut digits = params.iter().copied();
        self.write_with(&mut out, &mut || digits.next(), true);
        out
    }

    fn write_with(&self, out: &mut String, slot: &mut dyn FnMut() -> Option<u8>, top: bool) {
        match self {
            Shape::Param => match slot() {
                Some(d) => out.push(char::from(b'0' + d)),
                None => out.push('_'),
            },
            Shape::Binary {
                left, op, right, ..
            } => {
                if !top {
                    out.push('(');
                }
                left.write_with(out, slot, false);
                out.push(' ');
                out.push(op.symbol());
                out.push(' ');
                right.write_with(out, slot, false);
                if !top {
                    out.push(')');
                }
            }
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_with(&mut out, &mut || None, true);
        f.write_str(&out)
    }
}

/// Every shape buildable from some of the operators in `counts`.
///
/// The single-parameter shape comes first. Otherwise each operator with a
/// tile left becomes a root in turn, and the remaining tiles are divided
/// between the two subtrees in every possible way. Each recursion level
/// owns its copy of the counts.
pub fn shapes(counts: OperatorCounts) -> Shapes {
    let trivial = iter::once(Rc::new(Shape::Param));
    if counts.is_empty() {
        return Box::new(trivial);
    }
    if let Some((op, count)) = associative_chain(&counts) {
        trace!("pool {} reduces to a chain of {} {}", counts, count, op);
        return Box::new(trivial.chain(chain_shapes(op, count)));
    }

    let compound = Operator::ALL.into_iter().flat_map(move |op| {
        let pool = counts.without_one(op);
        pool.into_iter()
            .flat_map(|pool| pool.splits())
            .flat_map(move |(left_pool, right_pool)| {
                let rights: Rc<[Rc<Shape>]> = shapes(right_pool).collect();
                shapes(left_pool).flat_map(move |left| {
                    let rights = Rc::clone(&rights);
                    (0..rights.len())
                        .map(move |i| Shape::binary(Rc::clone(&left), op, Rc::clone(&rights[i])))
                })
            })
    });
    Box::new(trivial.chain(compound))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param() -> Rc<Shape> {
        Rc::new(Shape::Param)
    }

    fn eval_digits(shape: &Shape, digits: &[u8]) -> Value {
        shape.eval(&mut digits.iter().copied()).unwrap()
    }

    #[test]
    fn test_empty_pool_yields_only_param() {
        let all: Vec<_> = shapes(OperatorCounts::default()).collect();
        assert_eq!(all.len(), 1);
        assert_eq!(*all[0], Shape::Param);
    }

    #[test]
    fn test_single_associative_kind_yields_chains() {
        for counts in [[3, 0, 0, 0], [0, 0, 4, 0]] {
            let counts = OperatorCounts::new(counts);
            let all: Vec<_> = shapes(counts).collect();
            assert_eq!(all.len() as u32, counts.total() + 1);
            for (i, shape) in all.iter().enumerate() {
                assert_eq!(shape.size(), i + 1);
                if let Shape::Binary { right, .. } = shape.as_ref() {
                    assert_eq!(**right, Shape::Param);
                }
            }
        }
    }

    #[test]
    fn test_non_associative_enumeration() {
        let single: Vec<_> = shapes(OperatorCounts::new([0, 1, 0, 0]))
            .map(|s| s.to_string())
            .collect();
        assert_eq!(single, vec!["_", "_ - _"]);

        let double: Vec<_> = shapes(OperatorCounts::new([0, 2, 0, 0]))
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            double,
            vec!["_", "_ - _", "_ - (_ - _)", "_ - _", "(_ - _) - _"]
        );
    }

    #[test]
    fn test_mixed_enumeration() {
        let all: Vec<_> = shapes(OperatorCounts::new([1, 1, 0, 0]))
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            all,
            vec![
                "_",
                "_ + _",
                "_ + (_ - _)",
                "_ + _",
                "(_ - _) + _",
                "_ - _",
                "_ - (_ + _)",
                "_ - _",
                "(_ + _) - _",
            ]
        );
    }

    #[test]
    fn test_enumeration_is_repeatable() {
        let counts = OperatorCounts::new([1, 1, 1, 1]);
        let first: Vec<_> = shapes(counts).map(|s| s.to_string()).collect();
        let second: Vec<_> = shapes(counts).map(|s| s.to_string()).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|s| s.matches('_').count() <= 5));
    }

    #[test]
    fn test_eval_consumes_left_to_right() {
        // (a - b) - c
        let shape = Shape::binary(
            Shape::binary(param(), Operator::Sub, param()),
            Operator::Sub,
            param(),
        );
        assert_eq!(eval_digits(&shape, &[9, 3, 2]), Value::Int(4));
        // a - (b - c)
        let shape = Shape::binary(
            param(),
            Operator::Sub,
            Shape::binary(param(), Operator::Sub, param()),
        );
        assert_eq!(eval_digits(&shape, &[9, 3, 2]), Value::Int(8));
    }

    #[test]
    fn test_eval_exact_digit_count() {
        let shape = Shape::binary(param(), Operator::Mul, param());
        let mut digits = [2u8, 5].into_iter();
        assert_eq!(shape.eval(&mut digits).unwrap(), Value::Int(10));
        assert_eq!(digits.next(), None);

        let mut short = [2u8].into_iter();
        assert!(matches!(
            shape.eval(&mut short),
            Err(PuzzleError::ParamsExhausted { supplied: 1 })
        ));
    }

    #[test]
    fn test_subtraction_rules() {
        let n = Value::Int;
        assert_eq!(Operator::Sub.apply(n(3), n(5)), Value::Undefined);
        assert_eq!(Operator::Sub.apply(n(5), n(3)), n(2));
        assert_eq!(Operator::Sub.apply(n(4), n(4)), n(0));
    }

    #[test]
    fn test_division_rules() {
        let n = Value::Int;
        assert_eq!(Operator::Div.apply(n(7), n(0)), Value::Undefined);
        assert_eq!(Operator::Div.apply(n(7), n(2)), Value::Undefined);
        assert_eq!(Operator::Div.apply(n(8), n(2)), Value::Float(4));
        assert_eq!(Operator::Div.apply(n(0), n(3)), Value::Float(0));
    }

    #[test]
    fn test_quotients_stay_float() {
        let quotient = Operator::Div.apply(Value::Int(8), Value::Int(2));
        assert_eq!(Operator::Add.apply(quotient, Value::Int(1)), Value::Float(5));
        assert_eq!(Operator::Mul.apply(Value::Int(3), quotient), Value::Float(12));
        assert_eq!(Operator::Sub.apply(quotient, Value::Int(4)), Value::Float(0));
        assert_eq!(Operator::Sub.apply(Value::Int(1), quotient), Value::Undefined);
        assert_eq!(Value::Float(4).distance(6), Some(2));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Int(10).to_string(), "10");
        assert_eq!(Value::Float(4).to_string(), "4.0");
        assert_eq!(Value::Undefined.to_string(), "nan");
        assert_eq!(serde_json::to_string(&Value::Float(4)).unwrap(), "4.0");
        assert_eq!(serde_json::to_string(&Value::Int(4)).unwrap(), "4");
    }

    #[test]
    fn test_undefined_propagates() {
        // (1 - 2) + 3 consumes all three digits and stays undefined
        let shape = Shape::binary(
            Shape::binary(param(), Operator::Sub, param()),
            Operator::Add,
            param(),
        );
        let mut digits = [1u8, 2, 3].into_iter();
        assert_eq!(shape.eval(&mut digits).unwrap(), Value::Undefined);
        assert_eq!(digits.next(), None);
    }

    #[test]
    fn test_overflow_is_undefined() {
        let n = Value::Int;
        assert_eq!(Operator::Mul.apply(n(u64::MAX), n(2)), Value::Undefined);
        assert_eq!(Operator::Add.apply(n(u64::MAX), n(1)), Value::Undefined);
    }

    #[test]
    fn test_distance() {
        assert_eq!(Value::Int(10).distance(100), Some(90));
        assert_eq!(Value::Int(3).distance(-2), Some(5));
        assert_eq!(Value::Undefined.distance(0), None);
    }

    #[test]
    fn test_render() {
        let shape = Shape::binary(
            Shape::binary(param(), Operator::Add, param()),
            Operator::Div,
            param(),
        );
        assert_eq!(shape.to_string(), "(_ + _) / _");
        assert_eq!(shape.render(&[4, 2, 3]), "(4 + 2) / 3");
        assert_eq!(Shape::Param.render(&[7]), "7");
    }
}
