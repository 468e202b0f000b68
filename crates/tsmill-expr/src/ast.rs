//! Expression tree and row-wise evaluation.

use tsmill_series::Column;

use crate::function::Function;

/// Which input column a reference reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnRef {
    /// The bare variable: the column currently being evaluated.
    Implicit,
    /// A numbered variable, stored zero-based.
    Position(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl BinaryOp {
    pub(crate) fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul => lhs * rhs,
            Self::Div => lhs / rhs,
            Self::Rem => floored_rem(lhs, rhs),
            Self::Pow => lhs.powf(rhs),
        }
    }
}

/// Remainder with the sign of the divisor.
fn floored_rem(lhs: f64, rhs: f64) -> f64 {
    let r = lhs % rhs;
    if r != 0.0 && (r < 0.0) != (rhs < 0.0) {
        r + rhs
    } else {
        r
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Literal(f64),
    /// The current row number.
    Time,
    /// A column's value at the current row.
    Current(ColumnRef),
    /// A column's value `offset` rows away from the current row.
    Shifted { column: ColumnRef, offset: i64 },
    Call { function: Function, args: Vec<Expr> },
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

/// Values visible while evaluating one row.
pub(crate) struct Frame<'a> {
    pub columns: &'a [Column],
    pub row: usize,
    /// Column the implicit variable stands for.
    pub implicit: usize,
}

impl Frame<'_> {
    fn cell(&self, column: ColumnRef, offset: i64) -> Option<f64> {
        let index = match column {
            ColumnRef::Implicit => self.implicit,
            ColumnRef::Position(p) => p,
        };
        let values = self.columns[index].values();
        let row = self.row.checked_add_signed(isize::try_from(offset).ok()?)?;
        values.get(row).copied()
    }
}

impl Expr {
    /// Evaluate at one row. `None` means a shifted reference fell outside the series.
    pub(crate) fn eval(&self, frame: &Frame<'_>) -> Option<f64> {
        match self {
            Self::Literal(v) => Some(*v),
            Self::Time => Some(frame.row as f64),
            Self::Current(column) => frame.cell(*column, 0),
            Self::Shifted { column, offset } => frame.cell(*column, *offset),
            Self::Call { function, args } => {
                let values = args
                    .iter()
                    .map(|a| a.eval(frame))
                    .collect::<Option<Vec<f64>>>()?;
                Some(function.apply(&values))
            }
            Self::Neg(operand) => operand.eval(frame).map(|v| -v),
            Self::Binary { op, lhs, rhs } => Some(op.apply(lhs.eval(frame)?, rhs.eval(frame)?)),
        }
    }

    /// Visit this node and all its descendants, parents first.
    pub(crate) fn walk(&self, visit: &mut impl FnMut(&Expr)) {
        visit(self);
        match self {
            Self::Call { args, .. } => args.iter().for_each(|a| a.walk(visit)),
            Self::Neg(operand) => operand.walk(visit),
            Self::Binary { lhs, rhs, .. } => {
                lhs.walk(visit);
                rhs.walk(visit);
            }
            Self::Literal(_) | Self::Time | Self::Current(_) | Self::Shifted { .. } => {}
        }
    }

    /// Reduce to `coef * t + constant` if the expression is linear in the
    /// time placeholder and contains no column references.
    pub(crate) fn linear_in_time(&self) -> Option<(f64, f64)> {
        match self {
            Self::Literal(v) => Some((0.0, *v)),
            Self::Time => Some((1.0, 0.0)),
            Self::Current(_) | Self::Shifted { .. } => None,
            Self::Neg(operand) => operand.linear_in_time().map(|(a, b)| (-a, -b)),
            Self::Call { function, args } => {
                let values = args
                    .iter()
                    .map(|a| {
                        let (coef, value) = a.linear_in_time()?;
                        (coef == 0.0).then_some(value)
                    })
                    .collect::<Option<Vec<f64>>>()?;
                Some((0.0, function.apply(&values)))
            }
            Self::Binary { op, lhs, rhs } => {
                let (a1, b1) = lhs.linear_in_time()?;
                let (a2, b2) = rhs.linear_in_time()?;
                match op {
                    BinaryOp::Add => Some((a1 + a2, b1 + b2)),
                    BinaryOp::Sub => Some((a1 - a2, b1 - b2)),
                    BinaryOp::Mul if a1 == 0.0 => Some((b1 * a2, b1 * b2)),
                    BinaryOp::Mul if a2 == 0.0 => Some((a1 * b2, b1 * b2)),
                    BinaryOp::Div if a2 == 0.0 && b2 != 0.0 => Some((a1 / b2, b1 / b2)),
                    _ if a1 == 0.0 && a2 == 0.0 => Some((0.0, op.apply(b1, b2))),
                    _ => None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(v: f64) -> Box<Expr> {
        Box::new(Expr::Literal(v))
    }

    #[test]
    fn remainder_follows_divisor_sign() {
        assert_eq!(BinaryOp::Rem.apply(7.0, 3.0), 1.0);
        assert_eq!(BinaryOp::Rem.apply(-7.0, 3.0), 2.0);
        assert_eq!(BinaryOp::Rem.apply(7.0, -3.0), -2.0);
        assert_eq!(BinaryOp::Rem.apply(6.0, -3.0), 0.0);
    }

    #[test]
    fn shifted_reference_outside_series_is_none() {
        let columns = vec![Column::new("a", vec![1.0, 2.0, 3.0])];
        let lag = Expr::Shifted {
            column: ColumnRef::Implicit,
            offset: -1,
        };
        let frame = |row| Frame {
            columns: &columns,
            row,
            implicit: 0,
        };
        assert_eq!(lag.eval(&frame(0)), None);
        assert_eq!(lag.eval(&frame(2)), Some(2.0));
    }

    #[test]
    fn linear_reduction() {
        // 2 + t - (1 + 1)
        let e = Expr::Binary {
            op: BinaryOp::Sub,
            lhs: Box::new(Expr::Binary {
                op: BinaryOp::Add,
                lhs: lit(2.0),
                rhs: Box::new(Expr::Time),
            }),
            rhs: Box::new(Expr::Binary {
                op: BinaryOp::Add,
                lhs: lit(1.0),
                rhs: lit(1.0),
            }),
        };
        assert_eq!(e.linear_in_time(), Some((1.0, 0.0)));

        let squared = Expr::Binary {
            op: BinaryOp::Mul,
            lhs: Box::new(Expr::Time),
            rhs: Box::new(Expr::Time),
        };
        assert_eq!(squared.linear_in_time(), None);
    }

    #[test]
    fn walk_visits_every_node() {
        let e = Expr::Neg(Box::new(Expr::Binary {
            op: BinaryOp::Add,
            lhs: lit(1.0),
            rhs: Box::new(Expr::Time),
        }));
        let mut count = 0;
        e.walk(&mut |_| count += 1);
        assert_eq!(count, 4);
    }
}
