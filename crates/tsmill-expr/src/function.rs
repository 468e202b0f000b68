//! Built-in math functions and named constants.

use std::f64::consts;
use std::fmt;

/// Number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many.
    Exact(usize),
    /// This many or more.
    AtLeast(usize),
}

impl Arity {
    /// Whether `n` arguments satisfy this arity.
    #[must_use]
    pub fn accepts(self, n: usize) -> bool {
        match self {
            Self::Exact(k) => n == k,
            Self::AtLeast(k) => n >= k,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(k) => write!(f, "{k}"),
            Self::AtLeast(k) => write!(f, "at least {k}"),
        }
    }
}

/// A function callable by name inside an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    /// Sine, in radians.
    Sin,
    /// Cosine, in radians.
    Cos,
    /// Tangent, in radians.
    Tan,
    /// Arcsine.
    Asin,
    /// Arccosine.
    Acos,
    /// Arctangent.
    Atan,
    /// Hyperbolic sine.
    Sinh,
    /// Hyperbolic cosine.
    Cosh,
    /// Hyperbolic tangent.
    Tanh,
    /// `e` raised to the argument.
    Exp,
    /// `exp(x) - 1`, accurate near zero.
    Expm1,
    /// Natural logarithm (`log` or `ln`).
    Ln,
    /// Base-10 logarithm.
    Log10,
    /// Base-2 logarithm.
    Log2,
    /// `ln(1 + x)`, accurate near zero.
    Log1p,
    /// Square root.
    Sqrt,
    /// Cube root.
    Cbrt,
    /// Absolute value.
    Abs,
    /// Largest integer not above the argument.
    Floor,
    /// Smallest integer not below the argument.
    Ceil,
    /// Nearest integer, halves to even.
    Round,
    /// Integer part, towards zero.
    Trunc,
    /// `-1`, `0` or `1`; NaN stays NaN.
    Sign,
    /// Degrees to radians (`radians` or `deg2rad`).
    Radians,
    /// Radians to degrees (`degrees` or `rad2deg`).
    Degrees,
    /// Two-argument arctangent `atan2(y, x)`.
    Atan2,
    /// `pow(base, exponent)`.
    Pow,
    /// `sqrt(x*x + y*y)` without overflow.
    Hypot,
    /// Smallest argument; NaN if any argument is NaN.
    Min,
    /// Largest argument; NaN if any argument is NaN.
    Max,
}

impl Function {
    /// Look up a function by the name used in expressions.
    ///
    /// `log` and `ln` are both the natural logarithm; `deg2rad` and
    /// `rad2deg` are aliases of `radians` and `degrees`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let f = match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "asin" => Self::Asin,
            "acos" => Self::Acos,
            "atan" => Self::Atan,
            "sinh" => Self::Sinh,
            "cosh" => Self::Cosh,
            "tanh" => Self::Tanh,
            "exp" => Self::Exp,
            "expm1" => Self::Expm1,
            "log" | "ln" => Self::Ln,
            "log10" => Self::Log10,
            "log2" => Self::Log2,
            "log1p" => Self::Log1p,
            "sqrt" => Self::Sqrt,
            "cbrt" => Self::Cbrt,
            "abs" => Self::Abs,
            "floor" => Self::Floor,
            "ceil" => Self::Ceil,
            "round" => Self::Round,
            "trunc" => Self::Trunc,
            "sign" => Self::Sign,
            "radians" | "deg2rad" => Self::Radians,
            "degrees" | "rad2deg" => Self::Degrees,
            "atan2" => Self::Atan2,
            "pow" => Self::Pow,
            "hypot" => Self::Hypot,
            "min" => Self::Min,
            "max" => Self::Max,
            _ => return None,
        };
        Some(f)
    }

    /// Canonical name, as shown in error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Exp => "exp",
            Self::Expm1 => "expm1",
            Self::Ln => "log",
            Self::Log10 => "log10",
            Self::Log2 => "log2",
            Self::Log1p => "log1p",
            Self::Sqrt => "sqrt",
            Self::Cbrt => "cbrt",
            Self::Abs => "abs",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Round => "round",
            Self::Trunc => "trunc",
            Self::Sign => "sign",
            Self::Radians => "radians",
            Self::Degrees => "degrees",
            Self::Atan2 => "atan2",
            Self::Pow => "pow",
            Self::Hypot => "hypot",
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    /// Number of arguments the function takes.
    #[must_use]
    pub fn arity(self) -> Arity {
        match self {
            Self::Atan2 | Self::Pow | Self::Hypot => Arity::Exact(2),
            Self::Min | Self::Max => Arity::AtLeast(2),
            _ => Arity::Exact(1),
        }
    }

    /// Apply to already-evaluated arguments. Arity was checked at parse time.
    pub(crate) fn apply(self, args: &[f64]) -> f64 {
        let x = args[0];
        match self {
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tan => x.tan(),
            Self::Asin => x.asin(),
            Self::Acos => x.acos(),
            Self::Atan => x.atan(),
            Self::Sinh => x.sinh(),
            Self::Cosh => x.cosh(),
            Self::Tanh => x.tanh(),
            Self::Exp => x.exp(),
            Self::Expm1 => x.exp_m1(),
            Self::Ln => x.ln(),
            Self::Log10 => x.log10(),
            Self::Log2 => x.log2(),
            Self::Log1p => x.ln_1p(),
            Self::Sqrt => x.sqrt(),
            Self::Cbrt => x.cbrt(),
            Self::Abs => x.abs(),
            Self::Floor => x.floor(),
            Self::Ceil => x.ceil(),
            // halves go to the even neighbour
            Self::Round => x.round_ties_even(),
            Self::Trunc => x.trunc(),
            Self::Sign => sign(x),
            Self::Radians => x.to_radians(),
            Self::Degrees => x.to_degrees(),
            Self::Atan2 => x.atan2(args[1]),
            Self::Pow => x.powf(args[1]),
            Self::Hypot => x.hypot(args[1]),
            Self::Min => fold_nan(args, f64::min),
            Self::Max => fold_nan(args, f64::max),
        }
    }
}

/// -1, 0 or 1; NaN stays NaN.
fn sign(x: f64) -> f64 {
    if x.is_nan() || x == 0.0 {
        x
    } else {
        x.signum()
    }
}

/// Reduce with `f`, returning NaN if any argument is NaN.
fn fold_nan(args: &[f64], f: fn(f64, f64) -> f64) -> f64 {
    if args.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    args[1..].iter().fold(args[0], |acc, &v| f(acc, v))
}

/// Value of a named constant.
pub(crate) fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(consts::PI),
        "e" => Some(consts::E),
        "nan" => Some(f64::NAN),
        "inf" => Some(f64::INFINITY),
        _ => None,
    }
}
