//! # Symbolic Engine Module
//!
//! Core expression tree of the visualizer. A user formula is parsed into an [`Expr`],
//! differentiated symbolically for the derivative label, and compiled into a numeric
//! evaluator for the plotted curves.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - free names like "x"
//! - **Constants**: `Const(f64)` - numerical constants (`pi` and `e` are parsed into these)
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Exp`, `Ln`, `sin`, `cos`, `sqrt`, etc. - elementary functions
//!
//! ### Key Methods
//! - `parse_expression(input)` - string to tree (see `parse_expr`)
//! - `diff(var)` - analytical differentiation (see `symbolic_engine_derivatives`)
//! - `simplify()` - algebraic clean-up for display (see `symbolic_simplify`)
//! - `compile(vars)` / `lambdify1D()` - safe numeric evaluation (see `symbolic_lambdify`)
//!
//! ## Interesting Code Features
//!
//! 1. **Recursive Expression Tree**: `Box<Expr>` children allow arbitrarily nested formulas.
//! 2. **Operator Overloading**: `std::ops` traits give natural syntax, `x.clone() * x`.
//! 3. **Unary Function Helpers**: `map_unary`/`unary_parts` keep the per-function
//!    boilerplate in one place so traversals stay short.

use std::f64;
use std::fmt;

/// Core symbolic expression enum representing mathematical expressions as an abstract syntax tree.
///
/// # Examples
/// ```rust, ignore
/// use symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    /// Sine function: sin(x)
    sin(Box<Expr>),
    /// Cosine function: cos(x)
    cos(Box<Expr>),
    /// Tangent function: tan(x) - uses mathematical notation 'tg'
    tg(Box<Expr>),
    /// Cotangent function: cot(x) - uses mathematical notation 'ctg'
    ctg(Box<Expr>),
    /// Arcsine function: arcsin(x)
    arcsin(Box<Expr>),
    /// Arccosine function: arccos(x)
    arccos(Box<Expr>),
    /// Arctangent function: arctan(x) - uses mathematical notation 'arctg'
    arctg(Box<Expr>),
    /// Arccotangent function: arccot(x) - uses mathematical notation 'arcctg'
    arcctg(Box<Expr>),
    /// Hyperbolic sine
    sinh(Box<Expr>),
    /// Hyperbolic cosine
    cosh(Box<Expr>),
    /// Hyperbolic tangent
    tanh(Box<Expr>),
    /// Square root
    sqrt(Box<Expr>),
    /// Absolute value
    abs(Box<Expr>),
}

/// Display implementation for debugging symbolic expressions.
///
/// Every binary node is wrapped in parentheses so the tree structure is unambiguous.
/// For the user-facing derivative label use `Expr::sym_to_str`, which prints with
/// minimal parentheses.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            _ => {
                // every remaining variant is a unary function
                let (name, arg) = self.unary_parts().ok_or(fmt::Error)?;
                write!(f, "{}({})", name, arg)
            }
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// BASIC FEATURES

    /// Creates a symbolic variable.
    pub fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates exponential function e^(self).
    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    /// Creates natural logarithm ln(self).
    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    /// Creates power expression self^rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Checks if expression is exactly zero (constant 0.0).
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 0.0)
    }

    /// Name and argument of a unary function node, `None` for leaves and binary operations.
    pub fn unary_parts(&self) -> Option<(&'static str, &Expr)> {
        let parts: (&'static str, &Expr) = match self {
            Expr::Exp(e) => ("exp", e),
            Expr::Ln(e) => ("ln", e),
            Expr::sin(e) => ("sin", e),
            Expr::cos(e) => ("cos", e),
            Expr::tg(e) => ("tan", e),
            Expr::ctg(e) => ("cot", e),
            Expr::arcsin(e) => ("asin", e),
            Expr::arccos(e) => ("acos", e),
            Expr::arctg(e) => ("atan", e),
            Expr::arcctg(e) => ("acot", e),
            Expr::sinh(e) => ("sinh", e),
            Expr::cosh(e) => ("cosh", e),
            Expr::tanh(e) => ("tanh", e),
            Expr::sqrt(e) => ("sqrt", e),
            Expr::abs(e) => ("abs", e),
            _ => return None,
        };
        Some(parts)
    }

    /// Rebuilds a unary function node around a new argument.
    ///
    /// Leaves and binary nodes are returned unchanged.
    pub fn map_unary(&self, arg: Expr) -> Expr {
        let arg = Box::new(arg);
        match self {
            Expr::Exp(_) => Expr::Exp(arg),
            Expr::Ln(_) => Expr::Ln(arg),
            Expr::sin(_) => Expr::sin(arg),
            Expr::cos(_) => Expr::cos(arg),
            Expr::tg(_) => Expr::tg(arg),
            Expr::ctg(_) => Expr::ctg(arg),
            Expr::arcsin(_) => Expr::arcsin(arg),
            Expr::arccos(_) => Expr::arccos(arg),
            Expr::arctg(_) => Expr::arctg(arg),
            Expr::arcctg(_) => Expr::arcctg(arg),
            Expr::sinh(_) => Expr::sinh(arg),
            Expr::cosh(_) => Expr::cosh(arg),
            Expr::tanh(_) => Expr::tanh(arg),
            Expr::sqrt(_) => Expr::sqrt(arg),
            Expr::abs(_) => Expr::abs(arg),
            _ => self.clone(),
        }
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right)
            | Expr::Pow(left, right) => {
                left.contains_variable(var_name) || right.contains_variable(var_name)
            }
            _ => self
                .unary_parts()
                .is_some_and(|(_, arg)| arg.contains_variable(var_name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neg() {
        let neg_expr = -Expr::var("x");
        let expected = Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(Expr::var("x")));
        assert_eq!(neg_expr, expected);
    }

    #[test]
    fn test_display_is_fully_parenthesized() {
        let expr = Expr::var("x") * Expr::Const(2.0) + Expr::var("x").exp();
        assert_eq!(format!("{}", expr), "((x * 2) + exp(x))");
    }

    #[test]
    fn test_contains_variable() {
        let expr = Expr::sqrt(Box::new(Expr::var("y"))) / Expr::var("x");
        assert!(expr.contains_variable("x"));
        assert!(expr.contains_variable("y"));
        assert!(!expr.contains_variable("z"));
        assert!(!Expr::Const(3.0).contains_variable("x"));
    }

    #[test]
    fn test_map_unary_keeps_function_kind() {
        let expr = Expr::tanh(Box::new(Expr::var("x")));
        assert_eq!(
            expr.map_unary(Expr::Const(0.0)),
            Expr::tanh(Box::new(Expr::Const(0.0)))
        );
        assert_eq!(Expr::var("x").map_unary(Expr::Const(1.0)), Expr::var("x"));
    }
}
