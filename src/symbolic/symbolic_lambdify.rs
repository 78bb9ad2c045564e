//! # Lambdify Module
//!
//! Compiles an [`Expr`] into a [`Lambda`] tree with variables resolved to argument
//! slots, and evaluates it with real-number domain checks. Evaluation never produces
//! NaN or infinity: every operation that would leave the reals or overflow returns an
//! error describing the failure instead.

use crate::symbolic::symbolic_engine::Expr;
use std::f64::consts::PI;

/// Compiled expression: same shape as [`Expr`] but variables are argument indices.
#[derive(Clone, Debug)]
pub enum Lambda {
    Var(usize),
    Const(f64),
    Add(Box<Lambda>, Box<Lambda>),
    Sub(Box<Lambda>, Box<Lambda>),
    Mul(Box<Lambda>, Box<Lambda>),
    Div(Box<Lambda>, Box<Lambda>),
    Pow(Box<Lambda>, Box<Lambda>),
    Exp(Box<Lambda>),
    Ln(Box<Lambda>),
    Sin(Box<Lambda>),
    Cos(Box<Lambda>),
    Tg(Box<Lambda>),
    Ctg(Box<Lambda>),
    ArcSin(Box<Lambda>),
    ArcCos(Box<Lambda>),
    ArcTg(Box<Lambda>),
    ArcCtg(Box<Lambda>),
    Sinh(Box<Lambda>),
    Cosh(Box<Lambda>),
    Tanh(Box<Lambda>),
    Sqrt(Box<Lambda>),
    Abs(Box<Lambda>),
}

/// Thread-safe single-argument evaluator returned by `lambdify1D`.
pub type Lambda1D = Box<dyn Fn(f64) -> Result<f64, String> + Send + Sync>;

impl Expr {
    /// Resolves every variable to its position in `vars`.
    ///
    /// # Errors
    /// A variable not listed in `vars` is reported as `name 'y' is not defined`.
    pub fn compile(&self, vars: &[&str]) -> Result<Lambda, String> {
        match self {
            Expr::Var(name) => vars
                .iter()
                .position(|&v| v == name)
                .map(Lambda::Var)
                .ok_or_else(|| format!("name '{}' is not defined", name)),
            Expr::Const(v) => Ok(Lambda::Const(*v)),
            Expr::Add(a, b) => compile_binary(a, b, vars, Lambda::Add),
            Expr::Sub(a, b) => compile_binary(a, b, vars, Lambda::Sub),
            Expr::Mul(a, b) => compile_binary(a, b, vars, Lambda::Mul),
            Expr::Div(a, b) => compile_binary(a, b, vars, Lambda::Div),
            Expr::Pow(a, b) => compile_binary(a, b, vars, Lambda::Pow),
            Expr::Exp(e) => compile_unary(e, vars, Lambda::Exp),
            Expr::Ln(e) => compile_unary(e, vars, Lambda::Ln),
            Expr::sin(e) => compile_unary(e, vars, Lambda::Sin),
            Expr::cos(e) => compile_unary(e, vars, Lambda::Cos),
            Expr::tg(e) => compile_unary(e, vars, Lambda::Tg),
            Expr::ctg(e) => compile_unary(e, vars, Lambda::Ctg),
            Expr::arcsin(e) => compile_unary(e, vars, Lambda::ArcSin),
            Expr::arccos(e) => compile_unary(e, vars, Lambda::ArcCos),
            Expr::arctg(e) => compile_unary(e, vars, Lambda::ArcTg),
            Expr::arcctg(e) => compile_unary(e, vars, Lambda::ArcCtg),
            Expr::sinh(e) => compile_unary(e, vars, Lambda::Sinh),
            Expr::cosh(e) => compile_unary(e, vars, Lambda::Cosh),
            Expr::tanh(e) => compile_unary(e, vars, Lambda::Tanh),
            Expr::sqrt(e) => compile_unary(e, vars, Lambda::Sqrt),
            Expr::abs(e) => compile_unary(e, vars, Lambda::Abs),
        }
    }

    /// LAMBDIFICATION - Converting Symbolic Expressions to Executable Functions

    /// Converts the expression into a closure of the single variable `var`.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::parse_expression("x**2").unwrap();
    /// let func = f.lambdify1D("x").unwrap();
    /// assert_eq!(func(3.0).unwrap(), 9.0);
    /// ```
    pub fn lambdify1D(&self, var: &str) -> Result<Lambda1D, String> {
        let compiled = self.compile(&[var])?;
        Ok(Box::new(move |x: f64| compiled.eval(&[x])))
    }
}

fn compile_unary(
    e: &Expr,
    vars: &[&str],
    ctor: fn(Box<Lambda>) -> Lambda,
) -> Result<Lambda, String> {
    Ok(ctor(Box::new(e.compile(vars)?)))
}

fn compile_binary(
    a: &Expr,
    b: &Expr,
    vars: &[&str],
    ctor: fn(Box<Lambda>, Box<Lambda>) -> Lambda,
) -> Result<Lambda, String> {
    Ok(ctor(Box::new(a.compile(vars)?), Box::new(b.compile(vars)?)))
}

fn finite(value: f64, what: &str) -> Result<f64, String> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("math range error in {}", what))
    }
}

fn in_unit_interval(value: f64, what: &str) -> Result<f64, String> {
    if (-1.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("math domain error: {}({}) is undefined", what, value))
    }
}

impl Lambda {
    /// Evaluates the compiled tree at `args`.
    ///
    /// # Errors
    /// Division by zero, logarithm of a non-positive number, square root of a negative
    /// number, inverse sine or cosine outside [-1, 1], a power with no real value, and
    /// any intermediate result that overflows to infinity.
    pub fn eval(&self, args: &[f64]) -> Result<f64, String> {
        let value = match self {
            Lambda::Var(i) => args
                .get(*i)
                .copied()
                .ok_or_else(|| format!("missing argument #{}", i))?,
            Lambda::Const(v) => *v,
            Lambda::Add(a, b) => finite(a.eval(args)? + b.eval(args)?, "addition")?,
            Lambda::Sub(a, b) => finite(a.eval(args)? - b.eval(args)?, "subtraction")?,
            Lambda::Mul(a, b) => finite(a.eval(args)? * b.eval(args)?, "multiplication")?,
            Lambda::Div(a, b) => {
                let numerator = a.eval(args)?;
                let denominator = b.eval(args)?;
                if denominator == 0.0 {
                    return Err("division by zero".to_string());
                }
                finite(numerator / denominator, "division")?
            }
            Lambda::Pow(a, b) => {
                let base = a.eval(args)?;
                let exponent = b.eval(args)?;
                if base == 0.0 && exponent < 0.0 {
                    return Err("0.0 cannot be raised to a negative power".to_string());
                }
                if base < 0.0 && exponent.fract() != 0.0 {
                    return Err(format!("({})**{} has no real value", base, exponent));
                }
                finite(base.powf(exponent), "power")?
            }
            Lambda::Exp(e) => finite(e.eval(args)?.exp(), "exp")?,
            Lambda::Ln(e) => {
                let arg = e.eval(args)?;
                if arg <= 0.0 {
                    return Err(format!("math domain error: log({}) is undefined", arg));
                }
                arg.ln()
            }
            Lambda::Sin(e) => e.eval(args)?.sin(),
            Lambda::Cos(e) => e.eval(args)?.cos(),
            Lambda::Tg(e) => finite(e.eval(args)?.tan(), "tan")?,
            Lambda::Ctg(e) => {
                let tangent = e.eval(args)?.tan();
                if tangent == 0.0 {
                    return Err("division by zero in cot".to_string());
                }
                finite(1.0 / tangent, "cot")?
            }
            Lambda::ArcSin(e) => in_unit_interval(e.eval(args)?, "asin")?.asin(),
            Lambda::ArcCos(e) => in_unit_interval(e.eval(args)?, "acos")?.acos(),
            Lambda::ArcTg(e) => e.eval(args)?.atan(),
            Lambda::ArcCtg(e) => (PI / 2.0) - e.eval(args)?.atan(),
            Lambda::Sinh(e) => finite(e.eval(args)?.sinh(), "sinh")?,
            Lambda::Cosh(e) => finite(e.eval(args)?.cosh(), "cosh")?,
            Lambda::Tanh(e) => e.eval(args)?.tanh(),
            Lambda::Sqrt(e) => {
                let arg = e.eval(args)?;
                if arg < 0.0 {
                    return Err(format!("math domain error: sqrt({}) is undefined", arg));
                }
                arg.sqrt()
            }
            Lambda::Abs(e) => e.eval(args)?.abs(),
        };
        finite(value, "evaluation")
    }
}
