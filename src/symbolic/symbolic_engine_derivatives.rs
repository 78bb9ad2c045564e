//! # Symbolic Engine Derivatives Module
//!
//! Analytical differentiation and the human-readable rendering of expressions.
//!
//! ## Key Methods
//!
//! ### Differentiation
//! - `diff(var: &str)` - analytical derivative
//!
//! ### Rendering
//! - `sym_to_str()` - infix text with minimal parentheses, used for the derivative label
//!
//! ### Numerical Validation
//! - `compare_num1D()` - checks the analytical derivative against a centered finite
//!   difference of the function over a linspace
//!
//! ## Interesting Code Features
//!
//! 1. **Recursive Differentiation Rules**: sum, product, quotient and chain rules for every
//!    supported function.
//! 2. **General Power Rule**: `u^v` is differentiated as a power, an exponential or through
//!    logarithmic differentiation depending on which side depends on the variable.
//! 3. **Precedence-aware Printing**: parentheses are emitted only where the tree shape needs them.

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{linspace, norm, numerical_derivative};

fn c(val: f64) -> Box<Expr> {
    Box::new(Expr::Const(val))
}

impl Expr {
    /// DIFFERENTIATION

    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// Implements the standard differentiation rules:
    /// - Power rule: d/dx(u^n) = n*u^(n-1)*u'
    /// - Product rule: d/dx(f*g) = f'*g + f*g'
    /// - Quotient rule: d/dx(f/g) = (f'*g - f*g')/g^2
    /// - Chain rule: d/dx(f(g(x))) = f'(g(x))*g'(x)
    ///
    /// The raw result is not simplified; call `simplify()` before displaying it.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let x = Expr::Var("x".to_string());
    /// let f = x.clone().pow(Expr::Const(2.0)); // x^2
    /// let df_dx = f.diff("x").simplify(); // 2*x
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                    Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
                )),
                Box::new(Expr::Pow(rhs.clone(), c(2.0))),
            ),
            Expr::Pow(base, exp) => {
                if !exp.contains_variable(var) {
                    // n * u^(n-1) * u'
                    Expr::Mul(
                        Box::new(Expr::Mul(
                            exp.clone(),
                            Box::new(Expr::Pow(
                                base.clone(),
                                Box::new(Expr::Sub(exp.clone(), c(1.0))),
                            )),
                        )),
                        Box::new(base.diff(var)),
                    )
                } else if !base.contains_variable(var) {
                    // a^v * ln(a) * v'
                    Expr::Mul(
                        Box::new(Expr::Mul(Box::new(self.clone()), Box::new(Expr::Ln(base.clone())))),
                        Box::new(exp.diff(var)),
                    )
                } else {
                    // u^v * (v' * ln(u) + v * u' / u)
                    Expr::Mul(
                        Box::new(self.clone()),
                        Box::new(Expr::Add(
                            Box::new(Expr::Mul(
                                Box::new(exp.diff(var)),
                                Box::new(Expr::Ln(base.clone())),
                            )),
                            Box::new(Expr::Div(
                                Box::new(Expr::Mul(exp.clone(), Box::new(base.diff(var)))),
                                base.clone(),
                            )),
                        )),
                    )
                }
            }
            Expr::Exp(expr) => {
                Expr::Mul(Box::new(Expr::Exp(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::Ln(expr) => Expr::Div(Box::new(expr.diff(var)), expr.clone()),
            Expr::sin(expr) => {
                Expr::Mul(Box::new(Expr::cos(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::cos(expr) => Expr::Mul(
                Box::new(Expr::Mul(c(-1.0), Box::new(Expr::sin(expr.clone())))),
                Box::new(expr.diff(var)),
            ),
            Expr::tg(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Pow(Box::new(Expr::cos(expr.clone())), c(2.0))),
            ),
            Expr::ctg(expr) => Expr::Div(
                Box::new(Expr::Mul(c(-1.0), Box::new(expr.diff(var)))),
                Box::new(Expr::Pow(Box::new(Expr::sin(expr.clone())), c(2.0))),
            ),
            Expr::arcsin(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::sqrt(Box::new(Expr::Sub(
                    c(1.0),
                    Box::new(Expr::Pow(expr.clone(), c(2.0))),
                )))),
            ),
            Expr::arccos(expr) => Expr::Div(
                Box::new(Expr::Mul(c(-1.0), Box::new(expr.diff(var)))),
                Box::new(Expr::sqrt(Box::new(Expr::Sub(
                    c(1.0),
                    Box::new(Expr::Pow(expr.clone(), c(2.0))),
                )))),
            ),
            Expr::arctg(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Add(c(1.0), Box::new(Expr::Pow(expr.clone(), c(2.0))))),
            ),
            Expr::arcctg(expr) => Expr::Div(
                Box::new(Expr::Mul(c(-1.0), Box::new(expr.diff(var)))),
                Box::new(Expr::Add(c(1.0), Box::new(Expr::Pow(expr.clone(), c(2.0))))),
            ),
            Expr::sinh(expr) => {
                Expr::Mul(Box::new(Expr::cosh(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::cosh(expr) => {
                Expr::Mul(Box::new(Expr::sinh(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::tanh(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Pow(Box::new(Expr::cosh(expr.clone())), c(2.0))),
            ),
            Expr::sqrt(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Mul(c(2.0), Box::new(Expr::sqrt(expr.clone())))),
            ),
            Expr::abs(expr) => Expr::Mul(
                Box::new(expr.diff(var)),
                Box::new(Expr::Div(expr.clone(), Box::new(Expr::abs(expr.clone())))),
            ),
        }
    } // end of diff

    /// Converts symbolic expression to human-readable string representation.
    ///
    /// Uses `*`, `/`, `^` and function-call notation, with parentheses only where
    /// precedence requires them. A product with `-1` is printed as a negation and
    /// adding a negative term is printed as a subtraction.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let expr = Expr::parse_expression("2*x + 1").unwrap();
    /// assert_eq!(expr.sym_to_str(), "2*x + 1");
    /// ```
    pub fn sym_to_str(&self) -> String {
        match self {
            Expr::Var(name) => name.clone(),
            Expr::Const(val) => format_constant(*val),
            Expr::Add(lhs, rhs) => match rhs.negated_term() {
                Some(positive) => format!(
                    "{} - {}",
                    lhs.sym_to_str(),
                    wrap_if(&positive, positive.precedence() <= PREC_SUM)
                ),
                None => format!("{} + {}", lhs.sym_to_str(), rhs.sym_to_str()),
            },
            Expr::Sub(lhs, rhs) => format!(
                "{} - {}",
                lhs.sym_to_str(),
                wrap_if(rhs, rhs.precedence() <= PREC_SUM || rhs.is_negation())
            ),
            Expr::Mul(lhs, rhs) => {
                if let Expr::Const(val) = lhs.as_ref() {
                    if *val == -1.0 {
                        return format!("-{}", wrap_if(rhs, rhs.precedence() <= PREC_SUM));
                    }
                }
                format!(
                    "{}*{}",
                    wrap_if(lhs, lhs.precedence() < PREC_PRODUCT),
                    wrap_if(rhs, rhs.precedence() < PREC_PRODUCT || rhs.is_negation())
                )
            }
            Expr::Div(lhs, rhs) => format!(
                "{}/{}",
                wrap_if(lhs, lhs.precedence() < PREC_PRODUCT),
                wrap_if(rhs, rhs.precedence() <= PREC_PRODUCT || rhs.is_negation())
            ),
            Expr::Pow(base, exp) => format!(
                "{}^{}",
                wrap_if(base, base.precedence() <= PREC_POWER),
                wrap_if(exp, exp.precedence() <= PREC_POWER)
            ),
            _ => match self.unary_parts() {
                Some((name, arg)) => format!("{}({})", name, arg.sym_to_str()),
                None => self.to_string(),
            },
        } // end of match
    } // end of sym_to_str

    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(..) | Expr::Sub(..) => PREC_SUM,
            Expr::Mul(..) | Expr::Div(..) if self.is_negation() => PREC_NEGATION,
            Expr::Mul(..) | Expr::Div(..) => PREC_PRODUCT,
            Expr::Const(val) if *val < 0.0 => PREC_NEGATION,
            Expr::Pow(..) => PREC_POWER,
            _ => PREC_ATOM,
        }
    }

    fn is_negation(&self) -> bool {
        match self {
            Expr::Const(val) => *val < 0.0,
            Expr::Mul(lhs, _) => matches!(lhs.as_ref(), Expr::Const(val) if *val < 0.0),
            _ => false,
        }
    }

    /// For a term printed with a leading minus, the same term without it.
    fn negated_term(&self) -> Option<Expr> {
        match self {
            Expr::Const(val) if *val < 0.0 => Some(Expr::Const(-val)),
            Expr::Mul(lhs, rhs) => match lhs.as_ref() {
                Expr::Const(val) if *val == -1.0 => Some(rhs.as_ref().clone()),
                Expr::Const(val) if *val < 0.0 => {
                    Some(Expr::Mul(Box::new(Expr::Const(-val)), rhs.clone()))
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// NUMERICAL VALIDATION

    /// Validates analytical derivative against numerical approximation for 1D functions.
    ///
    /// Computes both derivatives over a linspace and compares them with the scaled
    /// L2 norm of their difference.
    ///
    /// # Returns
    /// `(norm, norm < max_norm)`, or an error if either side cannot be evaluated on the domain
    pub fn compare_num1D(
        &self,
        var: &str,
        start: f64,
        end: f64,
        num_values: usize,
        max_norm: f64,
    ) -> Result<(f64, bool), String> {
        let diff = self.diff(var).simplify(); // get the analytical derivative
        let analytical_fn = diff.lambdify1D(var)?;
        let domain = linspace(start, end, num_values);
        let analytical_derivative = domain
            .iter()
            .map(|&x| analytical_fn(x))
            .collect::<Result<Vec<f64>, String>>()?;
        let function = self.lambdify1D(var)?;
        let step = 1e-5;
        let numerical = numerical_derivative(function, &domain, step)?;
        let norma_val = norm(&analytical_derivative, &numerical)?;
        Ok((norma_val, norma_val < max_norm))
    }
}

const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_NEGATION: u8 = 3;
const PREC_POWER: u8 = 4;
const PREC_ATOM: u8 = 5;

fn wrap_if(expr: &Expr, wrap: bool) -> String {
    if wrap {
        format!("({})", expr.sym_to_str())
    } else {
        expr.sym_to_str()
    }
}

/// Whole numbers print without a fractional part ("2", not "2.0").
fn format_constant(val: f64) -> String {
    if val.fract() == 0.0 && val.abs() < 1e15 {
        format!("{}", val as i64)
    } else {
        format!("{}", val)
    }
}
