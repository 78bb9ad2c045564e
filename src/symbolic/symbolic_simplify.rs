//! # Symbolic Expression Simplification Module
//!
//! Algebraic clean-up of expressions produced by `diff`. Raw derivatives are full of
//! `* 1`, `+ 0` and `(2 - 1)` fragments; the rules here remove them so the displayed
//! derivative reads the way a person would write it.
//!
//! ## Simplification Strategy
//!
//! 1. **Constant Folding**: arithmetic on two constants is evaluated
//! 2. **Algebraic Identities**: x + 0 = x, x * 1 = x, x^1 = x, x - x = 0
//! 3. **Coefficient Lifting**: numeric factors move to the front of a product and merge
//! 4. **Trivial Function Values**: sin(0) = 0, exp(0) = 1, ln(1) = 0, ...
//!
//! Every rule is an identity of real functions, so simplification never changes the
//! value of an expression where the original is defined.

use crate::symbolic::symbolic_engine::Expr;

/// Upper bound on bottom-up passes in `simplify`.
const MAX_PASSES: usize = 32;

impl Expr {
    //___________________________________SIMPLIFICATION____________________________________

    /// Folds arithmetic on two constants, keeping the node when the result is not finite.
    fn fold_constants(&self) -> Option<Expr> {
        let (lhs, rhs) = match self {
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => match (lhs.as_ref(), rhs.as_ref()) {
                (Expr::Const(a), Expr::Const(b)) => (*a, *b),
                _ => return None,
            },
            _ => return None,
        };
        let value = match self {
            Expr::Add(..) => lhs + rhs,
            Expr::Sub(..) => lhs - rhs,
            Expr::Mul(..) => lhs * rhs,
            Expr::Div(..) if rhs == 0.0 => return None,
            Expr::Div(..) => lhs / rhs,
            _ => lhs.powf(rhs),
        };
        if value.is_finite() {
            Some(Expr::Const(value))
        } else {
            None
        }
    }

    /// Value of a function at a constant argument, only where it is exactly known.
    fn trivial_function_value(&self) -> Option<Expr> {
        let (name, arg) = self.unary_parts()?;
        let Expr::Const(val) = arg else {
            return None;
        };
        let folded = match (name, *val) {
            ("exp", v) | ("cos", v) | ("cosh", v) if v == 0.0 => 1.0,
            ("ln", v) if v == 1.0 => 0.0,
            ("sin", v) | ("tan", v) | ("asin", v) | ("atan", v) | ("sinh", v) | ("tanh", v)
                if v == 0.0 =>
            {
                0.0
            }
            ("sqrt", v) if v == 0.0 || v == 1.0 => v,
            ("abs", v) => v.abs(),
            _ => return None,
        };
        Some(Expr::Const(folded))
    }

    /// One bottom-up simplification pass.
    ///
    /// Children are simplified first, then the rules for the parent node are tried once.
    pub fn simplify_(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                let node = Expr::Add(Box::new(lhs.clone()), Box::new(rhs.clone()));
                if let Some(folded) = node.fold_constants() {
                    return folded;
                }
                if lhs.is_zero() {
                    rhs
                } else if rhs.is_zero() {
                    lhs
                } else if lhs == rhs {
                    Expr::Mul(Box::new(Expr::Const(2.0)), Box::new(lhs))
                } else {
                    node
                }
            }
            Expr::Sub(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                let node = Expr::Sub(Box::new(lhs.clone()), Box::new(rhs.clone()));
                if let Some(folded) = node.fold_constants() {
                    return folded;
                }
                match (&lhs, &rhs) {
                    (_, r) if r.is_zero() => lhs,
                    (l, _) if l.is_zero() => Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(rhs)),
                    (l, r) if l == r => Expr::Const(0.0),
                    (_, Expr::Const(c)) if *c < 0.0 => {
                        Expr::Add(Box::new(lhs), Box::new(Expr::Const(-c)))
                    }
                    _ => node,
                }
            }
            Expr::Mul(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                let node = Expr::Mul(Box::new(lhs.clone()), Box::new(rhs.clone()));
                if let Some(folded) = node.fold_constants() {
                    return folded;
                }
                if lhs.is_zero() || rhs.is_zero() {
                    return Expr::Const(0.0);
                }
                match (lhs, rhs) {
                    (Expr::Const(c), other) | (other, Expr::Const(c)) if c == 1.0 => other,
                    // constants to the front
                    (other, Expr::Const(c)) => {
                        Expr::Mul(Box::new(Expr::Const(c)), Box::new(other))
                    }
                    (Expr::Const(c1), Expr::Mul(inner_l, inner_r)) => match *inner_l {
                        Expr::Const(c2) => Expr::Mul(Box::new(Expr::Const(c1 * c2)), inner_r),
                        other => Expr::Mul(
                            Box::new(Expr::Const(c1)),
                            Box::new(Expr::Mul(Box::new(other), inner_r)),
                        ),
                    },
                    (Expr::Const(c1), Expr::Div(num, den)) => match *num {
                        Expr::Const(c2) => Expr::Div(Box::new(Expr::Const(c1 * c2)), den),
                        other => Expr::Div(
                            Box::new(Expr::Mul(Box::new(Expr::Const(c1)), Box::new(other))),
                            den,
                        ),
                    },
                    (Expr::Mul(inner_l, inner_r), other)
                        if matches!(inner_l.as_ref(), Expr::Const(_)) =>
                    {
                        Expr::Mul(inner_l, Box::new(Expr::Mul(inner_r, Box::new(other))))
                    }
                    (other, Expr::Mul(inner_l, inner_r))
                        if matches!(inner_l.as_ref(), Expr::Const(_)) =>
                    {
                        Expr::Mul(inner_l, Box::new(Expr::Mul(Box::new(other), inner_r)))
                    }
                    (l, r) if l == r => Expr::Pow(Box::new(l), Box::new(Expr::Const(2.0))),
                    (l, r) => Expr::Mul(Box::new(l), Box::new(r)),
                }
            }
            Expr::Div(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                let node = Expr::Div(Box::new(lhs.clone()), Box::new(rhs.clone()));
                if let Some(folded) = node.fold_constants() {
                    return folded;
                }
                match (&lhs, &rhs) {
                    (_, Expr::Const(c)) if *c == 1.0 => lhs,
                    (l, r) if l.is_zero() && !r.is_zero() => Expr::Const(0.0),
                    (l, r) if l == r => Expr::Const(1.0),
                    _ => node,
                }
            }
            Expr::Pow(base, exp) => {
                let base = base.simplify_();
                let exp = exp.simplify_();
                let node = Expr::Pow(Box::new(base.clone()), Box::new(exp.clone()));
                if let Some(folded) = node.fold_constants() {
                    return folded;
                }
                match (&base, &exp) {
                    (_, e) if e.is_zero() => Expr::Const(1.0),
                    (_, Expr::Const(e)) if *e == 1.0 => base,
                    (Expr::Const(b), _) if *b == 1.0 => Expr::Const(1.0),
                    _ => node,
                }
            }
            _ => match self.unary_parts() {
                Some((_, arg)) => {
                    let node = self.map_unary(arg.simplify_());
                    node.trivial_function_value().unwrap_or(node)
                }
                None => self.clone(),
            },
        } // end of match
    } // end of simplify_

    /// Public interface for expression simplification.
    ///
    /// Repeats `simplify_` until the tree stops changing, so rewrites that expose new
    /// opportunities one level up are picked up on the next pass.
    ///
    /// # Returns
    /// Simplified expression using all available simplification rules
    pub fn simplify(&self) -> Expr {
        let mut current = self.clone();
        for _ in 0..MAX_PASSES {
            let next = current.simplify_();
            if next == current {
                break;
            }
            current = next;
        }
        current
    }
}
