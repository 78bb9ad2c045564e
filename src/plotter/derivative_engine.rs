//! # Derivative Engine
//!
//! From a normalized expression string to everything the plot needs:
//! - the parsed tree and its simplified symbolic derivative, rendered to text for the label
//! - a numeric evaluator `f(x)` compiled from the parsed tree
//! - a centered finite-difference derivative built on that evaluator only
//!
//! The symbolic derivative is display-only: the plotted derivative curve always comes from
//! the finite difference, so a wrong simplification can never distort the curve.
use crate::plotter::errors::PlotterError;
use crate::symbolic::normalize::NormalizedExpression;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_lambdify::Lambda;
use crate::symbolic::utils::{linspace, numerical_derivative};
use log::debug;

/// Left end of the plotted x-range.
pub const DOMAIN_START: f64 = -10.0;
/// Right end of the plotted x-range.
pub const DOMAIN_END: f64 = 10.0;
/// Number of sample points, both ends included.
pub const DOMAIN_POINTS: usize = 400;
/// Step `h` of the centered difference.
pub const FINITE_DIFFERENCE_STEP: f64 = 1e-5;
/// The only free variable an expression may use.
pub const VARIABLE: &str = "x";

/// Fixed x-coordinates at which both curves are evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleDomain {
    xs: Vec<f64>,
}

impl SampleDomain {
    pub fn new(start: f64, end: f64, num_values: usize) -> Self {
        SampleDomain {
            xs: linspace(start, end, num_values),
        }
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

impl Default for SampleDomain {
    /// 400 points on [-10, 10].
    fn default() -> Self {
        SampleDomain::new(DOMAIN_START, DOMAIN_END, DOMAIN_POINTS)
    }
}

/// The user's function, evaluable at a single point.
#[derive(Debug, Clone)]
pub struct NumericFunction {
    lambda: Lambda,
}

impl NumericFunction {
    pub fn eval(&self, x: f64) -> Result<f64, String> {
        self.lambda.eval(&[x])
    }
}

/// `(f(x + h) - f(x - h)) / 2h` over a [`NumericFunction`].
#[derive(Debug, Clone)]
pub struct NumericDerivative {
    function: NumericFunction,
    step: f64,
}

impl NumericDerivative {
    pub fn new(function: NumericFunction) -> Self {
        NumericDerivative {
            function,
            step: FINITE_DIFFERENCE_STEP,
        }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn eval(&self, x: f64) -> Result<f64, String> {
        numerical_derivative(|x| self.function.eval(x), &[x], self.step).map(|d| d[0])
    }

    /// Derivative at every point of `xs`; fails on the first point that cannot be evaluated.
    pub fn sample(&self, xs: &[f64]) -> Result<Vec<f64>, String> {
        numerical_derivative(|x| self.function.eval(x), xs, self.step)
    }
}

/// Result of analysing one submitted expression.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// parsed user function
    pub expression: Expr,
    /// simplified derivative with respect to `x`
    pub symbolic_derivative: Expr,
    /// `symbolic_derivative` rendered for the label
    pub symbolic_text: String,
    pub numeric_fn: NumericFunction,
    pub numeric_deriv_fn: NumericDerivative,
}

/// Function and unscaled derivative y-values over a [`SampleDomain`].
#[derive(Debug, Clone, PartialEq)]
pub struct SampledCurves {
    pub x: Vec<f64>,
    pub function: Vec<f64>,
    pub derivative: Vec<f64>,
}

/// Parses, differentiates and compiles a normalized expression.
///
/// # Errors
/// - `PlotterError::Parse` when the text is not a valid expression
/// - `PlotterError::Evaluation` when it names a variable other than `x`
pub fn analyze(expr: &NormalizedExpression) -> Result<Analysis, PlotterError> {
    let expression = Expr::parse_expression(expr.as_str()).map_err(PlotterError::Parse)?;
    let symbolic_derivative = expression.diff(VARIABLE).simplify();
    let symbolic_text = symbolic_derivative.sym_to_str();
    debug!("d/d{} {} = {}", VARIABLE, expr, symbolic_text);
    let lambda = expression
        .compile(&[VARIABLE])
        .map_err(PlotterError::Evaluation)?;
    let numeric_fn = NumericFunction { lambda };
    let numeric_deriv_fn = NumericDerivative::new(numeric_fn.clone());
    Ok(Analysis {
        expression,
        symbolic_derivative,
        symbolic_text,
        numeric_fn,
        numeric_deriv_fn,
    })
}

/// Evaluates the function and its finite-difference derivative on every domain point.
///
/// # Errors
/// `PlotterError::Evaluation` from the first failing point of either pass; no partial
/// curves are returned.
pub fn sample(analysis: &Analysis, domain: &SampleDomain) -> Result<SampledCurves, PlotterError> {
    let function = domain
        .xs()
        .iter()
        .map(|&x| {
            analysis
                .numeric_fn
                .eval(x)
                .map_err(|e| PlotterError::Evaluation(format!("{} at x = {}", e, x)))
        })
        .collect::<Result<Vec<f64>, PlotterError>>()?;
    let derivative = analysis
        .numeric_deriv_fn
        .sample(domain.xs())
        .map_err(|e| PlotterError::Evaluation(format!("{} (finite difference)", e)))?;
    Ok(SampledCurves {
        x: domain.xs().to_vec(),
        function,
        derivative,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::normalize::normalize;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_domain() {
        let domain = SampleDomain::default();
        assert_eq!(domain.len(), 400);
        assert_eq!(domain.xs()[0], -10.0);
        assert_eq!(domain.xs()[399], 10.0);
        assert_eq!(domain, SampleDomain::default());
    }

    #[test]
    fn test_analyze_square() {
        let analysis = analyze(&normalize("x^2")).unwrap();
        assert_eq!(analysis.symbolic_text, "2*x");
        assert_relative_eq!(analysis.numeric_fn.eval(2.0).unwrap(), 4.0);
        assert_relative_eq!(analysis.numeric_deriv_fn.eval(2.0).unwrap(), 4.0, epsilon = 1e-6);
        assert_eq!(analysis.numeric_deriv_fn.step(), 1e-5);
    }

    #[test]
    fn test_analyze_rejects_bad_syntax() {
        match analyze(&normalize("x+")) {
            Err(PlotterError::Parse(_)) => {}
            other => panic!("expected parse error, got {:?}", other.map(|a| a.symbolic_text)),
        }
        assert!(matches!(analyze(&normalize("foo(x)")), Err(PlotterError::Parse(_))));
    }

    #[test]
    fn test_unknown_variable_is_an_evaluation_error() {
        assert!(matches!(analyze(&normalize("x + y")), Err(PlotterError::Evaluation(_))));
    }

    #[test]
    fn test_sample_lengths_match_domain() {
        let analysis = analyze(&normalize("sin(x)")).unwrap();
        let domain = SampleDomain::default();
        let curves = sample(&analysis, &domain).unwrap();
        assert_eq!(curves.x.len(), 400);
        assert_eq!(curves.function.len(), 400);
        assert_eq!(curves.derivative.len(), 400);
        for (x, d) in curves.x.iter().zip(&curves.derivative) {
            assert_relative_eq!(*d, x.cos(), epsilon = 1e-8);
        }
    }

    #[test]
    fn test_sample_fails_on_grid_singularity() {
        let analysis = analyze(&normalize("1/(x+10)")).unwrap();
        let err = sample(&analysis, &SampleDomain::default()).unwrap_err();
        assert!(matches!(err, PlotterError::Evaluation(msg) if msg.contains("division by zero")));
    }

    #[test]
    fn test_sample_fails_in_finite_difference_pass() {
        // defined on the grid itself, undefined just left of x = -10
        let analysis = analyze(&normalize("sqrt(x+10)")).unwrap();
        let err = sample(&analysis, &SampleDomain::default()).unwrap_err();
        assert!(matches!(err, PlotterError::Evaluation(msg) if msg.contains("finite difference")));
    }

    #[test]
    fn test_overflowing_derivative_is_rejected() {
        let analysis = analyze(&normalize("exp(70.9*x)")).unwrap();
        assert!(analysis.numeric_fn.eval(10.0).is_ok());
        assert!(analysis.numeric_deriv_fn.eval(10.0).is_err());
        let err = sample(&analysis, &SampleDomain::default()).unwrap_err();
        assert!(matches!(err, PlotterError::Evaluation(msg) if msg.contains("not finite at x = 10")));
    }

    #[test]
    fn test_analysis_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Analysis>();
        assert_send_sync::<SampledCurves>();
    }
}
