/// a module rewrites loosely typed formulas ("2x^2") into the strict syntax the parser accepts
///
///# Example
/// ```
/// use RustedDerivView::symbolic::normalize::normalize;
/// let normalized = normalize("3(x+1)^2");
/// assert_eq!(normalized.as_str(), "3*(x+1)**2");
/// ```
pub mod normalize;
/// a module turns a String expression into a symbolic expression
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) turns a String expression into a symbolic expression
/// 2) differentiates it and turns the derivative into a pretty string
/// 3) turns a symbolic expression into a Rust function with domain checks
///# Example
/// ```
/// use RustedDerivView::symbolic::symbolic_engine::Expr;
/// let input = "exp(x) + log(x)";
/// // here you've got symbolic expression
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// // differentiate with respect to x and turn the result into a human-readable string
/// let df_dx = parsed_expression.diff("x").simplify();
/// println!("df_dx = {}", df_dx.sym_to_str());
/// // convert symbolic expression to a Rust function and evaluate the function
/// let function_of_x = parsed_expression.lambdify1D("x").unwrap();
/// assert!(function_of_x(1.0).is_ok());
/// // log is undefined at zero: evaluation reports an error instead of NaN
/// assert!(function_of_x(0.0).is_err());
/// // compare numerical and analytical derivatives on a linspace
/// let (norm, passed) = parsed_expression.compare_num1D("x", 1.0, 5.0, 100, 1e-6).unwrap();
/// println!("norm = {}, passed = {}", norm, passed);
/// ```
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
pub mod symbolic_lambdify;
pub mod symbolic_simplify;
pub mod utils;
