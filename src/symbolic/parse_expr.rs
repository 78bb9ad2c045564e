use crate::symbolic::symbolic_engine::Expr;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit0, digit1, multispace0, one_of},
    combinator::{map, map_res, not, opt, recognize, value},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated},
};
use std::f64::consts::{E, PI};
use std::str::FromStr;
use strum_macros::EnumString;
/// a module turns a String expression into a symbolic expression
///# Example
/// ```
/// use RustedDerivView::symbolic::symbolic_engine::Expr;
/// let input = "x**2.3 * log(x + 1)";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// ```
//                  grammar, loosest binding first
//   sum      :=  product (('+' | '-') product)*
//   product  :=  unary (('*' | '/') unary)*          '*' never followed by a second '*'
//   unary    :=  ('+' | '-') unary | power
//   power    :=  primary (('**' | '^') unary)?       right associative, -x**2 == -(x**2)
//   primary  :=  number | '(' sum ')' | name '(' sum ')' | name

/// Names accepted in call position.
#[derive(Debug, Clone, Copy, PartialEq, EnumString)]
pub enum FunctionName {
    #[strum(serialize = "sin")]
    Sin,
    #[strum(serialize = "cos")]
    Cos,
    #[strum(serialize = "tan", serialize = "tg")]
    Tan,
    #[strum(serialize = "cot", serialize = "ctg")]
    Cot,
    #[strum(serialize = "asin", serialize = "arcsin")]
    ArcSin,
    #[strum(serialize = "acos", serialize = "arccos")]
    ArcCos,
    #[strum(serialize = "atan", serialize = "arctan", serialize = "arctg")]
    ArcTan,
    #[strum(serialize = "acot", serialize = "arccot", serialize = "arcctg")]
    ArcCot,
    #[strum(serialize = "sinh")]
    Sinh,
    #[strum(serialize = "cosh")]
    Cosh,
    #[strum(serialize = "tanh")]
    Tanh,
    #[strum(serialize = "exp")]
    Exp,
    #[strum(serialize = "log", serialize = "ln")]
    Log,
    #[strum(serialize = "sqrt")]
    Sqrt,
    #[strum(serialize = "abs")]
    Abs,
}

impl FunctionName {
    pub fn apply(self, arg: Expr) -> Expr {
        let arg = Box::new(arg);
        match self {
            FunctionName::Sin => Expr::sin(arg),
            FunctionName::Cos => Expr::cos(arg),
            FunctionName::Tan => Expr::tg(arg),
            FunctionName::Cot => Expr::ctg(arg),
            FunctionName::ArcSin => Expr::arcsin(arg),
            FunctionName::ArcCos => Expr::arccos(arg),
            FunctionName::ArcTan => Expr::arctg(arg),
            FunctionName::ArcCot => Expr::arcctg(arg),
            FunctionName::Sinh => Expr::sinh(arg),
            FunctionName::Cosh => Expr::cosh(arg),
            FunctionName::Tanh => Expr::tanh(arg),
            FunctionName::Exp => Expr::Exp(arg),
            FunctionName::Log => Expr::Ln(arg),
            FunctionName::Sqrt => Expr::sqrt(arg),
            FunctionName::Abs => Expr::abs(arg),
        }
    }
}

/// Parses "12", "1.5", "2.", ".5", "3e-2" (no sign, no inf/nan).
fn parse_number(input: &str) -> IResult<&str, Expr> {
    let exponent = opt((one_of("eE"), opt(one_of("+-")), digit1));
    let with_integer_part = recognize((digit1, opt(pair(char('.'), digit0)), exponent));
    let fraction_only = recognize((char('.'), digit1, opt((one_of("eE"), opt(one_of("+-")), digit1))));
    let mut parser = map_res(alt((with_integer_part, fraction_only)), |s: &str| {
        s.parse::<f64>().map(Expr::Const)
    });
    parser.parse(input)
}

/// Parses a name (word characters, first one not a digit)
fn parse_identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

/// Deepest nesting the grammar accepts, counted both as brackets, signs and exponents
/// still open while parsing and as the height of the resulting tree.
pub const MAX_NESTING: usize = 128;

/// A parsed subtree with its height (a leaf has height 1).
type Node = (Expr, usize);

fn too_deep(input: &str) -> nom::Err<Error<&str>> {
    nom::Err::Failure(Error::new(input, ErrorKind::TooLarge))
}

/// Height of a node built over children of height `height`, or a hard failure past the limit.
fn grow(input: &str, height: usize) -> Result<usize, nom::Err<Error<&str>>> {
    if height >= MAX_NESTING {
        Err(too_deep(input))
    } else {
        Ok(height + 1)
    }
}

fn parse_bracketed(input: &str, depth: usize) -> IResult<&str, Node> {
    delimited(char('('), |i| parse_sum(i, depth + 1), preceded(multispace0, char(')'))).parse(input)
}

/// A name is either a function call, one of the constants `pi`/`e`, or a free variable.
fn parse_call_or_name(input: &str, depth: usize) -> IResult<&str, Node> {
    let (rest, name) = parse_identifier(input)?;
    let (after_space, _) = multispace0(rest)?;
    if after_space.starts_with('(') {
        // unknown callee is a hard failure, there is nothing else to backtrack to
        let function = FunctionName::from_str(name)
            .map_err(|_| nom::Err::Failure(Error::new(input, ErrorKind::Verify)))?;
        let (rest, (arg, height)) = parse_bracketed(after_space, depth)?;
        let height = grow(after_space, height)?;
        return Ok((rest, (function.apply(arg), height)));
    }
    let expr = match name {
        "pi" => Expr::Const(PI),
        "e" => Expr::Const(E),
        _ => Expr::Var(name.to_string()),
    };
    Ok((rest, (expr, 1)))
}

fn parse_primary(input: &str, depth: usize) -> IResult<&str, Node> {
    let (input, _) = multispace0(input)?;
    alt((
        map(parse_number, |expr| (expr, 1)),
        |i| parse_bracketed(i, depth),
        |i| parse_call_or_name(i, depth),
    ))
    .parse(input)
}

fn parse_power(input: &str, depth: usize) -> IResult<&str, Node> {
    let (input, (base, base_height)) = parse_primary(input, depth)?;
    let (rest, _) = multispace0(input)?;
    let operator: IResult<&str, ()> = alt((value((), tag("**")), value((), tag("^")))).parse(rest);
    match operator {
        Ok((rest, ())) => {
            let (rest, (exponent, exponent_height)) = parse_unary(rest, depth + 1)?;
            let height = grow(rest, base_height.max(exponent_height))?;
            Ok((rest, (Expr::Pow(Box::new(base), Box::new(exponent)), height)))
        }
        Err(nom::Err::Error(_)) => Ok((input, (base, base_height))),
        Err(e) => Err(e),
    }
}

fn parse_unary(input: &str, depth: usize) -> IResult<&str, Node> {
    if depth > MAX_NESTING {
        return Err(too_deep(input));
    }
    let (input, _) = multispace0(input)?;
    let sign: IResult<&str, char> = one_of("+-").parse(input);
    match sign {
        Ok((rest, '-')) => {
            let (rest, (inner, height)) = parse_unary(rest, depth + 1)?;
            let negated = match inner {
                Expr::Const(val) => (Expr::Const(-val), height),
                other => (-other, grow(rest, height)?),
            };
            Ok((rest, negated))
        }
        Ok((rest, _)) => parse_unary(rest, depth + 1),
        Err(nom::Err::Error(_)) => parse_power(input, depth),
        Err(e) => Err(e),
    }
}

fn parse_product(input: &str, depth: usize) -> IResult<&str, Node> {
    let (mut input, (mut acc, mut height)) = parse_unary(input, depth)?;
    loop {
        let (rest, _) = multispace0(input)?;
        let operator: IResult<&str, char> = terminated(one_of("*/"), not(char('*'))).parse(rest);
        match operator {
            Ok((rest, op)) => {
                let (rest, (rhs, rhs_height)) = parse_unary(rest, depth)?;
                height = grow(rest, height.max(rhs_height))?;
                acc = if op == '*' {
                    Expr::Mul(Box::new(acc), Box::new(rhs))
                } else {
                    Expr::Div(Box::new(acc), Box::new(rhs))
                };
                input = rest;
            }
            Err(nom::Err::Error(_)) => return Ok((input, (acc, height))),
            Err(e) => return Err(e),
        }
    }
}

fn parse_sum(input: &str, depth: usize) -> IResult<&str, Node> {
    let (mut input, (mut acc, mut height)) = parse_product(input, depth)?;
    loop {
        let (rest, _) = multispace0(input)?;
        let operator: IResult<&str, char> = one_of("+-").parse(rest);
        match operator {
            Ok((rest, op)) => {
                let (rest, (rhs, rhs_height)) = parse_product(rest, depth)?;
                height = grow(rest, height.max(rhs_height))?;
                acc = if op == '+' {
                    Expr::Add(Box::new(acc), Box::new(rhs))
                } else {
                    Expr::Sub(Box::new(acc), Box::new(rhs))
                };
                input = rest;
            }
            Err(nom::Err::Error(_)) => return Ok((input, (acc, height))),
            Err(e) => return Err(e),
        }
    }
}

/// Parses the whole input; anything left over after the expression is an error.
///
/// Input nested deeper than [`MAX_NESTING`] is rejected with "expression nested too deeply".
pub fn parse_expression_func(input: &str) -> Result<Expr, String> {
    if input.trim().is_empty() {
        return Err("empty expression".to_string());
    }
    match parse_sum(input, 0) {
        Ok((remaining, (expr, _))) => {
            let remaining = remaining.trim();
            if remaining.is_empty() {
                Ok(expr)
            } else {
                Err(format!(
                    "invalid expression '{}': unexpected '{}'",
                    input.trim(),
                    remaining
                ))
            }
        }
        Err(nom::Err::Failure(e)) if e.code == ErrorKind::TooLarge => {
            Err("expression nested too deeply".to_string())
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let near = e.input.trim();
            if near.is_empty() {
                Err(format!("invalid expression '{}': unexpected end of input", input.trim()))
            } else {
                Err(format!("invalid expression '{}': cannot parse '{}'", input.trim(), near))
            }
        }
        Err(nom::Err::Incomplete(_)) => Err(format!("incomplete expression '{}'", input.trim())),
    }
}

impl Expr {
    /// EXPRESSION PARSING FROM STRINGS

    /// Parses a mathematical expression from string representation.
    ///
    /// # Supported Syntax
    /// - Variables: x, y, t2; constants `pi` and `e`
    /// - Numbers: 3, 3.14, .5, 1e-6
    /// - Operators: +, -, *, /, ** (or ^), unary minus
    /// - Functions: sin, cos, tan, cot, asin, acos, atan, acot, sinh, cosh, tanh, exp, log/ln, sqrt, abs
    /// - Parentheses for grouping
    pub fn parse_expression(input: &str) -> Result<Expr, String> {
        parse_expression_func(input)
    }
}
