//! Rewrites loosely typed formulas ("2x^2 + 3(x+1)") into the strict form the parser accepts.
//!
//! The rewriting is purely textual and never fails: whatever it produces is checked later
//! by the parser. Rules run in a fixed order, each one a single left-to-right pass over the
//! non-overlapping matches of its pattern in the output of the previous rule:
//!
//! 1. `^`            -> `**`
//! 2. digit, letter  -> digit `*` letter   (`2x` -> `2*x`, `3(` -> `3*(`)
//! 3. `)` digit      -> `)` `*` digit
//! 4. `)` letter     -> `)` `*` letter
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static DIGIT_BEFORE_LETTER_OR_BRACKET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d)([a-zA-Z\(])").expect("literal pattern"));
static BRACKET_BEFORE_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\))(\d)").expect("literal pattern"));
static BRACKET_BEFORE_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\))([a-zA-Z])").expect("literal pattern"));

/// Output of [`normalize`]: explicit multiplication and `**` for powers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedExpression(String);

impl NormalizedExpression {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedExpression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Applies the four rewriting rules in order.
///
/// # Examples
/// ```
/// use RustedDerivView::symbolic::normalize::normalize;
/// assert_eq!(normalize("2x^2").as_str(), "2*x**2");
/// assert_eq!(normalize("3(x+1)2x").as_str(), "3*(x+1)*2*x");
/// ```
pub fn normalize(raw: &str) -> NormalizedExpression {
    let func_str = raw.replace('^', "**");
    let func_str = DIGIT_BEFORE_LETTER_OR_BRACKET.replace_all(&func_str, "${1}*${2}");
    let func_str = BRACKET_BEFORE_DIGIT.replace_all(&func_str, "${1}*${2}");
    let func_str = BRACKET_BEFORE_LETTER.replace_all(&func_str, "${1}*${2}");
    NormalizedExpression(func_str.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caret_becomes_double_star() {
        let normalized = normalize("x^2 + x^3");
        assert_eq!(normalized.as_str(), "x**2 + x**3");
        assert!(!normalized.as_str().contains('^'));
    }

    #[test]
    fn test_digit_before_letter() {
        assert_eq!(normalize("2x").as_str(), "2*x");
        assert_eq!(normalize("10sin(x)").as_str(), "10*sin(x)");
    }

    #[test]
    fn test_digit_before_bracket() {
        assert_eq!(normalize("3(x+1)").as_str(), "3*(x+1)");
    }

    #[test]
    fn test_bracket_before_digit_and_letter() {
        assert_eq!(normalize("(x+1)2").as_str(), "(x+1)*2");
        assert_eq!(normalize("(x+1)x").as_str(), "(x+1)*x");
        assert_eq!(normalize("(x+1)(x-1)").as_str(), "(x+1)(x-1)");
    }

    #[test]
    fn test_three_insertions() {
        let normalized = normalize("3(x+1)2x");
        assert_eq!(normalized.as_str(), "3*(x+1)*2*x");
        assert_eq!(normalized.as_str().matches('*').count(), 3);
    }

    #[test]
    fn test_overlapping_matches_terminate() {
        assert_eq!(normalize("2(3)x").as_str(), "2*(3)*x");
        // "22x": the first pair "22" does not match, "2x" does
        assert_eq!(normalize("22x").as_str(), "22*x");
    }

    #[test]
    fn test_already_strict_input_is_untouched() {
        let input = "2*x**2 - sin(x)/x";
        assert_eq!(normalize(input).as_str(), input);
    }

    #[test]
    fn test_scientific_notation_is_split_like_implicit_product() {
        // known quirk: the exponent marker is read as Euler's number
        assert_eq!(normalize("1e-5").as_str(), "1*e-5");
    }
}
