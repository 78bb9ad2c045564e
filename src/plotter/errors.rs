use std::fmt;

/// Error types for a plot submission
#[derive(Debug, Clone, PartialEq)]
pub enum PlotterError {
    /// the text field was blank or whitespace-only
    EmptyInput,
    /// the normalized text is not a valid expression
    Parse(String),
    /// the expression parses but cannot be evaluated on the sample domain
    Evaluation(String),
}

impl fmt::Display for PlotterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlotterError::EmptyInput => write!(f, "Please enter a function"),
            PlotterError::Parse(msg) => write!(f, "Error computing symbolic derivative: {}", msg),
            PlotterError::Evaluation(msg) => write!(f, "Error evaluating function: {}", msg),
        }
    }
}

impl std::error::Error for PlotterError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(PlotterError::EmptyInput.to_string(), "Please enter a function");
        assert_eq!(
            PlotterError::Parse("bad".to_string()).to_string(),
            "Error computing symbolic derivative: bad"
        );
        assert_eq!(
            PlotterError::Evaluation("division by zero".to_string()).to_string(),
            "Error evaluating function: division by zero"
        );
    }

    #[test]
    fn test_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(PlotterError::EmptyInput);
        assert!(err.source().is_none());
    }
}
