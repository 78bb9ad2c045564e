/////////////////////////////TESTS////////////////////////////////////////////////////
/*
session scenarios driven through a surface that records every draw call:
end-to-end plot of x^2, idempotent resubmission, scale independence,
atomic failures (empty, unparseable, unevaluable input), overflowing derivatives,
nesting that is too deep, slider before first plot,
slider input that is not a number
*/

#[cfg(test)]
mod tests {
    use crate::plotter::errors::PlotterError;
    use crate::plotter::render_controller::{PlotSurface, RenderController};
    use crate::plotter::visualizer::{AlertSeverity, DerivativeVisualizer};
    use approx::assert_relative_eq;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        RedrawAll,
        UpdateDerivative,
        SetText(String),
    }

    #[derive(Debug, Default)]
    struct RecordingSurface {
        calls: Vec<Call>,
        x: Vec<f64>,
        function: Vec<f64>,
        derivative: Vec<f64>,
        text: String,
    }

    impl PlotSurface for RecordingSurface {
        fn redraw_all(&mut self, x: &[f64], function: &[f64], derivative: &[f64]) {
            self.calls.push(Call::RedrawAll);
            self.x = x.to_vec();
            self.function = function.to_vec();
            self.derivative = derivative.to_vec();
        }

        fn update_derivative(&mut self, derivative: &[f64]) {
            self.calls.push(Call::UpdateDerivative);
            self.derivative = derivative.to_vec();
        }

        fn set_derivative_text(&mut self, text: &str) {
            self.calls.push(Call::SetText(text.to_string()));
            self.text = text.to_string();
        }
    }

    fn controller() -> RenderController<RecordingSurface> {
        RenderController::new(RecordingSurface::default())
    }

    #[test]
    fn test_end_to_end_square() {
        let mut ctrl = controller();
        ctrl.on_submit("x^2").unwrap();
        let state = ctrl.state().unwrap();
        assert_eq!(state.analysis.symbolic_text, "2*x");
        assert_eq!(ctrl.surface().text, "2*x");
        assert_relative_eq!(state.analysis.numeric_fn.eval(2.0).unwrap(), 4.0);
        assert_relative_eq!(state.analysis.numeric_deriv_fn.eval(2.0).unwrap(), 4.0, epsilon = 1e-6);

        ctrl.on_scale_change(2.0);
        let state = ctrl.state().unwrap();
        for ((x, shown), raw) in state
            .curves
            .x
            .iter()
            .zip(&state.displayed_derivative)
            .zip(&state.curves.derivative)
        {
            assert_relative_eq!(*shown, 2.0 * raw);
            assert_relative_eq!(*shown, 4.0 * x, epsilon = 1e-5);
        }
        assert_eq!(ctrl.surface().derivative, state.displayed_derivative);
    }

    #[test]
    fn test_full_redraw_draws_both_curves_and_text() {
        let mut ctrl = controller();
        ctrl.on_submit("sin(x)").unwrap();
        let surface = ctrl.surface();
        assert_eq!(surface.calls, vec![Call::SetText("cos(x)".to_string()), Call::RedrawAll]);
        assert_eq!(surface.x.len(), 400);
        assert_eq!(surface.function.len(), 400);
        assert_eq!(surface.derivative.len(), 400);
    }

    #[test]
    fn test_resubmission_is_bit_identical() {
        let mut ctrl = controller();
        ctrl.on_submit("x^3 - 2x + exp(x/5)").unwrap();
        let first = ctrl.state().unwrap().curves.clone();
        ctrl.on_submit("x^3 - 2x + exp(x/5)").unwrap();
        let second = &ctrl.state().unwrap().curves;
        assert_eq!(&first, second);
    }

    #[test]
    fn test_scale_change_is_independent_of_history() {
        let mut a = controller();
        a.on_submit("sin(x)*x").unwrap();
        a.on_scale_change(3.5);
        a.on_scale_change(-2.0);

        let mut b = controller();
        b.on_submit("sin(x)*x").unwrap();
        b.on_scale_change(-2.0);

        assert_eq!(a.state().unwrap().displayed_derivative, b.state().unwrap().displayed_derivative);
        assert_eq!(a.surface().derivative, b.surface().derivative);
    }

    #[test]
    fn test_scale_change_updates_only_the_derivative() {
        let mut ctrl = controller();
        ctrl.on_submit("x^2").unwrap();
        let function_before = ctrl.surface().function.clone();
        ctrl.surface_mut().calls.clear();
        ctrl.on_scale_change(-1.5);
        assert_eq!(ctrl.surface().calls, vec![Call::UpdateDerivative]);
        assert_eq!(ctrl.surface().function, function_before);
        assert_eq!(ctrl.surface().text, "2*x");
    }

    #[test]
    fn test_scale_persists_across_submissions() {
        let mut ctrl = controller();
        ctrl.on_scale_change(3.0);
        ctrl.on_submit("x^2").unwrap();
        let state = ctrl.state().unwrap();
        for (shown, raw) in state.displayed_derivative.iter().zip(&state.curves.derivative) {
            assert_relative_eq!(*shown, 3.0 * raw);
        }
        assert_eq!(ctrl.scale(), 3.0);
    }

    #[test]
    fn test_scale_before_first_plot_draws_nothing() {
        let mut ctrl = controller();
        ctrl.on_scale_change(5.0);
        assert_eq!(ctrl.scale(), 5.0);
        assert!(!ctrl.has_plot());
        assert!(ctrl.surface().calls.is_empty());
    }

    #[test]
    fn test_scale_is_clamped_and_non_finite_ignored() {
        let mut ctrl = controller();
        ctrl.on_scale_change(25.0);
        assert_eq!(ctrl.scale(), 10.0);
        ctrl.on_scale_change(f64::NAN);
        assert_eq!(ctrl.scale(), 10.0);
        ctrl.on_scale_change(f64::NEG_INFINITY);
        assert_eq!(ctrl.scale(), 10.0);
    }

    #[test]
    fn test_parse_failure_keeps_previous_plot() {
        let mut ctrl = controller();
        ctrl.on_submit("x^2").unwrap();
        let curves = ctrl.state().unwrap().curves.clone();
        let calls = ctrl.surface().calls.len();

        let err = ctrl.on_submit("x+").unwrap_err();
        assert!(matches!(err, PlotterError::Parse(_)));
        assert_eq!(ctrl.state().unwrap().curves, curves);
        assert_eq!(ctrl.state().unwrap().expression, "x^2");
        assert_eq!(ctrl.surface().text, "2*x");
        assert_eq!(ctrl.surface().calls.len(), calls);
    }

    #[test]
    fn test_empty_input() {
        let mut ctrl = controller();
        assert_eq!(ctrl.on_submit(""), Err(PlotterError::EmptyInput));
        assert_eq!(ctrl.on_submit("   \t"), Err(PlotterError::EmptyInput));
        assert!(!ctrl.has_plot());
        assert!(ctrl.surface().calls.is_empty());
    }

    #[test]
    fn test_singularity_on_grid_is_an_evaluation_error() {
        let mut ctrl = controller();
        ctrl.on_submit("x^2").unwrap();
        let err = ctrl.on_submit("1/(x+10)").unwrap_err();
        assert!(matches!(err, PlotterError::Evaluation(_)));
        assert_eq!(ctrl.state().unwrap().expression, "x^2");
        assert_eq!(ctrl.surface().text, "2*x");
    }

    #[test]
    fn test_overflowing_difference_quotient_is_an_evaluation_error() {
        let mut ctrl = controller();
        ctrl.on_submit("x^2").unwrap();
        let calls = ctrl.surface().calls.len();
        let err = ctrl.on_submit("exp(70.9*x)").unwrap_err();
        assert!(matches!(err, PlotterError::Evaluation(ref msg) if msg.contains("not finite")), "{:?}", err);
        assert_eq!(ctrl.state().unwrap().expression, "x^2");
        assert_eq!(ctrl.surface().calls.len(), calls);
    }

    #[test]
    fn test_scaled_derivative_saturates_instead_of_overflowing() {
        let mut ctrl = controller();
        // derivative at x = 10 is about 1.06e308, finite but not after scaling by 10
        ctrl.on_submit("exp(70.5*x)").unwrap();
        assert!(ctrl.surface().derivative.iter().all(|d| d.is_finite()));

        ctrl.on_scale_change(10.0);
        assert_eq!(ctrl.surface().derivative.last(), Some(&f64::MAX));
        ctrl.on_scale_change(-10.0);
        assert_eq!(ctrl.surface().derivative.last(), Some(&f64::MIN));
        ctrl.on_scale_change(0.0);
        assert!(ctrl.surface().derivative.iter().all(|d| *d == 0.0));

        ctrl.on_scale_change(10.0);
        ctrl.on_submit("exp(70.5*x)").unwrap();
        assert!(ctrl.surface().derivative.iter().all(|d| d.is_finite()));
    }

    #[test]
    fn test_deep_nesting_is_a_parse_error() {
        let mut ctrl = controller();
        ctrl.on_submit("x^2").unwrap();
        let deep = "(".repeat(20000) + "x" + &")".repeat(20000);
        let err = ctrl.on_submit(&deep).unwrap_err();
        assert_eq!(err, PlotterError::Parse("expression nested too deeply".to_string()));
        assert_eq!(ctrl.state().unwrap().expression, "x^2");
    }

    #[test]
    fn test_singularity_between_grid_points_plots() {
        let mut ctrl = controller();
        ctrl.on_submit("1/x").unwrap();
        assert_eq!(ctrl.state().unwrap().analysis.symbolic_text, "-1/x^2");
    }

    #[test]
    fn test_unknown_variable_is_an_evaluation_error() {
        let mut ctrl = controller();
        assert!(matches!(ctrl.on_submit("x*y"), Err(PlotterError::Evaluation(_))));
        assert!(!ctrl.has_plot());
    }

    #[test]
    fn test_visualizer_alerts() {
        let mut app = DerivativeVisualizer::new(RecordingSurface::default());
        let alert = app.submit("").unwrap();
        assert_eq!(alert.severity, AlertSeverity::Warning);
        assert_eq!(alert.title, "Input Error");

        let alert = app.submit("sin(").unwrap();
        assert_eq!(alert.title, "Symbolic Error");
        assert!(alert.message.starts_with("Error computing symbolic derivative"));

        let alert = app.submit("log(x)").unwrap();
        assert_eq!(alert.title, "Evaluation Error");
        assert!(alert.message.starts_with("Error evaluating function"));

        assert!(app.submit("2x^2").is_none());
        assert_eq!(app.surface().text, "4*x");
    }

    #[test]
    fn test_visualizer_slider() {
        let mut app = DerivativeVisualizer::new(RecordingSurface::default());
        assert!(app.submit("x").is_none());
        app.drag_slider("2.46");
        assert_eq!(app.slider().value(), 2.5);
        assert_eq!(app.controller().scale(), 2.5);
        for shown in &app.surface().derivative {
            assert_relative_eq!(*shown, 2.5, epsilon = 1e-6);
        }

        let before = app.surface().derivative.clone();
        let calls = app.surface().calls.len();
        app.drag_slider("not a number");
        app.drag_slider("inf");
        app.drag_slider("");
        assert_eq!(app.surface().derivative, before);
        assert_eq!(app.surface().calls.len(), calls);
        assert_eq!(app.controller().scale(), 2.5);
    }
}
