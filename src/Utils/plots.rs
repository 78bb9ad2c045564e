//! PNG rendering of the function and its scaled derivative with `plotters`.
use crate::plotter::derivative_engine::{DOMAIN_END, DOMAIN_START};
use crate::plotter::render_controller::PlotSurface;
use itertools::{Itertools, MinMaxResult};
use log::{debug, error};
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};

pub const PLOT_TITLE: &str = "Function and Scaled Derivative";
pub const FUNCTION_LABEL: &str = "Original Function";
pub const DERIVATIVE_LABEL: &str = "Derivative";
pub const DERIVATIVE_TEXT_PREFIX: &str = "Symbolic Derivative: ";
/// pixel height of the strip under the chart holding the derivative text
const TEXT_STRIP_HEIGHT: u32 = 30;
/// share of the data span added on each side of the fitted y-range
const Y_MARGIN: f64 = 0.05;

/// Renders every draw request into a PNG file.
///
/// The viewport starts at [-10, 10] x [-10, 10], is refitted on `redraw_all` and kept on
/// `update_derivative`, so dragging the slider can move the dashed curve out of view.
pub struct PngSurface {
    output: PathBuf,
    width: u32,
    height: u32,
    x: Vec<f64>,
    function: Vec<f64>,
    derivative: Vec<f64>,
    derivative_text: String,
    x_range: Range<f64>,
    y_range: Range<f64>,
    renders: usize,
    last_error: Option<String>,
}

impl PngSurface {
    pub fn new(output: impl AsRef<Path>, width: u32, height: u32) -> Self {
        PngSurface {
            output: output.as_ref().to_path_buf(),
            width,
            height,
            x: Vec::new(),
            function: Vec::new(),
            derivative: Vec::new(),
            derivative_text: String::new(),
            x_range: DOMAIN_START..DOMAIN_END,
            y_range: DOMAIN_START..DOMAIN_END,
            renders: 0,
            last_error: None,
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn x_range(&self) -> Range<f64> {
        self.x_range.clone()
    }

    pub fn y_range(&self) -> Range<f64> {
        self.y_range.clone()
    }

    pub fn derivative_text(&self) -> &str {
        &self.derivative_text
    }

    pub fn derivative(&self) -> &[f64] {
        &self.derivative
    }

    /// number of successful renders so far
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// error of the most recent render, cleared by the next successful one
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Writes the PNG; draw failures are logged and kept in `last_error`.
    pub fn render(&mut self) {
        match self.draw() {
            Ok(()) => {
                self.renders += 1;
                self.last_error = None;
                debug!("rendered {}", self.output.display());
            }
            Err(e) => {
                error!("cannot render {}: {}", self.output.display(), e);
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn draw(&self) -> Result<(), Box<dyn std::error::Error>> {
        let root = BitMapBackend::new(&self.output, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;
        let (plot_area, text_area) = root.split_vertically(self.height.saturating_sub(TEXT_STRIP_HEIGHT));

        let mut chart = ChartBuilder::on(&plot_area)
            .caption(PLOT_TITLE, ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(self.x_range.clone(), self.y_range.clone())?;

        chart.configure_mesh().x_desc("x").y_desc("y").draw()?;

        if !self.x.is_empty() {
            let function: Vec<(f64, f64)> = self.x.iter().copied().zip(self.function.iter().copied()).collect();
            chart
                .draw_series(LineSeries::new(function, &BLUE))?
                .label(FUNCTION_LABEL)
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

            let derivative: Vec<(f64, f64)> =
                self.x.iter().copied().zip(self.derivative.iter().copied()).collect();
            chart
                .draw_series(DashedLineSeries::new(derivative, 6, 4, RED.stroke_width(1)))?
                .label(DERIVATIVE_LABEL)
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;
        }

        text_area.draw(&Text::new(
            format!("{}{}", DERIVATIVE_TEXT_PREFIX, self.derivative_text),
            (10, 5),
            ("sans-serif", 16).into_font(),
        ))?;
        root.present()?;
        Ok(())
    }
}

/// Data range of both curves with a 5% margin; a flat curve gets a unit band around it.
/// Non-finite values are skipped and the bounds never leave the finite range.
fn fit_range(function: &[f64], derivative: &[f64]) -> Range<f64> {
    let finite = function.iter().chain(derivative).copied().filter(|v| v.is_finite());
    let (lo, hi) = match finite.minmax_by(f64::total_cmp) {
        MinMaxResult::NoElements => return DOMAIN_START..DOMAIN_END,
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    };
    let margin = if hi == lo { 1.0 } else { hi * Y_MARGIN - lo * Y_MARGIN };
    (lo - margin).max(f64::MIN)..(hi + margin).min(f64::MAX)
}

impl PlotSurface for PngSurface {
    fn redraw_all(&mut self, x: &[f64], function: &[f64], derivative: &[f64]) {
        self.x = x.to_vec();
        self.function = function.to_vec();
        self.derivative = derivative.to_vec();
        if let (Some(first), Some(last)) = (x.first(), x.last()) {
            if first < last {
                self.x_range = *first..*last;
            }
        }
        self.y_range = fit_range(function, derivative);
        self.render();
    }

    fn update_derivative(&mut self, derivative: &[f64]) {
        self.derivative = derivative.to_vec();
        self.render();
    }

    fn set_derivative_text(&mut self, text: &str) {
        self.derivative_text = text.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plotter::errors::PlotterError;
    use crate::plotter::render_controller::RenderController;
    use tempfile::tempdir;

    #[test]
    fn test_fit_range() {
        let range = fit_range(&[0.0, 10.0], &[-10.0]);
        assert_eq!(range, -11.0..11.0);
        assert_eq!(fit_range(&[3.0, 3.0], &[3.0]), 2.0..4.0);
        assert_eq!(fit_range(&[], &[]), -10.0..10.0);
    }

    #[test]
    fn test_fit_range_stays_finite() {
        assert_eq!(fit_range(&[0.0, f64::INFINITY, 10.0], &[f64::NAN, -10.0]), -11.0..11.0);
        assert_eq!(fit_range(&[f64::NAN], &[f64::NEG_INFINITY]), -10.0..10.0);
        let wide = fit_range(&[f64::MAX], &[f64::MIN]);
        assert_eq!(wide, f64::MIN..f64::MAX);
    }

    #[test]
    fn test_overflowing_derivative_never_reaches_the_renderer() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plot.png");
        let mut ctrl = RenderController::new(PngSurface::new(&path, 320, 240));
        // f stays finite on [-10, 10], the difference quotient at x = 10 does not
        let err = ctrl.on_submit("exp(70.9*x)").unwrap_err();
        assert!(matches!(err, PlotterError::Evaluation(_)));
        assert_eq!(ctrl.surface().renders(), 0);
        assert!(ctrl.surface().derivative().is_empty());
    }

    #[test]
    fn test_initial_viewport() {
        let surface = PngSurface::new("unused.png", 100, 100);
        assert_eq!(surface.x_range(), -10.0..10.0);
        assert_eq!(surface.y_range(), -10.0..10.0);
        assert_eq!(surface.renders(), 0);
    }

    #[test]
    fn test_viewport_refits_on_full_redraw_only() {
        let dir = tempdir().unwrap();
        let mut ctrl = RenderController::new(PngSurface::new(dir.path().join("plot.png"), 320, 240));
        ctrl.on_submit("x^2").unwrap();
        let fitted = ctrl.surface().y_range();
        // x^2 reaches 100 on [-10, 10], derivative 2x reaches -20
        assert!(fitted.end > 100.0);
        assert!(fitted.start < -20.0);

        ctrl.on_scale_change(10.0);
        assert_eq!(ctrl.surface().y_range(), fitted);
        assert_eq!(ctrl.surface().derivative_text(), "2*x");
        assert_eq!(ctrl.surface().derivative(), ctrl.state().unwrap().displayed_derivative.as_slice());
    }

    #[test]
    fn test_render_writes_png_or_reports_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plot.png");
        let mut ctrl = RenderController::new(PngSurface::new(&path, 320, 240));
        ctrl.on_submit("sin(x)").unwrap();
        let surface = ctrl.surface();
        // headless machines may have no fonts; the failure must then be recorded, not lost
        match surface.last_error() {
            None => {
                assert!(path.exists());
                assert_eq!(surface.renders(), 1);
            }
            Some(msg) => assert!(!msg.is_empty()),
        }
    }
}
