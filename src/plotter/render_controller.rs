//! # Render Controller
//!
//! Owns the plotted session: the last successful analysis, its sampled curves and the
//! current derivative scale. Two entry points mutate it:
//! - `on_submit`: full pipeline and full redraw, all-or-nothing
//! - `on_scale_change`: rescales the stored derivative and pushes only that curve's y-data
//!
//! Drawing goes through the [`PlotSurface`] trait so the controller can drive a PNG
//! renderer, an interactive canvas or a recording stub in tests.
use crate::plotter::derivative_engine::{Analysis, SampleDomain, SampledCurves, analyze, sample};
use crate::plotter::errors::PlotterError;
use crate::symbolic::normalize::normalize;
use log::{debug, info, warn};

/// Smallest accepted derivative scale.
pub const SCALE_MIN: f64 = -10.0;
/// Largest accepted derivative scale.
pub const SCALE_MAX: f64 = 10.0;
/// Scale before any slider movement.
pub const DEFAULT_SCALE: f64 = 1.0;

/// Output side of the visualizer.
pub trait PlotSurface {
    /// Clears the plot and draws the function (solid) and the scaled derivative (dashed),
    /// fitting the viewport to the new data.
    fn redraw_all(&mut self, x: &[f64], function: &[f64], derivative: &[f64]);
    /// Replaces the y-data of the derivative curve only. Axes, viewport and the function
    /// curve stay as they are.
    fn update_derivative(&mut self, derivative: &[f64]);
    /// Sets the symbolic derivative label; shown with the next draw.
    fn set_derivative_text(&mut self, text: &str);
}

/// Everything kept after a successful submission.
#[derive(Debug, Clone)]
pub struct PlottedState {
    /// submitted text, trimmed
    pub expression: String,
    pub analysis: Analysis,
    /// function and unscaled derivative
    pub curves: SampledCurves,
    /// `scale * curves.derivative`, what the surface currently shows
    pub displayed_derivative: Vec<f64>,
}

/// `scale * raw` saturated to the finite range, so a huge derivative stays drawable.
fn scaled(scale: f64, raw: f64) -> f64 {
    (scale * raw).clamp(f64::MIN, f64::MAX)
}

pub struct RenderController<S: PlotSurface> {
    surface: S,
    scale: f64,
    state: Option<PlottedState>,
}

impl<S: PlotSurface> RenderController<S> {
    pub fn new(surface: S) -> Self {
        RenderController {
            surface,
            scale: DEFAULT_SCALE,
            state: None,
        }
    }

    /// Normalizes, analyses and samples `raw`, then redraws everything.
    ///
    /// On error nothing changes: the previous curves, label and viewport stay on screen.
    pub fn on_submit(&mut self, raw: &str) -> Result<(), PlotterError> {
        let expression = raw.trim();
        if expression.is_empty() {
            warn!("empty expression submitted");
            return Err(PlotterError::EmptyInput);
        }
        info!("plotting '{}'", expression);
        let normalized = normalize(expression);
        debug!("normalized '{}' -> '{}'", expression, normalized);
        let analysis = analyze(&normalized).inspect_err(|e| warn!("{}", e))?;
        self.on_analysis(expression, analysis)
    }

    /// Samples a ready [`Analysis`] and commits it as the new plot.
    ///
    /// The analysis can be computed elsewhere (another thread) and handed in here; the
    /// session is replaced in one step once sampling succeeds.
    pub fn on_analysis(&mut self, expression: &str, analysis: Analysis) -> Result<(), PlotterError> {
        let curves = sample(&analysis, &SampleDomain::default()).inspect_err(|e| warn!("{}", e))?;
        let displayed_derivative = curves.derivative.iter().map(|d| scaled(self.scale, *d)).collect::<Vec<f64>>();

        self.surface.set_derivative_text(&analysis.symbolic_text);
        self.surface.redraw_all(&curves.x, &curves.function, &displayed_derivative);
        info!("plotted '{}', derivative {}", expression, analysis.symbolic_text);
        self.state = Some(PlottedState {
            expression: expression.to_string(),
            analysis,
            curves,
            displayed_derivative,
        });
        Ok(())
    }

    /// Sets the derivative scale and, if something is plotted, rescales the derivative curve.
    ///
    /// Non-finite values are ignored; finite ones are clamped to [`SCALE_MIN`, `SCALE_MAX`].
    pub fn on_scale_change(&mut self, new_scale: f64) {
        if !new_scale.is_finite() {
            debug!("ignoring scale {}", new_scale);
            return;
        }
        self.scale = new_scale.clamp(SCALE_MIN, SCALE_MAX);
        debug!("scale set to {}", self.scale);
        let Some(state) = self.state.as_mut() else {
            return;
        };
        for (shown, raw) in state.displayed_derivative.iter_mut().zip(&state.curves.derivative) {
            *shown = scaled(self.scale, *raw);
        }
        self.surface.update_derivative(&state.displayed_derivative);
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn has_plot(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&PlottedState> {
        self.state.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}
