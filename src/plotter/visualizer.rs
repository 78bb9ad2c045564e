//! Binding between the input widgets and the [`RenderController`].
//!
//! The text field and the Plot button end up in `on_submit`; every error is turned into an
//! [`Alert`] for the host to show. The slope slider delivers raw strings, the way toolkit
//! scale widgets do, and anything that is not a finite number is dropped without a message.
use crate::plotter::errors::PlotterError;
use crate::plotter::render_controller::{
    DEFAULT_SCALE, PlotSurface, RenderController, SCALE_MAX, SCALE_MIN,
};
use log::{debug, error, warn};
use std::fmt;
use strum_macros::Display;

pub const SLIDER_LABEL: &str = "Slope";
pub const SLIDER_RESOLUTION: f64 = 0.1;

/// Slope slider: [-10, 10] in steps of 0.1.
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    value: f64,
}

impl Default for Slider {
    fn default() -> Self {
        Slider {
            value: DEFAULT_SCALE,
        }
    }
}

impl Slider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn label(&self) -> &'static str {
        SLIDER_LABEL
    }

    pub fn range(&self) -> (f64, f64) {
        (SCALE_MIN, SCALE_MAX)
    }

    /// Snaps `raw` to the nearest step, clamps it to the range and returns the stored value.
    pub fn set(&mut self, raw: f64) -> f64 {
        let steps_per_unit = (1.0 / SLIDER_RESOLUTION).round();
        let snapped = (raw * steps_per_unit).round() / steps_per_unit;
        self.value = snapped.clamp(SCALE_MIN, SCALE_MAX);
        self.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AlertSeverity {
    Warning,
    Error,
}

/// A message box request.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub title: &'static str,
    pub message: String,
}

impl From<&PlotterError> for Alert {
    fn from(err: &PlotterError) -> Self {
        let (severity, title) = match err {
            PlotterError::EmptyInput => (AlertSeverity::Warning, "Input Error"),
            PlotterError::Parse(_) => (AlertSeverity::Error, "Symbolic Error"),
            PlotterError::Evaluation(_) => (AlertSeverity::Error, "Evaluation Error"),
        };
        Alert {
            severity,
            title,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.title, self.message)
    }
}

/// Text field, Plot button and slope slider around a [`RenderController`].
pub struct DerivativeVisualizer<S: PlotSurface> {
    controller: RenderController<S>,
    slider: Slider,
    entry: String,
}

impl<S: PlotSurface> DerivativeVisualizer<S> {
    pub fn new(surface: S) -> Self {
        let slider = Slider::new();
        let mut controller = RenderController::new(surface);
        controller.on_scale_change(slider.value());
        DerivativeVisualizer {
            controller,
            slider,
            entry: String::new(),
        }
    }

    pub fn set_entry(&mut self, text: &str) {
        self.entry = text.to_string();
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Plot button: submits the current entry text.
    pub fn press_plot(&mut self) -> Option<Alert> {
        match self.controller.on_submit(&self.entry) {
            Ok(()) => None,
            Err(err) => {
                let alert = Alert::from(&err);
                match alert.severity {
                    AlertSeverity::Warning => warn!("{}", alert),
                    AlertSeverity::Error => error!("{}", alert),
                }
                Some(alert)
            }
        }
    }

    /// Types `text` into the field and presses Plot.
    pub fn submit(&mut self, text: &str) -> Option<Alert> {
        self.set_entry(text);
        self.press_plot()
    }

    /// Slider callback with the widget's raw value.
    pub fn drag_slider(&mut self, raw: &str) {
        let value = match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                debug!("ignoring slider value '{}'", raw);
                return;
            }
        };
        let value = self.slider.set(value);
        self.controller.on_scale_change(value);
    }

    pub fn slider(&self) -> &Slider {
        &self.slider
    }

    pub fn controller(&self) -> &RenderController<S> {
        &self.controller
    }

    pub fn surface(&self) -> &S {
        self.controller.surface()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.controller.surface_mut()
    }
}
