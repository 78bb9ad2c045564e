#![allow(non_snake_case)]
use RustedDerivView::Utils::logger::init_logging;
use RustedDerivView::Utils::plots::{DERIVATIVE_TEXT_PREFIX, PngSurface};
use RustedDerivView::Utils::settings::{PlotterSettings, SETTINGS_FILE};
use RustedDerivView::plotter::visualizer::DerivativeVisualizer;
use log::{info, warn};
use std::io::{self, BufRead, Write};
use std::path::Path;

const HELP: &str = "type a function of x and press Enter to plot it (e.g. 2x^2 + sin(x))
:scale <value>  move the Slope slider (-10 .. 10)
:help           show this text
:quit           exit";

fn main() {
    let (settings, settings_error) = match PlotterSettings::load(Path::new(SETTINGS_FILE)) {
        Ok(settings) => (settings, None),
        Err(e) => (PlotterSettings::default(), Some(e)),
    };
    if let Err(e) = init_logging(&settings) {
        eprintln!("{}", e);
    }
    if let Some(e) = settings_error {
        warn!("{}: {}; using defaults", SETTINGS_FILE, e);
    }
    info!("Program started with loglevel: {}", settings.loglevel);

    let mut surface = PngSurface::new(&settings.output, settings.width, settings.height);
    surface.render();
    let mut app = DerivativeVisualizer::new(surface);
    println!("plot is written to {}", settings.output.display());
    println!("{}", HELP);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("f(x) = ");
        if let Err(e) = io::stdout().flush() {
            warn!("cannot flush prompt: {}", e);
        }
        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                warn!("cannot read input: {}", e);
                break;
            }
            None => break,
        };
        let command = line.trim();
        if command == ":quit" {
            break;
        } else if command == ":help" {
            println!("{}", HELP);
        } else if let Some(value) = command.strip_prefix(":scale") {
            app.drag_slider(value);
            println!("{} = {}", app.slider().label(), app.slider().value());
        } else {
            match app.submit(&line) {
                Some(alert) => println!("{}", alert),
                None => println!("{}{}", DERIVATIVE_TEXT_PREFIX, app.surface().derivative_text()),
            }
        }
        if let Some(e) = app.surface().last_error() {
            println!("render failed: {}", e);
        }
    }
    info!("Program ended");
}
