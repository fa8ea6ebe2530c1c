//! Scripted demo: draws two strokes, highlights and erases them, and prints
//! every engine event as a JSON line.

use std::process::ExitCode;
use std::time::{Duration, Instant};

use inkline::config::EngineConfig;
use inkline::engine::{Engine, Event, FrameInput, TickReport};
use inkline::geom::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FRAME: Duration = Duration::from_millis(11);
const JITTER: f64 = 0.002;

fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(error) if error.not_found() => {}
        Err(error) => tracing::warn!(%error, "failed to read .env"),
    }

    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    let mut engine = match Engine::new(config) {
        Ok(engine) => engine,
        Err(error) => {
            tracing::error!(%error, "engine rejected configuration");
            return ExitCode::FAILURE;
        }
    };

    let mut demo = Demo { engine: &mut engine, rng: StdRng::seed_from_u64(7), now: Instant::now() };
    if let Err(error) = demo.run() {
        tracing::error!(%error, "demo aborted");
        return ExitCode::FAILURE;
    }

    tracing::info!(lines = engine.store().len(), "demo finished");
    ExitCode::SUCCESS
}

struct Demo<'a> {
    engine: &'a mut Engine,
    rng: StdRng,
    now: Instant,
}

impl Demo<'_> {
    fn run(&mut self) -> Result<(), inkline::engine::EngineError> {
        // A wobbly arc in the first color.
        let arc: Vec<Point> = (0..=40)
            .map(|i| {
                let t = f64::from(i) / 40.0 * std::f64::consts::PI;
                Point::new(t.cos(), 1.0 + t.sin() * 0.5, 0.0)
            })
            .collect();
        self.stroke(&arc)?;

        // A straight bar across it in the next color.
        self.engine.increment_color();
        let bar: Vec<Point> = (0..=20).map(|i| Point::new(-1.0 + f64::from(i) * 0.1, 1.2, 0.0)).collect();
        self.stroke(&bar)?;

        // Hover the eraser over the arc's apex, then take the bar out.
        self.engine.eraser_picked_up();
        self.frame(FrameInput { eraser: Some(Point::new(0.0, 1.5, 0.0)), ..FrameInput::at(self.now) });
        emit(self.engine.eraser_use(Some(Point::new(0.5, 1.2, 0.0)))?);
        emit(self.engine.eraser_dropped());

        // Rub a hole into the left half of the arc.
        self.engine.pixel_erase_start();
        for i in 0..10 {
            let y = 1.0 + f64::from(i) * 0.15;
            self.frame(FrameInput { pixel_eraser: Some(Point::new(-0.8, y, 0.0)), ..FrameInput::at(self.now) });
        }
        self.engine.pixel_erase_stop();

        for color in 0..self.engine.config().color_count() {
            let len = self.engine.render_buffer(color).len();
            tracing::info!(color, points = len, "render buffer");
        }
        Ok(())
    }

    fn stroke(&mut self, path: &[Point]) -> Result<(), inkline::engine::EngineError> {
        let Some((&first, rest)) = path.split_first() else {
            return Ok(());
        };
        self.engine.pen_down(Some(first))?;
        for &target in rest {
            let tip = target + self.jitter();
            self.frame(FrameInput { pen_tip: Some(tip), ..FrameInput::at(self.now) });
        }
        emit(self.engine.pen_up());
        Ok(())
    }

    fn frame(&mut self, input: FrameInput) {
        let TickReport { events, errors } = self.engine.tick(&input);
        for error in errors {
            tracing::warn!(%error, "tick error");
        }
        emit(events);
        self.now += FRAME;
    }

    fn jitter(&mut self) -> Point {
        Point::new(
            self.rng.random_range(-JITTER..JITTER),
            self.rng.random_range(-JITTER..JITTER),
            self.rng.random_range(-JITTER..JITTER),
        )
    }
}

fn emit(events: Vec<Event>) {
    for event in events {
        match serde_json::to_string(&event) {
            Ok(json) => println!("{json}"),
            Err(error) => tracing::warn!(%error, "failed to encode event"),
        }
    }
}
