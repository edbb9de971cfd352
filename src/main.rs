//! Lane Racer headless driver
//!
//! Runs an all-AI race at a fixed timestep and prints the standings. The
//! browser build uses the `web` bindings instead.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;

    use lane_racer::RaceSettings;
    use lane_racer::settings::clamp_lane_count;
    use lane_racer::sim::{CarConfig, PlayerInputs, Race, TrackType};

    #[derive(Debug, Parser)]
    #[command(name = "lane-racer", version)]
    #[command(about = "Simulate a headless AI race and print the standings")]
    struct Cli {
        /// Track layout (oval, speedway, figure8, roadcourse)
        #[arg(long)]
        track: Option<TrackType>,

        /// Number of lanes (clamped to 1..=8)
        #[arg(long)]
        lanes: Option<u32>,

        /// Laps to finish
        #[arg(long)]
        laps: Option<u32>,

        /// Number of AI cars
        #[arg(long, default_value_t = 4)]
        cars: u32,

        /// RNG seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Fixed timestep in milliseconds
        #[arg(long, default_value_t = 16.0)]
        dt: f32,

        /// Give up after this many ticks
        #[arg(long, default_value_t = 200_000)]
        max_ticks: u64,

        /// Settings JSON file (command-line flags override it)
        #[arg(long)]
        settings: Option<PathBuf>,
    }

    fn load_settings(cli: &Cli) -> Result<RaceSettings, Box<dyn std::error::Error>> {
        let mut settings = match &cli.settings {
            Some(path) => RaceSettings::from_json_or_default(&std::fs::read_to_string(path)?),
            None => RaceSettings::default(),
        };
        if let Some(track) = cli.track {
            settings.track_type = track;
        }
        if let Some(lanes) = cli.lanes {
            settings.lane_count = clamp_lane_count(lanes);
        }
        if let Some(laps) = cli.laps {
            settings.target_laps = laps;
        }
        Ok(settings)
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        env_logger::init();
        let cli = Cli::parse();

        let settings = load_settings(&cli)?;
        let configs: Vec<CarConfig> = (1..=cli.cars)
            .map(|n| CarConfig::ai(format!("cpu{n}"), n))
            .collect();

        let mut race = match cli.seed {
            Some(seed) => Race::with_seed(settings, &configs, seed)?,
            None => Race::new(settings, &configs)?,
        };
        log::info!(
            "Lane Racer (native) starting: seed={} track={}",
            race.seed,
            race.settings.track_type
        );

        let inputs = PlayerInputs::new();
        while !race.finished && race.tick_count < cli.max_ticks {
            race.tick(cli.dt, &inputs);
        }

        if !race.finished {
            log::warn!("Tick limit {} reached before every car finished", cli.max_ticks);
        }

        println!(
            "{} track, {} laps, {:.1}s simulated",
            race.settings.track_type,
            race.settings.target_laps,
            race.elapsed_ms / 1000.0
        );
        for car in race.standings() {
            println!(
                "{:>2}. #{:<3} {:<8} laps {} progress {:.3}{}",
                car.position.unwrap_or_default(),
                car.config.number,
                car.id(),
                car.laps_completed,
                car.track_progress,
                if car.finished { "  finished" } else { "" }
            );
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = native::run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `web::wasm_start`, this is just to satisfy the compiler
}
