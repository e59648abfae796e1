//! Flappy Dusk entry point
//!
//! Headless native host: loads settings and assets, then runs the autopilot
//! with the render pass on its own thread and prints a JSON run summary.
//!
//! Usage: `flappy-dusk [settings.json] [--ticks N] [--realtime]`

use std::error::Error;
use std::path::PathBuf;

use flappy_dusk::host::{Autopilot, RunOptions, Session, run_threaded};
use flappy_dusk::{DirAssets, Settings};

#[derive(Debug)]
struct Args {
    settings: PathBuf,
    ticks: Option<u64>,
    realtime: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args {
        settings: PathBuf::from("flappy-dusk.json"),
        ticks: None,
        realtime: false,
    };
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--ticks" => {
                let value = iter.next().ok_or("--ticks needs a value")?;
                parsed.ticks = Some(value.parse().map_err(|e| format!("--ticks {value}: {e}"))?);
            }
            "--realtime" => parsed.realtime = true,
            other if other.starts_with("--") => return Err(format!("unknown flag {other}")),
            path => parsed.settings = PathBuf::from(path),
        }
    }
    Ok(parsed)
}

/// Boot, run and encode the summary. Every failure here is fatal.
fn run(args: &Args) -> Result<String, Box<dyn Error>> {
    let settings = Settings::load(&args.settings)?;

    let assets = DirAssets::new(&settings.asset_root);
    let session = Session::boot(assets, &settings)?;
    let (w, h) = session.window_size();
    log::info!("Window {}x{}, viewport {:?}", w, h, session.viewport_size());

    let options = RunOptions {
        max_ticks: args.ticks,
        realtime: args.realtime,
        stop_when_ended: true,
    };
    let summary = run_threaded(session, &mut Autopilot::new(), options)?;
    Ok(serde_json::to_string_pretty(&summary)?)
}

fn main() {
    env_logger::init();
    log::info!("Flappy Dusk (headless) starting...");

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(2);
        }
    };

    match run(&args) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Fatal: {e}");
            std::process::exit(1);
        }
    }
}
