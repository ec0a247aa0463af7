mod cli;

use anyhow::Context;
use env_logger::Env;
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};

fn setup_logging(level: &str) {
    let env = Env::default().filter_or("RUST_LOG", match level {
        "essential" => "info",
        "debug" => "debug",
        "trace" => "trace",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    });
    env_logger::Builder::from_env(env).init();
}

fn read_input(path: Option<&str>) -> anyhow::Result<String> {
    let mut text = String::new();
    match path {
        Some(p) => {
            File::open(p)
                .and_then(|mut f| f.read_to_string(&mut text))
                .with_context(|| format!("reading input {}", p))?;
        }
        None => {
            io::stdin().lock().read_to_string(&mut text).context("reading input <stdin>")?;
        }
    }
    Ok(text)
}

fn open_output(path: Option<&str>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => {
            let f = File::create(p).with_context(|| format!("creating output {}", p))?;
            Box::new(BufWriter::new(f))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn main() -> anyhow::Result<()> {
    let args = cli::parse_cli();
    setup_logging(&args.log_level);

    let boundary = args.boundary()?;
    let options = args.gpx_options();
    let in_path = cli::as_path(&args.infile);
    let out_path = cli::as_path(&args.outfile);
    info!("Reading {} ({:?})", in_path.unwrap_or("<stdin>"), boundary);

    let text = read_input(in_path)?;
    let out = open_output(out_path)?;
    let summary = wod2gpx::convert(&text, &boundary, &options, out)
        .with_context(|| format!("writing GPX to {}", out_path.unwrap_or("<stdout>")))?;

    info!("Done: {} records, {} waypoints", summary.records, summary.waypoints);
    Ok(())
}
