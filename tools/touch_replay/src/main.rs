use std::{env, path::PathBuf, process};

use touch_replay::{
    check_expected, load_config, log_filter, read_expected, read_trace, replay, triggers,
    LOG_ENV,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Records from the `log` facade reach the subscriber through its log bridge.
fn init_logging() {
    let directives = env::var(LOG_ENV).ok();
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter(directives.as_deref()))
        .init();
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let mut trace_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut expect_path: Option<PathBuf> = None;

    let mut idx = 1usize;
    while idx < args.len() {
        match args[idx].as_str() {
            flag @ ("--config" | "--expect") => {
                idx += 1;
                let Some(path) = args.get(idx) else {
                    return Err(format!("missing path after {flag}"));
                };
                let slot = if flag == "--config" {
                    &mut config_path
                } else {
                    &mut expect_path
                };
                *slot = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                println!("{}", usage());
                return Ok(());
            }
            value if value.starts_with('-') => {
                return Err(format!("unknown argument: {value}"));
            }
            value => {
                if trace_path.is_some() {
                    return Err("multiple trace paths provided".into());
                }
                trace_path = Some(PathBuf::from(value));
            }
        }
        idx += 1;
    }

    let trace_path = trace_path.ok_or_else(usage)?;
    let config = load_config(config_path.as_deref())?;
    let frames = read_trace(&trace_path)?;
    log::info!(
        "replaying {} frames from {}",
        frames.len(),
        trace_path.display()
    );

    let records = replay(config, &frames);
    for record in &records {
        println!("{}", record.to_csv());
    }

    if let Some(expect_path) = expect_path {
        let expected = read_expected(&expect_path)?;
        check_expected(&triggers(&records), &expected)?;
    }

    Ok(())
}

fn usage() -> String {
    "usage: touch_replay <trace.csv> [--config sentio.toml] [--expect triggers.txt]".to_string()
}
