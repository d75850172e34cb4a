use std::{fs, path::Path};

use sentio::{CalibratedPoint, FrameDispatcher, RawSample, SentioConfig, TriggerKind};
use tracing_subscriber::EnvFilter;

/// Extra tick after the last trace line so a trailing contact gets released.
pub const TAIL_MS: u32 = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayFrame {
    pub ms: u32,
    pub sample: Option<RawSample>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayRecord {
    Trigger { ms: u32, kind: TriggerKind },
    Output { ms: u32, point: CalibratedPoint },
}

impl ReplayRecord {
    pub fn to_csv(&self) -> String {
        match self {
            Self::Trigger { ms, kind } => format!("trigger,{ms},{}", kind_label(*kind)),
            Self::Output { ms, point } => format!("output,{ms},{},{}", point.x, point.y),
        }
    }
}

/// Environment variable holding env-filter directives (`debug`, `sentio=trace`).
pub const LOG_ENV: &str = "SENTIO_LOG";

/// Stderr log filter; unset or malformed directives fall back to `warn`.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

pub fn default_config() -> SentioConfig {
    SentioConfig::new(600, 600)
}

pub fn parse_config(text: &str) -> Result<SentioConfig, String> {
    let config: SentioConfig = toml::from_str(text).map_err(|e| e.to_string())?;
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

pub fn load_config(path: Option<&Path>) -> Result<SentioConfig, String> {
    let Some(path) = path else {
        return Ok(default_config());
    };
    let text = read(path)?;
    parse_config(&text).map_err(|e| format!("{}: {e}", path.display()))
}

pub fn read_trace(path: &Path) -> Result<Vec<ReplayFrame>, String> {
    let text = read(path)?;
    parse_trace(&text).map_err(|e| format!("{}:{e}", path.display()))
}

/// Parses `touch_trace,ms,count,x,y[,pressure[,id]]` lines.
pub fn parse_trace(text: &str) -> Result<Vec<ReplayFrame>, String> {
    let mut out = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line_no = line_no + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if parts[0] != "touch_trace" || parts.get(1) == Some(&"ms") {
            continue;
        }
        if parts.len() < 5 {
            return Err(format!(
                "{line_no} invalid trace line, expected at least 5 columns"
            ));
        }

        let ms = parse_field::<u32>(parts[1], line_no, "ms")?;
        let count = parse_field::<u8>(parts[2], line_no, "count")?;
        let sample = if count == 0 {
            None
        } else {
            Some(RawSample {
                x: parse_field(parts[3], line_no, "x")?,
                y: parse_field(parts[4], line_no, "y")?,
                pressure: match parts.get(5) {
                    Some(raw) => parse_field(raw, line_no, "pressure")?,
                    None => 0,
                },
                id: match parts.get(6) {
                    Some(raw) => parse_field(raw, line_no, "id")?,
                    None => 0,
                },
            })
        };
        out.push(ReplayFrame { ms, sample });
    }
    Ok(out)
}

/// Runs `frames` through a fresh dispatcher and collects everything it emitted.
pub fn replay(config: SentioConfig, frames: &[ReplayFrame]) -> Vec<ReplayRecord> {
    let start_ms = frames.first().map_or(0, |frame| frame.ms);
    let mut dispatcher: FrameDispatcher<Option<RawSample>> =
        FrameDispatcher::with_source(config, None, start_ms);
    let tail = frames.last().map(|frame| ReplayFrame {
        ms: frame.ms.wrapping_add(TAIL_MS),
        sample: None,
    });

    let mut records = Vec::new();
    for frame in frames.iter().chain(tail.iter()) {
        if let Some(slot) = dispatcher.source_mut() {
            *slot = frame.sample;
        }
        let trace = dispatcher.tick(frame.ms, &mut (), &mut ());
        records.extend(trace.triggers().map(|kind| ReplayRecord::Trigger {
            ms: frame.ms,
            kind,
        }));
        if let Some(point) = trace.forwarded() {
            records.push(ReplayRecord::Output {
                ms: frame.ms,
                point,
            });
        }
    }
    records
}

pub fn triggers(records: &[ReplayRecord]) -> Vec<TriggerKind> {
    records
        .iter()
        .filter_map(|record| match record {
            ReplayRecord::Trigger { kind, .. } => Some(*kind),
            ReplayRecord::Output { .. } => None,
        })
        .collect()
}

pub fn read_expected(path: &Path) -> Result<Vec<TriggerKind>, String> {
    let text = read(path)?;
    parse_expected(&text).map_err(|e| format!("{}:{e}", path.display()))
}

pub fn parse_expected(text: &str) -> Result<Vec<TriggerKind>, String> {
    let mut kinds = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }
        let kind = parse_kind(token)
            .ok_or_else(|| format!("{} invalid expected trigger kind: {token}", line_no + 1))?;
        kinds.push(kind);
    }
    Ok(kinds)
}

pub fn check_expected(actual: &[TriggerKind], expected: &[TriggerKind]) -> Result<(), String> {
    if actual == expected {
        return Ok(());
    }
    Err(format!(
        "trigger sequence mismatch\nexpected: {}\nactual:   {}",
        join_labels(expected),
        join_labels(actual)
    ))
}

pub fn kind_label(kind: TriggerKind) -> &'static str {
    match kind {
        TriggerKind::Sleep => "sleep",
        TriggerKind::Wake => "wake",
        TriggerKind::Tap => "tap",
        TriggerKind::SwipeLeft => "swipe_left",
        TriggerKind::SwipeRight => "swipe_right",
    }
}

/// Accepts both the short labels and the `on_*` handler names.
pub fn parse_kind(token: &str) -> Option<TriggerKind> {
    let token = token.trim().to_ascii_lowercase();
    TriggerKind::from_name(&token).or_else(|| {
        TriggerKind::ALL
            .into_iter()
            .find(|kind| kind_label(*kind) == token)
    })
}

fn join_labels(kinds: &[TriggerKind]) -> String {
    kinds
        .iter()
        .map(|kind| kind_label(*kind))
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_field<T>(raw: &str, line_no: usize, field: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| format!("{line_no} invalid {field} '{raw}': {e}"))
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))
}
