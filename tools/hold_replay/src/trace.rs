use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::{bail, Context, Result};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReplayInput {
    Press { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Release,
    Disable,
    Tick,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReplayStep {
    pub ms: u64,
    pub input: ReplayInput,
}

pub const TRACE_HEADER: &str = "kind,ms,x,y";

pub fn read_trace(path: &Path) -> Result<Vec<ReplayStep>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut steps: Vec<ReplayStep> = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line =
            line_result.with_context(|| format!("failed to read {}:{line_no}", path.display()))?;
        let Some(step) = parse_line(&line)
            .with_context(|| format!("{}:{line_no} invalid trace line", path.display()))?
        else {
            continue;
        };
        if let Some(prev) = steps.last() {
            if step.ms < prev.ms {
                bail!(
                    "{}:{line_no} timestamp {} goes backwards (previous {})",
                    path.display(),
                    step.ms,
                    prev.ms
                );
            }
        }
        steps.push(step);
    }

    Ok(steps)
}

/// `None` for blank lines, comments and the header.
pub fn parse_line(line: &str) -> Result<Option<ReplayStep>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == TRACE_HEADER {
        return Ok(None);
    }

    let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
    let ms = parse_field::<u64>(&parts, 1, "ms")?;
    let input = match parts[0].to_ascii_lowercase().as_str() {
        "press" => ReplayInput::Press {
            x: parse_field(&parts, 2, "x")?,
            y: parse_field(&parts, 3, "y")?,
        },
        "move" => ReplayInput::Move {
            x: parse_field(&parts, 2, "x")?,
            y: parse_field(&parts, 3, "y")?,
        },
        "release" => ReplayInput::Release,
        "disable" => ReplayInput::Disable,
        "tick" => ReplayInput::Tick,
        other => bail!("unknown input kind `{other}`"),
    };

    Ok(Some(ReplayStep { ms, input }))
}

fn parse_field<T>(parts: &[&str], idx: usize, field: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Some(raw) = parts.get(idx) else {
        bail!("missing {field} column");
    };
    raw.parse::<T>()
        .with_context(|| format!("invalid {field} '{raw}'"))
}

pub fn read_expected_kinds(path: &Path) -> Result<Vec<&'static str>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut kinds = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line =
            line_result.with_context(|| format!("failed to read {}:{line_no}", path.display()))?;
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }
        let Some(kind) = normalize_kind(token) else {
            bail!(
                "{}:{line_no} invalid expected notification kind: {token}",
                path.display()
            );
        };
        kinds.push(kind);
    }

    Ok(kinds)
}

fn normalize_kind(kind: &str) -> Option<&'static str> {
    match kind.trim().to_ascii_lowercase().as_str() {
        "start" => Some("start"),
        "release" => Some("release"),
        _ => None,
    }
}
