// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, ObserverSpec, RawConfigFile};
use crate::errors::{PollwatchError, Result};
use crate::filter::build_globset;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = PollwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_observers(&raw)?;
        let interval = validate_interval(&raw.monitor.interval)?;
        let observers = resolve_observers(&raw)?;
        Ok(ConfigFile::new_unchecked(interval, observers))
    }
}

fn ensure_has_observers(cfg: &RawConfigFile) -> Result<()> {
    if cfg.observer.is_empty() {
        return Err(PollwatchError::ConfigError(
            "config must contain at least one [observer.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_interval(raw: &str) -> Result<Duration> {
    let interval = parse_duration(raw).map_err(|e| {
        PollwatchError::ConfigError(format!("[monitor].interval '{raw}' is invalid: {e}"))
    })?;
    if interval.is_zero() {
        return Err(PollwatchError::ConfigError(format!(
            "[monitor].interval must be greater than zero (got '{raw}')"
        )));
    }
    Ok(interval)
}

fn resolve_observers(cfg: &RawConfigFile) -> Result<Vec<ObserverSpec>> {
    let defaults = &cfg.default;
    let mut specs = Vec::with_capacity(cfg.observer.len());

    for (name, section) in cfg.observer.iter() {
        if section.path.trim().is_empty() {
            return Err(PollwatchError::ConfigError(format!(
                "observer '{name}' has an empty `path`"
            )));
        }

        let include = effective_patterns(
            section.include.as_ref(),
            &defaults.include,
            section.append_default_include,
        );
        let exclude = effective_patterns(
            section.exclude.as_ref(),
            &defaults.exclude,
            section.append_default_exclude,
        );
        let case_sensitivity = section
            .case_sensitivity
            .unwrap_or(defaults.case_sensitivity);

        build_globset(&include, case_sensitivity).map_err(|e| observer_error(name, e))?;
        build_globset(&exclude, case_sensitivity).map_err(|e| observer_error(name, e))?;

        specs.push(ObserverSpec {
            name: name.clone(),
            path: section.path.clone().into(),
            include,
            exclude,
            case_sensitivity,
            ignore_hidden: section.ignore_hidden.unwrap_or(defaults.ignore_hidden),
        });
    }

    Ok(specs)
}

fn observer_error(name: &str, err: PollwatchError) -> PollwatchError {
    PollwatchError::ConfigError(format!("observer '{name}': {err}"))
}

/// Merge an observer's pattern list with the default list.
///
/// - `append_default = true`: observer list followed by the default list.
/// - Else, if the observer has a list, only that list.
/// - Else, the default list.
fn effective_patterns(
    own: Option<&Vec<String>>,
    default_list: &[String],
    append_default: bool,
) -> Vec<String> {
    match (own, append_default) {
        (Some(list), true) => {
            let mut combined = list.clone();
            combined.extend(default_list.iter().cloned());
            combined
        }
        (Some(list), false) => list.clone(),
        (None, _) => default_list.to_vec(),
    }
}

/// Parse `"250ms"`, `"3s"`, `"2m"` or `"1h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{num_part}': {e}"))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value.saturating_mul(60))),
        "h" => Ok(Duration::from_secs(value.saturating_mul(60 * 60))),
        _ => Err(format!(
            "unsupported duration unit '{unit}'; expected ms, s, m, or h"
        )),
    }
}
