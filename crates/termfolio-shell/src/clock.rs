use chrono::{DateTime, FixedOffset, Local, Offset};
use chrono_tz::Tz;
use tracing::debug;

/// Source of "now" for the `date` command.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;

    /// Short zone name shown after the time. Defaults to a GMT offset label.
    fn zone_abbreviation(&self, at: &DateTime<FixedOffset>) -> String {
        offset_label(at.offset())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn zone_abbreviation(&self, at: &DateTime<FixedOffset>) -> String {
        local_zone_name()
            .and_then(|name| zone_abbreviation_in(&name, at))
            .unwrap_or_else(|| offset_label(at.offset()))
    }
}

/// IANA name of the local zone. `TZ` wins over the system setting, as it does
/// for `Local`.
fn local_zone_name() -> Option<String> {
    if let Ok(raw) = std::env::var("TZ") {
        let name = raw.trim_start_matches(':');
        if !name.is_empty() {
            return Some(name.to_string());
        }
    }
    match iana_time_zone::get_timezone() {
        Ok(name) => Some(name),
        Err(err) => {
            debug!(error = %err, "local time zone unavailable");
            None
        }
    }
}

/// Abbreviation of `name` at `at` (`PDT`, `CET`). `None` when the name is not
/// a known zone, its offset disagrees with `at`, or the zone only has a
/// numeric abbreviation such as `-03`.
pub(crate) fn zone_abbreviation_in(name: &str, at: &DateTime<FixedOffset>) -> Option<String> {
    let tz: Tz = name.parse().ok()?;
    let local = at.with_timezone(&tz);
    if local.offset().fix() != *at.offset() {
        return None;
    }
    let abbreviation = local.format("%Z").to_string();
    if abbreviation.is_empty() || abbreviation.starts_with(['+', '-']) {
        return None;
    }
    Some(abbreviation)
}

/// Clock pinned to one instant, with an explicit zone abbreviation.
#[derive(Debug, Clone)]
pub struct FixedClock {
    pub at: DateTime<FixedOffset>,
    pub zone: String,
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.at
    }

    fn zone_abbreviation(&self, _at: &DateTime<FixedOffset>) -> String {
        self.zone.clone()
    }
}

pub(crate) fn offset_label(offset: &FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    if seconds == 0 {
        return "UTC".to_string();
    }
    let sign = if seconds < 0 { '-' } else { '+' };
    let seconds = seconds.abs();
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if minutes == 0 {
        format!("GMT{sign}{hours}")
    } else {
        format!("GMT{sign}{hours}:{minutes:02}")
    }
}

/// `Sunday, October 18, 2026 at 02:05:09 PM PDT`
pub fn format_local_datetime(clock: &dyn Clock) -> String {
    let at = clock.now();
    format!(
        "{} {}",
        at.format("%A, %B %-d, %Y at %I:%M:%S %p"),
        clock.zone_abbreviation(&at)
    )
}
