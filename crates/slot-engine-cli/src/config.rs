//! `slotfind` configuration file.
//!
//! Every key is optional. Values here sit below the request file and the
//! command-line flags.
//!
//! ```toml
//! weekdays = [1, 2, 3, 4, 5]
//! time_window = { start = "09:00", end = "18:00" }
//! shape = { mode = "fixed", minutes = 60 }
//! exclude_all_day_events = true
//! exclude_holidays = true
//!
//! [share]
//! format = "slack"
//! header = "Candidate dates"
//!
//! [holidays]
//! file = "holidays-jp-2026.toml"
//!
//! [holidays.dates]
//! "2026-12-28" = "Office closed"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use slot_engine::{HolidayCalendar, SlotShape, TimeWindow, WeekdaySet};

use crate::OutputFormat;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub weekdays: Option<WeekdaySet>,
    pub time_window: Option<TimeWindow>,
    pub shape: Option<SlotShape>,
    pub exclude_all_day_events: Option<bool>,
    pub exclude_holidays: Option<bool>,
    pub share: ShareConfig,
    pub holidays: HolidayConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShareConfig {
    pub format: Option<OutputFormat>,
    pub header: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HolidayConfig {
    /// Holiday table file. Relative paths resolve against the config file.
    pub file: Option<PathBuf>,
    /// Inline entries, added on top of `file`.
    pub dates: HolidayCalendar,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        if let (Some(file), Some(dir)) = (config.holidays.file.as_mut(), path.parent()) {
            if file.is_relative() {
                *file = dir.join(&*file);
            }
        }
        Ok(config)
    }

    /// The inline holidays plus the referenced holiday file, if any.
    pub fn holiday_calendar(&self) -> Result<HolidayCalendar> {
        let mut calendar = match &self.holidays.file {
            Some(file) => load_holiday_file(file)?,
            None => HolidayCalendar::new(),
        };
        calendar.extend(self.holidays.dates.clone());
        Ok(calendar)
    }
}

/// Read a holiday table: a flat TOML table of `"YYYY-MM-DD" = "name"`.
pub fn load_holiday_file(path: &Path) -> Result<HolidayCalendar> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read holiday file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse holiday file: {}", path.display()))
}
