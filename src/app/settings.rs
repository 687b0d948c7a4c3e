//! Startup settings: parse/write `settings.conf`.
//!
//! Holds the initial table layout (page size, sort) and the knobs of the mock
//! record store. Command-line flags override values read from the file.

use std::path::Path;
use std::time::Duration;

use crate::store::MockOptions;
use crate::view::{DEFAULT_PAGE_SIZE, SortColumn, SortDirection, ViewState};

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub page_size: usize,
    pub sort_column: SortColumn,
    pub sort_direction: SortDirection,
    /// Users generated on every (re)load.
    pub record_count: usize,
    pub latency_ms: u64,
    pub fail_rate: f64,
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            sort_column: SortColumn::Id,
            sort_direction: SortDirection::Asc,
            record_count: 100,
            latency_ms: 250,
            fail_rate: 0.0,
            seed: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`, writing the defaults there first if it does not exist.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let cfg = Self::default();
        if let Err(err) = cfg.write_file(path) {
            tracing::warn!(path = %path.display(), %err, "could not write default settings");
        }
        cfg
    }

    /// Parse `<key> = <value>` lines. Unknown keys and unparsable values keep the default.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut cfg = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            let (key, val) = (lhs.trim(), rhs.trim());
            match key {
                "page_size" => {
                    if let Ok(n) = val.parse::<usize>()
                        && n > 0
                    {
                        cfg.page_size = n;
                    }
                }
                "sort_column" => {
                    cfg.sort_column = SortColumn::parse(val).unwrap_or(cfg.sort_column);
                }
                "sort_direction" => {
                    cfg.sort_direction = SortDirection::parse(val).unwrap_or(cfg.sort_direction);
                }
                "record_count" => cfg.record_count = val.parse().unwrap_or(cfg.record_count),
                "latency_ms" => cfg.latency_ms = val.parse().unwrap_or(cfg.latency_ms),
                "fail_rate" => {
                    if let Ok(p) = val.parse::<f64>() {
                        cfg.fail_rate = p.clamp(0.0, 1.0);
                    }
                }
                "seed" => {
                    cfg.seed = match val {
                        "" | "none" | "None" => None,
                        v => v.parse().ok().or(cfg.seed),
                    };
                }
                _ => {}
            }
        }
        cfg
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# usertable settings\n");
        buf.push_str("# sort_column: id|name|email|registration_date|last_activity\n");
        buf.push_str("# sort_direction: asc|desc\n");
        let _ = writeln!(buf, "page_size = {}", self.page_size);
        let _ = writeln!(buf, "sort_column = {}", self.sort_column.as_str());
        let _ = writeln!(buf, "sort_direction = {}", self.sort_direction.as_str());
        buf.push_str("\n# mock record store\n");
        let _ = writeln!(buf, "record_count = {}", self.record_count);
        let _ = writeln!(buf, "latency_ms = {}", self.latency_ms);
        let _ = writeln!(buf, "fail_rate = {}", self.fail_rate);
        match self.seed {
            Some(seed) => {
                let _ = writeln!(buf, "seed = {seed}");
            }
            None => buf.push_str("seed = none\n"),
        }
        std::fs::write(path, buf)
    }

    /// Apply the initial page size and sort to a fresh view.
    pub fn apply_to(&self, view: &mut ViewState) {
        view.set_page_size(self.page_size);
        view.set_sort(self.sort_column, self.sort_direction);
    }

    pub fn mock_options(&self) -> MockOptions {
        MockOptions {
            record_count: self.record_count,
            latency: Duration::from_millis(self.latency_ms),
            fail_rate: self.fail_rate,
            seed: self.seed,
        }
    }
}
