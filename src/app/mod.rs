//! Application state types and entry glue.
//!
//! Defines enums and structs that model the TUI state, the config-file
//! locations, and re-exports the application loop as `run`.
//!
pub mod keymap;
pub mod ops;
pub mod settings;
pub mod update;

use ratatui::style::Color;
use ratatui::widgets::TableState;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Instant;

use crate::form::DraftForm;
use crate::format::BadgeStyle;
use crate::model::UserRecord;
use crate::store::RecordStore;
use crate::view::{Rows, ViewState};

pub use keymap::{KeyAction, Keymap};
pub use ops::PendingOp;
pub use settings::Settings;

/// Directory name under the XDG config home.
pub const APP_DIR: &str = "usertable";

/// Resolve the config directory: explicit override, `$XDG_CONFIG_HOME/usertable`,
/// `$HOME/.config/usertable`, else the working directory.
pub fn config_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join(APP_DIR);
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".config").join(APP_DIR);
    }
    PathBuf::from(".")
}

/// A config file in the working directory wins over the one in `dir`.
pub fn config_file_read_path(dir: &Path, name: &str) -> PathBuf {
    let local = PathBuf::from(name);
    if local.is_file() { local } else { dir.join(name) }
}

/// Theme, keybindings and settings loaded together at startup.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub theme: Theme,
    pub keymap: Keymap,
    pub settings: Settings,
}

impl Config {
    /// Read every config file from `dir`, creating missing ones with defaults.
    pub fn load(dir: &Path) -> Self {
        if let Err(err) = std::fs::create_dir_all(dir) {
            tracing::warn!(dir = %dir.display(), %err, "could not create config directory");
        }
        let theme = Theme::load_or_init(&config_file_read_path(dir, "theme.conf"));
        let keymap = Keymap::load_or_init(&config_file_read_path(dir, "keybinds.conf"));
        let settings = Settings::load_or_init(&config_file_read_path(dir, "settings.conf"));
        tracing::debug!(dir = %dir.display(), "configuration loaded");
        Self {
            theme,
            keymap,
            settings,
        }
    }
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the search prompt; the query applies live.
    Search,
    /// Inline editing of one table row.
    Edit(EditFocus),
    Modal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EditFocus {
    Name,
    Email,
    Role,
}

impl EditFocus {
    pub fn next(self) -> Self {
        match self {
            EditFocus::Name => EditFocus::Email,
            EditFocus::Email => EditFocus::Role,
            EditFocus::Role => EditFocus::Name,
        }
    }
}

/// Focused control of the "new user" dialog.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AddUserField {
    Name,
    Email,
    Role,
    WelcomeEmail,
    Submit,
}

impl AddUserField {
    pub fn next(self) -> Self {
        match self {
            AddUserField::Name => AddUserField::Email,
            AddUserField::Email => AddUserField::Role,
            AddUserField::Role => AddUserField::WelcomeEmail,
            AddUserField::WelcomeEmail => AddUserField::Submit,
            AddUserField::Submit => AddUserField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            AddUserField::Name => AddUserField::Submit,
            AddUserField::Email => AddUserField::Name,
            AddUserField::Role => AddUserField::Email,
            AddUserField::WelcomeEmail => AddUserField::Role,
            AddUserField::Submit => AddUserField::WelcomeEmail,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DateField {
    From,
    To,
}

/// Entries of the filter menu, in display order.
pub const FILTER_MENU_ITEMS: [&str; 6] = [
    "Role",
    "Status",
    "Registered from",
    "Registered to",
    "Clear dates",
    "Clear all filters",
];

/// Modal dialog states.
#[derive(Clone, Debug)]
pub enum ModalState {
    FilterMenu {
        selected: usize,
    },
    DateInput {
        field: DateField,
        value: String,
        error: Option<String>,
    },
    AddUser {
        focus: AddUserField,
    },
    Details {
        record: Rc<UserRecord>,
    },
    DeleteConfirm {
        ids: Vec<u32>,
        selected: usize,
    },
    Info {
        message: String,
    },
    Help {
        scroll: u16,
    },
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
}

impl Theme {
    /// Dark default theme.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            positive: Color::Green,
            negative: Color::Red,
            warning: Color::Yellow,
            neutral: Color::Blue,
        }
    }

    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            positive: Color::Rgb(0xa6, 0xe3, 0xa1),     // green
            negative: Color::Rgb(0xf3, 0x8b, 0xa8),     // red
            warning: Color::Rgb(0xfa, 0xb3, 0x87),      // peach
            neutral: Color::Rgb(0x89, 0xb4, 0xfa),      // blue
        }
    }

    pub fn badge(&self, style: BadgeStyle) -> Color {
        match style {
            BadgeStyle::Neutral => self.neutral,
            BadgeStyle::Positive => self.positive,
            BadgeStyle::Warning => self.warning,
            BadgeStyle::Negative => self.negative,
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut theme = Self::mocha();
        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            let Some(color) = parse_color(val) else {
                continue;
            };
            if let Some(slot) = theme.slot_mut(key.trim()) {
                *slot = color;
            }
        }
        theme
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Color> {
        Some(match key {
            "text" => &mut self.text,
            "muted" => &mut self.muted,
            "title" => &mut self.title,
            "border" => &mut self.border,
            "header_bg" => &mut self.header_bg,
            "header_fg" => &mut self.header_fg,
            "status_bg" => &mut self.status_bg,
            "status_fg" => &mut self.status_fg,
            "highlight_fg" => &mut self.highlight_fg,
            "highlight_bg" => &mut self.highlight_bg,
            "positive" => &mut self.positive,
            "negative" => &mut self.negative,
            "warning" => &mut self.warning,
            "neutral" => &mut self.neutral,
            _ => return None,
        })
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# usertable theme configuration\n");
        buf.push_str("# Colors: #RRGGBB, a color name (red, darkgray, ...), an index 0-255, or 'reset'\n\n");
        let entries = [
            ("text", self.text),
            ("muted", self.muted),
            ("title", self.title),
            ("border", self.border),
            ("header_bg", self.header_bg),
            ("header_fg", self.header_fg),
            ("status_bg", self.status_bg),
            ("status_fg", self.status_fg),
            ("highlight_fg", self.highlight_fg),
            ("highlight_bg", self.highlight_bg),
            ("positive", self.positive),
            ("negative", self.negative),
            ("warning", self.warning),
            ("neutral", self.neutral),
        ];
        for (k, v) in entries {
            let _ = writeln!(&mut buf, "{k} = {v}");
        }
        std::fs::write(path, buf)
    }

    /// Load the theme at `path`, writing `mocha` there first if it does not exist.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(err) = t.write_file(path) {
            tracing::warn!(path = %path.display(), %err, "could not write default theme");
        }
        t
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

/// ratatui's color names, `#RRGGBB` and indices, plus bare `RRGGBB`.
fn parse_color(s: &str) -> Option<Color> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    if let Ok(color) = t.parse::<Color>() {
        return Some(color);
    }
    if t.len() == 6 && t.chars().all(|c| c.is_ascii_hexdigit()) {
        return format!("#{t}").parse().ok();
    }
    None
}

pub struct AppState {
    pub started_at: Instant,
    pub view: ViewState,
    pub form: DraftForm,
    pub store: Box<dyn RecordStore>,
    pub is_loading: bool,
    pub is_saving: bool,
    /// Last store failure, replaced by the next one and cleared when a load starts.
    pub error: Option<String>,
    pub pending: Option<PendingOp>,
    /// Row index within the current page.
    pub cursor: usize,
    pub table_state: TableState,
    pub input_mode: InputMode,
    pub modal: Option<ModalState>,
    pub theme: Theme,
    pub keymap: Keymap,
}

impl AppState {
    pub fn new(store: Box<dyn RecordStore>, config: Config) -> Self {
        let mut view = ViewState::new(config.settings.page_size);
        config.settings.apply_to(&mut view);
        Self {
            started_at: Instant::now(),
            view,
            form: DraftForm::default(),
            store,
            is_loading: false,
            is_saving: false,
            error: None,
            pending: None,
            cursor: 0,
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
            modal: None,
            theme: config.theme,
            keymap: config.keymap,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.is_loading || self.is_saving || self.pending.is_some()
    }

    /// Queue a store operation for the event loop and raise its flag.
    /// Rejected while another operation is in flight.
    pub fn queue(&mut self, op: PendingOp) -> bool {
        if self.is_busy() {
            tracing::debug!(?op, "store busy, operation rejected");
            return false;
        }
        if matches!(op, PendingOp::Load) {
            self.is_loading = true;
            self.error = None;
        } else {
            self.is_saving = true;
        }
        self.pending = Some(op);
        true
    }

    pub fn page_rows(&self) -> Rc<Rows> {
        self.view.paginated()
    }

    pub fn cursor_record(&self) -> Option<Rc<UserRecord>> {
        self.page_rows().get(self.cursor).cloned()
    }

    /// Keep the cursor on an existing row of the current page.
    pub fn clamp_cursor(&mut self) {
        let len = self.page_rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn open_modal(&mut self, modal: ModalState) {
        self.modal = Some(modal);
        self.input_mode = InputMode::Modal;
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_color_accepts_hex_names_and_indices() {
        assert_eq!(parse_color("#FF0000"), Some(Color::Rgb(0xff, 0, 0)));
        assert_eq!(parse_color("00ff00"), Some(Color::Rgb(0, 0xff, 0)));
        assert_eq!(parse_color("reset"), Some(Color::Reset));
        assert_eq!(parse_color("red"), Some(Color::Red));
        assert_eq!(parse_color("42"), Some(Color::Indexed(42)));
        assert_eq!(parse_color("not a color"), None);
    }

    #[test]
    fn theme_parse_overrides_and_keeps_defaults() {
        let t = Theme::parse("positive = #010203\nunknown = #FFFFFF\ntitle = nope\n");
        assert_eq!(t.positive, Color::Rgb(1, 2, 3));
        assert_eq!(t.title, Theme::mocha().title);
        assert_eq!(t.badge(BadgeStyle::Positive), Color::Rgb(1, 2, 3));
    }

    #[test]
    fn config_dir_prefers_override() {
        let dir = config_dir(Some(Path::new("/tmp/somewhere")));
        assert_eq!(dir, PathBuf::from("/tmp/somewhere"));
    }

    #[test]
    fn edit_focus_cycles() {
        assert_eq!(EditFocus::Role.next(), EditFocus::Name);
        assert_eq!(AddUserField::Name.prev(), AddUserField::Submit);
        assert_eq!(AddUserField::Submit.next(), AddUserField::Name);
    }
}
