//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Only normal-mode keys go through the keymap. Text input (search, inline
//! edit, dialogs) reads raw keys.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::path::Path;

/// Semantic keyboard actions that can be bound to key combinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Quit,
    OpenHelp,
    /// Focus the search prompt.
    StartSearch,
    OpenFilterMenu,
    /// Reset search, role, status and date filters.
    ClearFilters,
    NewUser,
    /// Inline-edit the row under the cursor.
    EditUser,
    ToggleStatus,
    /// Delete the row under the cursor.
    DeleteUser,
    /// Delete every selected user.
    DeleteSelection,
    ToggleSelect,
    ToggleSelectAll,
    OpenDetails,
    MoveUp,
    MoveDown,
    PrevPage,
    NextPage,
    FirstPage,
    LastPage,
    CyclePageSize,
    SortById,
    SortByName,
    SortByEmail,
    SortByRegistered,
    SortByLastActivity,
    Reload,
    Ignore,
}

impl KeyAction {
    pub const ALL: [KeyAction; 27] = [
        KeyAction::Quit,
        KeyAction::OpenHelp,
        KeyAction::StartSearch,
        KeyAction::OpenFilterMenu,
        KeyAction::ClearFilters,
        KeyAction::NewUser,
        KeyAction::EditUser,
        KeyAction::ToggleStatus,
        KeyAction::DeleteUser,
        KeyAction::DeleteSelection,
        KeyAction::ToggleSelect,
        KeyAction::ToggleSelectAll,
        KeyAction::OpenDetails,
        KeyAction::MoveUp,
        KeyAction::MoveDown,
        KeyAction::PrevPage,
        KeyAction::NextPage,
        KeyAction::FirstPage,
        KeyAction::LastPage,
        KeyAction::CyclePageSize,
        KeyAction::SortById,
        KeyAction::SortByName,
        KeyAction::SortByEmail,
        KeyAction::SortByRegistered,
        KeyAction::SortByLastActivity,
        KeyAction::Reload,
        KeyAction::Ignore,
    ];
}

/// Mapping from `(KeyModifiers, KeyCode)` pairs to [`KeyAction`]s.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Arrow keys plus vim-style hjkl for navigation, single letters for actions.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Char('f')), KeyAction::OpenFilterMenu);
        bindings.insert((M::NONE, Char('c')), KeyAction::ClearFilters);
        bindings.insert((M::NONE, Char('n')), KeyAction::NewUser);
        bindings.insert((M::NONE, Char('e')), KeyAction::EditUser);
        bindings.insert((M::NONE, Char('t')), KeyAction::ToggleStatus);
        bindings.insert((M::NONE, Delete), KeyAction::DeleteUser);
        // Terminals disagree on whether Shift is reported with an uppercase char
        bindings.insert((M::NONE, Char('D')), KeyAction::DeleteSelection);
        bindings.insert((M::SHIFT, Char('D')), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Char(' ')), KeyAction::ToggleSelect);
        bindings.insert((M::NONE, Char('a')), KeyAction::ToggleSelectAll);
        bindings.insert((M::NONE, Enter), KeyAction::OpenDetails);
        // Navigation
        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Left), KeyAction::PrevPage);
        bindings.insert((M::NONE, Right), KeyAction::NextPage);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('h')), KeyAction::PrevPage);
        bindings.insert((M::NONE, Char('l')), KeyAction::NextPage);
        bindings.insert((M::NONE, PageUp), KeyAction::PrevPage);
        bindings.insert((M::NONE, PageDown), KeyAction::NextPage);
        bindings.insert((M::NONE, Home), KeyAction::FirstPage);
        bindings.insert((M::NONE, End), KeyAction::LastPage);
        bindings.insert((M::NONE, Char('p')), KeyAction::CyclePageSize);
        // Sorting
        bindings.insert((M::NONE, Char('1')), KeyAction::SortById);
        bindings.insert((M::NONE, Char('2')), KeyAction::SortByName);
        bindings.insert((M::NONE, Char('3')), KeyAction::SortByEmail);
        bindings.insert((M::NONE, Char('4')), KeyAction::SortByRegistered);
        bindings.insert((M::NONE, Char('5')), KeyAction::SortByLastActivity);
        bindings.insert((M::NONE, Char('r')), KeyAction::Reload);
        Self { bindings }
    }

    /// Load a keymap from `path`, writing the defaults there first if it does not exist.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(err) = km.write_file(path) {
            tracing::warn!(path = %path.display(), %err, "could not write default keybindings");
        }
        km
    }

    /// Start from defaults and override with `<Action> = <KeySpec>` lines.
    /// The reversed `<KeySpec> = <Action>` form is accepted too.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            let (lhs, rhs) = (lhs.trim(), rhs.trim());
            if lhs.is_empty() || rhs.is_empty() {
                continue;
            }
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
                continue;
            }
            if let (Some(key), Some(action)) = (parse_key(lhs), parse_action(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        map
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# usertable keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+q, Shift+D, Enter, Esc, Space, Up, Home, PageDown, Delete, /\n\n");

        let mut lines: Vec<(String, String)> = self
            .bindings
            .iter()
            .map(|((mods, code), action)| {
                (format_action(*action).to_string(), Self::format_key(*mods, *code))
            })
            .collect();
        lines.sort();
        for (action, key) in lines {
            let _ = writeln!(&mut buf, "{action} = {key}");
        }
        std::fs::write(path, buf)
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    pub fn all_bindings(&self) -> Vec<((KeyModifiers, KeyCode), KeyAction)> {
        self.bindings.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Human-readable keys bound to `action`, sorted, for the help screen.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((mods, code), _)| Self::format_key(*mods, *code))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Format a key into a spec like `Ctrl+q`, `Shift+D` or `Space`.
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Char(' ') => "Space".to_string(),
            Char(c) => c.to_string(),
            F(n) => format!("F{n}"),
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Backspace => "Backspace".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            Home => "Home".to_string(),
            End => "End".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            other => format!("{other:?}"),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{base}")
        } else if mods.contains(KeyModifiers::SHIFT) {
            format!("Shift+{base}")
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let mut rest = spec.trim();
    let mut mods = KeyModifiers::NONE;
    loop {
        if let Some(after) = rest.strip_prefix("Ctrl+") {
            mods |= KeyModifiers::CONTROL;
            rest = after;
        } else if let Some(after) = rest.strip_prefix("Shift+") {
            mods |= KeyModifiers::SHIFT;
            rest = after;
        } else {
            break;
        }
    }
    let code = match rest {
        "Enter" => Enter,
        "Delete" | "Del" => Delete,
        "Backspace" => Backspace,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Space" => Char(' '),
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "Home" => Home,
        "End" => End,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                (Some('F'), Some(_)) => F(rest[1..].parse().ok()?),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    KeyAction::ALL
        .into_iter()
        .find(|a| format_action(*a) == s.trim())
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::OpenHelp => "OpenHelp",
        KeyAction::StartSearch => "StartSearch",
        KeyAction::OpenFilterMenu => "OpenFilterMenu",
        KeyAction::ClearFilters => "ClearFilters",
        KeyAction::NewUser => "NewUser",
        KeyAction::EditUser => "EditUser",
        KeyAction::ToggleStatus => "ToggleStatus",
        KeyAction::DeleteUser => "DeleteUser",
        KeyAction::DeleteSelection => "DeleteSelection",
        KeyAction::ToggleSelect => "ToggleSelect",
        KeyAction::ToggleSelectAll => "ToggleSelectAll",
        KeyAction::OpenDetails => "OpenDetails",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::PrevPage => "PrevPage",
        KeyAction::NextPage => "NextPage",
        KeyAction::FirstPage => "FirstPage",
        KeyAction::LastPage => "LastPage",
        KeyAction::CyclePageSize => "CyclePageSize",
        KeyAction::SortById => "SortById",
        KeyAction::SortByName => "SortByName",
        KeyAction::SortByEmail => "SortByEmail",
        KeyAction::SortByRegistered => "SortByRegistered",
        KeyAction::SortByLastActivity => "SortByLastActivity",
        KeyAction::Reload => "Reload",
        KeyAction::Ignore => "Ignore",
    }
}

/// One-line description shown next to the keys on the help screen.
pub fn describe_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::OpenHelp => "Show this help",
        KeyAction::StartSearch => "Search by name or email",
        KeyAction::OpenFilterMenu => "Filter by role, status or registration date",
        KeyAction::ClearFilters => "Clear all filters",
        KeyAction::NewUser => "Add a user",
        KeyAction::EditUser => "Edit the highlighted user",
        KeyAction::ToggleStatus => "Activate / deactivate",
        KeyAction::DeleteUser => "Delete the highlighted user",
        KeyAction::DeleteSelection => "Delete selected users",
        KeyAction::ToggleSelect => "Select / unselect row",
        KeyAction::ToggleSelectAll => "Select / unselect page",
        KeyAction::OpenDetails => "Show details",
        KeyAction::MoveUp => "Move up",
        KeyAction::MoveDown => "Move down",
        KeyAction::PrevPage => "Previous page",
        KeyAction::NextPage => "Next page",
        KeyAction::FirstPage => "First page",
        KeyAction::LastPage => "Last page",
        KeyAction::CyclePageSize => "Cycle page size",
        KeyAction::SortById => "Sort by id",
        KeyAction::SortByName => "Sort by name",
        KeyAction::SortByEmail => "Sort by email",
        KeyAction::SortByRegistered => "Sort by registration date",
        KeyAction::SortByLastActivity => "Sort by last activity",
        KeyAction::Reload => "Reload from the store",
        KeyAction::Ignore => "Nothing",
    }
}
