//! Theme Controller
//!
//! Light/dark preference with persistence. Resolution order at startup:
//!
//! 1. a previously stored `"light"` or `"dark"`
//! 2. the system dark-mode preference
//! 3. light
//!
//! The resolved theme is applied and written back to storage as soon as the
//! controller is built. Later system preference changes are not observed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::store::{KeyValueStore, THEME_KEY};

/// Applied color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Glyph shown on toggle buttons
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Light => "☀",
            Self::Dark => "☾",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

/// Where a theme gets applied (the document root in a browser)
pub trait ThemeTarget {
    fn apply(&self, theme: Theme);
}

/// Headless front ends have nothing to repaint
impl ThemeTarget for () {
    fn apply(&self, _theme: Theme) {}
}

/// Resolve the startup theme from storage and the system preference
pub fn initial_theme<S: KeyValueStore>(store: &S, system_prefers_dark: bool) -> Theme {
    if let Some(stored) = store.get(THEME_KEY).and_then(|t| t.parse().ok()) {
        return stored;
    }
    if system_prefers_dark {
        Theme::Dark
    } else {
        Theme::Light
    }
}

/// Owns the current theme and keeps target and storage in sync
pub struct ThemeController<S, T> {
    store: S,
    target: T,
    current: Theme,
}

impl<S: KeyValueStore, T: ThemeTarget> ThemeController<S, T> {
    /// Resolve, apply and persist the startup theme
    pub fn init(store: S, target: T, system_prefers_dark: bool) -> Self {
        let current = initial_theme(&store, system_prefers_dark);
        let controller = Self {
            store,
            target,
            current,
        };
        controller.apply();
        controller
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Flip, apply and persist. Returns the new theme.
    pub fn toggle(&mut self) -> Theme {
        self.set(self.current.toggled())
    }

    pub fn set(&mut self, theme: Theme) -> Theme {
        self.current = theme;
        self.apply();
        self.current
    }

    fn apply(&self) {
        self.target.apply(self.current);
        if let Err(e) = self.store.set(THEME_KEY, self.current.as_str()) {
            tracing::warn!(theme = %self.current, error = %e, "Failed to persist theme");
        }
    }
}

/// Best-effort system dark mode detection for terminals
#[cfg(feature = "native")]
pub fn detect_system_dark_mode() -> bool {
    // GTK themes advertise dark variants as "Name:dark"
    if let Ok(theme) = std::env::var("GTK_THEME") {
        return theme.to_lowercase().contains("dark");
    }
    // rxvt-style "fg;bg"; low background indices are dark
    if let Ok(colors) = std::env::var("COLORFGBG") {
        if let Some(bg) = colors.rsplit(';').next().and_then(|b| b.parse::<u8>().ok()) {
            return bg < 7 || bg == 8;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Theme>>>);

    impl ThemeTarget for Recorder {
        fn apply(&self, theme: Theme) {
            self.0.borrow_mut().push(theme);
        }
    }

    #[test]
    fn test_stored_preference_wins() {
        let store = MemoryStore::with(THEME_KEY, "light");
        let controller = ThemeController::init(store, (), true);
        assert_eq!(controller.current(), Theme::Light);
    }

    #[test]
    fn test_system_preference_fallback() {
        let store = MemoryStore::new();
        let controller = ThemeController::init(store.clone(), (), true);

        assert_eq!(controller.current(), Theme::Dark);
        // Persisted at init
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn test_garbage_stored_value_ignored() {
        let store = MemoryStore::with(THEME_KEY, "solarized");
        assert_eq!(initial_theme(&store, false), Theme::Light);
        assert_eq!(initial_theme(&store, true), Theme::Dark);
    }

    #[test]
    fn test_init_applies_to_target() {
        let recorder = Recorder::default();
        let _controller = ThemeController::init(MemoryStore::new(), recorder.clone(), false);
        assert_eq!(*recorder.0.borrow(), vec![Theme::Light]);
    }

    #[test]
    fn test_toggle_twice_roundtrips() {
        for (stored, system) in [(None, false), (None, true), (Some("dark"), false)] {
            let store = match stored {
                Some(value) => MemoryStore::with(THEME_KEY, value),
                None => MemoryStore::new(),
            };
            let recorder = Recorder::default();
            let mut controller = ThemeController::init(store.clone(), recorder.clone(), system);
            let start = controller.current();

            let flipped = controller.toggle();
            assert_eq!(flipped, start.toggled());
            assert_eq!(store.get(THEME_KEY).as_deref(), Some(flipped.as_str()));

            let back = controller.toggle();
            assert_eq!(back, start);
            assert_eq!(store.get(THEME_KEY).as_deref(), Some(start.as_str()));
            assert_eq!(recorder.0.borrow().last(), Some(&start));
        }
    }
}
