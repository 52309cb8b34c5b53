use std::collections::{HashMap, HashSet};

/// A managed window: position and size, all in pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// Left edge.
    pub x:      i64,
    /// Top edge.
    pub y:      i64,
    /// Width.
    pub width:  i64,
    /// Height.
    pub height: i64,
}

/// The window registry.
///
/// Scripts address windows by title. The host seeds this registry before
/// running a script; `MOVE WINDOW`, `FOCUS WINDOW` and `WINDOW ... EXISTS`
/// operate on it.
#[derive(Debug, Default)]
pub struct WindowManager {
    windows: HashMap<String, Window>,
    focused: Option<String>,
}

impl WindowManager {
    /// Registers a window at the origin.
    pub fn create_window(&mut self, title: &str, width: i64, height: i64) {
        self.windows.insert(title.to_string(),
                            Window { x: 0,
                                     y: 0,
                                     width,
                                     height });
    }

    /// Whether a window with this title exists.
    #[must_use]
    pub fn exists(&self, title: &str) -> bool {
        self.windows.contains_key(title)
    }

    /// Focuses the window. Returns `false` if it does not exist.
    pub fn focus(&mut self, title: &str) -> bool {
        if self.windows.contains_key(title) {
            self.focused = Some(title.to_string());
            true
        } else {
            false
        }
    }

    /// Moves the window. Returns `false` if it does not exist.
    pub fn move_to(&mut self, title: &str, x: i64, y: i64) -> bool {
        if let Some(window) = self.windows.get_mut(title) {
            window.x = x;
            window.y = y;
            true
        } else {
            false
        }
    }

    /// The title of the currently focused window, if any.
    #[must_use]
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Looks up a window by title.
    #[must_use]
    pub fn get(&self, title: &str) -> Option<&Window> {
        self.windows.get(title)
    }
}

/// The mouse: a cursor position and a log of button presses.
#[derive(Debug, Default)]
pub struct MouseManager {
    x:       i64,
    y:       i64,
    presses: Vec<String>,
}

impl MouseManager {
    /// Moves the cursor.
    pub fn move_to(&mut self, x: i64, y: i64) {
        self.x = x;
        self.y = y;
    }

    /// The current cursor position.
    #[must_use]
    pub const fn position(&self) -> (i64, i64) {
        (self.x, self.y)
    }

    /// Records a button press.
    pub fn press(&mut self, button: &str) {
        self.presses.push(button.to_string());
    }

    /// Every button press so far, in order.
    #[must_use]
    pub fn presses(&self) -> &[String] {
        &self.presses
    }
}

/// The keyboard: the set of held keys and a log of taps.
#[derive(Debug, Default)]
pub struct KeyboardManager {
    held: HashSet<String>,
    taps: Vec<String>,
}

impl KeyboardManager {
    /// Presses a key and keeps it held.
    pub fn hold(&mut self, key: &str) {
        self.held.insert(key.to_string());
    }

    /// Releases a held key. Releasing a key that is not held is a no-op.
    pub fn release(&mut self, key: &str) {
        self.held.remove(key);
    }

    /// Taps a key once.
    pub fn press(&mut self, key: &str) {
        self.taps.push(key.to_string());
    }

    /// Whether the key is currently held.
    #[must_use]
    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(key)
    }

    /// Every tap so far, in order.
    #[must_use]
    pub fn taps(&self) -> &[String] {
        &self.taps
    }
}

/// Virtual time. `WAIT` accumulates here instead of sleeping, so scripts
/// run instantly and tests can assert on the total.
#[derive(Debug, Default)]
pub struct Clock {
    waited: f64,
}

impl Clock {
    /// Advances virtual time by `seconds`.
    pub fn wait(&mut self, seconds: f64) {
        self.waited += seconds;
    }

    /// Total seconds waited so far.
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.waited
    }
}
