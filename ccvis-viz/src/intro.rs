//! Introductory dialog shown when a map opens.
//!
//! The dialog has two exits: continue, or continue and never show it again.
//! The second one sets a persisted flag; the flag is only ever set here,
//! never cleared on load.

/// A modal the UI layer can open and close.
pub trait Dialog {
    fn open(&mut self);
    fn close(&mut self);
}

/// Persisted boolean flags (browser local storage in the web build).
pub trait FlagStore {
    fn is_set(&self, key: &str) -> bool;
    fn set(&mut self, key: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissAction {
    Continue,
    ContinueAndSuppress,
}

/// Storage key for an app's "intro already shown" flag.
pub fn modal_flag_key(app_id: &str) -> String {
    format!("{}_modal_shown", app_id)
}

pub struct IntroDialog<D: Dialog, S: FlagStore> {
    dialog: D,
    store: S,
    key: String,
    always_show: bool,
    open: bool,
}

impl<D: Dialog, S: FlagStore> IntroDialog<D, S> {
    pub fn new(dialog: D, store: S, app_id: &str) -> Self {
        Self {
            dialog,
            store,
            key: modal_flag_key(app_id),
            always_show: false,
            open: false,
        }
    }

    /// Ignore the persisted flag and show the intro on every mount.
    pub fn always_show(mut self, always: bool) -> Self {
        self.always_show = always;
        self
    }

    /// Open the dialog unless the user suppressed it. Returns whether it opened.
    pub fn mount(&mut self) -> bool {
        if self.open {
            return true;
        }
        if !self.always_show && self.store.is_set(&self.key) {
            log::debug!("intro suppressed by {}", self.key);
            return false;
        }
        self.dialog.open();
        self.open = true;
        true
    }

    /// Dismiss handler wired to the dialog's two buttons.
    pub fn dismiss(&mut self, action: DismissAction) {
        if !self.open {
            return;
        }
        if action == DismissAction::ContinueAndSuppress {
            self.store.set(&self.key);
        }
        self.dialog.close();
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn dialog(&self) -> &D {
        &self.dialog
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
