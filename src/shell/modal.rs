//! Transient dialogs launched from the shell
//!
//! Each dialog owns its own state; the shell only needs the `show` capability.
//! Both dialogs are constructed together with the registry, so a dialog can never
//! be shown before it exists.

use std::path::PathBuf;

use super::types::VersionInfo;

/// Capability to open the configuration import dialog
pub trait ImportModal {
    fn init_import(&mut self);
}

/// Capability to open the about dialog with the agent's version payload
pub trait AboutModal {
    fn show_modal(&mut self, version: Option<&VersionInfo>);
}

/// What the user asked to import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub path: PathBuf,
    pub overwrite: bool,
}

/// Configuration import dialog: file path input plus an overwrite toggle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportDialog {
    visible: bool,
    path: String,
    overwrite: bool,
    error: Option<String>,
}

impl ImportDialog {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    /// Validation error from the last submit attempt
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn push_char(&mut self, c: char) {
        self.path.push(c);
        self.error = None;
    }

    pub fn backspace(&mut self) {
        self.path.pop();
        self.error = None;
    }

    pub fn toggle_overwrite(&mut self) {
        self.overwrite = !self.overwrite;
    }

    /// Validate the input and close the dialog on success
    pub fn submit(&mut self) -> Option<ImportRequest> {
        let path = self.path.trim();
        if path.is_empty() {
            self.error = Some("File path cannot be empty".to_string());
            return None;
        }

        let request = ImportRequest {
            path: PathBuf::from(path),
            overwrite: self.overwrite,
        };
        self.visible = false;
        Some(request)
    }

    /// Reopen the dialog with the reason a submitted file was refused
    pub fn reject(&mut self, reason: impl Into<String>) {
        self.error = Some(reason.into());
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

impl ImportModal for ImportDialog {
    fn init_import(&mut self) {
        // Fresh form every time
        *self = Self {
            visible: true,
            ..Self::default()
        };
    }
}

/// About dialog showing the agent's version payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AboutDialog {
    visible: bool,
    version: Option<VersionInfo>,
}

impl AboutDialog {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Payload given when the dialog was shown; `None` if still unknown
    pub fn version(&self) -> Option<&VersionInfo> {
        self.version.as_ref()
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

impl AboutModal for AboutDialog {
    fn show_modal(&mut self, version: Option<&VersionInfo>) {
        self.version = version.cloned();
        self.visible = true;
    }
}

/// Which dialog is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Import,
    About,
}

/// Owns the shell's dialogs
#[derive(Debug, Clone, Default)]
pub struct ModalRegistry {
    import: ImportDialog,
    about: AboutDialog,
}

impl ModalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_import(&mut self) {
        self.about.hide();
        self.import.init_import();
    }

    pub fn show_about(&mut self, version: Option<&VersionInfo>) {
        self.import.hide();
        self.about.show_modal(version);
    }

    /// The dialog currently shown, if any
    pub fn visible(&self) -> Option<ModalKind> {
        if self.import.is_visible() {
            Some(ModalKind::Import)
        } else if self.about.is_visible() {
            Some(ModalKind::About)
        } else {
            None
        }
    }

    pub fn close(&mut self) {
        self.import.hide();
        self.about.hide();
    }

    pub fn import(&self) -> &ImportDialog {
        &self.import
    }

    pub fn import_mut(&mut self) -> &mut ImportDialog {
        &mut self.import
    }

    pub fn about(&self) -> &AboutDialog {
        &self.about
    }
}
