//! Shell controller
//!
//! Orchestrates the menu, the view selector, the blocking overlay and the dialogs
//! in response to user actions. Calls against the agent run as spawned tasks; their
//! results come back as [`Settlement`]s on the channel returned by
//! [`ShellController::new`] and are applied with [`ShellController::apply`], so all
//! shell state is only ever touched from the event loop.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::blocking::BlockingCoordinator;
use super::collaborators::{AgentApi, AlertSink, LogSink, Navigator, Opener, RuntimeObserver};
use super::menu::{MenuItem, MenuModel, ViewKey};
use super::modal::ModalRegistry;
use super::types::{ReloadResult, SessionInfo, VersionInfo};
use super::view::{ViewRegistry, ViewSelector, Viewable};
use crate::error::{MenuError, ServiceError};

/// Overlay message shown while the agent reloads its configuration
pub const RELOAD_MESSAGE: &str = "Reloading Conf. Please wait...";

/// Result of an agent call, delivered back to the shell
#[derive(Debug)]
pub enum Settlement {
    InfoFetched(Result<VersionInfo, ServiceError>),
    LoggedOut(Result<(), ServiceError>),
    Reloaded(Result<String, ServiceError>),
    ViewLoaded {
        key: ViewKey,
        entries: Result<Vec<Value>, ServiceError>,
    },
    Imported {
        file: PathBuf,
        result: Result<String, ServiceError>,
    },
    /// The import file could not be read or is not JSON; nothing was posted
    ImportRejected { file: PathBuf, reason: String },
}

/// External collaborators injected into the controller
pub struct Collaborators {
    pub api: Arc<dyn AgentApi>,
    pub navigator: Box<dyn Navigator>,
    pub alerts: Box<dyn AlertSink>,
    pub log: Box<dyn LogSink>,
    pub opener: Box<dyn Opener>,
    /// Runtime status view; notified only while no section view is mounted
    pub runtime: Option<Box<dyn RuntimeObserver>>,
}

/// Orchestrates the navigation shell
pub struct ShellController<V: ?Sized = dyn Viewable> {
    menu: MenuModel,
    views: ViewSelector<V>,
    blocker: BlockingCoordinator,
    modals: ModalRegistry,
    session: SessionInfo,
    last_reload: Option<ReloadResult>,
    /// Reloads issued but not yet settled
    pending_reloads: usize,
    compact_menu: bool,
    status_message: Option<String>,
    api: Arc<dyn AgentApi>,
    navigator: Box<dyn Navigator>,
    alerts: Box<dyn AlertSink>,
    log: Box<dyn LogSink>,
    opener: Box<dyn Opener>,
    runtime: Option<Box<dyn RuntimeObserver>>,
    settle_tx: mpsc::UnboundedSender<Settlement>,
}

impl<V: ?Sized + Viewable> ShellController<V> {
    /// Create the shell and issue the startup session-info fetch.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(
        menu: MenuModel,
        registry: ViewRegistry<V>,
        collaborators: Collaborators,
    ) -> (Self, mpsc::UnboundedReceiver<Settlement>) {
        let (settle_tx, settle_rx) = mpsc::unbounded_channel();
        let Collaborators {
            api,
            navigator,
            alerts,
            log,
            opener,
            runtime,
        } = collaborators;

        let shell = Self {
            menu,
            views: ViewSelector::new(registry),
            blocker: BlockingCoordinator::new(),
            modals: ModalRegistry::new(),
            session: SessionInfo::default(),
            last_reload: None,
            pending_reloads: 0,
            compact_menu: false,
            status_message: None,
            api,
            navigator,
            alerts,
            log,
            opener,
            runtime,
            settle_tx,
        };

        shell.fetch_info();
        (shell, settle_rx)
    }

    fn fetch_info(&self) {
        let api = self.api.clone();
        self.dispatch(
            async move { Settlement::InfoFetched(api.fetch_info().await) },
            Settlement::InfoFetched(Err(aborted("info"))),
        );
    }

    /// Toggle a menu group; returns its new `expanded` value
    pub fn expand_menu(&mut self, group_index: usize) -> Result<bool, MenuError> {
        self.menu.toggle_expand(group_index)
    }

    /// Swap the content panel to `item`'s view
    pub fn click_menu(&mut self, item: &MenuItem) {
        if self.views.select(item) {
            self.load_active_view();
        }
    }

    /// [`Self::click_menu`] for the item at a menu position
    pub fn click_menu_at(&mut self, group: usize, index: usize) {
        if let Some(item) = self.menu.item(group, index).cloned() {
            self.click_menu(&item);
        }
    }

    /// Re-fetch the entries of the active view
    pub fn load_active_view(&self) {
        let Some(active) = self.views.active() else {
            return;
        };
        let Some(path) = active.view().source().map(str::to_string) else {
            return;
        };

        let key = active.key().clone();
        let abort = Settlement::ViewLoaded {
            key: key.clone(),
            entries: Err(aborted("view load")),
        };
        let api = self.api.clone();
        self.dispatch(
            async move {
                let entries = api.list_entries(&path).await;
                Settlement::ViewLoaded { key, entries }
            },
            abort,
        );
    }

    /// Toggle the compact (icons only) side menu
    pub fn change_mode_menu(&mut self) -> bool {
        self.compact_menu = !self.compact_menu;
        self.compact_menu
    }

    /// Open an external link; failures are only logged
    pub fn link(&self, url: &str) {
        if let Err(e) = self.opener.open(url) {
            warn!("Failed to open {}: {}", url, e);
            self.log.record(&format!("Failed to open {}: {}", url, e));
        }
    }

    #[instrument(skip(self))]
    pub fn logout(&mut self) {
        info!("Logging out");
        let api = self.api.clone();
        self.dispatch(
            async move { Settlement::LoggedOut(api.logout().await) },
            Settlement::LoggedOut(Err(aborted("logout"))),
        );
    }

    /// Ask the agent to reload its configuration behind the blocking overlay
    #[instrument(skip(self))]
    pub fn reload_config(&mut self) {
        self.blocker.start(RELOAD_MESSAGE);

        // The runtime panel is only on screen while no section view is mounted
        if self.views.active().is_none() {
            if let Some(runtime) = &self.runtime {
                runtime.refresh_status();
            }
        }

        if self.pending_reloads > 0 {
            warn!(
                "Reload requested while {} reload(s) outstanding",
                self.pending_reloads
            );
        }
        self.pending_reloads += 1;

        let api = self.api.clone();
        self.dispatch(
            async move { Settlement::Reloaded(api.reload_config().await) },
            Settlement::Reloaded(Err(aborted("reload"))),
        );
    }

    pub fn show_import(&mut self) {
        self.modals.show_import();
    }

    pub fn show_about(&mut self) {
        self.modals.show_about(self.session.version.as_ref());
    }

    pub fn close_modal(&mut self) {
        self.modals.close();
    }

    /// Submit the import dialog: read and validate the file, then post it.
    ///
    /// The file is read on the spawned task; a file that cannot be read or
    /// parsed settles as [`Settlement::ImportRejected`] and reopens the dialog.
    pub fn submit_import(&mut self) {
        let Some(request) = self.modals.import_mut().submit() else {
            return;
        };

        self.status_message = Some(format!("Importing {}...", request.path.display()));

        let api = self.api.clone();
        let abort = Settlement::Imported {
            file: request.path.clone(),
            result: Err(aborted("import")),
        };
        self.dispatch(
            async move {
                let file = request.path;
                let document = match read_document(&file).await {
                    Ok(document) => document,
                    Err(reason) => return Settlement::ImportRejected { file, reason },
                };
                let result = api.import_config(document, request.overwrite).await;
                Settlement::Imported { file, result }
            },
            abort,
        );
    }

    /// Apply the result of an agent call
    pub fn apply(&mut self, settlement: Settlement) {
        match settlement {
            Settlement::InfoFetched(Ok(version)) => {
                info!("Agent info: {}", version.short_label());
                self.session.populate(version);
            }
            Settlement::InfoFetched(Err(e)) => {
                // Non-fatal: the shell stays usable without session metadata
                self.session.signed_in = false;
                self.log
                    .record(&format!("Failed to fetch agent info: {}", e.user_message()));
            }

            Settlement::LoggedOut(Ok(())) => {
                info!("Logged out");
                self.navigator.go_to_sign_in();
            }
            Settlement::LoggedOut(Err(e)) => self.surface(&e),

            Settlement::Reloaded(result) => {
                self.pending_reloads = self.pending_reloads.saturating_sub(1);
                if self.pending_reloads > 0 {
                    warn!(
                        "Overlay released with {} reload(s) still outstanding",
                        self.pending_reloads
                    );
                }

                match result {
                    Ok(elapsed) => {
                        info!("Configuration reloaded in {}", elapsed);
                        self.last_reload = Some(ReloadResult::new(elapsed));
                        self.blocker.stop();
                    }
                    Err(e) => {
                        self.blocker.stop();
                        self.surface(&e);
                    }
                }
            }

            Settlement::ViewLoaded { key, entries } => {
                if let Err(e) = &entries {
                    self.log
                        .record(&format!("Failed to load {}: {}", key, e.user_message()));
                }
                match self.views.active_mut() {
                    Some(active) if active.key() == &key => active.view_mut().load(entries),
                    _ => debug!("Dropping entries for inactive view '{}'", key),
                }
            }

            Settlement::Imported { file, result } => match result {
                Ok(summary) => {
                    info!("Imported {}: {}", file.display(), summary);
                    self.status_message =
                        Some(format!("Imported {}: {}", file.display(), summary));
                    self.load_active_view();
                }
                Err(e) => {
                    self.status_message = None;
                    self.surface(&e);
                }
            },

            Settlement::ImportRejected { file, reason } => {
                debug!("Import of {} rejected: {}", file.display(), reason);
                self.status_message = None;
                if self.modals.visible().is_none() {
                    self.modals.import_mut().reject(reason);
                } else {
                    // Another dialog took the screen meanwhile
                    self.alerts.show(&reason);
                    self.log.record(&reason);
                }
            }
        }
    }

    /// Blocking alert plus log entry
    fn surface(&self, error: &ServiceError) {
        let message = error.user_message();
        self.alerts.show(&message);
        self.log.record(&message);
    }

    fn dispatch<F>(&self, call: F, on_abort: Settlement)
    where
        F: Future<Output = Settlement> + Send + 'static,
    {
        let tx = self.settle_tx.clone();
        tokio::spawn(async move {
            // A panicking call still settles, so the overlay is always released
            let settlement = AssertUnwindSafe(call)
                .catch_unwind()
                .await
                .unwrap_or(on_abort);
            if tx.send(settlement).is_err() {
                debug!("Shell closed before the call settled");
            }
        });
    }

    pub fn menu(&self) -> &MenuModel {
        &self.menu
    }

    pub fn views(&self) -> &ViewSelector<V> {
        &self.views
    }

    pub fn views_mut(&mut self) -> &mut ViewSelector<V> {
        &mut self.views
    }

    pub fn blocking(&self) -> &BlockingCoordinator {
        &self.blocker
    }

    pub fn modals(&self) -> &ModalRegistry {
        &self.modals
    }

    pub fn modals_mut(&mut self) -> &mut ModalRegistry {
        &mut self.modals
    }

    pub fn session(&self) -> &SessionInfo {
        &self.session
    }

    pub fn last_reload(&self) -> Option<&ReloadResult> {
        self.last_reload.as_ref()
    }

    pub fn pending_reloads(&self) -> usize {
        self.pending_reloads
    }

    pub fn is_compact_menu(&self) -> bool {
        self.compact_menu
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

fn aborted(call: &str) -> ServiceError {
    ServiceError::Transport(format!("{} call aborted", call))
}

/// Read an import file and parse it as JSON
async fn read_document(path: &Path) -> Result<Value, String> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("Invalid JSON in {}: {}", path.display(), e))
}
