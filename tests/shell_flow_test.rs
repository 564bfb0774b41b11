//! End-to-end shell flows against a mock agent.
//!
//! The shell runs with the real HTTP client and the console menu; the agent is a
//! wiremock server. Each test applies settlements the way the TUI event loop does.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use collector_console::service::{HttpSessionService, IMPORT_PATH, INFO_PATH, RELOAD_PATH};
use collector_console::shell::{
    AlertSink, Collaborators, LogSink, Navigator, Opener, RELOAD_MESSAGE, RuntimeObserver,
    Settlement,
};
use collector_console::views::{self, ConsoleShell, HMC_SERVERS};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::mpsc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Records collaborator calls in order
#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    fn push(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Navigator for Recorder {
    fn go_to_sign_in(&self) {
        self.push("sign-in".to_string());
    }
}

impl AlertSink for Recorder {
    fn show(&self, message: &str) {
        self.push(format!("alert:{}", message));
    }
}

impl LogSink for Recorder {
    fn record(&self, message: &str) {
        self.push(format!("log:{}", message));
    }
}

impl Opener for Recorder {
    fn open(&self, url: &str) -> std::io::Result<()> {
        self.push(format!("open:{}", url));
        Ok(())
    }
}

impl RuntimeObserver for Recorder {
    fn refresh_status(&self) {
        self.push("refresh".to_string());
    }
}

struct Console {
    shell: ConsoleShell,
    rx: mpsc::UnboundedReceiver<Settlement>,
    recorder: Recorder,
}

impl Console {
    /// Start the shell and apply the startup info fetch
    async fn start(server: &MockServer) -> Self {
        let api = HttpSessionService::new(server.uri(), Duration::from_secs(5)).unwrap();
        let recorder = Recorder::default();
        let collaborators = Collaborators {
            api: Arc::new(api),
            navigator: Box::new(recorder.clone()),
            alerts: Box::new(recorder.clone()),
            log: Box::new(recorder.clone()),
            opener: Box::new(recorder.clone()),
            runtime: Some(Box::new(recorder.clone())),
        };
        let (shell, rx) = ConsoleShell::new(
            views::console_menu().unwrap(),
            views::console_registry(),
            collaborators,
        );

        let mut console = Self {
            shell,
            rx,
            recorder,
        };
        console.settle().await;
        console
    }

    async fn settle(&mut self) {
        let settlement = tokio::time::timeout(Duration::from_secs(5), self.rx.recv())
            .await
            .expect("settlement timed out")
            .expect("shell channel closed");
        self.shell.apply(settlement);
    }
}

async fn mount_info(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(INFO_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "InstanceID": "collector01",
            "Version": "0.9.1",
            "Commit": "abc1234def",
            "Branch": "master",
            "BuildStamp": "1700000000"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_startup_populates_session() {
    let server = MockServer::start().await;
    mount_info(&server).await;

    let console = Console::start(&server).await;
    let session = console.shell.session();
    assert!(session.signed_in);
    assert_eq!(
        session.version.as_ref().map(|v| v.instance_id.as_str()),
        Some("collector01")
    );
    assert!(console.recorder.calls().is_empty());
}

#[tokio::test]
async fn test_startup_failure_is_logged_not_alerted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(INFO_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("not signed in"))
        .mount(&server)
        .await;

    let console = Console::start(&server).await;
    assert!(!console.shell.session().signed_in);
    assert_eq!(
        console.recorder.calls(),
        vec!["log:Failed to fetch agent info: not signed in".to_string()]
    );
}

#[tokio::test]
async fn test_reload_round_trip() {
    let server = MockServer::start().await;
    mount_info(&server).await;
    Mock::given(method("GET"))
        .and(path(RELOAD_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!("1.52s"))
                .set_delay(Duration::from_millis(50)),
        )
        .mount(&server)
        .await;

    let mut console = Console::start(&server).await;
    console.shell.reload_config();
    assert_eq!(
        console.shell.blocking().state().message(),
        Some(RELOAD_MESSAGE)
    );
    assert_eq!(console.recorder.calls(), vec!["refresh".to_string()]);

    console.settle().await;
    assert!(!console.shell.blocking().is_blocking());
    let reload = console.shell.last_reload().unwrap();
    assert_eq!(reload.elapsed_description, "1.52s");
    assert_eq!(console.shell.pending_reloads(), 0);
}

#[tokio::test]
async fn test_failed_reload_alerts_with_agent_text() {
    let server = MockServer::start().await;
    mount_info(&server).await;
    Mock::given(method("GET"))
        .and(path(RELOAD_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("Error on reload config"))
        .mount(&server)
        .await;

    let mut console = Console::start(&server).await;
    console.shell.reload_config();
    console.settle().await;

    assert!(!console.shell.blocking().is_blocking());
    assert!(console.shell.last_reload().is_none());
    assert_eq!(
        console.recorder.calls(),
        vec![
            "refresh".to_string(),
            "alert:Error on reload config".to_string(),
            "log:Error on reload config".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_logout_navigates_to_sign_in() {
    let server = MockServer::start().await;
    mount_info(&server).await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut console = Console::start(&server).await;
    console.shell.logout();
    assert!(!console.shell.blocking().is_blocking());
    console.settle().await;

    assert_eq!(console.recorder.calls(), vec!["sign-in".to_string()]);
}

#[tokio::test]
async fn test_menu_click_loads_section() {
    let server = MockServer::start().await;
    mount_info(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/cfg/hmcservers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"ID": "hmc01", "Host": "10.0.0.5", "Port": 12443, "Active": true}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut console = Console::start(&server).await;
    console.shell.click_menu_at(1, 1);
    assert_eq!(
        console.shell.views().active_key().map(|k| k.as_str()),
        Some(HMC_SERVERS)
    );
    console.settle().await;

    // Clicking the mounted item again does not re-fetch
    console.shell.click_menu_at(1, 1);
    assert!(console.rx.try_recv().is_err());

    // The intrinsic runtime entry clears the panel
    console.shell.click_menu_at(0, 0);
    assert!(console.shell.views().active().is_none());
}

#[tokio::test]
async fn test_import_file_and_refresh_view() {
    let server = MockServer::start().await;
    mount_info(&server).await;
    let document = json!({"InfluxServers": {"influx01": {"ID": "influx01"}}});
    Mock::given(method("POST"))
        .and(path(format!("{}/true", IMPORT_PATH)))
        .and(body_json(document.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("1 entries imported")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cfg/influxservers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("backup.json");
    std::fs::write(&file, document.to_string()).unwrap();

    let mut console = Console::start(&server).await;
    console.shell.click_menu_at(1, 0);
    console.settle().await;

    console.shell.show_import();
    {
        let dialog = console.shell.modals_mut().import_mut();
        for c in file.display().to_string().chars() {
            dialog.push_char(c);
        }
        dialog.toggle_overwrite();
    }
    console.shell.submit_import();
    assert!(console.shell.modals().visible().is_none());

    // Import result, then the active view reload it triggers
    console.settle().await;
    assert!(
        console
            .shell
            .status_message()
            .is_some_and(|m| m.ends_with("1 entries imported"))
    );
    console.settle().await;
    assert!(console.recorder.calls().is_empty());
}
