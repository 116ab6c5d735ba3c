//! Effect executor
//!
//! The [`Shell`] owns the Crux core and is the only place events enter it.
//! Work that takes time (HTTP, uploads, timers) runs on spawned tasks which
//! report an [`Outcome`] back over a channel; the pending [`Request`] stays
//! here until its outcome is resolved into the core. Preference storage is
//! executed inline.

use anyhow::{Context, Result};
use crux_core::{Core, Request};
use crux_http::protocol::{HttpRequest, HttpResult};
use garage_panel_core::{
    App, Effect, Event, Model, TimerId, TimerOperation, TimerOutput, UploadOperation,
    UploadOutput,
};
use log::{debug, info, warn};
use std::{
    collections::{HashMap, VecDeque},
    io::Write,
    sync::Arc,
    time::Duration,
};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};

use crate::{
    http_client::DeviceTransport,
    input::{self, Gesture, USAGE},
    preferences::PreferenceStore,
    render,
};

/// Result of work finished outside the shell task
#[derive(Debug)]
pub enum Outcome {
    Http { id: u64, result: HttpResult },
    Upload { id: u64, output: UploadOutput },
    Timer { id: TimerId },
}

struct PendingTimer {
    request: Request<TimerOperation>,
    task: JoinHandle<()>,
}

pub struct Shell<T> {
    core: Core<App>,
    transport: Arc<T>,
    preferences: PreferenceStore,
    outcomes: UnboundedSender<Outcome>,
    next_id: u64,
    http: HashMap<u64, Request<HttpRequest>>,
    uploads: HashMap<u64, Request<UploadOperation>>,
    timers: HashMap<TimerId, PendingTimer>,
    out: Box<dyn Write + Send>,
}

impl<T> Shell<T>
where
    T: DeviceTransport + Send + Sync + 'static,
{
    pub fn new(
        transport: T,
        preferences: PreferenceStore,
        out: Box<dyn Write + Send>,
    ) -> (Self, UnboundedReceiver<Outcome>) {
        let (tx, rx) = mpsc::unbounded_channel();

        let shell = Self {
            core: Core::new(),
            transport: Arc::new(transport),
            preferences,
            outcomes: tx,
            next_id: 0,
            http: HashMap::new(),
            uploads: HashMap::new(),
            timers: HashMap::new(),
            out,
        };

        (shell, rx)
    }

    pub fn view(&self) -> Model {
        self.core.view()
    }

    /// Number of timers started and not yet finished or cancelled
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Start the panel and serve user input until it ends or `quit` is entered
    pub async fn run<R>(
        &mut self,
        outcomes: &mut UnboundedReceiver<Outcome>,
        reader: R,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();

        self.dispatch(Event::Initialize).await?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("failed to read input")? else {
                        info!("input closed");
                        return Ok(());
                    };
                    match input::parse(&line) {
                        Ok(Some(Gesture::Event(event))) => self.dispatch(event).await?,
                        Ok(Some(Gesture::Help)) => writeln!(self.out, "{USAGE}")?,
                        Ok(Some(Gesture::Quit)) => return Ok(()),
                        Ok(None) => {}
                        Err(e) => writeln!(self.out, "{e:#}")?,
                    }
                }
                Some(outcome) = outcomes.recv() => self.resolve(outcome).await?,
            }
        }
    }

    pub async fn dispatch(&mut self, event: Event) -> Result<()> {
        let effects = self.core.process_event(event);
        self.process(effects).await
    }

    /// Hand a finished outcome back to the core
    pub async fn resolve(&mut self, outcome: Outcome) -> Result<()> {
        let effects = match outcome {
            Outcome::Http { id, result } => match self.http.remove(&id) {
                Some(mut request) => self
                    .core
                    .resolve(&mut request, result)
                    .context("failed to resolve HTTP request")?,
                None => {
                    warn!("no pending HTTP request {id}");
                    Vec::new()
                }
            },
            Outcome::Upload { id, output } => match self.uploads.remove(&id) {
                Some(mut request) => self
                    .core
                    .resolve(&mut request, output)
                    .context("failed to resolve upload")?,
                None => {
                    warn!("no pending upload {id}");
                    Vec::new()
                }
            },
            // a cancelled timer may still report once
            Outcome::Timer { id } => match self.timers.remove(&id) {
                Some(mut pending) => self
                    .core
                    .resolve(&mut pending.request, TimerOutput::Elapsed)
                    .context("failed to resolve timer")?,
                None => Vec::new(),
            },
        };

        self.process(effects).await
    }

    async fn process(&mut self, effects: Vec<Effect>) -> Result<()> {
        let mut queue = VecDeque::from(effects);
        while let Some(effect) = queue.pop_front() {
            queue.extend(self.execute(effect).await?);
        }
        Ok(())
    }

    /// Execute one effect, returning the effects of any inline resolution
    async fn execute(&mut self, effect: Effect) -> Result<Vec<Effect>> {
        match effect {
            Effect::Render(_) => {
                let page = render::render(&self.core.view());
                write!(self.out, "{page}")?;
                self.out.flush()?;
                Ok(Vec::new())
            }

            Effect::Http(request) => {
                let id = self.next_id();
                let operation = request.operation.clone();
                debug!("{} {} (#{id})", operation.method, operation.url);
                self.http.insert(id, request);

                let transport = Arc::clone(&self.transport);
                let outcomes = self.outcomes.clone();
                tokio::spawn(async move {
                    let result = transport.execute(operation).await;
                    let _ = outcomes.send(Outcome::Http { id, result });
                });
                Ok(Vec::new())
            }

            Effect::Upload(request) => {
                let id = self.next_id();
                let operation = request.operation.clone();
                self.uploads.insert(id, request);

                let transport = Arc::clone(&self.transport);
                let outcomes = self.outcomes.clone();
                tokio::spawn(async move {
                    let output = transport.upload(operation).await;
                    let _ = outcomes.send(Outcome::Upload { id, output });
                });
                Ok(Vec::new())
            }

            Effect::Timer(mut request) => match request.operation.clone() {
                TimerOperation::Start { id, millis } => {
                    let outcomes = self.outcomes.clone();
                    let task = tokio::spawn(async move {
                        tokio::time::sleep(Duration::from_millis(millis)).await;
                        let _ = outcomes.send(Outcome::Timer { id });
                    });
                    self.timers.insert(id, PendingTimer { request, task });
                    Ok(Vec::new())
                }
                TimerOperation::Cancel { id } => {
                    let mut effects = Vec::new();
                    if let Some(mut pending) = self.timers.remove(&id) {
                        pending.task.abort();
                        effects.extend(
                            self.core
                                .resolve(&mut pending.request, TimerOutput::Cancelled)
                                .context("failed to resolve cancelled timer")?,
                        );
                    }
                    effects.extend(
                        self.core
                            .resolve(&mut request, TimerOutput::Cancelled)
                            .context("failed to resolve timer cancellation")?,
                    );
                    Ok(effects)
                }
            },

            Effect::Storage(mut request) => {
                let output = self.preferences.execute(&request.operation).await;
                self.core
                    .resolve(&mut request, output)
                    .context("failed to resolve storage request")
            }
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crux_http::{protocol::HttpResponse, HttpError};
    use garage_panel_core::{
        update::DEVICE_UNREACHABLE, DoorStatus, View, Visibility, BASE_URL, SHOW_DOOR_TWO_KEY,
    };
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeTransport {
        responses: HashMap<String, (u16, String)>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl FakeTransport {
        fn respond(mut self, path: &str, status: u16, body: &str) -> Self {
            self.responses
                .insert(path.to_string(), (status, body.to_string()));
            self
        }
    }

    impl DeviceTransport for FakeTransport {
        async fn execute(&self, request: HttpRequest) -> HttpResult {
            let path = request
                .url
                .strip_prefix(BASE_URL)
                .unwrap_or(&request.url)
                .to_string();
            self.requests
                .lock()
                .unwrap()
                .push(format!("{} {path}", request.method));

            match self.responses.get(&path) {
                Some((status, body)) => HttpResult::Ok(
                    HttpResponse::status(*status)
                        .body(body.clone().into_bytes())
                        .build(),
                ),
                None => HttpResult::Err(HttpError::Io("connection refused".to_string())),
            }
        }

        async fn upload(&self, _upload: UploadOperation) -> UploadOutput {
            UploadOutput::Completed { status: 200 }
        }
    }

    fn shell(
        transport: FakeTransport,
        dir: &tempfile::TempDir,
    ) -> (Shell<FakeTransport>, UnboundedReceiver<Outcome>) {
        let preferences = PreferenceStore::new(dir.path().join("preferences.json"));
        Shell::new(transport, preferences, Box::new(std::io::sink()))
    }

    #[tokio::test]
    async fn initialize_writes_default_preference_and_arms_polling() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (mut shell, _outcomes) = shell(FakeTransport::default(), &dir);

        shell.dispatch(Event::Initialize).await.expect("initialize");

        let stored = PreferenceStore::new(dir.path().join("preferences.json"))
            .get(SHOW_DOOR_TWO_KEY)
            .await
            .expect("read preferences");
        assert_eq!(stored.as_deref(), Some("1"));
        assert_eq!(shell.pending_timers(), 1);

        shell
            .dispatch(Event::VisibilityChanged(Visibility::Hidden))
            .await
            .expect("hide");
        assert_eq!(shell.pending_timers(), 0);
    }

    #[tokio::test]
    async fn stored_preference_shows_door_two() {
        let dir = tempfile::tempdir().expect("tempdir");
        PreferenceStore::new(dir.path().join("preferences.json"))
            .set(SHOW_DOOR_TWO_KEY, "2")
            .await
            .expect("seed preferences");
        let (mut shell, _outcomes) = shell(FakeTransport::default(), &dir);

        shell.dispatch(Event::Initialize).await.expect("initialize");

        assert!(shell.view().show_door_two);
    }

    #[tokio::test]
    async fn door_status_reaches_the_view() {
        let dir = tempfile::tempdir().expect("tempdir");
        let transport =
            FakeTransport::default().respond("/api/doorStatus", 200, r#"{"doorOne":"open"}"#);
        let (mut shell, mut outcomes) = shell(transport, &dir);

        shell
            .dispatch(Event::Door(garage_panel_core::DoorEvent::RefreshStatus))
            .await
            .expect("refresh");
        let outcome = outcomes.recv().await.expect("outcome");
        shell.resolve(outcome).await.expect("resolve");

        assert_eq!(shell.view().doors.one, DoorStatus::Open);
    }

    #[tokio::test]
    async fn unreachable_device_shows_message() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (mut shell, mut outcomes) = shell(FakeTransport::default(), &dir);

        shell
            .dispatch(Event::Door(garage_panel_core::DoorEvent::Activate(
                garage_panel_core::DoorId::One,
            )))
            .await
            .expect("activate");
        let outcome = outcomes.recv().await.expect("outcome");
        shell.resolve(outcome).await.expect("resolve");

        let view = shell.view();
        assert_eq!(view.current_view, View::Messages);
        assert_eq!(
            view.message.map(|m| m.body),
            Some(DEVICE_UNREACHABLE.to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn poll_timer_refreshes_again() {
        let dir = tempfile::tempdir().expect("tempdir");
        let transport = FakeTransport::default().respond("/api/doorStatus", 200, "{}");
        let requests = Arc::clone(&transport.requests);
        let (mut shell, mut outcomes) = shell(transport, &dir);

        shell
            .dispatch(Event::VisibilityChanged(Visibility::Visible))
            .await
            .expect("show");

        for _ in 0..10 {
            let count = requests
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.as_str() == "GET /api/doorStatus")
                .count();
            if count >= 2 {
                break;
            }
            let outcome = outcomes.recv().await.expect("outcome");
            shell.resolve(outcome).await.expect("resolve");
        }

        let count = requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.as_str() == "GET /api/doorStatus")
            .count();
        assert!(count >= 2, "expected a second refresh, saw {count}");
        assert_eq!(shell.pending_timers(), 1);
    }

    #[tokio::test]
    async fn uploads_report_back_to_the_core() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (mut shell, mut outcomes) = shell(FakeTransport::default(), &dir);

        shell
            .dispatch(Event::Device(
                garage_panel_core::DeviceEvent::SubmitFirmwareImage {
                    file: Some("firmware.bin".to_string()),
                },
            ))
            .await
            .expect("submit");
        let outcome = outcomes.recv().await.expect("outcome");
        shell.resolve(outcome).await.expect("resolve");

        let view = shell.view();
        assert_eq!(
            view.message.map(|m| m.kind),
            Some(garage_panel_core::MessageKind::Info)
        );
    }
}
