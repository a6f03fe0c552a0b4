use crate::launch::Launcher;
use crate::link::DEFAULT_SHARE_BASE_URL;
use crate::schema::RuleContext;
use crate::shared::{append_event_log, BusyFlag};
use chrono::{DateTime, Local, TimeZone, Utc};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Reports the network the operator's wallet is connected to.
pub trait NetworkIdentity: Send + Sync {
    fn chain_id(&self) -> Option<u64>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticNetwork(pub Option<u64>);

impl NetworkIdentity for StaticNetwork {
    fn chain_id(&self) -> Option<u64> {
        self.0
    }
}

pub trait Clipboard: Send + Sync {
    fn copy(&self, text: &str);
}

#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&self, text: &str) {
        *self.contents.lock().unwrap_or_else(|err| err.into_inner()) = Some(text.to_string());
    }
}

pub trait Clock: Send + Sync {
    /// Last instant of the current day, in the operator's timezone.
    fn end_of_today(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn end_of_today(&self) -> DateTime<Utc> {
        let now = Local::now();
        now.date_naive()
            .and_hms_milli_opt(23, 59, 59, 999)
            .and_then(|naive| naive.and_local_timezone(Local).latest())
            .map(|end| end.with_timezone(&Utc))
            .unwrap_or_else(|| now.with_timezone(&Utc))
    }
}

/// Clock pinned to one instant; days end at 23:59:59.999 UTC.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn end_of_today(&self) -> DateTime<Utc> {
        self.0
            .date_naive()
            .and_hms_milli_opt(23, 59, 59, 999)
            .map(|naive| Utc.from_utc_datetime(&naive))
            .unwrap_or(self.0)
    }
}

/// Collaborators a wizard needs from its host, passed in explicitly so the
/// state machine runs without one.
#[derive(Clone)]
pub struct WizardContext {
    pub network: Arc<dyn NetworkIdentity>,
    pub launcher: Arc<dyn Launcher>,
    pub clipboard: Arc<dyn Clipboard>,
    pub clock: Arc<dyn Clock>,
    pub busy: BusyFlag,
    pub share_base_url: String,
    pub event_log: Option<PathBuf>,
}

impl WizardContext {
    pub fn new(launcher: Arc<dyn Launcher>) -> Self {
        Self {
            network: Arc::new(StaticNetwork::default()),
            launcher,
            clipboard: Arc::new(MemoryClipboard::new()),
            clock: Arc::new(SystemClock),
            busy: BusyFlag::new(),
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            event_log: None,
        }
    }

    pub fn with_network(mut self, network: Arc<dyn NetworkIdentity>) -> Self {
        self.network = network;
        self
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_busy_flag(mut self, busy: BusyFlag) -> Self {
        self.busy = busy;
        self
    }

    pub fn with_share_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.share_base_url = base_url.into();
        self
    }

    pub fn with_event_log(mut self, path: Option<PathBuf>) -> Self {
        self.event_log = path;
        self
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.network.chain_id()
    }

    pub fn rule_context(&self) -> RuleContext {
        RuleContext {
            end_of_today: self.clock.end_of_today(),
            chain_id: self.network.chain_id(),
        }
    }

    pub(crate) fn log(&self, level: &str, event: &str, message: &str) {
        if let Some(path) = &self.event_log {
            append_event_log(path, level, event, message);
        }
    }
}

impl std::fmt::Debug for WizardContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardContext")
            .field("chain_id", &self.network.chain_id())
            .field("busy", &self.busy.is_busy())
            .field("share_base_url", &self.share_base_url)
            .field("event_log", &self.event_log)
            .finish()
    }
}
