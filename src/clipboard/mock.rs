//! Recording in-memory clipboard host for tests.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use super::{
    ClipboardEnv, ClipboardPayload, LegacyDocument, MIME_TEXT_HTML, MIME_TEXT_PLAIN, PlainWrite,
    RegionId, RegionStyle, RichWrite,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Rich { text: String, html: String },
    Plain(String),
    CreateRegion(String),
    SelectAll,
    ExecCopy,
    RemoveRegion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyOutcome {
    Succeed,
    ReportFailure,
    Throw(String),
}

pub struct MockEnv {
    has_rich: bool,
    has_plain: bool,
    calls: Mutex<Vec<Call>>,
    rich_failures: Mutex<VecDeque<String>>,
    plain_failures: Mutex<VecDeque<String>>,
    plain_delays: Mutex<VecDeque<Duration>>,
    legacy_outcome: Mutex<LegacyOutcome>,
    select_failure: Mutex<Option<String>>,
    regions: Mutex<HashSet<u64>>,
    next_region: Mutex<u64>,
}

impl MockEnv {
    fn with_capabilities(has_rich: bool, has_plain: bool) -> Self {
        Self {
            has_rich,
            has_plain,
            calls: Mutex::new(Vec::new()),
            rich_failures: Mutex::new(VecDeque::new()),
            plain_failures: Mutex::new(VecDeque::new()),
            plain_delays: Mutex::new(VecDeque::new()),
            legacy_outcome: Mutex::new(LegacyOutcome::Succeed),
            select_failure: Mutex::new(None),
            regions: Mutex::new(HashSet::new()),
            next_region: Mutex::new(0),
        }
    }

    pub fn full() -> Self {
        Self::with_capabilities(true, true)
    }

    pub fn plain_only() -> Self {
        Self::with_capabilities(false, true)
    }

    pub fn rich_only() -> Self {
        Self::with_capabilities(true, false)
    }

    pub fn none() -> Self {
        Self::with_capabilities(false, false)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn plain_writes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Plain(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn live_regions(&self) -> usize {
        self.regions.lock().unwrap().len()
    }

    pub fn fail_rich_once(&self, message: &str) {
        self.rich_failures.lock().unwrap().push_back(message.to_string());
    }

    pub fn fail_plain_once(&self, message: &str) {
        self.plain_failures.lock().unwrap().push_back(message.to_string());
    }

    pub fn delay_plain_once(&self, delay: Duration) {
        self.plain_delays.lock().unwrap().push_back(delay);
    }

    pub fn set_legacy_outcome(&self, outcome: LegacyOutcome) {
        *self.legacy_outcome.lock().unwrap() = outcome;
    }

    pub fn fail_select(&self, message: &str) {
        *self.select_failure.lock().unwrap() = Some(message.to_string());
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RichWrite for MockEnv {
    async fn write(&self, payload: &ClipboardPayload) -> Result<()> {
        self.record(Call::Rich {
            text: payload.get_str(MIME_TEXT_PLAIN).unwrap_or_default().to_string(),
            html: payload.get_str(MIME_TEXT_HTML).unwrap_or_default().to_string(),
        });
        match self.rich_failures.lock().unwrap().pop_front() {
            Some(message) => Err(anyhow!(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PlainWrite for MockEnv {
    async fn write_text(&self, text: &str) -> Result<()> {
        self.record(Call::Plain(text.to_string()));
        let delay = self.plain_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.plain_failures.lock().unwrap().pop_front() {
            Some(message) => Err(anyhow!(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LegacyDocument for MockEnv {
    fn create_region(&self, text: &str, style: RegionStyle) -> Result<RegionId> {
        assert_eq!(style, RegionStyle::OFFSCREEN);
        self.record(Call::CreateRegion(text.to_string()));
        let mut next = self.next_region.lock().unwrap();
        *next += 1;
        self.regions.lock().unwrap().insert(*next);
        Ok(RegionId(*next))
    }

    fn select_all(&self, region: RegionId) -> Result<()> {
        assert!(self.regions.lock().unwrap().contains(&region.0));
        self.record(Call::SelectAll);
        match self.select_failure.lock().unwrap().clone() {
            Some(message) => Err(anyhow!(message)),
            None => Ok(()),
        }
    }

    async fn exec_copy(&self, region: RegionId) -> Result<bool> {
        assert!(self.regions.lock().unwrap().contains(&region.0));
        self.record(Call::ExecCopy);
        match self.legacy_outcome.lock().unwrap().clone() {
            LegacyOutcome::Succeed => Ok(true),
            LegacyOutcome::ReportFailure => Ok(false),
            LegacyOutcome::Throw(message) => Err(anyhow!(message)),
        }
    }

    fn remove_region(&self, region: RegionId) {
        self.record(Call::RemoveRegion);
        self.regions.lock().unwrap().remove(&region.0);
    }
}

impl ClipboardEnv for MockEnv {
    fn rich_write(&self) -> Option<&dyn RichWrite> {
        self.has_rich.then_some(self as &dyn RichWrite)
    }

    fn plain_write(&self) -> Option<&dyn PlainWrite> {
        self.has_plain.then_some(self as &dyn PlainWrite)
    }

    fn document(&self) -> &dyn LegacyDocument {
        self
    }
}
