//! In-memory doubles for store tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use promptbook_core::PromptBookError;
use promptbook_core::clipboard::Clipboard;
use promptbook_core::error::Result;
use promptbook_core::prompt::{Prompt, PromptRepository};
use promptbook_core::sync::{ChangeNotifier, PromptsChanged};

/// Mock PromptRepository that keeps the collection in memory.
#[derive(Default)]
pub struct MockPromptRepository {
    prompts: Mutex<Vec<Prompt>>,
    saves: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    save_delay: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockPromptRepository {
    pub fn with_prompts(prompts: Vec<Prompt>) -> Self {
        Self {
            prompts: Mutex::new(prompts),
            ..Default::default()
        }
    }

    /// Replaces the stored collection behind the store's back.
    pub fn set_stored(&self, prompts: Vec<Prompt>) {
        *self.prompts.lock().unwrap() = prompts;
    }

    pub fn stored(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes every save take `delay` before it lands.
    pub fn set_save_delay(&self, delay: Duration) {
        *self.save_delay.lock().unwrap() = Some(delay);
    }

    /// Saves currently between start and completion.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of saves that ever overlapped.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PromptRepository for MockPromptRepository {
    async fn load(&self) -> Result<Vec<Prompt>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PromptBookError::io("disk unavailable"));
        }
        Ok(self.stored())
    }

    async fn save(&self, prompts: &[Prompt]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PromptBookError::persistence_write("disk full"));
        }

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        let delay = *self.save_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.set_stored(prompts.to_vec());
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Records every published event.
#[derive(Default)]
pub struct RecordingNotifier {
    pub events: Mutex<Vec<PromptsChanged>>,
}

impl RecordingNotifier {
    pub fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl ChangeNotifier for RecordingNotifier {
    fn notify(&self, event: PromptsChanged) {
        self.events.lock().unwrap().push(event);
    }
}

/// Clipboard that remembers the last text, or fails on demand.
#[derive(Default)]
pub struct MockClipboard {
    pub last: Mutex<Option<String>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl Clipboard for MockClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PromptBookError::clipboard("pasteboard unavailable"));
        }
        *self.last.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}
