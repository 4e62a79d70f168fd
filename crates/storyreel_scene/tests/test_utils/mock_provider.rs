//! Scripted completion provider.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use storyreel_error::{CompletionError, CompletionErrorKind};
use storyreel_interface::CompletionProvider;

/// Provider whose behaviour is scripted per scene number (1-based).
///
/// The scene number is read from the request header ("Scene N of M").
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    name: String,
    delays: HashMap<usize, Duration>,
    failures: Mutex<HashMap<usize, VecDeque<CompletionErrorKind>>>,
    always_fail: Option<CompletionErrorKind>,
    empty: HashSet<usize>,
    calls: Mutex<Vec<usize>>,
    finished: Mutex<Vec<usize>>,
    requests: Mutex<HashMap<usize, String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedProvider {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Delay the response for a scene.
    pub fn with_delay(mut self, scene: usize, delay: Duration) -> Self {
        self.delays.insert(scene, delay);
        self
    }

    /// Fail the next calls for a scene with these errors, in order.
    pub fn with_failures(self, scene: usize, kinds: Vec<CompletionErrorKind>) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(scene, kinds.into_iter().collect());
        self
    }

    /// Fail every call.
    pub fn failing(mut self, kind: CompletionErrorKind) -> Self {
        self.always_fail = Some(kind);
        self
    }

    /// Return whitespace for a scene.
    pub fn with_empty(mut self, scene: usize) -> Self {
        self.empty.insert(scene);
        self
    }

    /// Scene numbers in the order calls started.
    pub fn calls(&self) -> Vec<usize> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Scene numbers in the order calls finished.
    pub fn finished(&self) -> Vec<usize> {
        self.finished.lock().unwrap().clone()
    }

    /// Most recent request text for a scene.
    pub fn request(&self, scene: usize) -> Option<String> {
        self.requests.lock().unwrap().get(&scene).cloned()
    }

    /// Highest number of concurrent calls observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn scene_number(request_text: &str) -> usize {
        request_text
            .strip_prefix("Scene ")
            .and_then(|rest| rest.split_whitespace().next())
            .and_then(|n| n.parse().ok())
            .unwrap_or(0)
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, request_text: &str) -> Result<String, CompletionError> {
        let scene = Self::scene_number(request_text);
        self.calls.lock().unwrap().push(scene);
        self.requests
            .lock()
            .unwrap()
            .insert(scene, request_text.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(&scene) {
            tokio::time::sleep(*delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.finished.lock().unwrap().push(scene);

        if let Some(kind) = &self.always_fail {
            return Err(CompletionError::new(kind.clone()));
        }
        let scripted = self
            .failures
            .lock()
            .unwrap()
            .get_mut(&scene)
            .and_then(VecDeque::pop_front);
        if let Some(kind) = scripted {
            return Err(CompletionError::new(kind));
        }
        if self.empty.contains(&scene) {
            return Ok("   ".to_string());
        }
        Ok(format!("{} visual prompt for scene {}", self.name, scene))
    }

    fn provider_name(&self) -> &str {
        &self.name
    }

    fn model_name(&self) -> &str {
        "scripted-1"
    }
}
