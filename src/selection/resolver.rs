//! Asynchronous element property resolution.
//!
//! Inspect requests are handed to a background thread so a slow property
//! backend never stalls the frame loop. Requests carry the selection
//! generation they were issued under; the thread only ever works on the
//! newest queued request and publishes the newest response through a
//! triple buffer. Whether a response is still wanted is decided by the
//! receiver, not here.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{mpsc, Arc};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use web_time::{Duration, Instant};

use crate::error::XrViewError;
use crate::scene::ElementRef;

/// Descriptive properties of one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementProperties {
    /// The element described.
    pub element: ElementRef,
    /// Identifier shown to the user (the file's express id).
    pub express_id: u32,
    /// Human-readable name; `None` when the file carries none.
    #[serde(default)]
    pub name: Option<String>,
}

/// Why a property lookup failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// The backend knows nothing about the element.
    NotFound(ElementRef),
    /// The backend answered without a required field.
    Incomplete {
        /// The element looked up.
        element: ElementRef,
        /// Name of the missing field.
        missing: &'static str,
    },
    /// The backend itself failed.
    Backend(String),
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(e) => write!(f, "no properties for {e:?}"),
            Self::Incomplete { element, missing } => {
                write!(f, "properties for {element:?} lack `{missing}`")
            }
            Self::Backend(msg) => write!(f, "property backend failed: {msg}"),
        }
    }
}

impl std::error::Error for PropertyError {}

/// Where element properties come from (usually the model loader).
pub trait PropertySource: Send + Sync {
    /// Look up an element's properties. May block.
    ///
    /// # Errors
    ///
    /// Returns a [`PropertyError`] when the element is unknown or the
    /// backend fails.
    fn properties(
        &self,
        element: ElementRef,
    ) -> Result<ElementProperties, PropertyError>;
}

/// In-memory property source, filled up front.
#[derive(Debug, Clone, Default)]
pub struct StaticPropertyTable {
    entries: FxHashMap<ElementRef, ElementProperties>,
}

impl StaticPropertyTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an element's properties.
    pub fn insert(&mut self, properties: ElementProperties) {
        let _ = self.entries.insert(properties.element, properties);
    }

    /// Number of elements described.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ElementProperties> for StaticPropertyTable {
    fn from_iter<I: IntoIterator<Item = ElementProperties>>(iter: I) -> Self {
        let mut table = Self::new();
        for properties in iter {
            table.insert(properties);
        }
        table
    }
}

impl PropertySource for StaticPropertyTable {
    fn properties(
        &self,
        element: ElementRef,
    ) -> Result<ElementProperties, PropertyError> {
        self.entries
            .get(&element)
            .cloned()
            .ok_or(PropertyError::NotFound(element))
    }
}

/// Anything that accepts inspect requests.
pub trait PropertyRequester {
    /// Queue a lookup tagged with `generation`. Never blocks.
    fn request(&self, generation: u64, element: ElementRef);
}

/// A finished lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyResponse {
    /// Generation the request was issued under.
    pub generation: u64,
    /// The element looked up.
    pub element: ElementRef,
    /// Lookup outcome.
    pub result: Result<ElementProperties, PropertyError>,
}

enum ResolveRequest {
    Resolve { generation: u64, element: ElementRef },
    Shutdown,
}

/// Background property lookups with last-request-wins semantics.
pub struct PropertyResolver {
    request_tx: mpsc::Sender<ResolveRequest>,
    result: triple_buffer::Output<Option<PropertyResponse>>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl fmt::Debug for PropertyResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyResolver")
            .field("running", &self.thread.is_some())
            .finish_non_exhaustive()
    }
}

impl PropertyResolver {
    /// Spawn the resolver thread over `source`.
    ///
    /// # Errors
    ///
    /// Returns [`XrViewError::ThreadSpawn`] if the thread fails to spawn.
    pub fn new(source: Arc<dyn PropertySource>) -> Result<Self, XrViewError> {
        let (request_tx, request_rx) = mpsc::channel::<ResolveRequest>();
        let (input, output) = triple_buffer::triple_buffer(&None);

        let thread = std::thread::Builder::new()
            .name("property-resolver".into())
            .spawn(move || Self::thread_loop(&request_rx, input, &*source))
            .map_err(XrViewError::ThreadSpawn)?;

        Ok(Self {
            request_tx,
            result: output,
            thread: Some(thread),
        })
    }

    /// Newest finished response, if one arrived since the last call.
    pub fn try_recv(&mut self) -> Option<PropertyResponse> {
        let _ = self.result.update();
        self.result.output_buffer_mut().take()
    }

    /// Poll until a response arrives or `timeout` passes.
    ///
    /// Only for hosts (and replays) that can afford to wait; the frame loop
    /// uses [`try_recv`](Self::try_recv).
    pub fn wait(&mut self, timeout: Duration) -> Option<PropertyResponse> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(response) = self.try_recv() {
                return Some(response);
            }
            if Instant::now() >= deadline {
                return None;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    /// Stop the thread and wait for it to finish.
    pub fn shutdown(&mut self) {
        let _ = self.request_tx.send(ResolveRequest::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }

    fn thread_loop(
        request_rx: &mpsc::Receiver<ResolveRequest>,
        mut output: triple_buffer::Input<Option<PropertyResponse>>,
        source: &dyn PropertySource,
    ) {
        while let Ok(request) = request_rx.recv() {
            match drain_latest(request, request_rx) {
                ResolveRequest::Shutdown => break,
                ResolveRequest::Resolve {
                    generation,
                    element,
                } => {
                    let result = resolve(source, element);
                    output.write(Some(PropertyResponse {
                        generation,
                        element,
                        result,
                    }));
                }
            }
        }
    }
}

impl PropertyRequester for PropertyResolver {
    fn request(&self, generation: u64, element: ElementRef) {
        let _ = self.request_tx.send(ResolveRequest::Resolve {
            generation,
            element,
        });
    }
}

impl Drop for PropertyResolver {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Keep only the newest queued request; a shutdown always wins.
fn drain_latest(
    initial: ResolveRequest,
    rx: &mpsc::Receiver<ResolveRequest>,
) -> ResolveRequest {
    let mut latest = initial;
    while let Ok(newer) = rx.try_recv() {
        if !matches!(latest, ResolveRequest::Shutdown) {
            latest = newer;
        }
    }
    latest
}

/// Run one lookup, turning a panicking backend into an error and a
/// nameless answer into [`PropertyError::Incomplete`].
fn resolve(
    source: &dyn PropertySource,
    element: ElementRef,
) -> Result<ElementProperties, PropertyError> {
    let outcome = catch_unwind(AssertUnwindSafe(|| source.properties(element)));
    let properties = match outcome {
        Ok(result) => result?,
        Err(_) => {
            log::error!("property source panicked resolving {element:?}");
            return Err(PropertyError::Backend(
                "property source panicked".to_owned(),
            ));
        }
    };
    if properties.name.as_deref().is_none_or(str::is_empty) {
        return Err(PropertyError::Incomplete {
            element,
            missing: "name",
        });
    }
    Ok(properties)
}
