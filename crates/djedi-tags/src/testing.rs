use std::sync::Arc;
use std::sync::Mutex;

use djedi_content::ContentError;
use djedi_content::ContentStore;
use djedi_content::MemoryStore;
use djedi_content::Node;
use djedi_content::Uri;

/// A [`MemoryStore`] that records every lookup as `(uri, default)`.
#[derive(Default)]
pub(crate) struct RecordingStore {
    pub(crate) inner: MemoryStore,
    lookups: Mutex<Vec<(String, String)>>,
}

impl RecordingStore {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn lookups(&self) -> Vec<(String, String)> {
        self.lookups.lock().unwrap().clone()
    }
}

impl ContentStore for RecordingStore {
    fn get(&self, uri: &Uri, default: &str) -> Result<Node, ContentError> {
        self.lookups
            .lock()
            .unwrap()
            .push((uri.to_string(), default.to_string()));
        self.inner.get(uri, default)
    }
}
