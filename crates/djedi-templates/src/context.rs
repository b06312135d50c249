use serde_json::Map;
use serde_json::Value;

/// Variables visible to a render.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Context {
    vars: Map<String, Value>,
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }
}
