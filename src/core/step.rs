//! Step domain model

use crate::persistence::emitter::key_text;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::borrow::Cow;

/// Identifier of the bootstrap step every skeleton stage starts with
pub const CHECKOUT_STEP_ID: &str = "checkout-code";

/// Action used by the bootstrap step
pub const CHECKOUT_ACTION: &str = "actions/checkout@v4";

/// A single step of a stage job.
///
/// The payload is kept as an opaque mapping (`uses`, `with`, `run`, ...);
/// only the optional `id` has meaning to the merge engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Step {
    payload: Mapping,
}

impl Step {
    /// Create a step from its raw mapping
    pub fn new(payload: Mapping) -> Self {
        Self { payload }
    }

    /// Create a step invoking an action
    pub fn uses(id: Option<&str>, action: &str) -> Self {
        let mut payload = Mapping::new();
        if let Some(id) = id {
            payload.insert("id".into(), id.into());
        }
        payload.insert("uses".into(), action.into());
        Self { payload }
    }

    /// The checkout step placed first in every skeleton stage
    pub fn checkout() -> Self {
        Self::uses(Some(CHECKOUT_STEP_ID), CHECKOUT_ACTION)
    }

    /// Step identifier, if any. Empty ids count as absent; non-string ids
    /// (`id: 7`) are compared by their YAML text.
    pub fn id(&self) -> Option<Cow<'_, str>> {
        match self.payload.get("id")? {
            Value::Null => None,
            Value::String(id) if id.is_empty() => None,
            Value::String(id) => Some(Cow::Borrowed(id.as_str())),
            other => key_text(other).ok().map(Cow::Owned),
        }
    }

    pub fn payload(&self) -> &Mapping {
        &self.payload
    }

    pub fn to_value(&self) -> Value {
        Value::Mapping(self.payload.clone())
    }
}
