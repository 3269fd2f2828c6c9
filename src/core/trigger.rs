//! Trigger translation from simplified match rules to GitHub `on:` blocks

use crate::core::error::{WorkflowError, WorkflowResult};
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::warn;

const TAG_PREFIX: &str = "refs/tags/";
const BRANCH_PREFIX: &str = "refs/heads/";
const MATCH_ALL: &str = ".*";
const ALL_BRANCHES: &str = "**";
const ALL_TAGS: &str = "*";

/// Tag pattern shorthands understood after `refs/tags/`
const TAG_SHORTHANDS: &[(&str, &[&str])] = &[(MATCH_ALL, &["*"])];

/// Event that fires a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Push,
    Release,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Push => "push",
            EventKind::Release => "release",
        }
    }
}

impl FromStr for EventKind {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "push" => Ok(EventKind::Push),
            "release" => Ok(EventKind::Release),
            other => Err(WorkflowError::UnsupportedEventKind(other.to_string())),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Native trigger condition of a workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerCondition {
    /// Pushes to any branch or tag, written as the single globs
    /// `branches: '**'` and `tags: '*'`
    AllRefs,
    /// Push events, optionally filtered by branch and tag globs.
    /// Both lists empty means every push.
    Push {
        branches: Vec<String>,
        tags: Vec<String>,
    },
    /// Every release event
    Release,
}

impl TriggerCondition {
    /// Render as the value of the `on` key
    pub fn to_value(&self) -> Value {
        let mut on = Mapping::new();
        match self {
            TriggerCondition::AllRefs => {
                let mut push = Mapping::new();
                push.insert("branches".into(), ALL_BRANCHES.into());
                push.insert("tags".into(), ALL_TAGS.into());
                on.insert("push".into(), Value::Mapping(push));
            }
            TriggerCondition::Push { branches, tags } => {
                let mut push = Mapping::new();
                if !branches.is_empty() {
                    push.insert("branches".into(), string_seq(branches));
                }
                if !tags.is_empty() {
                    push.insert("tags".into(), string_seq(tags));
                }
                on.insert("push".into(), Value::Mapping(push));
            }
            TriggerCondition::Release => {
                on.insert("release".into(), Value::Null);
            }
        }
        Value::Mapping(on)
    }

    pub fn event_kind(&self) -> EventKind {
        match self {
            TriggerCondition::AllRefs | TriggerCondition::Push { .. } => EventKind::Push,
            TriggerCondition::Release => EventKind::Release,
        }
    }
}

fn string_seq(items: &[String]) -> Value {
    Value::Sequence(items.iter().cloned().map(Value::String).collect())
}

fn alternation() -> &'static Regex {
    static ALTERNATION: OnceLock<Regex> = OnceLock::new();
    ALTERNATION.get_or_init(|| Regex::new(r"^\(([^()]*)\)$").expect("static regex"))
}

/// Translate an event kind and simplified ref pattern into a trigger
pub fn translate(event_kind: &str, pattern: &str) -> WorkflowResult<TriggerCondition> {
    match event_kind.parse::<EventKind>()? {
        EventKind::Release => Ok(TriggerCondition::Release),
        EventKind::Push => translate_push(pattern),
    }
}

fn translate_push(pattern: &str) -> WorkflowResult<TriggerCondition> {
    if pattern == MATCH_ALL {
        return Ok(TriggerCondition::AllRefs);
    }

    if let Some(tag_pattern) = pattern.strip_prefix(TAG_PREFIX) {
        let tags = TAG_SHORTHANDS
            .iter()
            .find(|(shorthand, _)| *shorthand == tag_pattern)
            .map(|(_, globs)| globs.iter().map(|g| g.to_string()).collect())
            .ok_or_else(|| WorkflowError::UnknownPatternShorthand(tag_pattern.to_string()))?;
        return Ok(TriggerCondition::Push {
            branches: Vec::new(),
            tags,
        });
    }

    if let Some(branch_pattern) = pattern.strip_prefix(BRANCH_PREFIX) {
        let branches = if branch_pattern == MATCH_ALL {
            vec![ALL_BRANCHES.to_string()]
        } else if let Some(captures) = alternation().captures(branch_pattern) {
            captures[1].split('|').map(str::to_string).collect()
        } else {
            vec![branch_pattern.to_string()]
        };
        return Ok(TriggerCondition::Push {
            branches,
            tags: Vec::new(),
        });
    }

    warn!("Pattern '{}' has no refs/heads/ or refs/tags/ prefix, triggering on every push", pattern);
    Ok(TriggerCondition::Push {
        branches: Vec::new(),
        tags: Vec::new(),
    })
}
