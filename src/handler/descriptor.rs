//! Declared metadata of a handler

use serde::Serialize;
use std::collections::BTreeSet;

use super::status::ErrorStatus;

/// Documentation-facing settings chosen when a handler is built
#[derive(Debug, Clone, Default, Serialize)]
pub struct HandlerConfig {
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub deprecated: bool,
    pub expected_errors: BTreeSet<ErrorStatus>,
}

impl HandlerConfig {
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }
}

/// Everything the routing layer may know about a handler without knowing
/// its operation's types
#[derive(Debug, Clone, Serialize)]
pub struct HandlerDescriptor {
    #[serde(flatten)]
    pub config: HandlerConfig,
    pub input_type: &'static str,
    pub output_type: &'static str,
}

impl HandlerDescriptor {
    pub fn tags(&self) -> &[String] {
        &self.config.tags
    }

    pub fn expected_errors(&self) -> impl Iterator<Item = ErrorStatus> + '_ {
        self.config.expected_errors.iter().copied()
    }

    pub fn declares(&self, status: ErrorStatus) -> bool {
        self.config.expected_errors.contains(&status)
    }
}
