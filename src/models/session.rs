// ABOUTME: Session handle model as supplied by the session directory
// A handle describes one live terminal session that a pane can display

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a live session, owned by the session directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionHandle {
    pub id: SessionId,
    pub project_path: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_host: Option<String>,
    #[serde(default)]
    pub is_remote: bool,
}

impl SessionHandle {
    pub fn new(id: impl Into<SessionId>, project_path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            project_path: project_path.into(),
            title: title.into(),
            custom_label: None,
            tool: None,
            remote_host: None,
            is_remote: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.custom_label = Some(label.into());
        self
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }

    pub fn with_remote_host(mut self, host: impl Into<String>) -> Self {
        self.remote_host = Some(host.into());
        self.is_remote = true;
        self
    }

    /// Name shown in pane titles: the custom label when set, otherwise the title.
    pub fn display_name(&self) -> &str {
        self.custom_label.as_deref().unwrap_or(&self.title)
    }
}

/// Look up a handle by id in a caller-supplied pool.
pub fn find_session<'a>(pool: &'a [SessionHandle], id: &SessionId) -> Option<&'a SessionHandle> {
    pool.iter().find(|s| &s.id == id)
}
