// ABOUTME: Binding model, a durable fingerprint of the session a saved pane displayed
// Bindings outlive session processes and are matched against live sessions on restore

use serde::{Deserialize, Serialize};

use super::session::SessionHandle;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub project_path: String,
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_host: Option<String>,
}

impl Binding {
    pub fn new(project_path: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self {
            project_path: project_path.into(),
            project_name: project_name.into(),
            custom_label: None,
            tool: None,
            remote_host: None,
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

    pub fn label(&self) -> &str {
        self.custom_label.as_deref().unwrap_or(&self.project_name)
    }
}

impl From<&SessionHandle> for Binding {
    fn from(session: &SessionHandle) -> Self {
        Self {
            project_path: session.project_path.clone(),
            project_name: session.title.clone(),
            custom_label: session.custom_label.clone(),
            tool: session.tool.clone(),
            remote_host: session.remote_host.clone(),
        }
    }
}
