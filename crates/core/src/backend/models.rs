//! Request and response bodies of the ATF backend.

use atf_protocol::chat_models::ChatMessage;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the exported workbook path inside the result set.
pub const EXCEL_FILE_KEY: &str = "excel_file";

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RunAgentsRequest {
    pub file_name: String,
}

/// Body of a successful `POST /run-all-agents`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RunAgentsResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub file_name: Option<String>,

    /// Agent payloads keyed by result key, plus `test_coverage` and
    /// `excel_file` when the backend produced them.
    #[serde(default)]
    pub results: Map<String, Value>,

    #[serde(default)]
    pub timestamp: Option<String>,
}

impl RunAgentsResponse {
    pub fn excel_file(&self) -> Option<&str> {
        self.results.get(EXCEL_FILE_KEY).and_then(Value::as_str)
    }
}

/// Body of `GET /output-path`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputPaths {
    pub output_path: String,
    #[serde(default)]
    pub user_story_path: Option<String>,
    #[serde(default)]
    pub test_cases_path: Option<String>,
    #[serde(default)]
    pub test_data_path: Option<String>,
    #[serde(default)]
    pub test_coverage_path: Option<String>,
    #[serde(default)]
    pub excel_path: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FileContext {
    pub file_name: Option<String>,
    /// RFC 3339 time the request was built.
    pub timestamp: String,
}

/// Body of `POST /chat`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub file_context: FileContext,
    pub agent_results: Map<String, Value>,
    pub chat_history: Vec<ChatMessage>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub response: String,
}
