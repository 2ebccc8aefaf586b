pub mod course_form;
pub mod course_list;
pub mod instance_form;
pub mod instance_list;
pub mod layout;

use tracing::error;

use crate::error::ApiError;

/// Outcome of a view's activation fetch. A page is rendered only after its
/// fetch settles, so there is no loading variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Loaded(T),
    Failed(String),
}

impl<T> Fetched<T> {
    /// Logs the failure under `what` and keeps only the fixed user-facing message.
    pub fn from_result(result: Result<T, ApiError>, what: &str, message: &str) -> Self {
        match result {
            Ok(data) => Fetched::Loaded(data),
            Err(e) => {
                error!("Error fetching {}: {}", what, e);
                Fetched::Failed(message.to_string())
            }
        }
    }
}

/// A refused delete, carried across the redirect back to the list as
/// `?alert=<code>` so a refresh never repeats the delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteAlert {
    Conflict,
    Failed,
}

impl DeleteAlert {
    pub fn code(self) -> &'static str {
        match self {
            DeleteAlert::Conflict => "conflict",
            DeleteAlert::Failed => "failed",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "conflict" => Some(DeleteAlert::Conflict),
            "failed" => Some(DeleteAlert::Failed),
            _ => None,
        }
    }

    /// `path` with this alert attached.
    pub fn redirect_path(self, path: &str) -> String {
        format!("{}?alert={}", path, self.code())
    }
}
