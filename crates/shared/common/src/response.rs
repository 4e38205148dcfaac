//! Uniform operation outcome: `{success, data?, error?}`.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Standard response wrapper for every data access operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable error code (see [`AppError::code`])
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl<T> ActionResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
        }
    }

    pub fn failure(err: &AppError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.user_message()),
            code: Some(err.code().to_string()),
        }
    }

    /// Transform the payload, keeping the outcome
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ActionResponse<U> {
        ActionResponse {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
            code: self.code,
        }
    }
}

impl ActionResponse<()> {
    /// Successful outcome with no payload
    pub fn done() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            code: None,
        }
    }

    /// Like the `From<AppResult<T>>` conversion, but omits the unit payload
    pub fn from_unit(result: AppResult<()>) -> Self {
        match result {
            Ok(()) => ActionResponse::done(),
            Err(err) => ActionResponse::failure(&err),
        }
    }
}

impl<T> From<AppResult<T>> for ActionResponse<T> {
    fn from(result: AppResult<T>) -> Self {
        match result {
            Ok(data) => ActionResponse::success(data),
            Err(err) => ActionResponse::failure(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        let res: ActionResponse<u32> = Ok(7).into();
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 7}));
    }

    #[test]
    fn test_failure_shape() {
        let res: ActionResponse<u32> = Err(AppError::not_found("Task")).into();
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "Task not found", "code": "NOT_FOUND"})
        );
    }

    #[test]
    fn test_done_has_no_data() {
        let json = serde_json::to_value(ActionResponse::done()).unwrap();
        assert_eq!(json, serde_json::json!({"success": true}));
    }
}
