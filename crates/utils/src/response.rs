use serde::{Deserialize, Serialize};

/// JSON envelope used by every backend endpoint:
/// `{ "success": bool, "data": ..., "message": "...", "status": 200 }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
}

fn default_success() -> bool {
    true
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            status: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            status: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Unwraps the payload, or returns the envelope message when the backend
    /// reported a failure or sent no data.
    pub fn into_data(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(self
                .message
                .unwrap_or_else(|| "response carried no data".to_string())),
            (false, _) => Err(self
                .message
                .unwrap_or_else(|| "request was not successful".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success() {
        let envelope: ApiResponse<Vec<i32>> =
            serde_json::from_str(r#"{"success": true, "data": [1, 2], "message": "ok"}"#).unwrap();
        assert!(envelope.is_success());
        assert_eq!(envelope.into_data().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_envelope_failure_uses_message() {
        let envelope: ApiResponse<i32> =
            serde_json::from_str(r#"{"success": false, "message": "Blog no encontrado", "status": 404}"#)
                .unwrap();
        assert_eq!(envelope.status, Some(404));
        assert_eq!(envelope.into_data().unwrap_err(), "Blog no encontrado");
    }

    #[test]
    fn test_envelope_missing_data_is_none() {
        let envelope: ApiResponse<Vec<String>> =
            serde_json::from_str(r#"{"success": true, "message": "Eliminado"}"#).unwrap();
        assert!(envelope.data.is_none());
        assert_eq!(envelope.into_data().unwrap_err(), "Eliminado");
    }

    #[test]
    fn test_envelope_without_success_flag() {
        let envelope: ApiResponse<i32> = serde_json::from_str(r#"{"data": 5}"#).unwrap();
        assert_eq!(envelope.into_data().unwrap(), 5);
    }
}
