//! JSON-RPC 2.0 message types for the banking MCP surface.
//!
//! One JSON object per line in each direction. All messages follow the
//! JSON-RPC 2.0 specification.
//!
//! # Request Identifiers
//!
//! The request `id` is an opaque JSON value. It is echoed back verbatim in
//! the response, and a request without an id still receives exactly one
//! response. Responses to lines whose id could not be determined carry an
//! explicit `null` id.
//!
//! # Error Taxonomy
//!
//! Error codes are stable and distinct per condition so callers can branch
//! programmatically: the standard JSON-RPC transport codes plus
//! server-defined codes for the banking domain (account not found,
//! currency mismatch, insufficient funds).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The JSON-RPC protocol version tag accepted and emitted by this server.
pub const JSONRPC_VERSION: &str = "2.0";

/// A JSON-RPC 2.0 request frame.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    /// Must be "2.0".
    pub jsonrpc: String,

    /// Opaque request identifier, echoed back unchanged. Absent ids stay
    /// absent in the response.
    #[serde(default)]
    pub id: Option<Value>,

    /// The method to invoke.
    pub method: String,

    /// Optional parameters for the method.
    #[serde(default)]
    pub params: Option<Value>,
}

/// A successful JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The request ID this response corresponds to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// The result of the method call.
    pub result: Value,
}

impl JsonRpcResponse {
    /// Creates a new success response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Value is not const-compatible
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result,
        }
    }
}

/// Stable error codes distinguishing the protocol's failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid JSON, wrong/missing protocol version, or a failed read.
    ParseError,
    /// Invalid or missing method/tool parameters.
    InvalidParams,
    /// Unknown method, tool, or resource.
    MethodNotFound,
    /// Internal serialisation failure.
    InternalError,
    /// Referenced account does not exist.
    AccountNotFound,
    /// Transfer currency does not match the accounts' currency.
    CurrencyMismatch,
    /// Source account cannot cover the requested amount.
    InsufficientFunds,
}

impl ErrorCode {
    /// Returns the numeric code for this error.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidParams => -32602,
            Self::MethodNotFound => -32601,
            Self::InternalError => -32603,
            Self::AccountNotFound => -32004,
            Self::CurrencyMismatch => -32002,
            Self::InsufficientFunds => -32001,
        }
    }

    /// Returns the default message for this error code.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::ParseError => "Parse error",
            Self::InvalidParams => "Invalid params",
            Self::MethodNotFound => "Method not found",
            Self::InternalError => "Internal error",
            Self::AccountNotFound => "Account not found",
            Self::CurrencyMismatch => "Currency mismatch",
            Self::InsufficientFunds => "Insufficient funds",
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcErrorData {
    /// The error code.
    pub code: i32,

    /// A short description of the error.
    pub message: String,

    /// Additional information about the error (offending id, field value,
    /// or raw line).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcErrorData {
    /// Creates a new error from an error code.
    #[must_use]
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code: code.code(),
            message: code.default_message().to_string(),
            data: None,
        }
    }

    /// Creates a new error with a custom message.
    #[must_use]
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
            data: None,
        }
    }

    /// Adds additional data to the error.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// A JSON-RPC 2.0 error response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// Echo of the request id; an explicit JSON `null` for lines whose id
    /// could not be determined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// The error details.
    pub error: JsonRpcErrorData,
}

impl JsonRpcError {
    /// Creates a new error response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // JsonRpcErrorData contains String
    pub fn new(id: Option<Value>, error: JsonRpcErrorData) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            error,
        }
    }

    /// Creates a parse error response carrying the offending raw line.
    ///
    /// The id cannot be determined, so the response carries a `null` id.
    #[must_use]
    pub fn parse_error(line: &str) -> Self {
        Self::new(
            Some(Value::Null),
            JsonRpcErrorData::from_code(ErrorCode::ParseError)
                .with_data(Value::String(line.to_string())),
        )
    }

    /// Creates a read error response for a transport failure short of EOF.
    #[must_use]
    pub fn read_error(detail: &str) -> Self {
        Self::new(
            Some(Value::Null),
            JsonRpcErrorData::with_message(ErrorCode::ParseError, "Read error")
                .with_data(Value::String(detail.to_string())),
        )
    }

    /// Creates a method not found error carrying the offending method name.
    #[must_use]
    pub fn method_not_found(id: Option<Value>, method: &str) -> Self {
        Self::new(
            id,
            JsonRpcErrorData::from_code(ErrorCode::MethodNotFound)
                .with_data(Value::String(method.to_string())),
        )
    }

    /// Creates an invalid params error response.
    #[must_use]
    pub fn invalid_params(id: Option<Value>, message: impl Into<String>) -> Self {
        Self::new(
            id,
            JsonRpcErrorData::with_message(ErrorCode::InvalidParams, message),
        )
    }

    /// Creates an internal error response.
    #[must_use]
    pub fn internal_error(id: Option<Value>, message: impl Into<String>) -> Self {
        Self::new(
            id,
            JsonRpcErrorData::with_message(ErrorCode::InternalError, message),
        )
    }
}

/// Parses one input line into a request frame.
///
/// # Errors
///
/// Returns a parse error response (null id, raw line as data) if the line
/// is not valid JSON, is not a request object, or does not carry the
/// "2.0" protocol version tag.
pub fn parse_request(line: &str) -> Result<JsonRpcRequest, JsonRpcError> {
    let request: JsonRpcRequest =
        serde_json::from_str(line).map_err(|_| JsonRpcError::parse_error(line))?;

    if request.jsonrpc != JSONRPC_VERSION {
        return Err(JsonRpcError::parse_error(line));
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_valid_request() {
        let line = r#"{"jsonrpc": "2.0", "id": 1, "method": "ping"}"#;
        let req = parse_request(line).unwrap();

        assert_eq!(req.id, Some(json!(1)));
        assert_eq!(req.method, "ping");
        assert!(req.params.is_none());
    }

    #[test]
    fn parse_string_id() {
        let line = r#"{"jsonrpc": "2.0", "id": "abc-123", "method": "ping"}"#;
        let req = parse_request(line).unwrap();
        assert_eq!(req.id, Some(json!("abc-123")));
    }

    #[test]
    fn parse_missing_id() {
        let line = r#"{"jsonrpc": "2.0", "method": "ping"}"#;
        let req = parse_request(line).unwrap();
        assert!(req.id.is_none());
    }

    #[test]
    fn parse_invalid_json() {
        let line = "not valid json";
        let err = parse_request(line).unwrap_err();

        assert_eq!(err.error.code, ErrorCode::ParseError.code());
        assert_eq!(err.id, Some(Value::Null));
        assert_eq!(err.error.data, Some(json!(line)));
    }

    #[test]
    fn parse_missing_jsonrpc() {
        let line = r#"{"id": 1, "method": "ping"}"#;
        let err = parse_request(line).unwrap_err();
        assert_eq!(err.error.code, ErrorCode::ParseError.code());
    }

    #[test]
    fn parse_wrong_jsonrpc_version() {
        let line = r#"{"jsonrpc": "1.0", "id": 1, "method": "ping"}"#;
        let err = parse_request(line).unwrap_err();
        assert_eq!(err.error.code, ErrorCode::ParseError.code());
    }

    #[test]
    fn serialise_success_response() {
        let response = JsonRpcResponse::success(Some(json!(1)), json!({"ok": true}));
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""jsonrpc":"2.0""#));
        assert!(json.contains(r#""id":1"#));
        assert!(json.contains(r#""result":{"ok":true}"#));
    }

    #[test]
    fn serialise_response_without_id_omits_field() {
        let response = JsonRpcResponse::success(None, json!({}));
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains(r#""id""#));
    }

    #[test]
    fn serialise_parse_error_has_null_id() {
        let error = JsonRpcError::parse_error("garbage");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains(r#""id":null"#));
        assert!(json.contains(r#""code":-32700"#));
        assert!(json.contains("garbage"));
    }

    #[test]
    fn serialise_method_not_found_carries_method() {
        let error = JsonRpcError::method_not_found(Some(json!(1)), "unknown/method");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains(r#""code":-32601"#));
        assert!(json.contains("unknown/method"));
    }

    #[test]
    fn error_codes_are_distinct_and_stable() {
        assert_eq!(ErrorCode::ParseError.code(), -32700);
        assert_eq!(ErrorCode::InvalidParams.code(), -32602);
        assert_eq!(ErrorCode::MethodNotFound.code(), -32601);
        assert_eq!(ErrorCode::InternalError.code(), -32603);
        assert_eq!(ErrorCode::AccountNotFound.code(), -32004);
        assert_eq!(ErrorCode::CurrencyMismatch.code(), -32002);
        assert_eq!(ErrorCode::InsufficientFunds.code(), -32001);
    }
}
