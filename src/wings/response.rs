use serde_json::{Map, Value};

use crate::errors::WingsError;

/// Decoded daemon response body: an ordered key map.
///
/// Top-level JSON arrays are stored keyed by element index (`"0"`, `"1"`, ...).
pub type ResponseData = Map<String, Value>;

/// Decoded body plus the HTTP status it arrived with
#[derive(Debug, Clone, PartialEq)]
pub struct WingsResponse {
    data: ResponseData,
    status_code: u16,
}

impl WingsResponse {
    pub fn new(data: ResponseData, status_code: u16) -> Self {
        Self { data, status_code }
    }

    /// `{"error": <message>}` carrying the status the caller wants to report
    pub fn from_error(err: &WingsError, status_code: u16) -> Self {
        let mut data = Map::new();
        data.insert("error".to_string(), Value::String(err.message().to_string()));
        Self::new(data, status_code)
    }

    /// 2xx
    pub fn is_successful(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn data(&self) -> &ResponseData {
        &self.data
    }

    pub fn into_data(self) -> ResponseData {
        self.data
    }

    /// `error`, then `message`, then `"Unknown error"`
    pub fn error(&self) -> String {
        error_message(&self.data)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.data.get(key).unwrap_or(default)
    }

    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Values in insertion order
    pub fn items(&self) -> Vec<&Value> {
        self.data.values().collect()
    }
}

/// Human-readable error text from a decoded body
pub(crate) fn error_message(data: &ResponseData) -> String {
    // 非字符串的 error/message 按 JSON 文本输出，null 视为缺失
    ["error", "message"]
        .iter()
        .find_map(|key| match data.get(*key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        })
        .unwrap_or_else(|| "Unknown error".to_string())
}
