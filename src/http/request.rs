use std::collections::HashMap;

use serde::Serialize;

use super::method::HttpMethod;
use crate::error::Result;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// One request against the pet store, described relative to the base URL.
#[derive(Debug, Clone)]
pub struct RequestInput {
    pub method: HttpMethod,
    pub path: String,
    pub path_params: HashMap<String, String>,
    pub query: Vec<(String, String)>,
    pub accept: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<String>,
}

impl RequestInput {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            path_params: HashMap::new(),
            query: Vec::new(),
            accept: None,
            content_type: None,
            body: None,
        }
    }

    pub fn path_param(mut self, name: &str, value: impl ToString) -> Self {
        self.path_params.insert(name.to_string(), value.to_string());
        self
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn accept_json(mut self) -> Self {
        self.accept = Some(JSON_CONTENT_TYPE.to_string());
        self
    }

    /// Declare a JSON payload without attaching one.
    pub fn content_type_json(mut self) -> Self {
        self.content_type = Some(JSON_CONTENT_TYPE.to_string());
        self
    }

    pub fn json_body<T: Serialize>(self, body: &T) -> Result<Self> {
        let raw = serde_json::to_string(body)?;
        let mut input = self.content_type_json();
        input.body = Some(raw);
        Ok(input)
    }

    pub fn text_body(mut self, body: impl Into<String>) -> Self {
        self.content_type = Some(TEXT_CONTENT_TYPE.to_string());
        self.body = Some(body.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_body_sets_content_type() {
        let input = RequestInput::new(HttpMethod::Post, "/pet")
            .json_body(&serde_json::json!({"id": 1}))
            .unwrap();
        assert_eq!(input.content_type.as_deref(), Some(JSON_CONTENT_TYPE));
        assert_eq!(input.body.as_deref(), Some(r#"{"id":1}"#));
    }

    #[test]
    fn content_type_without_body() {
        let input = RequestInput::new(HttpMethod::Post, "/pet").content_type_json();
        assert_eq!(input.content_type.as_deref(), Some(JSON_CONTENT_TYPE));
        assert!(input.body.is_none());
    }

    #[test]
    fn query_pairs_keep_insertion_order() {
        let input = RequestInput::new(HttpMethod::Get, "/pet/findByStatus")
            .query("status", "sold")
            .query("status", "pending");
        assert_eq!(
            input.query,
            vec![
                ("status".to_string(), "sold".to_string()),
                ("status".to_string(), "pending".to_string()),
            ]
        );
    }
}
