//! Query document construction and execution.

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use graphfetch_client::HttpClient;

use crate::case;
use crate::config::{AuthStrategy, ServiceConfig};
use crate::error::{Error, ErrorKind, Result};
use crate::params::Params;
use crate::selection::{self, Selection};

/// One GraphQL query bound to a service, an action and its parameters.
///
/// Rendering is a pure function of the inputs; [`Query::get`] performs one
/// HTTP round-trip and decodes the response envelope. Retry behavior is the
/// caller's concern (see [`crate::Fetcher`]).
#[derive(Debug)]
pub struct Query {
    config: ServiceConfig,
    action: String,
    params: Params,
    locale: Option<String>,
    variables: Map<String, Value>,
    client: HttpClient,
}

impl Query {
    /// Create a query for the given service, action and parameters.
    pub fn new(config: ServiceConfig, action: impl Into<String>, params: Params) -> Result<Self> {
        let client = HttpClient::new(config.http.clone())?;
        Ok(Self {
            config,
            action: action.into(),
            params,
            locale: None,
            variables: Map::new(),
            client,
        })
    }

    /// The action name as given (host naming convention).
    pub fn action(&self) -> &str {
        &self.action
    }

    /// The action name as it appears on the wire.
    pub fn action_field(&self) -> String {
        case::lower_camel(&self.action)
    }

    /// Set the locale forwarded as `Accept-Language`.
    ///
    /// A blank locale is a no-op: the prior value is retained.
    pub fn set_locale(&mut self, locale: impl Into<String>) {
        let locale = locale.into();
        if !locale.trim().is_empty() {
            self.locale = Some(locale);
        }
    }

    /// The currently configured locale.
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Merge variables into the query.
    ///
    /// Later merges override keys present in both maps and preserve keys
    /// present only in the prior map.
    pub fn merge_variables(&mut self, variables: Map<String, Value>) {
        for (key, value) in variables {
            self.variables.insert(key, value);
        }
    }

    /// The accumulated variables.
    pub fn variables(&self) -> &Map<String, Value> {
        &self.variables
    }

    /// Render the query document for the given selection.
    pub fn document(&self, selection: &[Selection]) -> String {
        let mut doc = format!("{{ {}", self.action_field());
        match self.params.render() {
            Some(args) => {
                doc.push('(');
                doc.push_str(&args);
                doc.push_str(") {");
            }
            None => doc.push_str(" {"),
        }
        doc.push(' ');
        doc.push_str(&selection::render(selection));
        doc.push_str(" } }");
        doc
    }

    /// Execute the query and return the decoded payload.
    ///
    /// The payload is the content of `data.<actionField>` with all keys
    /// translated to snake_case; `Ok(None)` means the server reported no
    /// data (absent or null).
    #[instrument(skip(self, selection), fields(action = %self.action))]
    pub async fn get(&self, selection: &[Selection]) -> Result<Option<Value>> {
        let document = self.document(selection);
        debug!(%document, "executing query");

        let mut request = self
            .client
            .get(&self.config.url)
            .query("query", document);

        if !self.variables.is_empty() {
            let encoded = serde_json::to_string(&self.variables)
                .map_err(graphfetch_client::Error::from)?;
            request = request.query("variables", encoded);
        }

        if let Some(token) = self.bearer_token()? {
            request = request.bearer_auth(token);
        }

        if let Some(locale) = &self.locale {
            request = request.header("Accept-Language", locale);
        }

        let response = self.client.execute(request).await?;
        let body: Value = response.json().await?;

        self.decode(body)
    }

    fn bearer_token(&self) -> Result<Option<String>> {
        match &self.config.auth {
            Some(auth) if auth.strategy == AuthStrategy::Bearer => {
                Ok(Some(auth.encoder.encode()?))
            }
            _ => Ok(None),
        }
    }

    fn decode(&self, body: Value) -> Result<Option<Value>> {
        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let messages = errors
                    .iter()
                    .map(|e| {
                        let e = case::keys_to_snake(e);
                        e.get("message")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string()
                    })
                    .collect();
                return Err(Error::new(ErrorKind::Server(messages)));
            }
        }

        let data = match body.get("data") {
            None | Some(Value::Null) | Some(Value::Bool(false)) => return Ok(None),
            Some(data) => data,
        };

        match data.get(self.action_field().as_str()) {
            None | Some(Value::Null) => Ok(None),
            Some(payload) => Ok(Some(case::keys_to_snake(payload))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_query(params: Params) -> Query {
        Query::new(
            ServiceConfig::new("http://localhost/graphql"),
            "some_long_action_name",
            params,
        )
        .unwrap()
    }

    fn sample_params() -> Params {
        Params::new()
            .set("some_long_param_name1", "value1")
            .set("some_long_param_name2", "value2")
    }

    fn sample_selection() -> Vec<Selection> {
        vec![
            Selection::field("attr1"),
            Selection::nested(
                "object",
                vec![
                    Selection::field("nested_attr"),
                    Selection::nested("nested_object", vec![Selection::field("super_nested_attr")]),
                ],
            ),
            Selection::field("attr2"),
        ]
    }

    #[test]
    fn test_action_field() {
        let query = sample_query(Params::new());
        assert_eq!(query.action_field(), "someLongActionName");
    }

    #[test]
    fn test_document_with_params() {
        let query = sample_query(sample_params());
        assert_eq!(
            query.document(&sample_selection()),
            "{ someLongActionName(someLongParamName1: \"value1\", someLongParamName2: \"value2\") \
             { attr1, object { nestedAttr, nestedObject { superNestedAttr } }, attr2 } }"
        );
    }

    #[test]
    fn test_document_without_params() {
        let query = sample_query(Params::new());
        assert_eq!(
            query.document(&sample_selection()),
            "{ someLongActionName { attr1, object { nestedAttr, nestedObject { superNestedAttr } }, attr2 } }"
        );
    }

    #[test]
    fn test_document_with_empty_selection() {
        let query = sample_query(Params::new());
        assert_eq!(query.document(&[]), "{ someLongActionName {  } }");
    }

    #[test]
    fn test_set_locale_ignores_blank() {
        let mut query = sample_query(Params::new());
        query.set_locale("en");
        query.set_locale("");
        query.set_locale("   ");
        assert_eq!(query.locale(), Some("en"));
    }

    #[test]
    fn test_merge_variables_overrides_and_preserves() {
        let mut query = sample_query(Params::new());

        let first: Map<String, Value> = [("withFriends".to_string(), json!(true))]
            .into_iter()
            .collect();
        query.merge_variables(first);

        let second: Map<String, Value> = [
            ("skip".to_string(), json!(20)),
            ("limit".to_string(), json!(10)),
        ]
        .into_iter()
        .collect();
        query.merge_variables(second);

        assert_eq!(query.variables().len(), 3);
        assert_eq!(query.variables()["withFriends"], json!(true));
        assert_eq!(query.variables()["skip"], json!(20));
        assert_eq!(query.variables()["limit"], json!(10));

        let third: Map<String, Value> = [("limit".to_string(), json!(50))].into_iter().collect();
        query.merge_variables(third);
        assert_eq!(query.variables()["limit"], json!(50));
        assert_eq!(query.variables().len(), 3);
    }

    #[test]
    fn test_decode_data_payload_translates_keys() {
        let query = sample_query(Params::new());
        let body = json!({"data": {"someLongActionName": {"someExpected": "data"}}});

        let payload = query.decode(body).unwrap().unwrap();
        assert_eq!(payload, json!({"some_expected": "data"}));
    }

    #[test]
    fn test_decode_missing_or_null_data() {
        let query = sample_query(Params::new());

        assert!(query.decode(json!({})).unwrap().is_none());
        assert!(query.decode(json!({"data": null})).unwrap().is_none());
        assert!(query
            .decode(json!({"data": {"someLongActionName": null}}))
            .unwrap()
            .is_none());
        assert!(query
            .decode(json!({"data": {"otherAction": {"a": 1}}}))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_decode_errors_wins_over_data() {
        let query = sample_query(Params::new());
        let body = json!({
            "data": {"someLongActionName": {"someExpected": "data"}},
            "errors": [{"message": "message1"}, {"message": "message2"}]
        });

        let err = query.decode(body).unwrap_err();
        assert!(err.to_string().contains("\"message1\", \"message2\""));
    }

    #[test]
    fn test_decode_empty_errors_array_is_not_an_error() {
        let query = sample_query(Params::new());
        let body = json!({"errors": [], "data": {"someLongActionName": {"a": 1}}});

        assert_eq!(query.decode(body).unwrap(), Some(json!({"a": 1})));
    }
}
