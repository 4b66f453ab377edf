//! Retry-wrapped fetching and payload-to-model wrapping.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

use graphfetch_client::{retry, RetryConfig};

use crate::config::ServiceConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::params::Params;
use crate::query::Query;
use crate::selection::Selection;

/// The result of a fetch: nothing, one model value, or an ordered sequence.
///
/// An absent or empty-object payload is `None`; an array payload is always
/// `Many`, even when empty — the two "no result" outcomes stay
/// distinguishable by the original payload shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<M> {
    /// No result.
    None,
    /// A single model value.
    One(M),
    /// An ordered sequence of model values.
    Many(Vec<M>),
}

impl<M> Fetched<M> {
    /// Returns true if nothing was fetched.
    pub fn is_none(&self) -> bool {
        matches!(self, Fetched::None)
    }

    /// The single value, if exactly one was fetched.
    pub fn one(self) -> Option<M> {
        match self {
            Fetched::One(value) => Some(value),
            _ => None,
        }
    }

    /// The fetched values as a sequence: one value becomes a one-element
    /// sequence, no result becomes an empty sequence.
    pub fn many(self) -> Vec<M> {
        match self {
            Fetched::None => Vec::new(),
            Fetched::One(value) => vec![value],
            Fetched::Many(values) => values,
        }
    }
}

/// Binds a model type, an action and parameters to a configured service.
///
/// Each fetch renders the query, executes it under the resolved retry
/// policy, and wraps the decoded payload into model values. Instances hold
/// no cache; every fetch hits the network.
#[derive(Debug)]
pub struct Fetcher<M> {
    query: Query,
    retry: RetryConfig,
    _model: PhantomData<M>,
}

impl<M: DeserializeOwned> Fetcher<M> {
    /// Create a fetcher for the given service, action and parameters.
    ///
    /// The retry knob is resolved once here; later config changes do not
    /// affect an existing fetcher.
    pub fn new(config: ServiceConfig, action: impl Into<String>, params: Params) -> Result<Self> {
        let retry = config.retriable.resolve();
        let query = Query::new(config, action, params)?;
        Ok(Self {
            query,
            retry,
            _model: PhantomData,
        })
    }

    /// Forward the given locale on every subsequent fetch.
    ///
    /// A blank locale retains the prior value.
    pub fn in_locale(mut self, locale: impl Into<String>) -> Self {
        self.query.set_locale(locale);
        self
    }

    /// Merge variables into the query; they persist across fetch calls.
    pub fn with_variables(mut self, variables: serde_json::Map<String, Value>) -> Self {
        self.query.merge_variables(variables);
        self
    }

    /// The underlying query.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// The resolved retry configuration.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Execute the query for the given selection and wrap the payload.
    #[instrument(skip(self, selection), fields(action = %self.query.action()))]
    pub async fn fetch(&self, selection: &[Selection]) -> Result<Fetched<M>> {
        let payload = retry::run(&self.retry, || self.query.get(selection)).await?;
        wrap(payload)
    }
}

/// Map a decoded payload onto the model type.
fn wrap<M: DeserializeOwned>(payload: Option<Value>) -> Result<Fetched<M>> {
    match payload {
        None => Ok(Fetched::None),
        Some(Value::Object(map)) if map.is_empty() => Ok(Fetched::None),
        Some(Value::Object(map)) => {
            let value = serde_json::from_value(Value::Object(map))?;
            Ok(Fetched::One(value))
        }
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(Error::from))
            .collect::<Result<Vec<_>>>()
            .map(Fetched::Many),
        Some(other) => Err(Error::new(ErrorKind::UnexpectedPayload(other.to_string()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use serde_json::json;

    fn payload(value: Value) -> Option<Value> {
        Some(value)
    }

    #[test]
    fn test_wrap_object_payload() {
        let fetched: Fetched<Record> = wrap(payload(json!({
            "field": "value",
            "nested_object": {"field": "value"}
        })))
        .unwrap();

        let record = fetched.one().unwrap();
        assert_eq!(record.get_str("field"), Some("value"));
        assert_eq!(
            record
                .get_record("nested_object")
                .unwrap()
                .get_str("field"),
            Some("value")
        );
    }

    #[test]
    fn test_wrap_array_payload_preserves_order() {
        let fetched: Fetched<Record> = wrap(payload(json!([
            {"field": "value1"},
            {"field": "value2"}
        ])))
        .unwrap();

        let records = fetched.many();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get_str("field"), Some("value1"));
        assert_eq!(records[1].get_str("field"), Some("value2"));
    }

    #[test]
    fn test_wrap_empty_shapes() {
        // Empty object and absent payload mean "nothing".
        let fetched: Fetched<Record> = wrap(payload(json!({}))).unwrap();
        assert!(fetched.is_none());

        let fetched: Fetched<Record> = wrap(None).unwrap();
        assert!(fetched.is_none());

        // An empty array stays a sequence.
        let fetched: Fetched<Record> = wrap(payload(json!([]))).unwrap();
        assert_eq!(fetched, Fetched::Many(vec![]));
    }

    #[test]
    fn test_wrap_unexpected_payload_fails() {
        let result: Result<Fetched<Record>> = wrap(payload(json!(42)));
        let err = result.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnexpectedPayload(_)));

        let result: Result<Fetched<Record>> = wrap(payload(json!("plain string")));
        assert!(result.is_err());
    }

    #[test]
    fn test_wrap_into_typed_model() {
        #[derive(Debug, serde::Deserialize, PartialEq)]
        struct User {
            first_name: String,
            age: u32,
        }

        let fetched: Fetched<User> =
            wrap(payload(json!({"first_name": "Ada", "age": 36}))).unwrap();

        assert_eq!(
            fetched.one().unwrap(),
            User {
                first_name: "Ada".to_string(),
                age: 36
            }
        );
    }

    #[test]
    fn test_wrap_decode_mismatch_is_an_error() {
        #[derive(Debug, serde::Deserialize)]
        struct User {
            #[allow(dead_code)]
            first_name: String,
        }

        let result: Result<Fetched<User>> = wrap(payload(json!({"age": 36})));
        let err = result.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Decode(_)));
    }

    #[test]
    fn test_fetched_accessors() {
        let one: Fetched<u32> = Fetched::One(1);
        assert_eq!(one.clone().one(), Some(1));
        assert_eq!(one.many(), vec![1]);

        let none: Fetched<u32> = Fetched::None;
        assert!(none.is_none());
        assert_eq!(none.many(), Vec::<u32>::new());

        let many: Fetched<u32> = Fetched::Many(vec![1, 2]);
        assert_eq!(many.clone().one(), None);
        assert_eq!(many.many(), vec![1, 2]);
    }
}
