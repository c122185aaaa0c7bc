//! Request to operation input
//!
//! The input is assembled from three sources, in order, later keys
//! overriding earlier ones: the JSON body, the query string and the path
//! parameters. Body fields keep their JSON type. Query and path values stay
//! text until the target field asks for something else, so `?sku=12345`
//! fills a `String` field and `?limit=5` fills an integer one.

use axum::body::{to_bytes, Body};
use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, Path, Query, Request};
use axum::http::Uri;
use serde::de::{self, DeserializeOwned, DeserializeSeed, MapAccess, Unexpected, Visitor};
use serde::forward_to_deserialize_any;
use serde::Deserializer;
use serde_json::{Map, Value};
use std::collections::{btree_map, BTreeMap, HashMap};

use crate::handler::HandlerError;
use crate::trace_log;

/// Largest request body accepted for decoding
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Decode a whole request into an operation input
pub async fn decode_request<T: DeserializeOwned>(request: Request) -> Result<T, HandlerError> {
    let (mut parts, body) = request.into_parts();

    let path = match Path::<HashMap<String, String>>::from_request_parts(&mut parts, &()).await {
        Ok(Path(params)) => params,
        Err(PathRejection::MissingPathParams(_)) => HashMap::new(),
        Err(rejection) => return Err(HandlerError::Decode(rejection.body_text())),
    };
    let body = read_body(body).await?;

    let input = merge_sources(&body, &parts.uri, path)?;
    trace_log!(input = %input.to_value(), "decoded request input");
    input.decode()
}

async fn read_body(body: Body) -> Result<Vec<u8>, HandlerError> {
    to_bytes(body, MAX_BODY_BYTES)
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|e| HandlerError::Decode(format!("unreadable body: {e}")))
}

/// One input field, tagged with how it arrived
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Json(Value),
    Text(String),
}

/// The merged fields of one request, not yet bound to an input type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestInput {
    fields: BTreeMap<String, Field>,
}

impl RequestInput {
    pub fn get(&self, key: &str) -> Option<&Field> {
        self.fields.get(key)
    }

    /// Plain JSON view, with text fields as JSON strings
    pub fn to_value(&self) -> Value {
        let object = self
            .fields
            .iter()
            .map(|(key, field)| {
                let value = match field {
                    Field::Json(value) => value.clone(),
                    Field::Text(text) => Value::String(text.clone()),
                };
                (key.clone(), value)
            })
            .collect::<Map<String, Value>>();
        Value::Object(object)
    }

    pub fn decode<T: DeserializeOwned>(self) -> Result<T, HandlerError> {
        T::deserialize(self).map_err(|e| HandlerError::Decode(e.to_string()))
    }
}

/// Assemble the input from its three sources
pub fn merge_sources(
    body: &[u8],
    uri: &Uri,
    path: HashMap<String, String>,
) -> Result<RequestInput, HandlerError> {
    let mut fields = body_object(body)?
        .into_iter()
        .map(|(key, value)| (key, Field::Json(value)))
        .collect::<BTreeMap<_, _>>();

    for (key, raw) in query_pairs(uri)? {
        fields.insert(key, Field::Text(raw));
    }
    for (key, value) in path {
        fields.insert(key, Field::Text(value));
    }

    Ok(RequestInput { fields })
}

fn body_object(body: &[u8]) -> Result<Map<String, Value>, HandlerError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(HandlerError::Decode(
            "request body must be a JSON object".to_string(),
        )),
        Err(e) => Err(HandlerError::Decode(format!("malformed JSON body: {e}"))),
    }
}

fn query_pairs(uri: &Uri) -> Result<Vec<(String, String)>, HandlerError> {
    if uri.query().is_none() {
        return Ok(Vec::new());
    }
    Query::<Vec<(String, String)>>::try_from_uri(uri)
        .map(|Query(pairs)| pairs)
        .map_err(|rejection| HandlerError::Decode(rejection.body_text()))
}

impl<'de> Deserializer<'de> for RequestInput {
    type Error = serde_json::Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_map(FieldAccess {
            fields: self.fields.into_iter(),
            pending: None,
        })
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        enum identifier ignored_any
    }
}

struct FieldAccess {
    fields: btree_map::IntoIter<String, Field>,
    pending: Option<Field>,
}

impl<'de> MapAccess<'de> for FieldAccess {
    type Error = serde_json::Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, Self::Error> {
        match self.fields.next() {
            Some((key, field)) => {
                self.pending = Some(field);
                seed.deserialize(Value::String(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, Self::Error> {
        match self.pending.take() {
            Some(Field::Json(value)) => seed.deserialize(value),
            Some(Field::Text(text)) => seed.deserialize(Text(text)),
            None => Err(de::Error::custom("field value requested before its key")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}

/// A query or path value. Scalars are parsed only when the target asks for
/// one; everything else sees the raw text.
struct Text(String);

macro_rules! parse_text {
    ($($method:ident => $visit:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
                match self.0.parse::<$ty>() {
                    Ok(parsed) => visitor.$visit(parsed),
                    Err(_) => Err(de::Error::invalid_value(Unexpected::Str(&self.0), &visitor)),
                }
            }
        )*
    };
}

impl<'de> Deserializer<'de> for Text {
    type Error = serde_json::Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_string(self.0)
    }

    parse_text! {
        deserialize_bool => visit_bool(bool),
        deserialize_i8 => visit_i8(i8),
        deserialize_i16 => visit_i16(i16),
        deserialize_i32 => visit_i32(i32),
        deserialize_i64 => visit_i64(i64),
        deserialize_u8 => visit_u8(u8),
        deserialize_u16 => visit_u16(u16),
        deserialize_u32 => visit_u32(u32),
        deserialize_u64 => visit_u64(u64),
        deserialize_f32 => visit_f32(f32),
        deserialize_f64 => visit_f64(f64),
    }

    /// `?cursor=` with nothing after it is an absent value
    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        if self.0.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        Value::String(self.0).deserialize_enum(name, variants, visitor)
    }

    forward_to_deserialize_any! {
        i128 u128 char str string bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}
