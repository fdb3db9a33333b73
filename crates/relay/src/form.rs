//! Inbound form fields
//!
//! Fields come from the query string and, for
//! `application/x-www-form-urlencoded` or `multipart/form-data` requests,
//! from the body. A body value shadows a query value of the same name; within
//! one source the first occurrence of a name wins. Multipart file parts are
//! skipped.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;

const URL_ENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART: &str = "multipart/form-data";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    values: HashMap<String, String>,
}

impl FormFields {
    /// Merge query and body fields
    pub fn parse(query: Option<&str>, content_type: Option<&str>, body: &[u8]) -> Self {
        let body = if content_type.is_some_and(|ct| has_essence(ct, URL_ENCODED)) {
            decode(body)
        } else {
            HashMap::new()
        };
        Self::merge(query, body)
    }

    fn merge(query: Option<&str>, body: HashMap<String, String>) -> Self {
        let mut values = decode(query.unwrap_or_default().as_bytes());
        values.extend(body);
        Self { values }
    }

    /// Field value, `None` when absent or empty
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for FormFields {
    fn from(pairs: [(&str, &str); N]) -> Self {
        let mut values = HashMap::new();
        for (name, value) in pairs {
            values
                .entry(name.to_string())
                .or_insert_with(|| value.to_string());
        }
        Self { values }
    }
}

fn decode(input: &[u8]) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for (name, value) in url::form_urlencoded::parse(input) {
        values
            .entry(name.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    values
}

async fn read_multipart(mut multipart: Multipart) -> Result<HashMap<String, String>, MultipartError> {
    let mut values = HashMap::new();
    while let Some(field) = multipart.next_field().await? {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let value = field.text().await?;
        values.entry(name).or_insert(value);
    }
    Ok(values)
}

fn has_essence(content_type: &str, essence: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|e| e.trim().eq_ignore_ascii_case(essence))
}

#[async_trait]
impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let query = req.uri().query().map(str::to_owned);
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        if content_type
            .as_deref()
            .is_some_and(|ct| has_essence(ct, MULTIPART))
        {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            let body = read_multipart(multipart)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(Self::merge(query.as_deref(), body));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        Ok(Self::parse(query.as_deref(), content_type.as_deref(), &body))
    }
}
