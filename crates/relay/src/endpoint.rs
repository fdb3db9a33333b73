//! Forwarding endpoint definitions
//!
//! Each endpoint describes one upstream call: which inbound method it
//! accepts, which form fields it reads, and how the outbound body is encoded.

use axum::http::Method;

use crate::error::RelayError;
use crate::form::FormFields;

/// Encoding of the outbound request body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    Empty,
    Multipart,
    UrlEncoded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Forwarded verbatim
    Text,
    /// Must parse as a base-10 integer; forwarded in canonical form
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            required: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Endpoint {
    /// Metrics and log label
    pub name: &'static str,
    /// Inbound method; also used for the upstream call
    pub method: Method,
    pub upstream_path: &'static str,
    pub fields: &'static [FieldSpec],
    pub encoding: BodyEncoding,
    /// Label passthrough responses as `application/json`
    pub json_response: bool,
}

pub const SCAN: Endpoint = Endpoint {
    name: "scan",
    method: Method::POST,
    upstream_path: "/api/action/scan",
    fields: &[
        FieldSpec::required("barcode", FieldKind::Text),
        FieldSpec::optional("price"),
        FieldSpec::optional("bestBeforeInDays"),
    ],
    encoding: BodyEncoding::Multipart,
    json_response: false,
};

pub const GET_MODE: Endpoint = Endpoint {
    name: "getmode",
    method: Method::GET,
    upstream_path: "/api/state/getmode",
    fields: &[],
    encoding: BodyEncoding::Empty,
    json_response: true,
};

pub const SET_MODE: Endpoint = Endpoint {
    name: "setmode",
    method: Method::POST,
    upstream_path: "/api/state/setmode",
    fields: &[FieldSpec::required("state", FieldKind::Integer)],
    encoding: BodyEncoding::UrlEncoded,
    json_response: true,
};

impl Endpoint {
    /// Collect the outbound fields in declaration order
    ///
    /// Fails on the first missing required field or malformed integer.
    /// Absent optional fields are left out.
    pub fn extract(&self, form: &FormFields) -> Result<Vec<(&'static str, String)>, RelayError> {
        let mut pairs = Vec::with_capacity(self.fields.len());

        for spec in self.fields {
            let Some(raw) = form.get(spec.name) else {
                if spec.required {
                    return Err(RelayError::MissingField(spec.name));
                }
                continue;
            };

            let value = match spec.kind {
                FieldKind::Text => raw.to_string(),
                FieldKind::Integer => raw
                    .parse::<i64>()
                    .map_err(|_| RelayError::InvalidInteger {
                        field: spec.name,
                        value: raw.to_string(),
                    })?
                    .to_string(),
            };
            pairs.push((spec.name, value));
        }

        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_requires_barcode() {
        let result = SCAN.extract(&FormFields::default());
        assert!(matches!(result, Err(RelayError::MissingField("barcode"))));

        let result = SCAN.extract(&FormFields::from([("barcode", "")]));
        assert!(matches!(result, Err(RelayError::MissingField("barcode"))));
    }

    #[test]
    fn test_scan_optional_fields() {
        let pairs = SCAN
            .extract(&FormFields::from([("barcode", "4006381333931")]))
            .unwrap();
        assert_eq!(pairs, vec![("barcode", "4006381333931".to_string())]);

        let pairs = SCAN
            .extract(&FormFields::from([
                ("bestBeforeInDays", "7"),
                ("barcode", "4006381333931"),
                ("price", "1.99"),
            ]))
            .unwrap();
        assert_eq!(
            pairs,
            vec![
                ("barcode", "4006381333931".to_string()),
                ("price", "1.99".to_string()),
                ("bestBeforeInDays", "7".to_string()),
            ]
        );
    }

    #[test]
    fn test_set_mode_integer_canonicalised() {
        let pairs = SET_MODE.extract(&FormFields::from([("state", "+03")])).unwrap();
        assert_eq!(pairs, vec![("state", "3".to_string())]);

        let pairs = SET_MODE.extract(&FormFields::from([("state", "-1")])).unwrap();
        assert_eq!(pairs, vec![("state", "-1".to_string())]);
    }

    #[test]
    fn test_set_mode_rejects_non_integer() {
        for bad in ["abc", "1.5", " 2", "99999999999999999999"] {
            let result = SET_MODE.extract(&FormFields::from([("state", bad)]));
            assert!(
                matches!(result, Err(RelayError::InvalidInteger { field: "state", .. })),
                "{bad:?} should be rejected"
            );
        }

        let result = SET_MODE.extract(&FormFields::default());
        assert!(matches!(result, Err(RelayError::MissingField("state"))));
    }

    #[test]
    fn test_get_mode_takes_no_fields() {
        let pairs = GET_MODE
            .extract(&FormFields::from([("barcode", "ignored")]))
            .unwrap();
        assert!(pairs.is_empty());
    }
}
