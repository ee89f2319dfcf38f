//! JWT inspection
//!
//! Claims are decoded for display only. Signatures are never verified.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;

use crate::error::{Error, Result};

/// Decoded header and claims of a JWT
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    pub header: Value,
    pub claims: Value,
}

impl DecodedToken {
    /// `exp` claim as a timestamp, when present
    pub fn expires_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.claims
            .get("exp")
            .and_then(Value::as_i64)
            .and_then(|exp| chrono::DateTime::from_timestamp(exp, 0))
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at()
            .map(|exp| exp <= chrono::Utc::now())
            .unwrap_or(false)
    }
}

pub fn decode(token: &str) -> Result<DecodedToken> {
    let mut parts = token.trim().split('.');
    let (header, claims) = match (parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(c), Some(_)) => (h, c),
        _ => return Err(Error::MalformedToken("expected three segments".to_string())),
    };

    Ok(DecodedToken {
        header: decode_segment(header)?,
        claims: decode_segment(claims)?,
    })
}

fn decode_segment(segment: &str) -> Result<Value> {
    // Some issuers pad anyway
    let bytes = URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|e| Error::MalformedToken(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| Error::MalformedToken(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode(value: &Value) -> String {
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(value).unwrap())
    }

    fn token(claims: Value) -> String {
        format!(
            "{}.{}.signature",
            encode(&json!({ "alg": "HS256", "typ": "JWT" })),
            encode(&claims)
        )
    }

    #[test]
    fn test_decode_claims() {
        let decoded = decode(&token(json!({ "id": 7, "role": "ADMIN", "exp": 4102444800i64 }))).unwrap();
        assert_eq!(decoded.header["alg"], "HS256");
        assert_eq!(decoded.claims["role"], "ADMIN");
        assert!(!decoded.is_expired());
        assert_eq!(decoded.expires_at().unwrap().timestamp(), 4102444800);
    }

    #[test]
    fn test_expired_and_missing_exp() {
        assert!(decode(&token(json!({ "exp": 1 }))).unwrap().is_expired());
        let no_exp = decode(&token(json!({ "sub": "x" }))).unwrap();
        assert!(no_exp.expires_at().is_none());
        assert!(!no_exp.is_expired());
    }

    #[test]
    fn test_malformed() {
        assert!(decode("not-a-jwt").is_err());
        assert!(decode("a.b").is_err());
        assert!(decode("!!!.???.sig").is_err());
    }
}
