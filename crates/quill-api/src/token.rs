use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use quill_types::api::Claims;

/// Sign `{id, username}` claims with HS256. No `exp` claim is set: sessions
/// stay valid until the signing secret changes.
pub fn issue(secret: &str, id: i64, username: &str) -> anyhow::Result<String> {
    let claims = Claims {
        id,
        username: username.to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn verify(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    // Tokens carry no exp claim, so expiry validation must be switched off
    // or every token would be rejected as missing a required claim.
    let mut validation = Validation::default();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    const SECRET: &str = "test-secret";

    #[test]
    fn issue_then_verify_roundtrip() {
        let token = issue(SECRET, 42, "alice").unwrap();
        let claims = verify(SECRET, &token).unwrap();
        assert_eq!(claims.id, 42);
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn tokens_never_expire() {
        // The payload must not carry an exp claim at all.
        let token = issue(SECRET, 1, "alice").unwrap();
        let payload = token.split('.').nth(1).unwrap();
        let decoded = URL_SAFE_NO_PAD.decode(payload).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&decoded).unwrap();
        assert!(json.get("exp").is_none());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue(SECRET, 1, "alice").unwrap();
        assert!(verify("other-secret", &token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = issue(SECRET, 1, "alice").unwrap();
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        parts[1] = URL_SAFE_NO_PAD.encode(br#"{"id":2,"username":"mallory"}"#);
        assert!(verify(SECRET, &parts.join(".")).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verify(SECRET, "not-a-jwt").is_err());
    }
}
