use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

/// The only claim the client reads. Verifying the signature is the server's
/// job; the client just has to know when to stop using a token.
#[derive(Debug, Deserialize)]
struct Claims {
    exp: i64,
}

/// Extract the `exp` claim (epoch seconds) from a bearer token without
/// verifying it. Returns None for anything that does not decode: wrong
/// segment count, bad base64, bad JSON, missing claim.
pub fn token_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    Some(claims.exp)
}

/// A token is usable only while `exp` is strictly in the future.
pub fn is_token_valid(token: &str) -> bool {
    match token_expiry(token) {
        Some(exp) => exp * 1000 > chrono::Utc::now().timestamp_millis(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_token(claims: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims);
        format!("{}.{}.sig", header, payload)
    }

    #[test]
    fn test_expired_token_is_invalid() {
        // exp = 0, the epoch itself
        assert!(!is_token_valid("eyJhbGciOiJIUzI1NiJ9.eyJleHAiOjB9.sig"));

        let past = chrono::Utc::now().timestamp() - 10;
        assert!(!is_token_valid(&make_token(&format!("{{\"exp\":{}}}", past))));
    }

    #[test]
    fn test_future_token_is_valid() {
        let future = chrono::Utc::now().timestamp() + 3600;
        let token = make_token(&format!("{{\"exp\":{}}}", future));
        assert!(is_token_valid(&token));
        assert_eq!(token_expiry(&token), Some(future));
    }

    #[test]
    fn test_expiring_this_second_is_invalid() {
        // exp*1000 can never exceed a now_ms taken within the same second
        let now = chrono::Utc::now().timestamp();
        assert!(!is_token_valid(&make_token(&format!("{{\"exp\":{}}}", now))));
    }

    #[test]
    fn test_malformed_tokens_are_invalid() {
        assert!(!is_token_valid(""));
        assert!(!is_token_valid("no-dots-here"));
        assert!(!is_token_valid("a.!!!not-base64!!!.c"));
        // decodes, but the payload is not JSON
        let bad_json = format!("h.{}.s", URL_SAFE_NO_PAD.encode("plain text"));
        assert!(!is_token_valid(&bad_json));
        // valid JSON, no exp claim
        let no_exp = make_token(r#"{"sub":"ana"}"#);
        assert!(!is_token_valid(&no_exp));
    }
}
