use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

use crate::models::{Claims, TokenType};

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as usize)
        .unwrap_or_default()
}

/// Issues a token for a brand new anonymous session.
pub fn generate_session_token(secret: &str, ttl: usize) -> Result<(String, Claims), Error> {
    let issued_at = now();
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        iat: issued_at,
        exp: issued_at.saturating_add(ttl),
        jti: Uuid::new_v4().to_string(),
        token_type: TokenType::Anonymous,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, claims))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let (token, claims) = generate_session_token("secret", 60).unwrap();
        let decoded = verify_token(&token, "secret").unwrap();
        assert_eq!(decoded, claims);
        assert_eq!(decoded.token_type, TokenType::Anonymous);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let (token, _) = generate_session_token("secret", 60).unwrap();
        assert!(verify_token(&token, "other").is_err());
    }

    #[test]
    fn each_sign_in_is_a_new_session() {
        let (_, a) = generate_session_token("secret", 60).unwrap();
        let (_, b) = generate_session_token("secret", 60).unwrap();
        assert_ne!(a.sub, b.sub);
    }

    #[test]
    fn huge_ttl_saturates() {
        let (_, claims) = generate_session_token("secret", usize::MAX).unwrap();
        assert_eq!(claims.exp, usize::MAX);
    }
}
