use crate::application_port::TokenMaker;
use crate::domain_model::{Payload, TokenError};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// HS256 wants at least as many key bytes as the digest width.
pub const MIN_SYMMETRIC_KEY_BYTES: usize = 32;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    jti: Uuid,
    sub: String,
    iat: i64,
    nbf: i64,
    exp: i64,
}

impl From<&Payload> for Claims {
    fn from(payload: &Payload) -> Self {
        Claims {
            jti: payload.id,
            sub: payload.username.clone(),
            iat: payload.issued_at.timestamp(),
            nbf: payload.issued_at.timestamp(),
            exp: payload.expired_at.timestamp(),
        }
    }
}

impl TryFrom<Claims> for Payload {
    type Error = TokenError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let issued_at = DateTime::from_timestamp(claims.iat, 0).ok_or(TokenError::Malformed)?;
        let expired_at = DateTime::from_timestamp(claims.exp, 0).ok_or(TokenError::Malformed)?;
        Ok(Payload {
            id: claims.jti,
            username: claims.sub,
            issued_at,
            expired_at,
        })
    }
}

/// Signed-token maker: HMAC-SHA256 over base64url header/claims segments.
pub struct JwtTokenMaker {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenMaker {
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.len() < MIN_SYMMETRIC_KEY_BYTES {
            return Err(TokenError::WeakKey(MIN_SYMMETRIC_KEY_BYTES));
        }

        // Zero leeway keeps the expiry boundary exact.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_nbf = true;

        Ok(JwtTokenMaker {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }
}

impl TokenMaker for JwtTokenMaker {
    fn create_token(
        &self,
        username: &str,
        duration: Duration,
    ) -> Result<(String, Payload), TokenError> {
        let payload = Payload::new(username, duration)?;
        let token = encode(
            &Header::new(Algorithm::HS256),
            &Claims::from(&payload),
            &self.encoding_key,
        )
        .map_err(|e| TokenError::Internal(e.to_string()))?;
        Ok((token, payload))
    }

    fn verify_token(&self, token: &str) -> Result<Payload, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                ErrorKind::InvalidToken
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => TokenError::Malformed,
                _ => TokenError::Internal(e.to_string()),
            }
        })?;
        Payload::try_from(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn maker() -> JwtTokenMaker {
        JwtTokenMaker::new(KEY).unwrap()
    }

    #[test]
    fn rejects_short_key() {
        let short = &KEY[..MIN_SYMMETRIC_KEY_BYTES - 1];
        assert!(matches!(
            JwtTokenMaker::new(short),
            Err(TokenError::WeakKey(32))
        ));
        assert!(JwtTokenMaker::new(KEY).is_ok());
    }

    #[test]
    fn round_trip() {
        let maker = maker();
        let before = Utc::now();
        let (token, payload) = maker.create_token("alice", Duration::minutes(15)).unwrap();
        let after = Utc::now();

        let verified = maker.verify_token(&token).unwrap();
        assert_eq!(verified, payload);
        assert_eq!(verified.username, "alice");
        assert!(verified.issued_at >= before - Duration::seconds(1));
        assert!(verified.issued_at <= after);
        assert_eq!(verified.expired_at, verified.issued_at + Duration::minutes(15));
    }

    #[test]
    fn rejects_empty_username() {
        let err = maker().create_token("", Duration::minutes(15)).unwrap_err();
        assert!(matches!(err, TokenError::InvalidUsername));
    }

    #[test]
    fn expired_token_is_rejected() {
        let maker = maker();
        let (token, _) = maker.create_token("alice", -Duration::minutes(1)).unwrap();
        let err = maker.verify_token(&token).unwrap_err();
        assert!(matches!(err, TokenError::Expired));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let maker = maker();
        let (token, _) = maker.create_token("alice", Duration::minutes(15)).unwrap();

        // Flip one character of the claims segment.
        let mut bytes = token.into_bytes();
        let dot = bytes.iter().position(|&b| b == b'.').unwrap();
        let target = dot + 1;
        bytes[target] = if bytes[target] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        let err = maker.verify_token(&tampered).unwrap_err();
        assert!(matches!(
            err,
            TokenError::SignatureInvalid | TokenError::Malformed
        ));
    }

    #[test]
    fn foreign_key_signature_is_rejected() {
        let (token, _) = maker().create_token("alice", Duration::minutes(15)).unwrap();
        let other = JwtTokenMaker::new(b"ffffffffffffffffffffffffffffffff").unwrap();
        let err = other.verify_token(&token).unwrap_err();
        assert!(matches!(err, TokenError::SignatureInvalid));
    }

    #[test]
    fn garbage_is_malformed() {
        let err = maker().verify_token("not-a-token").unwrap_err();
        assert!(matches!(err, TokenError::Malformed));
    }

    #[test]
    fn verify_is_idempotent() {
        let maker = maker();
        let (token, _) = maker.create_token("alice", Duration::minutes(15)).unwrap();
        let first = maker.verify_token(&token).unwrap();
        let second = maker.verify_token(&token).unwrap();
        assert_eq!(first, second);
    }
}
