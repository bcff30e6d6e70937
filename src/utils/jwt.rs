use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Email
    pub uid: Uuid,   // User ID
    pub name: String,
    pub role: String,
    pub permissions: Vec<String>,
    pub exp: usize, // Expiration timestamp
}

/// Sign a new JWT token for a user.
pub fn sign(
    user_id: Uuid,
    email: &str,
    name: &str,
    role: &str,
    permissions: Vec<String>,
    secret: &str,
    ttl_days: i64,
) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(ttl_days))
        .ok_or_else(|| anyhow::anyhow!("token expiry out of range"))?
        .timestamp();

    let claims = Claims {
        sub: email.to_owned(),
        uid: user_id,
        name: name.to_owned(),
        role: role.to_owned(),
        permissions,
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify and decode a JWT token.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_verify_round_trip() {
        let id = Uuid::new_v4();
        let token = sign(
            id,
            "sita@example.com",
            "Sita",
            "editor",
            vec!["create_words".into()],
            "test-secret",
            7,
        )
        .unwrap();

        let claims = verify(&token, "test-secret").unwrap();
        assert_eq!(claims.uid, id);
        assert_eq!(claims.sub, "sita@example.com");
        assert_eq!(claims.role, "editor");
        assert_eq!(claims.permissions, vec!["create_words".to_string()]);
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = sign(
            Uuid::new_v4(),
            "sita@example.com",
            "Sita",
            "user",
            vec![],
            "correct-secret",
            7,
        )
        .unwrap();

        assert!(verify(&token, "other-secret").is_err());
    }
}
