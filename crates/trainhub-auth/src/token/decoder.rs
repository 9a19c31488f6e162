//! Structural JWT decoding without signature verification.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use trainhub_core::error::AppError;
use trainhub_core::result::AppResult;

use super::claims::TokenClaims;

/// Decodes bearer tokens into [`TokenClaims`].
///
/// No signature verification happens on the client — the trust boundary is
/// the issuing server over TLS. Validation is structural only: three
/// base64url segments, a JSON payload, and the mandatory claims (`exp`,
/// `sub`, `user_id`). Expired tokens still decode; expiry is a
/// point-in-time check made by callers.
#[derive(Clone)]
pub struct TokenDecoder {
    /// Placeholder key; signature validation is disabled.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for TokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenDecoder {
    /// Creates a decoder performing structural validation only.
    pub fn new() -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;

        Self {
            decoding_key: DecodingKey::from_secret(&[]),
            validation,
        }
    }

    /// Decodes a token string into its claim set.
    pub fn decode(&self, token: &str) -> AppResult<TokenClaims> {
        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AppError::malformed_token("Token is not a three-segment JWT")
                }
                jsonwebtoken::errors::ErrorKind::Base64(_) => {
                    AppError::malformed_token("Token segment is not valid base64url")
                }
                jsonwebtoken::errors::ErrorKind::Json(_) => AppError::malformed_token(format!(
                    "Token payload is not a valid claim set: {e}"
                )),
                jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(claim) => {
                    AppError::malformed_token(format!("Token is missing mandatory claim '{claim}'"))
                }
                _ => AppError::malformed_token(format!("Token decode failed: {e}")),
            })?;

        Ok(token_data.claims)
    }
}

impl Default for TokenDecoder {
    fn default() -> Self {
        Self::new()
    }
}
