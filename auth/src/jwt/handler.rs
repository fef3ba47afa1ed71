use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// HS256 signer/verifier over arbitrary claim types.
///
/// Registered time claims are never validated here. Locally issued envelopes
/// carry milliseconds while external ID tokens carry seconds, so expiry is
/// left to whoever knows the unit.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Build a handler for a shared HMAC secret.
    ///
    /// The secret should be at least 32 bytes. An empty secret is acceptable
    /// only for a handler used exclusively through [`JwtHandler::decode_unverified`].
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Sign `claims` into a compact JWT.
    ///
    /// # Errors
    /// * `EncodingFailed` - Claims could not be serialized or signed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode a token, requiring a valid signature.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature does not verify or the algorithm differs
    /// * `DecodingFailed` - Token is malformed or claims do not deserialize
    pub fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, JwtError> {
        decode::<T>(token, &self.decoding_key, &self.validation(true))
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    JwtError::InvalidToken(e.to_string())
                }
                _ => JwtError::DecodingFailed(e.to_string()),
            })
    }

    /// Decode a token without checking its signature.
    ///
    /// Claims returned from here are only as trustworthy as the channel the
    /// token arrived on.
    ///
    /// # Errors
    /// * `DecodingFailed` - Token is malformed or claims do not deserialize
    pub fn decode_unverified<T: for<'de> Deserialize<'de>>(
        &self,
        token: &str,
    ) -> Result<T, JwtError> {
        decode::<T>(token, &self.decoding_key, &self.validation(false))
            .map(|data| data.claims)
            .map_err(|e| JwtError::DecodingFailed(e.to_string()))
    }

    fn validation(&self, verify_signature: bool) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        if !verify_signature {
            validation.insecure_disable_signature_validation();
        }
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation
    }
}
