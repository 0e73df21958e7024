use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::sign::SigningMethod;

/// Configuration for a [`crate::token::TokenAuthority`].
///
/// The key material fields depend on the signing method's family: HMAC
/// methods take `hmac_key`, RSA and EC methods take the two PEM file paths.
/// Validation happens at authority construction, not here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TokenOptions {
    pub signing_method: SigningMethod,

    /// Symmetric key, used as both the signing and the verifying key.
    #[serde(default)]
    pub hmac_key: Option<String>,

    /// PEM file with the private key of the configured family.
    #[serde(default)]
    pub private_key_path: Option<PathBuf>,

    /// PEM file with the public key of the configured family.
    #[serde(default)]
    pub public_key_path: Option<PathBuf>,

    /// How long issued tokens stay valid. Must be positive.
    #[serde(with = "humantime_serde")]
    pub token_duration: Duration,

    /// Name of the header carrying the token.
    pub header: String,

    /// Whether the header value carries a `Bearer ` prefix in front of the
    /// token.
    #[serde(default)]
    pub bearer: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_config() {
        let options: TokenOptions = serde_json::from_str(
            r#"{
                "signing-method": "HS256",
                "hmac-key": "super-secret",
                "token-duration": "1h",
                "header": "Authorization",
                "bearer": true
            }"#,
        )
        .expect("a valid config");

        assert_eq!(options.signing_method, SigningMethod::Hs256);
        assert_eq!(options.hmac_key.as_deref(), Some("super-secret"));
        assert_eq!(options.token_duration, Duration::from_secs(3600));
        assert_eq!(options.header, "Authorization");
        assert!(options.bearer);
        assert!(options.private_key_path.is_none());
        assert!(options.public_key_path.is_none());
    }

    #[test]
    fn unknown_signing_method_is_rejected() {
        let result = serde_json::from_str::<TokenOptions>(
            r#"{
                "signing-method": "XS256",
                "token-duration": "1h",
                "header": "Authorization"
            }"#,
        );
        assert!(result.is_err());
    }
}
