use jsonwebtoken::Algorithm;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::{Display, EnumString};

use crate::error::{Error, ErrorType};

/// Supported signing methods, named by their JOSE `alg` value. A token is
/// only accepted when its header names exactly the configured method.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, SerializeDisplay, DeserializeFromStr,
)]
pub enum SigningMethod {
    #[strum(serialize = "HS256")]
    Hs256,
    #[strum(serialize = "HS384")]
    Hs384,
    #[strum(serialize = "HS512")]
    Hs512,
    #[strum(serialize = "RS256")]
    Rs256,
    #[strum(serialize = "RS384")]
    Rs384,
    #[strum(serialize = "RS512")]
    Rs512,
    #[strum(serialize = "ES256")]
    Es256,
    #[strum(serialize = "ES384")]
    Es384,
    #[strum(serialize = "ES512")]
    Es512,
}

/// The key material family a signing method belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum KeyFamily {
    #[strum(serialize = "HMAC")]
    Hmac,
    #[strum(serialize = "RSA")]
    Rsa,
    #[strum(serialize = "EC")]
    Ec,
}

impl SigningMethod {
    #[must_use]
    pub fn family(self) -> KeyFamily {
        match self {
            Self::Hs256 | Self::Hs384 | Self::Hs512 => KeyFamily::Hmac,
            Self::Rs256 | Self::Rs384 | Self::Rs512 => KeyFamily::Rsa,
            Self::Es256 | Self::Es384 | Self::Es512 => KeyFamily::Ec,
        }
    }

    /// The signature backend's algorithm. ES512 is not provided by the
    /// backend and is rejected here, before any key material is touched.
    pub(crate) fn algorithm(self) -> Result<Algorithm, Error> {
        match self {
            Self::Hs256 => Ok(Algorithm::HS256),
            Self::Hs384 => Ok(Algorithm::HS384),
            Self::Hs512 => Ok(Algorithm::HS512),
            Self::Rs256 => Ok(Algorithm::RS256),
            Self::Rs384 => Ok(Algorithm::RS384),
            Self::Rs512 => Ok(Algorithm::RS512),
            Self::Es256 => Ok(Algorithm::ES256),
            Self::Es384 => Ok(Algorithm::ES384),
            Self::Es512 => Err(ErrorType::UnsupportedAlgorithm(self).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_name_round_trip() {
        for (name, method) in [
            ("HS256", SigningMethod::Hs256),
            ("HS384", SigningMethod::Hs384),
            ("HS512", SigningMethod::Hs512),
            ("RS256", SigningMethod::Rs256),
            ("RS384", SigningMethod::Rs384),
            ("RS512", SigningMethod::Rs512),
            ("ES256", SigningMethod::Es256),
            ("ES384", SigningMethod::Es384),
            ("ES512", SigningMethod::Es512),
        ] {
            assert_eq!(name.parse::<SigningMethod>().expect("known name"), method);
            assert_eq!(method.to_string(), name);
        }

        assert!("none".parse::<SigningMethod>().is_err());
        assert!("hs256".parse::<SigningMethod>().is_err());
    }

    #[test]
    fn families() {
        assert_eq!(SigningMethod::Hs512.family(), KeyFamily::Hmac);
        assert_eq!(SigningMethod::Rs384.family(), KeyFamily::Rsa);
        assert_eq!(SigningMethod::Es256.family(), KeyFamily::Ec);
    }
}
