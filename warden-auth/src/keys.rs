use std::path::Path;

use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::error::{Error, ErrorType, KeyRole};

/// Parsed key material, loaded once at authority construction and reused
/// for every sign and verify afterwards.
pub(crate) struct KeyPair {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl KeyPair {
    pub fn hmac(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub fn rsa(private_path: &Path, public_path: &Path) -> Result<Self, Error> {
        let private = read_key(KeyRole::Private, private_path)?;
        let public = read_key(KeyRole::Public, public_path)?;

        Ok(Self {
            encoding: EncodingKey::from_rsa_pem(&private)
                .map_err(|source| parse_error(KeyRole::Private, private_path, source))?,
            decoding: DecodingKey::from_rsa_pem(&public)
                .map_err(|source| parse_error(KeyRole::Public, public_path, source))?,
        })
    }

    pub fn ec(private_path: &Path, public_path: &Path) -> Result<Self, Error> {
        let private = read_key(KeyRole::Private, private_path)?;
        let public = read_key(KeyRole::Public, public_path)?;

        Ok(Self {
            encoding: EncodingKey::from_ec_pem(&private)
                .map_err(|source| parse_error(KeyRole::Private, private_path, source))?,
            decoding: DecodingKey::from_ec_pem(&public)
                .map_err(|source| parse_error(KeyRole::Public, public_path, source))?,
        })
    }
}

fn read_key(role: KeyRole, path: &Path) -> Result<Vec<u8>, Error> {
    std::fs::read(path).map_err(|source| {
        ErrorType::ReadKey {
            role,
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}

fn parse_error(role: KeyRole, path: &Path, source: jsonwebtoken::errors::Error) -> Error {
    ErrorType::ParseKey {
        role,
        path: path.to_path_buf(),
        source,
    }
    .into()
}
