//! Key Vault data-plane client.
//!
//! Unlike the management plane there is no subscription scoping here; every
//! call names the vault it targets by URL, so one [`KeyVaultClient`] serves
//! any number of vaults. Binary fields (key material, ciphertext) cross the
//! wire as unpadded base64url per the vault wire format.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::auth::TokenCredential;
use crate::error::{ApiError, Result};

const API_VERSION: &str = "7.4";

/// Token audience for the Key Vault data plane
pub const VAULT_RESOURCE: &str = "https://vault.azure.net";

mod base64url {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &[u8],
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&URL_SAFE_NO_PAD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        URL_SAFE_NO_PAD
            .decode(text.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyType {
    #[serde(rename = "EC")]
    Ec,
    #[serde(rename = "EC-HSM")]
    EcHsm,
    #[serde(rename = "RSA")]
    Rsa,
    #[serde(rename = "RSA-HSM")]
    RsaHsm,
    #[serde(rename = "oct")]
    Oct,
}

/// Algorithms accepted by the encrypt and decrypt operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncryptionAlgorithm {
    #[serde(rename = "RSA-OAEP")]
    RsaOaep,
    #[serde(rename = "RSA-OAEP-256")]
    RsaOaep256,
    #[serde(rename = "RSA1_5")]
    Rsa15,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Not-before time, seconds since the epoch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Expiry time, seconds since the epoch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<i64>,
}

/// The public half of a vault key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonWebKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    pub kty: KeyType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_ops: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64url_opt")]
    pub n: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64url_opt")]
    pub e: Option<Vec<u8>>,
}

mod base64url_opt {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match bytes {
            Some(b) => serializer.serialize_str(&URL_SAFE_NO_PAD.encode(b)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<Vec<u8>>, D::Error> {
        let text: Option<String> = Option::deserialize(deserializer)?;
        match text {
            Some(t) => URL_SAFE_NO_PAD
                .decode(t.as_bytes())
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

/// A key plus its attributes, as returned by the key operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBundle {
    pub key: JsonWebKey,
    #[serde(default)]
    pub attributes: KeyAttributes,
}

/// A key row from the list operation, identifier and attributes only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyItem {
    pub kid: String,
    #[serde(default)]
    pub attributes: KeyAttributes,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyCreateParams {
    pub kty: KeyType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_ops: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<KeyAttributes>,
}

impl KeyCreateParams {
    pub fn rsa(key_size: u32) -> Self {
        Self {
            kty: KeyType::Rsa,
            key_size: Some(key_size),
            key_ops: Vec::new(),
            attributes: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyImportParams {
    pub key: JsonWebKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<KeyAttributes>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct KeyUpdateParams {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_ops: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<KeyAttributes>,
}

/// A secret value plus its attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretBundle {
    pub id: String,
    pub value: String,
    #[serde(default)]
    pub attributes: KeyAttributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// A secret row from the list operation, no value included
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretItem {
    pub id: String,
    #[serde(default)]
    pub attributes: KeyAttributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SecretSetParams {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<KeyAttributes>,
}

#[derive(Debug, Clone, Serialize)]
struct KeyOperationParams<'a> {
    alg: EncryptionAlgorithm,
    #[serde(with = "base64url")]
    value: &'a [u8],
}

/// Result of an encrypt or decrypt call
#[derive(Debug, Clone, Deserialize)]
pub struct KeyOperationResult {
    pub kid: String,
    #[serde(with = "base64url")]
    pub value: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct PagedResult<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
    #[serde(rename = "nextLink")]
    next_link: Option<String>,
}

/// Authenticated client for the Key Vault data plane
#[derive(Clone)]
pub struct KeyVaultClient {
    credential: Arc<dyn TokenCredential>,
    http: reqwest::Client,
}

impl KeyVaultClient {
    pub fn new(credential: Arc<dyn TokenCredential>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { credential, http })
    }

    async fn bearer(&self) -> Result<String> {
        Ok(self.credential.get_token(VAULT_RESOURCE).await?.token)
    }

    fn url(vault_url: &str, path: &str) -> String {
        format!("{}{}", vault_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(&self, vault_url: &str, path: &str) -> Result<T> {
        let token = self.bearer().await?;
        trace!("GET {}{}", vault_url, path);
        let response = self
            .http
            .get(Self::url(vault_url, path))
            .query(&[("api-version", API_VERSION)])
            .bearer_auth(token)
            .send()
            .await?;
        Self::into_json(response).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        vault_url: &str,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let token = self.bearer().await?;
        debug!("{} {}{}", method, vault_url, path);
        let response = self
            .http
            .request(method, Self::url(vault_url, path))
            .query(&[("api-version", API_VERSION)])
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::into_json(response).await
    }

    async fn into_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_response(status, &body))
        }
    }

    /// Create a new key inside the vault
    pub async fn create_key(
        &self,
        vault_url: &str,
        name: &str,
        params: &KeyCreateParams,
    ) -> Result<KeyBundle> {
        self.send_json(
            reqwest::Method::POST,
            vault_url,
            &format!("/keys/{}/create", name),
            params,
        )
        .await
    }

    /// Import existing key material into the vault
    pub async fn import_key(
        &self,
        vault_url: &str,
        name: &str,
        params: &KeyImportParams,
    ) -> Result<KeyBundle> {
        self.send_json(
            reqwest::Method::PUT,
            vault_url,
            &format!("/keys/{}", name),
            params,
        )
        .await
    }

    /// Get the newest version of a key
    pub async fn get_key(&self, vault_url: &str, name: &str) -> Result<KeyBundle> {
        self.get_json(vault_url, &format!("/keys/{}", name)).await
    }

    /// Patch the attributes or allowed operations of a key
    pub async fn update_key(
        &self,
        vault_url: &str,
        name: &str,
        params: &KeyUpdateParams,
    ) -> Result<KeyBundle> {
        self.send_json(
            reqwest::Method::PATCH,
            vault_url,
            &format!("/keys/{}", name),
            params,
        )
        .await
    }

    /// Delete a key and all of its versions
    pub async fn delete_key(&self, vault_url: &str, name: &str) -> Result<KeyBundle> {
        let token = self.bearer().await?;
        debug!("DELETE {}/keys/{}", vault_url, name);
        let response = self
            .http
            .delete(Self::url(vault_url, &format!("/keys/{}", name)))
            .query(&[("api-version", API_VERSION)])
            .bearer_auth(token)
            .send()
            .await?;
        Self::into_json(response).await
    }

    /// List keys in a vault, following pagination
    pub async fn list_keys(&self, vault_url: &str) -> Result<Vec<KeyItem>> {
        self.list_paged(vault_url, "/keys").await
    }

    /// Encrypt with a vault key. The plaintext never exceeds the key modulus
    /// for the RSA algorithms, the vault rejects longer inputs.
    pub async fn encrypt(
        &self,
        vault_url: &str,
        key_name: &str,
        algorithm: EncryptionAlgorithm,
        plaintext: &[u8],
    ) -> Result<KeyOperationResult> {
        self.send_json(
            reqwest::Method::POST,
            vault_url,
            &format!("/keys/{}/encrypt", key_name),
            &KeyOperationParams {
                alg: algorithm,
                value: plaintext,
            },
        )
        .await
    }

    /// Decrypt with a vault key
    pub async fn decrypt(
        &self,
        vault_url: &str,
        key_name: &str,
        algorithm: EncryptionAlgorithm,
        ciphertext: &[u8],
    ) -> Result<KeyOperationResult> {
        self.send_json(
            reqwest::Method::POST,
            vault_url,
            &format!("/keys/{}/decrypt", key_name),
            &KeyOperationParams {
                alg: algorithm,
                value: ciphertext,
            },
        )
        .await
    }

    /// Set a secret, creating a new version if it already exists
    pub async fn set_secret(
        &self,
        vault_url: &str,
        name: &str,
        params: &SecretSetParams,
    ) -> Result<SecretBundle> {
        self.send_json(
            reqwest::Method::PUT,
            vault_url,
            &format!("/secrets/{}", name),
            params,
        )
        .await
    }

    /// Get the newest version of a secret
    pub async fn get_secret(&self, vault_url: &str, name: &str) -> Result<SecretBundle> {
        self.get_json(vault_url, &format!("/secrets/{}", name))
            .await
    }

    /// Patch the attributes of a secret
    pub async fn update_secret(
        &self,
        vault_url: &str,
        name: &str,
        attributes: &KeyAttributes,
    ) -> Result<SecretItem> {
        #[derive(Serialize)]
        struct Body<'a> {
            attributes: &'a KeyAttributes,
        }
        self.send_json(
            reqwest::Method::PATCH,
            vault_url,
            &format!("/secrets/{}", name),
            &Body { attributes },
        )
        .await
    }

    /// Delete a secret and all of its versions
    pub async fn delete_secret(&self, vault_url: &str, name: &str) -> Result<SecretBundle> {
        let token = self.bearer().await?;
        debug!("DELETE {}/secrets/{}", vault_url, name);
        let response = self
            .http
            .delete(Self::url(vault_url, &format!("/secrets/{}", name)))
            .query(&[("api-version", API_VERSION)])
            .bearer_auth(token)
            .send()
            .await?;
        Self::into_json(response).await
    }

    /// List secrets in a vault, following pagination
    pub async fn list_secrets(&self, vault_url: &str) -> Result<Vec<SecretItem>> {
        self.list_paged(vault_url, "/secrets").await
    }

    async fn list_paged<T: DeserializeOwned>(
        &self,
        vault_url: &str,
        path: &str,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page: PagedResult<T> = self.get_json(vault_url, path).await?;
        loop {
            items.append(&mut page.value);
            let Some(next) = page.next_link else {
                break;
            };
            let token = self.bearer().await?;
            trace!("GET {}", next);
            let response = self.http.get(&next).bearer_auth(token).send().await?;
            page = Self::into_json(response).await?;
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_names_match_wire_format() {
        assert_eq!(
            serde_json::to_value(EncryptionAlgorithm::RsaOaep).unwrap(),
            "RSA-OAEP"
        );
        assert_eq!(
            serde_json::to_value(EncryptionAlgorithm::Rsa15).unwrap(),
            "RSA1_5"
        );
    }

    #[test]
    fn key_types_match_wire_format() {
        assert_eq!(serde_json::to_value(KeyType::Rsa).unwrap(), "RSA");
        assert_eq!(serde_json::to_value(KeyType::RsaHsm).unwrap(), "RSA-HSM");
        assert_eq!(serde_json::to_value(KeyType::Oct).unwrap(), "oct");
    }

    #[test]
    fn operation_params_encode_base64url() {
        let params = KeyOperationParams {
            alg: EncryptionAlgorithm::RsaOaep,
            value: &[0xff, 0xfe, 0x00],
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["alg"], "RSA-OAEP");
        // unpadded url-safe alphabet
        assert_eq!(json["value"], "__4A");
    }

    #[test]
    fn operation_result_decodes_base64url() {
        let result: KeyOperationResult = serde_json::from_str(
            r#"{"kid": "https://v.vault.azure.net/keys/k/1", "value": "__4A"}"#,
        )
        .unwrap();
        assert_eq!(result.value, vec![0xff, 0xfe, 0x00]);
    }
}
