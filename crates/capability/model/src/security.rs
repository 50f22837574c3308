//! 网络协议数据访问与 securityData 加解密
//!
//! 每个网络一把独立的 256 位密钥，以协议数据形式保存在
//! `(networkId, networkProtocolId, "nk" + networkId)` 下。
//! 密文格式：hex(nonce[24] || ciphertext)，明文为 securityData 的 JSON 文本。

use chacha20poly1305::{
    Key, XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit, OsRng},
};
use lpwan_storage::{ListOptions, NewProtocolData, ProtocolDataDao, ProtocolDataRecord, StorageError};
use serde_json::Value;

const NONCE_LEN: usize = 24;
const KEY_LEN: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum SecurityError {
    /// 网络没有对应的密钥记录
    #[error("no key stored for network {0}")]
    MissingKey(String),
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("encryption failed: {0}")]
    Encryption(String),
    #[error("decryption failed: {0}")]
    Decryption(String),
    #[error("password hashing failed: {0}")]
    Password(String),
}

/// 网络密钥。
#[derive(Clone)]
pub struct NetworkKey([u8; KEY_LEN]);

impl NetworkKey {
    /// 生成新的随机密钥。
    pub fn generate() -> Self {
        use chacha20poly1305::aead::rand_core::RngCore;

        let mut bytes = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// 从协议数据中的 hex 文本还原。
    pub fn from_hex(text: &str) -> Result<Self, SecurityError> {
        let bytes = hex::decode(text).map_err(|e| SecurityError::InvalidKey(e.to_string()))?;
        let bytes: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| SecurityError::InvalidKey("key must be 32 bytes".to_string()))?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for NetworkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("NetworkKey(..)")
    }
}

/// 网络密钥在协议数据中的 dataIdentifier。
pub fn network_key_id(network_id: &str) -> String {
    format!("nk{network_id}")
}

/// 加密 securityData，返回 hex 密文。
pub fn hide(value: &Value, key: &NetworkKey) -> Result<String, SecurityError> {
    use chacha20poly1305::aead::rand_core::RngCore;

    let plaintext =
        serde_json::to_vec(value).map_err(|e| SecurityError::Encryption(e.to_string()))?;
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = XNonce::from_slice(&nonce_bytes);

    let cipher = XChaCha20Poly1305::new(Key::from_slice(&key.0));
    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_slice())
        .map_err(|e| SecurityError::Encryption(e.to_string()))?;

    let mut sealed = nonce.to_vec();
    sealed.extend_from_slice(&ciphertext);
    Ok(hex::encode(sealed))
}

/// 解密 hex 密文，还原 securityData。
pub fn access(sealed: &str, key: &NetworkKey) -> Result<Value, SecurityError> {
    let sealed = hex::decode(sealed).map_err(|e| SecurityError::Decryption(e.to_string()))?;
    if sealed.len() < NONCE_LEN {
        return Err(SecurityError::Decryption(
            "ciphertext shorter than nonce".to_string(),
        ));
    }
    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
    let nonce = XNonce::from_slice(nonce_bytes);

    let cipher = XChaCha20Poly1305::new(Key::from_slice(&key.0));
    let plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|e| SecurityError::Decryption(e.to_string()))?;
    serde_json::from_slice(&plaintext).map_err(|e| SecurityError::Decryption(e.to_string()))
}

/// 按 (networkId, networkProtocolId, dataIdentifier) 存取协议数据。
#[derive(Clone)]
pub struct ProtocolDataAccess {
    data: ProtocolDataDao,
}

impl ProtocolDataAccess {
    pub fn new(data: ProtocolDataDao) -> Self {
        Self { data }
    }

    pub async fn get_protocol_data_for_key(
        &self,
        network_id: &str,
        network_protocol_id: &str,
        data_identifier: &str,
    ) -> Result<Option<String>, StorageError> {
        let record = self
            .data
            .find(network_id, network_protocol_id, data_identifier)
            .await?;
        Ok(record.map(|record| record.data_value))
    }

    /// 写入协议数据，三元组已存在时覆盖数据值。
    pub async fn put_protocol_data_for_key(
        &self,
        network_id: &str,
        network_protocol_id: &str,
        data_identifier: &str,
        data_value: &str,
    ) -> Result<ProtocolDataRecord, StorageError> {
        match self
            .data
            .find(network_id, network_protocol_id, data_identifier)
            .await?
        {
            Some(existing) => self.data.update(&existing.id, None, Some(data_value)).await,
            None => {
                self.data
                    .create(&NewProtocolData {
                        network_id: network_id.to_string(),
                        network_protocol_id: network_protocol_id.to_string(),
                        data_identifier: data_identifier.to_string(),
                        data_value: data_value.to_string(),
                    })
                    .await
            }
        }
    }

    /// 删除协议数据，返回是否存在过。
    pub async fn delete_protocol_data_for_key(
        &self,
        network_id: &str,
        network_protocol_id: &str,
        data_identifier: &str,
    ) -> Result<bool, StorageError> {
        match self
            .data
            .find(network_id, network_protocol_id, data_identifier)
            .await?
        {
            Some(existing) => {
                self.data.delete(&existing.id).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// 读取网络密钥，缺失时返回 MissingKey。
    pub async fn network_key(
        &self,
        network_id: &str,
        network_protocol_id: &str,
    ) -> Result<NetworkKey, crate::ModelError> {
        let stored = self
            .get_protocol_data_for_key(network_id, network_protocol_id, &network_key_id(network_id))
            .await?;
        let Some(stored) = stored else {
            lpwan_telemetry::record_security_failure();
            return Err(SecurityError::MissingKey(network_id.to_string()).into());
        };
        NetworkKey::from_hex(&stored).map_err(|err| {
            lpwan_telemetry::record_security_failure();
            err.into()
        })
    }

    pub async fn store_network_key(
        &self,
        network_id: &str,
        network_protocol_id: &str,
        key: &NetworkKey,
    ) -> Result<(), StorageError> {
        self.put_protocol_data_for_key(
            network_id,
            network_protocol_id,
            &network_key_id(network_id),
            &key.to_hex(),
        )
        .await
        .map(|_| ())
    }

    pub async fn delete_network_key(
        &self,
        network_id: &str,
        network_protocol_id: &str,
    ) -> Result<bool, StorageError> {
        self.delete_protocol_data_for_key(network_id, network_protocol_id, &network_key_id(network_id))
            .await
    }

    /// 删除某网络下的全部协议数据，返回删除条数。
    pub async fn delete_network_data(&self, network_id: &str) -> Result<usize, StorageError> {
        let list = self
            .data
            .retrieve_many(&ListOptions::new().filter("networkId", network_id))
            .await?;
        let mut removed = 0;
        for record in list.records {
            self.data.delete(&record.id).await?;
            removed += 1;
        }
        Ok(removed)
    }
}
