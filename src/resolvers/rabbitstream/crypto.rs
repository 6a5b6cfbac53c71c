use cbc::cipher::{BlockDecryptMut, KeyIvInit, block_padding::Pkcs7};
use md5::{Digest, Md5};

use crate::common::errors::{ResolveError, ResolveResult};

type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Header of the OpenSSL / CryptoJS salted format.
pub const SALT_MAGIC: &[u8; 8] = b"Salted__";
pub const SALT_LEN: usize = 8;
pub const KEY_LEN: usize = 32;
pub const IV_LEN: usize = 16;
const BLOCK_LEN: usize = 16;

/// AES-256 key and CBC IV derived from a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedKey {
  pub key: [u8; KEY_LEN],
  pub iv: [u8; IV_LEN],
}

impl DerivedKey {
  pub fn to_bytes(&self) -> [u8; KEY_LEN + IV_LEN] {
    let mut out = [0u8; KEY_LEN + IV_LEN];
    out[..KEY_LEN].copy_from_slice(&self.key);
    out[KEY_LEN..].copy_from_slice(&self.iv);
    out
  }
}

/// OpenSSL `EVP_BytesToKey` with MD5 and a single round.
///
/// `D1 = MD5(password || salt)`, `Dn = MD5(Dn-1 || password || salt)`,
/// concatenated until 48 bytes are available.
pub fn derive_key_and_iv(password: &[u8], salt: &[u8]) -> DerivedKey {
  let mut material = Vec::with_capacity(KEY_LEN + IV_LEN + 16);
  let mut digest: Vec<u8> = Vec::new();

  while material.len() < KEY_LEN + IV_LEN {
    let mut hasher = Md5::new();
    hasher.update(&digest);
    hasher.update(password);
    hasher.update(salt);
    digest = hasher.finalize().to_vec();
    material.extend_from_slice(&digest);
  }

  let mut key = [0u8; KEY_LEN];
  let mut iv = [0u8; IV_LEN];
  key.copy_from_slice(&material[..KEY_LEN]);
  iv.copy_from_slice(&material[KEY_LEN..KEY_LEN + IV_LEN]);

  DerivedKey { key, iv }
}

/// Decrypts a `Salted__ || salt || ciphertext` blob with AES-256-CBC and PKCS#7.
pub fn decrypt_salted(blob: &[u8], password: &[u8]) -> ResolveResult<Vec<u8>> {
  if blob.len() < SALT_MAGIC.len() + SALT_LEN || &blob[..SALT_MAGIC.len()] != SALT_MAGIC {
    return Err(ResolveError::MalformedCiphertext(
      "missing Salted__ header".to_string(),
    ));
  }

  let salt = &blob[SALT_MAGIC.len()..SALT_MAGIC.len() + SALT_LEN];
  let ciphertext = &blob[SALT_MAGIC.len() + SALT_LEN..];

  if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
    return Err(ResolveError::DecryptionFailed(format!(
      "ciphertext length {} is not a positive multiple of {}",
      ciphertext.len(),
      BLOCK_LEN
    )));
  }

  let derived = derive_key_and_iv(password, salt);
  let cipher = Aes256CbcDec::new_from_slices(&derived.key, &derived.iv)
    .map_err(|e| ResolveError::DecryptionFailed(e.to_string()))?;

  let mut buf = ciphertext.to_vec();
  let plain_len = cipher
    .decrypt_padded_mut::<Pkcs7>(&mut buf)
    .map_err(|_| ResolveError::DecryptionFailed("invalid PKCS#7 padding".to_string()))?
    .len();
  buf.truncate(plain_len);

  Ok(buf)
}
