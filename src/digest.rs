//! Content digests.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::component::NameComponent;
use crate::constants::DIGEST_LENGTH;
use crate::name::ContentName;

/// SHA-256 digest identifying one content object.
///
/// Two objects published under the same name with different payloads have
/// different digests, which is what lets an interest ask for "the next
/// answer after this one".
///
/// # Derivation
///
/// ```text
/// digest = SHA256(name_uri || 0x00 || content)
/// ```
///
/// # Examples
///
/// ```
/// use ccn_name::{ContentDigest, ContentName};
///
/// let name = ContentName::parse("/a/%FE").unwrap();
/// let d1 = ContentDigest::compute(&name, b"one");
/// let d2 = ContentDigest::compute(&name, b"one");
/// assert_eq!(d1, d2);
/// assert_ne!(d1, ContentDigest::compute(&name, b"two"));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentDigest([u8; DIGEST_LENGTH]);

impl ContentDigest {
    /// Creates a digest from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; DIGEST_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns the digest as a byte slice.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; DIGEST_LENGTH] {
        &self.0
    }

    /// Computes the digest of a named payload.
    #[must_use]
    pub fn compute(name: &ContentName, content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(name.to_string().as_bytes());
        hasher.update([0u8]);
        hasher.update(content);

        let result = hasher.finalize();
        let mut bytes = [0u8; DIGEST_LENGTH];
        bytes.copy_from_slice(&result);
        Self(bytes)
    }

    /// Returns the digest as a name component.
    #[must_use]
    pub fn to_component(&self) -> NameComponent {
        NameComponent::from_raw(self.0.to_vec())
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDigest({self})")
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0[..8] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "...")
    }
}

impl AsRef<[u8]> for ContentDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl serde::Serialize for ContentDigest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use std::fmt::Write;

        let mut hex = String::with_capacity(DIGEST_LENGTH * 2);
        for byte in &self.0 {
            let _ = write!(hex, "{byte:02x}");
        }
        serializer.serialize_str(&hex)
    }
}

impl<'de> serde::Deserialize<'de> for ContentDigest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        if hex.len() != DIGEST_LENGTH * 2 {
            return Err(serde::de::Error::custom(
                "ContentDigest hex string must be 64 characters",
            ));
        }
        let mut bytes = [0u8; DIGEST_LENGTH];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            if !chunk.iter().all(u8::is_ascii_hexdigit) {
                return Err(serde::de::Error::custom(
                    "ContentDigest hex string contains a non-hex character",
                ));
            }
            let s = std::str::from_utf8(chunk).map_err(serde::de::Error::custom)?;
            bytes[i] = u8::from_str_radix(s, 16).map_err(serde::de::Error::custom)?;
        }
        Ok(Self(bytes))
    }
}
