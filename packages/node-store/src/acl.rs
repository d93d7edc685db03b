//! Access-control descriptors.
//!
//! These are plain data handed through to the coordination service at node
//! creation. Nothing here enforces them; the service does.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use base64::Engine;
use sha1::{Digest, Sha1};

/// A set of node permissions.
///
/// Bit values match ZooKeeper's `ZooDefs.Perms`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Perms(u8);

impl Perms {
    pub const NONE: Perms = Perms(0);
    pub const READ: Perms = Perms(1);
    pub const WRITE: Perms = Perms(1 << 1);
    pub const CREATE: Perms = Perms(1 << 2);
    pub const DELETE: Perms = Perms(1 << 3);
    pub const ADMIN: Perms = Perms(1 << 4);
    pub const ALL: Perms = Perms(0b1_1111);

    /// Raw permission bits.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Build from raw bits, dropping unknown ones.
    pub fn from_bits_truncate(bits: u8) -> Self {
        Perms(bits & Self::ALL.0)
    }

    /// Check whether every permission in `other` is granted.
    pub fn contains(self, other: Perms) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Perms {
    type Output = Perms;

    fn bitor(self, rhs: Perms) -> Perms {
        Perms(self.0 | rhs.0)
    }
}

impl BitOrAssign for Perms {
    fn bitor_assign(&mut self, rhs: Perms) {
        self.0 |= rhs.0;
    }
}

/// Renders in the `cdrwa` letter order of the ZooKeeper shell.
impl fmt::Display for Perms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (perm, letter) in [
            (Perms::CREATE, 'c'),
            (Perms::DELETE, 'd'),
            (Perms::READ, 'r'),
            (Perms::WRITE, 'w'),
            (Perms::ADMIN, 'a'),
        ] {
            if self.contains(perm) {
                write!(f, "{}", letter)?;
            }
        }
        Ok(())
    }
}

/// One access-control entry: who (`scheme` + `id`) may do what (`perms`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Acl {
    pub scheme: String,
    pub id: String,
    pub perms: Perms,
}

impl Acl {
    /// An entry for an arbitrary scheme and credential.
    ///
    /// For the `digest` scheme the credential must already be in hashed form;
    /// see [`digest_credential`] or use [`Acl::digest`].
    pub fn new(scheme: impl Into<String>, credential: impl Into<String>, perms: Perms) -> Self {
        Acl {
            scheme: scheme.into(),
            id: credential.into(),
            perms,
        }
    }

    /// A `digest` entry for a username and plain-text password.
    ///
    /// # Example
    ///
    /// ```rust
    /// use treeconf_node_store::{Acl, Perms};
    ///
    /// let acl = Acl::digest("user", "password", Perms::READ | Perms::WRITE);
    /// assert_eq!(acl.scheme, "digest");
    /// assert_eq!(acl.id, "user:tpUq/4Pn5A64fVZyQ0gOJ8ZWqkY=");
    /// ```
    pub fn digest(username: &str, password: &str, perms: Perms) -> Self {
        Acl::new("digest", digest_credential(username, password), perms)
    }

    /// An entry matching every client (`world:anyone`).
    pub fn world_anyone(perms: Perms) -> Self {
        Acl::new("world", "anyone", perms)
    }

    /// `world:anyone` with every permission.
    pub fn open_unsafe() -> Self {
        Acl::world_anyone(Perms::ALL)
    }
}

impl fmt::Display for Acl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.scheme, self.id, self.perms)
    }
}

/// The hashed `digest` credential: `username:base64(sha1("username:password"))`.
pub fn digest_credential(username: &str, password: &str) -> String {
    let hash = Sha1::digest(format!("{}:{}", username, password).as_bytes());
    let encoded = base64::engine::general_purpose::STANDARD.encode(hash);
    format!("{}:{}", username, encoded)
}
