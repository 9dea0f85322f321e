// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Unbounded membership set for allow/deny lists.
//!
//! Keys are normalized through [`MemberKey`]: every integer width maps to
//! the same numeric identity, text compares by exact equality. Callers that
//! want case-insensitive text lower-case before inserting and probing.

use parking_lot::RwLock;
use std::collections::HashSet;

/// Normalized identity stored in a [`MemberSet`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberKey {
    Numeric(i128),
    Text(String),
}

macro_rules! numeric_member_key {
    ($($t:ty),*) => {
        $(
            impl From<$t> for MemberKey {
                fn from(value: $t) -> Self {
                    MemberKey::Numeric(i128::from(value))
                }
            }
        )*
    };
}

numeric_member_key!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<&str> for MemberKey {
    fn from(value: &str) -> Self {
        MemberKey::Text(value.to_string())
    }
}

impl From<String> for MemberKey {
    fn from(value: String) -> Self {
        MemberKey::Text(value)
    }
}

impl From<&String> for MemberKey {
    fn from(value: &String) -> Self {
        MemberKey::Text(value.clone())
    }
}

/// Thread-safe set of normalized identities.
#[derive(Debug, Default)]
pub struct MemberSet {
    members: RwLock<HashSet<MemberKey>>,
}

impl MemberSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member. Returns true if it was not already present.
    pub fn add(&self, key: impl Into<MemberKey>) -> bool {
        self.members.write().insert(key.into())
    }

    /// Whether the key is a member.
    pub fn get(&self, key: impl Into<MemberKey>) -> bool {
        self.members.read().contains(&key.into())
    }

    /// Remove a member. Returns true if it was present.
    pub fn delete(&self, key: impl Into<MemberKey>) -> bool {
        self.members.write().remove(&key.into())
    }

    /// Atomically swap in a new membership.
    pub fn replace<I, K>(&self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<MemberKey>,
    {
        let fresh: HashSet<MemberKey> = keys.into_iter().map(Into::into).collect();
        *self.members.write() = fresh;
    }

    pub fn len(&self) -> usize {
        self.members.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.read().is_empty()
    }
}

impl<K: Into<MemberKey>> FromIterator<K> for MemberSet {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            members: RwLock::new(iter.into_iter().map(Into::into).collect()),
        }
    }
}
