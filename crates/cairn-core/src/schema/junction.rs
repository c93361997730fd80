use sha2::{Digest, Sha256};

/// Table recording the links of one collection member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Junction {
    pub name: String,
}

impl Junction {
    /// Column holding the owning entity's key
    pub const OWNER: &'static str = "owner_id";

    /// Column holding the related entity's key
    pub const RELATED: &'static str = "related_id";
}

/// How junction tables are named.
///
/// The name is `{owner}_{related}_{member}_link`. A name longer than
/// `max_identifier_length` is replaced by `lnk_` followed by the first 28 hex
/// digits of the SHA-256 of the full name, which is stable across runs and
/// always 32 characters long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JunctionNaming {
    pub max_identifier_length: usize,
}

impl JunctionNaming {
    const HASH_PREFIX: &'static str = "lnk_";
    const HASH_DIGITS: usize = 28;

    pub fn name(&self, owner: &str, related: &str, member: &str) -> String {
        let full = format!("{owner}_{related}_{member}_link");

        if full.len() <= self.max_identifier_length {
            return full;
        }

        let mut hasher = Sha256::new();
        hasher.update(full.as_bytes());
        let hash = hasher.finalize();

        let mut name = String::from(Self::HASH_PREFIX);
        for byte in &hash[..Self::HASH_DIGITS / 2] {
            name.push_str(&format!("{byte:02x}"));
        }
        name
    }
}
