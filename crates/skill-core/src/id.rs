//! Validated skill identifiers

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use skill_fs::is_valid_skill_id;

use crate::{Error, Result};

/// A skill id matching `^[a-z0-9_][a-z0-9_-]{0,49}$`.
///
/// Ids name directories in both roots, so they are checked before any
/// path is built from them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SkillId(String);

impl SkillId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if is_valid_skill_id(&id) {
            Ok(Self(id))
        } else {
            Err(Error::InvalidSkillId { id })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SkillId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SkillId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("alpha")]
    #[case("code-review")]
    #[case("_private")]
    #[case("a1_b2")]
    fn accepts_valid_ids(#[case] id: &str) {
        assert_eq!(SkillId::new(id).unwrap().as_str(), id);
    }

    #[rstest]
    #[case("")]
    #[case("-leading")]
    #[case("Upper")]
    #[case("../escape")]
    #[case("with space")]
    fn rejects_invalid_ids(#[case] id: &str) {
        assert!(matches!(
            SkillId::new(id),
            Err(Error::InvalidSkillId { .. })
        ));
    }

    #[test]
    fn length_limit_is_fifty() {
        assert!(SkillId::new("a".repeat(50)).is_ok());
        assert!(SkillId::new("a".repeat(51)).is_err());
    }
}
