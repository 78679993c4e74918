//! Validation groups and group conversion.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{CascadingError, CascadingResult};

/// Identity of a validation group.
///
/// Cloning is cheap; the name is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Group(Arc<str>);

impl Group {
    const DEFAULT: &'static str = "Default";

    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The group validated when none is requested.
    pub fn default_group() -> Self {
        Self::new(Self::DEFAULT)
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        &*self.0 == Self::DEFAULT
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::default_group()
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Group {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Source group to target group, applied when cascading.
pub type GroupConversions = BTreeMap<Group, Group>;

/// Fails if merging `other` into `target` would convert a source group to
/// two different targets.
pub(crate) fn check_conversions(target: &GroupConversions, other: &GroupConversions) -> CascadingResult<()> {
    for (from, to) in other {
        if let Some(existing) = target.get(from)
            && existing != to
        {
            return Err(CascadingError::ConflictingGroupConversion {
                from: from.to_string(),
                first: existing.to_string(),
                second: to.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_group() {
        assert!(Group::default().is_default());
        assert!(!Group::new("Strict").is_default());
        assert_eq!(Group::from("Strict").to_string(), "Strict");
    }

    #[test]
    fn test_check_conversions() {
        let target = GroupConversions::from([(Group::default_group(), Group::new("Basic"))]);
        let compatible = GroupConversions::from([
            (Group::default_group(), Group::new("Basic")),
            (Group::new("Full"), Group::new("Extended")),
        ]);
        assert!(check_conversions(&target, &compatible).is_ok());

        let conflict = check_conversions(
            &target,
            &GroupConversions::from([(Group::default_group(), Group::new("Other"))]),
        );
        assert!(matches!(conflict, Err(CascadingError::ConflictingGroupConversion { .. })));
    }
}
