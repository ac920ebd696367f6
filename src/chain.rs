//! Portable chain logic: root-anchor inspection, leaf-name extraction, and
//! exact name matching. Operates on the [`Certificate`] sequence a
//! [`crate::provider::ChainContext`] produces, leaf first.

use crate::provider::{Certificate, RootAuthority};

/// Whether the chain terminates in the designated root authority.
///
/// The terminal certificate must be self-signed; a chain whose walk stopped
/// short of a root is not anchored. An empty chain is never anchored.
pub fn is_anchored_to(chain: &[Certificate], authority: &RootAuthority) -> bool {
    let Some(root) = chain.last() else {
        return false;
    };
    if !root.is_self_signed {
        return false;
    }
    authority.matches(root)
}

/// The leaf certificate's subject and issuer display names.
///
/// Returns `None` when the chain has no leaf or either name came back empty,
/// which the orchestrator reports as a detail-fetch failure.
pub fn leaf_names(chain: &[Certificate]) -> Option<(&str, &str)> {
    let leaf = chain.first()?;
    if leaf.subject_name.is_empty() || leaf.issuer_name.is_empty() {
        return None;
    }
    Some((&leaf.subject_name, &leaf.issuer_name))
}

/// Exact, byte-wise, case-sensitive comparison of an expected display name
/// against an extracted one. An empty `expected` means "no constraint" and
/// always matches.
pub fn name_matches(expected: &str, actual: &str) -> bool {
    expected.is_empty() || expected == actual
}
