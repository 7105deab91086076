//! Layered merging of configuration fragments.
//!
//! Fragments are merged in precedence order (lowest first). Each field is
//! merged on its own according to the policy its type carries:
//!
//! | Field type        | Policy                   | Result                                  |
//! |-------------------|--------------------------|-----------------------------------------|
//! | `Option<T>`       | `OverrideOnPresence`     | last `Some` wins                        |
//! | `BTreeMap<K, V>`  | `ReplaceWholeOnNonEmpty` | last non-empty map wins, not key-wise   |
//! | `Vec<T>`          | `ConcatenateSequence`    | all sequences appended in order         |
//!
//! Grouped sections (like `[ports]`) implement [`Merge`] and merge each of
//! their own fields the same way.
//!
//! A field whose type has no [`MergeField`] impl does not compile, and the
//! struct literals in the [`Merge`] impls name every field, so a new field
//! can't be added without choosing how it merges.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, trace};

use crate::fragment::{Fragment, Ports};

/// How a single field combines across fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    OverrideOnPresence,
    ReplaceWholeOnNonEmpty,
    ConcatenateSequence,
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OverrideOnPresence => "override_on_presence",
            Self::ReplaceWholeOnNonEmpty => "replace_whole_on_non_empty",
            Self::ConcatenateSequence => "concatenate_sequence",
        };
        f.write_str(name)
    }
}

/// A leaf field value with a declared merge policy.
pub trait MergeField: Sized {
    const POLICY: MergePolicy;

    /// Combine the values of this field from every fragment, in precedence order.
    fn merge_field<'a, I>(values: I) -> Self
    where
        I: Iterator<Item = &'a Self>,
        Self: 'a;
}

impl<T: Clone> MergeField for Option<T> {
    const POLICY: MergePolicy = MergePolicy::OverrideOnPresence;

    fn merge_field<'a, I>(values: I) -> Self
    where
        I: Iterator<Item = &'a Self>,
        Self: 'a,
    {
        values.filter_map(Option::as_ref).last().cloned()
    }
}

impl<K: Clone + Ord, V: Clone> MergeField for BTreeMap<K, V> {
    const POLICY: MergePolicy = MergePolicy::ReplaceWholeOnNonEmpty;

    fn merge_field<'a, I>(values: I) -> Self
    where
        I: Iterator<Item = &'a Self>,
        Self: 'a,
    {
        values
            .filter(|map| !map.is_empty())
            .last()
            .cloned()
            .unwrap_or_default()
    }
}

impl<T: Clone> MergeField for Vec<T> {
    const POLICY: MergePolicy = MergePolicy::ConcatenateSequence;

    fn merge_field<'a, I>(values: I) -> Self
    where
        I: Iterator<Item = &'a Self>,
        Self: 'a,
    {
        values.flat_map(|seq| seq.iter()).cloned().collect()
    }
}

/// A group of fields merged field by field.
pub trait Merge: Sized {
    /// Merge `layers`, lowest precedence first.
    ///
    /// The iterator is cloned once per field.
    fn merge<'a, I>(layers: I) -> Self
    where
        I: Iterator<Item = &'a Self> + Clone,
        Self: 'a;
}

impl Merge for Ports {
    fn merge<'a, I>(layers: I) -> Self
    where
        I: Iterator<Item = &'a Self> + Clone,
        Self: 'a,
    {
        Ports {
            dns: field("ports.dns", layers.map(|p| &p.dns)),
        }
    }
}

impl Merge for Fragment {
    fn merge<'a, I>(layers: I) -> Self
    where
        I: Iterator<Item = &'a Self> + Clone,
        Self: 'a,
    {
        Fragment {
            bootstrap: field("bootstrap", layers.clone().map(|f| &f.bootstrap)),
            check_update_interval: field(
                "check_update_interval",
                layers.clone().map(|f| &f.check_update_interval),
            ),
            datacenter: field("datacenter", layers.clone().map(|f| &f.datacenter)),
            bind_addr: field("bind_addr", layers.clone().map(|f| &f.bind_addr)),
            join_addrs_lan: field("start_join", layers.clone().map(|f| &f.join_addrs_lan)),
            node_meta: field("node_meta", layers.clone().map(|f| &f.node_meta)),
            ports: Ports::merge(layers.map(|f| &f.ports)),
        }
    }
}

fn field<'a, T>(name: &str, values: impl Iterator<Item = &'a T>) -> T
where
    T: MergeField + 'a,
{
    let policy = T::POLICY;
    trace!(field = name, %policy, "merging field");
    T::merge_field(values)
}

/// Combine `fragments` (lowest precedence first) into a single fragment.
pub fn merge_fragments(fragments: &[Fragment]) -> Fragment {
    debug!(fragments = fragments.len(), "merging configuration fragments");
    Fragment::merge(fragments.iter())
}
