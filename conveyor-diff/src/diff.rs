//! Structural diff between a remote and a local [`ConfigDocument`].
//!
//! Each collection is compared independently, keyed by entity name. Output
//! order is collections in document order (groups, resources, resource types,
//! jobs) and, within a collection, changed entries in remote order, then
//! removed entries in remote order, then added entries in local order.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use conveyor_core::{ConfigDocument, GroupConfig, JobConfig, ResourceConfig, ResourceTypeConfig};

/// Which collection of the document a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Group,
    Resource,
    ResourceType,
    Job,
}

impl CollectionKind {
    pub fn all() -> &'static [CollectionKind] {
        &[
            CollectionKind::Group,
            CollectionKind::Resource,
            CollectionKind::ResourceType,
            CollectionKind::Job,
        ]
    }

    /// Heading used for the collection in a rendered report.
    pub fn plural(self) -> &'static str {
        match self {
            CollectionKind::Group => "groups",
            CollectionKind::Resource => "resources",
            CollectionKind::ResourceType => "resource types",
            CollectionKind::Job => "jobs",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionKind::Group => write!(f, "group"),
            CollectionKind::Resource => write!(f, "resource"),
            CollectionKind::ResourceType => write!(f, "resource type"),
            CollectionKind::Job => write!(f, "job"),
        }
    }
}

/// Snapshot of one entity, serialised exactly like its config.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    Group(GroupConfig),
    Resource(ResourceConfig),
    ResourceType(ResourceTypeConfig),
    Job(JobConfig),
}

/// What happened to one named entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Added { after: Entity },
    Removed { before: Entity },
    Changed { before: Entity, after: Entity },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Removed,
    Changed,
}

/// One entry of a diff run.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRecord {
    pub collection: CollectionKind,
    pub name: String,
    pub change: Change,
}

impl ChangeRecord {
    pub fn kind(&self) -> ChangeKind {
        match self.change {
            Change::Added { .. } => ChangeKind::Added,
            Change::Removed { .. } => ChangeKind::Removed,
            Change::Changed { .. } => ChangeKind::Changed,
        }
    }

    pub fn before(&self) -> Option<&Entity> {
        match &self.change {
            Change::Added { .. } => None,
            Change::Removed { before } | Change::Changed { before, .. } => Some(before),
        }
    }

    pub fn after(&self) -> Option<&Entity> {
        match &self.change {
            Change::Removed { .. } => None,
            Change::Added { after } | Change::Changed { after, .. } => Some(after),
        }
    }

    /// `"<collection> <name> has been added"` and friends.
    pub fn summary(&self) -> String {
        let verb = match self.kind() {
            ChangeKind::Added => "has been added",
            ChangeKind::Removed => "has been removed",
            ChangeKind::Changed => "has changed",
        };
        format!("{} {} {}", self.collection, self.name, verb)
    }
}

/// Entities that can be diffed by name.
trait Named: Clone + PartialEq {
    const COLLECTION: CollectionKind;

    fn name(&self) -> &str;
    fn snapshot(&self) -> Entity;
}

impl Named for GroupConfig {
    const COLLECTION: CollectionKind = CollectionKind::Group;

    fn name(&self) -> &str {
        &self.name
    }

    fn snapshot(&self) -> Entity {
        Entity::Group(self.clone())
    }
}

impl Named for ResourceConfig {
    const COLLECTION: CollectionKind = CollectionKind::Resource;

    fn name(&self) -> &str {
        &self.name
    }

    fn snapshot(&self) -> Entity {
        Entity::Resource(self.clone())
    }
}

impl Named for ResourceTypeConfig {
    const COLLECTION: CollectionKind = CollectionKind::ResourceType;

    fn name(&self) -> &str {
        &self.name
    }

    fn snapshot(&self) -> Entity {
        Entity::ResourceType(self.clone())
    }
}

impl Named for JobConfig {
    const COLLECTION: CollectionKind = CollectionKind::Job;

    fn name(&self) -> &str {
        &self.name
    }

    fn snapshot(&self) -> Entity {
        Entity::Job(self.clone())
    }
}

/// Compare two documents. Neither input is modified.
///
/// `diff(d, d)` is always empty.
pub fn diff(remote: &ConfigDocument, local: &ConfigDocument) -> Vec<ChangeRecord> {
    let mut records = Vec::new();
    diff_collection(&remote.groups, &local.groups, &mut records);
    diff_collection(&remote.resources, &local.resources, &mut records);
    diff_collection(&remote.resource_types, &local.resource_types, &mut records);
    diff_collection(&remote.jobs, &local.jobs, &mut records);
    records
}

/// Name → entity lookup alongside the original sequence. The first
/// occurrence of a duplicated name wins.
fn index<T: Named>(items: &[T]) -> HashMap<&str, &T> {
    let mut map = HashMap::with_capacity(items.len());
    for item in items {
        map.entry(item.name()).or_insert(item);
    }
    map
}

fn diff_collection<T: Named>(remote: &[T], local: &[T], out: &mut Vec<ChangeRecord>) {
    let remote_by_name = index(remote);
    let local_by_name = index(local);

    let mut changed = Vec::new();
    let mut removed = Vec::new();
    let mut added = Vec::new();

    for item in unique(remote) {
        match local_by_name.get(item.name()) {
            Some(other) if *other != item => changed.push(ChangeRecord {
                collection: T::COLLECTION,
                name: item.name().to_string(),
                change: Change::Changed {
                    before: item.snapshot(),
                    after: other.snapshot(),
                },
            }),
            Some(_) => {}
            None => removed.push(ChangeRecord {
                collection: T::COLLECTION,
                name: item.name().to_string(),
                change: Change::Removed {
                    before: item.snapshot(),
                },
            }),
        }
    }

    for item in unique(local) {
        if !remote_by_name.contains_key(item.name()) {
            added.push(ChangeRecord {
                collection: T::COLLECTION,
                name: item.name().to_string(),
                change: Change::Added {
                    after: item.snapshot(),
                },
            });
        }
    }

    out.extend(changed);
    out.extend(removed);
    out.extend(added);
}

/// Items in encounter order, skipping later duplicates of a name.
fn unique<T: Named>(items: &[T]) -> impl Iterator<Item = &T> {
    let mut seen = HashSet::new();
    items.iter().filter(move |item| seen.insert(item.name()))
}
