//! Inventory data model.
//!
//! Parsers feed an [`InventoryBuilder`] with raw declarations (group
//! membership, child groups, group and host variables); [`InventoryBuilder::build`]
//! resolves them into an [`Inventory`] where every group lists all of its
//! hosts, children included, and every host carries its merged variables.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::{Error, Result};

/// Group holding every host.
pub const ALL_GROUP: &str = "all";
/// Group holding hosts that belong to no other group.
pub const UNGROUPED_GROUP: &str = "ungrouped";

/// A host with its resolved variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    name: String,
    vars: BTreeMap<String, String>,
}

impl Host {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

/// A named group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    name: String,
    hosts: Vec<String>,
    children: Vec<String>,
    vars: BTreeMap<String, String>,
}

impl Group {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Host names in declaration order, followed by hosts inherited from
    /// child groups. Each host appears once.
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Direct child group names.
    pub fn children(&self) -> &[String] {
        &self.children
    }

    /// Variables declared on this group only.
    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }
}

/// A resolved inventory.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    groups: Vec<Group>,
    group_index: HashMap<String, usize>,
    hosts: HashMap<String, Host>,
}

impl Inventory {
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.group_index.get(name).map(|&index| &self.groups[index])
    }

    /// Groups in order of first mention, starting with `all` and `ungrouped`.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    pub fn host(&self, name: &str) -> Option<&Host> {
        self.hosts.get(name)
    }
}

#[derive(Debug)]
struct GroupDraft {
    name: String,
    hosts: Vec<String>,
    children: Vec<String>,
    vars: BTreeMap<String, String>,
}

/// Collects inventory declarations and resolves them.
#[derive(Debug)]
pub struct InventoryBuilder {
    groups: Vec<GroupDraft>,
    group_index: HashMap<String, usize>,
    host_order: Vec<String>,
    host_vars: HashMap<String, BTreeMap<String, String>>,
}

impl Default for InventoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            groups: Vec::new(),
            group_index: HashMap::new(),
            host_order: Vec::new(),
            host_vars: HashMap::new(),
        };
        builder.add_group(ALL_GROUP);
        builder.add_group(UNGROUPED_GROUP);
        builder
    }

    /// Declare a group, keeping it even if it ends up with no hosts.
    pub fn add_group(&mut self, name: &str) {
        self.draft(name);
    }

    /// Add `host` to `group`, merging `vars` into the host's own variables.
    /// Later declarations override earlier ones.
    pub fn add_host<I>(&mut self, group: &str, host: &str, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let draft = self.draft(group);
        if !draft.hosts.iter().any(|h| h == host) {
            draft.hosts.push(host.to_string());
        }

        if !self.host_vars.contains_key(host) {
            self.host_order.push(host.to_string());
        }
        self.host_vars
            .entry(host.to_string())
            .or_default()
            .extend(vars);
    }

    pub fn set_group_var(&mut self, group: &str, key: &str, value: &str) {
        self.draft(group)
            .vars
            .insert(key.to_string(), value.to_string());
    }

    pub fn add_child(&mut self, parent: &str, child: &str) {
        self.draft(child);
        let draft = self.draft(parent);
        if !draft.children.iter().any(|c| c == child) {
            draft.children.push(child.to_string());
        }
    }

    /// Resolve group membership and variable precedence.
    ///
    /// Host variables merge, lowest precedence first: `all` group vars, then
    /// every other group containing the host ordered by depth (a group is one
    /// level deeper than its deepest parent) and then by name, then the
    /// host's own variables.
    ///
    /// # Errors
    /// Returns [`Error::ChildCycle`] when a group is its own descendant.
    pub fn build(self) -> Result<Inventory> {
        check_cycles(&self.groups, &self.group_index)?;

        let mut cache = HashMap::new();
        let mut resolved: Vec<Vec<String>> = (0..self.groups.len())
            .map(|index| resolve_hosts(index, &self.groups, &self.group_index, &mut cache))
            .collect();

        let all = self.group_index[ALL_GROUP];
        resolved[all] = self.host_order.clone();

        let ungrouped = self.group_index[UNGROUPED_GROUP];
        let grouped: HashSet<&String> = resolved
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != all && *index != ungrouped)
            .flat_map(|(_, hosts)| hosts.iter())
            .collect();
        // Hosts declared straight under `all` land here too.
        let still_ungrouped: Vec<String> = self
            .host_order
            .iter()
            .filter(|host| !grouped.contains(host))
            .cloned()
            .collect();
        resolved[ungrouped] = still_ungrouped;

        let depths = group_depths(&self.groups, &self.group_index, all);
        let mut precedence: Vec<usize> = (0..self.groups.len()).collect();
        precedence.sort_by(|&a, &b| {
            depths[a]
                .cmp(&depths[b])
                .then_with(|| self.groups[a].name.cmp(&self.groups[b].name))
        });

        let mut hosts = HashMap::with_capacity(self.host_order.len());
        for name in &self.host_order {
            let mut vars = BTreeMap::new();
            for &index in &precedence {
                if resolved[index].contains(name) {
                    vars.extend(
                        self.groups[index]
                            .vars
                            .iter()
                            .map(|(k, v)| (k.clone(), v.clone())),
                    );
                }
            }
            if let Some(own) = self.host_vars.get(name) {
                vars.extend(own.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            hosts.insert(
                name.clone(),
                Host {
                    name: name.clone(),
                    vars,
                },
            );
        }

        let groups = self
            .groups
            .into_iter()
            .zip(resolved)
            .map(|(draft, hosts)| Group {
                name: draft.name,
                hosts,
                children: draft.children,
                vars: draft.vars,
            })
            .collect::<Vec<_>>();

        tracing::debug!(groups = groups.len(), hosts = hosts.len(), "Inventory resolved");

        Ok(Inventory {
            groups,
            group_index: self.group_index,
            hosts,
        })
    }

    fn draft(&mut self, name: &str) -> &mut GroupDraft {
        let index = match self.group_index.get(name) {
            Some(&index) => index,
            None => {
                self.groups.push(GroupDraft {
                    name: name.to_string(),
                    hosts: Vec::new(),
                    children: Vec::new(),
                    vars: BTreeMap::new(),
                });
                let index = self.groups.len() - 1;
                self.group_index.insert(name.to_string(), index);
                index
            }
        };
        &mut self.groups[index]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Active,
    Done,
}

fn check_cycles(groups: &[GroupDraft], index: &HashMap<String, usize>) -> Result<()> {
    let mut marks = vec![Mark::Unvisited; groups.len()];
    for group in 0..groups.len() {
        visit(group, groups, index, &mut marks)?;
    }
    Ok(())
}

fn visit(
    group: usize,
    groups: &[GroupDraft],
    index: &HashMap<String, usize>,
    marks: &mut [Mark],
) -> Result<()> {
    match marks[group] {
        Mark::Done => return Ok(()),
        Mark::Active => {
            return Err(Error::ChildCycle {
                group: groups[group].name.clone(),
            });
        }
        Mark::Unvisited => {}
    }

    marks[group] = Mark::Active;
    for child in &groups[group].children {
        if let Some(&child) = index.get(child) {
            visit(child, groups, index, marks)?;
        }
    }
    marks[group] = Mark::Done;
    Ok(())
}

fn resolve_hosts(
    group: usize,
    groups: &[GroupDraft],
    index: &HashMap<String, usize>,
    cache: &mut HashMap<usize, Vec<String>>,
) -> Vec<String> {
    if let Some(hosts) = cache.get(&group) {
        return hosts.clone();
    }

    let mut seen = HashSet::new();
    let mut hosts = Vec::new();
    for host in &groups[group].hosts {
        if seen.insert(host.clone()) {
            hosts.push(host.clone());
        }
    }
    for child in &groups[group].children {
        let Some(&child) = index.get(child) else {
            continue;
        };
        for host in resolve_hosts(child, groups, index, cache) {
            if seen.insert(host.clone()) {
                hosts.push(host);
            }
        }
    }

    cache.insert(group, hosts.clone());
    hosts
}

fn group_depths(groups: &[GroupDraft], index: &HashMap<String, usize>, all: usize) -> Vec<usize> {
    let mut parents = vec![Vec::new(); groups.len()];
    for (parent, group) in groups.iter().enumerate() {
        for child in &group.children {
            if let Some(&child) = index.get(child) {
                parents[child].push(parent);
            }
        }
    }

    let mut depths = vec![None; groups.len()];
    (0..groups.len())
        .map(|group| depth(group, all, &parents, &mut depths))
        .collect()
}

fn depth(group: usize, all: usize, parents: &[Vec<usize>], depths: &mut [Option<usize>]) -> usize {
    if group == all {
        return 0;
    }
    if let Some(known) = depths[group] {
        return known;
    }

    let deepest_parent = parents[group]
        .iter()
        .map(|&parent| depth(parent, all, parents, depths))
        .max()
        .unwrap_or(0);
    let value = deepest_parent + 1;
    depths[group] = Some(value);
    value
}
