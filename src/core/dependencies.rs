//! Condition dependency chains.
//!
//! A condition is sound when everything it depends on is defined: the
//! variable a `variable`/`exists` condition tests, and every condition an
//! `and`/`or`/`not`/`xor` condition combines, transitively. Chains are walked
//! depth-first from each root while keeping the current path, so a broken
//! link can be shown together with how it was reached.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use crate::core::containers::{IzConditions, IzContainer, conditions::NO_VARIABLE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Condition,
    Variable,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Condition => write!(f, "condition"),
            NodeKind::Variable => write!(f, "variable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyNode {
    pub id: String,
    pub kind: NodeKind,
}

impl DependencyNode {
    pub fn condition(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Condition,
        }
    }

    pub fn variable(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Variable,
        }
    }
}

impl fmt::Display for DependencyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.kind)
    }
}

/// Nodes from a root condition to the problem, inclusive.
pub type DependencyPath = Vec<DependencyNode>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyProblem {
    /// The last node is not defined.
    Broken(DependencyPath),
    /// The last node already appears earlier on the path.
    Cycle(DependencyPath),
}

impl DependencyProblem {
    pub fn path(&self) -> &[DependencyNode] {
        match self {
            DependencyProblem::Broken(path) | DependencyProblem::Cycle(path) => path,
        }
    }

    /// The condition whose definition holds the failing link.
    pub fn parent(&self) -> Option<&DependencyNode> {
        let path = self.path();
        path.len().checked_sub(2).map(|idx| &path[idx])
    }

    pub fn last(&self) -> Option<&DependencyNode> {
        self.path().last()
    }
}

/// `a (condition) → b (condition) → X (variable)`
pub fn render_path(path: &[DependencyNode]) -> String {
    path.iter()
        .map(DependencyNode::to_string)
        .collect::<Vec<_>>()
        .join(" → ")
}

/// One line per node, each indented below its parent.
pub fn render_tree(path: &[DependencyNode]) -> Vec<String> {
    path.iter()
        .enumerate()
        .map(|(depth, node)| {
            if depth == 0 {
                format!("{} : ({})", node.id, node.kind)
            } else {
                format!("{}\u{02ea}\u{2192} {} : ({})", " ".repeat(depth * 3), node.id, node.kind)
            }
        })
        .collect()
}

/// Every dependency problem reachable from `root`.
pub fn verify_dependencies(
    root: &str,
    conditions: &IzConditions,
    variables: &dyn IzContainer,
) -> Vec<DependencyProblem> {
    let mut walker = Walker::new(conditions, variables);
    walker.walk_root(root);
    walker.problems
}

/// Depth-first walker shared by all roots of one check.
///
/// `depths` holds the shallowest depth each condition was entered at. A
/// condition reached again no shallower is skipped, so shared sub-chains are
/// walked once, and a shorter path still re-walks them.
struct Walker<'a> {
    conditions: &'a IzConditions,
    variables: &'a dyn IzContainer,
    depths: BTreeMap<String, usize>,
    path: DependencyPath,
    problems: Vec<DependencyProblem>,
}

impl<'a> Walker<'a> {
    fn new(conditions: &'a IzConditions, variables: &'a dyn IzContainer) -> Self {
        Self {
            conditions,
            variables,
            depths: BTreeMap::new(),
            path: Vec::new(),
            problems: Vec::new(),
        }
    }

    fn walk_root(&mut self, root: &str) {
        self.path.clear();
        self.walk(root);
    }

    fn walk(&mut self, id: &str) {
        let depth = self.path.len();
        if self.depths.get(id).is_some_and(|&seen| seen <= depth) {
            return;
        }
        self.depths.insert(id.to_string(), depth);

        let conditions = self.conditions;
        self.path.push(DependencyNode::condition(id));

        if conditions.white_list().contains(id) {
            self.path.pop();
            return;
        }

        let Some(spec) = conditions.spec(id) else {
            self.problems.push(DependencyProblem::Broken(self.path.clone()));
            self.path.pop();
            return;
        };

        if spec.tests_variable() {
            let variable = spec.variable.as_deref().unwrap_or(NO_VARIABLE);
            if !self.variables.is_defined(variable) {
                let mut broken = self.path.clone();
                broken.push(DependencyNode::variable(variable));
                self.problems.push(DependencyProblem::Broken(broken));
            }
        } else if spec.is_compound() {
            for refid in &spec.refids {
                let node = DependencyNode::condition(refid.as_str());
                if self.path.contains(&node) {
                    let mut cycle = self.path.clone();
                    cycle.push(node);
                    self.problems.push(DependencyProblem::Cycle(cycle));
                    continue;
                }
                self.walk(refid);
            }
        }

        self.path.pop();
    }
}

/// Verify every root and report each problem once.
///
/// Broken links are keyed by (parent, missing node) and keep the shortest path
/// reaching them; cycles are keyed by their member set. A root that is itself
/// undefined is not a dependency problem.
pub fn check_all_dependencies<'a>(
    roots: impl IntoIterator<Item = &'a str>,
    conditions: &IzConditions,
    variables: &dyn IzContainer,
) -> Vec<DependencyProblem> {
    let mut broken: BTreeMap<(String, DependencyNode), DependencyPath> = BTreeMap::new();
    let mut cycles: BTreeMap<BTreeSet<String>, DependencyPath> = BTreeMap::new();

    let mut walker = Walker::new(conditions, variables);
    for root in roots {
        walker.walk_root(root);
    }

    for problem in walker.problems {
        match problem {
            DependencyProblem::Broken(path) => {
                if path.len() < 2 {
                    continue;
                }
                let parent = path[path.len() - 2].id.clone();
                let missing = path[path.len() - 1].clone();
                let entry = broken.entry((parent, missing)).or_insert_with(|| path.clone());
                if path.len() < entry.len() {
                    *entry = path;
                }
            }
            DependencyProblem::Cycle(path) => {
                let Some(last) = path.last() else {
                    continue;
                };
                let start = path.iter().position(|node| node == last).unwrap_or(0);
                let members: BTreeSet<String> =
                    path[start..].iter().map(|node| node.id.clone()).collect();
                cycles.entry(members).or_insert(path);
            }
        }
    }

    broken
        .into_values()
        .map(DependencyProblem::Broken)
        .chain(cycles.into_values().map(DependencyProblem::Cycle))
        .collect()
}
