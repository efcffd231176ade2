//! Include cycles among fragments.
//!
//! Fragments and the includes between them form a graph. Every strongly
//! connected component with an internal edge is one cycle, reported once no
//! matter how many statements reach it.

use indexmap::{IndexMap, IndexSet};

use crate::ast::{Mapper, Node};

/// One chain per include cycle, closed on its first fragment: `["a", "b", "a"]`.
///
/// Chains start at the earliest declared fragment of the cycle; cycles are
/// listed in declaration order of that fragment.
pub fn fragment_cycles(mapper: &Mapper) -> Vec<Vec<String>> {
    let graph = IncludeGraph::build(mapper);
    let mut cycles: Vec<(usize, Vec<String>)> = SccFinder::find(&graph)
        .into_iter()
        .filter(|scc| graph.is_recursive(scc))
        .filter_map(|scc| {
            let start = scc
                .iter()
                .copied()
                .min_by_key(|id| graph.order(id))?;
            let chain = CycleFinder::find(&graph, &scc, start)?;
            Some((graph.order(start), chain))
        })
        .collect();

    cycles.sort_by_key(|(order, _)| *order);
    cycles.into_iter().map(|(_, chain)| chain).collect()
}

/// Fragment id -> fragments its body includes, in declaration order.
struct IncludeGraph<'m> {
    edges: IndexMap<&'m str, IndexSet<&'m str>>,
}

impl<'m> IncludeGraph<'m> {
    fn build(mapper: &'m Mapper) -> Self {
        let mut edges = IndexMap::new();
        for fragment in &mapper.fragments {
            let mut refs = IndexSet::new();
            collect_includes(&fragment.root, &mut refs);
            refs.retain(|id| mapper.fragment(id).is_some());
            edges.entry(fragment.id.as_str()).or_insert(refs);
        }
        Self { edges }
    }

    fn order(&self, id: &str) -> usize {
        self.edges.get_index_of(id).unwrap_or(usize::MAX)
    }

    fn targets(&self, id: &str) -> impl Iterator<Item = &'m str> + '_ {
        self.edges.get(id).into_iter().flatten().copied()
    }

    fn is_recursive(&self, scc: &[&str]) -> bool {
        match scc {
            [single] => self.targets(single).any(|t| t == *single),
            _ => !scc.is_empty(),
        }
    }
}

/// Collect include ids in source order.
pub(super) fn collect_includes<'n>(node: &'n Node, out: &mut IndexSet<&'n str>) {
    if let Node::Include(id) = node {
        out.insert(id.as_str());
        return;
    }
    for child in node.child_lists().into_iter().flatten() {
        collect_includes(child, out);
    }
}

/// Tarjan's strongly connected components over the include graph.
struct SccFinder<'g, 'm> {
    graph: &'g IncludeGraph<'m>,
    index: usize,
    stack: Vec<&'m str>,
    on_stack: IndexSet<&'m str>,
    indices: IndexMap<&'m str, usize>,
    lowlinks: IndexMap<&'m str, usize>,
    sccs: Vec<Vec<&'m str>>,
}

impl<'g, 'm> SccFinder<'g, 'm> {
    fn find(graph: &'g IncludeGraph<'m>) -> Vec<Vec<&'m str>> {
        let mut finder = Self {
            graph,
            index: 0,
            stack: Vec::new(),
            on_stack: IndexSet::new(),
            indices: IndexMap::new(),
            lowlinks: IndexMap::new(),
            sccs: Vec::new(),
        };

        for &id in graph.edges.keys() {
            if !finder.indices.contains_key(id) {
                finder.strongconnect(id);
            }
        }

        finder.sccs
    }

    fn strongconnect(&mut self, id: &'m str) {
        self.indices.insert(id, self.index);
        self.lowlinks.insert(id, self.index);
        self.index += 1;
        self.stack.push(id);
        self.on_stack.insert(id);

        let targets: Vec<&'m str> = self.graph.targets(id).collect();
        for target in targets {
            if !self.indices.contains_key(target) {
                self.strongconnect(target);
                let low = self.lowlinks[target];
                self.lower(id, low);
            } else if self.on_stack.contains(target) {
                let index = self.indices[target];
                self.lower(id, index);
            }
        }

        if self.lowlinks[id] == self.indices[id] {
            let mut scc = Vec::new();
            while let Some(w) = self.stack.pop() {
                self.on_stack.swap_remove(w);
                scc.push(w);
                if w == id {
                    break;
                }
            }
            self.sccs.push(scc);
        }
    }

    fn lower(&mut self, id: &str, candidate: usize) {
        if let Some(low) = self.lowlinks.get_mut(id) {
            *low = (*low).min(candidate);
        }
    }
}

/// Depth-first search for a path from `start` back to itself inside one component.
struct CycleFinder<'g, 'm> {
    graph: &'g IncludeGraph<'m>,
    domain: IndexSet<&'m str>,
    visited: IndexSet<&'m str>,
    path: Vec<&'m str>,
}

impl<'g, 'm> CycleFinder<'g, 'm> {
    fn find(graph: &'g IncludeGraph<'m>, scc: &[&'m str], start: &'m str) -> Option<Vec<String>> {
        let mut finder = Self {
            graph,
            domain: scc.iter().copied().collect(),
            visited: IndexSet::new(),
            path: Vec::new(),
        };

        finder.dfs(start, start).then(|| {
            let mut chain: Vec<String> = finder.path.iter().map(|id| id.to_string()).collect();
            chain.push(start.to_string());
            chain
        })
    }

    fn dfs(&mut self, current: &'m str, start: &'m str) -> bool {
        self.visited.insert(current);
        self.path.push(current);

        let targets: Vec<&'m str> = self
            .graph
            .targets(current)
            .filter(|t| self.domain.contains(t))
            .collect();

        if targets.contains(&start) {
            return true;
        }
        for target in targets {
            if !self.visited.contains(target) && self.dfs(target, start) {
                return true;
            }
        }

        self.path.pop();
        false
    }
}
