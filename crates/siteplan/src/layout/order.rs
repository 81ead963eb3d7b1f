//! Crossing reduction for top-level subtrees.
//!
//! Left-to-right placement order of the top-level subtrees is the only
//! degree of freedom the layout has, so navigation edges between
//! subtrees are untangled here: subtrees connected by links are placed
//! next to each other greedily, weighted by link count. This is a
//! heuristic, not an optimum; it removes the crossings that matter in
//! practice (pairs of subtrees linking past each other).
//!
//! All bookkeeping uses [`IndexMap`]/[`IndexSet`] so ties break by
//! first discovery and the ordering stays deterministic.

use indexmap::{IndexMap, IndexSet};

use siteplan_core::SiteNode;

fn collect_names<'a>(node: &'a SiteNode, names: &mut IndexSet<&'a str>) {
    names.insert(node.name.as_str());
    for child in &node.children {
        collect_names(child, names);
    }
}

fn collect_internal_links<'a>(node: &'a SiteNode, links: &mut Vec<(&'a str, &'a str)>) {
    for link in &node.links {
        if let Some(target) = link.target() {
            links.push((node.name.as_str(), target));
        }
    }
    for child in &node.children {
        collect_internal_links(child, links);
    }
}

/// Reorder top-level subtrees so that subtrees linked to each other end
/// up adjacent.
///
/// Subtrees are placed greedily: start from the subtree with the most
/// cross-subtree links, then repeatedly append the unplaced subtree
/// most strongly connected to the last placed one, falling back to
/// source order when the last placed subtree has no unplaced neighbor.
/// Inputs with at most two subtrees or no cross-subtree links keep
/// their source order.
pub(crate) fn reorder_to_reduce_crossings(nodes: &[SiteNode]) -> Vec<&SiteNode> {
    if nodes.len() <= 2 {
        return nodes.iter().collect();
    }

    let subtree_names: IndexMap<&str, IndexSet<&str>> = nodes
        .iter()
        .map(|node| {
            let mut names = IndexSet::new();
            collect_names(node, &mut names);
            (node.name.as_str(), names)
        })
        .collect();
    let owner_of = |name: &str| -> Option<&str> {
        subtree_names
            .iter()
            .find(|(_, names)| names.contains(name))
            .map(|(&top, _)| top)
    };

    let mut all_links = Vec::new();
    for node in nodes {
        collect_internal_links(node, &mut all_links);
    }

    let mut cross_links = Vec::new();
    for (from, to) in all_links {
        if let (Some(from_tree), Some(to_tree)) = (owner_of(from), owner_of(to)) {
            if from_tree != to_tree {
                cross_links.push((from_tree, to_tree));
            }
        }
    }

    if cross_links.is_empty() {
        return nodes.iter().collect();
    }

    let mut weights: IndexMap<&str, IndexMap<&str, u32>> = IndexMap::new();
    for (from, to) in cross_links {
        *weights.entry(from).or_default().entry(to).or_default() += 1;
        *weights.entry(to).or_default().entry(from).or_default() += 1;
    }

    // Start from the subtree with the most cross-links.
    let mut best_start = nodes[0].name.as_str();
    let mut best_count = 0;
    for (&name, neighbors) in &weights {
        let total: u32 = neighbors.values().sum();
        if total > best_count {
            best_count = total;
            best_start = name;
        }
    }

    let node_by_name: IndexMap<&str, &SiteNode> =
        nodes.iter().map(|n| (n.name.as_str(), n)).collect();
    let mut remaining: IndexSet<&str> = node_by_name.keys().copied().collect();
    let mut placed = vec![node_by_name[best_start]];
    remaining.swap_remove(best_start);

    while !remaining.is_empty() {
        let last_placed = placed.last().unwrap().name.as_str();
        let best_next = weights.get(last_placed).and_then(|neighbors| {
            let mut best: Option<(&str, u32)> = None;
            for (&neighbor, &weight) in neighbors {
                if remaining.contains(neighbor) && weight > best.map_or(0, |(_, w)| w) {
                    best = Some((neighbor, weight));
                }
            }
            best.map(|(name, _)| name)
        });

        // Fall back to the first remaining subtree in source order.
        let next = best_next.unwrap_or_else(|| {
            nodes
                .iter()
                .map(|n| n.name.as_str())
                .find(|name| remaining.contains(name))
                .unwrap()
        });
        placed.push(node_by_name[next]);
        remaining.swap_remove(next);
    }

    placed
}
