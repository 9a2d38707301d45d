use crate::helper::public_helpers::ReaderError;
use crate::models::db_operations::categories_db_operations;
use crate::models::{CategoryLink, CategoryNode};
use rusqlite::Connection;
use std::collections::HashMap;

/// Root categories of a site, in `(sort_order, id)` order, each carrying its
/// descendants as `children`. A site without categories yields an empty list.
pub fn load_root_categories(conn: &Connection, site_id: i64, lang_id: i64) -> Result<Vec<CategoryNode>, ReaderError> {
    let nodes = categories_db_operations::read_site_categories(conn, site_id, lang_id)?;
    Ok(build_tree(nodes))
}

/// Annotates every node, at every depth, with links to the other nodes that
/// share its parent. Recomputed from the tree itself, so calling it again
/// gives the same result.
pub fn attach_siblings(nodes: &mut [CategoryNode]) {
    let links: Vec<CategoryLink> = nodes.iter().map(CategoryLink::from).collect();
    for node in nodes.iter_mut() {
        node.siblings = links.iter().filter(|link| link.id != node.id).cloned().collect();
        attach_siblings(&mut node.children);
    }
}

// `nodes` arrive sorted; grouping by parent keeps that order within each level.
fn build_tree(nodes: Vec<CategoryNode>) -> Vec<CategoryNode> {
    let mut roots = Vec::new();
    let mut by_parent: HashMap<i64, Vec<CategoryNode>> = HashMap::new();
    for node in nodes {
        match node.parent_id {
            None => roots.push(node),
            Some(parent_id) => by_parent.entry(parent_id).or_default().push(node),
        }
    }

    roots
        .into_iter()
        .map(|root| attach_children(root, &mut by_parent))
        .collect()
}

fn attach_children(mut node: CategoryNode, by_parent: &mut HashMap<i64, Vec<CategoryNode>>) -> CategoryNode {
    if let Some(children) = by_parent.remove(&node.id) {
        node.children = children
            .into_iter()
            .map(|child| attach_children(child, by_parent))
            .collect();
    }
    node
}
