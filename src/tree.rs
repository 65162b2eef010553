use std::collections::HashMap;

use crate::{
    models::nodes::{NodeKind, NodeRow, NodeView},
    validation::format_iso_timestamp,
};

/// Builds the nested subtree view from the flat descendant set.
///
/// Works on an index arena: rows are addressed by position, child lists are
/// grouped by `parent_id`, and a depth-first order derived with an explicit
/// work stack drives the bottom-up pass. Folder sizes are always recomputed
/// as the sum of child sizes; whatever is stored for a folder is ignored.
/// Returns `None` when `root_id` is not in the set.
pub fn assemble_tree(root_id: &str, rows: Vec<NodeRow>) -> Option<NodeView> {
    let index_by_id: HashMap<&str, usize> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| (row.id.as_str(), idx))
        .collect();
    let root = *index_by_id.get(root_id)?;

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); rows.len()];
    for (idx, row) in rows.iter().enumerate() {
        // The root's own parent lies outside the resolved set.
        if idx == root {
            continue;
        }
        if let Some(parent) = row.parent_id.as_deref().and_then(|id| index_by_id.get(id)) {
            children[*parent].push(idx);
        }
    }

    // The reverse of this order visits every node after all its descendants.
    let mut order = Vec::with_capacity(rows.len());
    let mut stack = vec![root];
    while let Some(idx) = stack.pop() {
        order.push(idx);
        stack.extend(children[idx].iter().copied());
    }

    let mut sizes = vec![0i64; rows.len()];
    let mut built: Vec<Option<NodeView>> = rows.iter().map(|_| None).collect();
    for &idx in order.iter().rev() {
        let row = &rows[idx];
        let (size, kids) = match row.kind {
            NodeKind::File => (row.size.unwrap_or(0), None),
            NodeKind::Folder => {
                let total = children[idx].iter().map(|&child| sizes[child]).sum();
                let mut views = Vec::with_capacity(children[idx].len());
                for &child in &children[idx] {
                    if let Some(view) = built[child].take() {
                        views.push(view);
                    }
                }
                (total, Some(views))
            }
        };
        sizes[idx] = size;
        built[idx] = Some(NodeView {
            id: row.id.clone(),
            url: row.url.clone(),
            parent_id: row.parent_id.clone(),
            size,
            kind: row.kind,
            date: format_iso_timestamp(row.date_updated),
            children: kids,
        });
    }

    built[root].take()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;

    fn row(id: &str, kind: NodeKind, parent: Option<&str>, size: Option<i64>) -> NodeRow {
        NodeRow {
            id: id.to_string(),
            url: None,
            parent_id: parent.map(str::to_string),
            kind,
            size,
            date_updated: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn empty_folder_has_zero_size_and_empty_children() {
        let tree = assemble_tree("f1", vec![row("f1", NodeKind::Folder, None, None)]).unwrap();
        assert_eq!(tree.size, 0);
        assert!(tree.children.expect("folder reports children").is_empty());
    }

    #[test]
    fn missing_root_yields_none() {
        assert!(assemble_tree("ghost", vec![row("f1", NodeKind::Folder, None, None)]).is_none());
        assert!(assemble_tree("ghost", Vec::new()).is_none());
    }

    #[test]
    fn file_root_keeps_stored_size_and_has_no_children() {
        let tree =
            assemble_tree("a", vec![row("a", NodeKind::File, Some("f1"), Some(42))]).unwrap();
        assert_eq!(tree.size, 42);
        assert!(tree.children.is_none());
        assert_eq!(tree.parent_id.as_deref(), Some("f1"));
    }

    #[test]
    fn folder_size_aggregates_transitive_files() {
        let rows = vec![
            row("f1", NodeKind::Folder, None, None),
            row("f2", NodeKind::Folder, Some("f1"), None),
            row("a", NodeKind::File, Some("f2"), Some(30)),
            row("b", NodeKind::File, Some("f1"), Some(12)),
        ];
        let tree = assemble_tree("f1", rows).unwrap();
        assert_eq!(tree.size, 42);

        let children = tree.children.unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].id, "f2");
        assert_eq!(children[0].size, 30);
        assert_eq!(children[1].id, "b");
        assert_eq!(children[1].size, 12);
    }

    #[test]
    fn stored_folder_size_is_ignored() {
        let rows = vec![
            row("f1", NodeKind::Folder, None, Some(999)),
            row("a", NodeKind::File, Some("f1"), Some(7)),
        ];
        let tree = assemble_tree("f1", rows).unwrap();
        assert_eq!(tree.size, 7);
    }

    #[test]
    fn sibling_order_follows_the_flat_row_order() {
        let rows = vec![
            row("f1", NodeKind::Folder, None, None),
            row("z", NodeKind::File, Some("f1"), Some(1)),
            row("a", NodeKind::File, Some("f1"), Some(2)),
            row("m", NodeKind::File, Some("f1"), Some(3)),
        ];
        let tree = assemble_tree("f1", rows).unwrap();
        let ids: Vec<&str> = tree
            .children
            .as_deref()
            .unwrap()
            .iter()
            .map(|child| child.id.as_str())
            .collect();
        assert_eq!(ids, ["z", "a", "m"]);
    }

    #[test]
    fn serialized_shape_uses_wire_names_and_null_children_for_files() {
        let rows = vec![
            row("f1", NodeKind::Folder, None, None),
            row("a", NodeKind::File, Some("f1"), Some(100)),
        ];
        let tree = assemble_tree("f1", rows).unwrap();
        let value = serde_json::to_value(&tree).unwrap();

        assert_eq!(
            value,
            json!({
                "id": "f1",
                "url": null,
                "parentId": null,
                "size": 100,
                "type": "FOLDER",
                "date": "2023-01-01T00:00:00.000000Z",
                "children": [{
                    "id": "a",
                    "url": null,
                    "parentId": "f1",
                    "size": 100,
                    "type": "FILE",
                    "date": "2023-01-01T00:00:00.000000Z",
                    "children": null
                }]
            })
        );
    }
}
