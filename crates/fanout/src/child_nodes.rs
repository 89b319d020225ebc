//! Child-node (batch) decomposition
//!
//! Each immediate child of the container node becomes one unit. With the
//! default `Reversed` order the last child is unit 0; the mapping is kept
//! as an explicit table so the routing list is assembled in plain unit
//! order afterwards.

use contracts::{ChildNodesConfig, ChildOrder, ContractError, Document, Node, SplitUnit};

/// Output root meaning "use the child's own element name"
const SAME_AS_CHILD: &str = ".";

/// `table[unit] = child position` for `n` children, last child first
pub fn reversal_table(n: usize) -> Vec<usize> {
    (0..n).rev().collect()
}

fn unit_table(n: usize, order: ChildOrder) -> Vec<usize> {
    match order {
        ChildOrder::Reversed => reversal_table(n),
        ChildOrder::Document => (0..n).collect(),
    }
}

pub(crate) fn decompose(
    cfg: &ChildNodesConfig,
    doc: &Document,
) -> Result<Vec<SplitUnit>, ContractError> {
    let children = doc.children(&cfg.container_path).ok_or_else(|| {
        ContractError::validation(&cfg.container_path, "container node is missing")
    })?;

    let units = unit_table(children.len(), cfg.child_order)
        .into_iter()
        .enumerate()
        .map(|(unit, child)| SplitUnit {
            node: Some(children[child].clone()),
            ..SplitUnit::new(unit)
        })
        .collect();
    Ok(units)
}

/// Unit message: a new document rooted at `output_root` with the child
/// grafted at `output_base_path`
pub(crate) fn reconstruct(cfg: &ChildNodesConfig, unit: &SplitUnit) -> Document {
    let empty = Node::new("");
    let child = unit.node.as_ref().unwrap_or(&empty);
    let root = if cfg.output_root == SAME_AS_CHILD {
        child.name.as_str()
    } else {
        cfg.output_root.as_str()
    };

    let mut message = Document::new(root);
    message.set_node(&cfg.output_base_path, child);
    message
}
