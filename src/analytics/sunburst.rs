//! Three-level sunburst trees
//!
//! Group counts arrive per ID chunk, so the same label triple can appear
//! several times; counts are summed before the tree is built.

use std::collections::BTreeMap;

use crate::executor::GroupCount;

use super::request::SunburstNode;

type Levels = BTreeMap<String, BTreeMap<String, BTreeMap<String, u64>>>;

/// Build the tree from `[top, middle, bottom]` group counts.
///
/// Rows with an empty top label are dropped. A middle node lists its
/// non-empty bottom labels as children; when it has none, it carries the
/// summed count of its bottom buckets as its own value.
pub fn sunburst_tree(rows: Vec<GroupCount>) -> Vec<SunburstNode> {
    let mut levels: Levels = BTreeMap::new();

    for row in rows {
        let mut labels = row.labels.into_iter().map(Option::unwrap_or_default);
        let top = labels.next().unwrap_or_default();
        if top.is_empty() {
            continue;
        }
        let middle = labels.next().unwrap_or_default();
        let bottom = labels.next().unwrap_or_default();

        *levels
            .entry(top)
            .or_default()
            .entry(middle)
            .or_default()
            .entry(bottom)
            .or_default() += row.count;
    }

    levels
        .into_iter()
        .map(|(top, middles)| {
            let children = middles
                .into_iter()
                .map(|(middle, bottoms)| middle_node(middle, bottoms))
                .collect();
            SunburstNode::branch(top, children)
        })
        .collect()
}

fn middle_node(name: String, bottoms: BTreeMap<String, u64>) -> SunburstNode {
    let total: u64 = bottoms.values().sum();
    let children: Vec<SunburstNode> = bottoms
        .into_iter()
        .filter(|(bottom, _)| !bottom.is_empty())
        .map(|(bottom, count)| SunburstNode::leaf(bottom, count))
        .collect();

    if children.is_empty() {
        SunburstNode::leaf(name, total)
    } else {
        SunburstNode::branch(name, children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(labels: [Option<&str>; 3], count: u64) -> GroupCount {
        GroupCount {
            labels: labels.iter().map(|l| l.map(str::to_string)).collect(),
            count,
        }
    }

    #[test]
    fn test_empty_top_dropped() {
        let tree = sunburst_tree(vec![
            row([None, Some("b"), Some("c")], 5),
            row([Some(""), Some("b"), Some("c")], 5),
        ]);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_tree_shape_and_order() {
        let tree = sunburst_tree(vec![
            row([Some("Terpenoids"), Some("Diterpenoids"), Some("Cembranes")], 2),
            row([Some("Alkaloids"), Some("Indoles"), None], 4),
            row([Some("Alkaloids"), Some("Indoles"), Some("")], 1),
            row([Some("Alkaloids"), Some("Pyrroles"), Some("Prodiginines")], 3),
        ]);

        assert_eq!(
            tree,
            vec![
                SunburstNode::branch(
                    "Alkaloids",
                    vec![
                        SunburstNode::leaf("Indoles", 5),
                        SunburstNode::branch(
                            "Pyrroles",
                            vec![SunburstNode::leaf("Prodiginines", 3)]
                        ),
                    ]
                ),
                SunburstNode::branch(
                    "Terpenoids",
                    vec![SunburstNode::branch(
                        "Diterpenoids",
                        vec![SunburstNode::leaf("Cembranes", 2)]
                    )]
                ),
            ]
        );
    }

    #[test]
    fn test_chunks_merge_by_summation() {
        let tree = sunburst_tree(vec![
            row([Some("A"), Some("B"), Some("C")], 10),
            row([Some("A"), Some("B"), Some("C")], 7),
        ]);
        assert_eq!(
            tree,
            vec![SunburstNode::branch(
                "A",
                vec![SunburstNode::branch("B", vec![SunburstNode::leaf("C", 17)])]
            )]
        );
    }

    #[test]
    fn test_empty_bottom_ignored_when_siblings_exist() {
        let tree = sunburst_tree(vec![
            row([Some("A"), Some("B"), None], 10),
            row([Some("A"), Some("B"), Some("C")], 1),
        ]);
        assert_eq!(
            tree[0].children.as_ref().unwrap()[0],
            SunburstNode::branch("B", vec![SunburstNode::leaf("C", 1)])
        );
    }
}
