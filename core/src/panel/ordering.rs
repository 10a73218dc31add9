use crate::prelude::DisplaySettings;

/// A rendered performance node that can be ranked for display.
pub trait PrioritizedNode {
    fn node_id(&self) -> u32;

    /// This node or any descendant still waits on a human observer.
    fn requires_observed_assessment(&self) -> bool;
}

/// Orders sibling performance nodes for display.
pub trait NodePrioritizer<T: PrioritizedNode> {
    /// Sorts `nodes` in place and returns the id of the last node in the leading
    /// run of nodes needing an observed assessment, if that run exists.
    fn sort_by_priority(&self, nodes: &mut [T], settings: &DisplaySettings) -> Option<u32>;
}

/// Stable sort that moves nodes awaiting an observed assessment to the top
/// while `prioritize_oc_assessment` is on; otherwise keeps the given order.
#[derive(Debug, Default, Clone, Copy)]
pub struct ObservedAssessmentFirst;

impl<T: PrioritizedNode> NodePrioritizer<T> for ObservedAssessmentFirst {
    fn sort_by_priority(&self, nodes: &mut [T], settings: &DisplaySettings) -> Option<u32> {
        if !settings.prioritize_oc_assessment {
            return None;
        }
        nodes.sort_by_key(|node| !node.requires_observed_assessment());

        let mut last = None;
        for node in nodes.iter() {
            if node.requires_observed_assessment() {
                last = Some(node.node_id());
            } else if last.is_some() {
                break;
            }
        }
        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Node(u32, bool);

    impl PrioritizedNode for Node {
        fn node_id(&self) -> u32 {
            self.0
        }

        fn requires_observed_assessment(&self) -> bool {
            self.1
        }
    }

    fn ids(nodes: &[Node]) -> Vec<u32> {
        nodes.iter().map(|node| node.0).collect()
    }

    #[test]
    fn observed_nodes_move_first_keeping_relative_order() {
        let settings = DisplaySettings {
            prioritize_oc_assessment: true,
            ..DisplaySettings::default()
        };
        let mut nodes = vec![Node(1, false), Node(2, true), Node(3, false), Node(4, true)];
        let last = ObservedAssessmentFirst.sort_by_priority(&mut nodes, &settings);
        assert_eq!(ids(&nodes), vec![2, 4, 1, 3]);
        assert_eq!(last, Some(4));
    }

    #[test]
    fn order_is_untouched_when_prioritizing_is_off() {
        let mut nodes = vec![Node(1, false), Node(2, true)];
        let last = ObservedAssessmentFirst.sort_by_priority(&mut nodes, &DisplaySettings::default());
        assert_eq!(ids(&nodes), vec![1, 2]);
        assert_eq!(last, None);
    }
}
