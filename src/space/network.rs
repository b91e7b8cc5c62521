use crate::common::{AgentId, SpaceError, SpaceResult};
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

/// Agents placed on the nodes of an undirected graph.
///
/// Nodes carry a label; edges carry no weight. Any number of agents can
/// share a node.
#[derive(Debug, Clone)]
pub struct NetworkSpace {
    graph: UnGraph<String, ()>,
    placements: HashMap<AgentId, NodeIndex>,
    occupants: HashMap<NodeIndex, Vec<AgentId>>,
}

impl NetworkSpace {
    pub fn new() -> Self {
        Self {
            graph: UnGraph::new_undirected(),
            placements: HashMap::new(),
            occupants: HashMap::new(),
        }
    }

    pub fn add_node(&mut self, label: impl Into<String>) -> NodeIndex {
        self.graph.add_node(label.into())
    }

    /// Connect two nodes. Adding the same link twice is a no-op.
    pub fn add_link(&mut self, a: NodeIndex, b: NodeIndex) -> SpaceResult<()> {
        self.check_node(a)?;
        self.check_node(b)?;
        self.graph.update_edge(a, b, ());
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn label(&self, node: NodeIndex) -> SpaceResult<&str> {
        self.graph
            .node_weight(node)
            .map(String::as_str)
            .ok_or(SpaceError::UnknownNode {
                index: node.index(),
            })
    }

    fn check_node(&self, node: NodeIndex) -> SpaceResult<()> {
        if self.graph.node_weight(node).is_none() {
            return Err(SpaceError::UnknownNode {
                index: node.index(),
            });
        }
        Ok(())
    }

    pub fn place_agent(&mut self, id: AgentId, node: NodeIndex) -> SpaceResult<()> {
        self.check_node(node)?;
        if self.placements.contains_key(&id) {
            return Err(SpaceError::AgentAlreadyPlaced { id });
        }
        self.placements.insert(id, node);
        self.occupants.entry(node).or_default().push(id);
        Ok(())
    }

    pub fn move_agent(&mut self, id: AgentId, to: NodeIndex) -> SpaceResult<()> {
        self.check_node(to)?;
        let from = *self
            .placements
            .get(&id)
            .ok_or(SpaceError::AgentNotPlaced { id })?;
        if from == to {
            return Ok(());
        }
        if let Some(occupants) = self.occupants.get_mut(&from) {
            occupants.retain(|occupant| *occupant != id);
        }
        self.occupants.entry(to).or_default().push(id);
        self.placements.insert(id, to);
        Ok(())
    }

    /// Remove a placed agent. Returns the node it vacated.
    pub fn remove_agent(&mut self, id: AgentId) -> SpaceResult<NodeIndex> {
        let node = self
            .placements
            .remove(&id)
            .ok_or(SpaceError::AgentNotPlaced { id })?;
        if let Some(occupants) = self.occupants.get_mut(&node) {
            occupants.retain(|occupant| *occupant != id);
        }
        Ok(node)
    }

    pub fn node_of(&self, id: AgentId) -> Option<NodeIndex> {
        self.placements.get(&id).copied()
    }

    /// Occupants of a node, in placement order.
    pub fn agents_at(&self, node: NodeIndex) -> SpaceResult<&[AgentId]> {
        self.check_node(node)?;
        Ok(self
            .occupants
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[]))
    }

    pub fn neighbor_nodes(&self, node: NodeIndex) -> SpaceResult<Vec<NodeIndex>> {
        self.check_node(node)?;
        Ok(self.graph.neighbors(node).collect())
    }

    /// Agents on nodes adjacent to `node` (not the node itself).
    pub fn neighbors(&self, node: NodeIndex) -> SpaceResult<Vec<AgentId>> {
        let mut agents = Vec::new();
        for adjacent in self.neighbor_nodes(node)? {
            if let Some(occupants) = self.occupants.get(&adjacent) {
                agents.extend(occupants.iter().copied());
            }
        }
        Ok(agents)
    }

    pub fn agent_count(&self) -> usize {
        self.placements.len()
    }
}
