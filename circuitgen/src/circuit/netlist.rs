//! Netlist View
//!
//! Graph representation of a produced document using petgraph. Nodes are
//! pin references, edges are wires. Pins joined by wires form a net; a
//! series passive separates two nets because its two terminals are
//! distinct nodes.

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

use super::schema::{CircuitDocument, PinRef};

/// A set of electrically joined pins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Net {
    /// Microcontroller pin name when the net touches the microcontroller,
    /// otherwise `N1`, `N2`, ...
    pub name: String,

    /// Member pins in order of first appearance
    pub pins: Vec<PinRef>,
}

impl Net {
    pub fn contains(&self, pin: &PinRef) -> bool {
        self.pins.contains(pin)
    }
}

#[derive(Debug, Clone)]
pub struct Netlist {
    graph: UnGraph<PinRef, Option<String>>,
    index: HashMap<PinRef, NodeIndex>,
    nets: Vec<Net>,
    membership: HashMap<PinRef, usize>,
}

impl Netlist {
    pub fn from_document(doc: &CircuitDocument) -> Self {
        let mut graph: UnGraph<PinRef, Option<String>> = UnGraph::new_undirected();
        let mut index: HashMap<PinRef, NodeIndex> = HashMap::new();

        for conn in &doc.connections {
            let a = node_for(&mut graph, &mut index, &conn.from);
            let b = node_for(&mut graph, &mut index, &conn.to);
            graph.add_edge(a, b, conn.color.clone());
        }

        let mut sets = UnionFind::<usize>::new(graph.node_count());
        for edge in graph.edge_references() {
            sets.union(edge.source().index(), edge.target().index());
        }
        let labels = sets.into_labeling();

        let mut groups: Vec<Vec<PinRef>> = Vec::new();
        let mut group_of_label: HashMap<usize, usize> = HashMap::new();
        for node in graph.node_indices() {
            let label = labels[node.index()];
            let group = *group_of_label.entry(label).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[group].push(graph[node].clone());
        }

        let mut nets = Vec::with_capacity(groups.len());
        let mut membership = HashMap::new();
        let mut unnamed = 0;
        for (i, pins) in groups.into_iter().enumerate() {
            let name = match pins.iter().find(|p| p.is_mcu()) {
                Some(mcu_pin) => mcu_pin.pin.clone(),
                None => {
                    unnamed += 1;
                    format!("N{}", unnamed)
                }
            };
            for pin in &pins {
                membership.insert(pin.clone(), i);
            }
            nets.push(Net { name, pins });
        }

        Self {
            graph,
            index,
            nets,
            membership,
        }
    }

    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    pub fn net_of(&self, pin: &PinRef) -> Option<&Net> {
        self.membership.get(pin).map(|&i| &self.nets[i])
    }

    pub fn are_connected(&self, a: &PinRef, b: &PinRef) -> bool {
        match (self.membership.get(a), self.membership.get(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// Number of wires ending on a pin
    pub fn degree(&self, pin: &PinRef) -> usize {
        self.index
            .get(pin)
            .map(|&idx| self.graph.edges(idx).count())
            .unwrap_or(0)
    }

    pub fn pin_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn wire_count(&self) -> usize {
        self.graph.edge_count()
    }
}

fn node_for(
    graph: &mut UnGraph<PinRef, Option<String>>,
    index: &mut HashMap<PinRef, NodeIndex>,
    pin: &PinRef,
) -> NodeIndex {
    if let Some(&idx) = index.get(pin) {
        return idx;
    }
    let idx = graph.add_node(pin.clone());
    index.insert(pin.clone(), idx);
    idx
}
