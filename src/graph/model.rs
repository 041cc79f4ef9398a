use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::ModelError;
use crate::geometry::Vec3;

/// Base scale of a fully described node.
pub const DEFAULT_VAL: f64 = 1.0;
/// Base scale of a node synthesized from a link endpoint.
pub const PLACEHOLDER_VAL: f64 = DEFAULT_VAL / 2.0;
/// Category of a node whose item carried no labels.
pub const DEFAULT_GROUP: &str = "Node";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Group {
	Label(String),
	Index(u32),
	/// Placeholder synthesized from a relationship endpoint.
	Unknown,
}

impl Group {
	pub fn is_unknown(&self) -> bool {
		matches!(self, Group::Unknown)
	}
}

impl fmt::Display for Group {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Group::Label(label) => f.write_str(label),
			Group::Index(i) => write!(f, "{i}"),
			Group::Unknown => f.write_str("Unknown"),
		}
	}
}

impl Serialize for Group {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Group::Index(i) => serializer.serialize_u32(*i),
			other => serializer.collect_str(other),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphNode {
	pub id: String,
	pub position: Vec3,
	pub val: f64,
	pub group: Group,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
}

impl GraphNode {
	pub fn new(id: impl Into<String>, position: Vec3, group: Group) -> Self {
		Self {
			id: id.into(),
			position,
			val: DEFAULT_VAL,
			group,
			color: None,
			label: None,
		}
	}

	pub fn placeholder(id: impl Into<String>, position: Vec3) -> Self {
		Self {
			val: PLACEHOLDER_VAL,
			..Self::new(id, position, Group::Unknown)
		}
	}

	pub fn is_placeholder(&self) -> bool {
		self.group.is_unknown()
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
}

/// Nodes keyed by id plus an ordered link list.
///
/// Built in full by one ingestion and then shared read-only; a fresh model
/// replaces it wholesale.
#[derive(Clone, Debug, Default, Serialize)]
pub struct GraphModel {
	nodes: Vec<GraphNode>,
	links: Vec<GraphLink>,
	#[serde(skip)]
	index: HashMap<String, usize>,
}

impl GraphModel {
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a node unless its id is already present. First write wins.
	pub fn insert_node(&mut self, node: GraphNode) -> bool {
		if self.index.contains_key(&node.id) {
			return false;
		}
		self.index.insert(node.id.clone(), self.nodes.len());
		self.nodes.push(node);
		true
	}

	/// Appends a link. Both endpoints must already be nodes of this model.
	pub fn push_link(&mut self, link: GraphLink) -> Result<(), ModelError> {
		if !self.contains(&link.source) || !self.contains(&link.target) {
			return Err(ModelError::DanglingLink {
				from: link.source,
				to: link.target,
			});
		}
		self.links.push(link);
		Ok(())
	}

	pub fn contains(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Nodes in insertion order.
	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	/// Links in encounter order.
	pub fn links(&self) -> &[GraphLink] {
		&self.links
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn link_count(&self) -> usize {
		self.links.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.links.is_empty()
	}

	/// Links resolved to node indices, for renderers that work positionally.
	pub fn link_indices(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
		self.links
			.iter()
			.filter_map(|l| Some((self.index_of(&l.source)?, self.index_of(&l.target)?)))
	}
}
