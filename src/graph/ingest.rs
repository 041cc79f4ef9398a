//! Normalizes row-oriented query results into a [`GraphModel`].
//!
//! A result is `{ "results": Row[] }` where a row is a list of columns and a
//! column is an item, a list of items (a path) or null. Each item is
//! classified once by [`classify`]; everything that is neither node-like nor
//! relationship-like is skipped.

use log::debug;
use serde_json::{Map, Value};

use super::layout::LayoutSource;
use super::model::{DEFAULT_GROUP, GraphLink, GraphModel, GraphNode, Group};
use crate::error::IngestError;
use crate::geometry::Vec3;

#[derive(Clone, Debug, PartialEq)]
pub enum Item<'a> {
	Node(NodeItem<'a>),
	Relationship(RelationshipItem<'a>),
	Unrecognized,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeItem<'a> {
	pub id: String,
	pub first_label: Option<&'a str>,
	pub properties: Option<&'a Map<String, Value>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RelationshipItem<'a> {
	pub start: String,
	pub end: String,
	pub kind: Option<&'a str>,
}

/// Strings pass through, numbers become their decimal text.
fn identifier(value: &Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		_ => None,
	}
}

/// Decides what kind of graph element a single result item is.
///
/// Node-like wins when an item looks like both.
pub fn classify(value: &Value) -> Item<'_> {
	let Value::Object(obj) = value else {
		return Item::Unrecognized;
	};

	if let (Some(id), Some(Value::Array(labels))) =
		(obj.get("id").and_then(identifier), obj.get("labels"))
	{
		return Item::Node(NodeItem {
			id,
			first_label: labels.first().and_then(Value::as_str),
			properties: obj.get("properties").and_then(Value::as_object),
		});
	}

	if let (Some(start), Some(end)) = (
		obj.get("start").and_then(identifier),
		obj.get("end").and_then(identifier),
	) {
		return Item::Relationship(RelationshipItem {
			start,
			end,
			kind: obj.get("type").and_then(Value::as_str),
		});
	}

	Item::Unrecognized
}

/// Reports a failure the service embedded in an otherwise successful response.
pub fn check_service_error(raw: &Value) -> Result<(), IngestError> {
	let message = match (raw.get("error"), raw.get("errors")) {
		(Some(Value::String(msg)), _) => Some(msg.clone()),
		(Some(Value::Object(obj)), _) => Some(
			obj.get("message")
				.and_then(Value::as_str)
				.unwrap_or("unknown error")
				.to_string(),
		),
		(_, Some(Value::Array(errors))) if !errors.is_empty() => Some(
			errors[0]
				.get("message")
				.and_then(Value::as_str)
				.unwrap_or("unknown error")
				.to_string(),
		),
		_ => None,
	};
	match message {
		Some(msg) => Err(IngestError::Service(msg)),
		None => Ok(()),
	}
}

pub struct GraphIngestor<L> {
	layout: L,
}

impl<L: LayoutSource> GraphIngestor<L> {
	pub fn new(layout: L) -> Self {
		Self { layout }
	}

	/// Decodes JSON text, rejects embedded service errors, then ingests.
	pub fn ingest_str(&mut self, text: &str) -> Result<GraphModel, IngestError> {
		let raw: Value = serde_json::from_str(text)?;
		check_service_error(&raw)?;
		Ok(self.ingest(&raw))
	}

	/// Builds a complete model in one linear pass. Never fails; a missing or
	/// malformed row container gives an empty model.
	pub fn ingest(&mut self, raw: &Value) -> GraphModel {
		let mut pass = Pass {
			model: GraphModel::new(),
			layout: &mut self.layout,
			placeholders: 0,
			skipped: 0,
		};

		let rows = raw
			.get("results")
			.and_then(Value::as_array)
			.map(Vec::as_slice)
			.unwrap_or_default();

		for row in rows {
			let Some(columns) = row.as_array() else {
				pass.skipped += 1;
				continue;
			};
			for column in columns {
				match column {
					Value::Null => {}
					Value::Array(items) => items.iter().for_each(|item| pass.visit(item)),
					item => pass.visit(item),
				}
			}
		}

		debug!(
			"ingested {} nodes ({} placeholders), {} links, skipped {} items",
			pass.model.node_count(),
			pass.placeholders,
			pass.model.link_count(),
			pass.skipped
		);
		pass.model
	}
}

struct Pass<'l, L> {
	model: GraphModel,
	layout: &'l mut L,
	placeholders: usize,
	skipped: usize,
}

impl<L: LayoutSource> Pass<'_, L> {
	fn visit(&mut self, item: &Value) {
		match classify(item) {
			Item::Node(node) => self.add_node(node),
			Item::Relationship(rel) => self.add_relationship(rel),
			Item::Unrecognized => self.skipped += 1,
		}
	}

	fn add_node(&mut self, item: NodeItem<'_>) {
		if self.model.contains(&item.id) {
			return;
		}
		let props = item.properties;
		let position = props
			.and_then(explicit_position)
			.unwrap_or_else(|| self.layout.place());
		let group = Group::Label(item.first_label.unwrap_or(DEFAULT_GROUP).to_string());

		let mut node = GraphNode::new(item.id, position, group);
		node.color = props.and_then(|p| string_prop(p, &["color"]));
		node.label = props.and_then(|p| string_prop(p, &["name", "title"]));
		self.model.insert_node(node);
	}

	fn add_relationship(&mut self, item: RelationshipItem<'_>) {
		for id in [&item.start, &item.end] {
			if !self.model.contains(id) {
				let position = self.layout.place();
				self.model.insert_node(GraphNode::placeholder(id.as_str(), position));
				self.placeholders += 1;
			}
		}
		let link = GraphLink {
			source: item.start,
			target: item.end,
			kind: item.kind.map(String::from),
		};
		if let Err(err) = self.model.push_link(link) {
			debug!("dropping link: {err}");
		}
	}
}

fn explicit_position(props: &Map<String, Value>) -> Option<Vec3> {
	let coord = |key: &str| props.get(key).and_then(Value::as_f64).filter(|v| v.is_finite());
	Some(Vec3::new(coord("x")?, coord("y")?, coord("z")?))
}

fn string_prop(props: &Map<String, Value>, keys: &[&str]) -> Option<String> {
	keys.iter()
		.find_map(|k| props.get(*k).and_then(Value::as_str))
		.map(String::from)
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;
	use serde_json::json;

	use super::*;
	use crate::graph::layout::{FixedLayout, RandomCube};
	use crate::graph::model::PLACEHOLDER_VAL;

	fn ingest(raw: Value) -> GraphModel {
		GraphIngestor::new(FixedLayout(Vec3::new(1.0, 1.0, 1.0))).ingest(&raw)
	}

	fn ids(model: &GraphModel) -> Vec<&str> {
		model.nodes().iter().map(|n| n.id.as_str()).collect()
	}

	fn assert_no_dangling(model: &GraphModel) {
		for link in model.links() {
			assert!(model.contains(&link.source), "missing {}", link.source);
			assert!(model.contains(&link.target), "missing {}", link.target);
		}
	}

	#[test]
	fn classify_recognizes_shapes() {
		let node = json!({"id": 5, "labels": []});
		assert!(matches!(classify(&node), Item::Node(NodeItem { ref id, first_label: None, .. }) if id == "5"));

		let rel = json!({"start": "a", "end": 2, "type": "KNOWS"});
		assert_eq!(
			classify(&rel),
			Item::Relationship(RelationshipItem {
				start: "a".into(),
				end: "2".into(),
				kind: Some("KNOWS"),
			})
		);

		for other in [json!(3), json!(null), json!("x"), json!({"id": "1"}), json!({"start": "1"}), json!([])] {
			assert_eq!(classify(&other), Item::Unrecognized, "{other}");
		}
	}

	#[test]
	fn empty_inputs_give_empty_model() {
		for raw in [json!({}), json!({"results": []}), json!({"results": null}), json!([1, 2])] {
			let model = ingest(raw);
			assert!(model.is_empty());
			assert_eq!(model.node_count(), 0);
			assert_eq!(model.link_count(), 0);
			assert_eq!(serde_json::to_value(&model).unwrap(), json!({"nodes": [], "links": []}));
		}
	}

	#[test]
	fn two_people_and_a_relationship() {
		let model = ingest(json!({"results": [[
			{"id": "1", "labels": ["Person"]},
			{"id": "2", "labels": ["Person"]},
			{"start": "1", "end": "2"}
		]]}));

		assert_eq!(ids(&model), ["1", "2"]);
		assert_eq!(model.link_count(), 1);
		assert_eq!(model.links()[0].source, "1");
		assert_eq!(model.links()[0].target, "2");
		assert!(model.nodes().iter().all(|n| n.group == Group::Label("Person".into())));
		assert!(model.nodes().iter().all(|n| n.val == 1.0));
	}

	#[test]
	fn unseen_endpoint_becomes_placeholder() {
		let model = ingest(json!({"results": [[
			{"id": "1", "labels": ["Person"]},
			{"start": "1", "end": "3"}
		]]}));

		let placeholder = model.node("3").unwrap();
		assert_eq!(placeholder.group, Group::Unknown);
		assert_eq!(placeholder.val, PLACEHOLDER_VAL);
		assert_eq!(placeholder.val, 0.5);
		assert_no_dangling(&model);
	}

	#[test]
	fn placeholder_is_not_upgraded_later_in_the_pass() {
		let model = ingest(json!({"results": [
			[{"start": "a", "end": "b"}],
			[{"id": "b", "labels": ["City"], "properties": {"name": "Oslo"}}]
		]}));

		let b = model.node("b").unwrap();
		assert!(b.is_placeholder());
		assert_eq!(b.label, None);
		assert_eq!(model.node_count(), 2);
	}

	#[test]
	fn repeated_relationships_are_kept_in_order() {
		let model = ingest(json!({"results": [
			[{"start": "1", "end": "2", "type": "A"}],
			[{"start": "1", "end": "2", "type": "B"}],
			[{"start": "2", "end": "1"}]
		]}));

		let kinds: Vec<_> = model.links().iter().map(|l| l.kind.as_deref()).collect();
		assert_eq!(kinds, [Some("A"), Some("B"), None]);
		assert_eq!(model.node_count(), 2);
	}

	#[test]
	fn path_columns_are_walked_in_order() {
		let model = ingest(json!({"results": [[
			[
				{"id": 10, "labels": ["Station"]},
				{"start": 10, "end": 11},
				{"id": 11, "labels": ["Station"]},
				[{"id": "nested", "labels": []}]
			],
			null,
			42
		]]}));

		assert_eq!(ids(&model), ["10", "11"]);
		assert!(model.node("11").unwrap().is_placeholder());
		assert_eq!(model.link_count(), 1);
	}

	#[test]
	fn node_without_labels_gets_default_group() {
		let model = ingest(json!({"results": [[{"id": "x", "labels": []}]]}));
		assert_eq!(model.node("x").unwrap().group, Group::Label(DEFAULT_GROUP.into()));
	}

	#[test]
	fn properties_fill_position_color_and_label() {
		let model = ingest(json!({"results": [[
			{"id": "p", "labels": ["Place"], "properties": {
				"x": 1.5, "y": -2, "z": 0, "color": "#ff0000", "title": "Home"
			}},
			{"id": "q", "labels": ["Place"], "properties": {"x": 1.0, "y": 2.0}}
		]]}));

		let p = model.node("p").unwrap();
		assert_eq!(p.position, Vec3::new(1.5, -2.0, 0.0));
		assert_eq!(p.color.as_deref(), Some("#ff0000"));
		assert_eq!(p.label.as_deref(), Some("Home"));

		// Partial coordinates fall back to the layout source.
		assert_eq!(model.node("q").unwrap().position, Vec3::new(1.0, 1.0, 1.0));
	}

	#[test]
	fn messy_payload_keeps_invariants() {
		let raw = json!({"results": [
			[{"id": "1", "labels": ["A"]}, {"start": "1", "end": "9"}, "noise"],
			"not a row",
			[[{"start": "9", "end": "7"}, {"id": "7", "labels": ["B"]}, {"id": "1", "labels": ["C"]}]],
			[null, {"start": 7, "end": 7}, {"foo": "bar"}],
			[{"id": "1", "labels": ["D"]}, {"start": "1", "end": "1"}]
		]});
		let mut ingestor = GraphIngestor::new(RandomCube::new(StdRng::seed_from_u64(3), 20.0));
		let model = ingestor.ingest(&raw);

		let mut seen = std::collections::HashSet::new();
		assert!(model.nodes().iter().all(|n| seen.insert(n.id.clone())));
		assert_no_dangling(&model);
		assert_eq!(ids(&model), ["1", "9", "7"]);
		assert_eq!(model.link_count(), 4);
		assert_eq!(model.node("1").unwrap().group, Group::Label("A".into()));
		assert!(
			model
				.nodes()
				.iter()
				.all(|n| [n.position.x, n.position.y, n.position.z].iter().all(|c| c.abs() <= 20.0))
		);
	}

	#[test]
	fn ingest_str_reports_decode_and_service_errors() {
		let mut ingestor = GraphIngestor::new(FixedLayout::default());
		assert!(matches!(ingestor.ingest_str("{not json"), Err(IngestError::Decode(_))));
		assert_eq!(
			ingestor.ingest_str(r#"{"error": "syntax error near MATCH"}"#).unwrap_err(),
			IngestError::Service("syntax error near MATCH".into())
		);
		assert_eq!(
			ingestor
				.ingest_str(r#"{"results": [], "errors": [{"message": "timeout"}]}"#)
				.unwrap_err(),
			IngestError::Service("timeout".into())
		);

		let model = ingestor.ingest_str(r#"{"results": [], "errors": []}"#).unwrap();
		assert!(model.is_empty());
	}
}
