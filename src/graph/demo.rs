use log::warn;
use rand::Rng;

use super::layout::{LayoutSource, RandomCube};
use super::model::{GraphLink, GraphModel, GraphNode, Group};

/// Random tree for running without a query service: every node after the
/// first links to one earlier node.
pub fn generate<R: Rng>(n: usize, half_width: f64, rng: &mut R) -> GraphModel {
	let mut model = GraphModel::new();
	let mut layout = RandomCube::new(&mut *rng, half_width);
	let positions: Vec<_> = (0..n).map(|_| layout.place()).collect();

	for (i, position) in positions.into_iter().enumerate() {
		let mut node = GraphNode::new(i.to_string(), position, Group::Index((i % 10) as u32));
		node.val = rng.gen_range(0.5..2.5);
		if i < 10 {
			node.label = Some(format!("Node {i}"));
		}
		model.insert_node(node);
	}

	for i in 1..n {
		let target = rng.gen_range(0..i);
		let link = GraphLink {
			source: i.to_string(),
			target: target.to_string(),
			kind: None,
		};
		if let Err(err) = model.push_link(link) {
			warn!("demo link dropped: {err}");
		}
	}
	model
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	#[test]
	fn demo_graph_is_a_valid_tree() {
		let model = generate(50, 20.0, &mut StdRng::seed_from_u64(11));
		assert_eq!(model.node_count(), 50);
		assert_eq!(model.link_count(), 49);
		for link in model.links() {
			assert_ne!(link.source, link.target);
			assert!(model.contains(&link.source) && model.contains(&link.target));
		}
		assert!(model.nodes().iter().all(|n| (0.5..2.5).contains(&n.val)));
	}

	#[test]
	fn tiny_demo_graphs() {
		let mut rng = StdRng::seed_from_u64(0);
		assert!(generate(0, 20.0, &mut rng).is_empty());
		let one = generate(1, 20.0, &mut rng);
		assert_eq!((one.node_count(), one.link_count()), (1, 0));
	}
}
