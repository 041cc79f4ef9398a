use std::sync::Arc;

use log::{debug, info};

use super::model::GraphModel;

/// Identifies one ingestion request, in issue order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Publish {
	Applied,
	/// A request issued later has already been published.
	Stale,
}

/// Holds the model the renderer reads and sequences overlapping ingestions.
///
/// A completed model replaces the active one in a single `Arc` swap, and only
/// if no newer request has been published in the meantime. Failed requests
/// simply never publish, leaving the previous model active.
#[derive(Clone, Debug, Default)]
pub struct ModelPublisher {
	current: Arc<GraphModel>,
	issued: u64,
	published: u64,
}

impl ModelPublisher {
	pub fn new(initial: GraphModel) -> Self {
		Self {
			current: Arc::new(initial),
			..Self::default()
		}
	}

	pub fn current(&self) -> Arc<GraphModel> {
		Arc::clone(&self.current)
	}

	pub fn begin(&mut self) -> Ticket {
		self.issued += 1;
		Ticket(self.issued)
	}

	/// Whether a newer request has been issued since `ticket`.
	pub fn is_superseded(&self, ticket: Ticket) -> bool {
		ticket.0 < self.issued
	}

	pub fn publish(&mut self, ticket: Ticket, model: GraphModel) -> Publish {
		if ticket.0 <= self.published {
			debug!(
				"discarding stale ingestion #{} (already showing #{})",
				ticket.0, self.published
			);
			return Publish::Stale;
		}
		info!(
			"publishing ingestion #{}: {} nodes, {} links",
			ticket.0,
			model.node_count(),
			model.link_count()
		);
		self.published = ticket.0;
		self.current = Arc::new(model);
		Publish::Applied
	}

	/// Installs a model outside the request sequence, superseding anything in flight.
	pub fn replace(&mut self, model: GraphModel) {
		let ticket = self.begin();
		self.publish(ticket, model);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::geometry::Vec3;
	use crate::graph::model::{GraphNode, Group};

	fn model_with(ids: &[&str]) -> GraphModel {
		let mut model = GraphModel::new();
		for id in ids {
			model.insert_node(GraphNode::new(*id, Vec3::ZERO, Group::Index(0)));
		}
		model
	}

	#[test]
	fn later_completion_of_older_request_is_discarded() {
		let mut publisher = ModelPublisher::default();
		let first = publisher.begin();
		let second = publisher.begin();
		assert!(publisher.is_superseded(first));

		assert_eq!(publisher.publish(second, model_with(&["b"])), Publish::Applied);
		assert_eq!(publisher.publish(first, model_with(&["a"])), Publish::Stale);
		assert!(publisher.current().contains("b"));
	}

	#[test]
	fn in_order_completions_both_apply() {
		let mut publisher = ModelPublisher::default();
		let first = publisher.begin();
		let second = publisher.begin();
		assert_eq!(publisher.publish(first, model_with(&["a"])), Publish::Applied);
		assert_eq!(publisher.publish(second, model_with(&["b"])), Publish::Applied);
		assert!(publisher.current().contains("b"));
	}

	#[test]
	fn readers_keep_their_snapshot() {
		let mut publisher = ModelPublisher::new(model_with(&["old"]));
		let snapshot = publisher.current();
		let ticket = publisher.begin();
		publisher.publish(ticket, model_with(&["new1", "new2"]));

		assert_eq!(snapshot.node_count(), 1);
		assert!(snapshot.contains("old"));
		assert_eq!(publisher.current().node_count(), 2);
	}

	#[test]
	fn replace_supersedes_in_flight_requests() {
		let mut publisher = ModelPublisher::default();
		let pending = publisher.begin();
		publisher.replace(model_with(&["demo"]));
		assert_eq!(publisher.publish(pending, model_with(&["late"])), Publish::Stale);
		assert!(publisher.current().contains("demo"));
	}
}
