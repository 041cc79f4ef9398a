//! Canonical graph model and the ingestion that builds it.

pub mod demo;
pub mod ingest;
pub mod layout;
pub mod model;
pub mod publish;

pub use ingest::{GraphIngestor, Item, check_service_error, classify};
pub use layout::{FixedLayout, LayoutSource, RandomCube};
pub use model::{GraphLink, GraphModel, GraphNode, Group};
pub use publish::{ModelPublisher, Publish, Ticket};
