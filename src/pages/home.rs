use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, warn};
use web_sys::{Event, MouseEvent};

use crate::browser_rng;
use crate::components::graph_canvas::GraphCanvas;
use crate::config::AppConfig;
use crate::gesture::{GestureFeed, SessionPhase};
use crate::graph::{GraphIngestor, ModelPublisher, Publish, RandomCube, demo};
use crate::motion::{ControlSmoother, GestureSample};
use crate::query::QueryClient;

const DEFAULT_QUERY: &str = "MATCH (n)-[r]->(m) RETURN n, r, m LIMIT 200";

#[derive(Clone, Debug, PartialEq)]
enum Notice {
	Info(String),
	Warn(String),
	Error(String),
}

impl Notice {
	fn class(&self) -> &'static str {
		match self {
			Notice::Info(_) => "notice",
			Notice::Warn(_) => "notice warn",
			Notice::Error(_) => "notice error",
		}
	}

	fn text(&self) -> String {
		match self {
			Notice::Info(s) | Notice::Warn(s) | Notice::Error(s) => s.clone(),
		}
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = AppConfig::from_env();
	let half_width = config.engine.layout_half_width;
	let demo_nodes = config.demo_nodes;
	let transform = config.engine.transform.clone();

	let publisher = RwSignal::new(ModelPublisher::new(demo::generate(
		demo_nodes,
		half_width,
		&mut browser_rng(),
	)));
	let model = Signal::derive(move || publisher.with(ModelPublisher::current));

	let smoother = RwSignal::new(ControlSmoother::new(config.engine.smoothing));
	let control = Signal::derive(move || smoother.with(ControlSmoother::state));
	let feed_sample = move |sample: GestureSample| {
		smoother.try_update(|s| {
			s.update(sample);
		});
	};

	let manual = RwSignal::new(GestureSample::default());
	let notice = RwSignal::new(None::<Notice>);
	let query = RwSignal::new(DEFAULT_QUERY.to_string());
	let client = QueryClient::new(config.query_endpoint.clone());

	let run_query = move |_: MouseEvent| {
		let Some(ticket) = publisher.try_update(ModelPublisher::begin) else {
			return;
		};
		let (client, text) = (client.clone(), query.get_untracked());
		notice.set(Some(Notice::Info("Running query…".into())));

		spawn_local(async move {
			let result = client.run(&text).await.and_then(|body| {
				GraphIngestor::new(RandomCube::new(browser_rng(), half_width)).ingest_str(&body)
			});
			match result {
				Ok(model) => {
					let (nodes, links) = (model.node_count(), model.link_count());
					if publisher.try_update(|p| p.publish(ticket, model)) != Some(Publish::Applied) {
						return;
					}
					let next = if nodes == 0 {
						warn!("query returned no nodes");
						Notice::Warn("Query returned no graph elements".into())
					} else {
						Notice::Info(format!("Loaded {nodes} nodes and {links} links"))
					};
					let _ = notice.try_set(Some(next));
				}
				Err(err) => {
					error!("{err}");
					let superseded = publisher
						.try_with_untracked(|p| p.is_superseded(ticket))
						.unwrap_or(true);
					if !superseded {
						let _ = notice.try_set(Some(Notice::Error(err.to_string())));
					}
				}
			}
		});
	};

	let reset_demo = move |_: MouseEvent| {
		let model = demo::generate(demo_nodes, half_width, &mut browser_rng());
		publisher.update(|p| p.replace(model));
		smoother.update(ControlSmoother::reset);
		notice.set(None);
	};

	let on_expansion = move |ev: Event| {
		let value = event_target_value(&ev).parse().unwrap_or(0.0);
		manual.update(|m| m.expansion = value);
		feed_sample(manual.get_untracked());
	};
	let on_tension = move |ev: Event| {
		let value = event_target_value(&ev).parse().unwrap_or(0.0);
		manual.update(|m| m.tension = value);
		feed_sample(manual.get_untracked());
	};

	let (phase, set_phase) = signal(SessionPhase::Idle);
	let feed: Rc<RefCell<Option<GestureFeed>>> = Rc::new(RefCell::new(None));
	let gesture_controls = config.gesture_endpoint.clone().map(|url| {
		let toggle = move |_: MouseEvent| {
			if let Some(live) = feed.borrow_mut().take() {
				if live.phase() != SessionPhase::Closed {
					live.disconnect();
					return;
				}
			}
			let on_phase = move |p: SessionPhase| {
				let _ = set_phase.try_set(p);
			};
			match GestureFeed::connect(&url, feed_sample, on_phase) {
				Ok(live) => *feed.borrow_mut() = Some(live),
				Err(err) => {
					error!("{err}");
					set_phase.set(SessionPhase::Closed);
					notice.set(Some(Notice::Error(err.to_string())));
				}
			}
		};
		view! {
			<button on:click=toggle>
				{move || match phase.get() {
					SessionPhase::Idle | SessionPhase::Closed => "Connect gestures",
					SessionPhase::Connecting => "Connecting…",
					SessionPhase::Streaming => "Disconnect gestures",
				}}
			</button>
		}
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<GraphCanvas model=model control=control transform=transform fullscreen=true />
				<div class="graph-overlay">
					<h1>"Gesture Graph"</h1>
					<p class="subtitle">"Open your hand to expand the graph, tense it to make it shake."</p>

					<textarea
						rows="3"
						prop:value=move || query.get()
						on:input=move |ev| query.set(event_target_value(&ev))
					/>
					<div class="actions">
						<button on:click=run_query>"Run query"</button>
						<button on:click=reset_demo>"Demo graph"</button>
						{gesture_controls}
					</div>

					<label>
						"Expansion "
						<input type="range" min="0" max="1" step="0.01" value="0" on:input=on_expansion />
						{move || format!("{:.2}", control.get().expansion)}
					</label>
					<label>
						"Tension "
						<input type="range" min="0" max="1" step="0.01" value="0" on:input=on_tension />
						{move || format!("{:.2}", control.get().tension)}
					</label>

					{move || notice.get().map(|n| view! { <p class=n.class()>{n.text()}</p> })}
				</div>
			</div>
		</ErrorBoundary>
	}
}
