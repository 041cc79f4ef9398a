//! Property graph visualizer deformed in real time by gesture input.
//!
//! The `graph` and `motion` modules are plain Rust and run anywhere; the
//! rest wires them into a Leptos client-side app rendering to a canvas.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub mod config;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod graph;
pub mod motion;
pub mod query;

// UI
mod components;
mod pages;

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Random source for layout and jitter, seeded from `Math.random`.
pub fn browser_rng() -> StdRng {
	StdRng::seed_from_u64((js_sys::Math::random() * u64::MAX as f64) as u64)
}

/// An app router which renders the homepage and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Gesture Graph" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
