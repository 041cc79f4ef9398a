use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use super::session::{GestureSession, SessionPhase, Teardown};
use crate::error::SessionError;
use crate::motion::GestureSample;

type PhaseCallback = Rc<dyn Fn(SessionPhase)>;

/// WebSocket connection to the gesture service.
///
/// Every text frame is decoded into a [`GestureSample`] and handed to the
/// sample callback. Dropping the feed closes the socket.
pub struct GestureFeed {
	session: Rc<RefCell<GestureSession>>,
	on_phase: PhaseCallback,
}

struct SocketHandle {
	socket: WebSocket,
	_on_open: Closure<dyn FnMut()>,
	_on_message: Closure<dyn FnMut(MessageEvent)>,
	_on_close: Closure<dyn FnMut(CloseEvent)>,
}

impl Teardown for SocketHandle {
	fn teardown(&mut self) {
		self.socket.set_onopen(None);
		self.socket.set_onmessage(None);
		self.socket.set_onclose(None);
		if let Err(err) = self.socket.close() {
			debug!("gesture socket close failed: {}", js_message(&err));
		}
	}
}

impl GestureFeed {
	pub fn connect(
		url: &str,
		on_sample: impl Fn(GestureSample) + 'static,
		on_phase: impl Fn(SessionPhase) + 'static,
	) -> Result<Self, SessionError> {
		let session = Rc::new(RefCell::new(GestureSession::new()));
		session.borrow_mut().connect()?;
		let on_phase: PhaseCallback = Rc::new(on_phase);
		on_phase(SessionPhase::Connecting);

		let socket = WebSocket::new(url).map_err(|e| SessionError::Connect(js_message(&e)))?;
		info!("gesture socket connecting to {url}");

		let on_open = {
			let (session, on_phase) = (Rc::downgrade(&session), on_phase.clone());
			Closure::<dyn FnMut()>::new(move || {
				let Some(session) = session.upgrade() else {
					return;
				};
				let opened = session.borrow_mut().opened();
				match opened {
					Ok(()) => on_phase(SessionPhase::Streaming),
					Err(err) => warn!("{err}"),
				}
			})
		};

		let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
			let Some(text) = ev.data().as_string() else {
				debug!("ignoring non-text gesture frame");
				return;
			};
			match serde_json::from_str::<serde_json::Value>(&text) {
				Ok(value) => on_sample(GestureSample::from_json(&value)),
				Err(err) => warn!("malformed gesture frame: {err}"),
			}
		});

		let on_close = {
			let (session, on_phase) = (Rc::downgrade(&session), on_phase.clone());
			Closure::<dyn FnMut(CloseEvent)>::new(move |ev: CloseEvent| {
				info!("gesture socket closed by peer ({})", ev.code());
				// Closing releases this handler, so it must not run inside it.
				let (session, on_phase) = (session.clone(), on_phase.clone());
				wasm_bindgen_futures::spawn_local(async move {
					close_session(&session);
					on_phase(SessionPhase::Closed);
				});
			})
		};

		socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
		socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
		socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

		session.borrow_mut().acquire(Box::new(SocketHandle {
			socket,
			_on_open: on_open,
			_on_message: on_message,
			_on_close: on_close,
		}));

		Ok(Self { session, on_phase })
	}

	pub fn phase(&self) -> SessionPhase {
		self.session.borrow().phase()
	}

	pub fn disconnect(&self) {
		self.session.borrow_mut().close();
		(self.on_phase)(SessionPhase::Closed);
	}
}

impl Drop for GestureFeed {
	fn drop(&mut self) {
		self.session.borrow_mut().close();
	}
}

fn close_session(session: &Weak<RefCell<GestureSession>>) {
	if let Some(session) = session.upgrade() {
		session.borrow_mut().close();
	}
}

fn js_message(value: &JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
