//! Snapshot persistence.
//!
//! Two backends behind one entry point, chosen at startup: a remote document
//! store reached over HTTP, and browser-local storage. Both upsert by key; the
//! last write under a key wins.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gloo_net::http::Request;
use log::{info, warn};
use serde::Serialize;

use crate::components::force_graph::GraphSnapshot;
use crate::config::PersistenceConfig;
use crate::error::{AppError, AppResult};

pub const KEY_PREFIX: &str = "graph_";

/// Local storage key of the snapshot saved under `key`.
pub fn storage_key(key: &str) -> String {
	format!("{KEY_PREFIX}{key}")
}

/// Synchronous string key/value storage.
pub trait KeyValueStorage {
	fn set_item(&self, key: &str, value: &str) -> AppResult<()>;
	fn get_item(&self, key: &str) -> AppResult<Option<String>>;
}

/// `window.localStorage`.
pub struct BrowserStorage(web_sys::Storage);

impl BrowserStorage {
	pub fn local() -> AppResult<Self> {
		web_sys::window()
			.ok_or_else(|| AppError::Browser("no window".into()))?
			.local_storage()
			.map_err(AppError::browser)?
			.map(Self)
			.ok_or_else(|| AppError::Storage("localStorage is unavailable".into()))
	}
}

impl KeyValueStorage for BrowserStorage {
	fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
		self.0
			.set_item(key, value)
			.map_err(|e| AppError::Storage(format!("{e:?}")))
	}

	fn get_item(&self, key: &str) -> AppResult<Option<String>> {
		self.0
			.get_item(key)
			.map_err(|e| AppError::Storage(format!("{e:?}")))
	}
}

/// Session-only storage, used when the browser refuses `localStorage`.
#[derive(Default)]
pub struct MemoryStorage(RefCell<HashMap<String, String>>);

impl KeyValueStorage for MemoryStorage {
	fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
		self.0.borrow_mut().insert(key.to_string(), value.to_string());
		Ok(())
	}

	fn get_item(&self, key: &str) -> AppResult<Option<String>> {
		Ok(self.0.borrow().get(key).cloned())
	}
}

/// Snapshots serialized as JSON under `graph_<key>`.
#[derive(Clone)]
pub struct LocalSnapshotStore {
	storage: Rc<dyn KeyValueStorage>,
}

impl LocalSnapshotStore {
	pub fn new(storage: Rc<dyn KeyValueStorage>) -> Self {
		Self { storage }
	}

	pub fn save(&self, key: &str, snapshot: &GraphSnapshot) -> AppResult<()> {
		let json = serde_json::to_string(snapshot)?;
		self.storage.set_item(&storage_key(key), &json)
	}

	pub fn load(&self, key: &str) -> AppResult<Option<GraphSnapshot>> {
		match self.storage.get_item(&storage_key(key))? {
			Some(json) => Ok(Some(serde_json::from_str(&json)?)),
			None => Ok(None),
		}
	}
}

/// Body written to the remote store.
#[derive(Debug, Serialize)]
pub struct StoredDocument<'a> {
	pub data: &'a GraphSnapshot,
	/// RFC 3339 time of the save.
	pub timestamp: String,
}

/// Document store accepting `PUT <endpoint>/<key>` with a JSON body.
#[derive(Clone, Debug)]
pub struct RemoteDocumentStore {
	endpoint: String,
}

impl RemoteDocumentStore {
	pub fn new(endpoint: impl Into<String>) -> Self {
		Self {
			endpoint: endpoint.into(),
		}
	}

	pub fn document_url(&self, key: &str) -> String {
		let key: String = url::form_urlencoded::byte_serialize(key.as_bytes()).collect();
		format!(
			"{}/{}",
			self.endpoint.trim_end_matches('/'),
			key.replace('+', "%20")
		)
	}

	pub async fn save(&self, key: &str, snapshot: &GraphSnapshot) -> AppResult<()> {
		let body = StoredDocument {
			data: snapshot,
			timestamp: chrono::Utc::now().to_rfc3339(),
		};
		let response = Request::put(&self.document_url(key))
			.json(&body)?
			.send()
			.await?;
		if !response.ok() {
			return Err(AppError::Http {
				status: response.status(),
			});
		}
		Ok(())
	}
}

/// The persistence adapter selected at startup.
#[derive(Clone)]
pub enum SnapshotStore {
	Local(LocalSnapshotStore),
	Remote(RemoteDocumentStore),
}

impl SnapshotStore {
	pub fn from_config(config: &PersistenceConfig) -> Self {
		match config {
			PersistenceConfig::Remote { endpoint } => {
				info!("saving snapshots to {endpoint}");
				Self::Remote(RemoteDocumentStore::new(endpoint.clone()))
			}
			PersistenceConfig::Local => {
				let storage: Rc<dyn KeyValueStorage> = match BrowserStorage::local() {
					Ok(storage) => Rc::new(storage),
					Err(err) => {
						warn!("{err}; snapshots will only last for this session");
						Rc::new(MemoryStorage::default())
					}
				};
				Self::Local(LocalSnapshotStore::new(storage))
			}
		}
	}

	/// Upsert `snapshot` under `key`. Failures are not retried.
	pub async fn save_graph(&self, key: &str, snapshot: &GraphSnapshot) -> AppResult<()> {
		match self {
			Self::Local(store) => store.save(key, snapshot),
			Self::Remote(store) => store.save(key, snapshot).await,
		}
	}

	/// Confirmation shown after a successful save.
	pub fn saved_message(&self) -> &'static str {
		match self {
			Self::Local(_) => "Graph saved to Local Storage.",
			Self::Remote(_) => "Graph saved to cloud!",
		}
	}
}
