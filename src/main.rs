use leptos::prelude::*;
use log::warn;
use osint_graph_explorer::{App, AppConfig, init_logging};

fn main() {
	let (config, config_error) = match AppConfig::load() {
		Ok(config) => (config, None),
		Err(err) => (AppConfig::default(), Some(err)),
	};
	init_logging(config.log_level());
	if let Some(err) = config_error {
		warn!("{err}; using default configuration");
	}

	mount_to_body(move || view! { <App config=config /> });
}
