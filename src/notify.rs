//! Blocking user notifications.

use log::error;

use crate::error::AppError;

pub fn alert(message: &str) {
	if let Some(window) = web_sys::window() {
		let _ = window.alert_with_message(message);
	}
}

/// Log `err` and tell the user about it.
pub fn report(err: &AppError) {
	error!("{err}");
	alert(&err.user_message());
}
