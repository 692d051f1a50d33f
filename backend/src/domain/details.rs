//! Free-form document fields submitted by clients.
//!
//! Parcels and rider applications carry arbitrary client fields next to the
//! server-controlled ones. The server-controlled keys are stripped on the way
//! in so a client can never forge ownership, payment or status data.

use serde_json::{Map, Value};

/// Client-supplied fields stored verbatim alongside a record.
pub type Details = Map<String, Value>;

/// Remove `reserved` keys from a submitted document, returning the removed
/// key names for logging.
///
/// # Examples
/// ```
/// use profast::domain::details::{Details, strip_reserved};
/// use serde_json::json;
///
/// let mut doc: Details = json!({ "title": "Books", "payment_status": "paid" })
///     .as_object()
///     .cloned()
///     .expect("object");
/// let removed = strip_reserved(&mut doc, &["payment_status"]);
/// assert_eq!(removed, vec!["payment_status".to_owned()]);
/// assert!(doc.contains_key("title"));
/// ```
pub fn strip_reserved(details: &mut Details, reserved: &[&str]) -> Vec<String> {
    reserved
        .iter()
        .filter_map(|key| details.remove(*key).map(|_| (*key).to_owned()))
        .collect()
}
