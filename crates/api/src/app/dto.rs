//! Request/response JSON shapes and mapping helpers.
//!
//! Items serialize directly; the only bespoke shape is the delete response.

pub use shelf_core::ItemInput;

use shelf_core::Item;

pub fn removed_to_json(removed: &Item) -> serde_json::Value {
    serde_json::json!({
        "ok": true,
        "removed": removed,
    })
}
