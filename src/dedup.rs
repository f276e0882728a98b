//! Content-derived toast identity.
//!
//! The composite key joins the parts with [`KEY_DELIMITER`] without escaping, so
//! content that itself contains the delimiter can collide with a different
//! tuple. Callers needing strict identity pass an explicit `dedupe_key`.

use crate::options::ToastConfig;

pub const KEY_DELIMITER: &str = "||";

pub(crate) const KEY_DATA: &str = "bt-key";

pub fn compute_key(text: &str, config: &ToastConfig) -> String {
    if !config.dedupe_key.is_empty() {
        return config.dedupe_key.clone();
    }
    [
        config.variant.as_str(),
        config.title.trim(),
        text.trim(),
        config.position.as_str(),
    ]
    .join(KEY_DELIMITER)
}
