//! Key/value persistence
//!
//! LocalStorage in the browser. Native builds keep values in a per-thread
//! map so the headless runner and tests exercise the same code paths.

/// Read a stored string. Missing keys and storage failures both yield `None`.
#[cfg(target_arch = "wasm32")]
pub fn get_item(key: &str) -> Option<String> {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()?;

    match storage.get_item(key) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("LocalStorage read of {} failed: {:?}", key, e);
            None
        }
    }
}

/// Store a string. Returns whether the write succeeded.
#[cfg(target_arch = "wasm32")]
pub fn set_item(key: &str, value: &str) -> bool {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();

    match storage.map(|s| s.set_item(key, value)) {
        Some(Ok(())) => true,
        Some(Err(e)) => {
            log::warn!("LocalStorage write of {} failed: {:?}", key, e);
            false
        }
        None => {
            log::warn!("LocalStorage unavailable, {} not saved", key);
            false
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod memory {
    use std::cell::RefCell;
    use std::collections::HashMap;

    thread_local! {
        pub static ITEMS: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn get_item(key: &str) -> Option<String> {
    memory::ITEMS.with(|items| items.borrow().get(key).cloned())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn set_item(key: &str, value: &str) -> bool {
    memory::ITEMS.with(|items| {
        items.borrow_mut().insert(key.to_string(), value.to_string());
    });
    true
}

/// Forget a stored key
#[cfg(not(target_arch = "wasm32"))]
pub fn remove_item(key: &str) {
    memory::ITEMS.with(|items| {
        items.borrow_mut().remove(key);
    });
}

#[cfg(target_arch = "wasm32")]
pub fn remove_item(key: &str) {
    if let Some(storage) = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
    {
        let _ = storage.remove_item(key);
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_and_remove() {
        assert_eq!(get_item("storage.test"), None);
        assert!(set_item("storage.test", "42"));
        assert_eq!(get_item("storage.test").as_deref(), Some("42"));
        remove_item("storage.test");
        assert_eq!(get_item("storage.test"), None);
    }
}
