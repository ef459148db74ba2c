//! Platform glue shared by the panels.

/// Run a fire-and-forget future on the browser event loop. Native targets
/// block on their short I/O instead (see the export panel).
#[cfg(target_arch = "wasm32")]
pub fn spawn_future<F>(future: F)
where
    F: std::future::Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}
