use std::panic;

/// Panic hook that records the panic through `tracing` and then lets
/// `console_error_panic_hook` print it with a JS stack trace.
///
/// On non-wasm targets, prints the panic to `stderr`.
pub fn hook(info: &panic::PanicHookInfo) {
    tracing::error!(panic = %info, "application panicked");

    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::hook(info);

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::io::{self, Write};
        let _ = writeln!(io::stderr(), "{}", info);
    }
}

pub fn install() {
    panic::set_hook(Box::new(hook));
}
