//! Cooperative shutdown flag.
//!
//! The control loop polls [`ShutdownSignal`] between ticks and during the
//! inter-tick sleep.  On the host, [`install_ctrl_c_handler`] raises it
//! from a listener thread when the process receives Ctrl-C.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal(Arc<AtomicBool>);

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Spawn a thread that waits for Ctrl-C and raises `signal`.
#[cfg(not(target_os = "espidf"))]
pub fn install_ctrl_c_handler(signal: ShutdownSignal) -> std::io::Result<()> {
    use log::{info, warn};

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    std::thread::Builder::new()
        .name("ctrl-c".into())
        .spawn(move || {
            runtime.block_on(async {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        info!("Interrupt received, stopping after the current tick");
                        signal.request();
                    }
                    Err(e) => warn!("Ctrl-C listener failed: {}", e),
                }
            });
        })?;
    Ok(())
}
