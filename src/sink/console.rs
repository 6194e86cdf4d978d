//! Console output.

use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::Sink;
use crate::error_handling::DeliveryError;

/// Writes each payload to a writer (stdout by default), followed by a newline.
///
/// Writes run on the blocking pool so a slow terminal or pipe never stalls
/// the runtime thread driving the delivery worker.
pub struct ConsoleSink {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self::with_writer(std::io::stdout())
    }

    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(writer))),
        }
    }
}

#[async_trait]
impl Sink for ConsoleSink {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn deliver(&self, payload: &str) -> Result<(), DeliveryError> {
        let out = Arc::clone(&self.out);
        let payload = payload.to_owned();

        tokio::task::spawn_blocking(move || write_payload(&out, &payload))
            .await
            .map_err(|e| DeliveryError::Console(std::io::Error::other(e)))?
    }
}

fn write_payload(out: &Mutex<Box<dyn Write + Send>>, payload: &str) -> Result<(), DeliveryError> {
    // A poisoned lock only means another delivery panicked mid-write
    let mut out = out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    out.write_all(payload.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
