//! Network infrastructure: implements `HttpProbe` using `spawn_blocking`.

use std::time::Duration;

use anyhow::Result;

use crate::application::ports::HttpProbe;

/// Production implementation backed by a blocking `ureq` agent.
pub struct UreqProbe;

impl HttpProbe for UreqProbe {
    async fn get_status(&self, url: &str, timeout: Duration) -> Result<u16> {
        let url = url.to_string();
        tokio::task::spawn_blocking(move || {
            let agent = ureq::AgentBuilder::new()
                .timeout(timeout)
                .redirects(0)
                .build();
            match agent.get(&url).call() {
                Ok(response) => Ok(response.status()),
                // ureq reports 4xx/5xx as errors; the caller decides what they mean.
                Err(ureq::Error::Status(code, _)) => Ok(code),
                Err(ureq::Error::Transport(t)) => Err(anyhow::anyhow!("{t}")),
            }
        })
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking panicked: {e}"))?
    }
}
