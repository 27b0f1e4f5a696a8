use clap::Args;

use crate::state::ClientState;

#[derive(Args, Debug, Clone)]
pub struct Status;

#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error("status check failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl crate::op::Op for Status {
    type Error = StatusError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut lines = Vec::new();

        // 1. Check the local state directory
        lines.push("State:".to_string());
        match ClientState::load(ctx.state_dir.clone()) {
            Ok(state) => {
                lines.push(format!("  directory: {}", state.state_dir.display()));
                lines.push(format!("  identity:  {}", state.config.identity));
                lines.push(format!("  relay:     {}", state.config.server));
                match state.load_key() {
                    Ok(_) => lines.push("  key.pem:   OK".to_string()),
                    Err(e) => lines.push(format!("  key.pem:   UNREADABLE ({})", e)),
                }
            }
            Err(e) => {
                lines.push(format!("  error: {}", e));
            }
        }

        // 2. Check relay liveness
        let base = ctx.client.base_url();
        let client = ctx.client.http_client();

        lines.push(String::new());
        lines.push(format!("Relay ({}):", base));

        let healthz_url = format!("{}/_status/healthz", base.as_str().trim_end_matches('/'));
        match client.get(&healthz_url).send().await {
            Ok(resp) if resp.status().is_success() => {
                lines.push("  healthz: OK".to_string());
            }
            Ok(resp) => {
                lines.push(format!("  healthz: UNHEALTHY ({})", resp.status()));
            }
            Err(_) => {
                lines.push("  healthz: NOT REACHABLE".to_string());
            }
        }

        Ok(lines.join("\n"))
    }
}
