use clap::Args;

use crate::relay::{self, ReceiveError};
use crate::state::{ClientState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Pull;

#[derive(Debug, thiserror::Error)]
pub enum PullError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error("pull failed: {0}")]
    Receive(#[from] ReceiveError),
}

#[async_trait::async_trait]
impl crate::op::Op for Pull {
    type Error = PullError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = ClientState::load(ctx.state_dir.clone())?;

        match relay::receive(&ctx.client, &state).await? {
            Some(plaintext) => Ok(String::from_utf8_lossy(&plaintext).into_owned()),
            None => Ok("Nothing queued".to_string()),
        }
    }
}
