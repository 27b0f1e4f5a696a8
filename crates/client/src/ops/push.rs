use clap::Args;

use common::protocol::{Identity, Ttl};

use crate::relay::{self, SendError};

#[derive(Args, Debug, Clone)]
pub struct Push {
    /// Recipient identity
    pub to: Identity,

    /// Message text to seal and queue
    pub message: String,

    /// How long the relay keeps the message, e.g. "90s" or "1.5h"
    #[arg(long)]
    pub ttl: Option<Ttl>,
}

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("push failed: {0}")]
    Send(#[from] SendError),
}

#[async_trait::async_trait]
impl crate::op::Op for Push {
    type Error = PushError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        relay::send(&ctx.client, &self.to, self.message.as_bytes(), self.ttl).await?;

        Ok(match self.ttl {
            Some(ttl) if !ttl.is_zero() => format!("Queued for {} (expires in {})", self.to, ttl),
            _ => format!("Queued for {}", self.to),
        })
    }
}
