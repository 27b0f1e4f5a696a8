use clap::Args;

use common::crypto::{KeyError, KeyStrength};
use common::protocol::Identity;

use crate::relay::{self, RegisterError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// RSA modulus size in bits (1024, 2048, 3072, or 4096)
    #[arg(long, default_value_t = 3072)]
    pub bits: u16,

    /// Identity to request (only honored by relays in client-chosen mode)
    #[arg(long)]
    pub id: Option<Identity>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("unusable key size: {0}")]
    Key(#[from] KeyError),
    #[error("init failed: {0}")]
    Register(#[from] RegisterError),
}

#[async_trait::async_trait]
impl crate::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let strength = KeyStrength::new(self.bits)?;

        let state = relay::register(
            &ctx.client,
            ctx.state_dir.clone(),
            strength,
            self.id.clone(),
        )
        .await?;

        let output = format!(
            "Registered with relay at: {}\n\
             - Identity: {}\n\
             - Key: {}\n\
             - Config: {}",
            state.config.server,
            state.config.identity,
            state.key_path.display(),
            state.config_path.display(),
        );

        Ok(output)
    }
}
