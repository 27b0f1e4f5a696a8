pub mod init;
pub mod pull;
pub mod push;
pub mod status;

pub use init::Init;
pub use pull::Pull;
pub use push::Push;
pub use status::Status;
