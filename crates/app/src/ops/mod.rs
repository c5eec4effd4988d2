pub mod feed;
pub mod init;
pub mod mint;
pub mod post;
pub mod shell;
pub mod verify;
pub mod version;
pub mod whoami;

pub use feed::Feed;
pub use init::Init;
pub use mint::Mint;
pub use post::Post;
pub use shell::Shell;
pub use verify::Verify;
pub use version::Version;
pub use whoami::Whoami;
