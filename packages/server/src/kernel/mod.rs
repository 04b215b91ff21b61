pub mod deps;
pub mod storage;

pub use deps::{Cue, CuePlayer, GatewayError, HcMailAdapter, MailGateway, MarkResult, SilentCues, TerminalBell};
pub use storage::FileStore;
