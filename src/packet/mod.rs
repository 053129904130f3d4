pub mod literal_data;
pub mod parser;
pub mod pkesk;

pub use self::parser::{PacketParser, RawPacket};
