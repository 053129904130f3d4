mod key_id;
mod mpi;
mod packet;
mod s2k;

pub use self::key_id::KeyId;
pub use self::mpi::{Mpi, MpiRef};
pub use self::packet::{header_len, write_header, PacketHeader, PacketHeaderFormat, Tag};
pub use self::s2k::StringToKey;
