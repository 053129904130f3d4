//! Crate wide error handling.

use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The errors that can occur while processing a message or a key.
///
/// This is a closed set; every failure of the library maps onto exactly one
/// of these kinds.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// Allocation or host I/O failure.
    #[snafu(display("system error: {source}"))]
    #[snafu(context(false))]
    SysError { source: std::io::Error },

    /// Input ran out before a decision could be made.
    #[snafu(display("no data for processing available"))]
    NoData,

    /// An argument is out of range.
    #[snafu(display("invalid value"))]
    InvalidValue,

    /// Malformed CTB or packet length.
    #[snafu(display("invalid OpenPGP packet detected"))]
    InvalidPacket,

    /// Structural violation after parsing, e.g. a CFB prefix mismatch.
    #[snafu(display("invalid OpenPGP message"))]
    InvalidMessage,

    /// An MPI value in a packet is truncated or inconsistent.
    #[snafu(display("an MPI value in a packet is malformed"))]
    InvalidMpi,

    /// Malformed S-expression or protected block.
    #[snafu(display("invalid data"))]
    InvalidData,

    /// Unknown or unsupported algorithm id.
    #[snafu(display("algorithm {algo} is invalid or not supported"))]
    InvalidAlgo { algo: u8 },

    /// Decrypting a protected key did not yield an S-expression.
    #[snafu(display("invalid passphrase"))]
    InvalidPassphrase,

    /// A valid packet in the wrong position.
    #[snafu(display("unexpected packet (tag {tag})"))]
    UnexpectedPacket { tag: u8 },

    /// A valid atom in the wrong position.
    #[snafu(display("unexpected data"))]
    UnexpectedData,

    /// Public key lookup miss.
    #[snafu(display("no public key found"))]
    NoPubKey,

    /// Secret key lookup miss.
    #[snafu(display("no secret key found"))]
    NoSecKey,

    /// A primitive refused, e.g. bad key material or invalid ciphertext.
    #[snafu(display("error from the crypto layer"))]
    CryptError,

    /// PKCS#1 or session key checksum mismatch; in all likelihood the
    /// message was decrypted with the wrong private key.
    #[snafu(display("wrong key; can't decrypt using this key"))]
    WrongKey,

    /// The MDC was required or present but did not verify.
    #[snafu(display("modification detection code mismatch"))]
    MdcFailed,

    /// A recognized but unimplemented corner of the protocol.
    #[snafu(display("not implemented: {what}"))]
    NotImplemented { what: &'static str },

    /// Invariant breakage inside the library.
    #[snafu(display("internal error: {what}"))]
    Bug { what: &'static str },
}

impl From<rsa::Error> for Error {
    fn from(_: rsa::Error) -> Self {
        Error::CryptError
    }
}

impl From<cipher::InvalidLength> for Error {
    fn from(_: cipher::InvalidLength) -> Self {
        Error::CryptError
    }
}

impl Error {
    pub(crate) fn not_implemented(what: &'static str) -> Self {
        Error::NotImplemented { what }
    }
}
