use num_enum::{FromPrimitive, IntoPrimitive};

/// Public key algorithm ids. Ref: RFC 4880, section 9.1.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum PublicKeyAlgorithm {
    /// RSA (encrypt or sign)
    Rsa = 1,
    /// ElGamal (encrypt only)
    Elgamal = 16,
    /// DSA (sign only)
    Dsa = 17,
    #[num_enum(catch_all)]
    Unknown(u8),
}

impl PublicKeyAlgorithm {
    /// The number of MPIs an encrypted session key carries for this
    /// algorithm, or 0 if the algorithm cannot encrypt.
    pub fn encrypted_mpi_count(self) -> usize {
        match self {
            PublicKeyAlgorithm::Rsa => 1,
            PublicKeyAlgorithm::Elgamal => 2,
            PublicKeyAlgorithm::Dsa | PublicKeyAlgorithm::Unknown(_) => 0,
        }
    }
}
