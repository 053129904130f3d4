pub mod checksum;
pub mod eme_pkcs1;
pub mod hash;
pub mod public_key;
pub mod rsa;
pub mod sym;
