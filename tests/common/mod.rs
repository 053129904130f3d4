//! The throwaway RSA-1024 key the integration tests encrypt to.

use hex_literal::hex;
use tinypgp::{KeyId, KeyRecord, Keystore};

pub const TEST_KEY_ID: KeyId = KeyId::from_halves(0x907b5d16, 0x40619dd0);

pub const N: [u8; 128] = hex!(
    "ad6b30102c402e776851825d51bb8a16c317f2dc9b19267d8d433e2bdfb17134"
    "ed095d584666069b366c9f981e26246c8243fdde3884e11b56083e33877bbc5c"
    "bbf615382117fd0fe93688d4b85d80fa72b31b146bd3d0a5465d4e8f5ca229d4"
    "2a4f03a9f3c935547f9ee959a043a7cf87c685db676953b6749039f1d7bc450f"
);
pub const E: [u8; 3] = hex!("010001");
pub const D: [u8; 128] = hex!(
    "357b0fe87ced12276af9701dbd5dfbb9075374674a41985831df61e5ffe76605"
    "2f70aae3d55a13817c6845539140ac0cf6a3674047e7dad02659066db7c39613"
    "f4f2450686e8ec6c8afafbc8871d849ac6382e66be2865683e6301511da2bed4"
    "efd7a5695bbe627f4c65080f7db629b845e6f77c0f600fa9185ea5c183eada89"
);
pub const P: [u8; 64] = hex!(
    "c49cdc8a8cb4c11ceb120a3c5da292f27473e8ddd248eff4135f0ee803e287e8"
    "a2f82fb0ce9e62ceacf9ec97a6e0b727edbd4495ba7231b89607307c9c8a3bdd"
);
pub const Q: [u8; 64] = hex!(
    "e1ccd7230c6213ca77c8a0d9e77734cea45deab9aa0ec3f4edcb2b3f241be031"
    "226e75d2f440c526aca7635fbfd5badae7c10385f59144f627b313357f89dbdb"
);
pub const U: [u8; 64] = hex!(
    "634a3f33a3d7951f66e2b1883d28dabc7ca07f2f5642ce5798c3301251883a6a"
    "7111b2f0fc64fbc91f66fc87664f8cc0a1a032374999306fcc13dc07d6b3487d"
);

pub fn test_key() -> KeyRecord {
    KeyRecord::rsa(TEST_KEY_ID, &N, &E, &D, &P, &Q, &U)
}

/// The same key material under a key id nobody holds.
pub fn stranger_key() -> KeyRecord {
    let key_id = KeyId::from_halves(0xdeadbeef, 0xdeadbeef);
    KeyRecord::rsa(key_id, &N, &E, &D, &P, &Q, &U)
}

pub fn keystore() -> Keystore {
    Keystore::new(vec![test_key()])
}
