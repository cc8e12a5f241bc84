#![allow(dead_code)]

pub mod ec {
    pub const TEST_KEY_THUMBPRINT: &str = "yy_Mkoz_yRZ23cfJK8ul7ahqeQvAyWJNvaBrKFr0hTk";

    pub const JWK_P256: &str = include_str!("../data/ec/jwk-p256.json");
    pub const JWK_P256_WITH_PRIVATE_KEY: &str = include_str!("../data/ec/jwk-p256-priv.json");
    pub const JWK_P256_WITH_MINIMAL_PRIVATE_KEY: &str =
        include_str!("../data/ec/jwk-p256-priv-min.json");
    pub const JWK_P256_WITH_MISMATCHED_PRIVATE_KEY: &str =
        include_str!("../data/ec/jwk-p256-priv-mismatched.json");
    pub const JWK_P256_ENCRYPTION_WITH_PRIVATE_KEY: &str =
        include_str!("../data/ec/jwk-p256-priv-enc.json");

    pub const JWK_P384_MINIMAL: &str = include_str!("../data/ec/jwk-p384-min.json");
}
