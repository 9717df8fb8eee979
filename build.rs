fn main() {
    // Forward esp-idf link arguments and environment configuration when
    // building for the device. Host builds (tests) skip this entirely.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}
