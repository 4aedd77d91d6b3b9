fn main() {
    // Host builds (tests) run with --no-default-features; only emit the
    // ESP-IDF link/env configuration when targeting the device.
    if std::env::var("CARGO_FEATURE_ESPIDF").is_ok() {
        embuild::espidf::sysenv::output();
    }
}
