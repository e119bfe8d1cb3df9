fn main() {
    // Host builds (library and tests) link normally.
    if std::env::var_os("CARGO_FEATURE_FIRMWARE").is_none() {
        return;
    }

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
