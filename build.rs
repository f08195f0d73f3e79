use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds run the simulation and the test suite, nothing to link.
    let target = env::var("TARGET").unwrap();
    if !target.contains("avr") {
        return;
    }

    // Configure for ATmega128
    println!("cargo:rustc-link-arg=-mmcu=atmega128");

    if env::var("PROFILE").unwrap() == "debug" {
        println!("cargo:rustc-cfg=feature=\"debug\"");
    }

    println!("cargo:warning=Building for ATmega128 at 16MHz");
}
