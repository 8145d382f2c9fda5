// Code blocks in `README.md`, compiled and run as tests.
#[cfg(feature = "skeptic")]
include!(concat!(env!("OUT_DIR"), "/skeptic-tests.rs"));
