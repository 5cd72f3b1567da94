//! Raw bindings for the Android NDK Binder API (`libbinder_ndk`).
//!
//! Generated at build time from `BinderBindings.hpp`. Point
//! `BINDER_NDK_HEADER` at the header when it does not live in `src/`, and
//! `ANDROID_NDK_HOME` at the NDK. Without the header this crate is empty.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(dead_code)]
#![allow(clippy::all)]

include!(concat!(env!("OUT_DIR"), "/bindings.rs"));
