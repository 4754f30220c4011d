//! Concrete audio backends
//!
//! Each backend exposes free functions matching the descriptor contract:
//! constructors, a destructor and a settings hook. Which ones exist depends
//! on the target platform and cargo features.

#[cfg(any(
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "macos",
    target_os = "ios",
    target_os = "windows"
))]
pub(crate) mod cpal;

#[cfg(feature = "file-backend")]
pub(crate) mod file;

#[cfg(all(target_os = "linux", feature = "jack-backend"))]
pub(crate) mod jack;

#[cfg(test)]
pub(crate) mod mock;
