//! Platform backends.

pub mod headless;

#[cfg(all(
    feature = "winit",
    any(target_os = "windows", target_os = "macos", target_os = "linux")
))]
pub mod winit;
