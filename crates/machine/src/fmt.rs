//! Logging shims
//!
//! Hardware builds log through `defmt`, desktop builds through `tracing`.
//! With neither feature the arguments are still type-checked but nothing is
//! emitted. Format strings must stick to plain `{}` so they parse under both
//! backends.

#![allow(unused_macros)]

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

macro_rules! info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($($arg)*);
        #[cfg(feature = "tracing")]
        ::tracing::info!($($arg)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

macro_rules! warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);
        #[cfg(feature = "tracing")]
        ::tracing::warn!($($arg)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

macro_rules! error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($($arg)*);
        #[cfg(feature = "tracing")]
        ::tracing::error!($($arg)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        let _ = ::core::format_args!($($arg)*);
    }};
}
