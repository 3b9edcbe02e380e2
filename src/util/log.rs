//! Thin wrappers around `tracing` so that call sites compile the same
//! whether or not the `tracing` feature is enabled.

macro_rules! log_warn {
    ( $( $arg:tt )* ) => {{
        #[cfg(feature = "tracing")]
        ::tracing::warn!($( $arg )*);

        #[cfg(not(feature = "tracing"))]
        {
            let _ = format_args!($( $arg )*);
        }
    }};
}

macro_rules! log_debug {
    ( $( $arg:tt )* ) => {{
        #[cfg(feature = "tracing")]
        ::tracing::debug!($( $arg )*);

        #[cfg(not(feature = "tracing"))]
        {
            let _ = format_args!($( $arg )*);
        }
    }};
}

macro_rules! log_trace {
    ( $( $arg:tt )* ) => {{
        #[cfg(feature = "tracing")]
        ::tracing::trace!($( $arg )*);

        #[cfg(not(feature = "tracing"))]
        {
            let _ = format_args!($( $arg )*);
        }
    }};
}

pub(crate) use {log_debug, log_trace, log_warn};
