//! Tracing bootstrap for embedders. The library itself never installs a
//! subscriber; binaries and test harnesses opt in by calling [`init`].

/// Install a global fmt subscriber, filtered by `RUST_LOG` when set.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "mixavg_core=info,mixavg_ingest=info,mixavg_engine=info".into()
            }),
        )
        .try_init();
}
