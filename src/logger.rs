//! Logger setup for the smartgen binary.

/// Initializes the global logger.
///
/// `verbose` lowers the default level from `Info` to `Debug`; a `RUST_LOG`
/// directive, when set, takes precedence over both.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}
