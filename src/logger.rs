/// Configures `env_logger` for the `vz` binary.
///
/// Verbose runs show every pipeline step, normal runs only skipped
/// entries, failed commands and errors.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .format_timestamp(None)
        .init();
}
