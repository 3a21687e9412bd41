use overlay_sync::cli;

fn main() {
    // Logging is initialized inside process_cli, after argument parsing, so
    // --help and --version output stays clean.
    let code = cli::process_cli();
    log::logger().flush();
    std::process::exit(code);
}
