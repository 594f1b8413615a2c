fn main() {
    use so_dependency_explorer::cli::parse;
    let cli = parse();
    so_dependency_explorer::app::init_logging(cli.verbose, cli.quiet);
    let code = so_dependency_explorer::app::run_cli(cli);
    if code != 0 {
        std::process::exit(code);
    }
}
