use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_simulate_flags() {
    let cli = Cli::try_parse_from([
        "tierflow",
        "simulate",
        "--n",
        "3",
        "--source",
        "data/bronze/bronze_all.csv",
        "--no-reset",
    ])
    .unwrap();
    let Commands::Simulate(args) = cli.command else {
        panic!("expected simulate");
    };
    assert_eq!(args.n, Some(3));
    assert_eq!(
        args.source.as_deref(),
        Some(std::path::Path::new("data/bronze/bronze_all.csv"))
    );
    assert!(args.no_reset);
    assert!(args.staging.is_none());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["tierflow", "validate", "-p", "/tmp/proj", "-v"]).unwrap();
    assert!(cli.global.verbose);
    assert_eq!(cli.global.project_dir, PathBuf::from("/tmp/proj"));
    assert!(matches!(cli.command, Commands::Validate));
}
