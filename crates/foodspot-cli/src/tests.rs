use super::*;

#[test]
fn parses_search_command() {
    let cli = Cli::try_parse_from(["foodspot-cli", "search", "--lat", "28.6139", "--lng", "77.209"])
        .expect("expected valid cli args");

    match cli.command {
        Commands::Search { lat, lng, pretty } => {
            assert!((lat - 28.6139).abs() < f64::EPSILON);
            assert!((lng - 77.209).abs() < f64::EPSILON);
            assert!(!pretty);
        }
    }
}

#[test]
fn accepts_negative_coordinates_and_pretty_flag() {
    let cli = Cli::try_parse_from([
        "foodspot-cli",
        "search",
        "--lat",
        "-33.8688",
        "--lng",
        "-151.2093",
        "--pretty",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Search { pretty: true, lat, .. } if lat < 0.0
    ));
}

#[test]
fn search_requires_both_coordinates() {
    assert!(Cli::try_parse_from(["foodspot-cli", "search", "--lat", "28.6"]).is_err());
}

#[test]
fn rejects_non_numeric_latitude() {
    assert!(Cli::try_parse_from(["foodspot-cli", "search", "--lat", "north", "--lng", "77.2"]).is_err());
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["foodspot-cli"]).is_err());
}
