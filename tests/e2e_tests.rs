//! End-to-end integration tests
//!
//! These tests validate the complete pipeline using predefined CSV fixtures.
//! Each test:
//! 1. Reads input.csv from a fixture directory
//! 2. Applies all commands through the engine
//! 3. Generates the report CSV
//! 4. Compares actual output with expected.csv (or history.csv)
//!
//! Fixtures live in tests/fixtures/ and cover:
//! - The reference create / debit / wrong PIN / over-debit flow
//! - Authentication failures and PIN trimming
//! - Over-debits and exact drains
//! - Duplicate creation
//! - Malformed rows and engine rejections
//! - Several interleaved assets and decimal precision
//!
//! Each test runs once per processing strategy; both must produce identical
//! output.

#[cfg(test)]
mod tests {
    use asset_ledger::cli::StrategyType;
    use asset_ledger::strategy::{create_strategy, BatchConfig, Report};
    use rstest::rstest;
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    /// Process `input.csv` of a fixture and compare with `expected_file`
    fn run_test_fixture(
        fixture_name: &str,
        expected_file: &str,
        report: Report,
        strategy_type: StrategyType,
    ) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let input_path = format!("{}/input.csv", fixture_dir);
        let expected_path = format!("{}/{}", fixture_dir, expected_file);

        assert!(
            Path::new(&input_path).exists(),
            "Input file not found: {}",
            input_path
        );

        // Batches of two split every fixture across several batches
        let config = BatchConfig::new(2, 4, 3);
        let strategy = create_strategy(strategy_type, Some(config), report);

        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");
        strategy
            .process(Path::new(&input_path), &mut temp_output)
            .unwrap_or_else(|e| panic!("Failed to process commands: {}", e));
        temp_output.flush().expect("Failed to flush temp file");

        let actual_output = fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e));
        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (strategy: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, strategy_type, actual_output, expected_output
        );
    }

    #[rstest]
    #[case("reference_scenario")]
    #[case("authentication_failures")]
    #[case("insufficient_balance")]
    #[case("duplicate_create")]
    #[case("malformed_data")]
    #[case("rejected_commands")]
    #[case("multiple_assets")]
    #[case("precision")]
    #[case("empty_input")]
    fn test_snapshot_fixtures(
        #[case] fixture: &str,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        run_test_fixture(fixture, "expected.csv", Report::Assets, strategy);
    }

    #[rstest]
    #[case("reference_scenario", "9990001234")]
    #[case("multiple_assets", "200")]
    fn test_history_fixtures(
        #[case] fixture: &str,
        #[case] msisdn: &str,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        run_test_fixture(
            fixture,
            "history.csv",
            Report::History(msisdn.to_string()),
            strategy,
        );
    }
}
