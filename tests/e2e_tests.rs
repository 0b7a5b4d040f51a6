//! End-to-end integration tests
//!
//! These tests validate the complete import pipeline using predefined CSV
//! fixtures. Each test:
//! 1. Reads input.csv from a fixture directory
//! 2. Imports all transfers into a fresh ledger
//! 3. Writes the requested report
//! 4. Compares the report with expected.csv
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - Single cycles, self-loops and parallel edges
//! - Acyclic and empty inputs
//! - Several disjoint cyclic regions
//! - Overlapping cycles, where one depth-first pass reports only the cycles
//!   it closes (alice -> carol reaches a finished node and adds none)
//! - Malformed rows that must be skipped
//! - The per-user report
//!
//! Each test is run twice: once with the synchronous strategy and once with
//! the async strategy.

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;
    use transaction_ledger::cli::{ReportType, StrategyType};
    use transaction_ledger::strategy::{create_strategy, BatchConfig};
    use transaction_ledger::LedgerError;

    /// Run a fixture by importing input.csv and comparing the report with expected.csv
    ///
    /// # Panics
    ///
    /// Panics if:
    /// - Input or expected files cannot be read
    /// - The report doesn't match the expected output
    fn run_test_fixture(
        fixture_name: &str,
        report: ReportType,
        strategy_type: StrategyType,
        config: Option<BatchConfig>,
    ) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let input_path = format!("{}/input.csv", fixture_dir);
        let expected_path = format!("{}/expected.csv", fixture_dir);

        assert!(
            Path::new(&input_path).exists(),
            "Input file not found: {}",
            input_path
        );
        assert!(
            Path::new(&expected_path).exists(),
            "Expected file not found: {}",
            expected_path
        );

        let strategy = create_strategy(strategy_type.clone(), config);

        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");

        strategy
            .process(Path::new(&input_path), report, &mut temp_output)
            .unwrap_or_else(|e| panic!("Failed to import transfers: {}", e));

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

    /// End-to-end test for all fixtures with both import strategies
    #[rstest]
    #[case("triangle", ReportType::Cycles)]
    #[case("acyclic", ReportType::Cycles)]
    #[case("empty_input", ReportType::Cycles)]
    #[case("self_loop", ReportType::Cycles)]
    #[case("parallel_edges", ReportType::Cycles)]
    #[case("disjoint_cycles", ReportType::Cycles)]
    #[case("overlapping_cycles", ReportType::Cycles)]
    #[case("long_cycle", ReportType::Cycles)]
    #[case("malformed_data", ReportType::Cycles)]
    #[case("zero_and_precision", ReportType::Cycles)]
    #[case("users_report", ReportType::Users)]
    fn test_fixtures(
        #[case] fixture: &str,
        #[case] report: ReportType,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        run_test_fixture(fixture, report, strategy, None);
    }

    /// Small batches force transfers of one sender across batch boundaries
    #[rstest]
    #[case("long_cycle", ReportType::Cycles)]
    #[case("disjoint_cycles", ReportType::Cycles)]
    #[case("overlapping_cycles", ReportType::Cycles)]
    #[case("users_report", ReportType::Users)]
    fn test_fixtures_small_batches(#[case] fixture: &str, #[case] report: ReportType) {
        run_test_fixture(
            fixture,
            report,
            StrategyType::Async,
            Some(BatchConfig::new(2, 2)),
        );
    }

    #[rstest]
    fn test_missing_input_file(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        let strategy = create_strategy(strategy, None);
        let mut output = Vec::new();

        let result = strategy.process(
            Path::new("tests/fixtures/does_not_exist.csv"),
            ReportType::Cycles,
            &mut output,
        );

        assert!(matches!(result, Err(LedgerError::FileNotFound { .. })));
        assert!(output.is_empty());
    }
}
