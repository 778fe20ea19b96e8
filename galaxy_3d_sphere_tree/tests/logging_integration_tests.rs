//! Integration tests for the logging system
//!
//! These tests verify that sphere tree operations report through the
//! process-wide logger and honour the minimum severity.
//!
//! Run with: cargo test --test logging_integration_tests

use galaxy_3d_sphere_tree::galaxy3d::log::{
    self as galaxy_log, LogEntry, LogSeverity, Logger,
};
use galaxy_3d_sphere_tree::galaxy3d::math::BoundingSphere;
use galaxy_3d_sphere_tree::galaxy3d::{Error, SphereTree, SphereTreeConfig};
use galaxy_3d_sphere_tree::glam::Vec3;
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn install_capture(min_severity: LogSeverity) -> Arc<Mutex<Vec<LogEntry>>> {
    let (test_logger, entries) = TestLogger::new();
    galaxy_log::set_logger(test_logger);
    galaxy_log::set_min_severity(min_severity);
    entries
}

fn restore_defaults() {
    galaxy_log::reset_logger();
    galaxy_log::set_min_severity(LogSeverity::Info);
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_tree_creation_is_logged() {
    let entries = install_capture(LogSeverity::Info);

    let _tree = SphereTree::<u32>::new(SphereTreeConfig::new(8, 16.0, 1.0), None).unwrap();

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].severity, LogSeverity::Info);
        assert_eq!(captured[0].source, "galaxy3d::SphereTree");
        assert!(captured[0].message.contains("8 spheres max"));
        assert_eq!(captured[0].file, None);
    }

    restore_defaults();
}

#[test]
#[serial]
fn test_integration_errors_carry_location() {
    let entries = install_capture(LogSeverity::Info);

    let mut tree = SphereTree::<u32>::new(SphereTreeConfig::new(1, 16.0, 1.0), None).unwrap();
    tree.add_sphere(BoundingSphere::new(Vec3::ZERO, 1.0), 1).unwrap();
    let result = tree.add_sphere(BoundingSphere::new(Vec3::ONE, 1.0), 2);
    assert_eq!(result, Err(Error::PoolExhausted { capacity: 3 }));

    {
        let captured = entries.lock().unwrap();
        let error = captured
            .iter()
            .find(|entry| entry.severity == LogSeverity::Error)
            .expect("pool exhaustion should be logged");
        assert_eq!(error.message, "Node pool exhausted (capacity 3)");
        assert!(error.file.is_some());
        assert!(error.line.is_some());
    }

    restore_defaults();
}

#[test]
#[serial]
fn test_integration_min_severity_filters_tree_messages() {
    let entries = install_capture(LogSeverity::Warn);

    let mut tree = SphereTree::<u32>::new(SphereTreeConfig::default(), None).unwrap();
    tree.remove_sphere(tree.root()).unwrap();

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].severity, LogSeverity::Warn);
        assert!(captured[0].message.contains("root"));
    }

    restore_defaults();
}

#[test]
#[serial]
fn test_integration_logger_reset() {
    let entries = install_capture(LogSeverity::Info);
    let _first = SphereTree::<u32>::with_defaults().unwrap();
    assert_eq!(entries.lock().unwrap().len(), 1);

    restore_defaults();

    // Goes to the default logger, not captured
    let _second = SphereTree::<u32>::with_defaults().unwrap();
    assert_eq!(entries.lock().unwrap().len(), 1);
    assert_eq!(galaxy_log::min_severity(), LogSeverity::Info);
}

#[test]
#[serial]
fn test_integration_trace_enables_process_reports() {
    let entries = install_capture(LogSeverity::Trace);

    let mut tree = SphereTree::<u32>::new(SphereTreeConfig::new(4, 16.0, 1.0), None).unwrap();
    tree.add_sphere(BoundingSphere::new(Vec3::ZERO, 1.0), 1).unwrap();
    tree.process().unwrap();
    // Nothing queued: no report
    tree.process().unwrap();

    {
        let captured = entries.lock().unwrap();
        let reports: Vec<&LogEntry> = captured
            .iter()
            .filter(|entry| entry.severity == LogSeverity::Trace)
            .collect();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].message.contains("1 integrated"));
    }

    restore_defaults();
}
