// crates/adler-condition/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Result helpers and in-memory host services for condition tests.
// ============================================================================
//! ## Overview
//! Stub completion, naming, and restore services plus a recording audit sink.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    dead_code,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::HashMap;
use std::collections::HashSet;
use std::error::Error;
use std::fmt;
use std::sync::Mutex;

use adler_condition::BackupEntityKind;
use adler_condition::BackupIdTranslator;
use adler_condition::CompletionService;
use adler_condition::ConditionAuditEvent;
use adler_condition::ConditionAuditSink;
use adler_condition::ConditionServices;
use adler_condition::DependencyState;
use adler_condition::RestoreId;
use adler_condition::SectionNameService;
use adler_condition::ServiceError;
use adler_condition::StringCatalog;
use adler_logic::SectionId;
use adler_logic::UserId;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across condition integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition {
        Ok(())
    } else {
        Err(Box::new(TestError {
            message: message.into(),
        }))
    }
}

// ========================================================================
// Stub Services
// ========================================================================

/// In-memory completion table.
#[derive(Default)]
pub struct StubCompletion {
    /// Completed sections per user; absent entries are incomplete.
    pub completed: HashSet<(SectionId, UserId)>,
    /// Users that are not enrolled.
    pub not_enrolled: HashSet<UserId>,
    /// Failure returned for every lookup when set.
    pub failure: Option<ServiceError>,
    /// Number of lookups served.
    pub calls: Mutex<usize>,
}

impl StubCompletion {
    /// Marks `sections` as completed by `user`.
    pub fn completed_by(user: u64, sections: &[u64]) -> Self {
        Self {
            completed: sections
                .iter()
                .map(|&section| (SectionId::new(section), UserId::new(user)))
                .collect(),
            ..Self::default()
        }
    }

    /// Returns the number of lookups served so far.
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl CompletionService for StubCompletion {
    fn is_section_completed(
        &self,
        section: SectionId,
        user: UserId,
    ) -> Result<bool, ServiceError> {
        *self.calls.lock().unwrap() += 1;
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        if self.not_enrolled.contains(&user) {
            return Err(ServiceError::UserNotEnrolled {
                user,
            });
        }
        Ok(self.completed.contains(&(section, user)))
    }
}

/// In-memory section names.
#[derive(Default)]
pub struct StubNames(pub HashMap<SectionId, String>);

impl StubNames {
    /// Builds a name table from `(section, name)` pairs.
    pub fn of(entries: &[(u64, &str)]) -> Self {
        Self(entries.iter().map(|&(id, name)| (SectionId::new(id), name.to_string())).collect())
    }
}

impl SectionNameService for StubNames {
    fn section_name(&self, section: SectionId) -> Result<String, ServiceError> {
        self.0
            .get(&section)
            .cloned()
            .ok_or_else(|| ServiceError::Storage(format!("no section {section}")))
    }
}

/// In-memory restore mapping.
#[derive(Default)]
pub struct StubTranslator {
    /// Old-to-new section ids.
    pub mapping: HashMap<SectionId, SectionId>,
    /// Failure returned for every lookup when set.
    pub failure: Option<ServiceError>,
}

impl StubTranslator {
    /// Builds a mapping from `(old, new)` pairs.
    pub fn of(entries: &[(u64, u64)]) -> Self {
        Self {
            mapping: entries
                .iter()
                .map(|&(old, new)| (SectionId::new(old), SectionId::new(new)))
                .collect(),
            failure: None,
        }
    }
}

impl BackupIdTranslator for StubTranslator {
    fn translate_backup_id(
        &self,
        _restore_id: &RestoreId,
        kind: BackupEntityKind,
        old: SectionId,
    ) -> Result<Option<SectionId>, ServiceError> {
        assert_eq!(kind, BackupEntityKind::CourseSection);
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        Ok(self.mapping.get(&old).copied())
    }
}

/// Audit sink that keeps every event in memory.
#[derive(Default)]
pub struct RecordingAuditSink {
    /// Recorded events in order.
    events: Mutex<Vec<ConditionAuditEvent>>,
}

impl RecordingAuditSink {
    /// Returns a copy of the recorded events.
    pub fn events(&self) -> Vec<ConditionAuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ConditionAuditSink for RecordingAuditSink {
    fn record(&self, event: &ConditionAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// ========================================================================
// Fixture
// ========================================================================

/// Owns one set of stub services.
pub struct Fixture {
    /// Completion lookups.
    pub completion: StubCompletion,
    /// Section names.
    pub names: StubNames,
    /// Built-in string catalog.
    pub strings: StringCatalog,
    /// Recorded audit events.
    pub audit: RecordingAuditSink,
}

impl Fixture {
    /// Creates a fixture around `completion` with the default names.
    pub fn new(completion: StubCompletion) -> Self {
        Self {
            completion,
            names: StubNames::of(&[(1, "Intro"), (2, "Basics"), (3, "Quiz")]),
            strings: StringCatalog::new(),
            audit: RecordingAuditSink::default(),
        }
    }

    /// Returns the services with the completion provider installed.
    pub fn services(&self) -> ConditionServices<'_> {
        self.services_with(DependencyState::Installed)
    }

    /// Returns the services with the given dependency state.
    pub fn services_with(&self, dependency: DependencyState) -> ConditionServices<'_> {
        ConditionServices {
            completion: &self.completion,
            names: &self.names,
            strings: &self.strings,
            dependency,
            audit: &self.audit,
        }
    }
}
