// crates/adler-condition/src/audit.rs
// ============================================================================
// Module: Condition Audit Logging
// Description: Structured audit events for availability conditions.
// Purpose: Emit JSON-lines log records without a hard logging dependency.
// Dependencies: adler-logic, serde, serde_json, crate::{condition, interfaces}
// ============================================================================

//! ## Overview
//! Conditions report noteworthy decisions (fail-open availability, restore
//! remapping) as [`ConditionAuditEvent`] values. Deployments pick a sink:
//! stderr, an append-only file, or nothing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use adler_logic::SectionId;
use adler_logic::UserId;
use serde::Serialize;

use crate::condition::ConditionScope;
use crate::i18n::COMPONENT;
use crate::interfaces::RestoreId;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Severity of an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditLevel {
    /// Routine state change.
    Info,
    /// Degraded but handled situation.
    Warning,
    /// Operation failed.
    Error,
}

/// Condition audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Event severity.
    pub level: AuditLevel,
    /// Emitting component.
    pub component: &'static str,
    /// Condition variant.
    pub scope: ConditionScope,
    /// Formula at the time of the event.
    pub formula: String,
    /// User the condition was evaluated for, if any.
    pub user_id: Option<UserId>,
    /// Restore session, if any.
    pub restore_id: Option<RestoreId>,
    /// Section the event is about, if any.
    pub section_id: Option<SectionId>,
    /// Human-readable summary.
    pub message: String,
}

/// Inputs required to construct an audit event.
pub struct ConditionAuditEventParams {
    /// Event identifier.
    pub event: &'static str,
    /// Event severity.
    pub level: AuditLevel,
    /// Condition variant.
    pub scope: ConditionScope,
    /// Formula at the time of the event.
    pub formula: String,
    /// User the condition was evaluated for, if any.
    pub user_id: Option<UserId>,
    /// Restore session, if any.
    pub restore_id: Option<RestoreId>,
    /// Section the event is about, if any.
    pub section_id: Option<SectionId>,
    /// Human-readable summary.
    pub message: String,
}

impl ConditionAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: ConditionAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: params.event,
            timestamp_ms,
            level: params.level,
            component: COMPONENT,
            scope: params.scope,
            formula: params.formula,
            user_id: params.user_id,
            restore_id: params.restore_id,
            section_id: params.section_id,
            message: params.message,
        }
    }

    /// Availability was granted because the completion provider is absent.
    #[must_use]
    pub fn dependency_missing(scope: ConditionScope, formula: &str, user: UserId) -> Self {
        Self::new(ConditionAuditEventParams {
            event: "dependency_missing",
            level: AuditLevel::Warning,
            scope,
            formula: formula.to_string(),
            user_id: Some(user),
            restore_id: None,
            section_id: None,
            message: "local_adler is not available".to_string(),
        })
    }

    /// Formula ids were rewritten after a restore.
    #[must_use]
    pub fn restore_remapped(
        scope: ConditionScope,
        old_formula: &str,
        new_formula: &str,
        restore_id: &RestoreId,
    ) -> Self {
        Self::new(ConditionAuditEventParams {
            event: "restore_remapped",
            level: AuditLevel::Info,
            scope,
            formula: new_formula.to_string(),
            user_id: None,
            restore_id: Some(restore_id.clone()),
            section_id: None,
            message: format!("condition remapped from `{old_formula}`"),
        })
    }

    /// A referenced section has no counterpart in the restored course.
    #[must_use]
    pub fn restore_unknown_section(
        scope: ConditionScope,
        formula: &str,
        restore_id: &RestoreId,
        section: SectionId,
    ) -> Self {
        Self::new(ConditionAuditEventParams {
            event: "restore_unknown_section",
            level: AuditLevel::Error,
            scope,
            formula: formula.to_string(),
            user_id: None,
            restore_id: Some(restore_id.clone()),
            section_id: Some(section),
            message: format!("section {section} was not restored"),
        })
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for condition events.
pub trait ConditionAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &ConditionAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl ConditionAuditSink for StderrAuditSink {
    fn record(&self, event: &ConditionAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ConditionAuditSink for FileAuditSink {
    fn record(&self, event: &ConditionAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl ConditionAuditSink for NoopAuditSink {
    fn record(&self, _event: &ConditionAuditEvent) {}
}
