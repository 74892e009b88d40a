// crates/adler-condition/src/lib.rs
// ============================================================================
// Module: Adler Condition Root
// Description: Public API surface for the adler availability condition.
// Purpose: Wire together the condition, its host services, and ambient support.
// Dependencies: crate::{audit, condition, config, describe, error, i18n, interfaces, restore}
// ============================================================================

//! ## Overview
//! `adler-condition` gates a course section on the completion of other
//! sections. An [`AdlerCondition`] wraps a validated formula from
//! `adler-logic` and answers availability, description, and restore queries
//! through the host services bundled in [`ConditionServices`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod condition;
pub mod config;
pub mod describe;
pub mod error;
pub mod i18n;
pub mod interfaces;
pub mod restore;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditLevel;
pub use audit::ConditionAuditEvent;
pub use audit::ConditionAuditSink;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use condition::AdlerCondition;
pub use condition::CONDITION_TYPE;
pub use condition::ConditionScope;
pub use condition::ConditionStructure;
pub use config::AdlerConfig;
pub use config::AuditSinkKind;
pub use config::ConfigError;
pub use describe::escape_html;
pub use describe::render_formula;
pub use error::ConditionError;
pub use i18n::COMPONENT;
pub use i18n::MessageArg;
pub use i18n::StringCatalog;
pub use interfaces::BackupEntityKind;
pub use interfaces::BackupIdTranslator;
pub use interfaces::CompletionResolver;
pub use interfaces::CompletionService;
pub use interfaces::ConditionServices;
pub use interfaces::DependencyState;
pub use interfaces::RestoreId;
pub use interfaces::SectionNameService;
pub use interfaces::ServiceError;
pub use interfaces::StringLookup;
pub use restore::RemapOutcome;
pub use restore::remap_formula;
