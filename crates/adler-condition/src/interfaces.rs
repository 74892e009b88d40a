// crates/adler-condition/src/interfaces.rs
// ============================================================================
// Module: Host Service Interfaces
// Description: Narrow contracts for the services an availability condition calls.
// Purpose: Keep completion, naming, localization, and restore lookups injectable.
// Dependencies: adler-logic, serde, thiserror, crate::{audit, i18n}
// ============================================================================

//! ## Overview
//! The condition never reaches into a host framework directly. Everything it
//! needs from the outside arrives through the traits below, bundled per call
//! in [`ConditionServices`]. Implementations may block; this crate adds no
//! retries or timeouts and propagates every failure except "user not enrolled",
//! which [`CompletionResolver`] maps to an unsatisfied atom.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use adler_logic::AtomResolver;
use adler_logic::SectionId;
use adler_logic::UserId;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::audit::ConditionAuditSink;
use crate::i18n::MessageArg;

// ============================================================================
// SECTION: Identifiers
// ============================================================================

/// Identifier of one restore session in the host backup system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestoreId(String);

impl RestoreId {
    /// Creates a new restore identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RestoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for RestoreId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Entity kind used when translating backup ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupEntityKind {
    /// A course section.
    CourseSection,
}

impl BackupEntityKind {
    /// Returns the host's name for this entity kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CourseSection => "course_section",
        }
    }
}

// ============================================================================
// SECTION: Service Errors
// ============================================================================

/// Failures reported by host services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The user is not enrolled in the course owning the section.
    #[error("user {user} is not enrolled")]
    UserNotEnrolled {
        /// User that was looked up.
        user: UserId,
    },
    /// The service could not answer.
    #[error("service unavailable: {0}")]
    Unavailable(String),
    /// The backing store failed.
    #[error("storage error: {0}")]
    Storage(String),
}

// ============================================================================
// SECTION: Service Traits
// ============================================================================

/// Completion-status lookup for sections.
pub trait CompletionService {
    /// Returns whether `user` has completed `section`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::UserNotEnrolled`] when the user is not part of
    /// the course, or another [`ServiceError`] when the lookup fails.
    fn is_section_completed(&self, section: SectionId, user: UserId)
    -> Result<bool, ServiceError>;
}

/// Display-name lookup for sections.
pub trait SectionNameService {
    /// Returns the display name of `section`, unescaped.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the section cannot be looked up.
    fn section_name(&self, section: SectionId) -> Result<String, ServiceError>;
}

/// Localized string lookup.
pub trait StringLookup {
    /// Returns the string `key` from the catalog of `component` with `args`
    /// substituted.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the key or component is unknown.
    fn get_string(
        &self,
        key: &str,
        component: &str,
        args: &[MessageArg],
    ) -> Result<String, ServiceError>;
}

/// Old-to-new id translation during a restore.
pub trait BackupIdTranslator {
    /// Returns the new id of `old` in the restored course, or `None` when the
    /// entity was not part of the restore.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the mapping table cannot be read.
    fn translate_backup_id(
        &self,
        restore_id: &RestoreId,
        kind: BackupEntityKind,
        old: SectionId,
    ) -> Result<Option<SectionId>, ServiceError>;
}

// ============================================================================
// SECTION: Dependency State
// ============================================================================

/// Presence of the plugin that answers completion lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyState {
    /// The completion provider is installed.
    Installed,
    /// The completion provider is absent; availability fails open.
    Missing,
}

impl DependencyState {
    /// Maps an "is installed" flag to a state.
    #[must_use]
    pub const fn from_installed(installed: bool) -> Self {
        if installed { Self::Installed } else { Self::Missing }
    }

    /// Returns `true` when the provider is installed.
    #[must_use]
    pub const fn is_installed(self) -> bool {
        matches!(self, Self::Installed)
    }
}

// ============================================================================
// SECTION: Service Bundle
// ============================================================================

/// Services used by availability checks and descriptions.
#[derive(Clone, Copy)]
pub struct ConditionServices<'a> {
    /// Completion-status lookup.
    pub completion: &'a dyn CompletionService,
    /// Section display names.
    pub names: &'a dyn SectionNameService,
    /// Localized strings.
    pub strings: &'a dyn StringLookup,
    /// Whether the completion provider is installed.
    pub dependency: DependencyState,
    /// Sink for condition audit events.
    pub audit: &'a dyn ConditionAuditSink,
}

// ============================================================================
// SECTION: Completion Resolver
// ============================================================================

/// Resolves formula atoms through a [`CompletionService`].
///
/// A user who is not enrolled fails the atom instead of failing the request.
#[derive(Clone, Copy)]
pub struct CompletionResolver<'a> {
    /// Underlying completion lookup.
    service: &'a dyn CompletionService,
}

impl<'a> CompletionResolver<'a> {
    /// Wraps a completion service.
    #[must_use]
    pub const fn new(service: &'a dyn CompletionService) -> Self {
        Self {
            service,
        }
    }
}

impl AtomResolver for CompletionResolver<'_> {
    type Error = ServiceError;

    fn resolve(&self, section: SectionId, user: UserId) -> Result<bool, Self::Error> {
        match self.service.is_section_completed(section, user) {
            Err(ServiceError::UserNotEnrolled {
                ..
            }) => Ok(false),
            other => other,
        }
    }
}
