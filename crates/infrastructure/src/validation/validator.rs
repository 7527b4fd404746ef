//! Ordered registry of startup checks

use std::{collections::BTreeMap, fmt};

use serde::Serialize;

use super::{
    checks::{
        INTEGER_CHECK, OIDC_CHECK, REQUIRED_CHECK, SOFT_DELETE_CHECK, check_integer_settings,
        check_oidc_providers, check_required_settings, check_soft_delete_retention,
    },
    finding::{Finding, Severity},
};
use crate::{config::AppConfig, env::EnvSnapshot};

/// Signature shared by all startup checks
pub type CheckFn = fn(&EnvSnapshot, &AppConfig) -> Vec<Finding>;

/// Runs registered checks in registration order
#[derive(Debug, Clone, Default)]
pub struct StartupValidator {
    checks: Vec<(&'static str, CheckFn)>,
}

impl StartupValidator {
    /// Validator without any checks
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard checks: required, integer, soft-delete retention, OIDC
    #[must_use]
    pub fn standard() -> Self {
        Self::empty()
            .with_check(REQUIRED_CHECK, check_required_settings)
            .with_check(INTEGER_CHECK, check_integer_settings)
            .with_check(SOFT_DELETE_CHECK, check_soft_delete_retention)
            .with_check(OIDC_CHECK, check_oidc_providers)
    }

    /// Append a check
    #[must_use]
    pub fn with_check(mut self, name: &'static str, check: CheckFn) -> Self {
        self.checks.push((name, check));
        self
    }

    /// Names of the registered checks, in run order
    pub fn check_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.checks.iter().map(|(name, _)| *name)
    }

    /// Run every check and concatenate the findings
    #[must_use]
    pub fn validate(&self, env: &EnvSnapshot, config: &AppConfig) -> Vec<Finding> {
        self.checks
            .iter()
            .flat_map(|(_, check)| check(env, config))
            .collect()
    }

    /// Whether any finding should prevent startup
    #[must_use]
    pub fn has_blocking(findings: &[Finding]) -> bool {
        findings.iter().any(Finding::is_blocking)
    }

    /// Log all findings using tracing
    pub fn log_findings(findings: &[Finding]) {
        for finding in findings {
            let variable = finding.variable.as_deref().unwrap_or("-");
            match finding.severity {
                Severity::Error | Severity::Critical => {
                    tracing::error!(
                        code = %finding.code,
                        check = finding.check,
                        variable,
                        message = %finding.message,
                        hint = %finding.hint,
                        "Configuration error"
                    );
                },
                Severity::Warning => {
                    tracing::warn!(
                        code = %finding.code,
                        check = finding.check,
                        variable,
                        message = %finding.message,
                        hint = %finding.hint,
                        "Configuration warning"
                    );
                },
                Severity::Info => {
                    tracing::info!(
                        code = %finding.code,
                        message = %finding.message,
                        "Configuration notice"
                    );
                },
                Severity::Debug => {
                    tracing::debug!(
                        code = %finding.code,
                        message = %finding.message,
                        "Configuration detail"
                    );
                },
            }
        }
    }
}

/// Findings with a per-severity summary, for operators and the CLI
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub findings: Vec<Finding>,
    pub counts: BTreeMap<Severity, usize>,
    pub blocking: bool,
}

impl CheckReport {
    /// Build a report over a set of findings
    #[must_use]
    pub fn new(findings: Vec<Finding>) -> Self {
        let mut counts = BTreeMap::new();
        for finding in &findings {
            *counts.entry(finding.severity).or_insert(0) += 1;
        }
        let blocking = StartupValidator::has_blocking(&findings);
        Self {
            findings,
            counts,
            blocking,
        }
    }

    /// Number of findings at `severity`
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.counts.get(&severity).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.findings.is_empty() {
            return writeln!(f, "No configuration issues found.");
        }
        for finding in &self.findings {
            writeln!(f, "{finding}")?;
        }
        let summary: Vec<String> = self
            .counts
            .iter()
            .rev()
            .map(|(severity, count)| format!("{count} {}", severity.to_string().to_lowercase()))
            .collect();
        writeln!(f, "{} issue(s): {}", self.findings.len(), summary.join(", "))?;
        if self.blocking {
            writeln!(f, "Startup would be refused.")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::codes;

    fn env(pairs: &[(&str, &str)]) -> EnvSnapshot {
        EnvSnapshot::from_pairs(pairs.iter().copied())
    }

    fn resolved(snapshot: &EnvSnapshot) -> AppConfig {
        let mut config = AppConfig::default();
        config.apply_raw_variables(snapshot);
        config
    }

    #[test]
    fn standard_registers_checks_in_order() {
        let names: Vec<_> = StartupValidator::standard().check_names().collect();
        assert_eq!(
            names,
            vec![
                "required_settings",
                "integer_settings",
                "soft_delete_retention",
                "oidc_providers",
            ]
        );
    }

    #[test]
    fn end_to_end_reports_missing_then_malformed() {
        let snapshot = env(&[("SECRET_KEY", "x"), ("SQL_DATABASE", ""), ("TASK_WORKERS", "4a")]);
        let findings = StartupValidator::standard().validate(&snapshot, &resolved(&snapshot));

        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].code, codes::MISSING_REQUIRED);
        assert_eq!(findings[0].variable.as_deref(), Some("SQL_DATABASE"));
        assert_eq!(findings[1].code, codes::INVALID_INTEGER);
        assert_eq!(findings[1].variable.as_deref(), Some("TASK_WORKERS"));
        assert!(findings[1].message.contains("'4a'"));
        assert!(StartupValidator::has_blocking(&findings));
    }

    #[test]
    fn malformed_port_blocks_startup() {
        let snapshot = env(&[
            ("SECRET_KEY", "k"),
            ("SQL_DATABASE", "spendbook.db"),
            ("INTERNAL_PORT", "80 80"),
        ]);
        let findings = StartupValidator::standard().validate(&snapshot, &resolved(&snapshot));

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, codes::INVALID_INTEGER);
        assert_eq!(findings[0].variable.as_deref(), Some("INTERNAL_PORT"));
        assert_eq!(
            findings[0].message,
            "variable 'INTERNAL_PORT' must be a valid integer, got '80 80'"
        );
        assert!(StartupValidator::has_blocking(&findings));
    }

    #[test]
    fn complete_environment_passes() {
        let snapshot = env(&[
            ("SECRET_KEY", "k"),
            ("SQL_DATABASE", "spendbook.db"),
            ("TASK_WORKERS", "2"),
            ("ENABLE_SOFT_DELETE", "true"),
            ("KEEP_DELETED_TRANSACTIONS_FOR", "0"),
        ]);
        let findings = StartupValidator::standard().validate(&snapshot, &resolved(&snapshot));
        assert!(findings.is_empty());
        assert!(!StartupValidator::has_blocking(&findings));
    }

    #[test]
    fn validation_is_idempotent() {
        let snapshot = env(&[
            ("TASK_WORKERS", "x"),
            ("ENABLE_SOFT_DELETE", "true"),
            ("KEEP_DELETED_TRANSACTIONS_FOR", "y"),
            ("OIDC_ONLY", "true"),
        ]);
        let config = resolved(&snapshot);
        let validator = StartupValidator::standard();
        assert_eq!(
            validator.validate(&snapshot, &config),
            validator.validate(&snapshot, &config)
        );
    }

    #[test]
    fn all_four_codes_in_registered_order() {
        let snapshot = env(&[
            ("TASK_WORKERS", "x"),
            ("ENABLE_SOFT_DELETE", "true"),
            ("KEEP_DELETED_TRANSACTIONS_FOR", "y"),
            ("OIDC_ONLY", "true"),
        ]);
        let findings = StartupValidator::standard().validate(&snapshot, &resolved(&snapshot));
        let found: Vec<_> = findings.iter().map(|f| f.code).collect();
        assert_eq!(
            found,
            vec!["APP.E001", "APP.E001", "APP.E002", "APP.E003", "APP.E004"]
        );
    }

    #[test]
    fn custom_checks_run_after_registration() {
        fn warn_always(_: &EnvSnapshot, _: &AppConfig) -> Vec<Finding> {
            let mut finding = Finding::error("custom", "APP.W001", "heads up", "none");
            finding.severity = Severity::Warning;
            vec![finding]
        }
        let validator = StartupValidator::empty().with_check("custom", warn_always);
        let findings = validator.validate(&EnvSnapshot::default(), &AppConfig::default());
        assert_eq!(findings.len(), 1);
        assert!(!StartupValidator::has_blocking(&findings));
    }

    #[test]
    fn report_counts_and_display() {
        let snapshot = env(&[("SECRET_KEY", "x")]);
        let report =
            CheckReport::new(StartupValidator::standard().validate(&snapshot, &resolved(&snapshot)));
        assert_eq!(report.count(Severity::Error), 1);
        assert_eq!(report.count(Severity::Warning), 0);
        assert!(report.blocking);

        let text = report.to_string();
        assert!(text.contains("APP.E001"));
        assert!(text.contains("1 issue(s): 1 error"));
        assert!(text.contains("Startup would be refused."));
    }

    #[test]
    fn empty_report_is_clean() {
        let report = CheckReport::new(Vec::new());
        assert!(report.is_clean());
        assert!(!report.blocking);
        assert_eq!(report.to_string(), "No configuration issues found.\n");
    }

    #[test]
    fn report_serializes_counts_by_severity() {
        let report = CheckReport::new(StartupValidator::standard().validate(
            &EnvSnapshot::default(),
            &AppConfig::default(),
        ));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["counts"]["error"], 2);
        assert_eq!(json["blocking"], true);
    }
}
