use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
    Warn,
}

impl CheckStatus {
    pub fn pass_or(ok: bool, otherwise: CheckStatus) -> Self {
        if ok { Self::Pass } else { otherwise }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub id: String,
    pub label: String,
    pub status: CheckStatus,
    pub detail: String,
}

impl CheckResult {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        status: CheckStatus,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            status,
            detail: detail.into(),
        }
    }

    /// Pass with `pass_detail` when `ok`, otherwise `status` with `issue_detail`.
    pub fn gate(
        id: impl Into<String>,
        label: impl Into<String>,
        ok: bool,
        status: CheckStatus,
        pass_detail: impl Into<String>,
        issue_detail: impl Into<String>,
    ) -> Self {
        if ok {
            Self::new(id, label, CheckStatus::Pass, pass_detail)
        } else {
            Self::new(id, label, status, issue_detail)
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManualVerdict {
    Pass,
    Fail,
    Na,
    #[default]
    #[serde(alias = "")]
    Unset,
}

impl ManualVerdict {
    pub fn report_glyph(self) -> &'static str {
        match self {
            Self::Pass => "[PASS]",
            Self::Fail => "[FAIL]",
            Self::Na => "[N/A]",
            Self::Unset => "[ ]",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsDocument {
    #[serde(rename = "lastRun", default)]
    pub last_run: Option<String>,
    #[serde(default)]
    pub sections: BTreeMap<String, Vec<CheckResult>>,
    #[serde(default)]
    pub manual: BTreeMap<String, ManualVerdict>,
}

impl ResultsDocument {
    pub fn section(&self, section_id: &str) -> &[CheckResult] {
        self.sections
            .get(section_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn totals(&self) -> StatusTotals {
        let mut totals = StatusTotals::default();
        for check in self.sections.values().flatten() {
            totals.record(check.status);
        }
        totals
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusTotals {
    pub pass: usize,
    pub fail: usize,
    pub warn: usize,
}

impl StatusTotals {
    pub fn record(&mut self, status: CheckStatus) {
        match status {
            CheckStatus::Pass => self.pass += 1,
            CheckStatus::Fail => self.fail += 1,
            CheckStatus::Warn => self.warn += 1,
        }
    }

    pub fn of(checks: &[CheckResult]) -> Self {
        let mut totals = Self::default();
        for check in checks {
            totals.record(check.status);
        }
        totals
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum ReportFilter {
    #[default]
    All,
    Fail,
    Warn,
    Issues,
}

impl ReportFilter {
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "Full Report",
            Self::Fail => "Failures Only",
            Self::Warn => "Warnings Only",
            Self::Issues => "Failures + Warnings",
        }
    }

    pub fn includes(self, status: Option<CheckStatus>) -> bool {
        match self {
            Self::All => true,
            Self::Fail => status == Some(CheckStatus::Fail),
            Self::Warn => status == Some(CheckStatus::Warn),
            Self::Issues => matches!(status, Some(CheckStatus::Fail | CheckStatus::Warn)),
        }
    }
}

impl FromStr for ReportFilter {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "fail" => Ok(Self::Fail),
            "warn" => Ok(Self::Warn),
            "issues" => Ok(Self::Issues),
            other => bail!("unknown report filter '{other}' (expected all, fail, warn or issues)"),
        }
    }
}

impl fmt::Display for ReportFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::All => "all",
            Self::Fail => "fail",
            Self::Warn => "warn",
            Self::Issues => "issues",
        };
        f.write_str(value)
    }
}
