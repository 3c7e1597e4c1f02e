//! # Record Audit
//!
//! Re-derives a stored record with the engine and reports every stored total
//! that no longer matches, for the `workshop-recompute` binary.
//!
//! ## Audit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stored JSON ──► serde_json::Value ──┬──► PersistablePayload ──► Draft   │
//! │                                      │                          │       │
//! │                                      │                serialize()       │
//! │                                      ▼                          ▼       │
//! │                          stored row totals ◄── compare ──► recomputed   │
//! │                          stored summary                     payload     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exit codes: `0` clean (or not checked), `1` stale totals found, `2` error.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, warn};
use workshop_core::{BillingPolicy, Draft, InvoiceKind, Money, PersistablePayload};

use crate::error::SessionResult;

pub const EXIT_CLEAN: u8 = 0;
pub const EXIT_STALE: u8 = 1;
pub const EXIT_ERROR: u8 = 2;

/// Where the stored record is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// `None` and `"-"` mean stdin.
    pub fn from_arg(arg: Option<&Path>) -> Self {
        match arg {
            Some(path) if path.as_os_str() != "-" => InputSource::File(path.to_path_buf()),
            _ => InputSource::Stdin,
        }
    }

    pub fn read_to_string(&self) -> SessionResult<String> {
        match self {
            InputSource::File(path) => Ok(std::fs::read_to_string(path)?),
            InputSource::Stdin => {
                let mut raw = String::new();
                std::io::stdin().read_to_string(&mut raw)?;
                Ok(raw)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuditOptions {
    pub kind: InvoiceKind,
    pub policy: BillingPolicy,
    pub summary_only: bool,
}

/// One stored value that disagrees with the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// JSON path of the stored value, e.g. `labour_items[0].total`.
    pub path: String,
    pub stored: String,
    pub recomputed: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    pub mismatches: Vec<Mismatch>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Maps an audit result to the process exit code.
pub fn exit_code(result: &SessionResult<AuditReport>, check: bool) -> u8 {
    match result {
        Ok(report) if check && !report.is_clean() => EXIT_STALE,
        Ok(_) => EXIT_CLEAN,
        Err(_) => EXIT_ERROR,
    }
}

/// Recomputes the record read from `input` and writes the result to `out`.
///
/// The report is always filled; [`exit_code`] decides whether it fails the run.
pub fn run<R: Read, W: Write>(options: &AuditOptions, mut input: R, mut out: W) -> SessionResult<AuditReport> {
    let mut raw = String::new();
    input.read_to_string(&mut raw)?;

    let stored: Value = serde_json::from_str(&raw)?;
    let payload = PersistablePayload::from_json_value(stored.clone())?;
    let recomputed = Draft::from_payload(options.kind, &payload, options.policy.clone()).serialize();

    info!(
        kind = %options.kind,
        rows = recomputed.flat_rows().len(),
        gross_total = %recomputed.summary.gross_total,
        "Record recomputed"
    );

    let rendered = if options.summary_only {
        serde_json::to_string_pretty(&recomputed.summary)?
    } else {
        recomputed.to_json_string_pretty()?
    };
    writeln!(out, "{}", rendered)?;

    let report = compare(&stored, &recomputed)?;
    for mismatch in &report.mismatches {
        warn!(
            path = %mismatch.path,
            stored = %mismatch.stored,
            recomputed = %mismatch.recomputed,
            "Stored total does not match the engine"
        );
    }

    Ok(report)
}

/// Compares every derived value of `stored` with `recomputed`: each row
/// `total` and each field of the `summary` block.
pub fn compare(stored: &Value, recomputed: &PersistablePayload) -> SessionResult<AuditReport> {
    let fresh = recomputed.to_json_value()?;
    let mut mismatches = Vec::new();

    for list in ["labour_items", "spare_items"] {
        let stored_rows = rows(stored, list);
        for (index, row) in rows(&fresh, list).iter().enumerate() {
            check_money(
                &mut mismatches,
                format!("{}[{}].total", list, index),
                stored_rows.get(index).map(|r| &r["total"]),
                &row["total"],
            );
        }
    }

    for field in ["total", "totalVat", "grossTotal", "netPay"] {
        check_money(
            &mut mismatches,
            format!("summary.{}", field),
            Some(&stored["summary"][field]),
            &fresh["summary"][field],
        );
    }

    let stored_words = stored["summary"]["netPayInWords"].as_str().unwrap_or_default();
    if stored_words != recomputed.summary.net_pay_in_words {
        mismatches.push(Mismatch {
            path: "summary.netPayInWords".to_string(),
            stored: stored_words.to_string(),
            recomputed: recomputed.summary.net_pay_in_words.clone(),
        });
    }

    Ok(AuditReport { mismatches })
}

fn rows<'a>(record: &'a Value, list: &str) -> &'a [Value] {
    record[list].as_array().map(Vec::as_slice).unwrap_or(&[])
}

/// A missing stored value counts as stale.
fn check_money(mismatches: &mut Vec<Mismatch>, path: String, stored: Option<&Value>, fresh: &Value) {
    let expected = Money::from_json_lenient(fresh);
    let stale = match stored {
        Some(value) if !value.is_null() => Money::from_json_lenient(value) != expected,
        _ => true,
    };
    if stale {
        mismatches.push(Mismatch {
            path,
            stored: stored.map_or_else(|| "null".to_string(), Value::to_string),
            recomputed: expected.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(summary_only: bool) -> AuditOptions {
        AuditOptions {
            kind: InvoiceKind::Proforma,
            policy: BillingPolicy::default(),
            summary_only,
        }
    }

    fn fresh_record() -> Value {
        json!({
            "labour_items": [{ "description": "Tune-up", "unit": "hr", "est_time": 2, "cost": 200, "total": 400 }],
            "spare_items": [{ "description": "Pad", "qty": 3, "unit_price": 150, "total": 450 }],
            "other_costs": [],
            "labour_vat": true,
            "discount": 50,
            "other_cost": 0,
            "summary": {
                "total": 850,
                "totalVat": 60,
                "grossTotal": 860,
                "netPay": 860,
                "netPayInWords": "Eight Hundred Sixty Birr Only"
            }
        })
    }

    fn audit(record: &Value, summary_only: bool) -> (SessionResult<AuditReport>, String) {
        let mut out = Vec::new();
        let result = run(&options(summary_only), record.to_string().as_bytes(), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_matching_record_is_clean() {
        let (result, out) = audit(&fresh_record(), false);
        let report = result.unwrap();
        assert!(report.is_clean(), "{:?}", report);
        assert_eq!(exit_code(&Ok(report), true), EXIT_CLEAN);

        let printed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(printed["summary"]["grossTotal"], 860);
        assert_eq!(printed["labour_items"][0]["total"], 400);
    }

    #[test]
    fn test_stale_row_total_is_reported() {
        let mut record = fresh_record();
        record["labour_items"][0]["total"] = json!(999);

        let (result, _) = audit(&record, false);
        let report = result.unwrap();
        assert_eq!(
            report.mismatches,
            vec![Mismatch {
                path: "labour_items[0].total".to_string(),
                stored: "999".to_string(),
                recomputed: "400.00".to_string(),
            }]
        );
        assert_eq!(exit_code(&Ok(report.clone()), true), EXIT_STALE);
        assert_eq!(exit_code(&Ok(report), false), EXIT_CLEAN);
    }

    #[test]
    fn test_stale_summary_is_reported() {
        let mut record = fresh_record();
        record["summary"]["grossTotal"] = json!(1);
        record["summary"]["netPayInWords"] = json!("One Birr Only");

        let report = audit(&record, false).0.unwrap();
        let paths: Vec<_> = report.mismatches.iter().map(|m| m.path.as_str()).collect();
        assert_eq!(paths, vec!["summary.grossTotal", "summary.netPayInWords"]);
    }

    #[test]
    fn test_missing_totals_are_stale() {
        let mut record = fresh_record();
        record["spare_items"][0].as_object_mut().unwrap().remove("total");

        let report = audit(&record, false).0.unwrap();
        assert_eq!(report.mismatches.len(), 1);
        assert_eq!(report.mismatches[0].path, "spare_items[0].total");
    }

    #[test]
    fn test_string_amounts_are_not_stale() {
        let mut record = fresh_record();
        record["labour_items"][0]["total"] = json!("400.00");
        assert!(audit(&record, false).0.unwrap().is_clean());
    }

    #[test]
    fn test_summary_only_output() {
        let (result, out) = audit(&fresh_record(), true);
        assert!(result.is_ok());

        let printed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(printed["grossTotal"], 860);
        assert!(printed.get("labour_items").is_none());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let mut out = Vec::new();
        let result = run(&options(false), "{ not json".as_bytes(), &mut out);
        assert!(result.is_err());
        assert_eq!(exit_code(&result, true), EXIT_ERROR);
        assert!(out.is_empty());

        let result = run(&options(false), "[1, 2]".as_bytes(), &mut out);
        assert_eq!(exit_code(&result, false), EXIT_ERROR);
    }

    #[test]
    fn test_input_source_from_arg() {
        assert_eq!(InputSource::from_arg(None), InputSource::Stdin);
        assert_eq!(InputSource::from_arg(Some(Path::new("-"))), InputSource::Stdin);
        assert_eq!(
            InputSource::from_arg(Some(Path::new("record.json"))),
            InputSource::File(PathBuf::from("record.json"))
        );
    }

    #[test]
    fn test_file_input_is_read() {
        let path = std::env::temp_dir().join(format!("workshop-audit-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, fresh_record().to_string()).unwrap();

        let raw = InputSource::File(path.clone()).read_to_string().unwrap();
        let report = run(&options(false), raw.as_bytes(), Vec::new()).unwrap();
        assert!(report.is_clean());

        let _ = std::fs::remove_file(path);
    }
}
