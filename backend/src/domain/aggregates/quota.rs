//! Threshold checks: shift totals, hourly shortfalls and call-outs.

use serde::Serialize;

use super::{Diagnostics, Total, sum_values};
use crate::domain::records::{HOURS_PER_SHIFT, QuotaEntry, QuotaSheet, Shift};

/// Pieces produced across a shift's rows.
#[must_use]
pub fn shift_total(sheet: &QuotaSheet, shift: Shift) -> Total {
    sum_values(sheet.rows(shift).iter().map(|entry| &entry.total))
}

/// Hour slots that fell below the hourly share of an unmet quota.
///
/// Returns nothing when the quota is unreadable or was met. Blank cells are
/// hours not entered yet and are never flagged.
#[must_use]
pub fn hourly_shortfalls(entry: &QuotaEntry) -> Vec<usize> {
    let Some(quota) = entry.quota.value() else {
        return Vec::new();
    };
    if entry.hourly_sum() >= quota {
        return Vec::new();
    }
    #[expect(
        clippy::cast_precision_loss,
        reason = "the shift length is a small constant"
    )]
    let share = quota / HOURS_PER_SHIFT as f64;
    entry
        .times
        .iter()
        .enumerate()
        .filter_map(|(hour, cell)| cell.value().filter(|value| *value < share).map(|_| hour))
        .collect()
}

/// Records whose actual value is below the required one.
///
/// Records where either side is missing or non-numeric are skipped.
#[must_use]
pub fn under_quota<'a, T>(
    records: impl IntoIterator<Item = &'a T>,
    actual: impl Fn(&T) -> Option<f64>,
    required: impl Fn(&T) -> Option<f64>,
) -> (Vec<&'a T>, Diagnostics)
where
    T: 'a,
{
    let mut diagnostics = Diagnostics::default();
    let mut flagged = Vec::new();
    for record in records {
        let pair = actual(record).zip(required(record));
        diagnostics.record(pair.is_some());
        if let Some((actual, required)) = pair
            && actual < required
        {
            flagged.push(record);
        }
    }
    (flagged, diagnostics)
}

/// An operator to call out for missing quota.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Callout {
    /// Operator name.
    pub name: String,
    /// Production date of the row.
    pub date: String,
    /// Shift of the row.
    pub shift: Shift,
    /// Required pieces.
    pub quota: f64,
    /// Produced pieces.
    pub actual: f64,
}

/// Call-outs with diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CalloutReport {
    /// Rows under quota whose operator is not yet on the done roster.
    pub callouts: Vec<Callout>,
    /// Usage counts.
    pub diagnostics: Diagnostics,
}

/// Rows under quota on both shifts, excluding operators in `done`.
#[must_use]
pub fn callouts(sheet: &QuotaSheet, done: &[String]) -> CalloutReport {
    let entries: Vec<(Shift, &QuotaEntry)> = sheet.entries().collect();
    let (flagged, diagnostics) = under_quota(
        &entries,
        |(_, entry)| entry.total.value(),
        |(_, entry)| entry.quota.value(),
    );
    let callouts = flagged
        .into_iter()
        .filter(|(_, entry)| !done.iter().any(|name| *name == entry.operator))
        .map(|(shift, entry)| Callout {
            name: entry.operator.clone(),
            date: entry.date.clone(),
            shift: *shift,
            quota: entry.quota.value().unwrap_or_default(),
            actual: entry.total.value().unwrap_or_default(),
        })
        .collect();
    CalloutReport {
        callouts,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LooseNumber;
    use rstest::{fixture, rstest};

    fn row(operator: &str, quota: &str, hours: &[&str]) -> QuotaEntry {
        let mut entry = QuotaEntry {
            date: "2024-06-03".to_owned(),
            operator: operator.to_owned(),
            quota: LooseNumber::text(quota),
            times: hours.iter().map(|hour| LooseNumber::text(*hour)).collect(),
            ..QuotaEntry::default()
        };
        entry.normalise();
        entry
    }

    #[fixture]
    fn sheet() -> QuotaSheet {
        QuotaSheet {
            shift1: vec![
                row("Mila", "80", &["10", "10", "10", "10", "10", "10", "10", "10"]),
                row("Odin", "80", &["10", "4", "10", "10"]),
            ],
            shift2: vec![row("Pia", "", &["1"]), row("Quin", "40", &["5", "5"])],
        }
    }

    #[rstest]
    fn shift_totals_add_row_totals(sheet: QuotaSheet) {
        let total = shift_total(&sheet, Shift::First);
        assert!((total.amount - 114.0).abs() < f64::EPSILON);
        assert_eq!(total.diagnostics.considered, 2);
    }

    #[rstest]
    fn shortfalls_flag_entered_hours_below_share(sheet: QuotaSheet) {
        assert_eq!(hourly_shortfalls(&sheet.shift1[1]), [1]);
        assert!(hourly_shortfalls(&sheet.shift1[0]).is_empty());
        assert!(hourly_shortfalls(&sheet.shift2[0]).is_empty());
    }

    #[rstest]
    fn callouts_skip_met_quotas_and_unreadable_rows(sheet: QuotaSheet) {
        let report = callouts(&sheet, &[]);
        let names: Vec<_> = report.callouts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Odin", "Quin"]);
        assert_eq!(report.callouts[1].shift, Shift::Second);
        assert!((report.callouts[0].actual - 34.0).abs() < f64::EPSILON);
        assert_eq!(report.diagnostics.skipped, 1);
    }

    #[rstest]
    fn done_operators_are_not_called_out_again(sheet: QuotaSheet) {
        let report = callouts(&sheet, &["Odin".to_owned()]);
        let names: Vec<_> = report.callouts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Quin"]);
    }

    #[rstest]
    #[case(9.0, 10.0, true)]
    #[case(10.0, 10.0, false)]
    #[case(11.0, 10.0, false)]
    fn under_quota_is_strictly_below(#[case] actual: f64, #[case] required: f64, #[case] flagged: bool) {
        let records = [(actual, required)];
        let (found, diagnostics) = under_quota(&records, |r| Some(r.0), |r| Some(r.1));
        assert_eq!(!found.is_empty(), flagged);
        assert_eq!(diagnostics.considered, 1);
    }
}
