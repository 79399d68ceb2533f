//! CSV export of result tables
//!
//! Monetary columns are rounded to cents on the way out; the in-memory results
//! keep full precision.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::bonds::BondValuation;
use crate::growth::{round_cents, GrowthResult};
use crate::profile::{ProfileProjection, RiskProfile};
use crate::retirement::PensionScenario;

#[derive(Debug, Serialize)]
struct ScenarioRow {
    annual_withdrawal_rate: f64,
    pension_years: u32,
    monthly_pension: f64,
}

#[derive(Debug, Serialize)]
struct BondRow {
    period: u32,
    cash_flow: f64,
    present_value: f64,
}

#[derive(Debug, Serialize)]
struct ProjectionRow {
    profile: RiskProfile,
    annual_return: f64,
    age: u32,
    patrimony: f64,
}

fn write_rows<W: Write, T: Serialize>(writer: W, rows: impl IntoIterator<Item = T>) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// One row per period: period, opening_balance, contribution, interest, closing_balance
pub fn write_growth<W: Write>(writer: W, result: &GrowthResult) -> csv::Result<()> {
    write_rows(writer, result.rounded_records())
}

pub fn write_scenarios<W: Write>(writer: W, scenarios: &[PensionScenario]) -> csv::Result<()> {
    write_rows(
        writer,
        scenarios.iter().map(|s| ScenarioRow {
            annual_withdrawal_rate: s.annual_withdrawal_rate,
            pension_years: s.pension_years,
            monthly_pension: round_cents(s.monthly_pension),
        }),
    )
}

pub fn write_bond<W: Write>(writer: W, valuation: &BondValuation) -> csv::Result<()> {
    write_rows(
        writer,
        valuation.cash_flows.iter().map(|f| BondRow {
            period: f.period,
            cash_flow: round_cents(f.cash_flow),
            present_value: round_cents(f.present_value),
        }),
    )
}

/// Long format: one row per profile and checkpoint
pub fn write_projections<W: Write>(
    writer: W,
    projections: &BTreeMap<RiskProfile, ProfileProjection>,
) -> csv::Result<()> {
    write_rows(
        writer,
        projections.iter().flat_map(|(profile, projection)| {
            projection.points.iter().map(move |p| ProjectionRow {
                profile: *profile,
                annual_return: projection.annual_return,
                age: p.age,
                patrimony: round_cents(p.patrimony),
            })
        }),
    )
}

/// Create `path` and hand a buffered file to `write`
pub fn to_path<F>(path: &Path, write: F) -> csv::Result<()>
where
    F: FnOnce(std::io::BufWriter<std::fs::File>) -> csv::Result<()>,
{
    let file = std::fs::File::create(path)?;
    write(std::io::BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonds::value_bond;
    use crate::growth::simulate_growth;
    use crate::profile::project;
    use crate::rates::RateFrequency;
    use crate::retirement::compute_scenarios;

    fn to_string(f: impl FnOnce(&mut Vec<u8>) -> csv::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_growth_csv_is_rounded() {
        let growth = simulate_growth(1_000.0, 100.0, RateFrequency::Monthly, 0.1, 1).unwrap();
        let text = to_string(|buf| write_growth(buf, &growth));
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("period,opening_balance,contribution,interest,closing_balance")
        );
        assert_eq!(text.lines().count(), 13);
        // Every monetary field has at most two decimals
        for line in text.lines().skip(1) {
            for field in line.split(',').skip(1) {
                let decimals = field.split('.').nth(1).map_or(0, str::len);
                assert!(decimals <= 2, "{}", line);
            }
        }
    }

    #[test]
    fn test_scenarios_and_bond_tables() {
        let scenarios = compute_scenarios(100_000.0, &[0.04, 0.06], &[20]).unwrap();
        let text = to_string(|buf| write_scenarios(buf, &scenarios));
        assert!(text.starts_with("annual_withdrawal_rate,pension_years,monthly_pension\n"));
        assert_eq!(text.lines().count(), 3);

        let bond = value_bond(1_000.0, 0.06, RateFrequency::Semiannual, 2, 0.06).unwrap();
        let text = to_string(|buf| write_bond(buf, &bond));
        assert_eq!(text.lines().count(), 5);
        assert!(text.lines().last().unwrap().starts_with("4,1030.0,"));
    }

    #[test]
    fn test_projection_long_format() {
        let projections = project(30, 10, 1_000.0, 100.0);
        let text = to_string(|buf| write_projections(buf, &projections));
        assert!(text.starts_with("profile,annual_return,age,patrimony\n"));
        // 3 profiles x 3 checkpoints
        assert_eq!(text.lines().count(), 10);
        assert!(text.contains("conservative,0.04,30,1000.0"));
    }

    #[test]
    fn test_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("growth.csv");
        let growth = simulate_growth(500.0, 0.0, RateFrequency::Annual, 0.05, 3).unwrap();
        to_path(&path, |w| write_growth(w, &growth)).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[2][0], "3");
    }
}
