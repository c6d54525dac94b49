use crate::error::Result;
use serde::Serialize;
use soilcell::OptimizationResult;
use soilcell::core::capacity::{BindingConstraint, CellRequirement, FacilityCapacity};
use soilcell::core::cycle::CycleBreakdown;
use soilcell::core::models::cell::CellDimensions;
use soilcell::engine::state::ScoredConfiguration;
use std::io::Write;
use std::path::Path;

/// One shortlist entry flattened for CSV export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortlistRow {
    pub rank: usize,
    pub cell_volume_cy: f64,
    pub cell_count: u32,
    pub length_ft: f64,
    pub width_ft: f64,
    pub depth_ft: f64,
    pub footprint_sf: f64,
    pub cycle_days: u32,
    pub throughput_cy_per_day: f64,
    pub storage_cy: f64,
    pub utilization: f64,
    pub days_of_capacity: f64,
    pub surplus_cy_per_day: f64,
    pub headroom_pct: f64,
    pub binding: &'static str,
    pub cost_proxy: f64,
    pub operational_penalty: f64,
    pub score: f64,
}

impl ShortlistRow {
    pub fn new(rank: usize, s: &ScoredConfiguration) -> Self {
        let dims = &s.candidate.dimensions;
        Self {
            rank,
            cell_volume_cy: s.cell_volume_cy(),
            cell_count: s.cell_count(),
            length_ft: round2(dims.length_ft),
            width_ft: round2(dims.width_ft),
            depth_ft: dims.depth_ft,
            footprint_sf: round2(dims.footprint_sf()),
            cycle_days: s.candidate.cycle_time_days(),
            throughput_cy_per_day: round2(s.throughput_cy_per_day()),
            storage_cy: s.storage_cy(),
            utilization: round4(s.utilization),
            days_of_capacity: round2(s.days_of_capacity),
            surplus_cy_per_day: round2(s.surplus_cy_per_day),
            headroom_pct: round2(s.headroom_pct),
            binding: binding_label(s.binding()),
            cost_proxy: round4(s.cost_proxy),
            operational_penalty: round4(s.operational_penalty),
            score: round4(s.score),
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

fn binding_label(binding: BindingConstraint) -> &'static str {
    match binding {
        BindingConstraint::CycleTime => "cycle-time",
        BindingConstraint::Equipment => "equipment",
    }
}

pub fn shortlist_rows(shortlist: &[ScoredConfiguration]) -> Vec<ShortlistRow> {
    shortlist
        .iter()
        .enumerate()
        .map(|(i, s)| ShortlistRow::new(i + 1, s))
        .collect()
}

/// Writes the shortlist as CSV with a header row.
pub fn write_csv<W: Write>(writer: W, shortlist: &[ScoredConfiguration]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in shortlist_rows(shortlist) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv_file(path: &Path, shortlist: &[ScoredConfiguration]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(file, shortlist)
}

pub fn render_recommendation(result: &OptimizationResult, daily_volume_cy: f64) -> String {
    let best = &result.best;
    let mut out = String::new();
    out.push_str(&format!(
        "Recommended layout: {} cells of {:.0} CY ({})\n",
        best.cell_count(),
        best.cell_volume_cy(),
        render_dimensions(&best.candidate.dimensions)
    ));
    out.push_str(&format!(
        "  Intake {:.1} CY/day, throughput {:.1} CY/day, utilization {:.1}%\n",
        daily_volume_cy,
        best.throughput_cy_per_day(),
        best.utilization * 100.0
    ));
    out.push_str(&format!(
        "  Storage {:.0} CY ({:.1} days of intake), headroom {:+.1}%\n",
        best.storage_cy(),
        best.days_of_capacity,
        best.headroom_pct
    ));
    out.push_str(&format!(
        "  Cycle {} calendar days, limited by {}\n",
        best.candidate.cycle_time_days(),
        binding_label(best.binding())
    ));
    out.push_str(&format!(
        "  Score {:.4} ({} of {} candidates feasible)\n",
        best.score, result.feasible, result.examined
    ));
    out
}

pub fn render_dimensions(dims: &CellDimensions) -> String {
    format!(
        "{:.1} ft x {:.1} ft x {:.1} ft deep",
        dims.length_ft, dims.width_ft, dims.depth_ft
    )
}

pub fn render_shortlist(shortlist: &[ScoredConfiguration]) -> String {
    let mut out = format!(
        "{:>4} {:>9} {:>6} {:>7} {:>11} {:>7} {:>8} {:>11} {:>7}\n",
        "rank", "cell_cy", "cells", "cycle", "throughput", "util%", "buffer", "binding", "score"
    );
    for row in shortlist_rows(shortlist) {
        out.push_str(&format!(
            "{:>4} {:>9.0} {:>6} {:>7} {:>11.1} {:>7.1} {:>8.1} {:>11} {:>7.4}\n",
            row.rank,
            row.cell_volume_cy,
            row.cell_count,
            row.cycle_days,
            row.throughput_cy_per_day,
            row.utilization * 100.0,
            row.days_of_capacity,
            row.binding,
            row.score
        ));
    }
    out
}

pub fn render_cycle(
    cell_volume_cy: f64,
    cycle: &CycleBreakdown,
    requirement: &CellRequirement,
    capacity: &FacilityCapacity,
) -> String {
    let mut out = format!("Cycle of a {:.0} CY cell:\n", cell_volume_cy);
    out.push_str(&format!(
        "  {:<8} {:>14} {:>13}\n",
        "phase", "operating_days", "calendar_days"
    ));
    for p in cycle.phases() {
        out.push_str(&format!(
            "  {:<8} {:>14} {:>13}\n",
            p.phase.name(),
            p.operating_days,
            p.calendar_days
        ));
    }
    out.push_str(&format!(
        "  {:<8} {:>14} {:>13}\n",
        "total",
        cycle.total_operating_days(),
        cycle.total_calendar_days()
    ));
    out.push_str(&format!(
        "Intake over one cycle: {:.0} CY -> {:.2} cells, {} with safety margin\n",
        requirement.volume_per_cycle_cy,
        requirement.theoretical_cells,
        requirement.cells_with_safety
    ));
    out.push_str(&format!(
        "With {} cells: throughput {:.1} CY/day, storage {:.0} CY, limited by {}\n",
        requirement.cells_with_safety,
        capacity.throughput_cy_per_day,
        capacity.storage_cy,
        binding_label(capacity.binding)
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use soilcell::core::capacity::cells_required;
    use soilcell::core::cycle::cycle_time;
    use soilcell::core::models::facility::FacilityParameters;
    use soilcell::core::models::schedule::WeekendPolicy;
    use soilcell::engine::config::{OptimizeConfig, SearchConfig};

    fn params() -> FacilityParameters {
        FacilityParameters {
            daily_volume_cy: 200.0,
            cell_depth_ft: 4.0,
            loading_rate_cy_per_day: 300.0,
            unloading_rate_cy_per_day: 300.0,
            rip_days: 2,
            treat_days: 5,
            dry_days: 3,
            weekend_policy: WeekendPolicy::default(),
            load_paced_by_intake: false,
        }
    }

    fn result() -> OptimizationResult {
        let config = OptimizeConfig {
            search: SearchConfig {
                shortlist_len: 3,
                ..Default::default()
            },
            ..Default::default()
        };
        soilcell::optimize(&params(), &config).unwrap()
    }

    #[test]
    fn rows_are_ranked_from_one_in_shortlist_order() {
        let result = result();
        let rows = shortlist_rows(&result.shortlist);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(rows[0].cell_count, result.best.cell_count());
        assert_eq!(rows[0].cell_volume_cy, result.best.cell_volume_cy());
    }

    #[test]
    fn csv_has_header_and_one_line_per_entry() {
        let result = result();
        let mut buf = Vec::new();
        write_csv(&mut buf, &result.shortlist).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("rank,cell_volume_cy,cell_count,"));
        assert!(lines[0].ends_with(",score"));
        assert!(lines[1].starts_with("1,"));
    }

    #[test]
    fn csv_file_can_be_read_back() {
        let result = result();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shortlist.csv");
        write_csv_file(&path, &result.shortlist).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        let binding_idx = headers.iter().position(|h| h == "binding").unwrap();
        let records: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 3);
        assert!(
            records
                .iter()
                .all(|r| matches!(&r[binding_idx], "cycle-time" | "equipment"))
        );
    }

    #[test]
    fn recommendation_mentions_layout_and_utilization() {
        let result = result();
        let text = render_recommendation(&result, 200.0);
        assert!(text.contains(&format!("{} cells", result.best.cell_count())));
        assert!(text.contains("utilization"));
        assert!(text.contains("limited by cycle-time"));
    }

    #[test]
    fn cycle_report_lists_every_phase_and_the_total() {
        let p = params();
        let cycle = cycle_time(300.0, &p).unwrap();
        let requirement = cells_required(200.0, 300.0, cycle.total_calendar_days(), 1.1);
        let cap = soilcell::core::capacity::capacity(
            300.0,
            requirement.cells_with_safety,
            cycle.total_calendar_days(),
            300.0,
            300.0,
        );
        let text = render_cycle(300.0, &cycle, &requirement, &cap);
        for name in ["load", "rip", "treat", "dry", "unload", "total"] {
            assert!(text.contains(name), "missing {name}");
        }
        assert!(text.contains(&format!("{} with safety margin", requirement.cells_with_safety)));
    }
}
