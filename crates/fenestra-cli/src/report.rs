//! JSON report shape produced by `fenestra solve`.

use fenestra_core::common::{PropertySimple, Side};
use fenestra_bsdf::multipane::MultiPaneBSDF;
use fenestra_core::error::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SideReport {
    pub t_dir_hem: f64,
    pub r_dir_hem: f64,
    pub t_diff_diff: f64,
    pub r_diff_diff: f64,
    pub absorptance_diff: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct SolveReport {
    pub layer_count: usize,
    pub front: SideReport,
    pub back: SideReport,
}

fn side_report(pane: &MultiPaneBSDF, side: Side, lambda_lo: f64, lambda_hi: f64) -> Result<SideReport> {
    let t_dir_hem = pane.dir_hem(lambda_lo, lambda_hi, side, PropertySimple::T, 0.0, 0.0)?;
    let r_dir_hem = pane.dir_hem(lambda_lo, lambda_hi, side, PropertySimple::R, 0.0, 0.0)?;
    let t_diff_diff = pane.diff_diff(lambda_lo, lambda_hi, side, PropertySimple::T)?;
    let r_diff_diff = pane.diff_diff(lambda_lo, lambda_hi, side, PropertySimple::R)?;
    let mut absorptance_diff = Vec::with_capacity(pane.layer_count());
    for layer_index in 1..=pane.layer_count() {
        absorptance_diff.push(pane.abs_diff(lambda_lo, lambda_hi, side, layer_index)?);
    }
    Ok(SideReport {
        t_dir_hem,
        r_dir_hem,
        t_diff_diff,
        r_diff_diff,
        absorptance_diff,
    })
}

pub fn build(pane: &MultiPaneBSDF, lambda_lo: f64, lambda_hi: f64) -> Result<SolveReport> {
    Ok(SolveReport {
        layer_count: pane.layer_count(),
        front: side_report(pane, Side::Front, lambda_lo, lambda_hi)?,
        back: side_report(pane, Side::Back, lambda_lo, lambda_hi)?,
    })
}
