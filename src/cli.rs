// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::path::{Path, PathBuf};

use anyhow::Result;
use csv::WriterBuilder;
use itertools::Itertools;
use ordered_float::NotNan;
use structopt::StructOpt;

use crate::density;
use crate::errors;
use crate::stats;

#[derive(Debug, StructOpt, Clone)]
#[structopt(
    name = "denstest",
    about = "Per-bin Welch's t-tests between the lipid density profiles of a full-length \
             system and a TMD system, with Benjamini-Hochberg FDR correction.",
    setting = structopt::clap::AppSettings::ColoredHelp
)]
pub struct Denstest {
    #[structopt(
        parse(from_os_str),
        help = "Density file with whitespace-separated columns. Columns 3-7 hold the \
                full-length densities, columns 10-15 the TMD densities."
    )]
    pub density_file: PathBuf,
    #[structopt(help = "Significance threshold (alpha) for the FDR control.")]
    pub alpha: f64,
    #[structopt(
        parse(from_os_str),
        long,
        help = "Path for the resulting p-value table (default: p_values_<name>_<alpha>_BH.dat \
                in the working directory)."
    )]
    pub output: Option<PathBuf>,
    #[structopt(long, short, help = "Verbose output.")]
    pub verbose: bool,
}

pub fn run(opt: Denstest) -> Result<()> {
    let Denstest {
        density_file,
        alpha,
        output,
        ..
    } = opt;

    if !(alpha > 0.0 && alpha <= 1.0) {
        return Err(errors::Error::InvalidAlpha { alpha }.into());
    }

    let rows = density::read_density_file(&density_file)?;

    info!("Calculating p-values for {} density bins...", rows.len());
    let p_values = stats::collect_p_values(&rows);
    info!("Calculating corrected p-values...");
    let adjusted = stats::benjamini_hochberg(&p_values)?;

    let output = output.unwrap_or_else(|| derived_output_path(&density_file, alpha));
    write_p_values(&p_values, &adjusted, alpha, &output)?;

    let min_p_value = min_value(&p_values)?;
    let min_adjusted = min_value(&adjusted)?;
    println!("Min p-value in the dataset\t\t\t\t\t: {}", min_p_value);
    println!(
        "Min corrected p-value (Benjamini-Hochberg correction, FDR)\t: {}",
        min_adjusted
    );
    if min_adjusted < alpha {
        println!(
            "\n*** At least one corrected p-value is significant after the \
             Benjamini-Hochberg correction (FDR) ***\n"
        );
    } else {
        println!("\n*** None of the corrected p-values is significant ***\n");
    }

    Ok(())
}

/// Derive the output path from the density file name. Input files follow the
/// density_<name> naming scheme of the upstream pipeline; the prefix is
/// dropped from the stem when present.
pub fn derived_output_path(density_file: &Path, alpha: f64) -> PathBuf {
    let stem = density_file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = if stem.chars().count() > 8 {
        stem.chars().skip(8).collect()
    } else {
        stem
    };

    PathBuf::from(format!("p_values_{}_{}_BH.dat", name, alpha))
}

#[derive(Debug, Serialize)]
struct PValueRecord {
    #[serde(rename = "#p-value")]
    p_value: f64,
    #[serde(rename = "#Benjamini-Hochberg")]
    adjusted_p_value: f64,
}

fn write_p_values(p_values: &[f64], adjusted: &[f64], alpha: f64, path: &Path) -> Result<()> {
    info!("Writing p-values for alpha = {} cut-off...", alpha);

    let mut writer = WriterBuilder::new().delimiter(b'\t').from_path(path)?;
    for (&p_value, &adjusted_p_value) in p_values.iter().zip(adjusted) {
        writer.serialize(PValueRecord {
            p_value,
            adjusted_p_value,
        })?;
    }
    writer.flush()?;

    Ok(())
}

fn min_value(values: &[f64]) -> Result<f64> {
    let min = values
        .iter()
        .map(|&value| NotNan::new(value))
        .process_results(|iter| iter.min())?;
    // rows are guaranteed non-empty by the reader
    Ok(min.map(|min| min.into_inner()).unwrap_or(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_output_path() {
        assert_eq!(
            derived_output_path(Path::new("data/density_2d_map.dat"), 0.05),
            PathBuf::from("p_values_2d_map_0.05_BH.dat")
        );
        // stems without the density_ prefix keep their full name
        assert_eq!(
            derived_output_path(Path::new("map.dat"), 0.01),
            PathBuf::from("p_values_map_0.01_BH.dat")
        );
    }

    #[test]
    fn test_min_value() {
        assert_eq!(min_value(&[0.4, 0.1, 0.7]).unwrap(), 0.1);
        assert!(min_value(&[0.4, f64::NAN]).is_err());
    }
}
