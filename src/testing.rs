//! Reference data set for tests.
//!
//! Builds a data root with one example network, `ky2`, holding six nodes
//! and three injection scenarios on a 30 second grid from 0 to 77700.
//! Two cells of the `J-1` scenario carry known regression values.

use std::fs;
use std::path::Path;

use serde_json::json;
use tempfile::TempDir;

use crate::catalog::EXAMPLES_DIR;

pub const NETWORK: &str = "ky2";
pub const NODES: [&str; 6] = ["J-1", "J-2", "J-3", "J-100", "R-1", "T-1"];
pub const INJECTIONS: [&str; 3] = ["J-1", "J-100", "J-2"];
pub const STEP: i64 = 30;
pub const END: i64 = 77700;

/// `J-1` scenario, `J-1` column, at timestep 42330.
pub const J1_AT_42330: f64 = 6.503378868103027;
/// `J-1` scenario, `J-1` column, at the last timestep.
pub const J1_AT_END: f64 = 5.355515;

const INP: &str = "\
[TITLE]
Reference network

[JUNCTIONS]
;ID     Elev    Demand
 J-1    210.0   12.5
 J-2    205.5   25.0
 J-3    198.0   0
 J-100  190.25  5.0

[RESERVOIRS]
 R-1    260.0

[TANKS]
 T-1    230.0   5  0  15  40

[PIPES]
 P-1    R-1    J-1    1200  12  100  0  Open
 P-2    J-1    J-2    800   10  100  0  Open
 P-3    J-2    J-3    650   8   100  0  Open
 P-4    J-3    J-100  400   8   100  0  Open

[PUMPS]
 PU-1   J-2    T-1    HEAD 1

[COORDINATES]
 J-1    100.0  200.0
 J-2    150.0  200.0
 J-3    200.0  180.0
 J-100  250.0  160.0
 R-1    50.0   220.0
 T-1    150.0  260.0

[END]
";

/// Temporary data root; removed on drop.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

fn concentration(injection: usize, column: usize, t: i64) -> f64 {
    let arrival = (column as i64 + 1) * 3600 + injection as i64 * 900;
    if t < arrival {
        return 0.0;
    }
    let phase = (t / STEP + column as i64 * 7 + injection as i64 * 13) % 97;
    0.25 + phase as f64 / 10.0
}

fn write_scenario(dir: &Path, injection_index: usize, injection: &str) {
    let index: Vec<i64> = (0..=END).step_by(STEP as usize).collect();
    let data: Vec<Vec<f64>> = index
        .iter()
        .map(|t| {
            NODES
                .iter()
                .enumerate()
                .map(|(column, _)| {
                    if injection == "J-1" && column == 0 && *t == 42330 {
                        J1_AT_42330
                    } else if injection == "J-1" && column == 0 && *t == END {
                        J1_AT_END
                    } else {
                        concentration(injection_index, column, *t)
                    }
                })
                .collect()
        })
        .collect();

    let table = json!({
        "columns": NODES,
        "index": index,
        "data": data,
    });
    fs::write(dir.join(format!("{}.json", injection)), table.to_string()).unwrap();
}

/// Build the reference data root.
pub fn reference_data() -> Fixture {
    let dir = TempDir::new().unwrap();
    let network_dir = dir.path().join(EXAMPLES_DIR).join(NETWORK);
    let tables_dir = network_dir.join(NETWORK);
    fs::create_dir_all(&tables_dir).unwrap();

    fs::write(network_dir.join(format!("{}.inp", NETWORK)), INP).unwrap();
    fs::write(
        network_dir.join("metadata.yml"),
        "x_offset: 1000.0\ny_offset: -500.0\n",
    )
    .unwrap();
    for (i, injection) in INJECTIONS.iter().enumerate() {
        write_scenario(&tables_dir, i, injection);
    }

    Fixture { dir }
}
