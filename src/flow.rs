//! Stage table of the QuickLogic synthesis flow.

use crate::config::Config;
use crate::pipeline::{Pipeline, Stage, Step};

pub const PASS_NAME: &str = "synth_quicklogic";

fn flatten_requested(config: &Config) -> bool {
    config.flatten
}

fn edif_requested(config: &Config) -> bool {
    config.edif_path.is_some()
}

fn blif_requested(config: &Config) -> bool {
    config.blif_path.is_some()
}

pub fn quicklogic() -> Pipeline {
    Pipeline::new(
        PASS_NAME,
        vec![
            Stage::new(
                "begin",
                vec![
                    Step::run("read_verilog -lib +/quicklogic/cells_sim.v"),
                    Step::run("hierarchy -check {top}"),
                ],
            ),
            Stage::new(
                "prepare",
                vec![
                    Step::run("proc"),
                    Step::when("flatten", flatten_requested, "with '-flatten'"),
                    Step::run("opt_expr"),
                    Step::run("opt_clean"),
                    Step::run("check"),
                    Step::run("opt"),
                    Step::run("techmap"),
                    Step::run("abc -exe {exe} -lut 1:4"),
                    Step::run("proc"),
                    Step::run("opt"),
                    Step::run("techmap -map +/quicklogic/cells_map.v"),
                    Step::run("select -set clock_inputs */t:dff* %x:+[CLK] */t:dff* %d"),
                    Step::run("select -set invclock_inputs */t:dff* %x:+[CLK] */t:dff* %d %n"),
                    Step::run("iopadmap -bits -inpad ckpad CLK:P @clock_inputs"),
                    Step::run("iopadmap -bits -outpad outpad A:P -inpad inpad Q:P @invclock_inputs"),
                    Step::run("splitnets -ports"),
                    Step::run("techmap -map +/quicklogic/cells_map.v"),
                ],
            ),
            Stage::new(
                "edif",
                vec![Step::when(
                    "write_edif -nogndvcc -attrprop -pvector par {edif}",
                    edif_requested,
                    "with '-edif'",
                )],
            ),
            Stage::new(
                "blif",
                vec![Step::when("write_blif {blif}", blif_requested, "with '-blif'")],
            ),
        ],
    )
}
