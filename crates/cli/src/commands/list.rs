use upkeep_core::UpkeepConfig;

use crate::render;

pub fn execute(config: &UpkeepConfig) {
    println!("{}", render::task_table(config));
}
