//! Builds the hard-sigmoid kernel for one target and prints how a buffer is
//! split across workers and tiles before running it.
//!
//! Usage: `cargo run --example hard_sigmoid -- [target] [len] [task_num]`

use tilekern::prelude::*;

fn main() -> Result<(), Error> {
    let mut args = std::env::args().skip(1);
    let target = args.next().unwrap_or_else(|| "mlu290".to_string());
    let len: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(10);
    let task_num: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(4);
    let cfg = LaunchConfig::default().with_task_num(task_num);

    let kernel = registry::global().build("hard_sigmoid", DtypeKind::F32, &target, &cfg)?;
    println!(
        "{} on {}: {} workers, {} bytes per region, {} elems per tile",
        kernel.name,
        kernel.target.name,
        kernel.task_num,
        kernel.layout.region_bytes,
        kernel.layout.tile_elems
    );

    let plan = kernel.plan(len);
    println!(
        "len={} per_worker={} remainder={}",
        plan.data_total, plan.per_worker, plan.remainder
    );
    for w in plan.workers.iter().filter(|w| w.len > 0) {
        println!(
            "  worker {:>2}: {:?} in {} tiles, last tile {} elems",
            w.index,
            w.range(),
            w.loop_count,
            w.tail_elems
        );
    }

    let input: Vec<f32> = (0..len).map(|i| i as f32 - len as f32 / 2.0).collect();
    let mut output = vec![0.0; len];
    let stats = kernel.launch(&input, &mut output)?;
    println!("{stats:?}");
    for (x, y) in input.iter().zip(output.iter()).take(16) {
        println!("  hard_sigmoid({x}) = {y}");
    }
    Ok(())
}
