use super::super::args::ReportArgs;
use crate::exit_codes::SUCCESS;
use seqbench_core::model::Budget;
use seqbench_core::report::render_table;

pub(crate) fn run(args: ReportArgs) -> anyhow::Result<i32> {
    let budgets: Vec<Budget> = args.timeouts.iter().copied().map(Budget::from_secs).collect();
    let table = render_table(&args.root, &args.models, &budgets)?;
    println!("{}", table);
    Ok(SUCCESS)
}
