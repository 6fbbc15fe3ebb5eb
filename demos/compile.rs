use std::path::PathBuf;

use clap::Parser;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use truthtable_rs::compiler::{CompileOptions, TruthTableDesc};
use truthtable_rs::ignore::IgnoreMethod;

#[derive(Parser, Debug)]
#[command(author, version, about = "Compile a truth table and print the result")]
struct Cli {
    /// Truth table file: a header line (`A,B|Q`) followed by rows
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Inputs (0-based) that are never treated as ignorable
    #[arg(long, value_delimiter = ',')]
    disable_ignore: Vec<usize>,

    /// Use the coarse ignore analysis
    #[arg(long)]
    coarse: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    TermLogger::init(
        cli.log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let text = std::fs::read_to_string(&cli.path)?;
    let lines: Vec<&str> = text.lines().collect();
    let header = lines
        .first()
        .ok_or_else(|| color_eyre::eyre::eyre!("{} is empty", cli.path.display()))?;

    // Dimensions come from the header.
    let (inputs, outputs) = header
        .split_once('|')
        .ok_or_else(|| color_eyre::eyre::eyre!("bad header: {:?}", header))?;
    let num_inputs = inputs.split(',').count();
    let num_outputs = outputs.split(',').count();
    println!("inputs = {}, outputs = {}", num_inputs, num_outputs);

    let mut options =
        CompileOptions::default().with_disabled_ignore(&cli.disable_ignore, num_inputs)?;
    if cli.coarse {
        options.method = IgnoreMethod::Coarse;
    }
    println!("options = {:?}", options);

    let time_total = std::time::Instant::now();
    let desc = TruthTableDesc::new(num_inputs, num_outputs)?;
    let table = desc.setup_with_header(&lines, &options)?;
    println!("compiled in {:.3}s", time_total.elapsed().as_secs_f64());

    print!("{}", table);
    let delays: Vec<_> = table.timing_table().iter().map(|d| d.to_string()).collect();
    println!("delays = [{}]", delays.join(", "));

    Ok(())
}
