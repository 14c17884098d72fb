use std::{env, path::Path};

use anyhow::{Context, bail};
use evaluator::{configs, evaluate, init_checkpoint};

const DEFAULT_CONFIG: &str = "eval.json";
const USAGE: &str = "usage: tr360-eval [config.json] | tr360-eval init <architecture.json> <out.safetensors> [seed]";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();

    match args.as_slice() {
        [cmd, architecture, out, rest @ ..] if cmd == "init" => {
            let seed = match rest {
                [] => 0,
                [seed] => seed
                    .parse()
                    .with_context(|| format!("invalid seed '{seed}'"))?,
                _ => bail!(USAGE),
            };

            let checkpoint = init_checkpoint(Path::new(architecture), Path::new(out), seed)
                .context("failed to initialize checkpoint")?;
            println!(
                "wrote {} parameters to {out}",
                checkpoint.params().len()
            );
        }
        [cmd, ..] if cmd == "init" => bail!(USAGE),
        [] => run(DEFAULT_CONFIG)?,
        [path] => run(path)?,
        _ => bail!(USAGE),
    }

    Ok(())
}

fn run(path: &str) -> anyhow::Result<()> {
    let config =
        configs::load(path).with_context(|| format!("failed to load config from '{path}'"))?;
    log::info!("evaluating {}", config.model.path.display());

    let report = evaluate(config).context("evaluation failed")?;
    println!("{report}");
    Ok(())
}
