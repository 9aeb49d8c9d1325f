mod config;
use anyhow::Result;
use clap::Parser;
use config::RunConfig;
use invpend_candle_agent::CandleEstimator;
use invpend_core::{
    record::{NullRecorder, Recorder},
    TrainingSession,
};
use invpend_env::CartPendulum;
use invpend_tensorboard::TensorboardRecorder;
use log::info;

const MODEL_DIR: &str = "./model";

/// Train a Q-network to balance an inverted pendulum on a cart
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// YAML file of the run configuration
    #[arg(short, long)]
    config: Option<String>,

    /// Print the run configuration as YAML and exit
    #[arg(long, default_value_t = false)]
    dump_config: bool,

    /// Number of training episodes
    #[arg(short = 'n', long)]
    episodes: Option<usize>,

    /// Directory of parameters and trajectories
    #[arg(short, long)]
    model_dir: Option<String>,

    /// Directory of TensorBoard event files, defaults to the model directory
    #[arg(short, long)]
    logdir: Option<String>,

    /// Random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Do not write TensorBoard event files
    #[arg(long, default_value_t = false)]
    no_tensorboard: bool,
}

fn create_config(args: &Args) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };

    if let Some(n) = args.episodes {
        config.trainer = config.trainer.n_episodes(n);
    }
    if let Some(seed) = args.seed {
        config.trainer = config.trainer.seed(seed);
    }
    match &args.model_dir {
        Some(model_dir) => config.trainer = config.trainer.model_dir(model_dir.as_str()),
        None if config.trainer.model_dir.is_none() => {
            config.trainer = config.trainer.model_dir(MODEL_DIR)
        }
        None => {}
    }

    Ok(config)
}

fn create_recorder(args: &Args, config: &RunConfig) -> Box<dyn Recorder> {
    if args.no_tensorboard {
        return Box::new(NullRecorder::new());
    }
    let logdir = args
        .logdir
        .clone()
        .or_else(|| config.trainer.model_dir.clone())
        .unwrap_or_else(|| MODEL_DIR.to_string());
    info!("Write TensorBoard events to {}", logdir);
    Box::new(TensorboardRecorder::new(logdir))
}

fn train(args: &Args, config: RunConfig) -> Result<()> {
    let mut recorder = create_recorder(args, &config);
    let qnet = CandleEstimator::build(config.estimator)?;
    let mut session = TrainingSession::<CartPendulum, _>::build(config.trainer, config.env, qnet)?;
    session.train(recorder.as_mut())?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = create_config(&args)?;

    if args.dump_config {
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    train(&args, config)
}

#[cfg(test)]
mod tests {
    use super::{create_config, train, Args};
    use anyhow::Result;
    use invpend_core::Trajectory;
    use tempdir::TempDir;

    fn args(model_dir: &str) -> Args {
        Args {
            config: None,
            dump_config: false,
            episodes: Some(2),
            model_dir: Some(model_dir.to_string()),
            logdir: None,
            seed: Some(3),
            no_tensorboard: true,
        }
    }

    #[test]
    fn test_overrides() -> Result<()> {
        let config = create_config(&args("some/dir"))?;
        assert_eq!(config.trainer.n_episodes, 2);
        assert_eq!(config.trainer.seed, 3);
        assert_eq!(config.trainer.model_dir.as_deref(), Some("some/dir"));
        Ok(())
    }

    #[test]
    fn test_train_cart_pendulum() -> Result<()> {
        let tmp_dir = TempDir::new("invpend")?;
        let model_dir = match tmp_dir.as_ref().to_str() {
            Some(s) => s,
            None => panic!("Failed to get string of temporary directory"),
        };
        let args = args(model_dir);
        let mut config = create_config(&args)?;
        config.trainer = config.trainer.steps_per_episode(10).save_interval(1);
        train(&args, config)?;

        assert!(tmp_dir.path().join("1").join("qnet.safetensors").exists());
        assert!(tmp_dir.path().join("2").join("qnet.safetensors").exists());
        let trajectory = Trajectory::load(tmp_dir.path().join("last.csv"))?;
        assert!(!trajectory.is_empty());
        Ok(())
    }
}
