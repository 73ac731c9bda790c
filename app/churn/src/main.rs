use std::io;
use std::path::PathBuf;

use churn_model::{train, ArtifactError, TrainError};
use churn_predict::{ArtifactCache, CustomerForm, EncodingSource, Predictor};
use churn_viz::generate_insights;
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

mod config;
mod render;
mod session;

use config::ChurnConfig;

const EXIT_OK: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_NO_ARTIFACT: i32 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "churn",
    version,
    about = "Train, query and chart a Telco customer churn classifier",
    long_about = "churn fits a logistic-regression churn model on the Telco customer CSV,\n\
        answers single-customer predictions with a rule-based explanation, and\n\
        renders insight charts of the training data.\n\n\
        EXAMPLES:\n\
        \n  churn train                                  Fit and save churn_model.json\n\
        \n  churn predict --tenure 5 --partner No        Score one customer\n\
        \n  churn form                                   Interactive form session\n\
        \n  churn insights --out-dir charts              Write the five SVG charts"
)]
struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./churn.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Dataset CSV path
    #[arg(long, global = true, value_name = "FILE")]
    dataset: Option<PathBuf>,

    /// Model artifact path
    #[arg(long, global = true, value_name = "FILE")]
    artifact: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fit the model, print test-set metrics and save the artifact
    Train(TrainArgs),
    /// Predict churn for one customer given as flags
    Predict(PredictArgs),
    /// Interactive form session (:help, :quit)
    Form(EncodingArgs),
    /// Rank features by absolute model coefficient
    Importance(ImportanceArgs),
    /// Render dataset insight charts
    Insights(InsightsArgs),
}

#[derive(Debug, Args)]
struct TrainArgs {
    /// Fraction of rows held out for evaluation
    #[arg(long)]
    test_size: Option<f64>,
    /// Seed for the train/test shuffle
    #[arg(long)]
    seed: Option<u64>,
    /// Iteration cap for the solver
    #[arg(long)]
    max_iter: Option<usize>,
}

#[derive(Debug, Args)]
struct EncodingArgs {
    /// Source of categorical codes: artifact | fixed
    #[arg(long, value_name = "SOURCE")]
    encoding: Option<EncodingSource>,
    /// Reject requests that would zero-fill model features
    #[arg(long)]
    strict_features: bool,
}

#[derive(Debug, Args)]
struct PredictArgs {
    #[arg(long, value_parser = ["Male", "Female"])]
    gender: Option<String>,
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=1))]
    senior_citizen: Option<u8>,
    #[arg(long, value_parser = ["Yes", "No"])]
    partner: Option<String>,
    #[arg(long, value_parser = ["Yes", "No"])]
    dependents: Option<String>,
    /// Months with the company (0-72)
    #[arg(long)]
    tenure: Option<u32>,
    #[arg(long)]
    monthly_charges: Option<f64>,
    #[arg(long)]
    total_charges: Option<f64>,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
    #[command(flatten)]
    encoding: EncodingArgs,
}

impl PredictArgs {
    fn form(&self) -> CustomerForm {
        let d = CustomerForm::default();
        CustomerForm {
            gender: self.gender.clone().unwrap_or(d.gender),
            senior_citizen: self.senior_citizen.unwrap_or(d.senior_citizen),
            partner: self.partner.clone().unwrap_or(d.partner),
            dependents: self.dependents.clone().unwrap_or(d.dependents),
            tenure: self.tenure.unwrap_or(d.tenure),
            monthly_charges: self.monthly_charges.unwrap_or(d.monthly_charges),
            total_charges: self.total_charges.unwrap_or(d.total_charges),
        }
    }
}

#[derive(Debug, Args)]
struct ImportanceArgs {
    /// Number of features to show
    #[arg(long, default_value_t = 10)]
    top: usize,
}

#[derive(Debug, Args)]
struct InsightsArgs {
    /// Directory the SVG files are written to
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,
}

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn init_logging(verbose: u8) {
    env_logger::Builder::new()
        .filter_level(level_for(verbose))
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn print_lines(lines: &[String]) {
    for l in lines {
        println!("{l}");
    }
}

/// Fold command-line overrides into the file configuration.
fn resolve_config(cli: &Cli) -> Result<ChurnConfig, config::ConfigError> {
    let mut config = ChurnConfig::load(cli.config.as_deref())?;
    if let Some(p) = &cli.dataset {
        config.dataset = p.clone();
    }
    if let Some(p) = &cli.artifact {
        config.artifact = p.clone();
    }
    match &cli.command {
        Command::Train(args) => {
            if let Some(v) = args.test_size {
                config.training.test_size = v;
            }
            if let Some(v) = args.seed {
                config.training.seed = v;
            }
            if let Some(v) = args.max_iter {
                config.training.max_iter = v;
            }
        }
        Command::Predict(PredictArgs { encoding, .. }) | Command::Form(encoding) => {
            if let Some(e) = encoding.encoding {
                config.predict.encoding = e;
            }
            config.predict.strict_features |= encoding.strict_features;
        }
        Command::Insights(args) => {
            if let Some(dir) = &args.out_dir {
                config.insights.out_dir = dir.clone();
            }
        }
        Command::Importance(_) => {}
    }
    Ok(config)
}

fn run_train(config: &ChurnConfig) -> i32 {
    let train_config = config.train_config();
    match train(&train_config) {
        Ok(outcome) => {
            print_lines(&render::training(&outcome));
            println!("\nModel saved to {}", train_config.artifact.display());
            EXIT_OK
        }
        Err(e) => {
            eprintln!("error: {e}");
            if matches!(e, TrainError::Data(churn_data::DataError::DatasetNotFound(_))) {
                eprintln!("hint: pass --dataset or set `dataset` in churn.toml");
            }
            EXIT_FAILURE
        }
    }
}

fn load_predictor(config: &ChurnConfig) -> Result<Predictor, i32> {
    let cache = ArtifactCache::new(&config.artifact);
    Predictor::from_cache(&cache, config.predict).map_err(|e| match e {
        ArtifactError::NotFound(path) => {
            eprintln!(
                "error: model artifact not found at {}; run `churn train` first",
                path.display()
            );
            EXIT_NO_ARTIFACT
        }
        other => {
            eprintln!("error: {other}");
            EXIT_FAILURE
        }
    })
}

fn run_predict(config: &ChurnConfig, args: &PredictArgs) -> i32 {
    let predictor = match load_predictor(config) {
        Ok(p) => p,
        Err(code) => return code,
    };
    match predictor.predict(&args.form()) {
        Ok(result) if args.json => match serde_json::to_string_pretty(&result) {
            Ok(text) => {
                println!("{text}");
                EXIT_OK
            }
            Err(e) => {
                eprintln!("error: {e}");
                EXIT_FAILURE
            }
        },
        Ok(result) => {
            print_lines(&render::prediction(&result));
            EXIT_OK
        }
        Err(e) => {
            eprintln!("error: {e}");
            EXIT_FAILURE
        }
    }
}

fn run_form(config: &ChurnConfig) -> i32 {
    let predictor = match load_predictor(config) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let stdin = io::stdin();
    match session::run(stdin.lock(), io::stdout(), &predictor) {
        Ok(()) => EXIT_OK,
        Err(e) => {
            eprintln!("error: form session failed: {e}");
            EXIT_FAILURE
        }
    }
}

fn run_importance(config: &ChurnConfig, args: &ImportanceArgs) -> i32 {
    let predictor = match load_predictor(config) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let artifact = predictor.artifact();
    print_lines(&render::importance(
        artifact.backend(),
        &artifact.feature_names,
        args.top,
    ));
    EXIT_OK
}

fn run_insights(config: &ChurnConfig) -> i32 {
    match generate_insights(&config.dataset, &config.insights) {
        Ok(report) => {
            print_lines(&render::insights(&report));
            if report.all_failed() {
                eprintln!("error: no chart could be rendered");
                EXIT_FAILURE
            } else {
                EXIT_OK
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            EXIT_FAILURE
        }
    }
}

fn run_cli() -> i32 {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = match resolve_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_FAILURE;
        }
    };
    log::debug!("effective configuration: {config:?}");
    match &cli.command {
        Command::Train(_) => run_train(&config),
        Command::Predict(args) => run_predict(&config, args),
        Command::Form(_) => run_form(&config),
        Command::Importance(args) => run_importance(&config, args),
        Command::Insights(_) => run_insights(&config),
    }
}

fn main() {
    std::process::exit(run_cli());
}
