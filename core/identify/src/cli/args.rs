use crate::domain::IdentifyCommand;
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::domain::{ModelName, ProviderName};
use common::error::Error;
use std::path::PathBuf;

/// 出力ディレクトリ未指定時の保存先
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub help: bool,
    /// -L / --list-profiles: 現在有効なプロファイル一覧を表示
    pub list_profiles: bool,
    /// -v / --verbose: ログを stderr にも出す
    pub verbose: bool,
    /// --no-save: context.json / result.json を書かない
    pub no_save: bool,
    pub profile: Option<ProviderName>,
    pub model: Option<ModelName>,
    /// --prior: 2 回目の推論に使う前回の result.json
    pub prior: Option<PathBuf>,
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

/// 解析結果: 通常の Config / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("identify")
        .about("Identify likely causes of a patient's symptoms")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("list-profiles")
                .short('L')
                .long("list-profiles")
                .help("List currently available provider profiles")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Also write log records to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("no-save")
                .long("no-save")
                .help("Do not write context.json / result.json")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("profile")
                .short('p')
                .long("profile")
                .value_name("profile")
                .help("Specify LLM profile (perplexity, openai, echo, etc.)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("model")
                .short('m')
                .long("model")
                .value_name("model")
                .help("Specify model name (e.g. sonar-pro, gpt-4o-mini)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("prior")
                .long("prior")
                .value_name("file")
                .help("Previous result.json; runs the second round")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("input")
                .index(1)
                .value_name("input.json")
                .help("Patient context JSON file")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            clap::Arg::new("output_dir")
                .index(2)
                .value_name("output_dir")
                .help("Directory for context.json and result.json (default: ./output)")
                .value_parser(value_parser!(PathBuf)),
        )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    Config {
        help: matches.get_flag("help"),
        list_profiles: matches.get_flag("list-profiles"),
        verbose: matches.get_flag("verbose"),
        no_save: matches.get_flag("no-save"),
        profile: matches
            .get_one::<String>("profile")
            .map(|s| ProviderName::new(s.clone())),
        model: matches
            .get_one::<String>("model")
            .map(|s| ModelName::new(s.clone())),
        prior: matches.get_one::<PathBuf>("prior").cloned(),
        input: matches.get_one::<PathBuf>("input").cloned(),
        output_dir: matches.get_one::<PathBuf>("output_dir").cloned(),
    }
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    let matches = build_clap_command()
        .try_get_matches()
        .map_err(|e| Error::invalid_argument(e.to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }
    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// テスト用: 引数スライスから解析する
#[cfg(test)]
pub fn parse_args_from(args: &[&str]) -> Result<Config, Error> {
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    Ok(matches_to_config(&matches))
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "identify", &mut std::io::stdout());
}

/// Config を IdentifyCommand に変換する。入力ファイルが無ければ usage エラー
pub fn config_to_command(config: Config) -> Result<IdentifyCommand, Error> {
    if config.help {
        return Ok(IdentifyCommand::Help);
    }
    if config.list_profiles {
        return Ok(IdentifyCommand::ListProfiles);
    }
    let input = config
        .input
        .ok_or_else(|| Error::invalid_argument("No input file provided"))?;
    let output_dir = if config.no_save {
        None
    } else {
        Some(
            config
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        )
    };
    Ok(IdentifyCommand::Run {
        input,
        output_dir,
        prior: config.prior,
        profile: config.profile,
        model: config.model,
    })
}
