use crate::domain::{ConfidenceCommand, LabelSource};
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::domain::AgentName;
use common::error::Error;
use std::path::PathBuf;

/// -a 未指定時のエージェント名
pub const DEFAULT_AGENT: &str = "confidence";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub help: bool,
    /// -v / --verbose: ログを stderr にも出す
    pub verbose: bool,
    pub agent: Option<AgentName>,
    /// -r / --result: ラベルを result.json から読む
    pub result: Option<PathBuf>,
    pub level: Option<String>,
}

/// 解析結果: 通常の Config / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("confidence")
        .about("Relay a confidence level to the conversational agent")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
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
            clap::Arg::new("agent")
                .short('a')
                .long("agent")
                .value_name("name")
                .help("Agent name in profiles.json (default: confidence)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("result")
                .short('r')
                .long("result")
                .value_name("file")
                .help("Read confidence_level from a result.json file")
                .value_parser(value_parser!(PathBuf))
                .conflicts_with("level")
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
            clap::Arg::new("level")
                .index(1)
                .value_name("LEVEL")
                .help("Confidence level (super low, low, medium, high)"),
        )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    Config {
        help: matches.get_flag("help"),
        verbose: matches.get_flag("verbose"),
        agent: matches
            .get_one::<String>("agent")
            .map(|s| AgentName::new(s.clone())),
        result: matches.get_one::<PathBuf>("result").cloned(),
        level: matches.get_one::<String>("level").cloned(),
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
    clap_complete::generate(shell, &mut cmd, "confidence", &mut std::io::stdout());
}

/// Config を ConfidenceCommand に変換する
///
/// ラベル未指定は usage エラーにせず、中継側で入力不備の結果にする。
pub fn config_to_command(config: Config) -> ConfidenceCommand {
    if config.help {
        return ConfidenceCommand::Help;
    }
    let label = match config.result {
        Some(path) => LabelSource::ResultFile(path),
        None => LabelSource::Given(config.level),
    };
    ConfidenceCommand::Relay {
        label,
        agent: config
            .agent
            .unwrap_or_else(|| AgentName::new(DEFAULT_AGENT)),
    }
}
