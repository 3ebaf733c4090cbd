mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::process;

use cli::{config_to_command, parse_args, print_completion, Config, ParseOutcome};
use common::error::Error;
use common::ports::outbound::{now_iso8601, LogLevel, LogRecord};
use domain::{non_blank_label, ConfidenceCommand, LabelSource, RelayOutcome};
use ports::inbound::UseCaseRunner;
use usecase::label_from_result;
use wiring::{wire_confidence, App};

/// Command をディスパッチする Runner
struct Runner {
    app: App,
}

impl Runner {
    fn log(&self, level: LogLevel, kind: &str, message: String, fields: Option<BTreeMap<String, serde_json::Value>>) {
        let _ = self.app.logger.log(&LogRecord {
            ts: now_iso8601(),
            level,
            message,
            layer: Some("cli".to_string()),
            kind: Some(kind.to_string()),
            fields,
        });
    }

    fn dispatch(&self, cmd: ConfidenceCommand) -> Result<i32, Error> {
        let (label, agent) = match cmd {
            ConfidenceCommand::Help => {
                print_help();
                return Ok(0);
            }
            ConfidenceCommand::Relay { label, agent } => (label, agent),
        };
        let label = match label {
            LabelSource::Given(level) => level,
            LabelSource::ResultFile(path) => label_from_result(self.app.fs.as_ref(), &path)?,
        };

        // ラベルが無ければエージェント設定を見ずに入力不備として返す
        let outcome = if non_blank_label(label.as_deref()).is_none() {
            RelayOutcome::rejected()
        } else {
            self.app.relay_use_case(&agent)?.relay(label.as_deref())
        };
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        Ok(if outcome.is_error() { 1 } else { 0 })
    }
}

impl UseCaseRunner for Runner {
    fn run(&self, config: Config) -> Result<i32, Error> {
        let cmd = config_to_command(config);
        let command_name = match cmd {
            ConfidenceCommand::Help => "help",
            ConfidenceCommand::Relay { .. } => "relay",
        };
        let mut fields = BTreeMap::new();
        fields.insert("command".to_string(), serde_json::json!(command_name));
        self.log(LogLevel::Info, "lifecycle", "command started".to_string(), Some(fields.clone()));

        let result = self.dispatch(cmd);

        let code = result.as_ref().copied().unwrap_or_else(|e| e.exit_code());
        fields.insert("exit_code".to_string(), serde_json::json!(code));
        self.log(LogLevel::Info, "lifecycle", "command finished".to_string(), Some(fields));
        if let Err(ref e) = result {
            self.log(LogLevel::Error, "error", e.to_string(), None);
        }
        result
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("confidence: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    let runner = Runner {
        app: wire_confidence(config.verbose),
    };
    runner.run(config)
}

fn print_usage() {
    eprintln!("Usage: confidence [options] [LEVEL]");
    eprintln!("       confidence [options] --result <result.json>");
}

fn print_help() {
    println!("Usage: confidence [options] [LEVEL]");
    println!("       confidence [options] --result <result.json>");
    println!("Options:");
    println!("  -h, --help                    Show this help message");
    println!("  -a, --agent <name>            Agent name (profiles.json agents.<name>). Default: confidence");
    println!("  -r, --result <file>           Read confidence_level from a result.json written by identify");
    println!("  -v, --verbose                 Also write log records to stderr");
    println!("  --generate <shell>            Generate shell completion script (bash, zsh, fish)");
    println!();
    println!("Environment:");
    println!("  CONFIDENCE_AGENT_ID  Agent id (or agents.confidence.agent_id in profiles.json)");
    println!("  LETTA_API_KEY        Bearer token for the agent platform");
    println!("  LETTA_BASE_URL       Agent platform base URL. Default: https://api.letta.com");
    println!("  MEDAGENT_HOME        Home directory for profiles.json and log/");
    println!();
    println!("Description:");
    println!("  Send \"CONFIDENCE LEVEL: <Level>\" to the agent and print the outcome as JSON.");
    println!("  Exits 1 when no level is given or the agent call fails.");
    println!();
    println!("Examples:");
    println!("  confidence high");
    println!("  confidence \"super low\"");
    println!("  confidence --result output/result.json");
}
