mod adapter;
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
use domain::IdentifyCommand;
use ports::inbound::UseCaseRunner;
use wiring::{wire_identify, App};

/// Command をディスパッチする Runner（match は main レイヤーに集約）
struct Runner {
    app: App,
}

impl Runner {
    fn log_lifecycle(&self, level: LogLevel, kind: &str, message: String, fields: Option<BTreeMap<String, serde_json::Value>>) {
        let _ = self.app.logger.log(&LogRecord {
            ts: now_iso8601(),
            level,
            message,
            layer: Some("cli".to_string()),
            kind: Some(kind.to_string()),
            fields,
        });
    }

    fn dispatch(&self, cmd: IdentifyCommand) -> Result<i32, Error> {
        match cmd {
            IdentifyCommand::Help => {
                print_help();
                Ok(0)
            }
            IdentifyCommand::ListProfiles => {
                let (names, default) = self.app.list_profiles()?;
                for name in &names {
                    if default.as_deref() == Some(name.as_str()) {
                        println!("{} (default)", name);
                    } else {
                        println!("{}", name);
                    }
                }
                Ok(0)
            }
            IdentifyCommand::Run {
                input,
                output_dir,
                prior,
                profile,
                model,
            } => {
                let use_case = self.app.identify_use_case(profile.as_ref(), model.as_ref())?;
                match use_case.run_file(&input, output_dir.as_deref(), prior.as_deref()) {
                    Some((_, result)) => {
                        println!("{}", serde_json::to_string_pretty(&result)?);
                        if let Some(dir) = output_dir {
                            eprintln!("Results saved to {}", dir.display());
                        }
                        Ok(0)
                    }
                    None => {
                        eprintln!("identify: could not load input '{}'", input.display());
                        Ok(1)
                    }
                }
            }
        }
    }
}

impl UseCaseRunner for Runner {
    fn run(&self, config: Config) -> Result<i32, Error> {
        let cmd = config_to_command(config)?;
        let command_name = cmd_name_for_log(&cmd);
        let mut fields = BTreeMap::new();
        fields.insert("command".to_string(), serde_json::json!(command_name));
        self.log_lifecycle(LogLevel::Info, "lifecycle", "command started".to_string(), Some(fields.clone()));

        let result = self.dispatch(cmd);

        let code = result.as_ref().copied().unwrap_or_else(|e| e.exit_code());
        fields.insert("exit_code".to_string(), serde_json::json!(code));
        self.log_lifecycle(LogLevel::Info, "lifecycle", "command finished".to_string(), Some(fields));
        if let Err(ref e) = result {
            self.log_lifecycle(LogLevel::Error, "error", e.to_string(), None);
        }
        result
    }
}

fn cmd_name_for_log(cmd: &IdentifyCommand) -> &'static str {
    match cmd {
        IdentifyCommand::Help => "help",
        IdentifyCommand::ListProfiles => "list-profiles",
        IdentifyCommand::Run { prior: Some(_), .. } => "second-round",
        IdentifyCommand::Run { .. } => "identify",
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("identify: {}", e);
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
        app: wire_identify(config.verbose),
    };
    runner.run(config)
}

fn print_usage() {
    eprintln!("Usage: identify [options] <input.json> [output_dir]");
}

fn print_help() {
    println!("Usage: identify [options] <input.json> [output_dir]");
    println!("Options:");
    println!("  -h, --help                    Show this help message");
    println!("  -L, --list-profiles           List currently available provider profiles (from profiles.json + built-ins)");
    println!("  -p, --profile <profile>       Specify LLM profile (perplexity, openai, openai_compat, echo). Default: profiles.json default, or perplexity");
    println!("  -m, --model <model>           Specify model name (e.g. sonar-pro). Default: profile default");
    println!("  --prior <file>                Previous result.json; runs the second round with it as extra context");
    println!("  --no-save                     Do not write context.json / result.json");
    println!("  -v, --verbose                 Also write log records to stderr");
    println!("  --generate <shell>            Generate shell completion script (bash, zsh, fish)");
    println!();
    println!("Environment:");
    println!("  MEDAGENT_HOME       Home directory. Profiles: $MEDAGENT_HOME/profiles.json; logs: $MEDAGENT_HOME/log/");
    println!("                      If unset, $XDG_CONFIG_HOME/medagent (e.g. ~/.config/medagent) is used.");
    println!("  PERPLEXITY_API_KEY  API key for the default perplexity profile");
    println!();
    println!("Description:");
    println!("  Read a patient context JSON file, ask the model for likely causes of the symptoms,");
    println!("  print the result record and save context.json / result.json to output_dir (default ./output).");
    println!("  Any failure of the model call yields a fixed fallback record.");
    println!();
    println!("Examples:");
    println!("  identify patient.json");
    println!("  identify -p echo patient.json /tmp/out");
    println!("  identify --prior output/result.json patient.json output/round2");
}
