//! infra-guardrails - Terraform and Helm guardrails for Claude Code
//!
//! # Usage
//!
//! ```bash
//! # PreToolUse hook: decide allow / ask / deny
//! echo '{"tool_name":"Bash","tool_input":{"command":"helm install x ."}}' | infra-guardrails validate --tool helm
//!
//! # PostToolUse hook: record the result
//! infra-guardrails log --tool terraform
//! ```

use std::env;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process;

use infra_guardrails::{
    audit::AuditLog,
    config::{Config, Environment},
    engine::{Outcome, PolicyEngine},
    input::HookInput,
    output::HookOutput,
    rules::Tool,
};

/// Print version information
fn print_version() {
    println!("infra-guardrails {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message
fn print_help() {
    println!(
        r#"infra-guardrails - Terraform and Helm guardrails for Claude Code

USAGE:
    infra-guardrails [validate|log] --tool <terraform|helm> [OPTIONS]

MODES:
    validate                PreToolUse hook: allow, ask or deny (default)
    log                     PostToolUse hook: record the command result

OPTIONS:
    -h, --help              Print this help message
    -v, --version           Print version information
    -t, --tool TOOL         Governed tool: terraform, helm
    -c, --config PATH       Path to config file

ENVIRONMENT:
    CLAUDE_PROJECT_DIR      Project root; audit logs go under .claude/audit
    DEVCONTAINER=true       Running inside the standard dev container

EXIT CODES (validate):
    0   decision in JSON on stdout
    1   malformed hook input, no decision
    2   command blocked

USAGE AS HOOK:
    Configure in .claude/settings.json:
    {{
      "hooks": {{
        "PreToolUse": [{{
          "matcher": "Bash",
          "hooks": [{{ "type": "command", "command": "infra-guardrails validate --tool terraform" }}]
        }}],
        "PostToolUse": [{{
          "matcher": "Bash",
          "hooks": [{{ "type": "command", "command": "infra-guardrails log --tool terraform" }}]
        }}]
      }}
    }}
"#
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Validate,
    Log,
}

/// Parse command line arguments
struct Args {
    help: bool,
    version: bool,
    mode: Mode,
    tool: Option<Tool>,
    tool_arg: Option<String>,
    config_path: Option<String>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut result = Args {
            help: false,
            version: false,
            mode: Mode::Validate,
            tool: None,
            tool_arg: None,
            config_path: None,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-h" | "--help" => result.help = true,
                "-v" | "--version" => result.version = true,
                "validate" => result.mode = Mode::Validate,
                "log" => result.mode = Mode::Log,
                "-t" | "--tool" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.set_tool(&args[i]);
                    }
                }
                "-c" | "--config" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.config_path = Some(args[i].clone());
                    }
                }
                arg if arg.starts_with("--tool=") => {
                    result.set_tool(arg.trim_start_matches("--tool="));
                }
                arg if arg.starts_with("--config=") => {
                    let path = arg.trim_start_matches("--config=");
                    result.config_path = Some(path.to_string());
                }
                _ => {}
            }
            i += 1;
        }

        result
    }

    fn set_tool(&mut self, value: &str) {
        self.tool = Tool::from_str(value);
        self.tool_arg = Some(value.to_string());
    }
}

/// Read the whole hook payload from stdin
fn read_stdin() -> io::Result<String> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    Ok(input)
}

fn print_json(json: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = writeln!(handle, "{}", json);
    let _ = handle.flush();
}

/// PreToolUse: fails closed on bad input
fn run_validate(tool: Tool, config: &Config, environment: &Environment) -> i32 {
    let input = match read_stdin()
        .map_err(|e| e.to_string())
        .and_then(|raw| HookInput::from_json(&raw).map_err(|e| e.to_string()))
    {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: Invalid JSON input from Claude Code: {}", e);
            return 1;
        }
    };

    // Only validate shell tool calls
    if !input.is_shell() {
        return 0;
    }

    let engine = match PolicyEngine::new(tool, config, environment) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: Failed to compile {} policy: {}", tool.id(), e);
            return 1;
        }
    };

    let mut audit = audit_log(tool, config, environment);
    let decision = engine.evaluate(input.command(), &input.working_dir(), &mut audit);

    print_json(&HookOutput::from_decision(&decision).to_json());
    decision.exit_code()
}

/// PostToolUse: never fails the workflow
fn run_log(tool: Tool, config: &Config, environment: &Environment) -> i32 {
    let input = match read_stdin()
        .map_err(|e| e.to_string())
        .and_then(|raw| HookInput::from_json(&raw).map_err(|e| e.to_string()))
    {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: Invalid JSON input from Claude Code: {}", e);
            return 0;
        }
    };

    if !input.is_shell() {
        return 0;
    }

    let engine = match PolicyEngine::new(tool, config, environment) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Warning: Failed to compile {} policy: {}", tool.id(), e);
            return 0;
        }
    };

    let outcome = Outcome::from(&input.tool_response.clone().unwrap_or_default());
    let mut audit = audit_log(tool, config, environment);
    engine.record_completion(input.command(), &input.working_dir(), &outcome, &mut audit);
    0
}

fn audit_log(tool: Tool, config: &Config, environment: &Environment) -> AuditLog {
    match config.audit_dir(environment) {
        Some(dir) => AuditLog::for_tool(&dir, tool.id(), config.rotate_daily(tool)),
        None => AuditLog::disabled(),
    }
}

fn main() {
    let args = Args::parse();

    // Handle help and version
    if args.help {
        print_help();
        return;
    }

    if args.version {
        print_version();
        return;
    }

    let tool = match args.tool {
        Some(tool) => tool,
        None => {
            match args.tool_arg {
                Some(ref value) => eprintln!("Error: Unknown tool {:?} (expected terraform or helm)", value),
                None => eprintln!("Error: Missing --tool (terraform or helm)"),
            }
            // The logger must never block the workflow
            process::exit(if args.mode == Mode::Log { 0 } else { 1 });
        }
    };

    let environment = Environment::from_env();

    // Load configuration
    let config = if let Some(ref path) = args.config_path {
        Config::load_from(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config from {}: {}", path, e);
            Config::default()
        })
    } else {
        Config::load(&environment)
    };

    let code = match args.mode {
        Mode::Validate => run_validate(tool, &config, &environment),
        Mode::Log => run_log(tool, &config, &environment),
    };

    process::exit(code);
}
