//! Doctor command - verify API key, directories and configuration.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("luma-mcp Doctor");
    println!();

    let mut checks = Vec::new();

    println!("{}", style("API Configuration").bold());
    let api_checks = vec![
        check_api_key(&settings.api.api_key_env, std::env::var(&settings.api.api_key_env).ok()),
        check_tls(settings.api.accept_invalid_certs),
    ];
    for check in &api_checks {
        check.print();
    }
    checks.extend(api_checks);

    println!();

    println!("{}", style("Directories").bold());
    let dir_check = check_temp_dir(settings);
    dir_check.print();
    checks.push(dir_check);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file(config_path);
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before generating.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! luma-mcp is ready to use.");
    }

    Ok(())
}

/// Check the API key without printing it in full.
fn check_api_key(env_name: &str, value: Option<String>) -> CheckResult {
    let hint = format!("Set with: export {}='luma-...'", env_name);
    match value {
        Some(key) if key.trim().is_empty() => CheckResult::error(env_name, "empty", &hint),
        Some(key) if key.is_ascii() && key.len() > 12 => {
            let masked = format!("{}...{}", &key[..4], &key[key.len() - 4..]);
            CheckResult::ok(env_name, &format!("configured ({})", masked))
        }
        Some(_) => CheckResult::warning(
            env_name,
            "set but unusually short",
            "Copy the full key from the Luma API dashboard",
        ),
        None => CheckResult::error(env_name, "not set", &hint),
    }
}

fn check_tls(accept_invalid_certs: bool) -> CheckResult {
    if accept_invalid_certs {
        CheckResult::warning(
            "TLS",
            "certificate validation disabled",
            "Set api.accept_invalid_certs = false to verify certificates",
        )
    } else {
        CheckResult::ok("TLS", "certificates verified")
    }
}

/// Check that downloaded assets can be written.
fn check_temp_dir(settings: &Settings) -> CheckResult {
    let dir = settings.temp_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        return CheckResult::error(
            "Asset directory",
            &format!("{} ({})", dir.display(), e),
            "Set general.temp_dir to a writable directory",
        );
    }

    match tempfile::NamedTempFile::new_in(&dir) {
        Ok(_) => CheckResult::ok("Asset directory", &dir.display().to_string()),
        Err(e) => CheckResult::error(
            "Asset directory",
            &format!("{} is not writable ({})", dir.display(), e),
            "Set general.temp_dir to a writable directory",
        ),
    }
}

/// Check if the effective config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: luma-mcp config edit",
        )
    }
}
