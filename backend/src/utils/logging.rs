use env_logger::{Builder, Target};
use log::{info, LevelFilter};

const LOG_ENV_VAR: &str = "M3U_EDITOR_LOG";

fn get_log_level(log_level: &str) -> LevelFilter {
    match log_level.trim().to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        // "info" => LevelFilter::Info,
        _ => LevelFilter::Info,
    }
}

// returns the applied filters, `module=level` pairs are applied per module
fn apply_log_level(log_builder: &mut Builder, log_level: &str) -> Vec<String> {
    let mut log_levels = vec![];
    if log_level.contains('=') {
        for pair in log_level.split(',') {
            if pair.contains('=') {
                let mut kv_iter = pair.split('=').map(str::trim);
                if let (Some(module), Some(level)) = (kv_iter.next(), kv_iter.next()) {
                    let log_level = get_log_level(level);
                    log_levels.push(format!("{module}={log_level}"));
                    log_builder.filter_module(module, log_level);
                }
            } else {
                let level = get_log_level(pair);
                log_levels.push(level.to_string());
                log_builder.filter_level(level);
            }
        }
    } else {
        let level = get_log_level(log_level);
        log_builder.filter_level(level);
        log_levels.push(level.to_string());
    }
    log_levels
}

pub fn init_logger(user_log_level: Option<&String>) {
    let env_log_level = std::env::var(LOG_ENV_VAR).ok();

    let mut log_builder = Builder::from_default_env();
    // stdout carries the command output
    log_builder.target(Target::Stderr);

    // priority  CLI-Argument, Env-Var, Default
    let log_level = user_log_level
        .map(std::string::ToString::to_string)
        .or(env_log_level)
        .unwrap_or_else(|| "info".to_string());

    let log_levels = apply_log_level(&mut log_builder, &log_level);
    log_builder.init();
    info!("Log Level {}", &log_levels.join(", "));
}

#[cfg(test)]
mod tests {
    use super::{apply_log_level, get_log_level};
    use env_logger::Builder;
    use log::LevelFilter;

    #[test]
    fn test_get_log_level() {
        assert_eq!(get_log_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(get_log_level(" warn "), LevelFilter::Warn);
        assert_eq!(get_log_level("whatever"), LevelFilter::Info);
    }

    #[test]
    fn test_apply_module_levels() {
        let mut builder = Builder::new();
        let levels = apply_log_level(&mut builder, "warn,m3u_editor::processing=trace");
        assert_eq!(levels, vec!["WARN".to_string(), "m3u_editor::processing=TRACE".to_string()]);
    }
}
