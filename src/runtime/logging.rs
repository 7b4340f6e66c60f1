use crate::config::AppConfig;

/// 初始化日志
///
/// 开发环境输出带文件/行号的彩色日志，生产环境输出 JSON。
/// 返回的 guard 必须在进程生命周期内持有，否则异步写入线程会提前退出。
pub fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    let config = AppConfig::get();

    let stdout_log = std::io::stdout();
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(stdout_log);
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    guard
}
