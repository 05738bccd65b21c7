use clap::Parser;

/// 命令行参数
#[derive(Parser, Debug, Clone)]
#[command(author = "whiteCcinn", version = "1.0", about = "OpenRTB RX bidder adapter")]
pub struct CliArgs {
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,
    #[arg(long, default_value = "logs")]
    pub log_dir: String,
    /// RX 竞价接口地址
    #[arg(long, default_value = "http://localhost:9001/bid")]
    pub rx_endpoint: String,
    /// 单次上游请求超时（毫秒）
    #[arg(long, default_value_t = 250)]
    pub timeout_ms: u64,
    /// 本地 mock RX 端口，0 表示不启动
    #[arg(long, default_value_t = 9001)]
    pub mock_port: u16,
}

#[derive(Clone, Debug)]
pub struct ConfigManager {
    pub rx_endpoint: String,
    pub timeout_ms: u64,
}

impl ConfigManager {
    pub fn new(rx_endpoint: &str, timeout_ms: u64) -> Self {
        ConfigManager {
            rx_endpoint: rx_endpoint.to_string(),
            timeout_ms,
        }
    }

    pub fn from_args(args: &CliArgs) -> Self {
        ConfigManager::new(&args.rx_endpoint, args.timeout_ms)
    }
}
