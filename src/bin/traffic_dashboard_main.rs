use traffic_flow_predictor::config::DashboardConfig;
use traffic_flow_predictor::monitoring::dashboard::Dashboard;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match DashboardConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(1);
        }
    };

    let mut dashboard = Dashboard::new(config);
    dashboard.run_cli().await;
}
