use traffic_flow_predictor::{PredictionEngine, TripRequest};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(weather) = args.first() else {
        eprintln!("Usage: traffic_predict_main <Clear|Rain|Snow|Fog> [departure_time]");
        std::process::exit(2);
    };
    let request = TripRequest::new(args.get(1).map(String::as_str), weather);

    let engine = PredictionEngine::new();
    match engine.predict(&request, &mut rand::rng()) {
        Ok(result) => match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error encoding prediction: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Prediction error: {}", e);
            std::process::exit(1);
        }
    }
}
